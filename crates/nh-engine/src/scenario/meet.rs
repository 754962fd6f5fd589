//! The hardcoded "find each other" scenario.
//!
//! A fixed four-room manor with three items. Player P1 wakes in the
//! foyer, P2 in the library; both win jointly the moment they share a
//! location.

use nh_core::{CoreError, GameState, Item, Location, Winner, World};

use super::{Scenario, both_players_met};
use crate::error::ScenarioError;

/// The built-in manor scenario. Expects players `"P1"` and `"P2"`.
#[derive(Debug, Clone, Copy, Default)]
pub struct MeetScenario;

impl Scenario for MeetScenario {
    fn name(&self) -> &str {
        "Find Each Other"
    }

    fn initial_setup(&self, state: &mut GameState) -> Result<(), ScenarioError> {
        let mut world = World::new();

        world.add_location(Location::new(
            "foyer",
            "Foyer",
            "A cold, dim foyer with a single flickering candle.",
            "Peeling wallpaper curls from the walls and a large portrait with \
             scratched-out faces hangs crooked above the door.",
        ))?;
        world.add_location(Location::new(
            "hall",
            "Long Hallway",
            "A narrow hallway. The walls seem closer than they should be.",
            "Uneven floorboards creak underfoot. Faded runner rugs lead past \
             doorways, and the ceiling seems to sag in the middle.",
        ))?;
        world.add_location(Location::new(
            "library",
            "Library",
            "Dusty shelves tower above. You hear faint whispering.",
            "Dozens of cracked leather spines stare down at you. A ladder leans \
             uselessly against a shelf, and loose pages litter the floor like \
             fallen leaves.",
        ))?;
        world.add_location(Location::new(
            "cellar",
            "Cellar",
            "Damp stone underfoot. Something drips in the dark.",
            "Thick wooden beams hold up a low ceiling. Rusted hooks hang from \
             chains, and old barrels sweat moisture in the chill.",
        ))?;

        world.connect("foyer", "hall", true)?;
        world.connect("hall", "library", true)?;
        world.connect("hall", "cellar", true)?;

        place(
            &mut world,
            "foyer",
            Item::new(
                "lantern",
                "Faint Lantern",
                "A small lantern that pushes the darkness back just a little.",
            )
            .with_tag("light"),
        )?;
        place(
            &mut world,
            "library",
            Item::new(
                "potion",
                "Strange Potion",
                "A cloudy liquid in a cracked vial. It smells metallic.",
            )
            .with_tag("potion"),
        )?;
        place(
            &mut world,
            "cellar",
            Item::new(
                "clarity",
                "Clarity Draught",
                "A clear, bitter liquid that somehow smells like cold air.",
            )
            .with_tag("potion")
            .with_tag("clarity"),
        )?;

        state.world = world;
        state.player_mut("P1")?.location_id = "foyer".to_string();
        state.player_mut("P2")?.location_id = "library".to_string();

        state.push_message("You awaken in different parts of a strange place.");
        state.push_message("Find each other before the darkness finds you.");
        Ok(())
    }

    fn check_win_condition(&self, state: &GameState) -> Option<Winner> {
        both_players_met(state)
    }
}

fn place(world: &mut World, location_id: &str, item: Item) -> Result<(), ScenarioError> {
    world
        .get_mut(location_id)
        .ok_or_else(|| CoreError::LocationNotFound(location_id.to_string()))
        .map_err(ScenarioError::Setup)?
        .place_item(item);
    Ok(())
}
