//! The turn engine.
//!
//! Interprets one player's commands against the session state, reporting
//! whether each command spent the turn, and applies end-of-turn effects
//! (ambient danger, death check, win check) when the driver asks for
//! them. The engine owns the state and the scenario; the driver only
//! feeds input, drains messages, and advances the turn order.

use rand::Rng;
use rand::rngs::StdRng;

use nh_core::{CoreError, GameState, Item, Location, MAX_SANITY, Winner};

use crate::command::{Command, parse_command};
use crate::error::EngineResult;
use crate::scenario::Scenario;

/// Ambient danger thresholds for the end-of-turn draw in `[0, 1)`:
/// below `FLAVOR` a flavor-only scare, below `SANITY` a sanity chip,
/// below `HEALTH` a health chip, otherwise a quiet turn.
const AMBIENT_FLAVOR: f64 = 0.20;
const AMBIENT_SANITY: f64 = 0.35;
const AMBIENT_HEALTH: f64 = 0.45;

/// The turn engine. Owns the session state, the scenario, and the random
/// source for ambient danger.
pub struct GameEngine {
    state: GameState,
    scenario: Box<dyn Scenario>,
    rng: StdRng,
}

impl GameEngine {
    /// Create an engine and run the scenario's setup exactly once. The
    /// random source is injected so sessions can be made deterministic.
    pub fn new(
        mut state: GameState,
        scenario: Box<dyn Scenario>,
        rng: StdRng,
    ) -> EngineResult<Self> {
        scenario.initial_setup(&mut state)?;
        Ok(Self {
            state,
            scenario,
            rng,
        })
    }

    /// The session state.
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Mutable session state, for the driver to drain messages, advance
    /// the turn order, and end the session on an explicit quit.
    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    /// Display name of the active scenario.
    pub fn scenario_name(&self) -> &str {
        self.scenario.name()
    }

    /// Process one line of player input. Returns whether the command
    /// spent the player's turn; a spent turn obliges the driver to call
    /// [`GameEngine::end_of_turn`] before moving on.
    pub fn process_command(&mut self, player_id: &str, input: &str) -> EngineResult<bool> {
        if !self.state.is_active() {
            return Ok(false);
        }

        match parse_command(input) {
            Command::Empty => {
                self.state.push_message("You hesitate, doing nothing.");
                Ok(false)
            }
            Command::Look => {
                self.handle_look(player_id)?;
                Ok(true)
            }
            Command::Move { target } => {
                self.handle_move(player_id, target.as_deref())?;
                Ok(true)
            }
            Command::Search => {
                self.handle_search(player_id)?;
                Ok(true)
            }
            Command::Use { target } => self.handle_use(player_id, target.as_deref()),
            Command::Status => {
                // Spends the turn, unlike help. Kept as-is; see the
                // status_spends_the_turn test.
                self.handle_status(player_id)?;
                Ok(true)
            }
            Command::Help => {
                self.handle_help();
                Ok(false)
            }
            Command::Unknown { .. } => {
                self.state.push_message(
                    "You mutter something unintelligible. Nothing happens. \
                     (Type 'help' for commands.)",
                );
                Ok(false)
            }
        }
    }

    /// Glance at the current room, shown at the start of a turn and after
    /// a successful move. Shows the long description once this player has
    /// searched this exact location, the short one otherwise.
    pub fn describe_surroundings(&mut self, player_id: &str) -> EngineResult<()> {
        let player = self.state.player(player_id)?;
        let name = player.name.clone();
        let loc = self.location_of(player_id)?;

        let text = if self.state.has_inspected(player_id, &loc.id) {
            let detail = loc.detail_description.trim();
            if detail.is_empty() {
                loc.description.trim()
            } else {
                detail
            }
        } else {
            loc.description.trim()
        };

        let mut message = format!("{}, you are in {}.", name, loc.name);
        if !text.is_empty() {
            message.push('\n');
            message.push_str(text);
        }
        self.state.push_message(message);
        Ok(())
    }

    /// Apply end-of-turn effects for the acting player: ambient danger,
    /// then the death scan, then the scenario win check. The death scan
    /// preempts the win check entirely. No-op once the session has ended.
    pub fn end_of_turn(&mut self, player_id: &str) -> EngineResult<()> {
        if !self.state.is_active() {
            return Ok(());
        }

        let roll: f64 = self.rng.random();
        self.apply_ambient_danger(player_id, roll)?;

        if self.state.players().any(nh_core::Player::is_dead) {
            self.state.end_session(None);
            self.state
                .push_message("The darkness closes in. No one escapes.");
            return Ok(());
        }

        if let Some(winner) = self.scenario.check_win_condition(&self.state) {
            match &winner {
                Winner::Both => self.state.push_message(
                    "You find each other in the darkness. For now, you are safe.",
                ),
                Winner::Player(id) => {
                    let name = self
                        .state
                        .player(id)
                        .map(|p| p.name.clone())
                        .unwrap_or_else(|_| id.clone());
                    self.state.push_message(format!("{name} has won."));
                }
            }
            self.state.end_session(Some(winner));
        }
        Ok(())
    }

    /// Resolve one ambient danger draw. Split from [`GameEngine::end_of_turn`]
    /// so tests can drive the branches with exact values.
    fn apply_ambient_danger(&mut self, player_id: &str, roll: f64) -> EngineResult<()> {
        if roll < AMBIENT_FLAVOR {
            self.state
                .push_message("Something moves just out of sight. The air feels heavier.");
        } else if roll < AMBIENT_SANITY {
            self.state.player_mut(player_id)?.adjust_sanity(-1);
            self.state.push_message(
                "A whisper curls into your ear in a voice you almost recognize. (-1 sanity)",
            );
        } else if roll < AMBIENT_HEALTH {
            self.state.player_mut(player_id)?.adjust_health(-1);
            self.state.push_message(
                "A sudden, invisible weight presses on your chest. It hurts to breathe. \
                 (-1 health)",
            );
        }
        Ok(())
    }

    /// The location the player stands in. A location id the world graph
    /// does not contain is a broken session, not a playable condition.
    fn location_of(&self, player_id: &str) -> EngineResult<&Location> {
        let player = self.state.player(player_id)?;
        self.state
            .world
            .get(&player.location_id)
            .ok_or_else(|| CoreError::LocationNotFound(player.location_id.clone()).into())
    }

    fn handle_look(&mut self, player_id: &str) -> EngineResult<()> {
        let loc = self.location_of(player_id)?;

        let detail = loc.detail_description.trim();
        let mut lines = vec![
            format!("You take a careful look around {}.", loc.name),
            if detail.is_empty() {
                "You don't notice anything new.".to_string()
            } else {
                detail.to_string()
            },
        ];

        if !loc.neighbors.is_empty() {
            let exits: Vec<String> = loc
                .neighbors
                .iter()
                .map(|id| match self.state.world.get(id) {
                    Some(neighbor) => format!("{} ({})", neighbor.name, id),
                    None => id.clone(),
                })
                .collect();
            lines.push(format!("Exits lead to: {}.", exits.join(", ")));
        }

        if loc.items.is_empty() {
            lines.push(
                "You don't see anything obviously useful, just the unsettling details \
                 of the room."
                    .to_string(),
            );
        } else {
            let names: Vec<&str> = loc.items.iter().map(|i| i.name.as_str()).collect();
            lines.push(format!(
                "On closer inspection, you notice: {} on the ground.",
                names.join(", ")
            ));
        }

        let player = self.state.player(player_id)?;
        if !player.inventory.is_empty() {
            let carried: Vec<&str> = player.inventory.iter().map(|i| i.name.as_str()).collect();
            lines.push(format!("Carrying: {}.", carried.join(", ")));
        }

        self.state.push_message(lines.join("\n"));
        Ok(())
    }

    fn handle_move(&mut self, player_id: &str, target: Option<&str>) -> EngineResult<()> {
        let loc = self.location_of(player_id)?;

        let Some(target) = target else {
            self.state.push_message("Move where?");
            return Ok(());
        };

        // Exact neighbor id first, then neighbor display name.
        let destination = loc
            .neighbors
            .iter()
            .find(|id| id.eq_ignore_ascii_case(target))
            .cloned()
            .or_else(|| {
                loc.neighbors
                    .iter()
                    .find(|id| {
                        self.state
                            .world
                            .get(id)
                            .is_some_and(|n| n.name.eq_ignore_ascii_case(target))
                    })
                    .cloned()
            });

        let Some(destination) = destination else {
            self.state
                .push_message("You fumble in the dark, but there is no clear path that way.");
            return Ok(());
        };

        let destination_name = self
            .state
            .world
            .get(&destination)
            .map(|n| n.name.clone())
            .ok_or_else(|| CoreError::LocationNotFound(destination.clone()))?;

        self.state.player_mut(player_id)?.location_id = destination;
        self.state
            .push_message(format!("You move into {destination_name}."));
        self.describe_surroundings(player_id)
    }

    fn handle_search(&mut self, player_id: &str) -> EngineResult<()> {
        let loc = self.location_of(player_id)?;
        let loc_id = loc.id.clone();
        let found: Vec<String> = loc.items.iter().map(|i| i.name.clone()).collect();

        self.state.mark_inspected(player_id, &loc_id);

        if found.is_empty() {
            self.state
                .push_message("You search the area but find nothing useful.");
            return Ok(());
        }

        self.state
            .push_message(format!("You search carefully and find: {}.", found.join(", ")));
        self.state.push_message("You pick them up.");

        let items = self
            .state
            .world
            .get_mut(&loc_id)
            .ok_or_else(|| CoreError::LocationNotFound(loc_id.clone()))?
            .take_all_items();
        self.state.player_mut(player_id)?.take_items(items);
        Ok(())
    }

    /// Use a carried item. Returns whether the turn was spent: the
    /// empty-inventory and missing-argument cases are free, everything
    /// else (including an item that fails to resolve) costs the turn.
    fn handle_use(&mut self, player_id: &str, target: Option<&str>) -> EngineResult<bool> {
        let player = self.state.player(player_id)?;

        if player.inventory.is_empty() {
            self.state.push_message("You have nothing to use.");
            return Ok(false);
        }
        let Some(target) = target else {
            self.state
                .push_message("Use what? (Hint: use <item id or name>)");
            return Ok(false);
        };

        let Some(index) = player.find_item(target) else {
            self.state
                .push_message("You fumble through your things but can't find that.");
            return Ok(true);
        };

        let item = &player.inventory[index];
        let effect = ItemEffect::for_item(item);

        let player = self.state.player_mut(player_id)?;
        match effect {
            ItemEffect::Clarity => {
                player.set_sanity(MAX_SANITY);
                player.remove_item(index);
                self.state
                    .push_message("You drink the clear draught. The whispers fall silent.");
                self.state
                    .push_message("Your mind snaps back into focus. (Sanity fully restored)");
            }
            ItemEffect::Potion => {
                player.adjust_health(3);
                player.adjust_sanity(2);
                player.remove_item(index);
                self.state
                    .push_message("You drink the strange potion. Warmth spreads through your body.");
                self.state
                    .push_message("You feel a little safer. (+3 health, +2 sanity)");
            }
            ItemEffect::Light => {
                player.adjust_sanity(1);
                self.state
                    .push_message("You raise the lantern. The darkness shrinks back a little.");
                self.state.push_message("Your mind steadies. (+1 sanity)");
            }
            ItemEffect::None => {
                self.state
                    .push_message("You fiddle with it, but nothing obvious happens.");
            }
        }
        Ok(true)
    }

    fn handle_status(&mut self, player_id: &str) -> EngineResult<()> {
        let player = self.state.player(player_id)?;
        let message = format!(
            "{}'s status:\n  Health: {}\n  Sanity: {}\n  Location: {}",
            player.name,
            player.health,
            player.sanity(),
            player.location_id
        );
        self.state.push_message(message);
        Ok(())
    }

    fn handle_help(&mut self) {
        self.state.push_message(
            "Commands:\n\
             \x20 look / l                     - Look around\n\
             \x20 move <room name or id>       - Move to an adjacent location\n\
             \x20 search / s                   - Search the area for items\n\
             \x20 use <item>                   - Use an item in your inventory\n\
             \x20 status                       - View your status\n\
             \x20 help                         - Show this help\n\
             \x20 end / quit                   - End the game",
        );
    }
}

/// What using an item does, decided by tag priority: clarity beats
/// potion beats light, since an item may carry several tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ItemEffect {
    /// Sanity restored to the maximum; item consumed.
    Clarity,
    /// +3 health, +2 sanity; item consumed.
    Potion,
    /// +1 sanity; item kept.
    Light,
    /// Nothing obvious; item kept.
    None,
}

impl ItemEffect {
    fn for_item(item: &Item) -> Self {
        if item.has_tag("clarity") {
            Self::Clarity
        } else if item.has_tag("potion") {
            Self::Potion
        } else if item.has_tag("light") {
            Self::Light
        } else {
            Self::None
        }
    }
}

#[cfg(test)]
mod tests {
    use nh_core::{Player, World};
    use rand::SeedableRng;

    use super::*;
    use crate::scenario::MeetScenario;

    fn meet_engine() -> GameEngine {
        let state = GameState::new(
            World::new(),
            vec![Player::new("P1", "Player 1"), Player::new("P2", "Player 2")],
        );
        GameEngine::new(state, Box::new(MeetScenario), StdRng::seed_from_u64(7)).unwrap()
    }

    fn last_message(engine: &mut GameEngine) -> String {
        engine
            .state_mut()
            .drain_messages()
            .last()
            .cloned()
            .unwrap_or_default()
    }

    #[test]
    fn setup_runs_at_construction() {
        let mut engine = meet_engine();
        assert_eq!(engine.state().player("P1").unwrap().location_id, "foyer");
        let intro = engine.state_mut().drain_messages();
        assert!(intro.iter().any(|m| m.contains("Find each other")));
    }

    #[test]
    fn glance_shows_short_description_until_searched() {
        let mut engine = meet_engine();
        engine.state_mut().drain_messages();

        engine.describe_surroundings("P1").unwrap();
        let glance = last_message(&mut engine);
        assert!(glance.contains("Player 1, you are in Foyer."));
        assert!(glance.contains("flickering candle"));
        assert!(!glance.contains("Peeling wallpaper"));

        engine.process_command("P1", "search").unwrap();
        engine.state_mut().drain_messages();
        engine.describe_surroundings("P1").unwrap();
        assert!(last_message(&mut engine).contains("Peeling wallpaper"));
    }

    #[test]
    fn look_lists_detail_exits_and_items() {
        let mut engine = meet_engine();
        engine.state_mut().drain_messages();

        let consumed = engine.process_command("P1", "look").unwrap();
        assert!(consumed);
        let report = last_message(&mut engine);
        assert!(report.contains("Peeling wallpaper"));
        assert!(report.contains("Long Hallway (hall)"));
        assert!(report.contains("Faint Lantern"));
    }

    #[test]
    fn move_by_id_then_by_name() {
        let mut engine = meet_engine();

        assert!(engine.process_command("P1", "move hall").unwrap());
        assert_eq!(engine.state().player("P1").unwrap().location_id, "hall");

        assert!(engine.process_command("P1", "go Library").unwrap());
        assert_eq!(engine.state().player("P1").unwrap().location_id, "library");
    }

    #[test]
    fn move_to_unreachable_target_stays_put() {
        let mut engine = meet_engine();
        engine.state_mut().drain_messages();

        // The cellar is not adjacent to the foyer.
        let consumed = engine.process_command("P1", "move cellar").unwrap();
        assert!(consumed);
        assert_eq!(engine.state().player("P1").unwrap().location_id, "foyer");
        assert!(last_message(&mut engine).contains("no clear path"));
    }

    #[test]
    fn move_without_target_stays_put() {
        let mut engine = meet_engine();
        engine.state_mut().drain_messages();

        assert!(engine.process_command("P1", "move").unwrap());
        assert_eq!(engine.state().player("P1").unwrap().location_id, "foyer");
        assert!(last_message(&mut engine).contains("Move where?"));
    }

    #[test]
    fn search_transfers_every_item_and_empties_the_room() {
        let mut engine = meet_engine();

        assert!(engine.process_command("P1", "search").unwrap());
        assert!(engine.state().world.get("foyer").unwrap().items.is_empty());
        assert_eq!(engine.state().player("P1").unwrap().inventory.len(), 1);

        // Searching again is safe and finds nothing.
        engine.state_mut().drain_messages();
        assert!(engine.process_command("P1", "search").unwrap());
        assert!(last_message(&mut engine).contains("nothing useful"));
        assert_eq!(engine.state().player("P1").unwrap().inventory.len(), 1);
    }

    #[test]
    fn clarity_restores_sanity_fully_and_is_consumed() {
        let mut engine = meet_engine();
        {
            let player = engine.state_mut().player_mut("P1").unwrap();
            player.set_sanity(2);
            player.take_items(vec![
                Item::new("clarity", "Clarity Draught", "")
                    .with_tag("potion")
                    .with_tag("clarity"),
            ]);
        }

        assert!(engine.process_command("P1", "use clarity").unwrap());
        let player = engine.state().player("P1").unwrap();
        assert_eq!(player.sanity(), MAX_SANITY);
        assert!(player.inventory.is_empty());
    }

    #[test]
    fn potion_heals_and_is_consumed() {
        let mut engine = meet_engine();
        {
            let player = engine.state_mut().player_mut("P1").unwrap();
            player.set_sanity(9);
            player.take_items(vec![Item::new("potion", "Strange Potion", "").with_tag("potion")]);
        }

        assert!(engine.process_command("P1", "use potion").unwrap());
        let player = engine.state().player("P1").unwrap();
        assert_eq!(player.health, 13);
        // +2 sanity clamps at the ceiling.
        assert_eq!(player.sanity(), MAX_SANITY);
        assert!(player.inventory.is_empty());
    }

    #[test]
    fn light_steadies_and_is_kept() {
        let mut engine = meet_engine();
        {
            let player = engine.state_mut().player_mut("P1").unwrap();
            player.set_sanity(4);
            player.take_items(vec![Item::new("lantern", "Faint Lantern", "").with_tag("light")]);
        }

        assert!(engine.process_command("P1", "use lantern").unwrap());
        let player = engine.state().player("P1").unwrap();
        assert_eq!(player.sanity(), 5);
        assert_eq!(player.inventory.len(), 1);
    }

    #[test]
    fn untagged_item_does_nothing_and_is_kept() {
        let mut engine = meet_engine();
        engine
            .state_mut()
            .player_mut("P1")
            .unwrap()
            .take_items(vec![Item::new("key", "Rusty Key", "")]);
        engine.state_mut().drain_messages();

        assert!(engine.process_command("P1", "use key").unwrap());
        assert!(last_message(&mut engine).contains("nothing obvious happens"));
        assert_eq!(engine.state().player("P1").unwrap().inventory.len(), 1);
    }

    #[test]
    fn use_with_empty_inventory_is_free() {
        let mut engine = meet_engine();
        engine.state_mut().drain_messages();

        let consumed = engine.process_command("P1", "use lantern").unwrap();
        assert!(!consumed);
        assert!(last_message(&mut engine).contains("nothing to use"));
    }

    #[test]
    fn use_without_target_is_free() {
        let mut engine = meet_engine();
        engine
            .state_mut()
            .player_mut("P1")
            .unwrap()
            .take_items(vec![Item::new("key", "Rusty Key", "")]);
        engine.state_mut().drain_messages();

        assert!(!engine.process_command("P1", "use").unwrap());
        assert!(last_message(&mut engine).contains("Use what?"));
    }

    #[test]
    fn use_with_unmatched_item_costs_the_turn() {
        let mut engine = meet_engine();
        engine
            .state_mut()
            .player_mut("P1")
            .unwrap()
            .take_items(vec![Item::new("key", "Rusty Key", "")]);

        assert!(engine.process_command("P1", "use sword").unwrap());
    }

    #[test]
    fn help_and_unknown_and_empty_are_free() {
        let mut engine = meet_engine();
        assert!(!engine.process_command("P1", "help").unwrap());
        assert!(!engine.process_command("P1", "dance wildly").unwrap());
        assert!(!engine.process_command("P1", "   ").unwrap());
    }

    #[test]
    fn status_spends_the_turn() {
        // Unlike help, status costs a turn. Long-standing behavior,
        // pinned here on purpose.
        let mut engine = meet_engine();
        engine.state_mut().drain_messages();

        assert!(engine.process_command("P1", "status").unwrap());
        let report = last_message(&mut engine);
        assert!(report.contains("Health: 10"));
        assert!(report.contains("Location: foyer"));
    }

    #[test]
    fn ambient_flavor_branch_changes_no_stats() {
        let mut engine = meet_engine();
        engine.state_mut().drain_messages();

        engine.apply_ambient_danger("P1", 0.10).unwrap();
        let player = engine.state().player("P1").unwrap();
        assert_eq!(player.health, 10);
        assert_eq!(player.sanity(), 10);
        assert!(last_message(&mut engine).contains("out of sight"));
    }

    #[test]
    fn ambient_sanity_branch_chips_sanity() {
        let mut engine = meet_engine();
        engine.apply_ambient_danger("P1", 0.25).unwrap();
        assert_eq!(engine.state().player("P1").unwrap().sanity(), 9);
        assert_eq!(engine.state().player("P1").unwrap().health, 10);
    }

    #[test]
    fn ambient_health_branch_chips_health() {
        let mut engine = meet_engine();
        engine.apply_ambient_danger("P1", 0.40).unwrap();
        assert_eq!(engine.state().player("P1").unwrap().health, 9);
        assert_eq!(engine.state().player("P1").unwrap().sanity(), 10);
    }

    #[test]
    fn ambient_quiet_branch_says_nothing() {
        let mut engine = meet_engine();
        engine.state_mut().drain_messages();

        engine.apply_ambient_danger("P1", 0.90).unwrap();
        assert!(engine.state_mut().drain_messages().is_empty());
        assert_eq!(engine.state().player("P1").unwrap().health, 10);
    }

    #[test]
    fn death_preempts_the_win_check() {
        let mut engine = meet_engine();
        // Both players share a room, so the win condition holds — but P2
        // is already dead, and the death scan runs first.
        engine.state_mut().player_mut("P1").unwrap().location_id = "library".to_string();
        engine.state_mut().player_mut("P2").unwrap().health = 0;
        engine.state_mut().drain_messages();

        engine.end_of_turn("P1").unwrap();
        assert!(!engine.state().is_active());
        assert_eq!(engine.state().winner(), None);
        let messages = engine.state_mut().drain_messages();
        assert!(messages.iter().any(|m| m.contains("darkness closes in")));
    }

    #[test]
    fn meet_scenario_end_to_end() {
        let mut engine = meet_engine();

        assert!(engine.process_command("P1", "move hall").unwrap());
        engine.end_of_turn("P1").unwrap();
        assert!(engine.state().is_active());

        assert!(engine.process_command("P1", "move library").unwrap());
        engine.state_mut().drain_messages();
        engine.end_of_turn("P1").unwrap();

        assert!(!engine.state().is_active());
        assert_eq!(engine.state().winner(), Some(&Winner::Both));
        let messages = engine.state_mut().drain_messages();
        assert!(messages.iter().any(|m| m.contains("find each other")));
    }

    #[test]
    fn ended_session_ignores_commands_and_end_of_turn() {
        let mut engine = meet_engine();
        engine.state_mut().end_session(None);
        engine.state_mut().drain_messages();

        assert!(!engine.process_command("P1", "look").unwrap());
        engine.end_of_turn("P1").unwrap();
        assert!(engine.state_mut().drain_messages().is_empty());
    }
}
