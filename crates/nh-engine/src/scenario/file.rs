//! A scenario driven by declarative JSON documents.
//!
//! A scenario directory holds two documents:
//!
//! - `rooms.json` — scenario metadata (display name, win mode, per-player
//!   start rooms, intro text) plus the room graph.
//! - `items.json` — item definitions and their placement.
//!
//! Everything is parsed and validated up front: a missing document, a
//! malformed root, a room without an id, or any dangling id reference
//! aborts the load before a world is built. Room and item ids are
//! lowercase-normalized so lookups stay stable regardless of how authors
//! capitalize them.

use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use nh_core::{GameState, Item, Location, Winner, World};

use super::{Scenario, WinMode, both_players_met};
use crate::error::ScenarioError;

/// File name of the rooms document within a scenario directory.
pub const ROOMS_FILE: &str = "rooms.json";
/// File name of the items document within a scenario directory.
pub const ITEMS_FILE: &str = "items.json";

/// The rooms document: scenario metadata plus room definitions.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RoomsDoc {
    /// Scenario metadata. All fields optional.
    #[serde(default)]
    pub scenario: ScenarioMeta,
    /// Room definitions, in author order.
    #[serde(default)]
    pub rooms: Vec<RoomDef>,
}

/// The `scenario` sub-mapping of the rooms document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioMeta {
    /// Display name. Falls back to the directory name when loaded from
    /// disk, or a placeholder otherwise.
    #[serde(default)]
    pub name: String,
    /// Win-mode tag, e.g. `"meet"` or `"reach:cellar"`.
    #[serde(default = "default_mode")]
    pub mode: String,
    /// Starting room id per player id.
    #[serde(default)]
    pub starts: BTreeMap<String, String>,
    /// Introductory flavor text.
    #[serde(default)]
    pub intro: String,
}

impl Default for ScenarioMeta {
    fn default() -> Self {
        Self {
            name: String::new(),
            mode: default_mode(),
            starts: BTreeMap::new(),
            intro: String::new(),
        }
    }
}

fn default_mode() -> String {
    "meet".to_string()
}

/// One room definition.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RoomDef {
    /// Required non-empty room id.
    #[serde(default)]
    pub id: String,
    /// Display name. Defaults to the id.
    #[serde(default)]
    pub name: String,
    /// Short description shown on a glance.
    #[serde(default)]
    pub description: String,
    /// Longer description shown after a search or on an explicit look.
    #[serde(default)]
    pub detail_description: String,
    /// Exit label → destination room id. Every exit becomes a
    /// bidirectional edge.
    #[serde(default)]
    pub exits: BTreeMap<String, String>,
}

/// The items document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ItemsDoc {
    /// Item definitions, in author order.
    #[serde(default)]
    pub items: Vec<ItemDef>,
}

/// One item definition.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ItemDef {
    /// Required non-empty item id.
    #[serde(default)]
    pub id: String,
    /// Display name. Defaults to the id.
    #[serde(default)]
    pub name: String,
    /// Flavor description.
    #[serde(default)]
    pub description: String,
    /// Capability tags.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Required room id the item starts in.
    #[serde(default)]
    pub location: String,
}

/// Scenario configuration derived from the rooms document. Built once at
/// load; never mutated.
#[derive(Debug, Clone)]
struct ScenarioConfig {
    name: String,
    mode: WinMode,
    starts: BTreeMap<String, String>,
    intro: String,
}

/// A scenario built from `rooms.json` and `items.json`.
///
/// The world graph is constructed and fully validated at load time;
/// [`Scenario::initial_setup`] only copies it into the session and places
/// the players.
#[derive(Debug, Clone)]
pub struct FileScenario {
    config: ScenarioConfig,
    world: World,
    /// First declared room id, the start fallback for players the
    /// `starts` mapping does not cover.
    first_room: Option<String>,
}

impl FileScenario {
    /// Load a scenario from a directory containing `rooms.json` and
    /// `items.json`.
    pub fn from_dir(dir: &Path) -> Result<Self, ScenarioError> {
        let rooms: RoomsDoc = read_doc(&dir.join(ROOMS_FILE))?;
        let items: ItemsDoc = read_doc(&dir.join(ITEMS_FILE))?;

        let mut scenario = Self::from_docs(rooms, items)?;
        if scenario.config.name.is_empty() {
            if let Some(dir_name) = dir.file_name() {
                scenario.config.name = dir_name.to_string_lossy().into_owned();
            }
        }
        Ok(scenario)
    }

    /// Build a scenario from already-parsed documents.
    pub fn from_docs(rooms: RoomsDoc, items: ItemsDoc) -> Result<Self, ScenarioError> {
        let mut world = World::new();
        let mut first_room = None;

        for room in &rooms.rooms {
            let id = room.id.trim().to_lowercase();
            if id.is_empty() {
                return Err(ScenarioError::MissingRoomId);
            }
            if first_room.is_none() {
                first_room = Some(id.clone());
            }
            let name = if room.name.is_empty() {
                id.clone()
            } else {
                room.name.clone()
            };
            world.add_location(Location::new(
                id,
                name,
                room.description.clone(),
                room.detail_description.clone(),
            ))?;
        }

        // Connect exits. Each exit is a bidirectional edge; an edge
        // already inserted in either direction is not inserted twice.
        let mut connected: HashSet<(String, String)> = HashSet::new();
        for room in &rooms.rooms {
            let id = room.id.trim().to_lowercase();
            for dest in room.exits.values() {
                let dest = dest.trim().to_lowercase();
                if dest.is_empty() {
                    continue;
                }
                if !world.contains(&dest) {
                    return Err(ScenarioError::UnknownExit {
                        room: id,
                        target: dest,
                    });
                }
                let edge = if id <= dest {
                    (id.clone(), dest.clone())
                } else {
                    (dest.clone(), id.clone())
                };
                if !connected.insert(edge) {
                    continue;
                }
                world.connect(&id, &dest, true)?;
            }
        }

        for def in &items.items {
            let item_id = def.id.trim().to_lowercase();
            if item_id.is_empty() {
                return Err(ScenarioError::MissingItemId);
            }
            let location = def.location.trim().to_lowercase();
            if location.is_empty() {
                return Err(ScenarioError::MissingItemLocation(item_id));
            }
            let name = if def.name.is_empty() {
                item_id.clone()
            } else {
                def.name.clone()
            };
            let mut item = Item::new(item_id.clone(), name, def.description.clone());
            item.tags = def.tags.clone();
            world
                .get_mut(&location)
                .ok_or(ScenarioError::UnknownItemLocation { item: item_id, location })?
                .place_item(item);
        }

        // Normalize and validate configured starts against the built graph.
        let mut starts = BTreeMap::new();
        for (player, start) in &rooms.scenario.starts {
            let start = start.trim().to_lowercase();
            if !world.contains(&start) {
                return Err(ScenarioError::UnknownStartLocation {
                    player: player.clone(),
                    location: start,
                });
            }
            starts.insert(player.clone(), start);
        }

        let config = ScenarioConfig {
            name: rooms.scenario.name.trim().to_string(),
            mode: WinMode::parse(&rooms.scenario.mode),
            starts,
            intro: rooms.scenario.intro.trim_end().to_string(),
        };

        Ok(Self {
            config,
            world,
            first_room,
        })
    }

    /// The parsed win mode.
    pub fn mode(&self) -> &WinMode {
        &self.config.mode
    }
}

impl Scenario for FileScenario {
    fn name(&self) -> &str {
        if self.config.name.is_empty() {
            "Unnamed Scenario"
        } else {
            &self.config.name
        }
    }

    fn initial_setup(&self, state: &mut GameState) -> Result<(), ScenarioError> {
        state.world = self.world.clone();

        for player_id in state.turn_order().to_vec() {
            let start = self
                .config
                .starts
                .get(&player_id)
                .or(self.first_room.as_ref())
                .cloned()
                .ok_or(ScenarioError::NoRooms)?;
            if !state.world.contains(&start) {
                return Err(ScenarioError::UnknownStartLocation {
                    player: player_id,
                    location: start,
                });
            }
            state.player_mut(&player_id)?.location_id = start;
        }

        if !self.config.intro.is_empty() {
            state.push_message(self.config.intro.clone());
        }
        match &self.config.mode {
            WinMode::Meet => {
                state.push_message("Find each other before the darkness finds you.");
            }
            other => state.push_message(format!("Scenario mode: {other}")),
        }
        Ok(())
    }

    fn check_win_condition(&self, state: &GameState) -> Option<Winner> {
        match &self.config.mode {
            WinMode::Meet => both_players_met(state),
            WinMode::Reach(target) => state
                .players()
                .find(|p| p.location_id == *target)
                .map(|p| Winner::Player(p.id.clone())),
            WinMode::Unknown(_) => None,
        }
    }
}

fn read_doc<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, ScenarioError> {
    if !path.exists() {
        return Err(ScenarioError::MissingDocument(path.to_path_buf()));
    }
    let text = fs::read_to_string(path).map_err(|source| ScenarioError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| ScenarioError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
