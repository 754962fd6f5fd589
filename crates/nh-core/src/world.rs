//! Locations and the undirected location graph.

use std::collections::BTreeSet;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::entity::Item;
use crate::error::{CoreError, CoreResult};

/// A node in the world graph; a room a player can occupy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Location {
    /// Stable lowercase key, unique within a world.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Short description shown on a first glance.
    pub description: String,
    /// Longer description shown after the room has been searched, or on
    /// an explicit look.
    pub detail_description: String,
    /// Ids of directly reachable locations. Ordered so exit listings are
    /// deterministic.
    pub neighbors: BTreeSet<String>,
    /// Items currently lying here.
    pub items: Vec<Item>,
}

impl Location {
    /// Create a location with no neighbors and no items.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        detail_description: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            detail_description: detail_description.into(),
            neighbors: BTreeSet::new(),
            items: Vec::new(),
        }
    }

    /// Record a neighboring location id. Inserting twice is a no-op.
    pub fn add_neighbor(&mut self, neighbor_id: impl Into<String>) {
        self.neighbors.insert(neighbor_id.into());
    }

    /// Put an item on the ground here.
    pub fn place_item(&mut self, item: Item) {
        self.items.push(item);
    }

    /// Move every item off the ground, transferring ownership to the
    /// caller and leaving the location empty.
    pub fn take_all_items(&mut self) -> Vec<Item> {
        std::mem::take(&mut self.items)
    }
}

/// The location graph. Owns all locations, keyed by id.
///
/// Connectivity is undirected when edges are added bidirectionally; the
/// graph itself stores per-location neighbor sets. Self-loops and repeat
/// edges are permitted but meaningless.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct World {
    locations: HashMap<String, Location>,
}

impl World {
    /// Create an empty world.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a location. Rejects a duplicate id so scenario authoring
    /// bugs surface at setup instead of silently overwriting rooms.
    pub fn add_location(&mut self, location: Location) -> CoreResult<()> {
        if self.locations.contains_key(&location.id) {
            return Err(CoreError::DuplicateLocation(location.id.clone()));
        }
        self.locations.insert(location.id.clone(), location);
        Ok(())
    }

    /// Connect two existing locations with an edge, optionally in both
    /// directions. Fails if either id is absent.
    pub fn connect(&mut self, id_a: &str, id_b: &str, bidirectional: bool) -> CoreResult<()> {
        if !self.locations.contains_key(id_b) {
            return Err(CoreError::LocationNotFound(id_b.to_string()));
        }

        self.locations
            .get_mut(id_a)
            .ok_or_else(|| CoreError::LocationNotFound(id_a.to_string()))?
            .add_neighbor(id_b);
        if bidirectional {
            self.locations
                .get_mut(id_b)
                .ok_or_else(|| CoreError::LocationNotFound(id_b.to_string()))?
                .add_neighbor(id_a);
        }
        Ok(())
    }

    /// Look up a location by id. Absence is a plain `None`, not an error;
    /// "nowhere" is a valid transient condition for callers to handle.
    pub fn get(&self, location_id: &str) -> Option<&Location> {
        self.locations.get(location_id)
    }

    /// Mutable lookup by id.
    pub fn get_mut(&mut self, location_id: &str) -> Option<&mut Location> {
        self.locations.get_mut(location_id)
    }

    /// Whether a location id is registered.
    pub fn contains(&self, location_id: &str) -> bool {
        self.locations.contains_key(location_id)
    }

    /// Number of registered locations.
    pub fn location_count(&self) -> usize {
        self.locations.len()
    }

    /// Iterate over all location ids.
    pub fn location_ids(&self) -> impl Iterator<Item = &str> {
        self.locations.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_room_world() -> World {
        let mut world = World::new();
        world
            .add_location(Location::new("foyer", "Foyer", "A cold foyer.", ""))
            .unwrap();
        world
            .add_location(Location::new("hall", "Long Hallway", "A narrow hall.", ""))
            .unwrap();
        world
    }

    #[test]
    fn add_and_get_location() {
        let world = two_room_world();
        let loc = world.get("foyer").unwrap();
        assert_eq!(loc.name, "Foyer");
        assert!(world.get("attic").is_none());
    }

    #[test]
    fn duplicate_id_rejected() {
        let mut world = two_room_world();
        let result = world.add_location(Location::new("foyer", "Another Foyer", "", ""));
        assert!(matches!(result, Err(CoreError::DuplicateLocation(id)) if id == "foyer"));
    }

    #[test]
    fn connect_bidirectional() {
        let mut world = two_room_world();
        world.connect("foyer", "hall", true).unwrap();

        assert!(world.get("foyer").unwrap().neighbors.contains("hall"));
        assert!(world.get("hall").unwrap().neighbors.contains("foyer"));
    }

    #[test]
    fn connect_one_way() {
        let mut world = two_room_world();
        world.connect("foyer", "hall", false).unwrap();

        assert!(world.get("foyer").unwrap().neighbors.contains("hall"));
        assert!(!world.get("hall").unwrap().neighbors.contains("foyer"));
    }

    #[test]
    fn connect_missing_endpoint_fails() {
        let mut world = two_room_world();
        assert!(world.connect("foyer", "attic", true).is_err());
        assert!(world.connect("attic", "foyer", true).is_err());
        // No partial edge was inserted.
        assert!(world.get("foyer").unwrap().neighbors.is_empty());
    }

    #[test]
    fn repeat_edges_collapse() {
        let mut world = two_room_world();
        world.connect("foyer", "hall", true).unwrap();
        world.connect("hall", "foyer", true).unwrap();
        assert_eq!(world.get("foyer").unwrap().neighbors.len(), 1);
        assert_eq!(world.get("hall").unwrap().neighbors.len(), 1);
    }

    #[test]
    fn take_all_items_empties_location() {
        let mut world = two_room_world();
        let foyer = world.get_mut("foyer").unwrap();
        foyer.place_item(Item::new("lantern", "Faint Lantern", ""));
        foyer.place_item(Item::new("key", "Rusty Key", ""));

        let items = foyer.take_all_items();
        assert_eq!(items.len(), 2);
        assert!(world.get("foyer").unwrap().items.is_empty());
    }
}
