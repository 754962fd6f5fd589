//! Item and player records.

use serde::{Deserialize, Serialize};

/// The sanity ceiling. Sanity is clamped to `[0, MAX_SANITY]` by every
/// mutator; health has no ceiling and death is `health <= 0`.
pub const MAX_SANITY: i32 = 10;

/// Starting value for both health and sanity.
const START_STAT: i32 = 10;

/// An item that can sit in a location or a player's inventory.
///
/// Items are immutable once created. Ownership is exclusive: an item lives
/// in exactly one collection at a time, and transfers move it rather than
/// copy it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// Stable lowercase key.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Flavor description.
    pub description: String,
    /// Capability markers such as `"light"`, `"potion"`, `"clarity"`.
    pub tags: Vec<String>,
}

impl Item {
    /// Create an item with no tags.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            tags: Vec::new(),
        }
    }

    /// Add a capability tag.
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    /// Check whether the item carries a capability tag.
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

/// A player in the session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Stable player id, e.g. `"P1"`.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Id of the location the player currently occupies. Empty until a
    /// scenario has placed the player.
    pub location_id: String,
    /// Hit points. Unclamped; `<= 0` means death.
    pub health: i32,
    /// Mental state, always within `[0, MAX_SANITY]`.
    sanity: i32,
    /// Carried items, in pickup order.
    pub inventory: Vec<Item>,
}

impl Player {
    /// Create a player with full health and sanity and no location.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            location_id: String::new(),
            health: START_STAT,
            sanity: START_STAT,
            inventory: Vec::new(),
        }
    }

    /// Current sanity.
    pub fn sanity(&self) -> i32 {
        self.sanity
    }

    /// Shift sanity by a delta, clamped to `[0, MAX_SANITY]`.
    pub fn adjust_sanity(&mut self, delta: i32) {
        self.sanity = (self.sanity + delta).clamp(0, MAX_SANITY);
    }

    /// Set sanity directly, clamped to `[0, MAX_SANITY]`.
    pub fn set_sanity(&mut self, value: i32) {
        self.sanity = value.clamp(0, MAX_SANITY);
    }

    /// Shift health by a delta. Health has no ceiling or floor.
    pub fn adjust_health(&mut self, delta: i32) {
        self.health += delta;
    }

    /// Whether the player has died.
    pub fn is_dead(&self) -> bool {
        self.health <= 0
    }

    /// Move items into the inventory, preserving their order.
    pub fn take_items(&mut self, items: Vec<Item>) {
        self.inventory.extend(items);
    }

    /// Find a carried item by exact id or by substring of its name, both
    /// case-insensitive. Returns the index of the first match in pickup
    /// order.
    pub fn find_item(&self, target: &str) -> Option<usize> {
        let target = target.to_lowercase();
        self.inventory.iter().position(|item| {
            item.id.to_lowercase() == target || item.name.to_lowercase().contains(&target)
        })
    }

    /// Remove the item at `index` from the inventory, transferring
    /// ownership to the caller.
    pub fn remove_item(&mut self, index: usize) -> Item {
        self.inventory.remove(index)
    }
}
