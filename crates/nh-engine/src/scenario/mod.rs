//! Scenario abstraction and its implementations.

use std::fmt;

use nh_core::{GameState, Winner};

use crate::error::ScenarioError;

/// A scenario driven by declarative JSON documents.
pub mod file;
/// The hardcoded "find each other" scenario.
pub mod meet;

pub use file::FileScenario;
pub use meet::MeetScenario;

/// A scenario: the starting configuration of a session plus its win
/// condition.
pub trait Scenario {
    /// Display name of the scenario.
    fn name(&self) -> &str;

    /// Populate the session's world and player positions and enqueue any
    /// introductory messages. Called exactly once, when the turn engine
    /// is constructed.
    fn initial_setup(&self, state: &mut GameState) -> Result<(), ScenarioError>;

    /// Evaluate the win condition against the current state. Pure: must
    /// not mutate state or enqueue messages — victory messaging belongs
    /// to the engine.
    fn check_win_condition(&self, state: &GameState) -> Option<Winner>;
}

/// Win-condition strategy, selected by a string tag in scenario data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WinMode {
    /// Both players win jointly when they share a location.
    Meet,
    /// The first player standing at the given location id wins.
    Reach(String),
    /// An unrecognized tag. Never wins.
    Unknown(String),
}

impl WinMode {
    /// Parse a mode tag such as `"meet"` or `"reach:cellar"`.
    pub fn parse(tag: &str) -> Self {
        let tag = tag.trim();
        if tag == "meet" {
            return Self::Meet;
        }
        if let Some(target) = tag.strip_prefix("reach:") {
            return Self::Reach(target.trim().to_lowercase());
        }
        Self::Unknown(tag.to_string())
    }
}

impl fmt::Display for WinMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Meet => write!(f, "meet"),
            Self::Reach(target) => write!(f, "reach:{target}"),
            Self::Unknown(tag) => write!(f, "{tag}"),
        }
    }
}

/// Joint victory when the first two players in turn order share a
/// location. `None` with fewer than two players or while either player
/// has not been placed yet.
pub(crate) fn both_players_met(state: &GameState) -> Option<Winner> {
    let order = state.turn_order();
    if order.len() < 2 {
        return None;
    }
    let a = state.player(&order[0]).ok()?;
    let b = state.player(&order[1]).ok()?;
    (!a.location_id.is_empty() && a.location_id == b.location_id).then_some(Winner::Both)
}
