//! Turn engine and scenarios for Nachthaus.
//!
//! Interprets player commands against the world graph and session state
//! from `nh-core`, applies ambient danger and win/loss checks at end of
//! turn, and defines the scenario abstraction with its two variants: a
//! hardcoded "meet" scenario and a scenario driven by declarative JSON
//! documents.

/// Command parsing for player input.
pub mod command;
/// The turn engine.
pub mod engine;
/// Error types for the engine and scenario loading.
pub mod error;
/// Scenario abstraction and its implementations.
pub mod scenario;

pub use command::{Command, parse_command};
pub use engine::GameEngine;
pub use error::{EngineError, EngineResult, ScenarioError};
pub use scenario::{FileScenario, MeetScenario, Scenario, WinMode};
