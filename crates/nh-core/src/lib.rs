//! Core types for Nachthaus: world graph, entities, and game state.
//!
//! This crate defines the data model the turn engine operates on. It is
//! independent of any scenario format — you can construct a [`World`]
//! programmatically or let a scenario build one from declarative files.

/// Item and player records.
pub mod entity;
/// Error types used throughout the crate.
pub mod error;
/// Mutable session state: players, turn order, messages.
pub mod state;
/// Locations and the undirected location graph.
pub mod world;

/// Re-export entity types.
pub use entity::{Item, MAX_SANITY, Player};
/// Re-export error types.
pub use error::{CoreError, CoreResult};
/// Re-export session state types.
pub use state::{GameState, Winner};
/// Re-export world graph types.
pub use world::{Location, World};
