//! Error types for the engine and scenario loading.

use std::path::PathBuf;

use nh_core::CoreError;

/// Alias for `Result<T, EngineError>`.
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors surfaced by the turn engine.
///
/// Player input problems are never errors — they come back as in-band
/// messages and the session continues. An `EngineError` means the session
/// state itself is broken (an unknown player id, or a player standing in
/// a location the world graph does not contain) or scenario setup failed.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// A session-state invariant does not hold.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Scenario setup failed.
    #[error(transparent)]
    Scenario(#[from] ScenarioError),
}

/// Configuration errors raised while loading or applying a scenario.
///
/// All of these are fatal: the session never starts and no partial world
/// is constructed. Messages name the offending file, field, or id so
/// scenario authors can fix their documents.
#[derive(Debug, thiserror::Error)]
pub enum ScenarioError {
    /// A required scenario document does not exist.
    #[error("missing scenario document: {0}")]
    MissingDocument(PathBuf),

    /// A scenario document could not be read.
    #[error("failed to read {path}")]
    Io {
        /// The document path.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A scenario document is not valid JSON of the expected shape.
    #[error("failed to parse {path}")]
    Parse {
        /// The document path.
        path: PathBuf,
        /// The underlying parse error.
        #[source]
        source: serde_json::Error,
    },

    /// The rooms document declares no rooms at all.
    #[error("rooms.json: scenario defines no rooms")]
    NoRooms,

    /// A room entry is missing a non-empty `id`.
    #[error("rooms.json: room missing non-empty 'id'")]
    MissingRoomId,

    /// A room's exit references a room id that is not declared.
    #[error("rooms.json: room \"{room}\" exit points to missing room id \"{target}\"")]
    UnknownExit {
        /// The room whose exit is dangling.
        room: String,
        /// The unresolved target id.
        target: String,
    },

    /// An item entry is missing a non-empty `id`.
    #[error("items.json: item missing non-empty 'id'")]
    MissingItemId,

    /// An item entry is missing a non-empty `location`.
    #[error("items.json: item \"{0}\" missing 'location'")]
    MissingItemLocation(String),

    /// An item is placed in a room id that is not declared.
    #[error("items.json: item \"{item}\" location \"{location}\" not found among rooms")]
    UnknownItemLocation {
        /// The item with the dangling placement.
        item: String,
        /// The unresolved location id.
        location: String,
    },

    /// A configured start location is absent from the built graph.
    #[error("start location \"{location}\" for player \"{player}\" does not exist")]
    UnknownStartLocation {
        /// The player the start was configured for.
        player: String,
        /// The unresolved location id.
        location: String,
    },

    /// Setup ran against a session whose state does not match the
    /// scenario (e.g. an expected player id is missing), or world
    /// construction itself failed.
    #[error("scenario setup failed: {0}")]
    Setup(#[from] CoreError),
}
