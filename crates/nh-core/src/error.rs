//! Error types used throughout the crate.

/// Alias for `Result<T, CoreError>`.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur when manipulating the world or session state.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// The requested location id does not exist in the world graph.
    #[error("location not found: \"{0}\"")]
    LocationNotFound(String),

    /// A location with the same id is already registered.
    #[error("location already exists: \"{0}\"")]
    DuplicateLocation(String),

    /// The requested player id does not exist in the session.
    #[error("player not found: \"{0}\"")]
    PlayerNotFound(String),
}
