//! Error types for mylms page glue operations.

use thiserror::Error;

/// Result type alias using the crate's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while synchronizing notification state.
///
/// None of these surface to the user. Callers log them and leave the page
/// as it was.
#[derive(Debug, Error)]
pub enum Error {
    /// The request never produced a response (network failure, aborted fetch).
    #[error("Transport error: {0}")]
    Transport(String),

    /// The server answered with a non-success status.
    #[error("Request to {url} failed with HTTP {status}")]
    HttpStatus {
        /// Status code returned by the server.
        status: u16,
        /// URL that was requested.
        url: String,
    },

    /// A notification id that was never registered on this page.
    #[error("Unknown notification item: {0}")]
    UnknownItem(usize),

    /// A DOM element the page contract requires is missing.
    #[error("Missing element: {0}")]
    MissingElement(String),

    /// A DOM call threw.
    #[error("DOM operation failed: {0}")]
    Dom(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
