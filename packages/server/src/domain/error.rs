//! Domain error types.

use thiserror::Error;

/// Errors raised while constructing value objects
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueObjectError {
    /// The identifier was empty or whitespace only
    #[error("{0} must not be empty")]
    Empty(&'static str),
}

/// Errors raised while pushing events to connections
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessagePushError {
    /// No outbound channel is registered for the connection
    #[error("Client '{0}' not found")]
    ClientNotFound(String),

    /// The outbound channel is closed
    #[error("Failed to push message: {0}")]
    PushFailed(String),

    /// The event could not be encoded as a wire frame
    #[error("Failed to encode event: {0}")]
    Encode(String),
}
