//! Error types for sending operations.

use crate::transport::TransportError;

/// Result type alias for sending operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned by [`EmailSender`](crate::EmailSender).
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The message has no `To` recipients. Raised before any connection is made.
    #[error("no recipients specified")]
    NoRecipients,

    /// The dialer failed. Carries the transport error unchanged.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Configuration could not be read or parsed.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Returns true if the error was raised locally, before any transport work.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::NoRecipients)
    }

    /// Returns the underlying transport error, if any.
    #[must_use]
    pub const fn as_transport(&self) -> Option<&TransportError> {
        match self {
            Self::Transport(e) => Some(e),
            _ => None,
        }
    }
}
