//! Delivery seam between the sender and the SMTP library.
//!
//! [`EmailSender`](crate::EmailSender) never talks to the network itself: it
//! hands an [`OutgoingMessage`] to a [`Dialer`]. [`SmtpDialer`] is the real
//! one; tests plug in a recording double.

mod smtp;

pub use smtp::SmtpDialer;

use std::io;
use std::path::PathBuf;

use crate::config::Config;
use crate::message::OutgoingMessage;

/// Errors raised while delivering a message.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// An address could not be parsed.
    #[error("Invalid email address: {0}")]
    Address(#[from] lettre::address::AddressError),

    /// The message could not be assembled.
    #[error("Message build error: {0}")]
    Message(#[from] lettre::error::Error),

    /// A content type could not be parsed.
    #[error("Invalid content type: {0}")]
    ContentType(String),

    /// An attachment could not be read.
    #[error("Cannot read attachment {}: {source}", path.display())]
    Attachment {
        /// Attachment path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// A root certificate file could not be read.
    #[error("Cannot read certificate {}: {source}", path.display())]
    Certificate {
        /// Certificate path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// Connection, TLS, authentication or server error.
    #[error(transparent)]
    Smtp(#[from] lettre::transport::smtp::Error),

    /// Error from a custom dialer.
    #[error("{0}")]
    Other(String),
}

impl TransportError {
    /// Returns true if the server rejected the message permanently (5xx).
    #[must_use]
    pub fn is_permanent(&self) -> bool {
        matches!(self, Self::Smtp(e) if e.is_permanent())
    }

    /// Returns true if the server reported a transient failure (4xx).
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Smtp(e) if e.is_transient())
    }

    /// Returns true if the connection timed out.
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Smtp(e) if e.is_timeout())
    }
}

/// Opens a connection to the relay and delivers one message.
///
/// Implementations must be synchronous and must not keep connections
/// between calls.
pub trait Dialer {
    /// Delivers `message` using the relay settings in `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the message cannot be built or delivered.
    fn dial_and_send(
        &self,
        config: &Config,
        message: &OutgoingMessage,
    ) -> Result<(), TransportError>;
}

impl<D: Dialer + ?Sized> Dialer for &D {
    fn dial_and_send(
        &self,
        config: &Config,
        message: &OutgoingMessage,
    ) -> Result<(), TransportError> {
        (**self).dial_and_send(config, message)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_attachment_error_display() {
        let err = TransportError::Attachment {
            path: PathBuf::from("/tmp/missing.pdf"),
            source: io::Error::new(io::ErrorKind::NotFound, "not found"),
        };

        assert_eq!(
            err.to_string(),
            "Cannot read attachment /tmp/missing.pdf: not found"
        );
        assert!(std::error::Error::source(&err).is_some());
        assert!(!err.is_permanent());
        assert!(!err.is_transient());
        assert!(!err.is_timeout());
    }

    #[test]
    fn test_address_error_from_lettre() {
        let parse_err = "not an address"
            .parse::<lettre::message::Mailbox>()
            .unwrap_err();
        let err = TransportError::from(parse_err);

        assert!(matches!(err, TransportError::Address(_)));
        assert!(err.to_string().starts_with("Invalid email address"));
    }
}
