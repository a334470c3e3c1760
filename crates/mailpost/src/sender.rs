//! The email sender.

use tracing::{debug, info, warn};

use crate::config::{Config, SenderBuilder};
use crate::error::{Error, Result};
use crate::message::{Email, OutgoingMessage};
use crate::transport::{Dialer, SmtpDialer};

/// Sends emails through one configured relay.
///
/// Holds no connection between calls, so one sender can be reused for any
/// number of messages and shared across threads by reference.
#[derive(Debug, Clone)]
pub struct EmailSender<D = SmtpDialer> {
    config: Config,
    dialer: D,
}

impl EmailSender {
    /// Creates a builder with an empty configuration.
    #[must_use]
    pub fn builder() -> SenderBuilder {
        SenderBuilder::new()
    }

    /// Creates a sender from a loaded configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self::with_dialer(config, SmtpDialer::new())
    }
}

impl<D: Dialer> EmailSender<D> {
    /// Creates a sender that delivers through `dialer`.
    #[must_use]
    pub const fn with_dialer(config: Config, dialer: D) -> Self {
        Self { config, dialer }
    }

    /// Returns the relay configuration.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Returns the dialer.
    #[must_use]
    pub const fn dialer(&self) -> &D {
        &self.dialer
    }

    /// Validates and delivers one email.
    ///
    /// Blocks until the relay accepts or rejects the message.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoRecipients`] if `email.to` is empty, without
    /// contacting the relay. Any delivery failure is returned as
    /// [`Error::Transport`] unchanged.
    pub fn send(&self, email: &Email) -> Result<()> {
        if email.to.is_empty() {
            warn!(subject = %email.subject, "Rejecting email without recipients");
            return Err(Error::NoRecipients);
        }

        let message = OutgoingMessage::assemble(&self.config.from, email);

        debug!(
            recipients = message.recipient_count(),
            attachments = message.attachments.len(),
            content_type = %message.body.content_type,
            "Sending email"
        );

        if let Err(e) = self.dialer.dial_and_send(&self.config, &message) {
            warn!(?e, host = %self.config.host, "Email delivery failed");
            return Err(e.into());
        }

        info!(recipients = message.recipient_count(), "Email sent");
        Ok(())
    }
}
