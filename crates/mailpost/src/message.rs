//! Message types.
//!
//! [`Email`] is what callers fill in. [`OutgoingMessage`] is what the sender
//! hands to a [`Dialer`](crate::Dialer) after validation.

use std::fmt;
use std::path::PathBuf;

/// An email to send.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Email {
    /// Recipient addresses. At least one is required.
    pub to: Vec<String>,
    /// CC addresses.
    pub cc: Vec<String>,
    /// BCC addresses.
    pub bcc: Vec<String>,
    /// Subject line.
    pub subject: String,
    /// Body, sent as-is.
    pub body: String,
    /// Send the body as `text/html` instead of `text/plain`.
    pub is_html: bool,
    /// Files to attach, in order. Read when the message is sent.
    pub attachments: Vec<PathBuf>,
}

impl Email {
    /// Creates a plain-text email with no recipients.
    #[must_use]
    pub fn new(subject: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            body: body.into(),
            ..Self::default()
        }
    }

    /// Adds a recipient.
    #[must_use]
    pub fn to(mut self, recipient: impl Into<String>) -> Self {
        self.to.push(recipient.into());
        self
    }

    /// Adds a CC recipient.
    #[must_use]
    pub fn cc(mut self, recipient: impl Into<String>) -> Self {
        self.cc.push(recipient.into());
        self
    }

    /// Adds a BCC recipient.
    #[must_use]
    pub fn bcc(mut self, recipient: impl Into<String>) -> Self {
        self.bcc.push(recipient.into());
        self
    }

    /// Marks the body as HTML.
    #[must_use]
    pub const fn html(mut self, is_html: bool) -> Self {
        self.is_html = is_html;
        self
    }

    /// Adds a file attachment.
    #[must_use]
    pub fn attach(mut self, path: impl Into<PathBuf>) -> Self {
        self.attachments.push(path.into());
        self
    }

    /// Returns the body content type selected by [`Email::is_html`].
    #[must_use]
    pub const fn content_type(&self) -> ContentType {
        if self.is_html {
            ContentType::TextHtml
        } else {
            ContentType::TextPlain
        }
    }
}

/// Body content type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ContentType {
    /// `text/plain`.
    #[default]
    TextPlain,
    /// `text/html`.
    TextHtml,
}

impl ContentType {
    /// Returns the MIME type string.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::TextPlain => "text/plain",
            Self::TextHtml => "text/html",
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Message body with its content type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Body {
    /// Content type.
    pub content_type: ContentType,
    /// Content, unmodified.
    pub content: String,
}

/// A validated message ready for delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMessage {
    /// Sender address.
    pub from: String,
    /// Recipient addresses (never empty).
    pub to: Vec<String>,
    /// CC addresses.
    pub cc: Vec<String>,
    /// BCC addresses.
    pub bcc: Vec<String>,
    /// Subject line.
    pub subject: String,
    /// Body.
    pub body: Body,
    /// Attachment paths, in order.
    pub attachments: Vec<PathBuf>,
}

impl OutgoingMessage {
    /// Assembles a message from the sender address and an email.
    ///
    /// Does not check recipients; [`EmailSender`](crate::EmailSender) does
    /// that before calling this.
    #[must_use]
    pub fn assemble(from: &str, email: &Email) -> Self {
        Self {
            from: from.to_string(),
            to: email.to.clone(),
            cc: email.cc.clone(),
            bcc: email.bcc.clone(),
            subject: email.subject.clone(),
            body: Body {
                content_type: email.content_type(),
                content: email.body.clone(),
            },
            attachments: email.attachments.clone(),
        }
    }

    /// Returns the total number of envelope recipients (to, cc, bcc).
    #[must_use]
    pub fn recipient_count(&self) -> usize {
        self.to.len() + self.cc.len() + self.bcc.len()
    }
}
