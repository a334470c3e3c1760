//! # mailpost
//!
//! A small SMTP sender. Configure a relay once, then send plain-text or HTML
//! messages with optional file attachments.
//!
//! The SMTP dialogue, TLS handshake and MIME encoding are handled by
//! [`lettre`](https://docs.rs/lettre). This crate owns the configuration,
//! the recipient check and the mapping of an [`Email`] onto a transport
//! message.
//!
//! ## Quick Start
//!
//! ```ignore
//! use mailpost::{Email, EmailSender};
//!
//! fn main() -> mailpost::Result<()> {
//!     let sender = EmailSender::builder()
//!         .host("smtp.example.com")
//!         .port(465)
//!         .username("user@example.com")
//!         .password("secret")
//!         .from("user@example.com")
//!         .ssl(true)
//!         .build();
//!
//!     let email = Email::new("Hello", "<b>Hi there</b>")
//!         .to("friend@example.com")
//!         .html(true)
//!         .attach("report.pdf");
//!
//!     sender.send(&email)
//! }
//! ```
//!
//! ## Send Lifecycle
//!
//! ```text
//! Unsent ──→ Validating ──→ Sending ──→ Sent
//!                 │            │
//!                 └──→ Failed ←┘
//! ```
//!
//! A message with several recipients is delivered as one SMTP transaction:
//! it either goes out as a whole or fails as a whole.
//!
//! ## Modules
//!
//! - [`config`]: Connection settings and the sender builder
//! - [`message`]: Caller-facing [`Email`] and the assembled [`OutgoingMessage`]
//! - [`sender`]: [`EmailSender`], validation and dispatch
//! - [`transport`]: The [`Dialer`] seam and its `lettre` implementation

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

pub mod config;
mod error;
pub mod message;
pub mod sender;
pub mod transport;

pub use config::{Config, SenderBuilder, TlsSettings, TlsVersion};
pub use error::{Error, Result};
pub use message::{Body, ContentType, Email, OutgoingMessage};
pub use sender::EmailSender;
pub use transport::{Dialer, SmtpDialer, TransportError};
