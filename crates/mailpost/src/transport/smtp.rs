//! `lettre`-backed dialer.

use std::path::Path;

use lettre::message::header::ContentType as HeaderContentType;
use lettre::message::{Attachment, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::transport::smtp::client::{Certificate, Tls, TlsParameters};
use lettre::transport::smtp::extension::ClientId;
use lettre::{Message, SmtpTransport, Transport};
use tracing::debug;

use super::{Dialer, TransportError};
use crate::config::{Config, TlsVersion};
use crate::message::{ContentType, OutgoingMessage};

/// Delivers messages over SMTP with `lettre`.
///
/// Each call opens a fresh connection and closes it when done.
#[derive(Debug, Clone, Copy, Default)]
pub struct SmtpDialer;

impl SmtpDialer {
    /// Creates a dialer.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Builds the MIME message for `message`, reading attachments from disk.
    ///
    /// # Errors
    ///
    /// Returns an error if an address does not parse or an attachment
    /// cannot be read.
    pub fn build_message(message: &OutgoingMessage) -> Result<Message, TransportError> {
        let mut builder = Message::builder()
            .from(message.from.parse::<Mailbox>()?)
            .subject(message.subject.as_str());

        for addr in &message.to {
            builder = builder.to(addr.parse::<Mailbox>()?);
        }
        for addr in &message.cc {
            builder = builder.cc(addr.parse::<Mailbox>()?);
        }
        for addr in &message.bcc {
            builder = builder.bcc(addr.parse::<Mailbox>()?);
        }

        let body = SinglePart::builder()
            .header(header_content_type(message.body.content_type))
            .body(message.body.content.clone());

        if message.attachments.is_empty() {
            return Ok(builder.singlepart(body)?);
        }

        let mut parts = MultiPart::mixed().singlepart(body);
        for path in &message.attachments {
            parts = parts.singlepart(attachment(path)?);
        }

        Ok(builder.multipart(parts)?)
    }

    /// Builds a transport for the relay described by `config`.
    fn build_transport(config: &Config) -> Result<SmtpTransport, TransportError> {
        let tls = tls_parameters(config)?;

        let mut builder = SmtpTransport::builder_dangerous(config.host.as_str())
            .port(config.port)
            .tls(if config.use_ssl {
                Tls::Wrapper(tls)
            } else {
                Tls::Opportunistic(tls)
            });

        if !config.username.is_empty() {
            builder = builder.credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ));
        }
        if let Some(name) = &config.local_name {
            builder = builder.hello_name(ClientId::Domain(name.clone()));
        }
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(Some(timeout));
        }

        Ok(builder.build())
    }
}

impl Dialer for SmtpDialer {
    fn dial_and_send(
        &self,
        config: &Config,
        message: &OutgoingMessage,
    ) -> Result<(), TransportError> {
        let email = Self::build_message(message)?;
        let transport = Self::build_transport(config)?;

        debug!(
            host = %config.host,
            port = config.port,
            ssl = config.use_ssl,
            "Dialing SMTP relay"
        );

        let response = transport.send(&email)?;
        debug!(code = %response.code(), "Relay accepted message");

        Ok(())
    }
}

/// Maps the body content type onto a UTF-8 header value.
fn header_content_type(content_type: ContentType) -> HeaderContentType {
    match content_type {
        ContentType::TextPlain => HeaderContentType::TEXT_PLAIN,
        ContentType::TextHtml => HeaderContentType::TEXT_HTML,
    }
}

/// Reads one attachment and wraps it in a MIME part.
fn attachment(path: &Path) -> Result<SinglePart, TransportError> {
    let content = std::fs::read(path).map_err(|source| TransportError::Attachment {
        path: path.to_path_buf(),
        source,
    })?;

    let filename = path
        .file_name()
        .map_or_else(|| "attachment".to_string(), |n| n.to_string_lossy().into_owned());

    let mime = mime_guess::from_path(path).first_or_octet_stream();
    let content_type = HeaderContentType::parse(mime.as_ref())
        .map_err(|e| TransportError::ContentType(format!("{mime}: {e}")))?;

    Ok(Attachment::new(filename).body(content, content_type))
}

/// Builds TLS parameters, reading any extra root certificates.
fn tls_parameters(config: &Config) -> Result<TlsParameters, TransportError> {
    let Some(settings) = &config.tls else {
        return Ok(TlsParameters::new(config.host.clone())?);
    };

    let domain = settings
        .server_name
        .clone()
        .unwrap_or_else(|| config.host.clone());

    let mut builder = TlsParameters::builder(domain)
        .set_min_tls_version(min_tls_version(settings.min_version))
        .dangerous_accept_invalid_certs(settings.accept_invalid_certs);

    for path in &settings.root_certificates {
        let pem = std::fs::read(path).map_err(|source| TransportError::Certificate {
            path: path.clone(),
            source,
        })?;
        builder = builder.add_root_certificate(Certificate::from_pem(&pem)?);
    }

    Ok(builder.build()?)
}

const fn min_tls_version(version: TlsVersion) -> lettre::transport::smtp::client::TlsVersion {
    use lettre::transport::smtp::client::TlsVersion as Lettre;

    match version {
        TlsVersion::Tls10 => Lettre::Tlsv10,
        TlsVersion::Tls11 => Lettre::Tlsv11,
        TlsVersion::Tls12 => Lettre::Tlsv12,
        TlsVersion::Tls13 => Lettre::Tlsv13,
    }
}
