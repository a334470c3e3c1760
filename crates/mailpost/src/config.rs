//! Connection configuration and the sender builder.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::sender::EmailSender;
use crate::transport::{Dialer, SmtpDialer};

/// Minimum TLS protocol version accepted from the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TlsVersion {
    /// TLS 1.0. Rejected by the rustls backend at send time.
    Tls10,
    /// TLS 1.1. Rejected by the rustls backend at send time.
    Tls11,
    /// TLS 1.2.
    #[default]
    Tls12,
    /// TLS 1.3.
    Tls13,
}

impl TlsVersion {
    /// Get display name for the version.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Tls10 => "TLS 1.0",
            Self::Tls11 => "TLS 1.1",
            Self::Tls12 => "TLS 1.2",
            Self::Tls13 => "TLS 1.3",
        }
    }
}

/// TLS parameters for the relay connection.
///
/// Used for implicit TLS when [`Config::use_ssl`] is set, and for the
/// STARTTLS upgrade otherwise.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TlsSettings {
    /// Name to verify the server certificate against. Defaults to the host.
    pub server_name: Option<String>,
    /// Minimum protocol version.
    pub min_version: TlsVersion,
    /// Skip certificate verification. **Never enable against a real relay.**
    pub accept_invalid_certs: bool,
    /// Extra PEM root certificates, read when a message is sent.
    pub root_certificates: Vec<PathBuf>,
}

impl TlsSettings {
    /// Creates settings with library defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the name used for certificate verification.
    #[must_use]
    pub fn server_name(mut self, name: impl Into<String>) -> Self {
        self.server_name = Some(name.into());
        self
    }

    /// Sets the minimum protocol version.
    #[must_use]
    pub const fn min_version(mut self, version: TlsVersion) -> Self {
        self.min_version = version;
        self
    }

    /// Disables certificate verification.
    #[must_use]
    pub const fn accept_invalid_certs(mut self, accept: bool) -> Self {
        self.accept_invalid_certs = accept;
        self
    }

    /// Adds a PEM root certificate file to the trust store.
    #[must_use]
    pub fn root_certificate(mut self, path: impl Into<PathBuf>) -> Self {
        self.root_certificates.push(path.into());
        self
    }
}

/// SMTP relay configuration.
///
/// Nothing here is validated. An empty host or a zero port is accepted and
/// surfaces as a transport error when a message is sent.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Relay hostname.
    pub host: String,
    /// Relay port.
    pub port: u16,
    /// Username for authentication. Authentication is skipped when empty.
    pub username: String,
    /// Password for authentication.
    pub password: String,
    /// Sender address used for the `From` header and the envelope.
    pub from: String,
    /// TLS parameters. `None` uses library defaults.
    pub tls: Option<TlsSettings>,
    /// Connect with implicit TLS (usually port 465) instead of STARTTLS.
    pub use_ssl: bool,
    /// Name announced in EHLO. Defaults to the local hostname.
    pub local_name: Option<String>,
    /// Network timeout. Defaults to the transport's own timeout.
    #[serde(with = "duration_secs")]
    pub timeout: Option<Duration>,
}

impl Config {
    /// Parses a configuration from JSON. Missing fields take zero values.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the JSON is malformed.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::Config(e.to_string()))
    }

    /// Loads a JSON configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("{}: {e}", path.display())))?;
        Self::from_json(&json)
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("from", &self.from)
            .field("tls", &self.tls)
            .field("use_ssl", &self.use_ssl)
            .field("local_name", &self.local_name)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Serde helpers for the timeout, stored as whole seconds.
mod duration_secs {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    #[allow(clippy::ref_option)] // Required by serde with= signature
    pub fn serialize<S>(value: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(d) => serializer.serialize_some(&d.as_secs()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Option::<u64>::deserialize(deserializer)?.map(Duration::from_secs))
    }
}

/// Builder for [`EmailSender`].
///
/// Setters are applied in call order and each overwrites a single field, so
/// calling the same setter twice keeps the last value. Unset fields keep
/// their zero value.
#[derive(Debug, Clone)]
pub struct SenderBuilder<D = SmtpDialer> {
    config: Config,
    dialer: D,
}

impl SenderBuilder {
    /// Creates a builder with an empty configuration and the SMTP dialer.
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: Config::default(),
            dialer: SmtpDialer::new(),
        }
    }
}

impl Default for SenderBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: Dialer> SenderBuilder<D> {
    /// Replaces every field with a loaded configuration.
    #[must_use]
    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Sets the relay hostname.
    #[must_use]
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.config.host = host.into();
        self
    }

    /// Sets the relay port.
    #[must_use]
    pub const fn port(mut self, port: u16) -> Self {
        self.config.port = port;
        self
    }

    /// Sets the authentication username.
    #[must_use]
    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.config.username = username.into();
        self
    }

    /// Sets the authentication password.
    #[must_use]
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.config.password = password.into();
        self
    }

    /// Sets the sender address.
    #[must_use]
    pub fn from(mut self, from: impl Into<String>) -> Self {
        self.config.from = from.into();
        self
    }

    /// Sets the TLS parameters.
    #[must_use]
    pub fn tls(mut self, tls: TlsSettings) -> Self {
        self.config.tls = Some(tls);
        self
    }

    /// Enables or disables implicit TLS.
    #[must_use]
    pub const fn ssl(mut self, use_ssl: bool) -> Self {
        self.config.use_ssl = use_ssl;
        self
    }

    /// Sets the name announced in EHLO.
    #[must_use]
    pub fn local_name(mut self, name: impl Into<String>) -> Self {
        self.config.local_name = Some(name.into());
        self
    }

    /// Sets the network timeout.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = Some(timeout);
        self
    }

    /// Replaces the dialer used to deliver messages.
    #[must_use]
    pub fn dialer<E: Dialer>(self, dialer: E) -> SenderBuilder<E> {
        SenderBuilder {
            config: self.config,
            dialer,
        }
    }

    /// Builds the sender. Never fails; settings are checked by the relay.
    #[must_use]
    pub fn build(self) -> EmailSender<D> {
        EmailSender::with_dialer(self.config, self.dialer)
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::redundant_clone,
    clippy::manual_string_new
)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let sender = SenderBuilder::new().build();
        let config = sender.config();

        assert_eq!(config.host, "");
        assert_eq!(config.port, 0);
        assert_eq!(config.username, "");
        assert_eq!(config.password, "");
        assert_eq!(config.from, "");
        assert!(config.tls.is_none());
        assert!(!config.use_ssl);
        assert!(config.local_name.is_none());
        assert!(config.timeout.is_none());
    }

    #[test]
    fn test_builder_sets_fields() {
        let sender = SenderBuilder::new()
            .host("smtp.example.com")
            .port(587)
            .username("u")
            .password("p")
            .from("a@example.com")
            .tls(TlsSettings::new().min_version(TlsVersion::Tls13))
            .ssl(true)
            .local_name("client.example.com")
            .timeout(Duration::from_secs(10))
            .build();
        let config = sender.config();

        assert_eq!(config.host, "smtp.example.com");
        assert_eq!(config.port, 587);
        assert_eq!(config.username, "u");
        assert_eq!(config.password, "p");
        assert_eq!(config.from, "a@example.com");
        assert_eq!(
            config.tls.as_ref().map(|t| t.min_version),
            Some(TlsVersion::Tls13)
        );
        assert!(config.use_ssl);
        assert_eq!(config.local_name.as_deref(), Some("client.example.com"));
        assert_eq!(config.timeout, Some(Duration::from_secs(10)));
    }

    #[test]
    fn test_builder_last_write_wins() {
        let sender = SenderBuilder::new()
            .host("first.example.com")
            .port(25)
            .host("second.example.com")
            .build();

        assert_eq!(sender.config().host, "second.example.com");
        assert_eq!(sender.config().port, 25);
    }

    #[test]
    fn test_builder_config_replaces_fields() {
        let loaded = Config {
            host: "smtp.example.com".into(),
            port: 465,
            ..Config::default()
        };
        let sender = SenderBuilder::new()
            .host("ignored.example.com")
            .config(loaded)
            .from("a@example.com")
            .build();

        assert_eq!(sender.config().host, "smtp.example.com");
        assert_eq!(sender.config().port, 465);
        assert_eq!(sender.config().from, "a@example.com");
    }

    #[test]
    fn test_debug_redacts_password() {
        let config = Config {
            password: "hunter2".into(),
            ..Config::default()
        };
        let debug = format!("{config:?}");

        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn test_from_json() {
        let config = Config::from_json(
            r#"{
                "host": "smtp.example.com",
                "port": 465,
                "from": "a@example.com",
                "use_ssl": true,
                "timeout": 30,
                "tls": { "min_version": "tls13", "root_certificates": ["ca.pem"] }
            }"#,
        )
        .unwrap();

        assert_eq!(config.host, "smtp.example.com");
        assert_eq!(config.port, 465);
        assert_eq!(config.username, "");
        assert!(config.use_ssl);
        assert_eq!(config.timeout, Some(Duration::from_secs(30)));

        let tls = config.tls.unwrap();
        assert_eq!(tls.min_version, TlsVersion::Tls13);
        assert!(!tls.accept_invalid_certs);
        assert_eq!(tls.root_certificates, vec![PathBuf::from("ca.pem")]);
    }

    #[test]
    fn test_from_json_empty_object() {
        let config = Config::from_json("{}").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_from_json_malformed() {
        let err = Config::from_json("{ host: ").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_json_roundtrip_keeps_timeout() {
        let config = Config {
            host: "smtp.example.com".into(),
            timeout: Some(Duration::from_secs(5)),
            ..Config::default()
        };
        let json = serde_json::to_string(&config).unwrap();

        assert_eq!(Config::from_json(&json).unwrap(), config);
    }

    #[test]
    fn test_load_missing_file() {
        let err = Config::load("/nonexistent/mailpost.json").unwrap_err();
        assert!(matches!(err, Error::Config(msg) if msg.contains("/nonexistent/mailpost.json")));
    }

    #[test]
    fn test_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mailpost.json");
        std::fs::write(&path, r#"{"host": "smtp.example.com", "port": 587}"#).unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.host, "smtp.example.com");
        assert_eq!(config.port, 587);
    }

    #[test]
    fn test_tls_version_display_name() {
        assert_eq!(TlsVersion::default(), TlsVersion::Tls12);
        assert_eq!(TlsVersion::Tls13.display_name(), "TLS 1.3");
    }
}
