//! Integration tests for the email sender.
//!
//! These tests use a recording dialer in place of a real relay, so they can
//! check exactly what would have been handed to the SMTP library.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::path::PathBuf;
use std::sync::Mutex;

use proptest::prelude::*;

use mailpost::{
    Config, ContentType, Dialer, Email, EmailSender, Error, OutgoingMessage, TransportError,
};

/// Dialer that records every delivery attempt.
#[derive(Default)]
struct RecordingDialer {
    calls: Mutex<Vec<(Config, OutgoingMessage)>>,
}

impl RecordingDialer {
    fn calls(&self) -> Vec<(Config, OutgoingMessage)> {
        self.calls.lock().unwrap().clone()
    }
}

impl Dialer for RecordingDialer {
    fn dial_and_send(
        &self,
        config: &Config,
        message: &OutgoingMessage,
    ) -> Result<(), TransportError> {
        self.calls
            .lock()
            .unwrap()
            .push((config.clone(), message.clone()));
        Ok(())
    }
}

fn example_sender(dialer: &RecordingDialer) -> EmailSender<&RecordingDialer> {
    EmailSender::builder()
        .host("smtp.example.com")
        .port(587)
        .username("u")
        .password("p")
        .from("a@example.com")
        .dialer(dialer)
        .build()
}

#[test]
fn test_plain_text_scenario() {
    let dialer = RecordingDialer::default();
    let sender = example_sender(&dialer);

    sender
        .send(&Email::new("Hi", "hello").to("b@example.com"))
        .unwrap();

    let calls = dialer.calls();
    assert_eq!(calls.len(), 1);

    let (config, message) = &calls[0];
    assert_eq!(config.host, "smtp.example.com");
    assert_eq!(config.port, 587);
    assert_eq!(config.username, "u");
    assert_eq!(config.password, "p");
    assert!(!config.use_ssl);
    assert!(config.tls.is_none());

    assert_eq!(message.from, "a@example.com");
    assert_eq!(message.to, vec!["b@example.com"]);
    assert_eq!(message.subject, "Hi");
    assert_eq!(message.body.content, "hello");
    assert_eq!(message.body.content_type.as_str(), "text/plain");
    assert!(message.attachments.is_empty());
}

#[test]
fn test_no_recipients_scenario() {
    let dialer = RecordingDialer::default();
    let sender = example_sender(&dialer);

    let err = sender.send(&Email::new("x", "y")).unwrap_err();

    assert!(matches!(err, Error::NoRecipients));
    assert_eq!(err.to_string(), "no recipients specified");
    assert!(dialer.calls().is_empty());
}

#[test]
fn test_html_scenario() {
    let dialer = RecordingDialer::default();
    let sender = example_sender(&dialer);

    sender
        .send(&Email::new("Hi", "<b>hi</b>").to("b@example.com").html(true))
        .unwrap();

    let calls = dialer.calls();
    let (_, message) = &calls[0];
    assert_eq!(message.body.content_type.as_str(), "text/html");
    assert_eq!(message.body.content, "<b>hi</b>");
}

#[test]
fn test_multiple_recipients_single_delivery() {
    let dialer = RecordingDialer::default();
    let sender = example_sender(&dialer);

    sender
        .send(
            &Email::new("Hi", "hello")
                .to("b@example.com")
                .to("c@example.com")
                .bcc("d@example.com"),
        )
        .unwrap();

    let calls = dialer.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].1.to, vec!["b@example.com", "c@example.com"]);
    assert_eq!(calls[0].1.bcc, vec!["d@example.com"]);
}

#[test]
fn test_attachments_not_checked_before_dialing() {
    let dialer = RecordingDialer::default();
    let sender = example_sender(&dialer);

    sender
        .send(
            &Email::new("Report", "attached")
                .to("b@example.com")
                .attach("/nonexistent/report.pdf"),
        )
        .unwrap();

    assert_eq!(
        dialer.calls()[0].1.attachments,
        vec![PathBuf::from("/nonexistent/report.pdf")]
    );
}

#[test]
fn test_shared_across_threads() {
    let dialer = RecordingDialer::default();
    let sender = example_sender(&dialer);

    std::thread::scope(|s| {
        for i in 0..4 {
            let sender = &sender;
            s.spawn(move || {
                sender
                    .send(&Email::new(format!("Hi {i}"), "hello").to("b@example.com"))
                    .unwrap();
            });
        }
    });

    assert_eq!(dialer.calls().len(), 4);
}

#[test]
fn test_loaded_config_reaches_dialer() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("relay.json");
    std::fs::write(
        &path,
        r#"{"host": "smtp.example.com", "port": 465, "use_ssl": true, "from": "a@example.com"}"#,
    )
    .unwrap();

    let dialer = RecordingDialer::default();
    let sender = EmailSender::builder()
        .config(Config::load(&path).unwrap())
        .dialer(&dialer)
        .build();

    sender
        .send(&Email::new("Hi", "hello").to("b@example.com"))
        .unwrap();

    let calls = dialer.calls();
    let (config, message) = &calls[0];
    assert_eq!(config.port, 465);
    assert!(config.use_ssl);
    assert_eq!(message.from, "a@example.com");
}

fn address() -> impl Strategy<Value = String> {
    "[a-z]{1,8}@[a-z]{1,8}\\.com"
}

proptest! {
    #[test]
    fn prop_empty_recipients_never_dial(
        subject in ".*",
        body in ".*",
        is_html in any::<bool>(),
        cc in prop::collection::vec(address(), 0..3),
    ) {
        let dialer = RecordingDialer::default();
        let sender = example_sender(&dialer);
        let email = Email { subject, body, is_html, cc, ..Email::default() };

        let err = sender.send(&email).unwrap_err();

        prop_assert!(matches!(err, Error::NoRecipients));
        prop_assert!(dialer.calls().is_empty());
    }

    #[test]
    fn prop_content_type_follows_html_flag(body in ".*", is_html in any::<bool>()) {
        let dialer = RecordingDialer::default();
        let sender = example_sender(&dialer);

        sender
            .send(&Email::new("s", body.clone()).to("b@example.com").html(is_html))
            .unwrap();

        let calls = dialer.calls();
        let (_, message) = &calls[0];
        let expected = if is_html { ContentType::TextHtml } else { ContentType::TextPlain };
        prop_assert_eq!(message.body.content_type, expected);
        prop_assert_eq!(&message.body.content, &body);
    }

    #[test]
    fn prop_attachment_order_preserved(
        names in prop::collection::vec("[a-z]{1,8}\\.(txt|pdf|png)", 1..6),
    ) {
        let dialer = RecordingDialer::default();
        let sender = example_sender(&dialer);
        let email = names
            .iter()
            .fold(Email::new("s", "b").to("b@example.com"), |email, name| email.attach(name));

        sender.send(&email).unwrap();

        let expected: Vec<PathBuf> = names.iter().map(PathBuf::from).collect();
        let calls = dialer.calls();
        prop_assert_eq!(&calls[0].1.attachments, &expected);
    }

    #[test]
    fn prop_setters_last_write_wins(
        hosts in prop::collection::vec("[a-z]{1,10}\\.example\\.com", 1..5),
        port in any::<u16>(),
    ) {
        let forward = hosts
            .iter()
            .fold(EmailSender::builder(), |builder, host| builder.host(host.as_str()))
            .port(port)
            .build();
        let reversed = hosts
            .iter()
            .fold(EmailSender::builder().port(port), |builder, host| builder.host(host.as_str()))
            .build();

        prop_assert_eq!(&forward.config().host, hosts.last().unwrap());
        prop_assert_eq!(forward.config(), reversed.config());
    }
}
