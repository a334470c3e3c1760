//! Sends one email using a JSON relay configuration.
//!
//! ```text
//! cargo run -p mailpost --example send -- relay.json to@example.com "Subject" "Body" [--html] [FILE...]
//! ```
//!
//! `relay.json` holds the [`mailpost::Config`] fields, for example:
//!
//! ```json
//! {
//!   "host": "smtp.example.com",
//!   "port": 465,
//!   "username": "user@example.com",
//!   "password": "app-password",
//!   "from": "user@example.com",
//!   "use_ssl": true
//! }
//! ```

use anyhow::{Context, bail};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mailpost::{Config, Email, EmailSender};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mailpost=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut args = std::env::args().skip(1);
    let (Some(config_path), Some(to), Some(subject), Some(body)) =
        (args.next(), args.next(), args.next(), args.next())
    else {
        bail!("usage: send <relay.json> <to> <subject> <body> [--html] [FILE...]");
    };

    let config =
        Config::load(&config_path).with_context(|| format!("loading {config_path}"))?;
    let sender = EmailSender::new(config);

    let mut email = Email::new(subject, body).to(to);
    for arg in args {
        if arg == "--html" {
            email = email.html(true);
        } else {
            email = email.attach(arg);
        }
    }

    info!(host = %sender.config().host, "Sending");
    sender.send(&email).context("sending email")?;
    info!("Done");

    Ok(())
}
