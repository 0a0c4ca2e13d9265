//! donglecheck
//!
//! Runs a single check and exits. Schedule it externally, e.g. from cron.
//!
//! Configuration comes from flags or environment variables:
//! - MATCH_STRING: Substring expected in the upstream body (default: empty)
//! - STATE_FILE: Last known state file (default: /opt/donglecheck/state)
//! - UPSTREAM_URL: Endpoint to probe (default: http://localhost:8081)
//! - MAILGUN_URL, MAILGUN_API_KEY, MAILGUN_FROM, MAILGUN_TO: Alert relay
//! - DEVICE_NAME: Name used in alert subjects (default: GSM Dongle)
//! - ON_DISPATCH_FAILURE: `ignore` or `fail` (default: ignore)
//! - RUST_LOG: Log level (default: info)

use std::process::ExitCode;

use clap::Parser;
use donglecheck::check::Checker;
use donglecheck::config::{Args, DispatchPolicy};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "donglecheck=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    let policy = args.on_dispatch_failure;
    let config = args.into_config()?;

    tracing::debug!("donglecheck configuration:");
    tracing::debug!("  Upstream: {}", config.upstream_url);
    tracing::debug!("  Match string: {:?}", config.match_string);
    tracing::debug!("  State file: {}", config.state_file.display());
    tracing::debug!("  Relay: {}", config.relay.url);

    let checker = Checker::from_config(config)?;

    // A failed cycle is logged by the checker and still exits normally
    let code = match checker.run().await {
        Ok(outcome) if outcome.dispatch_failed() && policy == DispatchPolicy::Fail => {
            ExitCode::FAILURE
        }
        Ok(_) | Err(_) => ExitCode::SUCCESS,
    };

    Ok(code)
}
