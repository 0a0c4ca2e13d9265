//! Invocation surface and check configuration
//!
//! Every flag can also be supplied through its environment variable, so the
//! check can be driven from cron or a systemd unit without arguments.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use reqwest::Url;

/// Command line arguments
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Substring that must appear in the upstream body for it to count as online
    #[arg(long = "matchstring", env = "MATCH_STRING", default_value = "")]
    pub match_string: String,

    /// File holding the last known state
    #[arg(long = "statefile", env = "STATE_FILE", default_value = "/opt/donglecheck/state")]
    pub state_file: PathBuf,

    /// Upstream URL to probe
    #[arg(long = "upstream", env = "UPSTREAM_URL", default_value = "http://localhost:8081")]
    pub upstream: String,

    /// Mailgun messages endpoint
    #[arg(long, env = "MAILGUN_URL")]
    pub mailgun_url: String,

    /// Mailgun api key, sent verbatim as the basic auth credential
    #[arg(long, env = "MAILGUN_API_KEY", default_value = "", hide_env_values = true)]
    pub mailgun_api_key: String,

    /// Sender address
    #[arg(long, env = "MAILGUN_FROM", default_value = "")]
    pub mailgun_from: String,

    /// Recipient address
    #[arg(long, env = "MAILGUN_TO", default_value = "")]
    pub mailgun_to: String,

    /// Name used in alert subjects
    #[arg(long, env = "DEVICE_NAME", default_value = "GSM Dongle")]
    pub device_name: String,

    /// What to do when the alert could not be delivered
    #[arg(long, env = "ON_DISPATCH_FAILURE", value_enum, default_value_t = DispatchPolicy::Ignore)]
    pub on_dispatch_failure: DispatchPolicy,
}

/// Handling of a failed alert delivery
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum DispatchPolicy {
    /// Log and exit normally
    #[default]
    Ignore,
    /// Log and exit with a failure status
    Fail,
}

/// Relay endpoint and envelope
#[derive(Debug, Clone)]
pub struct RelayConfig {
    pub url: String,
    pub api_key: String,
    pub from: String,
    pub to: String,
}

/// Immutable configuration for one check
#[derive(Debug, Clone)]
pub struct CheckConfig {
    pub match_string: String,
    pub state_file: PathBuf,
    pub upstream_url: String,
    pub device_name: String,
    pub relay: RelayConfig,
}

impl Args {
    /// Validate the arguments and freeze them into a `CheckConfig`
    pub fn into_config(self) -> Result<CheckConfig, ConfigError> {
        validate_url("upstream", &self.upstream)?;
        validate_url("mailgun-url", &self.mailgun_url)?;

        Ok(CheckConfig {
            match_string: self.match_string,
            state_file: self.state_file,
            upstream_url: self.upstream,
            device_name: self.device_name,
            relay: RelayConfig {
                url: self.mailgun_url,
                api_key: self.mailgun_api_key,
                from: self.mailgun_from,
                to: self.mailgun_to,
            },
        })
    }
}

fn validate_url(name: &'static str, value: &str) -> Result<(), ConfigError> {
    Url::parse(value)
        .map(|_| ())
        .map_err(|e| ConfigError::InvalidUrl {
            name,
            value: value.to_string(),
            reason: e.to_string(),
        })
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid {name} url {value:?}: {reason}")]
    InvalidUrl {
        name: &'static str,
        value: String,
        reason: String,
    },
}
