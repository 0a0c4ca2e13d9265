//! donglecheck: alert on upstream online/offline transitions
//!
//! Each run reads the last known state from a file, probes an upstream HTTP
//! endpoint and decides whether it is online by looking for a match string in
//! a 200 response. When the observed state differs from the persisted one an
//! email goes out through a Mailgun-compatible relay and the new state is
//! written back.
//!
//! The crate does not schedule itself; run the binary from cron or a timer.
//!
//! # Example
//!
//! ```no_run
//! use donglecheck::check::Checker;
//! use donglecheck::config::Args;
//! use clap::Parser;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Args::parse().into_config()?;
//! let checker = Checker::from_config(config)?;
//! let outcome = checker.run().await?;
//! println!("Transition: {}", outcome.is_transition());
//! # Ok(())
//! # }
//! ```

pub mod alerts;
pub mod check;
pub mod config;
pub mod probe;
pub mod state;

#[cfg(test)]
mod testing;

// Re-export commonly used types
pub use alerts::{AlertDispatcher, AlertMessage, DispatchError, MailgunRelay, Transition};
pub use check::{CheckError, CheckOutcome, Checker};
pub use config::{Args, CheckConfig, ConfigError, DispatchPolicy, RelayConfig};
pub use probe::{HttpProber, ProbeError, ProbeResult, Prober};
pub use state::{FileStateStore, StateError, StateStore};
