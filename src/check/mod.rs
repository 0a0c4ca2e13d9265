//! The check cycle
//!
//! Reads the persisted state, probes the upstream and, when the two differ,
//! sends one alert and persists the observed state. Runs once per invocation;
//! repetition is left to whatever schedules the process.

use crate::alerts::{AlertDispatcher, AlertMessage, DispatchError, MailgunRelay, Transition};
use crate::config::CheckConfig;
use crate::probe::{HttpProber, ProbeError, Prober};
use crate::state::{FileStateStore, StateError, StateStore};

/// Result of a completed check
#[derive(Debug)]
pub enum CheckOutcome {
    /// Upstream matches the persisted state; nothing was sent or written
    Unchanged { state: bool },
    /// Upstream changed; an alert was attempted and the new state written
    Transitioned {
        transition: Transition,
        message: AlertMessage,
        dispatch: Result<(), DispatchError>,
        persist: Result<(), StateError>,
    },
}

impl CheckOutcome {
    pub fn is_transition(&self) -> bool {
        matches!(self, CheckOutcome::Transitioned { .. })
    }

    pub fn dispatch_failed(&self) -> bool {
        matches!(
            self,
            CheckOutcome::Transitioned {
                dispatch: Err(_),
                ..
            }
        )
    }

    pub fn persist_failed(&self) -> bool {
        matches!(
            self,
            CheckOutcome::Transitioned {
                persist: Err(_),
                ..
            }
        )
    }
}

/// Runs check cycles against injected collaborators
pub struct Checker<S, P, D> {
    config: CheckConfig,
    store: S,
    prober: P,
    dispatcher: D,
}

impl Checker<FileStateStore, HttpProber, MailgunRelay> {
    /// Wire the file store, HTTP prober and mail relay from configuration
    pub fn from_config(config: CheckConfig) -> Result<Self, CheckError> {
        let store = FileStateStore::new(&config.state_file);
        let prober = HttpProber::new()?;
        let dispatcher = MailgunRelay::new(config.relay.clone())?;

        Ok(Self::new(config, store, prober, dispatcher))
    }
}

impl<S, P, D> Checker<S, P, D>
where
    S: StateStore,
    P: Prober,
    D: AlertDispatcher,
{
    pub fn new(config: CheckConfig, store: S, prober: P, dispatcher: D) -> Self {
        Self {
            config,
            store,
            prober,
            dispatcher,
        }
    }

    pub fn config(&self) -> &CheckConfig {
        &self.config
    }

    /// Run one check cycle
    pub async fn run(&self) -> Result<CheckOutcome, CheckError> {
        let last_known = match self.store.read() {
            Ok(state) => state,
            Err(e) => {
                tracing::error!(error = %e, "Cannot read last known state, skipping check");
                return Err(CheckError::StateUnavailable(e));
            }
        };
        tracing::info!(state = last_known, "Last known state");

        let probe = self
            .prober
            .probe(&self.config.upstream_url, &self.config.match_string)
            .await;
        if let Some(e) = &probe.error {
            tracing::warn!(error = %e, "Probe failed, treating upstream as offline");
        }
        tracing::info!(state = probe.matched, "Upstream state");

        let Some(transition) = Transition::between(last_known, probe.matched) else {
            tracing::info!("Not sending alert");
            return Ok(CheckOutcome::Unchanged { state: last_known });
        };

        tracing::info!(?transition, "Sending alert");
        let message = AlertMessage::for_transition(transition, &self.config.device_name, probe.text());

        let dispatch = self.dispatcher.send(&message).await;
        if let Err(e) = &dispatch {
            tracing::error!(error = %e, subject = %message.subject, "Failed to send alert");
        }

        // Persist regardless of delivery so a lost alert is not re-sent every cycle
        let persist = self.store.write(transition.target());
        if let Err(e) = &persist {
            tracing::error!(error = %e, "Failed to persist new state");
        }

        Ok(CheckOutcome::Transitioned {
            transition,
            message,
            dispatch,
            persist,
        })
    }
}

/// Check errors
#[derive(Debug, thiserror::Error)]
pub enum CheckError {
    #[error("{0}")]
    StateUnavailable(StateError),

    #[error("Probe setup failed: {0}")]
    Probe(#[from] ProbeError),

    #[error("Dispatcher setup failed: {0}")]
    Dispatch(#[from] DispatchError),
}
