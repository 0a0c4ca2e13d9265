//! Transition alerts
//!
//! Builds the email for an online/offline transition and hands it to the
//! relay. Delivery is at most once: there is no retry and no outbox.

pub mod message;
pub mod notifier;

pub use message::{AlertMessage, Transition};
pub use notifier::{DispatchError, MailgunRelay, DISPATCH_TIMEOUT};

/// Sends a single alert
#[allow(async_fn_in_trait)]
pub trait AlertDispatcher {
    async fn send(&self, message: &AlertMessage) -> Result<(), DispatchError>;
}
