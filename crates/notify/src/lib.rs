//! Lead notification dispatch
//!
//! Fire-and-forget delivery of a completed lead record to a human
//! operator. Failure here is logged by the caller, never retried, and
//! never blocks ending the call.

pub mod sms;

pub use sms::{TwilioConfig, TwilioSmsNotifier};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Notification errors
#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("Dispatch error: {0}")]
    Dispatch(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl From<reqwest::Error> for NotifyError {
    fn from(err: reqwest::Error) -> Self {
        NotifyError::Network(err.to_string())
    }
}

/// The final filled-slot record handed to the operator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadRecord {
    pub name: String,
    pub phone: String,
    pub address: String,
    pub issue: String,
    pub window: String,
    /// Raw inbound caller id, when the transport supplied one
    pub caller_id: Option<String>,
}

impl LeadRecord {
    /// Render the operator-facing summary message
    pub fn summary(&self, business_name: &str) -> String {
        format!(
            "New Lead — {business}\nName: {name}\nPhone: {phone}\nAddress: {address}\n\
             Issue: {issue}\nWindow: {window}\nCallerID: {caller_id}",
            business = business_name,
            name = self.name,
            phone = self.phone,
            address = self.address,
            issue = self.issue,
            window = self.window,
            caller_id = self.caller_id.as_deref().unwrap_or("unknown"),
        )
    }
}

/// Notification collaborator trait
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Dispatch one lead record to the operator
    async fn notify(&self, lead: &LeadRecord) -> Result<(), NotifyError>;

    /// Channel name for logging
    fn channel(&self) -> &'static str;
}

/// Log-only notifier used when SMS credentials are absent or disabled
#[derive(Debug, Clone)]
pub struct LogNotifier {
    business_name: String,
}

impl LogNotifier {
    pub fn new(business_name: impl Into<String>) -> Self {
        Self {
            business_name: business_name.into(),
        }
    }
}

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, lead: &LeadRecord) -> Result<(), NotifyError> {
        tracing::info!(
            name = %lead.name,
            phone = %lead.phone,
            "lead captured (SMS dispatch disabled)\n{}",
            lead.summary(&self.business_name)
        );
        Ok(())
    }

    fn channel(&self) -> &'static str {
        "log"
    }
}
