//! Twilio SMS notifier
//!
//! Posts the lead summary to the Twilio Messages REST API. The HTTP
//! client carries a bounded timeout; the orchestrator treats any error
//! as log-and-continue.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::{LeadRecord, Notifier, NotifyError};

/// Twilio dispatch configuration
#[derive(Debug, Clone)]
pub struct TwilioConfig {
    /// Account SID
    pub account_sid: String,
    /// Auth token
    pub auth_token: String,
    /// Sending number
    pub sms_from: String,
    /// Operator number receiving lead summaries
    pub sms_to: String,
    /// Business name used in the summary header
    pub business_name: String,
    /// Request timeout
    pub timeout: Duration,
    /// API base, overridable for tests
    pub api_base: String,
}

impl TwilioConfig {
    pub fn new(
        account_sid: impl Into<String>,
        auth_token: impl Into<String>,
        sms_from: impl Into<String>,
        sms_to: impl Into<String>,
        business_name: impl Into<String>,
    ) -> Self {
        Self {
            account_sid: account_sid.into(),
            auth_token: auth_token.into(),
            sms_from: sms_from.into(),
            sms_to: sms_to.into(),
            business_name: business_name.into(),
            timeout: Duration::from_secs(5),
            api_base: "https://api.twilio.com".to_string(),
        }
    }
}

/// SMS notifier over the Twilio Messages API
#[derive(Clone)]
pub struct TwilioSmsNotifier {
    client: Client,
    config: TwilioConfig,
}

impl TwilioSmsNotifier {
    /// Create a new notifier; fails on missing credentials or an
    /// unbuildable HTTP client
    pub fn new(config: TwilioConfig) -> Result<Self, NotifyError> {
        if config.account_sid.is_empty() || config.auth_token.is_empty() {
            return Err(NotifyError::Configuration(
                "Twilio credentials are empty".to_string(),
            ));
        }
        if config.sms_from.is_empty() || config.sms_to.is_empty() {
            return Err(NotifyError::Configuration(
                "SMS from/to numbers are empty".to_string(),
            ));
        }
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| NotifyError::Configuration(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    fn messages_url(&self) -> String {
        format!(
            "{}/2010-04-01/Accounts/{}/Messages.json",
            self.config.api_base.trim_end_matches('/'),
            self.config.account_sid
        )
    }
}

#[async_trait]
impl Notifier for TwilioSmsNotifier {
    async fn notify(&self, lead: &LeadRecord) -> Result<(), NotifyError> {
        let body = lead.summary(&self.config.business_name);

        let response = self
            .client
            .post(self.messages_url())
            .basic_auth(&self.config.account_sid, Some(&self.config.auth_token))
            .form(&[
                ("From", self.config.sms_from.as_str()),
                ("To", self.config.sms_to.as_str()),
                ("Body", body.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(NotifyError::Dispatch(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        tracing::info!(
            to = %self.config.sms_to,
            name = %lead.name,
            "lead summary dispatched via SMS"
        );
        Ok(())
    }

    fn channel(&self) -> &'static str {
        "sms"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> TwilioConfig {
        TwilioConfig::new("AC123", "token", "+15550001111", "+15550002222", "Mike's Plumbing")
    }

    #[test]
    fn test_messages_url() {
        let notifier = TwilioSmsNotifier::new(config()).unwrap();
        assert_eq!(
            notifier.messages_url(),
            "https://api.twilio.com/2010-04-01/Accounts/AC123/Messages.json"
        );
    }

    #[test]
    fn test_empty_credentials_rejected() {
        let bad = TwilioConfig {
            auth_token: String::new(),
            ..config()
        };
        assert!(matches!(
            TwilioSmsNotifier::new(bad),
            Err(NotifyError::Configuration(_))
        ));
    }

    #[test]
    fn test_empty_numbers_rejected() {
        let bad = TwilioConfig {
            sms_to: String::new(),
            ..config()
        };
        assert!(TwilioSmsNotifier::new(bad).is_err());
    }
}
