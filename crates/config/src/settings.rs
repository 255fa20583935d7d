//! Main settings module

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::domain::DomainPrompts;
use crate::ConfigError;

/// Runtime environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RuntimeEnvironment {
    /// Development mode - relaxed validation
    #[default]
    Development,
    /// Staging mode
    Staging,
    /// Production mode - all validations enforced
    Production,
}

impl RuntimeEnvironment {
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

/// Reply composer strategy selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ComposerStrategy {
    /// Canned prompt text only, no generative collaborator
    Scripted,
    /// Generative collaborator with scripted fallback
    #[default]
    Assisted,
}

/// Main application settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    /// Runtime environment (development, staging, production)
    #[serde(default)]
    pub environment: RuntimeEnvironment,

    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Reply composer strategy
    #[serde(default)]
    pub composer: ComposerStrategy,

    /// Generative-text collaborator configuration
    #[serde(default)]
    pub llm: LlmSettings,

    /// Notification collaborator configuration
    #[serde(default)]
    pub notify: NotifySettings,

    /// Session lifecycle configuration
    #[serde(default)]
    pub session: SessionSettings,

    /// Spoken prompt text and collaborator system instruction
    #[serde(default)]
    pub prompts: DomainPrompts,

    /// Observability configuration
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// HTTP server host
    #[serde(default = "default_host")]
    pub host: String,

    /// HTTP server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Spoken-voice name passed through to the telephony transport
    #[serde(default = "default_voice")]
    pub voice: String,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_voice() -> String {
    "Polly.Joanna".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            voice: default_voice(),
        }
    }
}

/// Generative-text collaborator settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmSettings {
    /// API endpoint (OpenAI-compatible chat completions)
    #[serde(default = "default_llm_endpoint")]
    pub endpoint: String,

    /// Model name
    #[serde(default = "default_llm_model")]
    pub model: String,

    /// API key; falls back to OPENAI_API_KEY
    #[serde(default = "default_llm_api_key")]
    pub api_key: Option<String>,

    /// Maximum tokens to generate
    #[serde(default = "default_max_tokens")]
    pub max_tokens: usize,

    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Request timeout in seconds; a hung collaborator must never
    /// leave the caller in prolonged silence
    #[serde(default = "default_llm_timeout")]
    pub timeout_seconds: u64,
}

fn default_llm_endpoint() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_llm_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_llm_api_key() -> Option<String> {
    std::env::var("OPENAI_API_KEY").ok().filter(|k| !k.is_empty())
}

fn default_max_tokens() -> usize {
    256
}

fn default_temperature() -> f32 {
    0.4
}

fn default_llm_timeout() -> u64 {
    5
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            endpoint: default_llm_endpoint(),
            model: default_llm_model(),
            api_key: default_llm_api_key(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            timeout_seconds: default_llm_timeout(),
        }
    }
}

/// Notification collaborator (SMS) settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotifySettings {
    /// Enable SMS dispatch (false = log-only notifier)
    #[serde(default)]
    pub enabled: bool,

    /// Twilio account SID; falls back to TWILIO_ACCOUNT_SID
    #[serde(default = "default_account_sid")]
    pub account_sid: Option<String>,

    /// Twilio auth token; falls back to TWILIO_AUTH_TOKEN
    #[serde(default = "default_auth_token")]
    pub auth_token: Option<String>,

    /// Sending number; falls back to TWILIO_SMS_FROM
    #[serde(default = "default_sms_from")]
    pub sms_from: Option<String>,

    /// Operator number receiving lead summaries; falls back to OWNER_MOBILE
    #[serde(default = "default_owner_mobile")]
    pub owner_mobile: Option<String>,

    /// Dispatch timeout in seconds; failure never blocks ending the call
    #[serde(default = "default_notify_timeout")]
    pub timeout_seconds: u64,
}

fn default_account_sid() -> Option<String> {
    std::env::var("TWILIO_ACCOUNT_SID").ok().filter(|v| !v.is_empty())
}

fn default_auth_token() -> Option<String> {
    std::env::var("TWILIO_AUTH_TOKEN").ok().filter(|v| !v.is_empty())
}

fn default_sms_from() -> Option<String> {
    std::env::var("TWILIO_SMS_FROM").ok().filter(|v| !v.is_empty())
}

fn default_owner_mobile() -> Option<String> {
    std::env::var("OWNER_MOBILE").ok().filter(|v| !v.is_empty())
}

fn default_notify_timeout() -> u64 {
    5
}

impl Default for NotifySettings {
    fn default() -> Self {
        Self {
            enabled: false,
            account_sid: default_account_sid(),
            auth_token: default_auth_token(),
            sms_from: default_sms_from(),
            owner_mobile: default_owner_mobile(),
            timeout_seconds: default_notify_timeout(),
        }
    }
}

impl NotifySettings {
    /// True when every credential needed for real SMS dispatch is present
    pub fn has_credentials(&self) -> bool {
        self.account_sid.is_some()
            && self.auth_token.is_some()
            && self.sms_from.is_some()
            && self.owner_mobile.is_some()
    }
}

/// Session lifecycle settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSettings {
    /// Sessions idle longer than this are evicted by the sweeper
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_seconds: u64,

    /// How often the sweeper runs
    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_seconds: u64,
}

fn default_idle_timeout() -> u64 {
    15 * 60
}

fn default_sweep_interval() -> u64 {
    60
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            idle_timeout_seconds: default_idle_timeout(),
            sweep_interval_seconds: default_sweep_interval(),
        }
    }
}

/// Observability configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Log level filter when RUST_LOG is unset
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Emit JSON-formatted logs
    #[serde(default)]
    pub log_json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_json: false,
        }
    }
}

impl Settings {
    /// Create default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate settings
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.llm.timeout_seconds == 0 {
            return Err(ConfigError::InvalidValue {
                field: "llm.timeout_seconds".to_string(),
                message: "collaborator timeout must be bounded and non-zero".to_string(),
            });
        }
        if self.session.idle_timeout_seconds == 0 {
            return Err(ConfigError::InvalidValue {
                field: "session.idle_timeout_seconds".to_string(),
                message: "idle eviction must be finite".to_string(),
            });
        }
        Ok(())
    }
}

/// Load settings from files and environment variables
///
/// Priority: env vars > config/{env}.yaml > config/default.yaml > defaults
pub fn load_settings(env: Option<&str>) -> Result<Settings, ConfigError> {
    let mut builder = Config::builder();

    builder = builder.add_source(File::with_name("config/default").required(false));

    if let Some(env_name) = env {
        builder =
            builder.add_source(File::with_name(&format!("config/{}", env_name)).required(false));
    }

    builder = builder.add_source(
        Environment::with_prefix("FRONTDESK")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder.build()?;
    let settings: Settings = config.try_deserialize()?;

    settings.validate()?;

    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.server.port, 8080);
        assert_eq!(settings.composer, ComposerStrategy::Assisted);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let mut settings = Settings::default();
        settings.llm.timeout_seconds = 0;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_zero_idle_eviction_rejected() {
        let mut settings = Settings::default();
        settings.session.idle_timeout_seconds = 0;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_notify_credentials() {
        let settings = NotifySettings {
            enabled: true,
            account_sid: Some("AC123".to_string()),
            auth_token: Some("token".to_string()),
            sms_from: Some("+15550001111".to_string()),
            owner_mobile: Some("+15550002222".to_string()),
            timeout_seconds: 5,
        };
        assert!(settings.has_credentials());

        let settings = NotifySettings {
            owner_mobile: None,
            ..settings
        };
        assert!(!settings.has_credentials());
    }
}
