//! Telephony webhook server
//!
//! Thin HTTP layer between the telephony transport and the dialogue
//! core: decode the webhook form, hand one turn to the orchestrator,
//! render the reply as TwiML. No dialogue decisions live here.

pub mod http;
pub mod state;
pub mod twiml;

use thiserror::Error;

/// Server errors
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Bind error: {0}")]
    Bind(#[from] std::io::Error),
}
