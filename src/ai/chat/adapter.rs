//! The boundary between the conversation controller and a hosted
//! model. Implementations own the network details; the controller
//! only sees text in and text (or an `AdapterError`) out.
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use super::models::Turn;

/// Prefix of every transcript turn produced from an `AdapterError`.
pub const ERROR_MARKER: &str = "⚠️ AI Error:";

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AdapterError {
    #[error("Request failed: {0}")]
    Transport(String),
    #[error("Request timed out after {}s", .0.as_secs())]
    Timeout(Duration),
    #[error("Authentication failed ({status}): {message}")]
    Authentication { status: u16, message: String },
    #[error("Quota exceeded: {0}")]
    Quota(String),
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },
    #[error("Response blocked: {0}")]
    Blocked(String),
    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

/// Text shown to the user in place of a reply when the model request
/// fails.
pub fn formatted_error_message(err: &AdapterError) -> String {
    format!(
        "{ERROR_MARKER} Could not get a response. Please check your API key, network connection, and model settings.\n\nError Details: {err}"
    )
}

/// A conversational context held by the model client: the system
/// instruction plus every successful exchange so far.
#[async_trait]
pub trait ModelSession: Send {
    /// Send `text` after the accumulated context and return the reply.
    /// The context only grows when the call succeeds.
    async fn send(&mut self, text: &str) -> Result<String, AdapterError>;

    /// Prior turns that will be sent along with the next message.
    fn history(&self) -> &[Turn];
}

pub type ModelSessionHandle = Box<dyn ModelSession>;

pub trait ModelClient: Send + Sync {
    /// Start a new conversational context with an empty history.
    fn create(&self, system_instruction: &str) -> ModelSessionHandle;
}
