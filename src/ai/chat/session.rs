use serde::Serialize;
use uuid::Uuid;

use super::adapter::{ModelClient, ModelSessionHandle};
use super::models::{Transcript, Turn};
use crate::ai::prompt::SYSTEM_INSTRUCTION;

pub const DEFAULT_DISPLAY_NAME: &str = "Guest";

#[derive(Clone, Copy, Serialize, Debug, PartialEq, Eq)]
pub enum Phase {
    #[serde(rename = "idle")]
    Idle,
    #[serde(rename = "awaiting_reply")]
    AwaitingReply,
}

/// Everything one user's conversation needs: who they are, what was
/// said, and the model context it was said to.
pub struct Session {
    id: Uuid,
    display_name: String,
    pub(super) transcript: Transcript,
    // Taken out while an exchange is waiting on the model
    pub(super) model_session: Option<ModelSessionHandle>,
    pub(super) phase: Phase,
    // Bumped on reset so a reply to a discarded conversation is dropped
    pub(super) epoch: u64,
}

impl Session {
    pub fn init(client: &dyn ModelClient) -> Self {
        Self {
            id: Uuid::new_v4(),
            display_name: DEFAULT_DISPLAY_NAME.to_string(),
            transcript: Transcript::new(),
            model_session: Some(client.create(SYSTEM_INSTRUCTION)),
            phase: Phase::Idle,
            epoch: 0,
        }
    }

    /// Clear the transcript and swap in a fresh model context so
    /// nothing said before the reset reaches the model again. A reply
    /// still in flight is discarded when it arrives.
    pub fn reset(&mut self, client: &dyn ModelClient) {
        self.transcript.clear();
        self.model_session = Some(client.create(SYSTEM_INSTRUCTION));
        self.phase = Phase::Idle;
        self.epoch += 1;
        tracing::info!(session_id = %self.id, "Session reset");
    }

    pub fn rename(&mut self, new_name: &str) {
        let new_name = new_name.trim();
        self.display_name = if new_name.is_empty() {
            DEFAULT_DISPLAY_NAME.to_string()
        } else {
            new_name.to_string()
        };
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Turns the model will be sent with the next message. Empty while
    /// an exchange is in flight.
    pub fn model_history(&self) -> &[Turn] {
        self.model_session
            .as_deref()
            .map(|model| model.history())
            .unwrap_or(&[])
    }
}
