//! Public types for the chat API
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::ai::chat::{Phase, Session, Turn};

#[derive(Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

#[derive(Serialize, Deserialize)]
pub struct ChatResponse {
    pub reply: Turn,
}

#[derive(Deserialize)]
pub struct RenameRequest {
    pub name: String,
}

#[derive(Serialize)]
pub struct SessionResponse {
    pub id: Uuid,
    pub display_name: String,
    pub phase: Phase,
    pub transcript: Vec<Turn>,
}

impl From<&Session> for SessionResponse {
    fn from(session: &Session) -> Self {
        Self {
            id: session.id(),
            display_name: session.display_name().to_string(),
            phase: session.phase(),
            transcript: session.transcript().turns().to_vec(),
        }
    }
}
