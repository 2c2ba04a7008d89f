//! The core models for a chat transcript.
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub enum Role {
    #[serde(rename = "user")]
    User,
    #[serde(rename = "assistant")]
    Assistant,
}

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub enum TurnStatus {
    #[serde(rename = "ok")]
    Ok,
    // The model request failed and the text describes the failure
    #[serde(rename = "error")]
    Error,
}

/// One message in the transcript. Turns are never modified after
/// they are appended.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct Turn {
    role: Role,
    text: String,
    status: TurnStatus,
}

impl Turn {
    pub fn user(text: &str) -> Self {
        Self {
            role: Role::User,
            text: text.to_string(),
            status: TurnStatus::Ok,
        }
    }

    pub fn assistant(text: &str) -> Self {
        Self {
            role: Role::Assistant,
            text: text.to_string(),
            status: TurnStatus::Ok,
        }
    }

    pub fn error(text: &str) -> Self {
        Self {
            role: Role::Assistant,
            text: text.to_string(),
            status: TurnStatus::Error,
        }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_error(&self) -> bool {
        self.status == TurnStatus::Error
    }
}

/// Append-only history of a conversation in the order it happened.
#[derive(Default, Debug)]
pub struct Transcript(Vec<Turn>);

impl Transcript {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn push(&mut self, turn: Turn) {
        self.0.push(turn)
    }

    pub fn clear(&mut self) {
        self.0.clear()
    }

    pub fn turns(&self) -> &[Turn] {
        &self.0
    }

    pub fn last(&self) -> Option<&Turn> {
        self.0.last()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Turn> {
        self.0.iter()
    }

    /// The turns the model should have seen so far. Failed exchanges
    /// (an error turn and the user turn it answers) never reach the
    /// model's context so they are skipped.
    pub fn model_context(&self) -> Vec<Turn> {
        let mut context: Vec<Turn> = Vec::with_capacity(self.0.len());
        for turn in self.0.iter() {
            if turn.is_error() {
                if context.last().is_some_and(|t| t.role() == Role::User) {
                    context.pop();
                }
                continue;
            }
            context.push(turn.clone());
        }
        context
    }
}
