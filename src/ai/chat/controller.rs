//! Drives one exchange at a time for a session:
//!
//! `Idle --begin--> AwaitingReply --complete--> Idle`
//!
//! Model failures never escape an exchange. They are written to the
//! transcript as an error turn and the session stays usable.
//!
//! `begin` and `complete` only touch the session briefly. The model
//! call in between works on a handle taken out of the session, so a
//! shared session can be read while the reply is pending.
use thiserror::Error;

use super::adapter::{AdapterError, ModelSessionHandle, formatted_error_message};
use super::models::Turn;
use super::session::{Phase, Session};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SubmitError {
    #[error("Message is empty")]
    EmptyMessage,
    #[error("Still waiting for a reply to the previous message")]
    Busy,
}

/// A user message that is in the transcript and waiting on the model.
pub struct PendingExchange {
    epoch: u64,
    text: String,
    model_session: ModelSessionHandle,
}

impl PendingExchange {
    /// Ask the model for a reply. The future must be driven to
    /// completion and its outcome handed to `complete`.
    pub async fn send(&mut self) -> Result<String, AdapterError> {
        self.model_session.send(&self.text).await
    }
}

/// Append `text` as a user turn and move the session to
/// `AwaitingReply`.
pub fn begin(session: &mut Session, text: &str) -> Result<PendingExchange, SubmitError> {
    if session.phase == Phase::AwaitingReply {
        return Err(SubmitError::Busy);
    }
    let text = text.trim();
    if text.is_empty() {
        return Err(SubmitError::EmptyMessage);
    }
    let Some(model_session) = session.model_session.take() else {
        return Err(SubmitError::Busy);
    };

    session.transcript.push(Turn::user(text));
    session.phase = Phase::AwaitingReply;
    tracing::debug!(session_id = %session.id(), "Waiting for model reply");

    Ok(PendingExchange {
        epoch: session.epoch,
        text: text.to_string(),
        model_session,
    })
}

/// Record the model's reply (or an error turn) and return the session
/// to `Idle`. Returns the assistant turn. If the session was reset
/// while waiting the turn is not recorded.
pub fn complete(
    session: &mut Session,
    exchange: PendingExchange,
    outcome: Result<String, AdapterError>,
) -> Turn {
    let reply = match outcome {
        Ok(reply) => Turn::assistant(&reply),
        Err(e) => {
            tracing::error!(session_id = %session.id(), "Model request failed: {}", e);
            Turn::error(&formatted_error_message(&e))
        }
    };

    if exchange.epoch != session.epoch {
        tracing::info!(session_id = %session.id(), "Dropping reply to a conversation that was reset");
        return reply;
    }

    session.model_session = Some(exchange.model_session);
    session.transcript.push(reply.clone());
    session.phase = Phase::Idle;

    verify_context(session);

    reply
}

/// Run a whole exchange on a session the caller holds exclusively.
pub async fn submit(session: &mut Session, text: &str) -> Result<Turn, SubmitError> {
    let mut exchange = begin(session, text)?;
    let outcome = exchange.send().await;
    Ok(complete(session, exchange, outcome))
}

fn verify_context(session: &Session) {
    let expected = session.transcript.model_context();
    let actual = session.model_history();
    if expected.as_slice() != actual {
        tracing::warn!(
            session_id = %session.id(),
            expected = expected.len(),
            actual = actual.len(),
            "Model context diverged from the transcript"
        );
    }
}
