//! A scripted model client for exercising sessions and the controller
//! without a network.
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use super::adapter::{AdapterError, ModelClient, ModelSession, ModelSessionHandle};
use super::models::Turn;

#[derive(Default, Clone)]
pub struct ScriptedClient {
    created: Arc<AtomicUsize>,
    script: Arc<Mutex<VecDeque<Result<String, AdapterError>>>>,
    // Number of prior turns each `send` was given
    contexts: Arc<Mutex<Vec<usize>>>,
}

impl ScriptedClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the outcome of the next `send`. Unscripted calls get a
    /// canned reply.
    pub fn then(self, outcome: Result<&str, AdapterError>) -> Self {
        self.script
            .lock()
            .unwrap()
            .push_back(outcome.map(str::to_string));
        self
    }

    pub fn created(&self) -> usize {
        self.created.load(Ordering::SeqCst)
    }

    pub fn contexts(&self) -> Vec<usize> {
        self.contexts.lock().unwrap().clone()
    }
}

impl ModelClient for ScriptedClient {
    fn create(&self, _system_instruction: &str) -> ModelSessionHandle {
        self.created.fetch_add(1, Ordering::SeqCst);
        Box::new(ScriptedSession {
            client: self.clone(),
            history: Vec::new(),
        })
    }
}

struct ScriptedSession {
    client: ScriptedClient,
    history: Vec<Turn>,
}

#[async_trait]
impl ModelSession for ScriptedSession {
    async fn send(&mut self, text: &str) -> Result<String, AdapterError> {
        self.client.contexts.lock().unwrap().push(self.history.len());
        let outcome = self
            .client
            .script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| {
                Ok(format!(
                    "You asked about \"{text}\". Please consult a qualified doctor for any medical advice."
                ))
            });
        if let Ok(reply) = &outcome {
            self.history.push(Turn::user(text));
            self.history.push(Turn::assistant(reply));
        }
        outcome
    }

    fn history(&self) -> &[Turn] {
        &self.history
    }
}
