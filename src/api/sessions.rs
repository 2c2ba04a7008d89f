//! Live chat sessions keyed by the browser's session cookie.
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::ai::chat::{Phase, Session, SubmitError, Turn, begin, complete};
use crate::api::state::AppState;

pub const SESSION_COOKIE: &str = "spark_session";

pub type SharedSession = Arc<Mutex<Session>>;

struct Entry {
    session: SharedSession,
    last_seen: Instant,
}

#[derive(Default)]
pub struct SessionStore {
    entries: HashMap<Uuid, Entry>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a session and mark it as recently used.
    pub fn get(&mut self, id: &Uuid) -> Option<SharedSession> {
        self.entries.get_mut(id).map(|entry| {
            entry.last_seen = Instant::now();
            Arc::clone(&entry.session)
        })
    }

    /// Mark a session as used without handing it out.
    pub fn touch(&mut self, id: &Uuid) {
        if let Some(entry) = self.entries.get_mut(id) {
            entry.last_seen = Instant::now();
        }
    }

    pub fn insert(&mut self, session: Session) -> SharedSession {
        let id = session.id();
        let shared = Arc::new(Mutex::new(session));
        self.entries.insert(
            id,
            Entry {
                session: Arc::clone(&shared),
                last_seen: Instant::now(),
            },
        );
        shared
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop sessions not used for `idle` as of `now`. Sessions that
    /// are awaiting a reply, or locked by a request, are kept. Returns
    /// how many were dropped.
    pub fn evict_idle(&mut self, idle: Duration, now: Instant) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| {
            if now.saturating_duration_since(entry.last_seen) < idle {
                return true;
            }
            match entry.session.try_lock() {
                Ok(session) => session.phase() == Phase::AwaitingReply,
                Err(_) => true,
            }
        });
        before - self.entries.len()
    }
}

/// Find the session belonging to this browser or start a new one. The
/// returned jar carries the cookie for a new session.
pub fn resolve_session(
    state: &Arc<RwLock<AppState>>,
    jar: CookieJar,
) -> (CookieJar, SharedSession) {
    let existing = jar
        .get(SESSION_COOKIE)
        .and_then(|cookie| Uuid::parse_str(cookie.value()).ok());

    let mut shared_state = state.write().expect("Unable to write shared state");

    if let Some(session) = existing.and_then(|id| shared_state.sessions.get(&id)) {
        return (jar, session);
    }

    let session = Session::init(shared_state.model.as_ref());
    let id = session.id();
    let shared = shared_state.sessions.insert(session);
    tracing::info!(session_id = %id, "Started new chat session");

    let cookie = Cookie::build((SESSION_COOKIE, id.to_string()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax);

    (jar.add(cookie), shared)
}

/// Run one exchange on its own task so a client hanging up cannot
/// cancel it halfway. The session is only locked to record the user
/// turn and the reply, so it can be viewed while the model is working.
/// A session that is already mid-exchange is rejected rather than
/// queued.
pub async fn run_exchange(
    state: &Arc<RwLock<AppState>>,
    session: SharedSession,
    message: String,
) -> Result<Result<Turn, SubmitError>, tokio::task::JoinError> {
    let (id, exchange) = {
        let mut session = session.lock().await;
        (session.id(), begin(&mut session, &message))
    };
    let mut exchange = match exchange {
        Ok(exchange) => exchange,
        Err(e) => return Ok(Err(e)),
    };

    let reply = tokio::spawn(async move {
        let outcome = exchange.send().await;
        let mut session = session.lock().await;
        complete(&mut session, exchange, outcome)
    })
    .await?;

    // A long exchange counts as activity
    state
        .write()
        .expect("Unable to write shared state")
        .sessions
        .touch(&id);

    Ok(Ok(reply))
}
