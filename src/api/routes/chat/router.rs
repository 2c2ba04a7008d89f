//! Router for the chat API

use std::sync::{Arc, RwLock};

use axum::{
    Json, Router,
    extract::State,
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use axum_extra::extract::cookie::CookieJar;

use super::public;
use crate::api::sessions::{resolve_session, run_exchange};
use crate::api::state::AppState;

type SharedState = Arc<RwLock<AppState>>;

/// Get the caller's session, starting one if needed
async fn session_view(
    State(state): State<SharedState>,
    jar: CookieJar,
) -> (CookieJar, Json<public::SessionResponse>) {
    let (jar, session) = resolve_session(&state, jar);
    let session = session.lock().await;
    (jar, Json(public::SessionResponse::from(&*session)))
}

/// Send a message and wait for the reply. Model failures still return
/// 200 with an error turn as the reply.
async fn chat_handler(
    State(state): State<SharedState>,
    jar: CookieJar,
    Json(payload): Json<public::ChatRequest>,
) -> Result<Response, crate::api::public::ApiError> {
    let (jar, session) = resolve_session(&state, jar);

    let resp = match run_exchange(&state, session, payload.message).await? {
        Ok(reply) => (jar, Json(public::ChatResponse { reply })).into_response(),
        Err(e) => (jar, e).into_response(),
    };

    Ok(resp)
}

/// Clear the transcript and start a fresh model context
async fn reset_handler(
    State(state): State<SharedState>,
    jar: CookieJar,
) -> (CookieJar, Json<public::SessionResponse>) {
    let (jar, session) = resolve_session(&state, jar);
    let model = Arc::clone(&state.read().expect("Unable to read share state").model);

    let mut session = session.lock().await;
    session.reset(model.as_ref());
    (jar, Json(public::SessionResponse::from(&*session)))
}

async fn rename_handler(
    State(state): State<SharedState>,
    jar: CookieJar,
    Json(payload): Json<public::RenameRequest>,
) -> (CookieJar, Json<public::SessionResponse>) {
    let (jar, session) = resolve_session(&state, jar);

    let mut session = session.lock().await;
    session.rename(&payload.name);
    (jar, Json(public::SessionResponse::from(&*session)))
}

/// Create the chat router
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/chat", post(chat_handler))
        .route("/session", get(session_view))
        .route("/session/reset", post(reset_handler))
        .route("/session/name", put(rename_handler))
}
