//! Router for the server-rendered chat page. Every form post redirects
//! back to the page so it is redrawn from the updated session.

use std::sync::{Arc, RwLock};

use axum::{
    Form, Router,
    extract::State,
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
};
use axum_extra::extract::cookie::CookieJar;
use http::StatusCode;
use serde::Deserialize;

use super::templates::render_chat_page;
use crate::ai::chat::SubmitError;
use crate::api::sessions::{resolve_session, run_exchange};
use crate::api::state::AppState;

type SharedState = Arc<RwLock<AppState>>;

#[derive(Deserialize)]
pub struct MessageForm {
    pub message: String,
}

#[derive(Deserialize)]
pub struct NameForm {
    pub name: String,
}

async fn chat_page(
    State(state): State<SharedState>,
    jar: CookieJar,
) -> Result<Response, crate::api::public::ApiError> {
    let (jar, session) = resolve_session(&state, jar);
    let session = session.lock().await;

    let html = {
        let shared_state = state.read().expect("Unable to read share state");
        render_chat_page(&shared_state.templates, &session)?
    };

    Ok((jar, Html(html)).into_response())
}

async fn submit_message(
    State(state): State<SharedState>,
    jar: CookieJar,
    Form(form): Form<MessageForm>,
) -> Result<Response, crate::api::public::ApiError> {
    let (jar, session) = resolve_session(&state, jar);

    let resp = match run_exchange(&state, session, form.message).await? {
        // Blank input is ignored like an empty chat box
        Ok(_) | Err(SubmitError::EmptyMessage) => (jar, Redirect::to("/")).into_response(),
        Err(SubmitError::Busy) => (
            StatusCode::CONFLICT,
            jar,
            Html("<p>SPARK is still thinking about your last message. <a href=\"/\">Back to the chat</a></p>"),
        )
            .into_response(),
    };

    Ok(resp)
}

async fn clear_history(State(state): State<SharedState>, jar: CookieJar) -> impl IntoResponse {
    let (jar, session) = resolve_session(&state, jar);
    let model = Arc::clone(&state.read().expect("Unable to read share state").model);

    session.lock().await.reset(model.as_ref());
    (jar, Redirect::to("/"))
}

async fn set_name(
    State(state): State<SharedState>,
    jar: CookieJar,
    Form(form): Form<NameForm>,
) -> impl IntoResponse {
    let (jar, session) = resolve_session(&state, jar);

    session.lock().await.rename(&form.name);
    (jar, Redirect::to("/"))
}

/// Create the chat page router
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/", get(chat_page))
        .route("/chat", post(submit_message))
        .route("/reset", post(clear_history))
        .route("/settings/name", post(set_name))
}
