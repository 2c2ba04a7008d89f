//! API routes module

pub mod chat;
pub mod ui;

use std::sync::{Arc, RwLock};

use crate::api::state::AppState;
use axum::Router;

type SharedState = Arc<RwLock<AppState>>;

/// Create the combined JSON API router
pub fn router() -> Router<SharedState> {
    Router::new()
        // Chat and session routes
        .merge(chat::router())
}
