pub mod routes;
mod server;
pub use server::{app, init_tracing, serve};
pub mod public;
pub mod sessions;
mod state;
pub use state::AppState;

use std::sync::{Arc, RwLock};

pub type SharedState = Arc<RwLock<AppState>>;
