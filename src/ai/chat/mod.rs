pub mod adapter;
pub mod controller;
pub mod models;
pub mod session;
#[cfg(test)]
pub(crate) mod testing;

pub use adapter::{
    AdapterError, ERROR_MARKER, ModelClient, ModelSession, ModelSessionHandle,
    formatted_error_message,
};
pub use controller::{PendingExchange, SubmitError, begin, complete, submit};
pub use models::{Role, Transcript, Turn};
pub use session::{DEFAULT_DISPLAY_NAME, Phase, Session};
