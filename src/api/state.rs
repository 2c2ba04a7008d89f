use std::sync::Arc;

use handlebars::Handlebars;

use crate::ai::chat::ModelClient;
use crate::api::routes::ui::templates;
use crate::api::sessions::SessionStore;
use crate::core::AppConfig;

pub struct AppState {
    pub config: AppConfig,
    // Creates a fresh model context for each new or reset session
    pub model: Arc<dyn ModelClient>,
    pub sessions: SessionStore,
    pub templates: Handlebars<'static>,
}

impl AppState {
    pub fn new(config: AppConfig, model: Arc<dyn ModelClient>) -> Self {
        Self {
            config,
            model,
            sessions: SessionStore::new(),
            templates: templates(),
        }
    }
}
