//! Application context: the session and collaborators every flow runs against.

use crate::prompt::Prompter;
use crate::services::{AccountService, ConfigService, HttpBackend, ModelCatalogService};
use crate::session::Session;
use std::sync::Arc;

pub struct AppContext {
    pub session: Session,
    pub account: Arc<dyn AccountService>,
    pub config: Arc<dyn ConfigService>,
    pub catalog: Arc<dyn ModelCatalogService>,
    pub prompter: Arc<dyn Prompter>,
}

impl AppContext {
    pub fn new(
        account: Arc<dyn AccountService>,
        config: Arc<dyn ConfigService>,
        catalog: Arc<dyn ModelCatalogService>,
        prompter: Arc<dyn Prompter>,
    ) -> Self {
        Self {
            session: Session::new(Arc::clone(&account)),
            account,
            config,
            catalog,
            prompter,
        }
    }

    /// Context where one HTTP backend serves every collaborator.
    pub fn with_backend(backend: Arc<HttpBackend>, prompter: Arc<dyn Prompter>) -> Self {
        Self::new(backend.clone(), backend.clone(), backend, prompter)
    }

    /// Print a line through the prompter.
    pub fn say(&self, text: impl AsRef<str>) {
        self.prompter.message(text.as_ref());
    }
}
