use std::sync::Arc;

use crate::config::Config;
use crate::interview::store::SessionStore;
use crate::llm_client::ChatCompletions;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Chat-completion backend behind a trait so tests can script it.
    pub llm: Arc<dyn ChatCompletions>,
    /// Expiring in-process session store.
    pub sessions: SessionStore,
    pub config: Config,
}
