use std::sync::Arc;

use uuid::Uuid;

use crate::comparison::scoring_client::ScoringService;
use crate::config::Config;
use crate::documents::decoder::DocumentDecoder;
use crate::errors::AppError;
use crate::page::session::{Session, SessionStore};

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<SessionStore>,
    /// Pluggable scoring collaborator. Default: HttpScoringClient.
    pub scoring: Arc<dyn ScoringService>,
    /// Pluggable upload decoder. Default: PreviewDecoder.
    pub decoder: Arc<dyn DocumentDecoder>,
    pub config: Config,
}

impl AppState {
    pub fn session(&self, id: Uuid) -> Result<Arc<Session>, AppError> {
        self.sessions
            .get(id)
            .ok_or_else(|| AppError::NotFound(format!("Session {id} not found")))
    }
}
