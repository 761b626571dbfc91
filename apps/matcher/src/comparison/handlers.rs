//! Axum route handlers for the Comparison API.

use axum::{extract::State, Json};
use serde::Serialize;
use uuid::Uuid;

use crate::comparison::orchestrator::{submit_comparison, SubmitOutcome, MISSING_DOCUMENTS_NOTICE};
use crate::comparison::result::MatchScoreView;
use crate::errors::AppError;
use crate::extract::Path;
use crate::page::lock_page;
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CompareStatus {
    Completed,
    Stale,
}

#[derive(Debug, Serialize)]
pub struct CompareResponse {
    pub status: CompareStatus,
    pub result: Option<MatchScoreView>,
}

/// POST /api/v1/sessions/:id/compare
///
/// Runs one comparison for the session's page. A `stale` status means the
/// documents changed while scoring and the response was dropped.
pub async fn handle_compare(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<CompareResponse>, AppError> {
    let session = state.session(id)?;

    match submit_comparison(&session.page, state.scoring.as_ref(), &session.notices).await {
        SubmitOutcome::Completed(result) => Ok(Json(CompareResponse {
            status: CompareStatus::Completed,
            result: Some(MatchScoreView::from(&result)),
        })),
        SubmitOutcome::Stale => Ok(Json(CompareResponse {
            status: CompareStatus::Stale,
            result: None,
        })),
        SubmitOutcome::MissingDocuments(_) => {
            Err(AppError::Validation(MISSING_DOCUMENTS_NOTICE.to_string()))
        }
        SubmitOutcome::AlreadyInFlight => Err(AppError::Conflict(
            "A comparison is already in progress".to_string(),
        )),
        SubmitOutcome::Failed => Err(AppError::Upstream(format!(
            "comparison for session {id} failed"
        ))),
    }
}

/// GET /api/v1/sessions/:id/result
pub async fn handle_get_result(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<MatchScoreView>, AppError> {
    let session = state.session(id)?;
    let page = lock_page(&session.page);
    page.result()
        .map(|result| Json(MatchScoreView::from(result)))
        .ok_or_else(|| AppError::NotFound("No comparison result".to_string()))
}
