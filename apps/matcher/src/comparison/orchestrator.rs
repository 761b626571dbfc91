//! Comparison orchestrator — gates, sends and resolves the single outbound
//! scoring request for a page.
//!
//! The page lock is held only to check and snapshot state, never across the
//! scoring call. At most one request is outstanding per page, and the
//! in-flight flag is cleared even if the submit future is dropped mid-call.

use std::sync::Mutex;

use tracing::{debug, error, info, warn};

use crate::comparison::result::ComparisonResult;
use crate::comparison::scoring_client::ScoringService;
use crate::documents::slot::SlotKind;
use crate::page::notices::{Notice, Notifier};
use crate::page::{lock_page, Page, SubmitBlocked};

pub const MISSING_DOCUMENTS_NOTICE: &str = "Please provide both CV and JD";
pub const SUCCESS_NOTICE: &str = "Analysis complete!";
pub const FAILURE_NOTICE: &str = "Failed to analyze documents. Please try again.";

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Result published to the page.
    Completed(ComparisonResult),
    /// A slot changed while the request was outstanding; the response was dropped.
    Stale,
    /// At least one slot is empty. No request was made.
    MissingDocuments(Vec<SlotKind>),
    /// Another comparison for this page is still outstanding. No request was made.
    AlreadyInFlight,
    /// The scoring call failed. Details were logged; the user got a generic notice.
    Failed,
}

pub async fn submit_comparison(
    page: &Mutex<Page>,
    scoring: &dyn ScoringService,
    notifier: &dyn Notifier,
) -> SubmitOutcome {
    let started = lock_page(page).begin_comparison();
    let (request, revision) = match started {
        Ok(started) => started,
        Err(SubmitBlocked::MissingDocuments(missing)) => {
            debug!("Comparison refused, missing slots: {missing:?}");
            notifier.notify(Notice::error(MISSING_DOCUMENTS_NOTICE));
            return SubmitOutcome::MissingDocuments(missing);
        }
        Err(SubmitBlocked::AlreadyInFlight) => {
            debug!("Comparison already in flight, ignoring submit");
            return SubmitOutcome::AlreadyInFlight;
        }
    };

    let mut guard = InFlightGuard { page, armed: true };

    info!(
        "Submitting comparison: fields={:?}, revision={revision}",
        request.field_names()
    );

    let scored = scoring.score(request).await;
    guard.disarm();

    match scored {
        Ok(result) => {
            let published = lock_page(page).finish_comparison(revision, Some(result.clone()));
            if !published {
                info!("Discarding comparison result: documents changed while scoring");
                return SubmitOutcome::Stale;
            }
            info!(
                "Comparison complete: score={}, matched={}, missing={}",
                result.score,
                result.matched_skills.len(),
                result.missing_skills.len()
            );
            notifier.notify(Notice::success(SUCCESS_NOTICE));
            SubmitOutcome::Completed(result)
        }
        Err(e) => {
            error!("Comparison failed: {e}");
            lock_page(page).finish_comparison(revision, None);
            notifier.notify(Notice::error(FAILURE_NOTICE));
            SubmitOutcome::Failed
        }
    }
}

/// Clears the in-flight flag if the submit is dropped while waiting on the
/// scoring service (client disconnect, session teardown, task abort).
struct InFlightGuard<'a> {
    page: &'a Mutex<Page>,
    armed: bool,
}

impl InFlightGuard<'_> {
    fn disarm(&mut self) {
        self.armed = false;
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            warn!("Comparison abandoned before the scoring service answered");
            lock_page(self.page).abandon_comparison();
        }
    }
}
