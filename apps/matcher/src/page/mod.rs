//! Page coordinator — owns both document slots, the published result and the
//! in-flight flag for one session.
//!
//! Every operation here is synchronous and runs under the session's page lock.
//! Async work (file decoding, the scoring call) happens outside the lock and
//! re-enters through the revision-checked methods below.

pub mod handlers;
pub mod notices;
pub mod session;
pub mod snapshot;

use std::sync::{Mutex, MutexGuard};

use serde::Serialize;
use tracing::debug;

use crate::comparison::request::{ComparisonRequest, SlotPayload};
use crate::comparison::result::ComparisonResult;
use crate::documents::slot::{DocumentSlot, InputMode, SlotKind, UploadedFile};
use crate::documents::DocumentError;

/// What a slot mutation did beyond the slot itself. Reported back to the view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct InputEffects {
    pub result_invalidated: bool,
    /// The text surface for this slot must discard its unsaved draft.
    pub reset_text_entry: bool,
}

/// Why a comparison could not start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitBlocked {
    MissingDocuments(Vec<SlotKind>),
    AlreadyInFlight,
}

#[derive(Debug, Default)]
pub struct Page {
    cv: DocumentSlot,
    jd: DocumentSlot,
    result: Option<ComparisonResult>,
    in_flight: bool,
    /// Bumped on every slot mutation; stale comparison responses compare against it.
    revision: u64,
    /// Per-slot counterparts, so a pending upload only races its own slot.
    cv_revision: u64,
    jd_revision: u64,
}

impl Page {
    pub fn slot(&self, kind: SlotKind) -> &DocumentSlot {
        match kind {
            SlotKind::Cv => &self.cv,
            SlotKind::Jd => &self.jd,
        }
    }

    fn slot_mut(&mut self, kind: SlotKind) -> &mut DocumentSlot {
        match kind {
            SlotKind::Cv => &mut self.cv,
            SlotKind::Jd => &mut self.jd,
        }
    }

    pub fn result(&self) -> Option<&ComparisonResult> {
        self.result.as_ref()
    }

    pub fn in_flight(&self) -> bool {
        self.in_flight
    }

    pub fn slot_revision(&self, kind: SlotKind) -> u64 {
        match kind {
            SlotKind::Cv => self.cv_revision,
            SlotKind::Jd => self.jd_revision,
        }
    }

    fn invalidate(&mut self, kind: SlotKind) {
        if self.result.take().is_some() {
            debug!("Comparison result invalidated");
        }
        self.revision += 1;
        match kind {
            SlotKind::Cv => self.cv_revision += 1,
            SlotKind::Jd => self.jd_revision += 1,
        }
    }

    // ────────────────────────────────────────────────────────────────────────
    // Document input
    // ────────────────────────────────────────────────────────────────────────

    /// Text entry for a slot. Non-empty text takes the slot over (evicting any
    /// file); empty text only clears a slot that was already in text mode.
    /// The published result is invalidated on every call.
    pub fn set_text_content(&mut self, kind: SlotKind, text: &str) -> InputEffects {
        let slot = self.slot_mut(kind);
        if !text.is_empty() {
            *slot = DocumentSlot::Text {
                content: text.to_string(),
            };
        } else if slot.mode() == InputMode::Text {
            *slot = DocumentSlot::Empty;
        }
        debug!("{kind} slot text updated, mode={:?}", self.slot(kind).mode());

        self.invalidate(kind);
        InputEffects {
            result_invalidated: true,
            reset_text_entry: false,
        }
    }

    /// Stores a decoded upload. Any typed text for the slot is discarded.
    pub fn set_file_content(
        &mut self,
        kind: SlotKind,
        decoded_text: String,
        file: UploadedFile,
    ) -> Result<InputEffects, DocumentError> {
        if decoded_text.is_empty() {
            return Err(DocumentError::EmptyContent {
                file_name: file.file_name,
            });
        }

        debug!("{kind} slot now backed by {}", file.file_name);
        *self.slot_mut(kind) = DocumentSlot::File {
            file,
            content: decoded_text,
        };

        self.invalidate(kind);
        Ok(InputEffects {
            result_invalidated: true,
            reset_text_entry: true,
        })
    }

    /// Like `set_file_content`, but only applies if this slot is unchanged
    /// since `expected_revision` (from `slot_revision`) was read. Edits to the
    /// other slot do not count. Returns `Ok(None)` for a stale upload.
    pub fn set_file_content_at(
        &mut self,
        kind: SlotKind,
        expected_revision: u64,
        decoded_text: String,
        file: UploadedFile,
    ) -> Result<Option<InputEffects>, DocumentError> {
        let current = self.slot_revision(kind);
        if current != expected_revision {
            debug!(
                "Discarding stale {kind} upload {} (revision {current} != {expected_revision})",
                file.file_name
            );
            return Ok(None);
        }
        self.set_file_content(kind, decoded_text, file).map(Some)
    }

    /// Clears a file-backed slot. A no-op for any other mode.
    pub fn remove_file(&mut self, kind: SlotKind) -> InputEffects {
        let slot = self.slot_mut(kind);
        if slot.mode() != InputMode::File {
            return InputEffects::default();
        }
        *slot = DocumentSlot::Empty;
        debug!("{kind} slot file removed");

        self.invalidate(kind);
        InputEffects {
            result_invalidated: true,
            reset_text_entry: false,
        }
    }

    pub fn is_text_entry_disabled(&self, kind: SlotKind) -> bool {
        self.slot(kind).mode() == InputMode::File
    }

    pub fn is_file_entry_disabled(&self, kind: SlotKind) -> bool {
        let slot = self.slot(kind);
        slot.mode() == InputMode::Text && !slot.content().is_empty()
    }

    // ────────────────────────────────────────────────────────────────────────
    // Comparison lifecycle (driven by comparison::orchestrator)
    // ────────────────────────────────────────────────────────────────────────

    /// Checks both slots and the in-flight flag, then marks a request as
    /// outstanding and snapshots what to send.
    pub(crate) fn begin_comparison(&mut self) -> Result<(ComparisonRequest, u64), SubmitBlocked> {
        let missing: Vec<SlotKind> = SlotKind::ALL
            .into_iter()
            .filter(|kind| self.slot(*kind).is_empty())
            .collect();
        if !missing.is_empty() {
            return Err(SubmitBlocked::MissingDocuments(missing));
        }
        if self.in_flight {
            return Err(SubmitBlocked::AlreadyInFlight);
        }

        let (Some(cv), Some(jd)) = (
            SlotPayload::from_slot(&self.cv),
            SlotPayload::from_slot(&self.jd),
        ) else {
            return Err(SubmitBlocked::MissingDocuments(SlotKind::ALL.to_vec()));
        };

        self.in_flight = true;
        Ok((ComparisonRequest { cv, jd }, self.revision))
    }

    /// Clears the in-flight flag without touching the result. Used when the
    /// submit is dropped before the scoring call resolves.
    pub(crate) fn abandon_comparison(&mut self) {
        self.in_flight = false;
    }

    /// Clears the in-flight flag and applies the outcome. A successful result
    /// is published only if the slots are unchanged since `revision`; returns
    /// whether it was published. A failure always leaves the result cleared.
    pub(crate) fn finish_comparison(
        &mut self,
        revision: u64,
        outcome: Option<ComparisonResult>,
    ) -> bool {
        self.in_flight = false;
        match outcome {
            Some(result) if revision == self.revision => {
                self.result = Some(result);
                true
            }
            Some(_) => false,
            None => {
                self.result = None;
                false
            }
        }
    }
}

/// Locks a page, recovering the guard if a previous holder panicked.
pub fn lock_page(page: &Mutex<Page>) -> MutexGuard<'_, Page> {
    match page.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}
