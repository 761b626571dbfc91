use serde::Serialize;

use crate::comparison::result::MatchScoreView;
use crate::documents::slot::{InputMode, SlotKind};
use crate::page::Page;

const SUBMIT_LABEL_IDLE: &str = "Compare Documents";
const SUBMIT_LABEL_BUSY: &str = "Analyzing...";

#[derive(Debug, Clone, Serialize)]
pub struct SlotSnapshot {
    pub mode: InputMode,
    pub content: String,
    pub file_name: Option<String>,
    pub text_entry_disabled: bool,
    pub file_entry_disabled: bool,
}

impl SlotSnapshot {
    pub fn of(page: &Page, kind: SlotKind) -> Self {
        let slot = page.slot(kind);
        Self {
            mode: slot.mode(),
            content: slot.content().to_string(),
            file_name: slot.file().map(|f| f.file_name.clone()),
            text_entry_disabled: page.is_text_entry_disabled(kind),
            file_entry_disabled: page.is_file_entry_disabled(kind),
        }
    }
}

/// Everything the page shell needs to render.
#[derive(Debug, Clone, Serialize)]
pub struct PageSnapshot {
    pub cv: SlotSnapshot,
    pub jd: SlotSnapshot,
    pub in_flight: bool,
    pub submit_label: &'static str,
    pub result: Option<MatchScoreView>,
}

impl From<&Page> for PageSnapshot {
    fn from(page: &Page) -> Self {
        Self {
            cv: SlotSnapshot::of(page, SlotKind::Cv),
            jd: SlotSnapshot::of(page, SlotKind::Jd),
            in_flight: page.in_flight(),
            submit_label: if page.in_flight() {
                SUBMIT_LABEL_BUSY
            } else {
                SUBMIT_LABEL_IDLE
            },
            result: page.result().map(MatchScoreView::from),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::documents::slot::UploadedFile;

    #[test]
    fn test_snapshot_reflects_slots() {
        let mut page = Page::default();
        page.set_file_content(
            SlotKind::Cv,
            "Go, Docker".to_string(),
            UploadedFile::new("cv.pdf", b"%PDF".to_vec()).unwrap(),
        )
        .unwrap();
        page.set_text_content(SlotKind::Jd, "Go");

        let snapshot = PageSnapshot::from(&page);
        assert_eq!(snapshot.cv.mode, InputMode::File);
        assert_eq!(snapshot.cv.file_name.as_deref(), Some("cv.pdf"));
        assert!(snapshot.cv.text_entry_disabled);
        assert_eq!(snapshot.jd.mode, InputMode::Text);
        assert!(snapshot.jd.file_entry_disabled);
        assert!(snapshot.jd.file_name.is_none());
        assert_eq!(snapshot.submit_label, "Compare Documents");
        assert!(snapshot.result.is_none());
    }

    #[test]
    fn test_submit_label_while_in_flight() {
        let mut page = Page::default();
        page.set_text_content(SlotKind::Cv, "a");
        page.set_text_content(SlotKind::Jd, "b");
        page.begin_comparison().unwrap();

        let snapshot = PageSnapshot::from(&page);
        assert!(snapshot.in_flight);
        assert_eq!(snapshot.submit_label, "Analyzing...");
    }
}
