//! Outbound comparison payload — one entry per slot, either typed text or the raw file.

use reqwest::multipart::{Form, Part};

use crate::documents::slot::{DocumentSlot, SlotKind, UploadedFile};

/// What a single slot contributes to the request. Never both text and file.
#[derive(Debug, Clone, PartialEq)]
pub enum SlotPayload {
    Text(String),
    File(UploadedFile),
}

impl SlotPayload {
    /// Returns `None` for an empty slot.
    pub fn from_slot(slot: &DocumentSlot) -> Option<Self> {
        match slot {
            DocumentSlot::Empty => None,
            DocumentSlot::Text { content } => Some(SlotPayload::Text(content.clone())),
            DocumentSlot::File { file, .. } => Some(SlotPayload::File(file.clone())),
        }
    }

    fn field_name(&self, kind: SlotKind) -> &'static str {
        match self {
            SlotPayload::Text(_) => kind.content_field(),
            SlotPayload::File(_) => kind.file_field(),
        }
    }
}

/// Snapshot of both slots taken when a comparison starts.
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonRequest {
    pub cv: SlotPayload,
    pub jd: SlotPayload,
}

impl ComparisonRequest {
    fn entries(&self) -> [(SlotKind, &SlotPayload); 2] {
        [(SlotKind::Cv, &self.cv), (SlotKind::Jd, &self.jd)]
    }

    /// Multipart field names this request will carry, in send order.
    pub fn field_names(&self) -> Vec<&'static str> {
        self.entries()
            .iter()
            .map(|(kind, payload)| payload.field_name(*kind))
            .collect()
    }

    pub fn into_form(self) -> Result<Form, reqwest::Error> {
        let mut form = Form::new();
        for (kind, payload) in [(SlotKind::Cv, self.cv), (SlotKind::Jd, self.jd)] {
            let name = payload.field_name(kind);
            form = match payload {
                SlotPayload::Text(content) => form.text(name, content),
                SlotPayload::File(file) => {
                    let part = Part::bytes(file.bytes.to_vec())
                        .file_name(file.file_name)
                        .mime_str(file.format.mime_type())?;
                    form.part(name, part)
                }
            };
        }
        Ok(form)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pdf() -> UploadedFile {
        UploadedFile::new("cv.pdf", b"%PDF-1.4".to_vec()).unwrap()
    }

    #[test]
    fn test_empty_slot_has_no_payload() {
        assert!(SlotPayload::from_slot(&DocumentSlot::Empty).is_none());
    }

    #[test]
    fn test_file_slot_sends_file_not_decoded_text() {
        let slot = DocumentSlot::File {
            file: pdf(),
            content: "Go, Docker".to_string(),
        };
        assert_eq!(SlotPayload::from_slot(&slot), Some(SlotPayload::File(pdf())));
    }

    #[test]
    fn test_each_slot_contributes_exactly_one_field() {
        let request = ComparisonRequest {
            cv: SlotPayload::File(pdf()),
            jd: SlotPayload::Text("Python, AWS".to_string()),
        };
        assert_eq!(request.field_names(), vec!["cv_file", "jd_content"]);

        let request = ComparisonRequest {
            cv: SlotPayload::Text("React".to_string()),
            jd: SlotPayload::File(UploadedFile::new("jd.docx", b"x".to_vec()).unwrap()),
        };
        assert_eq!(request.field_names(), vec!["cv_content", "jd_file"]);
    }

    #[test]
    fn test_into_form_accepts_every_format() {
        let request = ComparisonRequest {
            cv: SlotPayload::File(UploadedFile::new("cv.doc", b"x".to_vec()).unwrap()),
            jd: SlotPayload::File(UploadedFile::new("jd.docx", b"y".to_vec()).unwrap()),
        };
        assert!(request.into_form().is_ok());
    }
}
