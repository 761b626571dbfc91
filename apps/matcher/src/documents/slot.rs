//! Document slots — the canonical per-side document state of a page.
//!
//! A slot is either empty, backed by an uploaded file, or backed by typed text.
//! The file handle only exists in the `File` variant, so a slot can never hold
//! a file while in text mode.

use std::fmt;

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::documents::DocumentError;

/// Which side of the comparison a slot holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlotKind {
    Cv,
    Jd,
}

impl SlotKind {
    pub const ALL: [SlotKind; 2] = [SlotKind::Cv, SlotKind::Jd];

    pub fn as_str(self) -> &'static str {
        match self {
            SlotKind::Cv => "cv",
            SlotKind::Jd => "jd",
        }
    }

    /// Multipart field carrying typed text for this slot.
    pub fn content_field(self) -> &'static str {
        match self {
            SlotKind::Cv => "cv_content",
            SlotKind::Jd => "jd_content",
        }
    }

    /// Multipart field carrying the raw uploaded file for this slot.
    pub fn file_field(self) -> &'static str {
        match self {
            SlotKind::Cv => "cv_file",
            SlotKind::Jd => "jd_file",
        }
    }
}

impl fmt::Display for SlotKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which entry path currently owns a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InputMode {
    None,
    File,
    Text,
}

/// Accepted upload formats, detected by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileFormat {
    Pdf,
    Doc,
    Docx,
}

impl FileFormat {
    pub fn from_file_name(file_name: &str) -> Result<Self, DocumentError> {
        let ext = file_name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_default();

        match ext.as_str() {
            "pdf" => Ok(FileFormat::Pdf),
            "doc" => Ok(FileFormat::Doc),
            "docx" => Ok(FileFormat::Docx),
            _ => Err(DocumentError::UnsupportedType {
                file_name: file_name.to_string(),
            }),
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            FileFormat::Pdf => "application/pdf",
            FileFormat::Doc => "application/msword",
            FileFormat::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
        }
    }
}

/// The raw file as uploaded, kept so it can be forwarded to the scoring service.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadedFile {
    pub file_name: String,
    pub format: FileFormat,
    pub bytes: Bytes,
}

impl UploadedFile {
    /// Validates the extension and wraps the bytes.
    pub fn new(file_name: impl Into<String>, bytes: impl Into<Bytes>) -> Result<Self, DocumentError> {
        let file_name = file_name.into();
        let format = FileFormat::from_file_name(&file_name)?;
        Ok(Self {
            file_name,
            format,
            bytes: bytes.into(),
        })
    }
}

/// Canonical state of one document slot.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum DocumentSlot {
    #[default]
    Empty,
    File {
        file: UploadedFile,
        content: String,
    },
    Text {
        content: String,
    },
}

impl DocumentSlot {
    pub fn mode(&self) -> InputMode {
        match self {
            DocumentSlot::Empty => InputMode::None,
            DocumentSlot::File { .. } => InputMode::File,
            DocumentSlot::Text { .. } => InputMode::Text,
        }
    }

    pub fn content(&self) -> &str {
        match self {
            DocumentSlot::Empty => "",
            DocumentSlot::File { content, .. } | DocumentSlot::Text { content } => content,
        }
    }

    pub fn file(&self) -> Option<&UploadedFile> {
        match self {
            DocumentSlot::File { file, .. } => Some(file),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, DocumentSlot::Empty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_format_detected_case_insensitively() {
        assert_eq!(FileFormat::from_file_name("cv.PDF").unwrap(), FileFormat::Pdf);
        assert_eq!(FileFormat::from_file_name("cv.final.docx").unwrap(), FileFormat::Docx);
        assert_eq!(FileFormat::from_file_name("old.doc").unwrap(), FileFormat::Doc);
    }

    #[test]
    fn test_file_format_rejects_other_extensions() {
        for name in ["notes.txt", "resume", "image.png", "archive.pdf.zip"] {
            assert!(
                matches!(
                    FileFormat::from_file_name(name),
                    Err(DocumentError::UnsupportedType { .. })
                ),
                "{name} should be rejected"
            );
        }
    }

    #[test]
    fn test_empty_slot_has_no_content_or_file() {
        let slot = DocumentSlot::default();
        assert_eq!(slot.mode(), InputMode::None);
        assert_eq!(slot.content(), "");
        assert!(slot.file().is_none());
    }

    #[test]
    fn test_file_slot_exposes_handle() {
        let file = UploadedFile::new("cv.pdf", b"%PDF".to_vec()).unwrap();
        let slot = DocumentSlot::File {
            file: file.clone(),
            content: "Go, Docker".to_string(),
        };
        assert_eq!(slot.mode(), InputMode::File);
        assert_eq!(slot.content(), "Go, Docker");
        assert_eq!(slot.file(), Some(&file));
    }

    #[test]
    fn test_slot_kind_field_names() {
        assert_eq!(SlotKind::Cv.content_field(), "cv_content");
        assert_eq!(SlotKind::Jd.file_field(), "jd_file");
        let kind: SlotKind = serde_json::from_str(r#""jd""#).unwrap();
        assert_eq!(kind, SlotKind::Jd);
    }
}
