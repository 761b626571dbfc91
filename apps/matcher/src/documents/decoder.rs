//! Document decoder — turns an uploaded file into preview text for its slot.
//!
//! Structured extraction happens at the scoring service from the forwarded raw
//! file. The text produced here only feeds the slot content and the preview.

use async_trait::async_trait;
use tracing::debug;

use crate::documents::slot::{FileFormat, UploadedFile};
use crate::documents::DocumentError;

#[async_trait]
pub trait DocumentDecoder: Send + Sync {
    async fn decode(&self, file: &UploadedFile) -> Result<String, DocumentError>;
}

/// Default decoder: `pdf-extract` for PDFs, lossy UTF-8 passthrough for Word files.
pub struct PreviewDecoder;

#[async_trait]
impl DocumentDecoder for PreviewDecoder {
    async fn decode(&self, file: &UploadedFile) -> Result<String, DocumentError> {
        let text = match file.format {
            FileFormat::Pdf => {
                let bytes = file.bytes.clone();
                // pdf-extract can panic on malformed input; a panic surfaces as a JoinError.
                tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&bytes))
                    .await
                    .map_err(|e| DocumentError::Read(format!("PDF extraction aborted: {e}")))?
                    .map_err(|e| DocumentError::Read(format!("PDF extraction failed: {e}")))?
            }
            FileFormat::Doc | FileFormat::Docx => String::from_utf8_lossy(&file.bytes).into_owned(),
        };

        let text = text.trim();
        if text.is_empty() {
            return Err(DocumentError::EmptyContent {
                file_name: file.file_name.clone(),
            });
        }

        debug!(
            "Decoded {} ({:?}): {} chars",
            file.file_name,
            file.format,
            text.chars().count()
        );
        Ok(text.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_docx_is_passed_through_as_text() {
        let file = UploadedFile::new("cv.docx", b"  Go, Docker\n".to_vec()).unwrap();
        let text = PreviewDecoder.decode(&file).await.unwrap();
        assert_eq!(text, "Go, Docker");
    }

    #[tokio::test]
    async fn test_blank_file_is_rejected() {
        let file = UploadedFile::new("blank.doc", b" \n\t ".to_vec()).unwrap();
        let err = PreviewDecoder.decode(&file).await.unwrap_err();
        assert!(matches!(err, DocumentError::EmptyContent { .. }));
    }

    #[tokio::test]
    async fn test_malformed_pdf_is_a_read_error() {
        let file = UploadedFile::new("broken.pdf", b"definitely not a pdf".to_vec()).unwrap();
        let err = PreviewDecoder.decode(&file).await.unwrap_err();
        assert!(matches!(err, DocumentError::Read(_)));
    }
}
