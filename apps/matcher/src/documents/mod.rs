// Document inputs: slot state, upload decoding, and the per-slot HTTP events.

pub mod decoder;
pub mod handlers;
pub mod slot;

use thiserror::Error;

/// Upload-boundary failures. The slot keeps its prior state when one occurs.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("Unsupported file type: {file_name} (expected .pdf, .doc or .docx)")]
    UnsupportedType { file_name: String },

    #[error("No readable text in {file_name}")]
    EmptyContent { file_name: String },

    #[error("Could not read file: {0}")]
    Read(String),
}
