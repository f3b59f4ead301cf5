//! Content extraction from uploaded files.
//!
//! Text files are base64-decoded; PDFs and images get a placeholder naming
//! the file rather than real parsing or OCR.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use tracing::{debug, instrument};

use crate::domain::FileDescriptor;
use crate::errors::ExtractionError;
use crate::util::trunc_for_log;

/// bytes + MIME -> text, best effort.
pub trait ContentExtractor: Send + Sync {
    fn extract(&self, file: &FileDescriptor) -> Result<String, ExtractionError>;
}

/// Default extractor keyed on the MIME type.
#[derive(Clone, Copy, Debug, Default)]
pub struct MimeExtractor;

impl ContentExtractor for MimeExtractor {
    #[instrument(level = "debug", skip(self, file), fields(name = %file.name, mime = %file.mime, size = ?file.size))]
    fn extract(&self, file: &FileDescriptor) -> Result<String, ExtractionError> {
        let mime = file.mime.as_str();
        let text = if mime.starts_with("text/") {
            decode_text(file)?
        } else if mime == "application/pdf" {
            format!("PDF content from {} - Grade appropriate content", file.name)
        } else if mime.starts_with("image/") {
            format!("Image content from {} - Visual learning material", file.name)
        } else {
            format!("Content from {} - Educational material", file.name)
        };
        debug!(target: "lesson", text_len = text.len(), preview = %trunc_for_log(&text, 60), "Content extracted");
        Ok(text)
    }
}

fn decode_text(file: &FileDescriptor) -> Result<String, ExtractionError> {
    // Browsers may wrap long base64 payloads.
    let content = file
        .content
        .as_deref()
        .ok_or_else(|| ExtractionError::MissingContent { name: file.name.clone() })?;
    let compact: String = content.chars().filter(|c| !c.is_whitespace()).collect();
    let bytes = STANDARD.decode(compact).map_err(|source| ExtractionError::Base64 {
        name: file.name.clone(),
        source,
    })?;
    String::from_utf8(bytes).map_err(|source| ExtractionError::Utf8 {
        name: file.name.clone(),
        source,
    })
}
