//! Plain UTF-8 text export.

use pumpwise_core::error::RenderError;
use pumpwise_core::render::{Document, DocumentRenderer};

pub const TEXT_MIME: &str = "text/plain; charset=utf-8";

/// Writes the text as-is, normalized to end with a single newline.
#[derive(Debug, Clone)]
pub struct PlainTextRenderer {
    file_name: String,
}

impl Default for PlainTextRenderer {
    fn default() -> Self {
        Self::new("pump_solution.txt")
    }
}

impl PlainTextRenderer {
    pub fn new(file_name: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
        }
    }
}

impl DocumentRenderer for PlainTextRenderer {
    fn name(&self) -> &str {
        "text"
    }

    fn render(&self, text: &str) -> Result<Document, RenderError> {
        if text.trim().is_empty() {
            return Err(RenderError::EmptyInput);
        }

        let mut body = text.trim_end().to_string();
        body.push('\n');

        Ok(Document {
            bytes: body.into_bytes(),
            mime_type: TEXT_MIME.into(),
            file_name: self.file_name.clone(),
        })
    }
}
