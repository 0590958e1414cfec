//! DocumentRenderer trait: turns generated text into a downloadable file.

use crate::error::RenderError;
use serde::{Deserialize, Serialize};

/// A rendered document, ready to be written to disk or offered for download.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Raw file contents
    pub bytes: Vec<u8>,

    /// MIME type, e.g. `application/pdf`
    pub mime_type: String,

    /// Suggested file name, e.g. `pump_solution.pdf`
    pub file_name: String,
}

impl Document {
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Stateless text-to-document conversion.
///
/// Implementations must succeed for any text that is not blank and return
/// [`RenderError::EmptyInput`] otherwise.
pub trait DocumentRenderer: Send + Sync {
    /// A short name for this renderer (e.g., "pdf", "text").
    fn name(&self) -> &str;

    fn render(&self, text: &str) -> Result<Document, RenderError>;
}
