//! Document renderers for exporting a suggested solution.
//!
//! `pdf` reproduces the "Download Solution as PDF" export; `text` is a
//! plain UTF-8 alternative selected with `export.format = "text"`.

pub mod pdf;
pub mod text;

pub use pdf::PdfRenderer;
pub use text::PlainTextRenderer;

use pumpwise_config::ExportFormat;
use pumpwise_core::render::DocumentRenderer;

/// Title printed at the top of exported PDFs.
pub const SOLUTION_TITLE: &str = "Suggested Pump Solution";

/// The renderer for a configured export format.
pub fn renderer_for(format: ExportFormat, file_name: &str) -> Box<dyn DocumentRenderer> {
    match format {
        ExportFormat::Pdf => Box::new(PdfRenderer::new(file_name).with_title(SOLUTION_TITLE)),
        ExportFormat::Text => Box::new(PlainTextRenderer::new(file_name)),
    }
}
