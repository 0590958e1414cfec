//! Writing a suggested solution to disk.

use pumpwise_config::{AppConfig, ExportFormat};
use pumpwise_render::renderer_for;
use std::path::{Path, PathBuf};
use tracing::info;

/// Where to write and in which format.
///
/// An explicit path picks the format from its extension (`.txt` is text,
/// `.pdf` is PDF, anything else follows config). No path means the
/// configured export directory and file name.
pub fn resolve_target(config: &AppConfig, path: Option<&Path>) -> (PathBuf, ExportFormat) {
    let path = match path {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => config.export.default_path(),
    };

    let format = match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("txt") => ExportFormat::Text,
        Some(ext) if ext.eq_ignore_ascii_case("pdf") => ExportFormat::Pdf,
        _ => config.export.format,
    };

    (path, format)
}

/// Render `text` and write it; returns the written path.
pub fn export_solution(
    config: &AppConfig,
    text: &str,
    path: Option<&Path>,
) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let (path, format) = resolve_target(config, path);
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| config.export.file_name.clone());

    let document = renderer_for(format, &file_name).render(text)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&path, &document.bytes)
        .map_err(|e| format!("Failed to write {}: {e}", path.display()))?;

    info!(path = %path.display(), bytes = document.len(), mime = %document.mime_type, "Exported solution");
    Ok(path)
}
