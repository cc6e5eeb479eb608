//! Hand-off of a finished document to an external writer.

use std::path::Path;

use thiserror::Error;

use crate::document::Document;
use crate::settings::Settings;

/// Serializer collaborator that writes a document to disk.
pub trait DocumentWriter {
    /// Write `document` to `path`. `format` is the writer description of the
    /// container format, e.g. "FBX binary (*.fbx)".
    fn export(
        &mut self,
        path: &Path,
        document: &Document,
        format: &str,
        compatibility: &str,
    ) -> bool;
}

impl<F> DocumentWriter for F
where
    F: FnMut(&Path, &Document, &str, &str) -> bool,
{
    fn export(
        &mut self,
        path: &Path,
        document: &Document,
        format: &str,
        compatibility: &str,
    ) -> bool {
        self(path, document, format, compatibility)
    }
}

/// Errors raised before a document reaches the writer.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExportError {
    #[error("No export path set")]
    MissingPath,
}

/// Export a document, then clear it whether or not the writer succeeded.
///
/// Returns the writer's result.
pub fn export_document<W: DocumentWriter + ?Sized>(
    writer: &mut W,
    document: &mut Document,
    settings: &Settings,
) -> Result<bool, ExportError> {
    if settings.file_path.as_os_str().is_empty() {
        return Err(ExportError::MissingPath);
    }

    let ok = writer.export(
        &settings.file_path,
        document,
        settings.file_format.description(),
        &settings.compatibility,
    );
    if ok {
        log::info!("Exported {}", settings.file_path.display());
    } else {
        log::warn!("Writer failed to export {}", settings.file_path.display());
    }

    document.clear();
    Ok(ok)
}
