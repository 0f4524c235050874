//! Session note export: trait + Markdown file implementation.
//!
//! Export is on demand only: notes are written out when the user asks and
//! are never read back.

use std::fs;
use std::path::{Path, PathBuf};

use crate::{render_notes, Note};

/// Errors that can occur while exporting notes.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("No saved critiques to export")]
    NothingToExport,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Destination for exported session notes.
pub trait NoteExporter {
    /// Write all notes, oldest first. Returns where they were written.
    fn export(&self, notes: &[Note]) -> Result<PathBuf, ExportError>;
}

/// Writes the notes document as a single Markdown file.
pub struct MarkdownNoteExporter {
    path: PathBuf,
}

impl MarkdownNoteExporter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl NoteExporter for MarkdownNoteExporter {
    fn export(&self, notes: &[Note]) -> Result<PathBuf, ExportError> {
        if notes.is_empty() {
            return Err(ExportError::NothingToExport);
        }

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        fs::write(&self.path, render_notes(notes))?;

        tracing::info!(
            path = %self.path.display(),
            notes = notes.len(),
            "Session notes exported"
        );

        Ok(self.path.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ConversationContext;
    use critique_core::IntakeRecord;

    #[test]
    fn export_writes_rendered_notes() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = MarkdownNoteExporter::new(dir.path().join("notes/session.md"));

        let mut ctx = ConversationContext::new();
        ctx.record_result(IntakeRecord::example(), "first");
        ctx.record_result(IntakeRecord::example(), "second");

        let path = exporter.export(ctx.notes()).unwrap();
        let written = fs::read_to_string(path).unwrap();
        assert_eq!(written, ctx.export_notes());
        assert!(written.contains("Early ideation • How to structure the critique"));
    }

    #[test]
    fn export_rejects_empty_notes() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = MarkdownNoteExporter::new(dir.path().join("session.md"));
        let result = exporter.export(&[]);
        assert!(matches!(result, Err(ExportError::NothingToExport)));
        assert!(!exporter.path().exists());
    }
}
