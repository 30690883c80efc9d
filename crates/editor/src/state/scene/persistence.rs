//! Save/load and autosave

use std::path::Path;

use shared::SceneDocument;

use super::SceneEditor;
use crate::persistence::{self, LoadReport, PersistenceError};
use crate::state::history::SceneSnapshot;

impl SceneEditor {
    /// Current scene, including the camera
    pub fn export_document(&self) -> SceneDocument {
        persistence::serialize(self.registry.all(), Some(&self.camera), self.now_ms() as i64)
    }

    pub fn export_json(&self) -> Result<String, PersistenceError> {
        persistence::to_json(&self.export_document())
    }

    /// Replace the scene with `text`. On any document-level error the scene is
    /// left exactly as it was. A successful import is one undoable action.
    pub fn import_json(&mut self, text: &str) -> Result<LoadReport, PersistenceError> {
        let parsed = match persistence::parse_document(text, &self.settings, self.now_ms() as i64) {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!("Import failed: {e}");
                self.emit_notice(&format!("Import failed: {e}"));
                return Err(e);
            }
        };

        self.end_drag();
        self.history
            .record(SceneSnapshot::capture(&self.registry, Some(&self.camera)));
        self.animator.cancel_all();
        let (report, change) = persistence::apply_parsed(
            parsed,
            &mut self.registry,
            &mut self.selection,
            &mut self.camera,
        );
        self.emit_selection(change);
        self.emit_notice(&report.summary());
        self.commit();
        Ok(report)
    }

    /// Write the scene to `path`, creating parent directories
    pub fn save_to_path(&self, path: &Path) -> Result<(), PersistenceError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.export_json()?)?;
        tracing::info!("Scene saved to {}", path.display());
        Ok(())
    }

    /// Read and import `path`. Oversized files are rejected before reading.
    pub fn load_from_path(&mut self, path: &Path) -> Result<LoadReport, PersistenceError> {
        let size = usize::try_from(std::fs::metadata(path)?.len()).unwrap_or(usize::MAX);
        let limit = self.settings.persistence.max_document_bytes;
        if size > limit {
            return Err(PersistenceError::TooLarge { size, limit });
        }
        let text = std::fs::read_to_string(path)?;
        self.import_json(&text)
    }

    /// Save to the autosave file. Failures are logged, not returned.
    pub fn autosave(&self) {
        let Some(path) = &self.autosave_path else {
            return;
        };
        if let Err(e) = self.save_to_path(path) {
            tracing::warn!("Autosave to {} failed: {e}", path.display());
        }
    }

    pub fn has_autosave(&self) -> bool {
        self.autosave_path.as_ref().is_some_and(|p| p.exists())
    }

    /// Restore the autosave file if one exists
    pub fn load_autosave(&mut self) -> Result<Option<LoadReport>, PersistenceError> {
        let Some(path) = self.autosave_path.clone() else {
            return Ok(None);
        };
        if !path.exists() {
            return Ok(None);
        }
        self.load_from_path(&path).map(Some)
    }
}
