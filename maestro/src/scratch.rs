//! Invocation-scoped scratch file holding caller context for tool consumption.
//!
//! One uniquely named file per acquisition, so concurrent invocations never
//! collide. Release is idempotent and also runs on drop, which keeps the file
//! from leaking when the owning task unwinds.

use std::path::{Path, PathBuf};

use crate::plan::Context;

/// Handle to one invocation's materialized context document.
pub struct ContextScratch {
    path: PathBuf,
    released: bool,
}

impl ContextScratch {
    /// Serializes `context` to `scratch-<uuid>.json` under `dir`.
    pub fn acquire(dir: &Path, context: &Context) -> std::io::Result<Self> {
        let path = dir.join(format!("scratch-{}.json", uuid::Uuid::new_v4()));
        let bytes = serde_json::to_vec_pretty(&serde_json::Value::Object(context.clone()))?;
        std::fs::write(&path, bytes)?;
        tracing::debug!(path = %path.display(), "scratch acquired");
        Ok(Self {
            path,
            released: false,
        })
    }

    /// Path of the materialized document, for goal templating and tool args.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Removes the file. Safe to call repeatedly; an already-missing file is
    /// not an error.
    pub fn release(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        if let Err(e) = std::fs::remove_file(&self.path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!(path = %self.path.display(), "scratch release: {}", e);
            }
        } else {
            tracing::debug!(path = %self.path.display(), "scratch released");
        }
    }

    pub fn is_released(&self) -> bool {
        self.released
    }
}

impl Drop for ContextScratch {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context() -> Context {
        let mut map = Context::new();
        map.insert("Hemoglobin".into(), serde_json::json!(13.5));
        map
    }

    #[test]
    fn acquire_writes_the_document() {
        let dir = tempfile::tempdir().unwrap();
        let scratch = ContextScratch::acquire(dir.path(), &context()).unwrap();
        let content = std::fs::read_to_string(scratch.path()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(value["Hemoglobin"], 13.5);
    }

    #[test]
    fn two_acquisitions_never_share_a_path() {
        let dir = tempfile::tempdir().unwrap();
        let a = ContextScratch::acquire(dir.path(), &context()).unwrap();
        let b = ContextScratch::acquire(dir.path(), &context()).unwrap();
        assert_ne!(a.path(), b.path());
    }

    #[test]
    fn release_removes_the_file_and_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let mut scratch = ContextScratch::acquire(dir.path(), &context()).unwrap();
        let path = scratch.path().to_path_buf();
        assert!(path.exists());
        scratch.release();
        assert!(!path.exists());
        assert!(scratch.is_released());
        scratch.release();
        assert!(!path.exists());
    }

    #[test]
    fn release_tolerates_a_file_removed_behind_its_back() {
        let dir = tempfile::tempdir().unwrap();
        let mut scratch = ContextScratch::acquire(dir.path(), &context()).unwrap();
        std::fs::remove_file(scratch.path()).unwrap();
        scratch.release();
        assert!(scratch.is_released());
    }

    #[test]
    fn drop_releases_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = {
            let scratch = ContextScratch::acquire(dir.path(), &context()).unwrap();
            scratch.path().to_path_buf()
        };
        assert!(!path.exists());
    }
}
