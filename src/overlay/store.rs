//! Persistence for the overlay session record.

use std::fs;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;

use super::types::OverlaySession;
use crate::error::{OverlayResult, ResultExt};

/// Key-value persistence for [`OverlaySession`].
pub trait SessionStore: Send + Sync {
    /// Load the stored session, `None` on first run.
    fn load(&self) -> OverlayResult<Option<OverlaySession>>;

    fn save(&self, session: &OverlaySession) -> OverlayResult<()>;
}

/// In-process store (tests, headless runs).
#[derive(Default)]
pub struct MemorySessionStore {
    session: Mutex<Option<OverlaySession>>,
}

impl MemorySessionStore {
    pub fn new(initial: Option<OverlaySession>) -> Self {
        Self {
            session: Mutex::new(initial),
        }
    }

    pub fn current(&self) -> Option<OverlaySession> {
        *self.session.lock()
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> OverlayResult<Option<OverlaySession>> {
        Ok(*self.session.lock())
    }

    fn save(&self, session: &OverlaySession) -> OverlayResult<()> {
        *self.session.lock() = Some(*session);
        Ok(())
    }
}

/// Session stored as a small JSON object on disk.
pub struct JsonFileSessionStore {
    path: PathBuf,
}

impl JsonFileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStore for JsonFileSessionStore {
    fn load(&self) -> OverlayResult<Option<OverlaySession>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&self.path)?;
        let session = serde_json::from_str(&content)
            .with_context(|| format!("Corrupt overlay session at {}", self.path.display()))?;
        Ok(Some(session))
    }

    fn save(&self, session: &OverlaySession) -> OverlayResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        // Write-then-rename so a crash never leaves a half-written file
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_vec_pretty(session)?)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_round_trip() {
        let store = MemorySessionStore::default();
        assert_eq!(store.load().unwrap(), None);

        let session = OverlaySession {
            is_enabled: true,
            ..Default::default()
        };
        store.save(&session).unwrap();
        assert_eq!(store.current(), Some(session));
    }

    #[test]
    fn file_store_first_run_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileSessionStore::new(dir.path().join("overlay.json"));
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn file_store_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("overlay.json");

        let session = OverlaySession {
            is_enabled: true,
            is_showing: true,
            is_preview_enabled: false,
        };
        JsonFileSessionStore::new(&path).save(&session).unwrap();

        let reloaded = JsonFileSessionStore::new(&path).load().unwrap();
        assert_eq!(reloaded, Some(session));

        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\"isPreviewEnabled\": false"));
    }

    #[test]
    fn file_store_reports_corrupt_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("overlay.json");
        fs::write(&path, "{ not json").unwrap();

        let err = JsonFileSessionStore::new(&path).load().unwrap_err();
        assert!(err.to_string().contains("Corrupt overlay session"));
    }
}
