//! Session persistence through `tauri-plugin-store`.
//!
//! The session is stored as three top-level booleans in `game-overlay.json`
//! under the app data directory. Requires the host to install the store
//! plugin.

use tauri::AppHandle;
use tauri_plugin_store::StoreExt;

use crate::error::{OverlayResult, ResultExt};
use crate::overlay::store::SessionStore;
use crate::overlay::types::OverlaySession;

const STORE_FILE: &str = "game-overlay.json";

const KEY_ENABLED: &str = "isEnabled";
const KEY_SHOWING: &str = "isShowing";
const KEY_PREVIEW: &str = "isPreviewEnabled";

pub struct TauriSessionStore {
    app: AppHandle,
}

impl TauriSessionStore {
    pub fn new(app: AppHandle) -> Self {
        Self { app }
    }
}

impl SessionStore for TauriSessionStore {
    fn load(&self) -> OverlayResult<Option<OverlaySession>> {
        let store = self
            .app
            .store(STORE_FILE)
            .context("Failed to open overlay store")?;

        let read = |key: &str| store.get(key).and_then(|v| v.as_bool());
        let (enabled, showing, preview) = (read(KEY_ENABLED), read(KEY_SHOWING), read(KEY_PREVIEW));
        if enabled.is_none() && showing.is_none() && preview.is_none() {
            return Ok(None);
        }

        let defaults = OverlaySession::default();
        Ok(Some(OverlaySession {
            is_enabled: enabled.unwrap_or(defaults.is_enabled),
            is_showing: showing.unwrap_or(defaults.is_showing),
            is_preview_enabled: preview.unwrap_or(defaults.is_preview_enabled),
        }))
    }

    fn save(&self, session: &OverlaySession) -> OverlayResult<()> {
        let store = self
            .app
            .store(STORE_FILE)
            .context("Failed to open overlay store")?;

        store.set(KEY_ENABLED, session.is_enabled);
        store.set(KEY_SHOWING, session.is_showing);
        store.set(KEY_PREVIEW, session.is_preview_enabled);
        store.save().context("Failed to save overlay store")
    }
}
