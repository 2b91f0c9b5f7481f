//! Tauri-facing pieces of the overlay.
//!
//! - `overlay`: IPC commands and managed orchestrator state
//! - `window`: webview-backed `WindowFactory`
//! - `store`: `tauri-plugin-store` backed `SessionStore`

pub mod overlay;
pub mod store;
pub mod window;
