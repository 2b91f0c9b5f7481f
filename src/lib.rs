//! Game overlay window lifecycle and compositor handoff.
//!
//! The core (`overlay`, `config`, `error`, `logging`) is UI-toolkit agnostic
//! and driven through traits. The `desktop` feature adds the Tauri shell:
//! webview-backed surfaces, plugin-store persistence and IPC commands,
//! packaged as a plugin the host application installs.

pub mod config;
pub mod error;
pub mod logging;
pub mod overlay;

#[cfg(feature = "desktop")]
pub mod app;
#[cfg(feature = "desktop")]
pub mod commands;

pub use error::{OverlayError, OverlayResult};
pub use overlay::{OverlayDeps, OverlayOrchestrator, SessionActivation};

#[cfg(feature = "desktop")]
pub use app::plugin;
