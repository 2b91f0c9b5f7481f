//! Application configuration management.
//!
//! - `OverlayConfig`: activation timing and compositor settings
//!
//! Uses `parking_lot::RwLock` for fast, non-poisoning access and atomic
//! batch updates from the frontend.

pub mod overlay;

pub use overlay::{overlay_config, set_overlay_config, OverlayConfig, OVERLAY_CONFIG};
