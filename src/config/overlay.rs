//! Overlay configuration.
//!
//! Tunables for session activation and the native compositor. Uses
//! `parking_lot::RwLock` for thread-safe access; the orchestrator takes a
//! snapshot when it is constructed.

use std::time::Duration;

use lazy_static::lazy_static;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::overlay::readiness::DEFAULT_CONTROL_PANEL_LOADS;
use crate::overlay::types::OPAQUE;

/// Upper bound for the settling delay (ms)
const MAX_SETTLE_DELAY_MS: u64 = 30_000;

/// Lower bound for the readiness timeout (ms)
const MIN_READY_TIMEOUT_MS: u64 = 1_000;

lazy_static! {
    /// Global overlay configuration.
    pub static ref OVERLAY_CONFIG: RwLock<OverlayConfig> = RwLock::new(OverlayConfig::default());
}

/// Overlay activation and compositor settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase", default)]
#[ts(export, export_to = "overlay/")]
pub struct OverlayConfig {
    /// Pause after the last surface loads, before capture starts.
    pub settle_delay_ms: u64,

    /// Give up on activation if surfaces have not all loaded by then.
    /// None = wait indefinitely.
    pub ready_timeout_ms: Option<u64>,

    /// Alpha applied to every registered surface (0-255).
    pub surface_opacity: u8,

    /// Load signals the control panel must report (first one is a blank paint).
    pub control_panel_loads: u8,

    /// Path of the native compositor library.
    pub sdk_path: Option<String>,

    /// Verbose logging.
    pub debug_logging: bool,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            settle_delay_ms: 5_000,
            ready_timeout_ms: Some(60_000),
            surface_opacity: OPAQUE,
            control_panel_loads: DEFAULT_CONTROL_PANEL_LOADS,
            sdk_path: None,
            debug_logging: false,
        }
    }
}

impl OverlayConfig {
    /// Validate and clamp settings to acceptable ranges.
    pub fn validate(&mut self) {
        self.settle_delay_ms = self.settle_delay_ms.min(MAX_SETTLE_DELAY_MS);
        self.ready_timeout_ms = self
            .ready_timeout_ms
            .map(|ms| ms.max(MIN_READY_TIMEOUT_MS));
        self.control_panel_loads = self.control_panel_loads.clamp(1, 4);
        if self.sdk_path.as_deref().is_some_and(|p| p.trim().is_empty()) {
            self.sdk_path = None;
        }
    }

    /// Reset all settings to defaults.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    pub fn ready_timeout(&self) -> Option<Duration> {
        self.ready_timeout_ms.map(Duration::from_millis)
    }
}

// ============================================================================
// Getters (for internal Rust use)
// ============================================================================

/// Snapshot of the current configuration.
pub fn overlay_config() -> OverlayConfig {
    OVERLAY_CONFIG.read().clone()
}

/// Replace the configuration (validated).
pub fn set_overlay_config(mut config: OverlayConfig) {
    config.validate();
    log::debug!("[OVERLAY_CONFIG] set_overlay_config({:?})", config);
    *OVERLAY_CONFIG.write() = config;
}
