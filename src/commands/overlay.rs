//! Overlay IPC commands.

use std::sync::Arc;

use tauri::{command, State};

use crate::config::{self, OverlayConfig};
use crate::error::{OverlayError, OverlayResult};
use crate::overlay::types::{OverlaySession, OverlaySnapshot};
use crate::overlay::{OverlayOrchestrator, SessionActivation};

/// Managed state: the orchestrator, or why it could not be built.
pub struct OverlayState(Result<Arc<OverlayOrchestrator>, String>);

impl OverlayState {
    pub fn ready(orchestrator: Arc<OverlayOrchestrator>) -> Self {
        Self(Ok(orchestrator))
    }

    pub fn unavailable(reason: String) -> Self {
        Self(Err(reason))
    }

    pub fn orchestrator(&self) -> OverlayResult<&Arc<OverlayOrchestrator>> {
        self.0
            .as_ref()
            .map_err(|reason| OverlayError::SdkUnavailable(reason.clone()))
    }
}

/// Log the outcome of an activation in the background.
pub(crate) fn watch_activation(activation: SessionActivation) {
    tauri::async_runtime::spawn(async move {
        let generation = activation.generation();
        match activation.wait().await {
            Ok(()) => log::info!("[OVERLAY_CMD] Session #{} activated", generation),
            Err(OverlayError::SessionCancelled) => {
                log::debug!("[OVERLAY_CMD] Session #{} cancelled", generation)
            },
            Err(e) => log::error!("[OVERLAY_CMD] Session #{} failed: {}", generation, e),
        }
    });
}

// ============================================================================
// Tauri Commands
// ============================================================================

#[command]
pub async fn set_overlay_enabled(
    state: State<'_, OverlayState>,
    enabled: bool,
) -> OverlayResult<OverlaySession> {
    let orchestrator = state.orchestrator()?;
    if let Some(activation) = orchestrator.set_enabled(enabled)? {
        watch_activation(activation);
    }
    Ok(orchestrator.session())
}

#[command]
pub async fn toggle_overlay(state: State<'_, OverlayState>) -> OverlayResult<()> {
    state.orchestrator()?.toggle_overlay()
}

#[command]
pub async fn show_overlay(state: State<'_, OverlayState>) -> OverlayResult<()> {
    state.orchestrator()?.show_overlay()
}

#[command]
pub async fn hide_overlay(state: State<'_, OverlayState>) -> OverlayResult<()> {
    state.orchestrator()?.hide_overlay()
}

#[command]
pub async fn set_overlay_preview(
    state: State<'_, OverlayState>,
    enabled: bool,
) -> OverlayResult<()> {
    state.orchestrator()?.set_preview_enabled(enabled)
}

#[command]
pub async fn get_overlay_session(state: State<'_, OverlayState>) -> OverlayResult<OverlaySnapshot> {
    Ok(state.orchestrator()?.snapshot())
}

#[command]
pub fn get_overlay_config() -> OverlayConfig {
    config::overlay_config()
}

/// Takes effect for the next orchestrator (i.e. after restart).
#[command]
pub fn set_overlay_config(config: OverlayConfig) {
    config::set_overlay_config(config);
}
