//! Frontend and runtime event handlers.
//!
//! Login/logout come in as Tauri events and are forwarded to the
//! orchestrator's session listener; lifecycle snapshots go back out as
//! `game-overlay-state`.

use std::sync::Arc;
use std::time::Duration;

use tauri::{AppHandle, Emitter, Listener, Manager};
use tokio::sync::mpsc::UnboundedSender;

use super::session::{DesktopSession, LoginPayload};
use crate::commands::overlay::OverlayState;
use crate::overlay::types::SessionEvent;
use crate::overlay::OverlayOrchestrator;

pub const LOGIN_EVENT: &str = "overlay://login";
pub const LOGOUT_EVENT: &str = "overlay://logout";
pub const STATE_EVENT: &str = "game-overlay-state";

/// How long the exit hook waits for an in-flight overlay operation
const EXIT_LOCK_WAIT: Duration = Duration::from_millis(500);

/// Wire the login/logout events to the session listener channel.
pub fn listen_for_session(
    app: &AppHandle,
    session: Arc<DesktopSession>,
    events: UnboundedSender<SessionEvent>,
) {
    {
        let session = Arc::clone(&session);
        let events = events.clone();
        app.listen(LOGIN_EVENT, move |event| {
            match serde_json::from_str::<LoginPayload>(event.payload()) {
                Ok(payload) => session.log_in(payload),
                Err(e) => {
                    log::warn!("[OVERLAY_EVENTS] Malformed login payload: {}", e);
                    return;
                },
            }
            let _ = events.send(SessionEvent::LoggedIn);
        });
    }

    app.listen(LOGOUT_EVENT, move |_event| {
        session.log_out();
        let _ = events.send(SessionEvent::LoggedOut);
    });
}

/// Forward every lifecycle snapshot to the frontend.
pub fn forward_state(app: AppHandle, orchestrator: &Arc<OverlayOrchestrator>) {
    let mut snapshots = orchestrator.subscribe();
    tauri::async_runtime::spawn(async move {
        while snapshots.changed().await.is_ok() {
            let snapshot = *snapshots.borrow_and_update();
            if let Err(e) = app.emit(STATE_EVENT, snapshot) {
                log::warn!("[OVERLAY_EVENTS] Failed to emit state: {}", e);
            }
        }
    });
}

/// Process exit: tear down and stop the compositor.
///
/// Runs on the main thread, which in-flight window calls wait on, so the
/// wait for the orchestrator is bounded.
pub fn on_exit(app: &AppHandle) {
    if let Some(state) = app.try_state::<OverlayState>() {
        if let Ok(orchestrator) = state.orchestrator() {
            if !orchestrator.shutdown_within(EXIT_LOCK_WAIT) {
                log::warn!("[OVERLAY_EVENTS] Overlay busy at exit, shutdown deferred");
            }
        }
    }
}
