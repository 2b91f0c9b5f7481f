//! Tauri plugin that hosts the overlay.
//!
//! - `session`: desktop implementations of the orchestrator's providers
//! - `events`: login/logout listeners, state forwarding, exit handling
//!
//! The host application installs it next to the store plugin:
//!
//! ```ignore
//! tauri::Builder::default()
//!     .plugin(tauri_plugin_store::Builder::default().build())
//!     .plugin(game_overlay::plugin())
//! ```

pub mod events;
pub mod session;

use std::path::PathBuf;
use std::sync::Arc;

use tauri::plugin::{Builder, TauriPlugin};
use tauri::{AppHandle, Manager, RunEvent, Wry};
use tokio::sync::mpsc;

use crate::commands;
use crate::commands::overlay::OverlayState;
use crate::config;
use crate::error::OverlayResult;
use crate::logging;
use crate::overlay::compositor::{CompositorClient, DylibSdk, NativeCompositor};
use crate::overlay::{OverlayDeps, OverlayOrchestrator};
use session::DesktopSession;

/// Library name of the native compositor SDK, resolved next to the app's resources
const SDK_LIBRARY: &str = "overlay_sdk";

pub fn plugin() -> TauriPlugin<Wry> {
    Builder::new("game-overlay")
        .invoke_handler(tauri::generate_handler![
            commands::overlay::set_overlay_enabled,
            commands::overlay::toggle_overlay,
            commands::overlay::show_overlay,
            commands::overlay::hide_overlay,
            commands::overlay::set_overlay_preview,
            commands::overlay::get_overlay_session,
            commands::overlay::get_overlay_config,
            commands::overlay::set_overlay_config,
        ])
        .setup(|app, _api| {
            setup(app);
            Ok(())
        })
        .on_event(|app, event| {
            if let RunEvent::Exit = event {
                events::on_exit(app);
            }
        })
        .build()
}

fn setup(app: &AppHandle) {
    let overlay_config = config::overlay_config();
    let log_dir = app.path().app_log_dir().ok();
    if let Err(e) = logging::init_logging(log_dir.as_deref(), overlay_config.debug_logging) {
        // The host may already have installed a logger
        log::debug!("[OVERLAY_APP] Keeping existing logger: {}", e);
    }

    let compositor = match load_compositor(app) {
        Ok(compositor) => compositor,
        Err(e) => {
            log::error!("[OVERLAY_APP] Overlay disabled: {}", e);
            app.manage(OverlayState::unavailable(e.to_string()));
            return;
        },
    };

    let session = Arc::new(DesktopSession::new(app.clone()));
    let deps = OverlayDeps {
        compositor,
        windows: Arc::new(commands::window::TauriWindowFactory::new(app.clone())),
        auth: session.clone(),
        chat: session.clone(),
        recent_events: session.clone(),
        display: session.clone(),
        theme: session.clone(),
        store: Arc::new(commands::store::TauriSessionStore::new(app.clone())),
    };
    let orchestrator = OverlayOrchestrator::new(deps, overlay_config);
    app.manage(OverlayState::ready(Arc::clone(&orchestrator)));

    events::forward_state(app.clone(), &orchestrator);

    let (tx, rx) = mpsc::unbounded_channel();
    events::listen_for_session(app, session, tx);

    // The listener and activation spawn tokio tasks, so start them on the runtime
    tauri::async_runtime::spawn(async move {
        let listener = orchestrator.spawn_session_listener(rx);
        match orchestrator.init() {
            Ok(Some(activation)) => commands::overlay::watch_activation(activation),
            Ok(None) => {},
            Err(e) => log::error!("[OVERLAY_APP] Failed to resume overlay: {}", e),
        }
        let _ = listener.await;
    });
}

fn load_compositor(app: &AppHandle) -> OverlayResult<Arc<dyn CompositorClient>> {
    let path = match config::overlay_config().sdk_path {
        Some(path) => PathBuf::from(path),
        None => app
            .path()
            .resource_dir()
            .map_err(|e| format!("Failed to get resource directory: {}", e))?
            .join(libloading::library_filename(SDK_LIBRARY)),
    };

    log::info!("[OVERLAY_APP] Loading compositor SDK from {}", path.display());
    let sdk = DylibSdk::load(&path)?;
    Ok(Arc::new(NativeCompositor::new(sdk)))
}
