//! Desktop-side answers to the orchestrator's questions: who is logged in,
//! which chat and events feed to show, which display and theme to use.
//!
//! Login details arrive with the `overlay://login` event from the frontend.

use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::RwLock;
use serde::Deserialize;
use tauri::{AppHandle, Manager};

use crate::error::{OptionExt, OverlayResult};
use crate::overlay::providers::{
    AuthProvider, ChatUrlResolver, DisplayProvider, RecentEventsLink, RecentEventsSource,
    StreamingPlatform, ThemeSource,
};
use crate::overlay::types::{DisplayInfo, Theme, WorkArea};

/// Label of the host application's main window
const MAIN_WINDOW_LABEL: &str = "main";

/// Used when no monitor can be queried
const FALLBACK_WORK_AREA: WorkArea = WorkArea {
    x: 0,
    y: 0,
    width: 1920,
    height: 1080,
};

/// Payload of `overlay://login`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginPayload {
    pub chat: Option<StreamingPlatform>,
    pub recent_events: Option<RecentEventsLink>,
}

pub struct DesktopSession {
    app: AppHandle,
    logged_in: AtomicBool,
    chat: RwLock<Option<StreamingPlatform>>,
    recent_events: RwLock<Option<RecentEventsLink>>,
}

impl DesktopSession {
    pub fn new(app: AppHandle) -> Self {
        Self {
            app,
            logged_in: AtomicBool::new(false),
            chat: RwLock::new(None),
            recent_events: RwLock::new(None),
        }
    }

    pub fn log_in(&self, payload: LoginPayload) {
        *self.chat.write() = payload.chat;
        *self.recent_events.write() = payload.recent_events;
        self.logged_in.store(true, Ordering::SeqCst);
    }

    pub fn log_out(&self) {
        self.logged_in.store(false, Ordering::SeqCst);
        *self.chat.write() = None;
        *self.recent_events.write() = None;
    }
}

impl AuthProvider for DesktopSession {
    fn is_logged_in(&self) -> bool {
        self.logged_in.load(Ordering::SeqCst)
    }
}

impl ChatUrlResolver for DesktopSession {
    fn chat_url(&self, theme: Theme) -> OverlayResult<String> {
        self.chat
            .read()
            .as_ref()
            .context("No streaming platform connected")?
            .chat_url(theme)
    }
}

impl RecentEventsSource for DesktopSession {
    fn recent_events_url(&self, theme: Theme) -> OverlayResult<String> {
        self.recent_events
            .read()
            .as_ref()
            .context("No recent events widget token")?
            .recent_events_url(theme)
    }
}

impl DisplayProvider for DesktopSession {
    fn current_display(&self) -> DisplayInfo {
        let monitor = self
            .app
            .get_webview_window(MAIN_WINDOW_LABEL)
            .and_then(|w| w.current_monitor().ok().flatten())
            .or_else(|| self.app.primary_monitor().ok().flatten());

        let work_area = monitor
            .map(|m| {
                let area = m.work_area();
                WorkArea {
                    x: area.position.x,
                    y: area.position.y,
                    width: area.size.width,
                    height: area.size.height,
                }
            })
            .unwrap_or(FALLBACK_WORK_AREA);

        DisplayInfo { work_area }
    }
}

impl ThemeSource for DesktopSession {
    fn theme(&self) -> Theme {
        match self
            .app
            .get_webview_window(MAIN_WINDOW_LABEL)
            .and_then(|w| w.theme().ok())
        {
            Some(tauri::Theme::Light) => Theme::Day,
            _ => Theme::Night,
        }
    }
}
