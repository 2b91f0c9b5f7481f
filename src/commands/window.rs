//! Webview-backed overlay surfaces.
//!
//! Each surface is a hidden, frameless, always-on-top webview window. Page
//! load completion is reported through the surface's `ReadySignal`; the
//! window is only ever shown without activation so the game keeps focus.

use std::path::PathBuf;

use raw_window_handle::HasWindowHandle;
use tauri::webview::PageLoadEvent;
use tauri::{AppHandle, Manager, WebviewUrl, WebviewWindow, WebviewWindowBuilder};

use crate::error::{OverlayError, OverlayResult};
use crate::overlay::surface::{ReadySignal, SurfaceSpec, SurfaceWindow, WindowFactory};
use crate::overlay::types::{Bounds, NativeHandle, SurfaceRole};

// ============================================================================
// Physical Coordinate Helpers
// ============================================================================
// Compositor coordinates are physical pixels; Tauri's builder sizes are
// logical and drift on scaled displays.

fn set_physical_bounds(window: &WebviewWindow, bounds: Bounds) -> OverlayResult<()> {
    window
        .set_position(tauri::Position::Physical(tauri::PhysicalPosition {
            x: bounds.x,
            y: bounds.y,
        }))
        .map_err(|e| OverlayError::WindowError(format!("Failed to set position: {}", e)))?;
    window
        .set_size(tauri::Size::Physical(tauri::PhysicalSize {
            width: bounds.width,
            height: bounds.height,
        }))
        .map_err(|e| OverlayError::WindowError(format!("Failed to set size: {}", e)))
}

/// Remote content loads as-is; anything else is a page bundled with the app.
fn webview_url(url: &str) -> OverlayResult<WebviewUrl> {
    if url.starts_with("http://") || url.starts_with("https://") {
        let parsed = url
            .parse::<tauri::Url>()
            .map_err(|e| OverlayError::Other(format!("Invalid surface URL {}: {}", url, e)))?;
        Ok(WebviewUrl::External(parsed))
    } else {
        Ok(WebviewUrl::App(PathBuf::from(url)))
    }
}

// ============================================================================
// Factory
// ============================================================================

pub struct TauriWindowFactory {
    app: AppHandle,
}

impl TauriWindowFactory {
    pub fn new(app: AppHandle) -> Self {
        Self { app }
    }
}

impl WindowFactory for TauriWindowFactory {
    fn create(
        &self,
        spec: &SurfaceSpec,
        ready: ReadySignal,
    ) -> OverlayResult<Box<dyn SurfaceWindow>> {
        let role = spec.role;
        let label = role.label();

        // A window left over from a crashed session would make the build fail
        if let Some(stale) = self.app.get_webview_window(label) {
            log::warn!("[OVERLAY_WINDOW] Destroying stale {} window", role);
            let _ = stale.destroy();
        }

        let window = WebviewWindowBuilder::new(&self.app, label, webview_url(&spec.url)?)
            .title("")
            .inner_size(spec.bounds.width as f64, spec.bounds.height as f64)
            .decorations(false)
            .always_on_top(true)
            .skip_taskbar(true)
            .resizable(true)
            .shadow(false)
            .visible(false) // Shown only once registered
            .focused(false) // Never steal focus from the game
            .on_page_load(move |_window, payload| {
                if matches!(payload.event(), PageLoadEvent::Finished) {
                    ready.notify();
                }
            })
            .build()
            .map_err(|e| OverlayError::WindowCreation {
                role,
                reason: e.to_string(),
            })?;

        if let Err(e) = set_physical_bounds(&window, spec.bounds) {
            log::warn!("[OVERLAY_WINDOW] {} window keeps builder bounds: {}", role, e);
        }

        log::info!(
            "[OVERLAY_WINDOW] Created {} window at ({}, {}) {}x{}",
            role,
            spec.bounds.x,
            spec.bounds.y,
            spec.bounds.width,
            spec.bounds.height
        );

        Ok(Box::new(TauriSurfaceWindow { role, window }))
    }
}

// ============================================================================
// Surface Window
// ============================================================================

pub struct TauriSurfaceWindow {
    role: SurfaceRole,
    window: WebviewWindow,
}

impl TauriSurfaceWindow {
    fn window_err(&self, action: &str, e: impl std::fmt::Display) -> OverlayError {
        OverlayError::WindowError(format!("{} {} window: {}", action, self.role, e))
    }
}

impl SurfaceWindow for TauriSurfaceWindow {
    fn native_handle(&self) -> OverlayResult<NativeHandle> {
        let handle = self
            .window
            .window_handle()
            .map_err(|e| self.window_err("No native handle for", e))?;
        NativeHandle::try_from(handle.as_raw())
    }

    fn show_inactive(&self) -> OverlayResult<()> {
        #[cfg(target_os = "windows")]
        {
            use windows::Win32::Foundation::HWND;
            use windows::Win32::UI::WindowsAndMessaging::{ShowWindow, SW_SHOWNOACTIVATE};

            let hwnd = self
                .window
                .hwnd()
                .map_err(|e| self.window_err("Failed to get HWND of", e))?;
            unsafe {
                let _ = ShowWindow(HWND(hwnd.0), SW_SHOWNOACTIVATE);
            }
            Ok(())
        }

        #[cfg(not(target_os = "windows"))]
        {
            self.window
                .show()
                .map_err(|e| self.window_err("Failed to show", e))
        }
    }

    fn hide(&self) -> OverlayResult<()> {
        self.window
            .hide()
            .map_err(|e| self.window_err("Failed to hide", e))
    }

    fn bounds(&self) -> OverlayResult<Bounds> {
        let position = self
            .window
            .outer_position()
            .map_err(|e| self.window_err("Failed to read position of", e))?;
        let size = self
            .window
            .outer_size()
            .map_err(|e| self.window_err("Failed to read size of", e))?;
        Ok(Bounds::new(position.x, position.y, size.width, size.height))
    }

    fn reload(&self) -> OverlayResult<()> {
        self.window
            .eval("window.location.reload()")
            .map_err(|e| self.window_err("Failed to reload", e))
    }

    fn destroy(&self) -> OverlayResult<()> {
        self.window
            .destroy()
            .map_err(|e| self.window_err("Failed to destroy", e))
    }
}
