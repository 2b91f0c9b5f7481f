//! Lifecycle and registration bookkeeping over the raw overlay SDK.

use std::collections::HashMap;

use parking_lot::Mutex;

use super::CompositorClient;
use crate::error::{OverlayError, OverlayResult};
use crate::overlay::types::{
    Bounds, CompositorStatus, NativeHandle, Registration, SurfaceId,
};

/// Raw calls exposed by the native overlay SDK.
///
/// Return values are the SDK's own: `0` for success, negative for failure,
/// `-1` from `add_window` when a window cannot be captured.
pub trait OverlaySdk: Send {
    fn start(&mut self) -> i32;
    fn stop(&mut self);
    fn add_window(&mut self, handle: isize) -> i32;
    fn remove_window(&mut self, id: i32) -> i32;
    fn set_position(&mut self, id: i32, x: i32, y: i32, width: i32, height: i32) -> i32;
    fn set_transparency(&mut self, id: i32, alpha: i32) -> i32;
    fn show(&mut self);
    fn hide(&mut self);
    fn status(&mut self) -> String;
}

struct NativeState<S> {
    sdk: S,
    started: bool,
    /// Live registrations (surface id -> window handle)
    live: HashMap<SurfaceId, NativeHandle>,
}

/// `CompositorClient` backed by a raw SDK.
///
/// Tracks which surfaces are live so stale ids never reach the SDK, makes
/// start/stop idempotent, and refuses a second registration for a handle
/// that is already captured.
pub struct NativeCompositor<S: OverlaySdk> {
    inner: Mutex<NativeState<S>>,
}

impl<S: OverlaySdk> NativeCompositor<S> {
    pub fn new(sdk: S) -> Self {
        Self {
            inner: Mutex::new(NativeState {
                sdk,
                started: false,
                live: HashMap::new(),
            }),
        }
    }

    pub fn is_started(&self) -> bool {
        self.inner.lock().started
    }

    /// Number of live registrations.
    pub fn live_count(&self) -> usize {
        self.inner.lock().live.len()
    }
}

impl<S: OverlaySdk> CompositorClient for NativeCompositor<S> {
    fn start(&self) -> OverlayResult<()> {
        let mut state = self.inner.lock();
        if state.started {
            log::debug!("[COMPOSITOR] Already started");
            return Ok(());
        }

        let code = state.sdk.start();
        if code < 0 {
            return Err(OverlayError::CompositorError(format!(
                "Compositor failed to start (code {})",
                code
            )));
        }

        state.started = true;
        log::info!("[COMPOSITOR] Started");
        Ok(())
    }

    fn stop(&self) {
        let mut state = self.inner.lock();
        if !state.started {
            return;
        }

        state.sdk.stop();
        state.started = false;
        let dropped = state.live.len();
        state.live.clear();
        log::info!(
            "[COMPOSITOR] Stopped ({} registrations invalidated)",
            dropped
        );
    }

    fn register(&self, handle: NativeHandle) -> Registration {
        let mut state = self.inner.lock();
        if !state.started {
            log::warn!("[COMPOSITOR] Register {:?} while stopped", handle);
            return Registration::Invalid;
        }

        if state.live.values().any(|live| *live == handle) {
            log::warn!("[COMPOSITOR] Window {:?} is already registered", handle);
            return Registration::Invalid;
        }

        let registration = Registration::from_raw(state.sdk.add_window(handle.0));
        match registration {
            Registration::Registered(id) => {
                state.live.insert(id, handle);
                log::debug!("[COMPOSITOR] Registered {:?} as {:?}", handle, id);
            },
            Registration::Invalid => {
                log::warn!("[COMPOSITOR] SDK rejected window {:?}", handle);
            },
        }
        registration
    }

    fn unregister(&self, id: SurfaceId) -> OverlayResult<()> {
        let mut state = self.inner.lock();
        if !state.started || !state.live.contains_key(&id) {
            log::debug!("[COMPOSITOR] Unregister of stale {:?} ignored", id);
            return Ok(());
        }

        let code = state.sdk.remove_window(id.0);
        if code < 0 {
            return Err(OverlayError::CompositorError(format!(
                "Failed to remove surface {} (code {})",
                id.0, code
            )));
        }

        state.live.remove(&id);
        Ok(())
    }

    fn set_position(&self, id: SurfaceId, bounds: Bounds) {
        let mut state = self.inner.lock();
        if !state.live.contains_key(&id) {
            log::debug!("[COMPOSITOR] set_position on stale {:?} ignored", id);
            return;
        }

        let code = state.sdk.set_position(
            id.0,
            bounds.x,
            bounds.y,
            clamp_extent(bounds.width),
            clamp_extent(bounds.height),
        );
        if code < 0 {
            log::warn!(
                "[COMPOSITOR] set_position({:?}) failed with code {}",
                id,
                code
            );
        }
    }

    fn set_transparency(&self, id: SurfaceId, alpha: u8) {
        let mut state = self.inner.lock();
        if !state.live.contains_key(&id) {
            log::debug!("[COMPOSITOR] set_transparency on stale {:?} ignored", id);
            return;
        }

        let code = state.sdk.set_transparency(id.0, alpha as i32);
        if code < 0 {
            log::warn!(
                "[COMPOSITOR] set_transparency({:?}) failed with code {}",
                id,
                code
            );
        }
    }

    fn show_all(&self) {
        let mut state = self.inner.lock();
        if state.started {
            state.sdk.show();
        }
    }

    fn hide_all(&self) {
        let mut state = self.inner.lock();
        if state.started {
            state.sdk.hide();
        }
    }

    fn status(&self) -> CompositorStatus {
        let mut state = self.inner.lock();
        let raw = state.sdk.status();
        CompositorStatus::parse(&raw)
    }
}

/// SDK extents are `i32`; saturate instead of wrapping.
fn clamp_extent(extent: u32) -> i32 {
    i32::try_from(extent).unwrap_or(i32::MAX)
}
