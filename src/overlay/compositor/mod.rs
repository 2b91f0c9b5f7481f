//! Compositor client.
//!
//! ## Architecture
//!
//! ```text
//! compositor/
//!   mod.rs    - CompositorClient trait (what the orchestrator talks to)
//!   native.rs - NativeCompositor: lifecycle + registration bookkeeping over a raw SDK
//!   dylib.rs  - DylibSdk: raw SDK loaded from the vendor dynamic library
//! ```
//!
//! The compositor is one process-wide resource. It is constructed once at
//! startup and injected into the orchestrator as `Arc<dyn CompositorClient>`,
//! which is also the seam tests use to substitute a fake.

pub mod dylib;
pub mod native;

pub use dylib::DylibSdk;
pub use native::{NativeCompositor, OverlaySdk};

use super::types::{Bounds, CompositorStatus, NativeHandle, Registration, SurfaceId};
use crate::error::OverlayResult;

/// Operations the orchestrator needs from the native overlay compositor.
///
/// Implementations normalize raw SDK values into the typed results here;
/// sentinels and status strings never cross this boundary.
pub trait CompositorClient: Send + Sync {
    /// Start the compositor thread. Safe to call when already started.
    fn start(&self) -> OverlayResult<()>;

    /// Stop the compositor thread and drop every registration. Idempotent.
    fn stop(&self);

    /// Add a window as a capture target.
    fn register(&self, handle: NativeHandle) -> Registration;

    /// Remove a capture target. No-op when stopped or for unknown ids.
    fn unregister(&self, id: SurfaceId) -> OverlayResult<()>;

    /// Project a surface at the given screen rectangle. Stale ids are ignored.
    fn set_position(&self, id: SurfaceId, bounds: Bounds);

    /// Set a surface's alpha (0-255). Stale ids are ignored.
    fn set_transparency(&self, id: SurfaceId, alpha: u8);

    /// Show every registered surface.
    fn show_all(&self);

    /// Hide every registered surface.
    fn hide_all(&self);

    /// Synchronous health probe.
    fn status(&self) -> CompositorStatus;
}
