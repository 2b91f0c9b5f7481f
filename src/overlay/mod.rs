//! In-game overlay lifecycle.
//!
//! ## Architecture
//!
//! ```text
//! overlay/
//!   types.rs        - Roles, geometry, handles, session record, lifecycle table
//!   readiness.rs    - ReadinessAggregator: collects load signals, settles, fires once
//!   surface.rs      - SurfaceWindow/WindowFactory seams, SurfaceSet, initial layout
//!   compositor/     - CompositorClient over the native overlay SDK
//!   providers.rs    - Auth, chat URL, recent events, display and theme sources
//!   store.rs        - SessionStore persistence
//!   orchestrator.rs - OverlayOrchestrator: enable/disable, activation, show/hide, teardown
//! ```
//!
//! A session goes `Disabled -> Enabling -> WaitingForReadiness -> Active ->
//! Disabling -> Disabled`. Windows are created hidden; once every one of them
//! has finished loading (plus a settling delay) they are shown without
//! focus, registered with the compositor in fixed order, positioned, made
//! opaque and hidden again until the user toggles the overlay on.

pub mod compositor;
pub mod orchestrator;
pub mod providers;
pub mod readiness;
pub mod store;
pub mod surface;
pub mod types;

#[cfg(test)]
mod testing;

pub use compositor::{CompositorClient, DylibSdk, NativeCompositor, OverlaySdk};
pub use orchestrator::{OverlayDeps, OverlayOrchestrator, SessionActivation};
pub use providers::{
    AuthProvider, ChatUrlResolver, DisplayProvider, RecentEventsLink, RecentEventsSource,
    StreamingPlatform, ThemeSource,
};
pub use readiness::{ReadinessAggregator, ReadinessState, SignalOutcome};
pub use store::{JsonFileSessionStore, MemorySessionStore, SessionStore};
pub use surface::{ReadySignal, SurfaceSpec, SurfaceWindow, WindowFactory};
pub use types::{
    Bounds, CompositorStatus, DisplayInfo, NativeHandle, OverlayLifecycle, OverlaySession,
    OverlaySnapshot, Registration, SessionEvent, SurfaceId, SurfaceRole, Theme, Visibility,
    WorkArea,
};
