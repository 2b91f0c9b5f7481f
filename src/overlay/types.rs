//! Type definitions for the overlay lifecycle.
//!
//! Roles, geometry, native handles, compositor identifiers, the persisted
//! session record and the lifecycle state machine.

use std::fmt;

use raw_window_handle::RawWindowHandle;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{OverlayError, OverlayResult};

// ============================================================================
// Constants
// ============================================================================

/// Transparency value applied to every surface once registered (fully opaque)
pub const OPAQUE: u8 = 255;

/// Sentinel the native SDK returns instead of a surface id on failure
pub const INVALID_SURFACE_ID: i32 = -1;

// ============================================================================
// Surface Roles
// ============================================================================

/// The closed set of windows an overlay session owns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SurfaceRole {
    RecentEvents,
    Chat,
    ControlPanel,
}

impl SurfaceRole {
    /// Registration order. Fixed so compositor z-order does not depend on
    /// which page happened to load first.
    pub const ALL: [SurfaceRole; 3] = [
        SurfaceRole::RecentEvents,
        SurfaceRole::Chat,
        SurfaceRole::ControlPanel,
    ];

    /// Window label used by the desktop shell
    pub fn label(self) -> &'static str {
        match self {
            SurfaceRole::RecentEvents => "overlay-recent-events",
            SurfaceRole::Chat => "overlay-chat",
            SurfaceRole::ControlPanel => "overlay-controls",
        }
    }
}

impl fmt::Display for SurfaceRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SurfaceRole::RecentEvents => write!(f, "recent-events"),
            SurfaceRole::Chat => write!(f, "chat"),
            SurfaceRole::ControlPanel => write!(f, "control-panel"),
        }
    }
}

// ============================================================================
// Geometry
// ============================================================================

/// On-screen rectangle of a surface in physical pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bounds {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Bounds {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// Display area not covered by the taskbar, in physical pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorkArea {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

/// Display the main window currently lives on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DisplayInfo {
    pub work_area: WorkArea,
}

// ============================================================================
// Native Handles & Compositor Ids
// ============================================================================

/// Opaque native window handle (HWND on Windows, XID on X11).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NativeHandle(pub isize);

impl TryFrom<RawWindowHandle> for NativeHandle {
    type Error = OverlayError;

    fn try_from(raw: RawWindowHandle) -> OverlayResult<Self> {
        match raw {
            RawWindowHandle::Win32(h) => Ok(NativeHandle(h.hwnd.get())),
            RawWindowHandle::Xlib(h) => Ok(NativeHandle(h.window as isize)),
            RawWindowHandle::Xcb(h) => Ok(NativeHandle(h.window.get() as isize)),
            other => Err(OverlayError::WindowError(format!(
                "Unsupported window handle for compositor capture: {:?}",
                other
            ))),
        }
    }
}

/// Identifier the compositor assigns to a registered surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SurfaceId(pub i32);

/// Result of registering a window with the compositor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Registration {
    Registered(SurfaceId),
    Invalid,
}

impl Registration {
    /// Map the SDK's raw return value, treating the sentinel (and any other
    /// negative value) as a failure.
    pub fn from_raw(raw: i32) -> Self {
        if raw == INVALID_SURFACE_ID || raw < 0 {
            Registration::Invalid
        } else {
            Registration::Registered(SurfaceId(raw))
        }
    }
}

/// Compositor thread health.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CompositorStatus {
    Running,
    Stopped,
    Error,
}

impl CompositorStatus {
    /// Normalize a raw status string from the SDK.
    ///
    /// The SDK hands back C strings that may carry NUL terminators, padding
    /// and line endings. Anything unrecognized is treated as `Error`.
    pub fn parse(raw: &str) -> Self {
        let cleaned = raw
            .trim_matches(|c: char| c == '\0' || c.is_whitespace())
            .to_ascii_lowercase();
        match cleaned.as_str() {
            "running" | "started" => CompositorStatus::Running,
            "stopped" | "idle" | "" => CompositorStatus::Stopped,
            _ => CompositorStatus::Error,
        }
    }
}

/// A live compositor registration for one surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompositorRegistration {
    pub surface_id: SurfaceId,
    pub transparency: u8,
}

// ============================================================================
// Persisted Session
// ============================================================================

/// User-facing overlay state that survives restarts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "overlay/")]
pub struct OverlaySession {
    pub is_enabled: bool,
    pub is_showing: bool,
    pub is_preview_enabled: bool,
}

impl Default for OverlaySession {
    fn default() -> Self {
        Self {
            is_enabled: false,
            is_showing: false,
            is_preview_enabled: true,
        }
    }
}

// ============================================================================
// Lifecycle
// ============================================================================

/// Whether registered surfaces are currently composited into the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Visibility {
    Hidden,
    Showing,
}

/// Overlay session lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "state", content = "visibility")]
pub enum OverlayLifecycle {
    Disabled,
    Enabling,
    WaitingForReadiness,
    Active(Visibility),
    Disabling,
}

impl OverlayLifecycle {
    pub fn is_active(self) -> bool {
        matches!(self, Self::Active(_))
    }

    /// True while windows may exist (anything except Disabled)
    pub fn is_live(self) -> bool {
        !matches!(self, Self::Disabled)
    }
}

pub fn can_transition(from: OverlayLifecycle, to: OverlayLifecycle) -> bool {
    use OverlayLifecycle::*;

    matches!(
        (from, to),
        (Disabled, Enabling)
            | (Enabling, WaitingForReadiness)
            | (Enabling, Disabled)
            | (Enabling, Disabling)
            | (WaitingForReadiness, Active(Visibility::Hidden))
            | (WaitingForReadiness, Disabled)
            | (WaitingForReadiness, Disabling)
            | (Active(_), Active(_))
            | (Active(_), Disabling)
            | (Disabling, Disabled)
    ) || from == to
}

/// Snapshot broadcast to observers whenever the lifecycle or session changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverlaySnapshot {
    pub lifecycle: OverlayLifecycle,
    pub session: OverlaySession,
}

/// Theme the panels are rendered in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Theme {
    Day,
    #[default]
    Night,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Day => "day",
            Theme::Night => "night",
        }
    }
}

/// Login/logout/shutdown notifications the orchestrator reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    LoggedIn,
    LoggedOut,
    Shutdown,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registration_sentinel_is_invalid() {
        assert_eq!(Registration::from_raw(-1), Registration::Invalid);
        assert_eq!(Registration::from_raw(-7), Registration::Invalid);
        assert_eq!(
            Registration::from_raw(0),
            Registration::Registered(SurfaceId(0))
        );
        assert_eq!(
            Registration::from_raw(12),
            Registration::Registered(SurfaceId(12))
        );
    }

    #[test]
    fn status_strips_transport_noise() {
        assert_eq!(CompositorStatus::parse("running\0"), CompositorStatus::Running);
        assert_eq!(CompositorStatus::parse(" Running\r\n\0\0"), CompositorStatus::Running);
        assert_eq!(CompositorStatus::parse("stopped\n"), CompositorStatus::Stopped);
        assert_eq!(CompositorStatus::parse("\0"), CompositorStatus::Stopped);
        assert_eq!(CompositorStatus::parse("crashed"), CompositorStatus::Error);
    }

    #[test]
    fn session_defaults_match_first_run() {
        let session = OverlaySession::default();
        assert!(!session.is_enabled);
        assert!(!session.is_showing);
        assert!(session.is_preview_enabled);
    }

    #[test]
    fn session_serializes_camel_case() {
        let json = serde_json::to_value(OverlaySession::default()).unwrap();
        assert_eq!(json["isEnabled"], false);
        assert_eq!(json["isShowing"], false);
        assert_eq!(json["isPreviewEnabled"], true);
    }

    #[test]
    fn lifecycle_happy_path_is_allowed() {
        use OverlayLifecycle::*;
        let path = [
            Disabled,
            Enabling,
            WaitingForReadiness,
            Active(Visibility::Hidden),
            Active(Visibility::Showing),
            Disabling,
            Disabled,
        ];
        for pair in path.windows(2) {
            assert!(can_transition(pair[0], pair[1]), "{:?}", pair);
        }
    }

    #[test]
    fn lifecycle_rejects_shortcuts() {
        use OverlayLifecycle::*;
        assert!(!can_transition(Disabled, Active(Visibility::Hidden)));
        assert!(!can_transition(Disabled, WaitingForReadiness));
        assert!(!can_transition(Enabling, Active(Visibility::Showing)));
        assert!(!can_transition(Active(Visibility::Hidden), Disabled));
        assert!(!can_transition(Disabling, Enabling));
    }

    #[test]
    fn role_order_and_labels() {
        assert_eq!(SurfaceRole::ALL[0], SurfaceRole::RecentEvents);
        assert_eq!(SurfaceRole::ALL[2], SurfaceRole::ControlPanel);
        assert_eq!(SurfaceRole::Chat.label(), "overlay-chat");
    }

    #[test]
    fn xlib_handle_converts() {
        let raw = RawWindowHandle::Xlib(raw_window_handle::XlibWindowHandle::new(0x2a));
        assert_eq!(NativeHandle::try_from(raw).unwrap(), NativeHandle(0x2a));
    }
}
