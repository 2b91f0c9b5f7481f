//! Surface windows and their per-session bookkeeping.
//!
//! A surface is one OS window with one embedded web view. The orchestrator
//! creates them through a [`WindowFactory`], which hands each window a
//! [`ReadySignal`] to fire whenever its content finishes loading.

use tokio::sync::mpsc::UnboundedSender;

use super::types::{
    Bounds, CompositorRegistration, DisplayInfo, NativeHandle, SurfaceRole, Theme,
};
use crate::error::{OverlayError, OverlayResult};

// ============================================================================
// Window Abstraction
// ============================================================================

/// One OS window plus its embedded content view.
pub trait SurfaceWindow: Send {
    /// Native handle the compositor captures.
    fn native_handle(&self) -> OverlayResult<NativeHandle>;

    /// Make the window visible without stealing focus from the game.
    fn show_inactive(&self) -> OverlayResult<()>;

    fn hide(&self) -> OverlayResult<()>;

    /// Current on-screen rectangle in physical pixels.
    fn bounds(&self) -> OverlayResult<Bounds>;

    /// Reload the content view.
    fn reload(&self) -> OverlayResult<()>;

    fn destroy(&self) -> OverlayResult<()>;
}

/// Everything a factory needs to build one surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurfaceSpec {
    pub role: SurfaceRole,
    pub url: String,
    pub bounds: Bounds,
    pub theme: Theme,
}

/// Creates surface windows. Creation must not block on content loading;
/// load completion is reported through the `ReadySignal`.
pub trait WindowFactory: Send + Sync {
    fn create(&self, spec: &SurfaceSpec, ready: ReadySignal)
        -> OverlayResult<Box<dyn SurfaceWindow>>;
}

// ============================================================================
// Readiness Signal
// ============================================================================

/// "Content finished loading" notifier handed to each window.
///
/// Firing after the session has settled (or been torn down) is harmless:
/// the receiving side is gone and the signal is dropped.
#[derive(Debug, Clone)]
pub struct ReadySignal {
    role: SurfaceRole,
    tx: UnboundedSender<SurfaceRole>,
}

impl ReadySignal {
    pub fn new(role: SurfaceRole, tx: UnboundedSender<SurfaceRole>) -> Self {
        Self { role, tx }
    }

    pub fn notify(&self) {
        if self.tx.send(self.role).is_err() {
            log::debug!("[SURFACE] {} load signal after session settled", self.role);
        }
    }
}

// ============================================================================
// Descriptors
// ============================================================================

/// A created surface and its compositor registration (if any).
pub struct SurfaceDescriptor {
    pub role: SurfaceRole,
    pub content_url: String,
    pub bounds: Bounds,
    pub native_handle: Option<NativeHandle>,
    registration: Option<CompositorRegistration>,
    window: Box<dyn SurfaceWindow>,
}

impl SurfaceDescriptor {
    pub fn new(spec: &SurfaceSpec, window: Box<dyn SurfaceWindow>) -> Self {
        Self {
            role: spec.role,
            content_url: spec.url.clone(),
            bounds: spec.bounds,
            native_handle: None,
            registration: None,
            window,
        }
    }

    pub fn window(&self) -> &dyn SurfaceWindow {
        self.window.as_ref()
    }

    pub fn registration(&self) -> Option<CompositorRegistration> {
        self.registration
    }

    pub fn is_registered(&self) -> bool {
        self.registration.is_some()
    }

    /// Record a new registration. A surface holds at most one.
    pub fn attach_registration(&mut self, registration: CompositorRegistration) -> OverlayResult<()> {
        if self.registration.is_some() {
            return Err(OverlayError::AlreadyRegistered { role: self.role });
        }
        self.registration = Some(registration);
        Ok(())
    }

    pub fn set_transparency(&mut self, alpha: u8) {
        if let Some(registration) = self.registration.as_mut() {
            registration.transparency = alpha;
        }
    }

    pub fn take_registration(&mut self) -> Option<CompositorRegistration> {
        self.registration.take()
    }
}

/// The surfaces of one session, one slot per role.
#[derive(Default)]
pub struct SurfaceSet {
    recent_events: Option<SurfaceDescriptor>,
    chat: Option<SurfaceDescriptor>,
    control_panel: Option<SurfaceDescriptor>,
}

impl SurfaceSet {
    fn slot(&mut self, role: SurfaceRole) -> &mut Option<SurfaceDescriptor> {
        match role {
            SurfaceRole::RecentEvents => &mut self.recent_events,
            SurfaceRole::Chat => &mut self.chat,
            SurfaceRole::ControlPanel => &mut self.control_panel,
        }
    }

    /// Store a descriptor, returning the one it replaced.
    pub fn insert(&mut self, descriptor: SurfaceDescriptor) -> Option<SurfaceDescriptor> {
        self.slot(descriptor.role).replace(descriptor)
    }

    pub fn get(&self, role: SurfaceRole) -> Option<&SurfaceDescriptor> {
        match role {
            SurfaceRole::RecentEvents => self.recent_events.as_ref(),
            SurfaceRole::Chat => self.chat.as_ref(),
            SurfaceRole::ControlPanel => self.control_panel.as_ref(),
        }
    }

    pub fn get_mut(&mut self, role: SurfaceRole) -> Option<&mut SurfaceDescriptor> {
        self.slot(role).as_mut()
    }

    /// Descriptors in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &SurfaceDescriptor> {
        [&self.recent_events, &self.chat, &self.control_panel]
            .into_iter()
            .filter_map(|slot| slot.as_ref())
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut SurfaceDescriptor> {
        [
            &mut self.recent_events,
            &mut self.chat,
            &mut self.control_panel,
        ]
        .into_iter()
        .filter_map(|slot| slot.as_mut())
    }

    /// Remove every descriptor, in registration order.
    pub fn take_all(&mut self) -> Vec<SurfaceDescriptor> {
        SurfaceRole::ALL
            .iter()
            .filter_map(|role| self.slot(*role).take())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn registered_count(&self) -> usize {
        self.iter().filter(|d| d.is_registered()).count()
    }
}

// ============================================================================
// Initial Layout
// ============================================================================

/// Recent events panel size
const RECENT_EVENTS_SIZE: (u32, u32) = (600, 300);
/// Chat panel size
const CHAT_SIZE: (u32, u32) = (300, 600);
/// Control panel size
const CONTROL_PANEL_SIZE: (u32, u32) = (600, 300);

/// Initial window rectangles, arranged around a container origin derived
/// from the current display's work area.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceLayout {
    pub origin: (i32, i32),
}

impl SurfaceLayout {
    pub fn from_display(display: DisplayInfo) -> Self {
        let area = display.work_area;
        let x = area.x + (area.width / 2) as i32 + 200;
        let y = area.y + (area.height / 2) as i32 - 300;
        Self { origin: (x, y) }
    }

    /// Recent events sits left of the chat, the control panel below it.
    pub fn bounds_for(&self, role: SurfaceRole) -> Bounds {
        let (x, y) = self.origin;
        match role {
            SurfaceRole::RecentEvents => {
                let (w, h) = RECENT_EVENTS_SIZE;
                Bounds::new(x - w as i32, y, w, h)
            },
            SurfaceRole::Chat => {
                let (w, h) = CHAT_SIZE;
                Bounds::new(x, y, w, h)
            },
            SurfaceRole::ControlPanel => {
                let (w, h) = CONTROL_PANEL_SIZE;
                Bounds::new(x - w as i32, y + RECENT_EVENTS_SIZE.1 as i32, w, h)
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::overlay::types::{SurfaceId, WorkArea};
    use tokio::sync::mpsc;

    struct NullWindow;

    impl SurfaceWindow for NullWindow {
        fn native_handle(&self) -> OverlayResult<NativeHandle> {
            Ok(NativeHandle(1))
        }
        fn show_inactive(&self) -> OverlayResult<()> {
            Ok(())
        }
        fn hide(&self) -> OverlayResult<()> {
            Ok(())
        }
        fn bounds(&self) -> OverlayResult<Bounds> {
            Ok(Bounds::default())
        }
        fn reload(&self) -> OverlayResult<()> {
            Ok(())
        }
        fn destroy(&self) -> OverlayResult<()> {
            Ok(())
        }
    }

    fn descriptor(role: SurfaceRole) -> SurfaceDescriptor {
        let spec = SurfaceSpec {
            role,
            url: format!("https://example.test/{}", role),
            bounds: Bounds::default(),
            theme: Theme::Night,
        };
        SurfaceDescriptor::new(&spec, Box::new(NullWindow))
    }

    #[test]
    fn second_registration_is_rejected() {
        let mut d = descriptor(SurfaceRole::Chat);
        let reg = CompositorRegistration {
            surface_id: SurfaceId(1),
            transparency: 255,
        };
        d.attach_registration(reg).unwrap();
        assert!(matches!(
            d.attach_registration(reg),
            Err(OverlayError::AlreadyRegistered { role: SurfaceRole::Chat })
        ));

        assert_eq!(d.take_registration(), Some(reg));
        d.attach_registration(reg).unwrap();
    }

    #[test]
    fn set_iterates_in_registration_order() {
        let mut set = SurfaceSet::default();
        set.insert(descriptor(SurfaceRole::ControlPanel));
        set.insert(descriptor(SurfaceRole::RecentEvents));
        set.insert(descriptor(SurfaceRole::Chat));

        let order: Vec<_> = set.iter().map(|d| d.role).collect();
        assert_eq!(order, SurfaceRole::ALL.to_vec());
        assert_eq!(set.len(), 3);

        let drained: Vec<_> = set.take_all().into_iter().map(|d| d.role).collect();
        assert_eq!(drained, SurfaceRole::ALL.to_vec());
        assert!(set.is_empty());
    }

    #[test]
    fn insert_replaces_same_role() {
        let mut set = SurfaceSet::default();
        assert!(set.insert(descriptor(SurfaceRole::Chat)).is_none());
        assert!(set.insert(descriptor(SurfaceRole::Chat)).is_some());
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn ready_signal_survives_closed_receiver() {
        let (tx, rx) = mpsc::unbounded_channel();
        let signal = ReadySignal::new(SurfaceRole::Chat, tx);
        drop(rx);
        signal.notify();
    }

    #[test]
    fn layout_is_derived_from_work_area() {
        let layout = SurfaceLayout::from_display(DisplayInfo {
            work_area: WorkArea {
                x: 0,
                y: 0,
                width: 1920,
                height: 1040,
            },
        });
        assert_eq!(layout.origin, (1160, 220));
        assert_eq!(
            layout.bounds_for(SurfaceRole::RecentEvents),
            Bounds::new(560, 220, 600, 300)
        );
        assert_eq!(
            layout.bounds_for(SurfaceRole::Chat),
            Bounds::new(1160, 220, 300, 600)
        );
        assert_eq!(
            layout.bounds_for(SurfaceRole::ControlPanel),
            Bounds::new(560, 520, 600, 300)
        );
    }

    #[test]
    fn layout_follows_work_area_origin() {
        // Taskbar docked on the left of a monitor placed right of the primary one
        let layout = SurfaceLayout::from_display(DisplayInfo {
            work_area: WorkArea {
                x: 1980,
                y: 0,
                width: 1860,
                height: 1080,
            },
        });
        assert_eq!(layout.origin, (1980 + 930 + 200, 240));
        assert_eq!(
            layout.bounds_for(SurfaceRole::RecentEvents),
            Bounds::new(2510, 240, 600, 300)
        );
    }
}
