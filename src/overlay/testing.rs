//! In-process fakes for every orchestrator collaborator.

use std::collections::HashMap;
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use super::compositor::CompositorClient;
use super::orchestrator::{OverlayDeps, OverlayOrchestrator};
use super::providers::{
    AuthProvider, ChatUrlResolver, DisplayProvider, RecentEventsLink, StreamingPlatform,
    ThemeSource,
};
use super::store::{MemorySessionStore, SessionStore};
use super::surface::{ReadySignal, SurfaceSpec, SurfaceWindow, WindowFactory};
use super::types::{
    Bounds, CompositorStatus, DisplayInfo, NativeHandle, OverlaySession, Registration, SurfaceId,
    SurfaceRole, Theme, WorkArea,
};
use crate::config::OverlayConfig;
use crate::error::{OverlayError, OverlayResult};

// ============================================================================
// Compositor
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompositorCall {
    Start,
    Stop,
    Register(NativeHandle),
    Unregister(SurfaceId),
    SetPosition(SurfaceId, Bounds),
    SetTransparency(SurfaceId, u8),
    ShowAll,
    HideAll,
}

#[derive(Default)]
struct FakeCompositorState {
    calls: Vec<CompositorCall>,
    running: bool,
    next_id: i32,
    live: Vec<SurfaceId>,
    registers: usize,
    fail_register_at: Option<usize>,
    fail_unregister: Option<SurfaceId>,
    status: Option<CompositorStatus>,
}

/// Records every call and keeps a live registration set.
#[derive(Default)]
pub struct FakeCompositor {
    state: Mutex<FakeCompositorState>,
}

impl FakeCompositor {
    pub fn calls(&self) -> Vec<CompositorCall> {
        self.state.lock().calls.clone()
    }

    pub fn count(&self, matches: impl Fn(&CompositorCall) -> bool) -> usize {
        self.state.lock().calls.iter().filter(|c| matches(c)).count()
    }

    pub fn registered_handles(&self) -> Vec<NativeHandle> {
        self.state
            .lock()
            .calls
            .iter()
            .filter_map(|c| match c {
                CompositorCall::Register(handle) => Some(*handle),
                _ => None,
            })
            .collect()
    }

    pub fn live_count(&self) -> usize {
        self.state.lock().live.len()
    }

    pub fn is_running(&self) -> bool {
        self.state.lock().running
    }

    /// Return `Invalid` for the nth register call (1-based).
    pub fn fail_registration_at(&self, nth: usize) {
        self.state.lock().fail_register_at = Some(nth);
    }

    pub fn fail_unregister_of(&self, id: SurfaceId) {
        self.state.lock().fail_unregister = Some(id);
    }

    /// Force the reported status instead of deriving it from start/stop.
    pub fn set_status(&self, status: Option<CompositorStatus>) {
        self.state.lock().status = status;
    }
}

impl CompositorClient for FakeCompositor {
    fn start(&self) -> OverlayResult<()> {
        let mut state = self.state.lock();
        state.calls.push(CompositorCall::Start);
        state.running = true;
        Ok(())
    }

    fn stop(&self) {
        let mut state = self.state.lock();
        state.calls.push(CompositorCall::Stop);
        state.running = false;
        state.live.clear();
    }

    fn register(&self, handle: NativeHandle) -> Registration {
        let mut state = self.state.lock();
        state.calls.push(CompositorCall::Register(handle));
        state.registers += 1;
        if !state.running || state.fail_register_at == Some(state.registers) {
            return Registration::Invalid;
        }
        state.next_id += 1;
        let id = SurfaceId(state.next_id);
        state.live.push(id);
        Registration::Registered(id)
    }

    fn unregister(&self, id: SurfaceId) -> OverlayResult<()> {
        let mut state = self.state.lock();
        state.calls.push(CompositorCall::Unregister(id));
        if state.fail_unregister == Some(id) {
            return Err(OverlayError::CompositorError(format!(
                "remove_window({}) failed",
                id.0
            )));
        }
        state.live.retain(|live| *live != id);
        Ok(())
    }

    fn set_position(&self, id: SurfaceId, bounds: Bounds) {
        self.state
            .lock()
            .calls
            .push(CompositorCall::SetPosition(id, bounds));
    }

    fn set_transparency(&self, id: SurfaceId, alpha: u8) {
        self.state
            .lock()
            .calls
            .push(CompositorCall::SetTransparency(id, alpha));
    }

    fn show_all(&self) {
        self.state.lock().calls.push(CompositorCall::ShowAll);
    }

    fn hide_all(&self) {
        self.state.lock().calls.push(CompositorCall::HideAll);
    }

    fn status(&self) -> CompositorStatus {
        let state = self.state.lock();
        state.status.unwrap_or(if state.running {
            CompositorStatus::Running
        } else {
            CompositorStatus::Stopped
        })
    }
}

// ============================================================================
// Windows
// ============================================================================

#[derive(Default)]
struct FakeWindows {
    signals: HashMap<SurfaceRole, ReadySignal>,
    created: Vec<SurfaceSpec>,
    destroyed: Vec<SurfaceRole>,
    reloads: Vec<SurfaceRole>,
    shown: Vec<SurfaceRole>,
    hidden: Vec<SurfaceRole>,
    fail_role: Option<SurfaceRole>,
    fail_destroy: Option<SurfaceRole>,
    show_gate: Option<Arc<Mutex<()>>>,
}

/// Window factory whose windows only record what happened to them.
/// Load signals are fired by the test through [`FakeWindowFactory::fire`].
#[derive(Default)]
pub struct FakeWindowFactory {
    inner: Arc<Mutex<FakeWindows>>,
}

pub fn handle_for(role: SurfaceRole) -> NativeHandle {
    match role {
        SurfaceRole::RecentEvents => NativeHandle(0x101),
        SurfaceRole::Chat => NativeHandle(0x102),
        SurfaceRole::ControlPanel => NativeHandle(0x103),
    }
}

impl FakeWindowFactory {
    /// Report "content finished loading" for a window.
    pub fn fire(&self, role: SurfaceRole) {
        let signal = self.inner.lock().signals.get(&role).cloned();
        if let Some(signal) = signal {
            signal.notify();
        }
    }

    /// The four signals of a normal session (control panel loads twice).
    pub fn fire_all(&self) {
        for role in [
            SurfaceRole::RecentEvents,
            SurfaceRole::Chat,
            SurfaceRole::ControlPanel,
            SurfaceRole::ControlPanel,
        ] {
            self.fire(role);
        }
    }

    pub fn created(&self) -> Vec<SurfaceSpec> {
        self.inner.lock().created.clone()
    }

    pub fn destroyed(&self) -> Vec<SurfaceRole> {
        self.inner.lock().destroyed.clone()
    }

    pub fn reloads(&self) -> Vec<SurfaceRole> {
        self.inner.lock().reloads.clone()
    }

    pub fn shown(&self) -> Vec<SurfaceRole> {
        self.inner.lock().shown.clone()
    }

    pub fn hidden(&self) -> Vec<SurfaceRole> {
        self.inner.lock().hidden.clone()
    }

    /// Windows created but not yet destroyed.
    pub fn open_count(&self) -> usize {
        let inner = self.inner.lock();
        inner.created.len() - inner.destroyed.len()
    }

    pub fn fail_creation_of(&self, role: SurfaceRole) {
        self.inner.lock().fail_role = Some(role);
    }

    pub fn fail_destroy_of(&self, role: SurfaceRole) {
        self.inner.lock().fail_destroy = Some(role);
    }

    /// `show_inactive` blocks while the returned gate is locked, the way a
    /// webview call blocks until the UI thread answers.
    pub fn gate_show(&self) -> Arc<Mutex<()>> {
        let gate = Arc::new(Mutex::new(()));
        self.inner.lock().show_gate = Some(Arc::clone(&gate));
        gate
    }
}

impl WindowFactory for FakeWindowFactory {
    fn create(
        &self,
        spec: &SurfaceSpec,
        ready: ReadySignal,
    ) -> OverlayResult<Box<dyn SurfaceWindow>> {
        let mut inner = self.inner.lock();
        if inner.fail_role == Some(spec.role) {
            return Err(OverlayError::WindowCreation {
                role: spec.role,
                reason: "webview init failed".to_string(),
            });
        }
        inner.created.push(spec.clone());
        inner.signals.insert(spec.role, ready);

        Ok(Box::new(FakeWindow {
            role: spec.role,
            bounds: spec.bounds,
            windows: Arc::clone(&self.inner),
        }))
    }
}

struct FakeWindow {
    role: SurfaceRole,
    bounds: Bounds,
    windows: Arc<Mutex<FakeWindows>>,
}

impl SurfaceWindow for FakeWindow {
    fn native_handle(&self) -> OverlayResult<NativeHandle> {
        Ok(handle_for(self.role))
    }

    fn show_inactive(&self) -> OverlayResult<()> {
        let gate = {
            let mut windows = self.windows.lock();
            windows.shown.push(self.role);
            windows.show_gate.clone()
        };
        if let Some(gate) = gate {
            drop(gate.lock());
        }
        Ok(())
    }

    fn hide(&self) -> OverlayResult<()> {
        self.windows.lock().hidden.push(self.role);
        Ok(())
    }

    fn bounds(&self) -> OverlayResult<Bounds> {
        Ok(self.bounds)
    }

    fn reload(&self) -> OverlayResult<()> {
        self.windows.lock().reloads.push(self.role);
        Ok(())
    }

    fn destroy(&self) -> OverlayResult<()> {
        let mut windows = self.windows.lock();
        windows.destroyed.push(self.role);
        if windows.fail_destroy == Some(self.role) {
            return Err(OverlayError::WindowError("already closed".to_string()));
        }
        Ok(())
    }
}

// ============================================================================
// Providers
// ============================================================================

pub struct FakeAuth {
    logged_in: AtomicBool,
}

impl FakeAuth {
    pub fn new(logged_in: bool) -> Self {
        Self {
            logged_in: AtomicBool::new(logged_in),
        }
    }

    pub fn set_logged_in(&self, logged_in: bool) {
        self.logged_in.store(logged_in, Ordering::SeqCst);
    }
}

impl AuthProvider for FakeAuth {
    fn is_logged_in(&self) -> bool {
        self.logged_in.load(Ordering::SeqCst)
    }
}

pub struct FixedDisplay(pub DisplayInfo);

impl DisplayProvider for FixedDisplay {
    fn current_display(&self) -> DisplayInfo {
        self.0
    }
}

pub struct FixedTheme(pub Theme);

impl ThemeSource for FixedTheme {
    fn theme(&self) -> Theme {
        self.0
    }
}

/// Chat resolver for a platform that has not been connected.
pub struct NoChat;

impl ChatUrlResolver for NoChat {
    fn chat_url(&self, _theme: Theme) -> OverlayResult<String> {
        Err(OverlayError::Other("no streaming platform connected".to_string()))
    }
}

// ============================================================================
// Store
// ============================================================================

/// Memory store whose saves can be made to fail.
pub struct FakeStore {
    inner: MemorySessionStore,
    fail_saves: AtomicBool,
}

impl FakeStore {
    pub fn new(initial: Option<OverlaySession>) -> Self {
        Self {
            inner: MemorySessionStore::new(initial),
            fail_saves: AtomicBool::new(false),
        }
    }

    pub fn fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    pub fn current(&self) -> Option<OverlaySession> {
        self.inner.current()
    }
}

impl SessionStore for FakeStore {
    fn load(&self) -> OverlayResult<Option<OverlaySession>> {
        self.inner.load()
    }

    fn save(&self, session: &OverlaySession) -> OverlayResult<()> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(io::Error::new(io::ErrorKind::Other, "disk full").into());
        }
        self.inner.save(session)
    }
}

// ============================================================================
// Harness
// ============================================================================

/// An orchestrator wired to fakes, plus handles to inspect them.
pub struct Harness {
    pub orchestrator: Arc<OverlayOrchestrator>,
    pub compositor: Arc<FakeCompositor>,
    pub windows: Arc<FakeWindowFactory>,
    pub auth: Arc<FakeAuth>,
    pub store: Arc<FakeStore>,
}

pub struct HarnessBuilder {
    config: OverlayConfig,
    stored: Option<OverlaySession>,
    logged_in: bool,
    chat: Arc<dyn ChatUrlResolver>,
}

impl Default for HarnessBuilder {
    fn default() -> Self {
        Self {
            config: OverlayConfig::default(),
            stored: None,
            logged_in: true,
            chat: Arc::new(StreamingPlatform::Twitch {
                channel: "streamer".to_string(),
            }),
        }
    }
}

impl HarnessBuilder {
    pub fn config(mut self, config: OverlayConfig) -> Self {
        self.config = config;
        self
    }

    pub fn stored(mut self, session: OverlaySession) -> Self {
        self.stored = Some(session);
        self
    }

    pub fn logged_in(mut self, logged_in: bool) -> Self {
        self.logged_in = logged_in;
        self
    }

    pub fn chat(mut self, chat: Arc<dyn ChatUrlResolver>) -> Self {
        self.chat = chat;
        self
    }

    pub fn build(self) -> Harness {
        let compositor = Arc::new(FakeCompositor::default());
        let windows = Arc::new(FakeWindowFactory::default());
        let auth = Arc::new(FakeAuth::new(self.logged_in));
        let store = Arc::new(FakeStore::new(self.stored));

        let deps = OverlayDeps {
            compositor: compositor.clone(),
            windows: windows.clone(),
            auth: auth.clone(),
            chat: self.chat,
            recent_events: Arc::new(RecentEventsLink {
                base_url: "https://dashboard.example.test".to_string(),
                token: "widget-token".to_string(),
            }),
            display: Arc::new(FixedDisplay(DisplayInfo {
                work_area: WorkArea {
                    x: 0,
                    y: 0,
                    width: 1920,
                    height: 1040,
                },
            })),
            theme: Arc::new(FixedTheme(Theme::Night)),
            store: store.clone(),
        };

        Harness {
            orchestrator: OverlayOrchestrator::new(deps, self.config),
            compositor,
            windows,
            auth,
            store,
        }
    }
}

impl Harness {
    pub fn builder() -> HarnessBuilder {
        HarnessBuilder::default()
    }

    pub fn new() -> Self {
        Self::builder().build()
    }

    pub fn stored_session(&self) -> OverlaySession {
        self.store.current().unwrap_or_default()
    }
}
