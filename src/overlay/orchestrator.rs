//! Overlay session orchestrator.
//!
//! Owns the persisted [`OverlaySession`], the lifecycle state machine and the
//! surfaces of the current session. Every operation takes the state lock for
//! its whole (synchronous) duration, so commands, readiness completion and
//! teardown are serialized the way a single UI thread would serialize them.
//! The lock is never held across an `.await`.
//!
//! Activation is two-phase: [`OverlayOrchestrator::create_session`] builds the
//! windows and returns immediately; a spawned task waits for every surface to
//! report loaded content and then registers them with the compositor.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use super::compositor::CompositorClient;
use super::providers::{
    AuthProvider, ChatUrlResolver, DisplayProvider, RecentEventsSource, ThemeSource,
};
use super::readiness::ReadinessAggregator;
use super::store::SessionStore;
use super::surface::{
    ReadySignal, SurfaceDescriptor, SurfaceLayout, SurfaceSet, SurfaceSpec, WindowFactory,
};
use super::types::{
    can_transition, CompositorRegistration, CompositorStatus, OverlayLifecycle,
    OverlaySession, OverlaySnapshot, Registration, SessionEvent, SurfaceRole, Theme,
    Visibility,
};
use crate::config::OverlayConfig;
use crate::error::{OverlayError, OverlayResult};

/// Page served by the app for the overlay control panel
pub const CONTROL_PANEL_URL: &str = "overlay-controls.html";

/// Windows are created control panel first, then the content panels.
const CREATION_ORDER: [SurfaceRole; 3] = [
    SurfaceRole::ControlPanel,
    SurfaceRole::RecentEvents,
    SurfaceRole::Chat,
];

/// Collaborators injected at construction.
///
/// None of them may call back into the orchestrator synchronously: they are
/// invoked with the state lock held.
#[derive(Clone)]
pub struct OverlayDeps {
    pub compositor: Arc<dyn CompositorClient>,
    pub windows: Arc<dyn WindowFactory>,
    pub auth: Arc<dyn AuthProvider>,
    pub chat: Arc<dyn ChatUrlResolver>,
    pub recent_events: Arc<dyn RecentEventsSource>,
    pub display: Arc<dyn DisplayProvider>,
    pub theme: Arc<dyn ThemeSource>,
    pub store: Arc<dyn SessionStore>,
}

/// Resolves once a session has been activated (or has failed / been cancelled).
#[must_use = "dropping the activation handle discards the activation result"]
pub struct SessionActivation {
    generation: u64,
    rx: oneshot::Receiver<OverlayResult<()>>,
}

impl SessionActivation {
    /// Session generation this handle belongs to.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Wait for activation. `SessionCancelled` if the session was torn down
    /// or the orchestrator went away first.
    pub async fn wait(self) -> OverlayResult<()> {
        self.rx
            .await
            .unwrap_or(Err(OverlayError::SessionCancelled))
    }
}

struct OrchestratorState {
    session: OverlaySession,
    lifecycle: OverlayLifecycle,
    surfaces: SurfaceSet,
    /// Bumped on every create; completions for older generations are stale
    generation: u64,
    /// Cancels the readiness wait of the current session
    cancel: Option<CancellationToken>,
    shut_down: bool,
}

impl OrchestratorState {
    fn snapshot(&self) -> OverlaySnapshot {
        OverlaySnapshot {
            lifecycle: self.lifecycle,
            session: self.session,
        }
    }

    fn transition(&mut self, to: OverlayLifecycle) -> OverlayResult<()> {
        if !can_transition(self.lifecycle, to) {
            return Err(OverlayError::InvalidTransition {
                from: self.lifecycle,
                to,
            });
        }
        if self.lifecycle != to {
            log::debug!("[ORCHESTRATOR] {:?} -> {:?}", self.lifecycle, to);
        }
        self.lifecycle = to;
        Ok(())
    }
}

/// Drives the overlay session lifecycle.
pub struct OverlayOrchestrator {
    deps: OverlayDeps,
    config: OverlayConfig,
    state: Mutex<OrchestratorState>,
    snapshot_tx: watch::Sender<OverlaySnapshot>,
    /// Cancelled once shutdown is requested. Session tokens are its children.
    exit: CancellationToken,
}

impl OverlayOrchestrator {
    /// Build the orchestrator, loading the persisted session (or storing
    /// first-run defaults).
    pub fn new(deps: OverlayDeps, mut config: OverlayConfig) -> Arc<Self> {
        config.validate();

        let mut session = match deps.store.load() {
            Ok(Some(session)) => session,
            Ok(None) => {
                let session = OverlaySession::default();
                if let Err(e) = deps.store.save(&session) {
                    log::warn!("[ORCHESTRATOR] Failed to store default session: {}", e);
                }
                session
            },
            Err(e) => {
                log::warn!("[ORCHESTRATOR] Failed to load session, using defaults: {}", e);
                OverlaySession::default()
            },
        };
        // Nothing is composited before a session is activated
        session.is_showing = false;

        let state = OrchestratorState {
            session,
            lifecycle: OverlayLifecycle::Disabled,
            surfaces: SurfaceSet::default(),
            generation: 0,
            cancel: None,
            shut_down: false,
        };
        let (snapshot_tx, _) = watch::channel(state.snapshot());

        log::info!(
            "[ORCHESTRATOR] Loaded session (enabled={}, preview={})",
            session.is_enabled,
            session.is_preview_enabled
        );

        Arc::new(Self {
            deps,
            config,
            state: Mutex::new(state),
            snapshot_tx,
            exit: CancellationToken::new(),
        })
    }

    // ========================================================================
    // Observers
    // ========================================================================

    pub fn snapshot(&self) -> OverlaySnapshot {
        self.state.lock().snapshot()
    }

    /// Receive a snapshot whenever the lifecycle or session changes.
    pub fn subscribe(&self) -> watch::Receiver<OverlaySnapshot> {
        self.snapshot_tx.subscribe()
    }

    pub fn lifecycle(&self) -> OverlayLifecycle {
        self.state.lock().lifecycle
    }

    pub fn session(&self) -> OverlaySession {
        self.state.lock().session
    }

    pub fn config(&self) -> &OverlayConfig {
        &self.config
    }

    /// Generation of the most recently created session (0 before the first).
    pub fn generation(&self) -> u64 {
        self.state.lock().generation
    }

    /// Surfaces currently held by the session.
    pub fn surface_count(&self) -> usize {
        self.state.lock().surfaces.len()
    }

    /// Surfaces currently holding a compositor registration.
    pub fn registration_count(&self) -> usize {
        self.state.lock().surfaces.registered_count()
    }

    pub fn is_shut_down(&self) -> bool {
        self.state.lock().shut_down
    }

    /// Shut down, or shutdown requested but still waiting on the state lock.
    fn is_closing(&self, state: &OrchestratorState) -> bool {
        state.shut_down || self.exit.is_cancelled()
    }

    fn publish(&self, state: &OrchestratorState) {
        self.snapshot_tx.send_replace(state.snapshot());
    }

    fn persist(&self, session: &OverlaySession) {
        if let Err(e) = self.deps.store.save(session) {
            log::error!("[ORCHESTRATOR] Failed to persist session: {}", e);
        }
    }

    /// Save `next` and only then adopt it.
    fn commit(&self, state: &mut OrchestratorState, next: OverlaySession) -> OverlayResult<()> {
        self.deps.store.save(&next)?;
        state.session = next;
        self.publish(state);
        Ok(())
    }

    // ========================================================================
    // Commands
    // ========================================================================

    /// Create the session at startup if the user left the overlay enabled.
    pub fn init(self: &Arc<Self>) -> OverlayResult<Option<SessionActivation>> {
        self.resume_if_enabled()
    }

    /// Enable or disable the overlay. Persists before doing any work.
    ///
    /// Returns the activation handle when a session was started.
    pub fn set_enabled(self: &Arc<Self>, enable: bool) -> OverlayResult<Option<SessionActivation>> {
        {
            let mut state = self.state.lock();
            if self.is_closing(&state) {
                log::debug!("[ORCHESTRATOR] set_enabled({}) after shutdown ignored", enable);
                return Ok(None);
            }
            if state.session.is_enabled == enable {
                log::debug!("[ORCHESTRATOR] Overlay already {}", on_off(enable));
                return Ok(None);
            }

            let mut next = state.session;
            next.is_enabled = enable;
            self.commit(&mut state, next)?;
            log::info!("[ORCHESTRATOR] Overlay {}", on_off(enable));
        }

        if !enable {
            self.teardown_session();
            return Ok(None);
        }

        if !self.deps.auth.is_logged_in() {
            log::info!("[ORCHESTRATOR] Not logged in, session will start on login");
            return Ok(None);
        }

        self.create_session().map(Some)
    }

    /// Build the windows of a new session and start waiting for them to load.
    pub fn create_session(self: &Arc<Self>) -> OverlayResult<SessionActivation> {
        let theme = self.deps.theme.theme();
        let layout = SurfaceLayout::from_display(self.deps.display.current_display());

        let mut state = self.state.lock();
        if self.is_closing(&state) {
            return Err(OverlayError::SessionCancelled);
        }
        if state.lifecycle != OverlayLifecycle::Disabled {
            return Err(OverlayError::SessionInProgress(state.lifecycle));
        }

        state.transition(OverlayLifecycle::Enabling)?;
        state.generation += 1;
        let generation = state.generation;
        self.publish(&state);
        log::info!("[ORCHESTRATOR] Creating overlay session #{}", generation);

        let (signal_tx, signal_rx) = mpsc::unbounded_channel();
        if let Err(e) = self.build_surfaces(&mut state, theme, layout, signal_tx) {
            self.fail_session(&mut state, &e);
            return Err(e);
        }
        if self.finish_pending_shutdown(&mut state) {
            return Err(OverlayError::SessionCancelled);
        }

        let token = self.exit.child_token();
        state.cancel = Some(token.clone());
        state.transition(OverlayLifecycle::WaitingForReadiness)?;
        self.publish(&state);
        drop(state);

        let (done_tx, done_rx) = oneshot::channel();
        tokio::spawn(Arc::clone(self).await_readiness(generation, token, signal_rx, done_tx));

        Ok(SessionActivation {
            generation,
            rx: done_rx,
        })
    }

    fn build_surfaces(
        &self,
        state: &mut OrchestratorState,
        theme: Theme,
        layout: SurfaceLayout,
        signals: mpsc::UnboundedSender<SurfaceRole>,
    ) -> OverlayResult<()> {
        self.deps.compositor.start()?;

        for role in CREATION_ORDER {
            let spec = SurfaceSpec {
                role,
                url: self.content_url(role, theme)?,
                bounds: layout.bounds_for(role),
                theme,
            };
            let window = self
                .deps
                .windows
                .create(&spec, ReadySignal::new(role, signals.clone()))?;

            log::debug!("[ORCHESTRATOR] Created {} window ({})", role, spec.url);
            state.surfaces.insert(SurfaceDescriptor::new(&spec, window));
        }
        Ok(())
    }

    fn content_url(&self, role: SurfaceRole, theme: Theme) -> OverlayResult<String> {
        let resolved = match role {
            SurfaceRole::ControlPanel => return Ok(CONTROL_PANEL_URL.to_string()),
            SurfaceRole::RecentEvents => self.deps.recent_events.recent_events_url(theme),
            SurfaceRole::Chat => self.deps.chat.chat_url(theme),
        };
        resolved.map_err(|e| OverlayError::ContentSource {
            role,
            reason: e.to_string(),
        })
    }

    async fn await_readiness(
        self: Arc<Self>,
        generation: u64,
        token: CancellationToken,
        signals: mpsc::UnboundedReceiver<SurfaceRole>,
        done: oneshot::Sender<OverlayResult<()>>,
    ) {
        let mut aggregator =
            ReadinessAggregator::new(&SurfaceRole::ALL, self.config.settle_delay())
                .with_control_panel_loads(self.config.control_panel_loads);
        let timeout = self.config.ready_timeout();

        let settled = tokio::select! {
            _ = token.cancelled() => Err(OverlayError::SessionCancelled),
            result = aggregator.settle(signals, timeout, |role| self.reload_surface(generation, role)) => result,
        };

        let result = match settled {
            Ok(()) => self.on_all_surfaces_ready(generation),
            Err(OverlayError::SessionCancelled) => {
                log::debug!("[ORCHESTRATOR] Readiness wait #{} cancelled", generation);
                if self.exit.is_cancelled() {
                    self.shutdown();
                }
                Err(OverlayError::SessionCancelled)
            },
            Err(e) => {
                let mut state = self.state.lock();
                if self.is_current(&state, generation) {
                    self.fail_session(&mut state, &e);
                    Err(e)
                } else {
                    Err(OverlayError::SessionCancelled)
                }
            },
        };

        // Receiver may have been dropped
        let _ = done.send(result);
    }

    /// Reload a window whose first load was a blank paint.
    fn reload_surface(&self, generation: u64, role: SurfaceRole) {
        let state = self.state.lock();
        if !self.is_current(&state, generation) {
            return;
        }
        if let Some(surface) = state.surfaces.get(role) {
            log::debug!("[ORCHESTRATOR] Reloading {} window", role);
            if let Err(e) = surface.window().reload() {
                log::warn!("[ORCHESTRATOR] Failed to reload {} window: {}", role, e);
            }
        }
    }

    fn is_current(&self, state: &OrchestratorState, generation: u64) -> bool {
        state.generation == generation
            && state.lifecycle == OverlayLifecycle::WaitingForReadiness
    }

    /// Register every surface with the compositor, in fixed role order, and
    /// activate the session hidden.
    pub(crate) fn on_all_surfaces_ready(&self, generation: u64) -> OverlayResult<()> {
        let mut state = self.state.lock();
        if self.finish_pending_shutdown(&mut state) {
            return Err(OverlayError::SessionCancelled);
        }
        if !self.is_current(&state, generation) {
            log::debug!(
                "[ORCHESTRATOR] Stale readiness for session #{} ignored",
                generation
            );
            return Err(OverlayError::SessionCancelled);
        }
        if !state.session.is_enabled {
            log::info!("[ORCHESTRATOR] Overlay disabled before activation");
            self.teardown_locked(&mut state);
            self.publish(&state);
            return Err(OverlayError::SessionCancelled);
        }
        state.cancel = None;

        for role in SurfaceRole::ALL {
            // Window calls may block until the UI thread answers
            if self.finish_pending_shutdown(&mut state) {
                return Err(OverlayError::SessionCancelled);
            }
            if let Err(e) = self.register_surface(&mut state, role) {
                if let Some(control) = state.surfaces.get(SurfaceRole::ControlPanel) {
                    if let Err(hide_err) = control.window().hide() {
                        log::warn!("[ORCHESTRATOR] Failed to hide control panel: {}", hide_err);
                    }
                }
                self.fail_session(&mut state, &e);
                return Err(e);
            }
        }

        let opacity = self.config.surface_opacity;
        for surface in state.surfaces.iter_mut() {
            let Some(registration) = surface.registration() else {
                continue;
            };
            match surface.window().bounds() {
                Ok(bounds) => surface.bounds = bounds,
                Err(e) => log::warn!(
                    "[ORCHESTRATOR] Using initial bounds for {}: {}",
                    surface.role,
                    e
                ),
            }
            self.deps
                .compositor
                .set_position(registration.surface_id, surface.bounds);
            self.deps
                .compositor
                .set_transparency(registration.surface_id, opacity);
            surface.set_transparency(opacity);
        }
        if self.finish_pending_shutdown(&mut state) {
            return Err(OverlayError::SessionCancelled);
        }

        self.deps.compositor.hide_all();
        state.transition(OverlayLifecycle::Active(Visibility::Hidden))?;
        state.session.is_showing = false;
        self.persist(&state.session);
        self.publish(&state);

        log::info!(
            "[ORCHESTRATOR] Session #{} active ({} surfaces registered)",
            generation,
            state.surfaces.registered_count()
        );
        Ok(())
    }

    fn register_surface(&self, state: &mut OrchestratorState, role: SurfaceRole) -> OverlayResult<()> {
        let surface = state
            .surfaces
            .get_mut(role)
            .ok_or(OverlayError::RegistrationFailed { role })?;

        surface.window().show_inactive()?;
        let handle = surface.window().native_handle()?;
        surface.native_handle = Some(handle);

        match self.deps.compositor.register(handle) {
            Registration::Registered(surface_id) => {
                log::debug!("[ORCHESTRATOR] {} registered as {:?}", role, surface_id);
                surface.attach_registration(CompositorRegistration {
                    surface_id,
                    transparency: self.config.surface_opacity,
                })
            },
            Registration::Invalid => {
                log::error!("[ORCHESTRATOR] Compositor rejected {} window", role);
                Err(OverlayError::RegistrationFailed { role })
            },
        }
    }

    /// Composite the overlay into the game. No-op unless active.
    pub fn show_overlay(&self) -> OverlayResult<()> {
        let mut state = self.state.lock();
        self.set_visibility(&mut state, Visibility::Showing)
    }

    /// Stop compositing the overlay. No-op unless active.
    pub fn hide_overlay(&self) -> OverlayResult<()> {
        let mut state = self.state.lock();
        self.set_visibility(&mut state, Visibility::Hidden)
    }

    /// Flip visibility. No-op unless the compositor is running and the
    /// session is active.
    pub fn toggle_overlay(&self) -> OverlayResult<()> {
        let status = self.deps.compositor.status();
        if status != CompositorStatus::Running {
            log::debug!("[ORCHESTRATOR] Toggle ignored, compositor {:?}", status);
            return Ok(());
        }

        let mut state = self.state.lock();
        match state.lifecycle {
            OverlayLifecycle::Active(Visibility::Hidden) => {
                self.set_visibility(&mut state, Visibility::Showing)
            },
            OverlayLifecycle::Active(Visibility::Showing) => {
                self.set_visibility(&mut state, Visibility::Hidden)
            },
            other => {
                log::debug!("[ORCHESTRATOR] Toggle ignored in {:?}", other);
                Ok(())
            },
        }
    }

    fn set_visibility(
        &self,
        state: &mut OrchestratorState,
        visibility: Visibility,
    ) -> OverlayResult<()> {
        if !state.lifecycle.is_active() || self.is_closing(state) {
            log::debug!(
                "[ORCHESTRATOR] {:?} ignored in {:?}",
                visibility,
                state.lifecycle
            );
            return Ok(());
        }

        let mut next = state.session;
        next.is_showing = visibility == Visibility::Showing;
        self.deps.store.save(&next)?;

        match visibility {
            Visibility::Showing => self.deps.compositor.show_all(),
            Visibility::Hidden => self.deps.compositor.hide_all(),
        }
        state.transition(OverlayLifecycle::Active(visibility))?;
        state.session = next;
        self.publish(state);
        Ok(())
    }

    /// Persist the preview preference.
    pub fn set_preview_enabled(&self, enable: bool) -> OverlayResult<()> {
        let mut state = self.state.lock();
        if self.is_closing(&state) || state.session.is_preview_enabled == enable {
            return Ok(());
        }
        let mut next = state.session;
        next.is_preview_enabled = enable;
        self.commit(&mut state, next)
    }

    /// Tear down the current session, keeping `is_enabled` as it is.
    pub fn teardown_session(&self) {
        let mut state = self.state.lock();
        if !state.lifecycle.is_live() && state.surfaces.is_empty() {
            log::debug!("[ORCHESTRATOR] No session to tear down");
            return;
        }
        self.teardown_locked(&mut state);
        state.session.is_showing = false;
        self.persist(&state.session);
        self.publish(&state);
    }

    /// Best effort: every step runs even if an earlier one failed.
    fn teardown_locked(&self, state: &mut OrchestratorState) {
        if let Some(token) = state.cancel.take() {
            token.cancel();
        }
        if state.lifecycle.is_live() {
            if let Err(e) = state.transition(OverlayLifecycle::Disabling) {
                log::error!("[ORCHESTRATOR] {}", e);
            }
        }

        let mut surfaces = state.surfaces.take_all();
        log::info!("[ORCHESTRATOR] Tearing down {} surfaces", surfaces.len());

        for surface in surfaces.iter_mut() {
            if let Some(registration) = surface.take_registration() {
                if let Err(e) = self.deps.compositor.unregister(registration.surface_id) {
                    log::warn!(
                        "[ORCHESTRATOR] Failed to unregister {} ({:?}): {}",
                        surface.role,
                        registration.surface_id,
                        e
                    );
                }
            }
        }

        for surface in &surfaces {
            if let Err(e) = surface.window().destroy() {
                log::warn!("[ORCHESTRATOR] Failed to destroy {} window: {}", surface.role, e);
            }
        }

        self.deps.compositor.stop();

        if let Err(e) = state.transition(OverlayLifecycle::Disabled) {
            log::error!("[ORCHESTRATOR] {}", e);
        }
    }

    /// Roll back a session that could not be activated and remember that the
    /// overlay is off.
    fn fail_session(&self, state: &mut OrchestratorState, reason: &OverlayError) {
        log::error!("[ORCHESTRATOR] Overlay session failed: {}", reason);
        self.teardown_locked(state);
        state.session.is_enabled = false;
        state.session.is_showing = false;
        self.persist(&state.session);
        self.publish(state);
    }

    fn resume_if_enabled(self: &Arc<Self>) -> OverlayResult<Option<SessionActivation>> {
        {
            let state = self.state.lock();
            if self.is_closing(&state) || !state.session.is_enabled || state.lifecycle.is_live() {
                return Ok(None);
            }
        }
        if !self.deps.auth.is_logged_in() {
            log::debug!("[ORCHESTRATOR] Overlay enabled but logged out");
            return Ok(None);
        }
        self.create_session().map(Some)
    }

    // ========================================================================
    // Session Events
    // ========================================================================

    /// React to login, logout and process shutdown.
    pub fn handle_session_event(
        self: &Arc<Self>,
        event: SessionEvent,
    ) -> OverlayResult<Option<SessionActivation>> {
        log::info!("[ORCHESTRATOR] Session event: {:?}", event);
        match event {
            SessionEvent::LoggedIn => self.resume_if_enabled(),
            SessionEvent::LoggedOut => {
                self.teardown_session();
                Ok(None)
            },
            SessionEvent::Shutdown => {
                self.shutdown();
                Ok(None)
            },
        }
    }

    /// Feed session events from a channel until shutdown or the sender closes.
    pub fn spawn_session_listener(
        self: &Arc<Self>,
        mut events: mpsc::UnboundedReceiver<SessionEvent>,
    ) -> JoinHandle<()> {
        let this = Arc::clone(self);
        tokio::spawn(async move {
            while let Some(event) = events.recv().await {
                match this.handle_session_event(event) {
                    Ok(Some(activation)) => {
                        let generation = activation.generation();
                        tokio::spawn(async move {
                            if let Err(e) = activation.wait().await {
                                log::warn!(
                                    "[ORCHESTRATOR] Session #{} did not activate: {}",
                                    generation,
                                    e
                                );
                            }
                        });
                    },
                    Ok(None) => {},
                    Err(e) => log::error!("[ORCHESTRATOR] {:?} failed: {}", event, e),
                }
                if event == SessionEvent::Shutdown {
                    break;
                }
            }
            log::debug!("[ORCHESTRATOR] Session listener stopped");
        })
    }

    /// Tear everything down and stop the compositor. Later commands are no-ops.
    pub fn shutdown(&self) {
        self.exit.cancel();
        let mut state = self.state.lock();
        self.shutdown_locked(&mut state);
    }

    /// Shutdown for the UI thread, which must never wait on the state lock
    /// indefinitely: the lock holder may itself be waiting on a window call
    /// that only the UI thread can answer.
    ///
    /// Returns false if the lock was not free within `wait`. Shutdown is
    /// still requested; the current lock holder finishes it at its next
    /// checkpoint.
    pub fn shutdown_within(&self, wait: Duration) -> bool {
        self.exit.cancel();
        match self.state.try_lock_for(wait) {
            Some(mut state) => {
                self.shutdown_locked(&mut state);
                true
            },
            None => {
                log::warn!(
                    "[ORCHESTRATOR] State busy after {:?}, leaving shutdown to the current operation",
                    wait
                );
                false
            },
        }
    }

    fn shutdown_locked(&self, state: &mut OrchestratorState) {
        if state.shut_down {
            return;
        }
        log::info!("[ORCHESTRATOR] Shutting down");
        state.shut_down = true;
        self.teardown_locked(state);
        state.session.is_showing = false;
        self.persist(&state.session);
        self.publish(state);
    }

    /// Complete a shutdown requested while this operation held the lock.
    /// True once the orchestrator is shut down.
    fn finish_pending_shutdown(&self, state: &mut OrchestratorState) -> bool {
        if self.exit.is_cancelled() {
            self.shutdown_locked(state);
        }
        state.shut_down
    }
}

fn on_off(enable: bool) -> &'static str {
    if enable {
        "enabled"
    } else {
        "disabled"
    }
}
