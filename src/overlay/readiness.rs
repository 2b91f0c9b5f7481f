//! Readiness aggregation for overlay surfaces.
//!
//! Every surface window reports "content finished loading" independently and
//! in any order. The aggregator collects those signals, waits a settling
//! delay once the last one arrives (so late-binding content gets a chance to
//! paint before the compositor starts capturing) and then fires exactly once.
//!
//! The control panel paints a blank page on its first load and is reloaded
//! once, so it only counts as ready on its second signal. The first one is
//! reported as [`SignalOutcome::Spurious`] so the caller can trigger the
//! reload.

use std::collections::BTreeSet;
use std::time::Duration;

use tokio::sync::mpsc::UnboundedReceiver;

use super::types::SurfaceRole;
use crate::error::{OverlayError, OverlayResult};

/// Load signals the control panel needs before it counts as ready
pub const DEFAULT_CONTROL_PANEL_LOADS: u8 = 2;

/// Aggregator state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadinessState {
    /// Still waiting on at least one role
    Collecting,
    /// All roles signaled, waiting out the settling delay
    Settling,
    /// Completion delivered; everything else is discarded
    Fired,
}

/// What a single signal did to the aggregator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalOutcome {
    /// Role accepted, others still pending
    Pending { remaining: usize },
    /// Signal that does not count yet (first control panel paint)
    Spurious(SurfaceRole),
    /// Last expected signal arrived; settling starts now
    Complete,
    /// Duplicate, unexpected, or late signal
    Ignored,
}

pub struct ReadinessAggregator {
    remaining: BTreeSet<SurfaceRole>,
    state: ReadinessState,
    control_panel_loads: u8,
    required_control_panel_loads: u8,
    settle_delay: Duration,
}

impl ReadinessAggregator {
    /// Start collecting for the given role set.
    pub fn new(roles: &[SurfaceRole], settle_delay: Duration) -> Self {
        Self {
            remaining: roles.iter().copied().collect(),
            state: ReadinessState::Collecting,
            control_panel_loads: 0,
            required_control_panel_loads: DEFAULT_CONTROL_PANEL_LOADS,
            settle_delay,
        }
    }

    /// Override how many loads the control panel must report.
    pub fn with_control_panel_loads(mut self, loads: u8) -> Self {
        self.required_control_panel_loads = loads.max(1);
        self
    }

    pub fn state(&self) -> ReadinessState {
        self.state
    }

    pub fn settle_delay(&self) -> Duration {
        self.settle_delay
    }

    /// Roles still pending, in registration order.
    pub fn pending(&self) -> Vec<SurfaceRole> {
        self.remaining.iter().copied().collect()
    }

    /// Feed one "content finished loading" signal.
    pub fn signal(&mut self, role: SurfaceRole) -> SignalOutcome {
        if self.state != ReadinessState::Collecting {
            log::debug!(
                "[READINESS] Discarding {} signal in {:?}",
                role,
                self.state
            );
            return SignalOutcome::Ignored;
        }

        if !self.remaining.contains(&role) {
            log::debug!("[READINESS] Duplicate or unexpected {} signal", role);
            return SignalOutcome::Ignored;
        }

        if role == SurfaceRole::ControlPanel {
            self.control_panel_loads = self.control_panel_loads.saturating_add(1);
            if self.control_panel_loads < self.required_control_panel_loads {
                log::debug!(
                    "[READINESS] Control panel load {}/{} (blank paint)",
                    self.control_panel_loads,
                    self.required_control_panel_loads
                );
                return SignalOutcome::Spurious(role);
            }
        }

        self.remaining.remove(&role);
        log::debug!(
            "[READINESS] {} ready, {} remaining",
            role,
            self.remaining.len()
        );

        if self.remaining.is_empty() {
            self.state = ReadinessState::Settling;
            SignalOutcome::Complete
        } else {
            SignalOutcome::Pending {
                remaining: self.remaining.len(),
            }
        }
    }

    /// Move Settling -> Fired. Returns false if it already fired.
    fn fire(&mut self) -> bool {
        if self.state == ReadinessState::Settling {
            self.state = ReadinessState::Fired;
            true
        } else {
            false
        }
    }

    /// Drive the aggregator from a signal channel until it fires.
    ///
    /// `on_spurious` runs for every signal that does not count yet. With a
    /// `timeout`, collection fails once the limit passes; the settling delay
    /// itself is not covered by the timeout. Dropping the receiver on return
    /// makes any later signal a silent no-op for its sender.
    pub async fn settle<F>(
        &mut self,
        mut signals: UnboundedReceiver<SurfaceRole>,
        timeout: Option<Duration>,
        mut on_spurious: F,
    ) -> OverlayResult<()>
    where
        F: FnMut(SurfaceRole),
    {
        if self.state == ReadinessState::Fired {
            return Err(OverlayError::Other("Readiness already fired".to_string()));
        }

        if self.state == ReadinessState::Collecting && self.remaining.is_empty() {
            self.state = ReadinessState::Settling;
        }

        if self.state == ReadinessState::Collecting {
            let collect = async {
                while let Some(role) = signals.recv().await {
                    match self.signal(role) {
                        SignalOutcome::Complete => return Ok(()),
                        SignalOutcome::Spurious(role) => on_spurious(role),
                        SignalOutcome::Pending { .. } | SignalOutcome::Ignored => {},
                    }
                }
                Err(OverlayError::ReadinessAbandoned)
            };

            let collected = match timeout {
                Some(limit) => tokio::time::timeout(limit, collect).await.ok(),
                None => Some(collect.await),
            };

            match collected {
                Some(result) => result?,
                None => {
                    let pending = self
                        .pending()
                        .iter()
                        .map(|role| role.to_string())
                        .collect::<Vec<_>>()
                        .join(", ");
                    log::warn!("[READINESS] Timed out waiting for: {}", pending);
                    return Err(OverlayError::ReadinessTimeout { pending });
                },
            }
        }

        log::debug!(
            "[READINESS] All surfaces ready, settling for {:?}",
            self.settle_delay
        );
        tokio::time::sleep(self.settle_delay).await;

        if self.fire() {
            Ok(())
        } else {
            Err(OverlayError::Other("Readiness already fired".to_string()))
        }
    }
}
