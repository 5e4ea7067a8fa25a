use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::models::{AvailabilityState, ServerStatus, StatusTransition};
use crate::sources::AvailabilityProbe;

/// Receives online/offline transitions. Implementations absorb their own errors.
#[async_trait]
pub trait StatusSink: Send + Sync {
    async fn on_transition(&self, transition: StatusTransition, state: AvailabilityState);
}

/// Owns the process-wide availability flag of the monitored website.
///
/// `check` is the only writer. Calls are serialized so that a transition is
/// signalled exactly once no matter how many callers race.
pub struct AvailabilityMonitor {
    probe: Arc<dyn AvailabilityProbe>,
    sink: Arc<dyn StatusSink>,
    state: RwLock<AvailabilityState>,
    check_lock: Mutex<()>,
}

impl AvailabilityMonitor {
    pub fn new(probe: Arc<dyn AvailabilityProbe>, sink: Arc<dyn StatusSink>) -> Self {
        Self {
            probe,
            sink,
            state: RwLock::new(AvailabilityState::optimistic()),
            check_lock: Mutex::new(()),
        }
    }

    /// Probes the website, records the outcome and signals a transition if
    /// the status changed. Never fails: an unreachable site is `false`.
    pub async fn check(&self) -> bool {
        let _guard = self.check_lock.lock().await;

        let online = match self.probe.probe().await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("🔍 {} unreachable: {}", self.probe.target(), e);
                false
            }
        };

        let now = Utc::now();
        let current = ServerStatus::from_online(online);
        let (previous, state) = {
            let mut state = self.state.write();
            let previous = state.status;
            *state = AvailabilityState {
                status: current,
                last_checked: now,
            };
            (previous, *state)
        };

        if previous != current {
            tracing::info!("📢 {} went {} -> {}", self.probe.target(), previous.as_str(), current.as_str());
            let transition = StatusTransition {
                from: previous,
                to: current,
                at: now,
            };
            self.sink.on_transition(transition, state).await;
        } else {
            tracing::debug!("🔍 {} still {}", self.probe.target(), current.as_str());
        }

        online
    }

    pub fn current_status(&self) -> AvailabilityState {
        *self.state.read()
    }
}
