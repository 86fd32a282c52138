use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

use super::sample::AttitudeSample;
use crate::ephemeris::GeodeticPosition;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum PointingMode {
    /// Camera points straight down at the sub-point.
    Lookdown,
    /// Camera tracks the nearest configured ground target.
    Focus,
}

/// The authoritative engine output, replaced wholesale once per tick.
#[derive(Debug, Clone, PartialEq, Serialize, utoipa::ToSchema)]
pub struct EngineState {
    pub mode: PointingMode,
    pub position: Option<GeodeticPosition>,
    pub target_id: Option<String>,
    pub sample: Option<AttitudeSample>,
    pub heading_rate_deg_s: f64,
    pub tilt_rate_deg_s: f64,
    pub energy_w: f64,
}

impl EngineState {
    pub fn initial(mode: PointingMode) -> Self {
        Self {
            mode,
            position: None,
            target_id: None,
            sample: None,
            heading_rate_deg_s: 0.0,
            tilt_rate_deg_s: 0.0,
            energy_w: 0.0,
        }
    }

    /// A state containing NaN or infinity must never become readable.
    pub fn is_finite(&self) -> bool {
        let sample_finite = self.sample.map_or(true, |s| {
            s.heading_deg.is_finite() && s.tilt_deg.is_finite() && s.range_km.is_finite()
        });
        sample_finite
            && self.heading_rate_deg_s.is_finite()
            && self.tilt_rate_deg_s.is_finite()
            && self.energy_w.is_finite()
    }
}

#[derive(Debug)]
struct Shared {
    state: EngineState,
    pending_mode: Option<PointingMode>,
}

/// Single read-modify-write slot shared between the tick loop and any number
/// of readers. Readers always observe a complete snapshot from one tick;
/// the lock is held only for the clone or the swap.
#[derive(Debug, Clone)]
pub struct StateStore {
    shared: Arc<Mutex<Shared>>,
}

impl StateStore {
    pub fn new(initial: EngineState) -> Self {
        Self {
            shared: Arc::new(Mutex::new(Shared {
                state: initial,
                pending_mode: None,
            })),
        }
    }

    pub fn snapshot(&self) -> EngineState {
        self.shared.lock().unwrap().state.clone()
    }

    pub fn apply_tick(&self, state: EngineState) {
        self.shared.lock().unwrap().state = state;
    }

    /// Record an operator mode request; it takes effect at the start of the
    /// next tick, never mid-tick.
    pub fn request_mode(&self, mode: PointingMode) {
        self.shared.lock().unwrap().pending_mode = Some(mode);
    }

    pub fn take_pending_mode(&self) -> Option<PointingMode> {
        self.shared.lock().unwrap().pending_mode.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_snapshot_returns_applied_state() {
        let store = StateStore::new(EngineState::initial(PointingMode::Lookdown));

        let mut next = store.snapshot();
        next.mode = PointingMode::Focus;
        next.heading_rate_deg_s = 1.5;
        next.energy_w = 12.0;
        store.apply_tick(next.clone());

        assert_eq!(store.snapshot(), next);
    }

    #[test]
    fn test_snapshot_is_detached_copy() {
        let store = StateStore::new(EngineState::initial(PointingMode::Lookdown));
        let before = store.snapshot();

        let mut next = before.clone();
        next.energy_w = 99.0;
        store.apply_tick(next);

        // The earlier snapshot is unaffected by later ticks
        assert_eq!(before.energy_w, 0.0);
        assert_eq!(store.snapshot().energy_w, 99.0);
    }

    #[test]
    fn test_pending_mode_consumed_once() {
        let store = StateStore::new(EngineState::initial(PointingMode::Lookdown));
        assert_eq!(store.take_pending_mode(), None);

        store.request_mode(PointingMode::Focus);
        assert_eq!(store.take_pending_mode(), Some(PointingMode::Focus));
        assert_eq!(store.take_pending_mode(), None);
    }

    #[test]
    fn test_non_finite_state_detected() {
        let mut state = EngineState::initial(PointingMode::Lookdown);
        assert!(state.is_finite());

        state.sample = Some(AttitudeSample {
            timestamp: Utc::now(),
            heading_deg: f64::NAN,
            tilt_deg: 0.0,
            range_km: 400.0,
        });
        assert!(!state.is_finite());

        state.sample = None;
        state.energy_w = f64::INFINITY;
        assert!(!state.is_finite());
    }
}
