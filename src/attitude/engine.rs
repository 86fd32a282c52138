use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use super::error::EngineError;
use super::geometry::compute_attitude;
use super::power::{update_rates, PowerModel};
use super::state::{EngineState, PointingMode, StateStore};
use super::targets::{select_target, GroundTarget};
use crate::ephemeris::{GeodeticPosition, PositionProvider};
use crate::overlay::{OverlayFeed, OverlayWriter, TrackHistory};

#[derive(Debug, Clone, Copy)]
pub struct EngineParams {
    pub tick_period: std::time::Duration,
    pub target_reselect_period: Duration,
    pub initial_mode: PointingMode,
    pub power: PowerModel,
}

#[derive(Debug)]
struct WorkerHandle {
    stop_tx: oneshot::Sender<()>,
    join: JoinHandle<()>,
}

/// Owns the periodic recomputation loop. One worker task at a time; readers
/// go through the [`StateStore`] handed out by [`AttitudeEngine::store`].
pub struct AttitudeEngine {
    provider: Arc<dyn PositionProvider + Send + Sync>,
    targets: Vec<GroundTarget>,
    params: EngineParams,
    store: StateStore,
    feed: OverlayFeed,
    writer: Option<OverlayWriter>,
    worker: Option<WorkerHandle>,
}

impl AttitudeEngine {
    pub fn new(
        provider: Arc<dyn PositionProvider + Send + Sync>,
        targets: Vec<GroundTarget>,
        params: EngineParams,
        writer: Option<OverlayWriter>,
    ) -> Self {
        Self {
            provider,
            targets,
            params,
            store: StateStore::new(EngineState::initial(params.initial_mode)),
            feed: OverlayFeed::new(),
            writer,
            worker: None,
        }
    }

    pub fn store(&self) -> StateStore {
        self.store.clone()
    }

    pub fn overlay_feed(&self) -> OverlayFeed {
        self.feed.clone()
    }

    pub fn start(&mut self) {
        if self.worker.is_some() {
            return;
        }

        let (stop_tx, stop_rx) = oneshot::channel();
        let join = tokio::spawn(run_engine_loop(
            self.provider.clone(),
            self.targets.clone(),
            self.params,
            self.store.clone(),
            self.feed.clone(),
            self.writer.take(),
            stop_rx,
        ));
        self.worker = Some(WorkerHandle { stop_tx, join });
    }

    pub async fn stop(&mut self) {
        if let Some(worker) = self.worker.take() {
            let _ = worker.stop_tx.send(());
            let _ = worker.join.await;
        }
    }
}

async fn run_engine_loop(
    provider: Arc<dyn PositionProvider + Send + Sync>,
    targets: Vec<GroundTarget>,
    params: EngineParams,
    store: StateStore,
    feed: OverlayFeed,
    writer: Option<OverlayWriter>,
    mut stop_rx: oneshot::Receiver<()>,
) {
    let mut ticker = tokio::time::interval(params.tick_period);
    // An overrunning cycle drops ticks instead of queueing them
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let mut requested_mode = params.initial_mode;
    let mut held_target: Option<GroundTarget> = None;
    let mut selected_at: Option<DateTime<Utc>> = None;
    let mut history = TrackHistory::default();

    loop {
        let stopped = tokio::select! {
            _ = ticker.tick() => false,
            _ = &mut stop_rx => true,
        };
        if stopped {
            return;
        }

        if let Some(mode) = store.take_pending_mode() {
            if mode != requested_mode {
                log::info!("pointing mode set to {:?}", mode);
            }
            requested_mode = mode;
            if mode == PointingMode::Lookdown {
                held_target = None;
                selected_at = None;
            }
        }

        let now = Utc::now();
        let position = match provider.position_at(now) {
            Ok(position) => position,
            Err(e) => {
                log::warn!("tick skipped, no position: {}", e);
                continue;
            }
        };

        if requested_mode == PointingMode::Focus {
            let reselect_due = match selected_at {
                Some(at) => now - at >= params.target_reselect_period,
                None => true,
            };
            if reselect_due {
                match select_target(&position, &targets) {
                    Ok(target) => {
                        if held_target.as_ref() != Some(target) {
                            log::info!("tracking target '{}'", target.id);
                        }
                        held_target = Some(target.clone());
                        selected_at = Some(now);
                    }
                    Err(e) => {
                        log::warn!("falling back to lookdown: {}", e);
                        held_target = None;
                        selected_at = None;
                    }
                }
            }
        }

        let prev = store.snapshot();
        let state = match run_cycle(
            &prev,
            position,
            held_target.as_ref(),
            requested_mode,
            &params.power,
        ) {
            Ok(state) => state,
            Err(e) => {
                log::warn!("tick rejected: {}", e);
                continue;
            }
        };

        store.apply_tick(state.clone());
        history.push(position);

        if let Some(kml) = crate::overlay::render_kml(&state, &targets, &history) {
            if let Some(writer) = writer.as_ref() {
                if let Err(e) = writer.write(&kml) {
                    log::warn!("overlay write failed: {}", e);
                }
            }
            feed.publish(kml);
        }
    }
}

/// One deterministic recomputation step: attitude, rates, energy. Pure and
/// synchronous; everything that can touch I/O stays in the loop around it.
///
/// Focus mode with no target degrades to Lookdown for this tick, and the
/// published state reports the mode actually flown.
pub fn run_cycle(
    prev: &EngineState,
    position: GeodeticPosition,
    target: Option<&GroundTarget>,
    mode: PointingMode,
    power: &PowerModel,
) -> Result<EngineState, EngineError> {
    let effective_mode = match (mode, target) {
        (PointingMode::Focus, Some(_)) => PointingMode::Focus,
        _ => PointingMode::Lookdown,
    };

    let prev_heading = prev.sample.map_or(0.0, |s| s.heading_deg);
    let sample = compute_attitude(&position, target, effective_mode, prev_heading);

    let (heading_rate, tilt_rate) = match prev.sample {
        Some(prev_sample) => {
            let dt_s = (sample.timestamp - prev_sample.timestamp).num_milliseconds() as f64 / 1000.0;
            update_rates(
                &prev_sample,
                &sample,
                dt_s,
                (prev.heading_rate_deg_s, prev.tilt_rate_deg_s),
            )
        }
        None => (0.0, 0.0),
    };

    let state = EngineState {
        mode: effective_mode,
        position: Some(position),
        target_id: target
            .filter(|_| effective_mode == PointingMode::Focus)
            .map(|t| t.id.clone()),
        sample: Some(sample),
        heading_rate_deg_s: heading_rate,
        tilt_rate_deg_s: tilt_rate,
        energy_w: power.energy_w(heading_rate, tilt_rate, effective_mode),
    };

    if !state.is_finite() {
        return Err(EngineError::NonFiniteGeometry);
    }
    Ok(state)
}
