mod engine;
mod error;
mod geometry;
mod power;
mod sample;
mod state;
mod targets;

pub use engine::{run_cycle, AttitudeEngine, EngineParams};
pub use error::EngineError;
pub use geometry::{bearing_deg, compute_attitude, haversine_km};
pub use power::{angular_delta, update_rates, PowerModel};
pub use sample::AttitudeSample;
pub use state::{EngineState, PointingMode, StateStore};
pub use targets::{select_target, GroundTarget};
