use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("no ground targets configured")]
    EmptyTargetSet,
    #[error("geometry produced a non-finite value")]
    NonFiniteGeometry,
}
