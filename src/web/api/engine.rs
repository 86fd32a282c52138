use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::attitude::{EngineState, PointingMode};
use crate::web::api::error::{ApiResult, ErrorResponse};
use crate::web::auth::{require_permission, AppState, AuthenticatedUser};
use crate::web::config::Permission;

#[derive(Debug, Serialize, ToSchema)]
pub struct StateResponse {
    pub mode: PointingMode,
    pub heading_rate_deg_s: f64,
    pub tilt_rate_deg_s: f64,
    pub energy_w: f64,
}

impl From<EngineState> for StateResponse {
    fn from(state: EngineState) -> Self {
        StateResponse {
            mode: state.mode,
            heading_rate_deg_s: state.heading_rate_deg_s,
            tilt_rate_deg_s: state.tilt_rate_deg_s,
            energy_w: state.energy_w,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AnglesResponse {
    pub heading_deg: f64,
    pub tilt_deg: f64,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SetModeRequest {
    pub mode: PointingMode,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SetModeResponse {
    pub mode: PointingMode,
}

#[utoipa::path(
    get,
    path = "/api/engine/state",
    responses(
        (status = 200, description = "Rates and energy from the latest completed tick", body = StateResponse)
    ),
    tag = "engine"
)]
pub async fn get_state(State(state): State<AppState>) -> Json<StateResponse> {
    Json(state.store.snapshot().into())
}

#[utoipa::path(
    get,
    path = "/api/engine/angles",
    responses(
        (status = 200, description = "Camera angles from the latest completed tick", body = AnglesResponse)
    ),
    tag = "engine"
)]
pub async fn get_angles(State(state): State<AppState>) -> Json<AnglesResponse> {
    let snapshot = state.store.snapshot();
    let (heading_deg, tilt_deg) = snapshot
        .sample
        .map_or((0.0, 0.0), |s| (s.heading_deg, s.tilt_deg));
    Json(AnglesResponse {
        heading_deg,
        tilt_deg,
    })
}

#[utoipa::path(
    get,
    path = "/api/engine/status",
    responses(
        (status = 200, description = "Full engine snapshot", body = EngineState)
    ),
    tag = "engine"
)]
pub async fn get_status(State(state): State<AppState>) -> Json<EngineState> {
    Json(state.store.snapshot())
}

#[utoipa::path(
    post,
    path = "/api/engine/mode",
    request_body = SetModeRequest,
    security(
        ("api_key" = [])
    ),
    responses(
        (status = 200, description = "Mode request accepted; applied on the next tick", body = SetModeResponse),
        (status = 401, description = "Missing or invalid API key", body = ErrorResponse),
        (status = 403, description = "Insufficient permissions", body = ErrorResponse)
    ),
    tag = "engine"
)]
pub async fn set_mode(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(request): Json<SetModeRequest>,
) -> ApiResult<Json<SetModeResponse>> {
    require_permission(&user, Permission::SetMode)?;

    log::info!("{} requested pointing mode {:?}", user.name, request.mode);
    state.store.request_mode(request.mode);
    Ok(Json(SetModeResponse { mode: request.mode }))
}
