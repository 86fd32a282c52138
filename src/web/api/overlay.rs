use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};

use crate::web::auth::AppState;

const KML_CONTENT_TYPE: &str = "application/vnd.google-earth.kml+xml";

/// Serve the latest rendered camera-view overlay. 204 until the engine has
/// completed its first tick.
#[utoipa::path(
    get,
    path = "/live.kml",
    responses(
        (status = 200, description = "Camera-view KML overlay", body = String, content_type = "application/vnd.google-earth.kml+xml"),
        (status = 204, description = "No position fix yet")
    ),
    tag = "overlay"
)]
pub async fn live_kml(State(state): State<AppState>) -> Response {
    match state.overlay.latest() {
        Some(kml) => ([(header::CONTENT_TYPE, KML_CONTENT_TYPE)], kml).into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    }
}
