use axum::{routing::get, routing::post, Router};
use std::sync::Arc;
use thiserror::Error;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::attitude::{AttitudeEngine, EngineParams};
use crate::ephemeris::{EphemerisError, TleProvider};
use crate::overlay::OverlayWriter;

use super::api::engine as engine_handlers;
use super::api::overlay as overlay_handlers;
use super::api_doc::ApiDoc;
use super::auth::AppState;
use super::config::Config;

#[derive(Debug, Error)]
pub enum ServeError {
    #[error("ephemeris error: {0}")]
    Ephemeris(#[from] EphemerisError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub async fn run_server(config: Config) -> Result<(), ServeError> {
    let bind_addr = config.web.bind.clone();

    let provider = TleProvider::from_file(&config.satellite.tle_file)?;
    let satellite = config
        .satellite
        .name
        .clone()
        .or_else(|| provider.satellite_name().map(String::from))
        .unwrap_or_else(|| format!("NORAD {}", provider.norad_id()));
    log::info!(
        "tracking {} against {} ground target(s)",
        satellite,
        config.targets.len()
    );

    let params = EngineParams {
        tick_period: config.engine.tick_period,
        target_reselect_period: chrono::Duration::from_std(config.engine.target_reselect_period)
            .unwrap_or_else(|_| chrono::Duration::seconds(60)),
        initial_mode: config.engine.initial_mode,
        power: config.engine.power_model(),
    };
    let writer = config.overlay.path.clone().map(OverlayWriter::new);

    let mut engine = AttitudeEngine::new(
        Arc::new(provider),
        config.targets.clone(),
        params,
        writer,
    );

    let state = AppState {
        config: Arc::new(config),
        store: engine.store(),
        overlay: engine.overlay_feed(),
    };

    engine.start();

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        // Engine API endpoints
        .route("/api/engine/state", get(engine_handlers::get_state))
        .route("/api/engine/angles", get(engine_handlers::get_angles))
        .route("/api/engine/status", get(engine_handlers::get_status))
        .route("/api/engine/mode", post(engine_handlers::set_mode))
        // Overlay feed
        .route("/live.kml", get(overlay_handlers::live_kml))
        // OpenAPI / Swagger
        .merge(SwaggerUi::new("/swagger-ui").url("/api-doc/openapi.json", ApiDoc::openapi()))
        // Middleware
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    log::info!("Starting server on {}", bind_addr);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    let result = axum::serve(listener, app).await;

    engine.stop().await;
    result.map_err(ServeError::from)
}
