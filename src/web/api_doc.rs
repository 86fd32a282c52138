use utoipa::{
    openapi::security::{Http, HttpAuthScheme, SecurityScheme},
    Modify, OpenApi,
};

use super::api::engine::{AnglesResponse, SetModeRequest, SetModeResponse, StateResponse};
use super::api::error::ErrorResponse;

#[derive(OpenApi)]
#[openapi(
    paths(
        super::api::engine::get_state,
        super::api::engine::get_angles,
        super::api::engine::get_status,
        super::api::engine::set_mode,
        super::api::overlay::live_kml,
    ),
    components(
        schemas(
            StateResponse,
            AnglesResponse,
            SetModeRequest,
            SetModeResponse,
            ErrorResponse,
            crate::attitude::EngineState,
            crate::attitude::AttitudeSample,
            crate::attitude::PointingMode,
            crate::attitude::GroundTarget,
            crate::ephemeris::GeodeticPosition,
        )
    ),
    modifiers(&SecurityAddon),
    info(
        title = "Satcam Engine API",
        description = "API for the satellite attitude and targeting engine",
        version = "0.1.0"
    ),
    tags(
        (name = "engine", description = "Attitude engine state and control"),
        (name = "overlay", description = "Camera-view overlay feed")
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "api_key",
                SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
            );
        }
    }
}
