use chrono::DateTime;
use serde::Serialize;

/// One camera-pointing solution. Heading is normalized to [0, 360),
/// tilt is clamped to [0, 90], range is the slant distance to the view point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, utoipa::ToSchema)]
pub struct AttitudeSample {
    pub timestamp: DateTime<chrono::Utc>,
    pub heading_deg: f64,
    pub tilt_deg: f64,
    pub range_km: f64,
}
