use serde::{Deserialize, Serialize};

use super::error::EngineError;
use super::geometry::haversine_km;
use crate::ephemeris::GeodeticPosition;

/// A fixed ground site the camera can be asked to track.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, utoipa::ToSchema)]
pub struct GroundTarget {
    pub id: String,
    pub latitude_deg: f64,
    pub longitude_deg: f64,
}

/// Pick the target nearest to the sub-point by great-circle distance.
/// Exact ties resolve to the first target in list order.
pub fn select_target<'a>(
    position: &GeodeticPosition,
    targets: &'a [GroundTarget],
) -> Result<&'a GroundTarget, EngineError> {
    let mut best: Option<(&GroundTarget, f64)> = None;

    for target in targets {
        let dist_km = haversine_km(
            position.latitude_deg,
            position.longitude_deg,
            target.latitude_deg,
            target.longitude_deg,
        );
        match best {
            Some((_, best_dist)) if dist_km >= best_dist => {}
            _ => best = Some((target, dist_km)),
        }
    }

    best.map(|(target, _)| target)
        .ok_or(EngineError::EmptyTargetSet)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn subpoint(lat: f64, lon: f64) -> GeodeticPosition {
        GeodeticPosition {
            timestamp: Utc::now(),
            latitude_deg: lat,
            longitude_deg: lon,
            altitude_km: 400.0,
        }
    }

    fn target(id: &str, lat: f64, lon: f64) -> GroundTarget {
        GroundTarget {
            id: id.to_string(),
            latitude_deg: lat,
            longitude_deg: lon,
        }
    }

    #[test]
    fn test_selects_nearest_target() {
        let targets = vec![
            target("far", 45.0, 120.0),
            target("near", 1.0, 1.0),
            target("mid", 20.0, 20.0),
        ];
        let selected = select_target(&subpoint(0.0, 0.0), &targets).unwrap();
        assert_eq!(selected.id, "near");
    }

    #[test]
    fn test_tie_breaks_to_first_in_list() {
        // Equidistant east and west of the sub-point
        let targets = vec![target("east", 0.0, 10.0), target("west", 0.0, -10.0)];
        let selected = select_target(&subpoint(0.0, 0.0), &targets).unwrap();
        assert_eq!(selected.id, "east");
    }

    #[test]
    fn test_empty_set_is_an_error() {
        assert!(matches!(
            select_target(&subpoint(0.0, 0.0), &[]),
            Err(EngineError::EmptyTargetSet)
        ));
    }
}
