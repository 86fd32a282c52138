use super::sample::AttitudeSample;
use super::state::PointingMode;
use super::targets::GroundTarget;
use crate::ephemeris::GeodeticPosition;

pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Below this surface distance the target counts as coincident with the
/// sub-point: the view is straight down and the bearing is undefined.
const COINCIDENT_DIST_KM: f64 = 1e-6;

/// Great-circle surface distance between two geodetic points, spherical earth.
pub fn haversine_km(lat1_deg: f64, lon1_deg: f64, lat2_deg: f64, lon2_deg: f64) -> f64 {
    let phi1 = lat1_deg.to_radians();
    let phi2 = lat2_deg.to_radians();
    let dphi = phi2 - phi1;
    let dlambda = (lon2_deg - lon1_deg).to_radians();

    let a = (dphi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (dlambda / 2.0).sin().powi(2);
    EARTH_RADIUS_KM * 2.0 * a.sqrt().atan2((1.0 - a).sqrt())
}

/// Initial bearing along the great circle from point 1 to point 2.
/// 0° = north, 90° = east, normalized to [0, 360).
pub fn bearing_deg(lat1_deg: f64, lon1_deg: f64, lat2_deg: f64, lon2_deg: f64) -> f64 {
    let phi1 = lat1_deg.to_radians();
    let phi2 = lat2_deg.to_radians();
    let dlambda = (lon2_deg - lon1_deg).to_radians();

    let x = dlambda.sin() * phi2.cos();
    let y = phi1.cos() * phi2.sin() - phi1.sin() * phi2.cos() * dlambda.cos();
    x.atan2(y).to_degrees().rem_euclid(360.0)
}

/// Compute the camera attitude for one tick.
///
/// In Lookdown mode (or Focus with no target available) the camera points at
/// nadir. In Focus mode the heading is the bearing to the target and the tilt
/// is the angle off nadir at which the target appears:
/// tilt = 90 − atan2(altitude, surface distance), clamped to [0, 90].
///
/// A target at the sub-point has no defined bearing; the previous heading is
/// retained instead of recomputing an unstable value.
pub fn compute_attitude(
    position: &GeodeticPosition,
    target: Option<&GroundTarget>,
    mode: PointingMode,
    prev_heading_deg: f64,
) -> AttitudeSample {
    let target = match (mode, target) {
        (PointingMode::Focus, Some(target)) => target,
        _ => {
            return AttitudeSample {
                timestamp: position.timestamp,
                heading_deg: 0.0,
                tilt_deg: 0.0,
                range_km: position.altitude_km,
            }
        }
    };

    let dist_km = haversine_km(
        position.latitude_deg,
        position.longitude_deg,
        target.latitude_deg,
        target.longitude_deg,
    );

    if dist_km < COINCIDENT_DIST_KM {
        // Directly overhead: well-defined tilt, undefined bearing
        return AttitudeSample {
            timestamp: position.timestamp,
            heading_deg: prev_heading_deg.rem_euclid(360.0),
            tilt_deg: 0.0,
            range_km: position.altitude_km,
        };
    }

    let heading_deg = bearing_deg(
        position.latitude_deg,
        position.longitude_deg,
        target.latitude_deg,
        target.longitude_deg,
    );
    let elev_deg = position.altitude_km.atan2(dist_km).to_degrees();
    let tilt_deg = (90.0 - elev_deg).clamp(0.0, 90.0);
    let range_km = (position.altitude_km * position.altitude_km + dist_km * dist_km).sqrt();

    AttitudeSample {
        timestamp: position.timestamp,
        heading_deg,
        tilt_deg,
        range_km,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn subpoint(lat: f64, lon: f64, alt_km: f64) -> GeodeticPosition {
        GeodeticPosition {
            timestamp: Utc::now(),
            latitude_deg: lat,
            longitude_deg: lon,
            altitude_km: alt_km,
        }
    }

    fn target(lat: f64, lon: f64) -> GroundTarget {
        GroundTarget {
            id: "site".to_string(),
            latitude_deg: lat,
            longitude_deg: lon,
        }
    }

    #[test]
    fn test_haversine_one_degree_of_longitude_at_equator() {
        let d = haversine_km(0.0, 0.0, 0.0, 1.0);
        // One degree of arc on a 6371 km sphere
        assert!((d - 111.19).abs() < 0.1, "d = {}", d);
    }

    #[test]
    fn test_bearing_due_north_and_east() {
        assert!(bearing_deg(0.0, 0.0, 10.0, 0.0).abs() < 1e-9);
        assert!((bearing_deg(0.0, 0.0, 0.0, 10.0) - 90.0).abs() < 1e-9);
    }

    #[test]
    fn test_bearing_always_in_range() {
        let points = [
            (50.0, -120.0, -30.0, 10.0),
            (-80.0, 170.0, 80.0, -170.0),
            (10.0, 0.0, 10.0, -0.1),
            (0.0, 0.0, -1.0, 0.0),
        ];
        for (lat1, lon1, lat2, lon2) in points {
            let b = bearing_deg(lat1, lon1, lat2, lon2);
            assert!((0.0..360.0).contains(&b), "bearing {} out of range", b);
        }
    }

    #[test]
    fn test_lookdown_points_at_nadir() {
        let sample = compute_attitude(
            &subpoint(45.0, 9.0, 420.0),
            Some(&target(31.8, 35.2)),
            PointingMode::Lookdown,
            123.0,
        );
        assert_eq!(sample.heading_deg, 0.0);
        assert_eq!(sample.tilt_deg, 0.0);
        assert_eq!(sample.range_km, 420.0);
    }

    #[test]
    fn test_focus_without_target_behaves_as_lookdown() {
        let sample = compute_attitude(&subpoint(0.0, 0.0, 400.0), None, PointingMode::Focus, 77.0);
        assert_eq!(sample.heading_deg, 0.0);
        assert_eq!(sample.tilt_deg, 0.0);
    }

    #[test]
    fn test_focus_on_target_due_east() {
        // Satellite over (0, 0) at 400 km, target one degree east:
        // heading ~90, dist ~111 km, tilt = 90 - atan2(400, 111) ~ 15.5
        let sample = compute_attitude(
            &subpoint(0.0, 0.0, 400.0),
            Some(&target(0.0, 1.0)),
            PointingMode::Focus,
            0.0,
        );
        assert!((sample.heading_deg - 90.0).abs() < 1e-6, "heading = {}", sample.heading_deg);
        assert!((sample.tilt_deg - 15.5).abs() < 0.5, "tilt = {}", sample.tilt_deg);

        let dist = haversine_km(0.0, 0.0, 0.0, 1.0);
        let expected_range = (400.0f64 * 400.0 + dist * dist).sqrt();
        assert!((sample.range_km - expected_range).abs() < 1e-9);
    }

    #[test]
    fn test_target_at_subpoint_is_overhead_not_an_error() {
        let sample = compute_attitude(
            &subpoint(10.0, 20.0, 400.0),
            Some(&target(10.0, 20.0)),
            PointingMode::Focus,
            237.0,
        );
        assert_eq!(sample.tilt_deg, 0.0);
        assert_eq!(sample.range_km, 400.0);
        // Bearing is undefined overhead; the previous heading is kept
        assert_eq!(sample.heading_deg, 237.0);
        assert!(sample.heading_deg.is_finite());
    }

    #[test]
    fn test_tilt_approaches_horizon_for_distant_target() {
        let sample = compute_attitude(
            &subpoint(0.0, 0.0, 400.0),
            Some(&target(0.0, 60.0)),
            PointingMode::Focus,
            0.0,
        );
        assert!(sample.tilt_deg > 80.0 && sample.tilt_deg <= 90.0, "tilt = {}", sample.tilt_deg);
    }
}
