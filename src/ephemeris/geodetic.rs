// WGS-84 constants
const WGS84_A_KM: f64 = 6378.137;
const WGS84_F: f64 = 1.0 / 298.257_223_563;
const WGS84_E2: f64 = 2.0 * WGS84_F - WGS84_F * WGS84_F;

pub fn teme_to_ecef_position(pos_teme: [f64; 3], gmst: f64) -> [f64; 3] {
    let cos_gmst = gmst.cos();
    let sin_gmst = gmst.sin();
    [
        pos_teme[0] * cos_gmst + pos_teme[1] * sin_gmst,
        -pos_teme[0] * sin_gmst + pos_teme[1] * cos_gmst,
        pos_teme[2],
    ]
}

/// Convert an ECEF position in kilometers to geodetic latitude, longitude
/// (degrees) and altitude above the WGS-84 ellipsoid (kilometers).
///
/// Iterative latitude refinement; converges to well below the accuracy of
/// the propagated state for any orbital altitude.
pub fn ecef_to_geodetic(ecef: [f64; 3]) -> (f64, f64, f64) {
    let [x, y, z] = ecef;
    let p = (x * x + y * y).sqrt();
    let lon = y.atan2(x);

    let b = WGS84_A_KM * (1.0 - WGS84_F);
    let mut lat = z.atan2(p * (1.0 - WGS84_E2));
    for _ in 0..5 {
        let sin_lat = lat.sin();
        let n = WGS84_A_KM / (1.0 - WGS84_E2 * sin_lat * sin_lat).sqrt();
        lat = (z + WGS84_E2 * n * sin_lat).atan2(p);
    }

    let sin_lat = lat.sin();
    let n = WGS84_A_KM / (1.0 - WGS84_E2 * sin_lat * sin_lat).sqrt();
    let alt_km = if lat.cos().abs() > 1e-10 {
        p / lat.cos() - n
    } else {
        z.abs() - b
    };

    (lat.to_degrees(), lon.to_degrees(), alt_km)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn geodetic_to_ecef(lat_deg: f64, lon_deg: f64, alt_km: f64) -> [f64; 3] {
        let lat = lat_deg.to_radians();
        let lon = lon_deg.to_radians();
        let sin_lat = lat.sin();
        let n = WGS84_A_KM / (1.0 - WGS84_E2 * sin_lat * sin_lat).sqrt();
        [
            (n + alt_km) * lat.cos() * lon.cos(),
            (n + alt_km) * lat.cos() * lon.sin(),
            (n * (1.0 - WGS84_E2) + alt_km) * sin_lat,
        ]
    }

    #[test]
    fn test_ecef_geodetic_roundtrip() {
        let ecef = geodetic_to_ecef(40.0, -75.0, 420.0);
        let (lat, lon, alt) = ecef_to_geodetic(ecef);
        assert!((lat - 40.0).abs() < 1e-6, "lat: {}", lat);
        assert!((lon - -75.0).abs() < 1e-6, "lon: {}", lon);
        assert!((alt - 420.0).abs() < 1e-3, "alt: {}", alt);
    }

    #[test]
    fn test_ecef_geodetic_equator() {
        let (lat, lon, alt) = ecef_to_geodetic([WGS84_A_KM + 400.0, 0.0, 0.0]);
        assert!(lat.abs() < 1e-9);
        assert!(lon.abs() < 1e-9);
        assert!((alt - 400.0).abs() < 1e-6);
    }

    #[test]
    fn test_ecef_geodetic_pole() {
        let b = WGS84_A_KM * (1.0 - WGS84_F);
        let (lat, _, alt) = ecef_to_geodetic([0.0, 0.0, b + 500.0]);
        assert!((lat - 90.0).abs() < 1e-3, "lat: {}", lat);
        assert!((alt - 500.0).abs() < 0.5, "alt: {}", alt);
    }

    #[test]
    fn test_teme_to_ecef_rotation() {
        // A quarter-turn of sidereal angle maps +X TEME onto -Y ECEF
        let ecef = teme_to_ecef_position([7000.0, 0.0, 0.0], std::f64::consts::FRAC_PI_2);
        assert!(ecef[0].abs() < 1e-9);
        assert!((ecef[1] + 7000.0).abs() < 1e-9);
        assert!(ecef[2].abs() < 1e-9);
    }
}
