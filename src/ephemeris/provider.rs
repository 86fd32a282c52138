use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Serialize;
use sgp4::{Constants, Elements};

use super::error::EphemerisError;
use super::geodetic::{ecef_to_geodetic, teme_to_ecef_position};

/// Satellite sub-point at a given instant, as produced by the orbit
/// propagator. Immutable once created.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, utoipa::ToSchema)]
pub struct GeodeticPosition {
    pub timestamp: DateTime<Utc>,
    pub latitude_deg: f64,
    pub longitude_deg: f64,
    pub altitude_km: f64,
}

/// Source of satellite sub-point positions, consumed once per tick.
pub trait PositionProvider {
    fn position_at(&self, timestamp: DateTime<Utc>) -> Result<GeodeticPosition, EphemerisError>;
}

/// SGP4-backed position provider built from a TLE set on disk.
pub struct TleProvider {
    elements: Elements,
    constants: Constants,
}

impl TleProvider {
    pub fn from_file(path: &Path) -> Result<Self, EphemerisError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_tle(&content)
    }

    pub fn from_tle(tle: &str) -> Result<Self, EphemerisError> {
        let (name, line1, line2) = parse_tle_lines(tle)?;
        let elements = Elements::from_tle(name, line1.as_bytes(), line2.as_bytes())?;
        let constants = Constants::from_elements(&elements)?;
        Ok(Self {
            elements,
            constants,
        })
    }

    pub fn satellite_name(&self) -> Option<&str> {
        self.elements.object_name.as_deref()
    }

    pub fn norad_id(&self) -> u64 {
        self.elements.norad_id
    }
}

impl PositionProvider for TleProvider {
    fn position_at(&self, timestamp: DateTime<Utc>) -> Result<GeodeticPosition, EphemerisError> {
        let minutes = self
            .elements
            .datetime_to_minutes_since_epoch(&timestamp.naive_utc())
            .map_err(|e| EphemerisError::NoEphemeris(e.to_string()))?;

        let prediction = self
            .constants
            .propagate(minutes)
            .map_err(|e| EphemerisError::NoEphemeris(e.to_string()))?;

        let sidereal = sgp4::iau_epoch_to_sidereal_time(sgp4::julian_years_since_j2000(
            &timestamp.naive_utc(),
        ));

        let ecef = teme_to_ecef_position(prediction.position, sidereal);
        let (latitude_deg, longitude_deg, altitude_km) = ecef_to_geodetic(ecef);

        Ok(GeodeticPosition {
            timestamp,
            latitude_deg,
            longitude_deg,
            altitude_km,
        })
    }
}

pub fn parse_tle_lines(tle: &str) -> Result<(Option<String>, String, String), EphemerisError> {
    let lines: Vec<String> = tle
        .lines()
        .map(|l| l.trim())
        .filter(|l| !l.is_empty())
        .map(String::from)
        .collect();

    match lines.len() {
        2 => Ok((None, lines[0].clone(), lines[1].clone())),
        3 => Ok((Some(lines[0].clone()), lines[1].clone(), lines[2].clone())),
        _ => Err(EphemerisError::InvalidTleFormat),
    }
}
