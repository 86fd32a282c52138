mod error;
mod geodetic;
mod provider;

pub use error::EphemerisError;
pub use geodetic::{ecef_to_geodetic, teme_to_ecef_position};
pub use provider::{parse_tle_lines, GeodeticPosition, PositionProvider, TleProvider};
