use std::collections::VecDeque;
use std::fmt::Write as _;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use thiserror::Error;

use crate::attitude::{EngineState, GroundTarget};
use crate::ephemeris::GeodeticPosition;

/// Ground-track points kept for the overlay's waypoint trail.
const TRACK_CAPACITY: usize = 120;

/// Target icon color, AABBGGRR.
const TARGET_COLOR: &str = "ff0000ff";
const TARGET_ICON: &str = "http://maps.google.com/mapfiles/kml/shapes/placemark_circle.png";

#[derive(Debug, Error)]
pub enum OverlayError {
    #[error("overlay write error: {0}")]
    Io(#[from] std::io::Error),
}

/// Bounded ring of recent sub-points, oldest first.
#[derive(Debug, Clone)]
pub struct TrackHistory {
    points: VecDeque<GeodeticPosition>,
    capacity: usize,
}

impl Default for TrackHistory {
    fn default() -> Self {
        Self::with_capacity(TRACK_CAPACITY)
    }
}

impl TrackHistory {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            points: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, position: GeodeticPosition) {
        if self.points.len() == self.capacity {
            self.points.pop_front();
        }
        self.points.push_back(position);
    }

    pub fn points(&self) -> impl Iterator<Item = &GeodeticPosition> {
        self.points.iter()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Last rendered overlay document, shared between the tick loop and the
/// serving layer. Readers get the previous document while a tick is in
/// flight, never a partial one.
#[derive(Debug, Clone, Default)]
pub struct OverlayFeed {
    latest: Arc<Mutex<Option<String>>>,
}

impl OverlayFeed {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn publish(&self, kml: String) {
        *self.latest.lock().unwrap() = Some(kml);
    }

    pub fn latest(&self) -> Option<String> {
        self.latest.lock().unwrap().clone()
    }
}

/// Writes the overlay document to disk, once per tick. Write failures are
/// reported to the caller and never fatal to the engine.
#[derive(Debug)]
pub struct OverlayWriter {
    path: PathBuf,
}

impl OverlayWriter {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn write(&self, kml: &str) -> Result<(), OverlayError> {
        // Temp file plus rename so a reader never sees a half-written document
        let tmp = self.path.with_extension("kml.tmp");
        std::fs::write(&tmp, kml)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

/// Render the camera-view KML document for the latest completed tick.
/// Returns `None` until the engine has produced a first position fix.
pub fn render_kml(
    state: &EngineState,
    targets: &[GroundTarget],
    history: &TrackHistory,
) -> Option<String> {
    let position = state.position?;
    let sample = state.sample?;
    let alt_m = position.altitude_km * 1000.0;

    let mut kml = String::new();
    kml.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    kml.push_str("<kml xmlns=\"http://www.opengis.net/kml/2.2\">\n");
    kml.push_str("  <Document>\n");
    kml.push_str("    <name>Satellite Camera View</name>\n");

    let _ = write!(
        kml,
        "    <Style id=\"targetStyle\">\n      <IconStyle>\n        <color>{}</color>\n        <scale>1.3</scale>\n        <Icon><href>{}</href></Icon>\n      </IconStyle>\n    </Style>\n",
        TARGET_COLOR, TARGET_ICON
    );

    let _ = write!(
        kml,
        "    <Camera>\n      <longitude>{:.6}</longitude>\n      <latitude>{:.6}</latitude>\n      <altitude>{:.1}</altitude>\n      <heading>{:.1}</heading>\n      <tilt>{:.1}</tilt>\n      <roll>0</roll>\n      <altitudeMode>absolute</altitudeMode>\n    </Camera>\n",
        position.longitude_deg,
        position.latitude_deg,
        alt_m,
        sample.heading_deg,
        sample.tilt_deg
    );

    for target in targets {
        let _ = write!(
            kml,
            "    <Placemark>\n      <name>{}</name>\n      <styleUrl>#targetStyle</styleUrl>\n      <Point>\n        <coordinates>{:.6},{:.6},0</coordinates>\n      </Point>\n    </Placemark>\n",
            target.id, target.longitude_deg, target.latitude_deg
        );
    }

    for (i, point) in history.points().enumerate() {
        let _ = write!(
            kml,
            "    <Placemark>\n      <name>Waypoint {}</name>\n      <Point>\n        <coordinates>{:.6},{:.6},{:.1}</coordinates>\n      </Point>\n    </Placemark>\n",
            i + 1,
            point.longitude_deg,
            point.latitude_deg,
            point.altitude_km * 1000.0
        );
    }

    kml.push_str("  </Document>\n");
    kml.push_str("</kml>\n");
    Some(kml)
}
