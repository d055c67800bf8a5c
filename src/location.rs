//! Geolocation exposure demo.
//!
//! Asks the host for one high-accuracy position fix and turns it into the
//! readings and map links a page shows to make the exposure concrete.

use serde::{Deserialize, Serialize};

use crate::error::ProbeError;
use crate::format::to_fixed;
use crate::host::{Capability, HostEnvironment};

/// Metres per degree of latitude, near enough for sizing a map view.
const METRES_PER_DEGREE: f64 = 111_000.0;
const MIN_VIEW_DELTA: f64 = 0.002;
const MAX_VIEW_DELTA: f64 = 0.1;

/// A position fix, as `GeolocationCoordinates` reports it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeoFix {
    pub latitude: f64,
    pub longitude: f64,
    /// Metres.
    pub accuracy: f64,
    pub altitude: Option<f64>,
    pub altitude_accuracy: Option<f64>,
    /// Degrees clockwise from true north.
    pub heading: Option<f64>,
    /// Metres per second.
    pub speed: Option<f64>,
}

/// How a location request ended.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum GeoOutcome {
    Success {
        fix: GeoFix,
        report: LocationReport,
        links: MapLinks,
    },
    Denied,
    Error {
        reason: String,
    },
    Unsupported,
}

/// Human-readable fix.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationReport {
    pub latitude: String,
    pub longitude: String,
    pub accuracy: String,
    pub altitude: String,
    pub altitude_accuracy: String,
    pub heading: String,
    pub speed: String,
}

impl LocationReport {
    pub fn from_fix(fix: &GeoFix) -> Self {
        fn or_na(value: Option<f64>, render: impl Fn(f64) -> String) -> String {
            value.map(render).unwrap_or_else(|| "N/A".into())
        }

        Self {
            latitude: format!("{} deg", to_fixed(fix.latitude, 8)),
            longitude: format!("{} deg", to_fixed(fix.longitude, 8)),
            accuracy: format!("+/- {} m", to_fixed(fix.accuracy, 1)),
            altitude: or_na(fix.altitude, |a| format!("{} m ASL", to_fixed(a, 1))),
            altitude_accuracy: or_na(fix.altitude_accuracy, |a| format!("+/- {} m", to_fixed(a, 1))),
            heading: or_na(fix.heading, |h| format!("{} deg", to_fixed(h, 1))),
            speed: fix
                .speed
                .map(|s| format!("{} km/h", to_fixed(s * 3.6, 1)))
                .unwrap_or_else(|| "Stationary".into()),
        }
    }
}

/// Links that put the fix on a map.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MapLinks {
    pub google_maps: String,
    pub openstreetmap: String,
    /// Embeddable OSM view with a bounding box sized to the accuracy.
    pub openstreetmap_embed: String,
}

impl MapLinks {
    pub fn from_fix(fix: &GeoFix) -> Self {
        let (lat, lon) = (fix.latitude, fix.longitude);
        let delta = view_delta(fix.accuracy);

        Self {
            google_maps: format!("https://maps.google.com/?q={lat},{lon}&ll={lat},{lon}&z=18"),
            openstreetmap: format!(
                "https://www.openstreetmap.org/?mlat={lat}&mlon={lon}#map=17/{lat}/{lon}"
            ),
            openstreetmap_embed: format!(
                "https://www.openstreetmap.org/export/embed.html?bbox={},{},{},{}&layer=mapnik&marker={lat},{lon}",
                lon - delta,
                lat - delta,
                lon + delta,
                lat + delta,
            ),
        }
    }
}

/// Half-width of the map view in degrees: 1.5× the accuracy radius,
/// clamped so tiny radii still show streets and huge ones stay local.
pub fn view_delta(accuracy_m: f64) -> f64 {
    (accuracy_m / METRES_PER_DEGREE * 1.5).clamp(MIN_VIEW_DELTA, MAX_VIEW_DELTA)
}

impl GeoOutcome {
    pub fn from_fix(fix: GeoFix) -> Self {
        GeoOutcome::Success {
            report: LocationReport::from_fix(&fix),
            links: MapLinks::from_fix(&fix),
            fix,
        }
    }
}

/// Request one fix from the host. Never fails; refusal and errors are
/// outcomes.
pub async fn locate<H: HostEnvironment + ?Sized>(host: &H) -> GeoOutcome {
    match host.current_position().await {
        Ok(Capability::Available(fix)) => {
            log::info!("Position fix acquired (+/- {} m)", to_fixed(fix.accuracy, 0));
            GeoOutcome::from_fix(fix)
        }
        Ok(Capability::Unavailable) => GeoOutcome::Unsupported,
        Err(ProbeError::Blocked(reason)) => {
            log::info!("Geolocation denied: {}", reason);
            GeoOutcome::Denied
        }
        Err(e) => {
            log::warn!("Geolocation failed: {}", e);
            GeoOutcome::Error { reason: e.to_string() }
        }
    }
}
