//! OSRM HTTP adapter for routes with per-step geometry.

use std::fmt;

use serde::{Deserialize, Deserializer};

use crate::polyline::{Coordinate, Polyline};
use crate::stitch::{stitch, stitch_legs};
use crate::traits::{Leg, Step};

#[derive(Debug, Clone)]
pub struct OsrmConfig {
    pub base_url: String,
    pub profile: String,
    pub timeout_secs: u64,
}

impl Default for OsrmConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            profile: "car".to_string(),
            timeout_secs: 10,
        }
    }
}

impl OsrmConfig {
    /// Defaults overridden by `OSRM_BASE_URL`, `OSRM_PROFILE` and
    /// `OSRM_TIMEOUT_SECS` when set.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(base_url) = std::env::var("OSRM_BASE_URL") {
            config.base_url = base_url;
        }
        if let Ok(profile) = std::env::var("OSRM_PROFILE") {
            config.profile = profile;
        }
        if let Ok(raw) = std::env::var("OSRM_TIMEOUT_SECS") {
            match raw.trim().parse() {
                Ok(secs) => config.timeout_secs = secs,
                Err(err) => tracing::warn!(
                    "Ignoring OSRM_TIMEOUT_SECS={:?} ({}), using {}s",
                    raw,
                    err,
                    config.timeout_secs
                ),
            }
        }

        config
    }
}

#[derive(Debug)]
pub enum OsrmError {
    Http(reqwest::Error),
    Json(serde_json::Error),
    /// Non-success HTTP status with a body that is not an OSRM response.
    Status(u16),
    /// OSRM answered with a code other than `Ok`.
    Service { code: String, message: Option<String> },
    TooFewWaypoints(usize),
    NoRoute,
}

impl fmt::Display for OsrmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OsrmError::Http(err) => write!(f, "OSRM request failed: {}", err),
            OsrmError::Json(err) => write!(f, "invalid OSRM response: {}", err),
            OsrmError::Status(status) => write!(f, "OSRM returned HTTP {}", status),
            OsrmError::Service { code, message } => match message {
                Some(message) => write!(f, "OSRM error {}: {}", code, message),
                None => write!(f, "OSRM error {}", code),
            },
            OsrmError::TooFewWaypoints(count) => {
                write!(f, "a route needs at least 2 waypoints, got {}", count)
            }
            OsrmError::NoRoute => write!(f, "OSRM returned no route"),
        }
    }
}

impl std::error::Error for OsrmError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            OsrmError::Http(err) => Some(err),
            OsrmError::Json(err) => Some(err),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for OsrmError {
    fn from(err: reqwest::Error) -> Self {
        OsrmError::Http(err)
    }
}

impl From<serde_json::Error> for OsrmError {
    fn from(err: serde_json::Error) -> Self {
        OsrmError::Json(err)
    }
}

#[derive(Debug, Clone)]
pub struct OsrmClient {
    config: OsrmConfig,
    client: reqwest::blocking::Client,
}

impl OsrmClient {
    pub fn new(config: OsrmConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }

    pub fn config(&self) -> &OsrmConfig {
        &self.config
    }

    /// Fetches the first route through `waypoints` (lat, lng), with step
    /// geometries.
    pub fn route(&self, waypoints: &[Coordinate]) -> Result<OsrmRoute, OsrmError> {
        if waypoints.len() < 2 {
            return Err(OsrmError::TooFewWaypoints(waypoints.len()));
        }

        let url = route_url(&self.config, waypoints);
        tracing::debug!("Requesting OSRM route: {}", url);

        let response = self.client.get(url).send()?;
        let status = response.status();
        let body = response.text()?;

        match parse_route_response(&body) {
            Err(OsrmError::Json(err)) if !status.is_success() => {
                tracing::warn!("OSRM returned HTTP {} with unreadable body: {}", status, err);
                Err(OsrmError::Status(status.as_u16()))
            }
            Err(err) => {
                tracing::warn!("OSRM route request failed: {}", err);
                Err(err)
            }
            Ok(route) => Ok(route),
        }
    }
}

fn route_url(config: &OsrmConfig, waypoints: &[Coordinate]) -> String {
    let coords = waypoints
        .iter()
        .map(|(lat, lng)| format!("{:.6},{:.6}", lng, lat))
        .collect::<Vec<_>>()
        .join(";");

    format!(
        "{}/route/v1/{}/{}?steps=true&geometries=geojson&overview=false",
        config.base_url.trim_end_matches('/'),
        config.profile,
        coords
    )
}

/// Parses the body of an OSRM `/route` response and returns its first route.
pub fn parse_route_response(body: &str) -> Result<OsrmRoute, OsrmError> {
    let response: OsrmRouteResponse = serde_json::from_str(body)?;

    if response.code != "Ok" {
        return Err(OsrmError::Service {
            code: response.code,
            message: response.message,
        });
    }

    response.routes.into_iter().next().ok_or(OsrmError::NoRoute)
}

#[derive(Debug, Deserialize)]
struct OsrmRouteResponse {
    code: String,
    message: Option<String>,
    #[serde(default)]
    routes: Vec<OsrmRoute>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct OsrmRoute {
    /// Meters.
    pub distance: f64,
    /// Seconds.
    pub duration: f64,
    pub legs: Vec<OsrmLeg>,
}

impl OsrmRoute {
    /// Stitched path of each leg, in leg order.
    pub fn leg_geometries(&self) -> Vec<Polyline> {
        stitch_legs(&self.legs)
    }

    /// Path of the whole route. Consecutive legs share their waypoint
    /// coordinate, so legs are joined with the same rule as steps.
    pub fn geometry(&self) -> Polyline {
        stitch(&self.leg_geometries())
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct OsrmLeg {
    pub distance: f64,
    pub duration: f64,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub steps: Vec<OsrmStep>,
}

impl Leg for OsrmLeg {
    type Step = OsrmStep;

    fn steps(&self) -> &[OsrmStep] {
        &self.steps
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct OsrmStep {
    pub distance: f64,
    pub duration: f64,
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "geojson_line")]
    pub geometry: Option<Polyline>,
}

impl Step for OsrmStep {
    fn geometry(&self) -> Option<&Polyline> {
        self.geometry.as_ref()
    }
}

#[derive(Debug, Deserialize)]
struct GeoJsonLineString {
    coordinates: Vec<(f64, f64)>,
}

/// GeoJSON `[lng, lat]` positions to (lat, lng) points.
fn geojson_line<'de, D>(deserializer: D) -> Result<Option<Polyline>, D::Error>
where
    D: Deserializer<'de>,
{
    let line = Option::<GeoJsonLineString>::deserialize(deserializer)?;
    Ok(line.map(|line| {
        line.coordinates
            .into_iter()
            .map(|(lng, lat)| (lat, lng))
            .collect()
    }))
}
