//! Last-known device location for Android hosts.
//!
//! The whole operation is a single synchronous walk through the Android
//! framework: request the location permissions, find the application
//! context, fetch the system `LocationManager`, and read the last fix of the
//! `fused` provider. It is written against [`seekkit_bridge::HostBridge`], so
//! the same code runs over JNI on a device and over the scripted bridge in
//! tests.
//!
//! Native callers use the C entry points in [`ffi`].

#![warn(missing_docs)]

mod context;
pub mod ffi;
mod manager;
mod query;

#[cfg(test)]
mod fixture;

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use seekkit_bridge::BridgeError;
pub use seekkit_permission::{PermissionError, PermissionStatus};

pub use context::resolve_application_context;
pub use manager::SystemLocationManager;
pub use query::{
    query_last_known_location, query_last_known_location_json, FUSED_PROVIDER,
    REQUIRED_PROVIDERS,
};

/// A geographic position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// Latitude in degrees (-90 to 90).
    #[serde(rename = "lat")]
    pub latitude: f64,
    /// Longitude in degrees (-180 to 180).
    #[serde(rename = "lon")]
    pub longitude: f64,
}

impl Location {
    /// Build a location from raw coordinates.
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Render as `{"lat": <f>, "lon": <f>}` with six fractional digits.
    ///
    /// # Errors
    /// [`LocationError::InvalidCoordinate`] if either value is NaN or infinite,
    /// since the text would not be JSON.
    pub fn to_json(&self) -> Result<String, LocationError> {
        for (axis, value) in [("latitude", self.latitude), ("longitude", self.longitude)] {
            if !value.is_finite() {
                return Err(LocationError::InvalidCoordinate { axis, value });
            }
        }
        Ok(format!(
            "{{\"lat\": {:.6}, \"lon\": {:.6}}}",
            self.latitude, self.longitude
        ))
    }

    /// Parse the text produced by [`Location::to_json`] (or any JSON object
    /// with `lat` and `lon` numbers).
    ///
    /// # Errors
    /// [`LocationError::Parse`] if the text is not such an object.
    pub fn from_json(text: &str) -> Result<Self, LocationError> {
        serde_json::from_str(text).map_err(|err| LocationError::Parse(err.to_string()))
    }

    /// Parse coordinates typed in by the user when no device location is
    /// available.
    ///
    /// # Errors
    /// [`LocationError::Parse`] for non-numeric input and
    /// [`LocationError::InvalidCoordinate`] for values outside the valid range.
    pub fn from_manual_entry(latitude: &str, longitude: &str) -> Result<Self, LocationError> {
        let latitude = parse_coordinate("latitude", latitude, 90.0)?;
        let longitude = parse_coordinate("longitude", longitude, 180.0)?;
        Ok(Self::new(latitude, longitude))
    }

    /// Longitude-first `[x, y]` pair, the order map libraries expect.
    #[must_use]
    pub const fn to_lon_lat(self) -> [f64; 2] {
        [self.longitude, self.latitude]
    }
}

impl FromStr for Location {
    type Err = LocationError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        Self::from_json(text)
    }
}

fn parse_coordinate(axis: &'static str, text: &str, limit: f64) -> Result<f64, LocationError> {
    let value: f64 = text
        .trim()
        .parse()
        .map_err(|err| LocationError::Parse(format!("{axis} {text:?}: {err}")))?;
    if !value.is_finite() || value.abs() > limit {
        return Err(LocationError::InvalidCoordinate { axis, value });
    }
    Ok(value)
}

/// Errors that can occur when querying the location.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LocationError {
    /// A lookup or call into the runtime failed.
    #[error(transparent)]
    Bridge(#[from] BridgeError),
    /// The permission request could not be issued.
    #[error(transparent)]
    Permission(#[from] PermissionError),
    /// The device reports fewer providers than expected.
    #[error("expected at least {expected} location providers, found {found}")]
    TooFewProviders {
        /// Providers required.
        expected: usize,
        /// Providers reported.
        found: usize,
    },
    /// The provider has no fix yet, e.g. right after permissions are granted.
    #[error("no last known location from provider {provider}")]
    NoLastKnownLocation {
        /// Provider that was queried.
        provider: String,
    },
    /// A coordinate is not a usable number.
    #[error("invalid {axis}: {value}")]
    InvalidCoordinate {
        /// `latitude` or `longitude`.
        axis: &'static str,
        /// The offending value.
        value: f64,
    },
    /// Location text could not be parsed.
    #[error("invalid location text: {0}")]
    Parse(String),
}
