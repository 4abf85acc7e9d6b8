//! Session configuration.
//!
//! Typically loaded from a JSON file by the kiosk application:
//!
//! ```json
//! { "fallback": { "lat": 7.25231, "lng": 80.59253 } }
//! ```

use std::io::Read;

use serde::{Deserialize, Serialize};

use nav_core::GeoPoint;

use crate::{NavError, NavResult};

/// Default start point when the device cannot report a position: the main
/// campus entrance.
pub const CAMPUS_ENTRANCE: GeoPoint = GeoPoint { lat: 7.252310, lng: 80.592530 };

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Coordinate routed from when positioning is denied, unavailable,
    /// timed out, or returns an invalid fix.
    #[serde(default = "default_fallback")]
    pub fallback: GeoPoint,
}

fn default_fallback() -> GeoPoint {
    CAMPUS_ENTRANCE
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self { fallback: CAMPUS_ENTRANCE }
    }
}

impl SessionConfig {
    pub fn from_json_reader<R: Read>(reader: R) -> NavResult<Self> {
        let config: Self =
            serde_json::from_reader(reader).map_err(|e| NavError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_str(s: &str) -> NavResult<Self> {
        Self::from_json_reader(s.as_bytes())
    }

    /// The fallback must itself be a usable coordinate, otherwise a denied
    /// position would have nowhere to route from.
    pub fn validate(&self) -> NavResult<()> {
        if !self.fallback.is_valid() {
            return Err(NavError::Config(format!(
                "fallback coordinate {} is not a valid lat/lng",
                self.fallback
            )));
        }
        Ok(())
    }
}
