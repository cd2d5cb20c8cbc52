//! Module with GPS specific structures
use crate::Error;
use chrono::{DateTime, Utc};
use std::fmt;

/// Mean earth radius in meters used for great circle calculations
pub const EARTH_RADIUS: f64 = 6_371_000.0;

/// Source of a location fix
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Provider {
    Gps,
    Network,
    GeoUri,
    Manual,
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Provider::Gps => write!(f, "gps"),
            Provider::Network => write!(f, "network"),
            Provider::GeoUri => write!(f, "geo_uri"),
            Provider::Manual => write!(f, "manual"),
        }
    }
}

/// Stores a single geospatial point
#[derive(Clone, Debug, PartialEq)]
pub struct Location {
    /// latitude coordinate in degrees
    latitude: f64,
    /// longitude coordinate in degrees
    longitude: f64,
    /// altitude in meters if available
    altitude: Option<f64>,
    /// radius of the area of uncertainty in meters if available
    accuracy: Option<f32>,
    /// when the fix was taken if known
    time: Option<DateTime<Utc>>,
    provider: Provider,
}

impl Location {
    /// Create a manually entered location, latitude and longitude are in degrees
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, Error> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(Error::InvalidCoordinate(format!(
                "latitude {} is outside of -90..90",
                latitude
            )));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(Error::InvalidCoordinate(format!(
                "longitude {} is outside of -180..180",
                longitude
            )));
        }
        Ok(Location {
            latitude,
            longitude,
            altitude: None,
            accuracy: None,
            time: None,
            provider: Provider::Manual,
        })
    }

    /// Return the location with an altitude in meters attached
    pub fn with_altitude(mut self, altitude: f64) -> Self {
        self.altitude = Some(altitude);
        self
    }

    /// Return the location with an accuracy radius in meters attached
    pub fn with_accuracy(mut self, accuracy: f32) -> Self {
        self.accuracy = Some(accuracy.max(0.0));
        self
    }

    /// Return the location stamped with the time of the fix
    pub fn with_time(mut self, time: DateTime<Utc>) -> Self {
        self.time = Some(time);
        self
    }

    /// Return the location tagged with the provider that produced it
    pub fn with_provider(mut self, provider: Provider) -> Self {
        self.provider = provider;
        self
    }

    /// Return latitude in degrees
    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Return longitude in degrees
    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Return altitude in meters (if defined)
    pub fn altitude(&self) -> Option<f64> {
        self.altitude
    }

    /// Return accuracy radius in meters (if defined)
    pub fn accuracy(&self) -> Option<f32> {
        self.accuracy
    }

    pub fn time(&self) -> Option<DateTime<Utc>> {
        self.time
    }

    pub fn provider(&self) -> Provider {
        self.provider
    }

    /// Great circle distance in meters to another location (haversine)
    pub fn distance_to(&self, other: &Location) -> f64 {
        let lat1 = self.latitude.to_radians();
        let lat2 = other.latitude.to_radians();
        let d_lat = lat2 - lat1;
        let d_lon = (other.longitude - self.longitude).to_radians();

        let a = (d_lat * 0.5).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon * 0.5).sin().powi(2);
        2.0 * EARTH_RADIUS * a.sqrt().atan2((1.0 - a).sqrt())
    }

    /// Initial great circle bearing in degrees (0..360) towards another location
    pub fn bearing_to(&self, other: &Location) -> f64 {
        let lat1 = self.latitude.to_radians();
        let lat2 = other.latitude.to_radians();
        let d_lon = (other.longitude - self.longitude).to_radians();

        let y = d_lon.sin() * lat2.cos();
        let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * d_lon.cos();
        let bearing = y.atan2(x).to_degrees().rem_euclid(360.0);
        // rem_euclid can round up to exactly 360 for tiny negative inputs
        if bearing >= 360.0 {
            0.0
        } else {
            bearing
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.6}, {:.6})", self.latitude, self.longitude)
    }
}

/// Return the most recent of the last GPS and network fixes
///
/// The network fix only wins when it is strictly newer, a fix without a timestamp is treated
/// as older than any stamped fix.
pub fn best_known_location(gps: Option<Location>, network: Option<Location>) -> Option<Location> {
    match (gps, network) {
        (None, network) => network,
        (gps, None) => gps,
        (Some(gps), Some(network)) => {
            if network.time() > gps.time() {
                Some(network)
            } else {
                Some(gps)
            }
        }
    }
}
