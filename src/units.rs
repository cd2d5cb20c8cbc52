//! Present meter distances in a reader friendly format, converting to imperial units if needed
use crate::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const METRES_PER_FOOT: f64 = 0.3048;

/// Unit system used when displaying distances to the user
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistanceUnits {
    Metric,
    Imperial,
}

impl DistanceUnits {
    /// Return a short label for a distance, e.g. "350m", "1.5km" or "12mi"
    pub fn distance_string(self, metres: f64) -> String {
        match self {
            DistanceUnits::Imperial => {
                let feet = metres / METRES_PER_FOOT;
                if feet < 300.0 {
                    format!("{}ft", feet as i64)
                } else if feet < 1320.0 {
                    format!("{}yd", (feet / 3.0) as i64)
                } else if feet < 52800.0 {
                    format!("{:.1}mi", (feet / 528.0) as i64 as f64 / 10.0)
                } else {
                    format!("{}mi", (feet / 5280.0) as i64)
                }
            }
            DistanceUnits::Metric => {
                if metres < 1000.0 {
                    format!("{}m", metres as i64)
                } else if metres < 10000.0 {
                    format!("{:.1}km", (metres / 100.0) as i64 as f64 / 10.0)
                } else {
                    format!("{}km", (metres / 1000.0) as i64)
                }
            }
        }
    }

    /// Return a description of the radius of uncertainty, e.g. "25 metres"
    pub fn accuracy_string(self, metres: f64) -> String {
        match self {
            DistanceUnits::Imperial => {
                let feet = metres / METRES_PER_FOOT;
                if feet < 300.0 {
                    format!("{} feet", feet as i64)
                } else if feet < 5280.0 {
                    format!("{} yards", (feet / 3.0) as i64)
                } else {
                    format!("{} miles", (feet / 5280.0) as i64)
                }
            }
            DistanceUnits::Metric => format!("{} metres", metres as i64),
        }
    }
}

impl Default for DistanceUnits {
    fn default() -> Self {
        DistanceUnits::Metric
    }
}

impl FromStr for DistanceUnits {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "metric" => Ok(DistanceUnits::Metric),
            "imperial" => Ok(DistanceUnits::Imperial),
            _ => Err(Error::InvalidConfigurationValue(format!(
                "Unknown units {}: expected: metric, imperial",
                s
            ))),
        }
    }
}

impl fmt::Display for DistanceUnits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DistanceUnits::Metric => write!(f, "metric"),
            DistanceUnits::Imperial => write!(f, "imperial"),
        }
    }
}
