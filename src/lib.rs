//! Share locations as geo URIs and point a compass or map at the locations others share
pub mod cli;
pub mod color;
pub mod compass;
pub mod config;
mod error;
pub mod fix;
pub mod geo_uri;
pub mod gps;
pub mod message;
pub mod services;
pub mod units;

pub use color::{palette_color, Color};
pub use compass::{CompassEngine, SensorAccuracy, SensorKind, SensorSample, Target};
pub use error::Error;
pub use fix::{FixCollector, FixStatus};
pub use gps::{best_known_location, Location, Provider};
pub use message::{append_location, find_geo_uri, parse_message, GeoMessage, MessagePart};
pub use units::DistanceUnits;
