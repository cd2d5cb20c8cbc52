//! Store application configuration that gets read from disk
use crate::color::{Color, DEFAULT_PALETTE};
use crate::services::{
    new_compass_rendering_handler, new_map_rendering_handler, CompassDrawingService,
    MapDrawingService,
};
use crate::units::DistanceUnits;
use crate::Error;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_yaml::Value;
use simplelog::LevelFilter;
use std::collections::HashMap;
use std::io::prelude::*;
use std::path::PathBuf;
use std::str::FromStr;

static CONFIG_DIR: &str = "geoshare";
static CONFIG_FILE: &str = "config.yml";

/// Defines the allowed keys under the services map
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceType {
    CompassRendering,
    MapRendering,
}

/// Type alias for clarity
pub type ServiceParameters = HashMap<String, Value>;

/// Configuration options for a single service of any type
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ServiceConfig {
    handler: String,
    #[serde(default)]
    configuration: ServiceParameters,
}

impl ServiceConfig {
    pub fn new(handler: &str) -> Self {
        ServiceConfig {
            handler: handler.to_string(),
            configuration: HashMap::new(),
        }
    }

    pub fn handler(&self) -> &str {
        &self.handler
    }

    pub fn parameters(&self) -> impl Iterator<Item = &String> + '_ {
        self.configuration.keys()
    }

    pub fn get_parameter(&self, key: &str) -> Option<&Value> {
        self.configuration.get(key)
    }

    pub fn get_parameter_as_string(&self, key: &str) -> Option<Result<String, Error>> {
        if let Some(value) = self.configuration.get(key) {
            let value = value
                .as_str()
                .ok_or_else(|| {
                    Error::InvalidConfigurationValue(format!(
                        "invalid value for {}.{}, expected a string: {:?}",
                        &self.handler, key, value
                    ))
                })
                .map(|v| v.to_string());
            Some(value)
        } else {
            None
        }
    }

    pub fn get_parameter_as_i64(&self, key: &str) -> Option<Result<i64, Error>> {
        if let Some(value) = self.configuration.get(key) {
            let value = value.as_i64().ok_or_else(|| {
                Error::InvalidConfigurationValue(format!(
                    "invalid value for {}.{}, expected an integer: {:?}",
                    &self.handler, key, value
                ))
            });
            Some(value)
        } else {
            None
        }
    }

    pub fn get_parameter_as_color(&self, key: &str) -> Option<Result<Color, Error>> {
        self.get_parameter_as_string(key)
            .map(|value| value.and_then(|v| Color::from_str(&v)))
    }
}

/// Set a string parameter on the service instance from a ServiceConfig instance
#[macro_export]
macro_rules! set_string_param_from_config {
    ($b:expr, $k:ident, $c:expr) => {
        if let Some(val) = $c.get_parameter_as_string(stringify!($k)) {
            $b.$k = val?
        }
    };
}

/// Set an integer parameter on the service instance, converting it to the field's type
///
/// Values that don't fit the field's type are rejected rather than wrapped.
#[macro_export]
macro_rules! set_int_param_from_config {
    ($b:expr, $k:ident, $c:expr, $o:ident) => {
        if let Some(val) = $c.get_parameter_as_i64(stringify!($k)) {
            let val = val?;
            $b.$k = <$o as std::convert::TryFrom<i64>>::try_from(val).map_err(|_| {
                $crate::Error::InvalidConfigurationValue(format!(
                    "invalid value for {}, out of range for {}: {}",
                    stringify!($k),
                    stringify!($o),
                    val
                ))
            })?
        }
    };
}

#[macro_export]
macro_rules! set_color_param_from_config {
    ($b:expr, $k:ident, $c:expr) => {
        if let Some(val) = $c.get_parameter_as_color(stringify!($k)) {
            $b.$k = val?
        }
    };
}

/// Configuration struct that we can create from the config file used
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    #[serde(
        deserialize_with = "deserialize_level_filter",
        serialize_with = "serialize_level_filter",
        default = "default_level_filter"
    )]
    log_level: LevelFilter,
    #[serde(default)]
    units: DistanceUnits,
    #[serde(default = "default_palette")]
    palette: Vec<Color>,
    #[serde(default)]
    services: HashMap<ServiceType, ServiceConfig>,
}

impl Config {
    pub fn load<T: Read>(source: &mut T) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_reader(source)
    }

    pub fn log_level(&self) -> LevelFilter {
        self.log_level
    }

    pub fn units(&self) -> DistanceUnits {
        self.units
    }

    /// Override the units read from the config file
    pub fn set_units(&mut self, units: DistanceUnits) {
        self.units = units;
    }

    pub fn palette(&self) -> &[Color] {
        &self.palette
    }

    pub fn get_compass_rendering_handler(&self) -> Result<Box<dyn CompassDrawingService>, Error> {
        match self.services.get(&ServiceType::CompassRendering) {
            Some(cfg) => new_compass_rendering_handler(cfg),
            // the PNG renderer needs nothing external so it is always available
            None => new_compass_rendering_handler(&ServiceConfig::new("png")),
        }
    }

    pub fn get_map_rendering_handler(&self) -> Result<Box<dyn MapDrawingService>, Error> {
        match self.services.get(&ServiceType::MapRendering) {
            Some(cfg) => new_map_rendering_handler(cfg),
            None => new_map_rendering_handler(&ServiceConfig::new("png")),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            log_level: default_level_filter(),
            units: DistanceUnits::default(),
            palette: default_palette(),
            services: HashMap::new(),
        }
    }
}

/// Location of the user's configuration file
pub fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_default()
        .join(CONFIG_DIR)
        .join(CONFIG_FILE)
}

fn deserialize_level_filter<'de, D>(deserializer: D) -> Result<LevelFilter, D::Error>
where
    D: Deserializer<'de>,
{
    let buf = String::deserialize(deserializer)?;
    LevelFilter::from_str(&buf)
        .map_err(|_| serde::de::Error::custom(format!("invalid level value: {}", buf)))
}

fn serialize_level_filter<S>(level: &LevelFilter, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&level.to_string())
}

fn default_level_filter() -> LevelFilter {
    LevelFilter::Info
}

fn default_palette() -> Vec<Color> {
    DEFAULT_PALETTE.to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_full_config() {
        let yaml = "
log_level: debug
units: imperial
palette: ['#ff0000', '00ff00']
services:
  compass_rendering:
    handler: png
    configuration:
      size: 320
  map_rendering:
    handler: png
";
        let config = Config::load(&mut yaml.as_bytes()).unwrap();
        assert_eq!(config.log_level(), LevelFilter::Debug);
        assert_eq!(config.units(), DistanceUnits::Imperial);
        assert_eq!(config.palette(), &[Color::new(0xff0000), Color::new(0x00ff00)]);
        assert!(config.get_compass_rendering_handler().is_ok());
        assert!(config.get_map_rendering_handler().is_ok());
    }

    #[test]
    fn test_defaults() {
        let config = Config::load(&mut "units: metric".as_bytes()).unwrap();
        assert_eq!(config.log_level(), LevelFilter::Info);
        assert_eq!(config.palette(), &DEFAULT_PALETTE[..]);
        assert!(config.get_compass_rendering_handler().is_ok());
    }

    #[test]
    fn test_invalid_values() {
        assert!(Config::load(&mut "log_level: loud".as_bytes()).is_err());
        assert!(Config::load(&mut "palette: ['#12']".as_bytes()).is_err());

        let yaml = "
services:
  map_rendering:
    handler: tiles
";
        let config = Config::load(&mut yaml.as_bytes()).unwrap();
        assert!(config.get_map_rendering_handler().is_err());
    }

    #[test]
    fn test_service_parameters() {
        let yaml = "
handler: png
configuration:
  size: 200
  background: '#101010'
  needle: needle.png
";
        let service: ServiceConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(service.get_parameter_as_i64("size").unwrap().unwrap(), 200);
        assert_eq!(
            service.get_parameter_as_color("background").unwrap().unwrap(),
            Color::new(0x101010)
        );
        assert!(service.get_parameter_as_i64("needle").unwrap().is_err());
        assert!(service.get_parameter_as_string("missing").is_none());
    }
}
