//! Draw target markers on a plain background and encode the result as PNG
use super::{draw_map, MapDrawingService, Viewport};
use crate::color::Color;
use crate::compass::Target;
use crate::config::ServiceConfig;
use crate::services::visualization::raster::RasterCanvas;
use crate::{Error, Location};
use log::warn;
use std::convert::TryFrom;

/// Renders markers without any base map
#[derive(Debug)]
pub struct PngMap {
    image_width: u32,
    image_height: u32,
    background: Color,
}

impl PngMap {
    pub fn from_config(config: &ServiceConfig) -> Result<Self, Error> {
        let mut base = Self::default();
        for key in config.parameters() {
            match key.as_ref() {
                "image_width" => {
                    if let Some(val) = config.get_parameter_as_i64(key) {
                        base.image_width = image_dimension(key, val?)?
                    };
                }
                "image_height" => {
                    if let Some(val) = config.get_parameter_as_i64(key) {
                        base.image_height = image_dimension(key, val?)?
                    };
                }
                "background" => {
                    if let Some(val) = config.get_parameter_as_color(key) {
                        base.background = val?
                    };
                }
                _ => warn!(
                    "unknown configuration parameter for PngMap: {}={:?}",
                    key,
                    config.get_parameter(key)
                ),
            }
        }
        if base.image_width == 0 || base.image_height == 0 {
            return Err(Error::InvalidConfigurationValue(format!(
                "map image size must not be empty: {}x{}",
                base.image_width, base.image_height
            )));
        }

        Ok(base)
    }

    pub fn image_width(&self) -> u32 {
        self.image_width
    }

    pub fn set_image_width(&mut self, width: u32) {
        self.image_width = width;
    }

    pub fn image_height(&self) -> u32 {
        self.image_height
    }

    pub fn set_image_height(&mut self, height: u32) {
        self.image_height = height;
    }
}

/// Convert a configured image dimension, rejecting values that don't fit a u32
fn image_dimension(key: &str, value: i64) -> Result<u32, Error> {
    u32::try_from(value).map_err(|_| {
        Error::InvalidConfigurationValue(format!(
            "invalid value for PngMap.{}, expected a positive integer: {}",
            key, value
        ))
    })
}

impl Default for PngMap {
    fn default() -> Self {
        PngMap {
            image_width: 640,
            image_height: 480,
            background: Color::new(0x404040),
        }
    }
}

impl MapDrawingService for PngMap {
    fn draw_map(
        &self,
        current: Option<&Location>,
        targets: &[Target],
    ) -> Result<Vec<u8>, Box<dyn std::error::Error>> {
        let view = Viewport::fit(current, targets, self.image_width, self.image_height)
            .ok_or_else(|| Error::Other("no locations to show on the map".to_string()))?;

        let mut canvas = RasterCanvas::new(
            self.image_width,
            self.image_height,
            self.background.with_alpha(0xff),
        );
        draw_map(&mut canvas, &view, current, targets);

        Ok(canvas.to_png()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GenericImageView, Rgba};

    #[test]
    fn test_from_config() {
        let yaml = "
handler: png
configuration:
  image_width: 300
  image_height: 200
  background: 'ffffff'
";
        let config: ServiceConfig = serde_yaml::from_str(yaml).unwrap();
        let map = PngMap::from_config(&config).unwrap();
        assert_eq!((map.image_width(), map.image_height()), (300, 200));
        assert_eq!(map.background, Color::new(0xffffff));

        let config: ServiceConfig =
            serde_yaml::from_str("{handler: png, configuration: {image_width: 0}}").unwrap();
        assert!(PngMap::from_config(&config).is_err());
        for yaml in &[
            "{handler: png, configuration: {image_width: -1}}",
            "{handler: png, configuration: {image_height: -480}}",
            "{handler: png, configuration: {image_width: 4294967296}}",
        ] {
            let config: ServiceConfig = serde_yaml::from_str(yaml).unwrap();
            match PngMap::from_config(&config) {
                Err(Error::InvalidConfigurationValue(_)) => {}
                other => panic!("{} gave {:?}", yaml, other),
            }
        }
    }

    #[test]
    fn test_draw_map() {
        let mut map = PngMap::default();
        map.set_image_width(100);
        map.set_image_height(80);
        let targets = [Target::new(Location::new(10.0, 20.0).unwrap(), Color::new(0xff0000))];

        let data = map.draw_map(None, &targets).unwrap();
        let image = image::load_from_memory(&data).unwrap();
        assert_eq!(image.dimensions(), (100, 80));
        // a single target sits in the middle of the image
        let Rgba([r, g, b, _]) = image.get_pixel(50, 40);
        assert!(r > 200 && g < 64 && b < 64);
        assert_eq!(image.get_pixel(0, 0), Rgba([0x40, 0x40, 0x40, 0xff]));

        assert!(map.draw_map(None, &[]).is_err());
    }
}
