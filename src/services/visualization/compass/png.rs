//! Render the compass into a square PNG image
use super::{default_needle, draw_compass, CompassDrawingService, NeedleSet};
use crate::color::Color;
use crate::compass::CompassEngine;
use crate::config::ServiceConfig;
use crate::services::visualization::raster::RasterCanvas;
use crate::units::DistanceUnits;
use crate::{set_color_param_from_config, set_int_param_from_config, set_string_param_from_config};
use crate::Error;
use image::RgbaImage;
use log::{debug, warn};

/// Draws the compass onto an in memory raster and encodes it as PNG
#[derive(Debug)]
pub struct PngCompass {
    size: u32,
    /// path to a needle image pointing up, the built in needle is used when empty
    needle: String,
    background: Color,
}

impl PngCompass {
    pub fn from_config(config: &ServiceConfig) -> Result<Self, Error> {
        let mut base = Self::default();
        for key in config.parameters() {
            match key.as_ref() {
                "size" => set_int_param_from_config!(base, size, config, u32),
                "needle" => set_string_param_from_config!(base, needle, config),
                "background" => set_color_param_from_config!(base, background, config),
                _ => warn!(
                    "unknown configuration parameter for PngCompass: {}={:?}",
                    key,
                    config.get_parameter(key)
                ),
            }
        }
        if base.size == 0 {
            return Err(Error::InvalidConfigurationValue(
                "compass size must be greater than 0".to_string(),
            ));
        }

        Ok(base)
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn set_size(&mut self, size: u32) {
        self.size = size;
    }

    pub fn background(&self) -> Color {
        self.background
    }

    fn load_needle(&self) -> Result<RgbaImage, Error> {
        if self.needle.is_empty() {
            return Ok(default_needle());
        }
        debug!("loading needle image from {}", self.needle);
        Ok(image::open(&self.needle)?.to_rgba8())
    }
}

impl Default for PngCompass {
    fn default() -> Self {
        PngCompass {
            size: 480,
            needle: String::new(),
            background: Color::new(0x000000),
        }
    }
}

impl CompassDrawingService for PngCompass {
    fn draw_compass(
        &self,
        engine: &CompassEngine,
        units: DistanceUnits,
    ) -> Result<Vec<u8>, Box<dyn std::error::Error>> {
        let needle = self.load_needle()?;
        let colors = engine.targets().iter().map(|t| t.target().color());
        let needles = NeedleSet::new(&needle, self.size, colors);

        let mut canvas = RasterCanvas::new(self.size, self.size, self.background.with_alpha(0xff));
        if !draw_compass(&mut canvas, engine, Some(&needles), units) {
            warn!("current location is unknown, compass drawn without needles");
        }

        Ok(canvas.to_png()?)
    }
}
