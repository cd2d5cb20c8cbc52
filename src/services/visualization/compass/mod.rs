//! Draw compass needles and distance labels that point at each target
use super::canvas::Canvas;
use crate::color::Color;
use crate::compass::CompassEngine;
use crate::config::ServiceConfig;
use crate::units::DistanceUnits;
use crate::Error;
use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};
use log::debug;
mod png;
pub use self::png::PngCompass;

/// Needle height as a fraction of the canvas width
const NEEDLE_SCALE: f64 = 0.6;
/// Gap kept between a label and the edge of the canvas
const LABEL_MARGIN: f32 = 8.0;
const LABEL_PADDING: f32 = 4.0;
const LABEL_BACKGROUND_ALPHA: u8 = 0x80;
const LABEL_TEXT: u32 = 0xffff_ffff;
const TEXT_SIZE_DIVISOR: f32 = 20.0;

/// trait that defines how to draw the compass view for the current engine state
pub trait CompassDrawingService {
    /// Render the needles and labels, returning encoded image data
    fn draw_compass(
        &self,
        engine: &CompassEngine,
        units: DistanceUnits,
    ) -> Result<Vec<u8>, Box<dyn std::error::Error>>;
}

pub fn new_compass_rendering_handler(
    config: &ServiceConfig,
) -> Result<Box<dyn CompassDrawingService>, Error> {
    match config.handler() {
        "png" => Ok(Box::new(PngCompass::from_config(config)?)),
        _ => Err(Error::UnknownServiceHandler(format!(
            "no compass rendering handler exists for: {}",
            config.handler()
        ))),
    }
}

/// Needle graphics tinted for each target, sized for a particular canvas width
#[derive(Debug)]
pub struct NeedleSet {
    needles: Vec<RgbaImage>,
    canvas_width: u32,
}

impl NeedleSet {
    /// Scale the needle graphic to the canvas and create one tinted copy per color
    pub fn new<I>(needle: &RgbaImage, canvas_width: u32, colors: I) -> Self
    where
        I: IntoIterator<Item = Color>,
    {
        let scale = canvas_width as f64 / needle.height() as f64 * NEEDLE_SCALE;
        let width = ((needle.width() as f64 * scale) as u32).max(1);
        let height = ((needle.height() as f64 * scale) as u32).max(1);
        let scaled = imageops::resize(needle, width, height, FilterType::Triangle);
        debug!("created {}x{} needles for a {}px canvas", width, height, canvas_width);

        NeedleSet {
            needles: colors.into_iter().map(|c| tint(&scaled, c)).collect(),
            canvas_width,
        }
    }

    pub fn len(&self) -> usize {
        self.needles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.needles.is_empty()
    }

    /// Canvas width the needles were scaled for, they need rebuilding if it changes
    pub fn canvas_width(&self) -> u32 {
        self.canvas_width
    }

    pub fn get(&self, index: usize) -> Option<&RgbaImage> {
        self.needles.get(index)
    }
}

/// Return a copy of the image with every visible pixel multiplied by the color
///
/// Alpha is kept as is and fully transparent pixels become transparent black.
pub fn tint(image: &RgbaImage, color: Color) -> RgbaImage {
    let rs = color.red() as f64 / 255.0;
    let gs = color.green() as f64 / 255.0;
    let bs = color.blue() as f64 / 255.0;

    let mut tinted = image.clone();
    for pixel in tinted.pixels_mut() {
        let Rgba([r, g, b, a]) = *pixel;
        *pixel = if a == 0 {
            Rgba([0, 0, 0, 0])
        } else {
            Rgba([
                (r as f64 * rs) as u8,
                (g as f64 * gs) as u8,
                (b as f64 * bs) as u8,
                a,
            ])
        };
    }
    tinted
}

/// Built in needle: white arrow head pointing up with a grey tail
pub fn default_needle() -> RgbaImage {
    let (width, height) = (24u32, 96u32);
    let half_width = width as f32 * 0.5;
    let half_height = height as f32 * 0.5;

    RgbaImage::from_fn(width, height, |x, y| {
        let px = x as f32 + 0.5 - half_width;
        let py = y as f32 + 0.5;
        // diamond: widest at the middle, pointed at both ends
        let reach = if py < half_height {
            half_width * py / half_height
        } else {
            half_width * (height as f32 - py) / half_height
        };
        if px.abs() > reach {
            Rgba([0, 0, 0, 0])
        } else if py < half_height {
            Rgba([255, 255, 255, 255])
        } else {
            Rgba([128, 128, 128, 255])
        }
    })
}

/// Draw every needle and its distance label, last target first
///
/// Returns false without drawing anything until the current location is known and the
/// needles have been created for every target.
pub fn draw_compass<C: Canvas>(
    canvas: &mut C,
    engine: &CompassEngine,
    needles: Option<&NeedleSet>,
    units: DistanceUnits,
) -> bool {
    let needles = match needles {
        Some(n) if engine.location_known() && n.len() == engine.targets().len() => n,
        _ => return false,
    };

    let cx = canvas.width() as f32 * 0.5;
    let cy = canvas.height() as f32 * 0.5;
    canvas.set_text_size(canvas.width() as f32 / TEXT_SIZE_DIVISOR);
    for (idx, tracked) in engine.targets().iter().enumerate().rev() {
        let rotation = tracked.rotation();
        if let Some(needle) = needles.get(idx) {
            canvas.draw_sprite(needle, (cx, cy), rotation);
        }

        // distance label sits out along the needle
        let label = units.distance_string(tracked.distance() as f64);
        let bounds = canvas.text_bounds(&label);
        let radius = (canvas.width() as f32 - bounds.width() - LABEL_MARGIN) * 0.49;
        let angle = rotation.to_radians();
        let x = cx - radius * angle.sin() - bounds.centre_x();
        let y = cy + radius * angle.cos() - bounds.centre_y();

        let color = tracked.target().color();
        canvas.fill_rect(
            bounds.offset(x, y).pad(LABEL_PADDING),
            color.with_alpha(LABEL_BACKGROUND_ALPHA),
        );
        canvas.draw_text(&label, (x, y), LABEL_TEXT);
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compass::Target;
    use crate::gps::Location;
    use crate::services::visualization::mock::{DrawCall, RecordingCanvas};

    fn engine() -> CompassEngine {
        let targets = vec![
            Target::new(Location::new(0.001, 0.0).unwrap(), Color::new(0xff0000)),
            Target::new(Location::new(0.0, 0.1).unwrap(), Color::new(0x0000ff)),
        ];
        CompassEngine::new(targets)
    }

    fn assert_tint(actual: Option<[u8; 3]>, expected: [u8; 3]) {
        let actual = actual.expect("sprite has no opaque pixels");
        for (a, e) in actual.iter().zip(expected.iter()) {
            assert!((*a as i16 - *e as i16).abs() <= 2, "{:?} != {:?}", actual, expected);
        }
    }

    fn needles_for(engine: &CompassEngine, width: u32) -> NeedleSet {
        let white = RgbaImage::from_pixel(4, 10, Rgba([255, 255, 255, 255]));
        NeedleSet::new(&white, width, engine.targets().iter().map(|t| t.target().color()))
    }

    #[test]
    fn test_tint() {
        let mut image = RgbaImage::new(3, 1);
        image.put_pixel(0, 0, Rgba([255, 255, 255, 255]));
        image.put_pixel(1, 0, Rgba([200, 100, 50, 0]));
        image.put_pixel(2, 0, Rgba([255, 128, 255, 64]));

        let red = tint(&image, Color::new(0xff0000));
        assert_eq!(*red.get_pixel(0, 0), Rgba([255, 0, 0, 255]));
        assert_eq!(*red.get_pixel(1, 0), Rgba([0, 0, 0, 0]));
        assert_eq!(*red.get_pixel(2, 0), Rgba([255, 0, 0, 64]));

        let half = tint(&image, Color::new(0x808080));
        assert_eq!(*half.get_pixel(0, 0), Rgba([128, 128, 128, 255]));
        assert_eq!(*half.get_pixel(2, 0), Rgba([128, 64, 128, 64]));
    }

    #[test]
    fn test_needle_set_scaling() {
        let engine = engine();
        let needles = needles_for(&engine, 200);
        assert_eq!(needles.len(), 2);
        assert_eq!(needles.canvas_width(), 200);
        // height is 60% of the canvas width, width keeps the aspect ratio
        let needle = needles.get(0).unwrap();
        assert_eq!((needle.width(), needle.height()), (48, 120));
        let Rgba([r, g, b, a]) = *needle.get_pixel(24, 60);
        assert!(r >= 253 && g == 0 && b == 0 && a >= 253);
    }

    #[test]
    fn test_default_needle_shape() {
        let needle = default_needle();
        assert_eq!(needle.get_pixel(0, 0)[3], 0);
        assert_eq!(*needle.get_pixel(12, 20), Rgba([255, 255, 255, 255]));
        assert_eq!(*needle.get_pixel(12, 70), Rgba([128, 128, 128, 255]));
    }

    #[test]
    fn test_nothing_drawn_until_ready() {
        let mut engine = engine();
        let needles = needles_for(&engine, 200);
        let mut canvas = RecordingCanvas::new(200, 200);

        assert!(!draw_compass(&mut canvas, &engine, Some(&needles), DistanceUnits::Metric));
        engine.set_current_location(&Location::new(0.0, 0.0).unwrap());
        assert!(!draw_compass(&mut canvas, &engine, None, DistanceUnits::Metric));
        assert!(canvas.calls.is_empty());

        assert!(draw_compass(&mut canvas, &engine, Some(&needles), DistanceUnits::Metric));
        assert!(!canvas.calls.is_empty());
    }

    #[test]
    fn test_draw_order_and_labels() {
        let mut engine = engine();
        engine.set_current_location(&Location::new(0.0, 0.0).unwrap());
        engine.apply_heading(0.0);
        let needles = needles_for(&engine, 200);
        let mut canvas = RecordingCanvas::new(200, 200);
        draw_compass(&mut canvas, &engine, Some(&needles), DistanceUnits::Metric);

        // sprite, label background and text for each target, last target first
        assert_eq!(canvas.calls.len(), 6);
        match &canvas.calls[0] {
            DrawCall::Sprite { tint, centre, degrees } => {
                assert_tint(*tint, [0, 0, 255]);
                assert_eq!(*centre, (100.0, 100.0));
                assert_eq!(*degrees, engine.targets()[1].rotation());
            }
            call => panic!("unexpected call {:?}", call),
        }
        match &canvas.calls[2] {
            DrawCall::Text { text, argb, .. } => {
                assert_eq!(text, "11km");
                assert_eq!(*argb, 0xffff_ffff);
            }
            call => panic!("unexpected call {:?}", call),
        }
        match &canvas.calls[3] {
            DrawCall::Sprite { tint, .. } => assert_tint(*tint, [255, 0, 0]),
            call => panic!("unexpected call {:?}", call),
        }

        // the first target is straight ahead, its label sits directly below the centre
        match (&canvas.calls[4], &canvas.calls[5]) {
            (DrawCall::FillRect { rect, argb }, DrawCall::Text { text, origin, .. }) => {
                assert_eq!(text, "111m");
                assert_eq!(*argb, 0x80ff_0000);
                // 4 characters are 40 pixels wide, 12 tall
                let radius = (200.0 - 40.0 - 8.0) * 0.49;
                assert!((origin.0 - 80.0).abs() < 1e-3);
                assert!((origin.1 - (100.0 + radius + 6.0)).abs() < 1e-3);
                assert!((rect.left - 76.0).abs() < 1e-3);
                assert!((rect.right - 124.0).abs() < 1e-3);
            }
            calls => panic!("unexpected calls {:?}", calls),
        }
    }
}
