//! Fit a map view around shared locations and draw markers for each target
use super::canvas::{Canvas, Point};
use crate::compass::Target;
use crate::config::ServiceConfig;
use crate::{Error, Location};
use log::debug;
use std::f64::consts::PI;
mod png;
pub use self::png::PngMap;

/// Length of a degree of latitude along a meridian
pub const METRES_PER_DEGREE: f64 = 40_075_017.0 / 360.0;
/// Most zoomed in level a view is fitted to
pub const MAX_ZOOM: u32 = 21;
const TILE_SIZE: f64 = 256.0;
const MAX_MERCATOR_LATITUDE: f64 = 85.051_128_78;

const ACCURACY_RING_MIN_RADIUS: f32 = 6.0;
const MARKER_RADIUS: f32 = 5.0;
const MARKER_ALPHA: u8 = 0xf0;
const ACCURACY_FILL_ALPHA: u8 = 0x60;
const CURRENT_LOCATION_RGB: u32 = 0x00ff_ffff;

/// trait that defines how to draw targets and the current location onto a map image
pub trait MapDrawingService {
    fn draw_map(
        &self,
        current: Option<&Location>,
        targets: &[Target],
    ) -> Result<Vec<u8>, Box<dyn std::error::Error>>;
}

pub fn new_map_rendering_handler(config: &ServiceConfig) -> Result<Box<dyn MapDrawingService>, Error> {
    match config.handler() {
        "png" => Ok(Box::new(PngMap::from_config(config)?)),
        _ => Err(Error::UnknownServiceHandler(format!(
            "no map rendering handler exists for: {}",
            config.handler()
        ))),
    }
}

/// Latitude and longitude extent covering a set of locations and their accuracy
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl Bounds {
    fn around(loc: &Location) -> Self {
        let (laterr, lonerr) = match loc.accuracy() {
            Some(acc) => {
                let laterr = acc as f64 / METRES_PER_DEGREE;
                (laterr, laterr / loc.latitude().to_radians().cos())
            }
            None => (0.0, 0.0),
        };
        Bounds {
            min_lat: loc.latitude() - laterr,
            max_lat: loc.latitude() + laterr,
            min_lon: loc.longitude() - lonerr,
            max_lon: loc.longitude() + lonerr,
        }
    }

    fn extend(self, other: Bounds) -> Self {
        Bounds {
            min_lat: self.min_lat.min(other.min_lat),
            max_lat: self.max_lat.max(other.max_lat),
            min_lon: self.min_lon.min(other.min_lon),
            max_lon: self.max_lon.max(other.max_lon),
        }
    }

    /// Create bounds enclosing every location, None if there are none
    pub fn enclosing<'a, I>(locations: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a Location>,
    {
        locations
            .into_iter()
            .map(Bounds::around)
            .fold(None, |acc: Option<Bounds>, b| {
                Some(acc.map_or(b, |a| a.extend(b)))
            })
    }

    pub fn centre(&self) -> (f64, f64) {
        (
            (self.min_lat + self.max_lat) * 0.5,
            (self.min_lon + self.max_lon) * 0.5,
        )
    }
}

/// Centre and zoom level of a map image
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    latitude: f64,
    longitude: f64,
    zoom: u32,
    width: u32,
    height: u32,
}

impl Viewport {
    pub fn new(latitude: f64, longitude: f64, zoom: u32, width: u32, height: u32) -> Self {
        Viewport {
            latitude,
            longitude,
            zoom: zoom.max(1).min(MAX_ZOOM),
            width,
            height,
        }
    }

    /// Choose a view that shows the current location and every target
    pub fn fit(
        current: Option<&Location>,
        targets: &[Target],
        width: u32,
        height: u32,
    ) -> Option<Self> {
        let bounds = Bounds::enclosing(current.into_iter().chain(targets.iter().map(|t| t.location())))?;
        let (latitude, longitude) = bounds.centre();

        let cos_lat = latitude.to_radians().cos();
        let mlat = (bounds.max_lat - bounds.min_lat) * METRES_PER_DEGREE;
        let mlon = (bounds.max_lon - bounds.min_lon) * METRES_PER_DEGREE * cos_lat;

        let mut zoom = MAX_ZOOM;
        if mlat != 0.0 || mlon != 0.0 {
            // view size in metres at zoom level 1
            let metres_per_pixel = METRES_PER_DEGREE * 360.0 / TILE_SIZE;
            let mut w = width as f64 * metres_per_pixel;
            let mut h = height as f64 * metres_per_pixel;

            zoom = 1;
            while w > mlon * 3.0 && h > mlat * 3.0 {
                w *= 0.5;
                h *= 0.5;
                zoom += 1;
                if zoom == MAX_ZOOM {
                    break;
                }
            }
        }
        debug!(
            "fitted {}x{} view at ({:.6}, {:.6}) zoom {}",
            width, height, latitude, longitude, zoom
        );

        Some(Viewport::new(latitude, longitude, zoom, width, height))
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    pub fn zoom(&self) -> u32 {
        self.zoom
    }

    /// Width of the whole world in pixels at this zoom level
    pub fn world_size(&self) -> f64 {
        TILE_SIZE * 2f64.powi(self.zoom as i32 - 1)
    }

    /// Convert a distance on the ground at the equator into pixels
    pub fn metres_to_pixels(&self, metres: f64) -> f32 {
        (metres * self.world_size() / (METRES_PER_DEGREE * 360.0)) as f32
    }

    /// Position of a coordinate in image pixels
    pub fn project(&self, latitude: f64, longitude: f64) -> Point {
        let (x, y) = self.world_pixels(latitude, longitude);
        let (cx, cy) = self.world_pixels(self.latitude, self.longitude);
        (
            (x - cx + self.width as f64 * 0.5) as f32,
            (y - cy + self.height as f64 * 0.5) as f32,
        )
    }

    /// web mercator position in pixels from the top left of the world
    fn world_pixels(&self, latitude: f64, longitude: f64) -> (f64, f64) {
        let world = self.world_size();
        let lat = latitude
            .max(-MAX_MERCATOR_LATITUDE)
            .min(MAX_MERCATOR_LATITUDE)
            .to_radians();
        let x = (longitude + 180.0) / 360.0 * world;
        let y = (1.0 - (lat.tan() + 1.0 / lat.cos()).ln() / PI) * 0.5 * world;
        (x, y)
    }
}

fn draw_marker<C: Canvas>(canvas: &mut C, view: &Viewport, loc: &Location, rgb: u32) {
    let centre = view.project(loc.latitude(), loc.longitude());
    let radius = loc
        .accuracy()
        .map(|acc| view.metres_to_pixels(acc as f64))
        .unwrap_or(0.0);

    let rgb = rgb & 0x00ff_ffff;
    if radius > ACCURACY_RING_MIN_RADIUS {
        canvas.stroke_circle(centre, radius, rgb | (MARKER_ALPHA as u32) << 24);
        canvas.fill_circle(centre, radius, rgb | (ACCURACY_FILL_ALPHA as u32) << 24);
    }
    canvas.fill_circle(centre, MARKER_RADIUS, rgb | (MARKER_ALPHA as u32) << 24);
}

/// Draw a marker for each target and then the current location on top
pub fn draw_map<C: Canvas>(
    canvas: &mut C,
    view: &Viewport,
    current: Option<&Location>,
    targets: &[Target],
) {
    for target in targets {
        draw_marker(canvas, view, target.location(), target.color().rgb());
    }
    if let Some(loc) = current {
        draw_marker(canvas, view, loc, CURRENT_LOCATION_RGB);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use crate::services::visualization::mock::{DrawCall, RecordingCanvas};

    fn target(lat: f64, lon: f64) -> Target {
        Target::new(Location::new(lat, lon).unwrap(), Color::new(0x00a000))
    }

    #[test]
    fn test_bounds_include_accuracy() {
        let loc = Location::new(60.0, 10.0)
            .unwrap()
            .with_accuracy(METRES_PER_DEGREE as f32);
        let bounds = Bounds::enclosing(vec![&loc]).unwrap();
        assert!((bounds.min_lat - 59.0).abs() < 1e-6);
        assert!((bounds.max_lat - 61.0).abs() < 1e-6);
        // a degree of longitude is half as long at 60 degrees
        assert!((bounds.min_lon - 8.0).abs() < 1e-6);
        assert!((bounds.max_lon - 12.0).abs() < 1e-6);
        assert!(Bounds::enclosing(Vec::new()).is_none());
    }

    #[test]
    fn test_fit_single_point() {
        let view = Viewport::fit(None, &[target(-33.86, 151.2)], 320, 480).unwrap();
        assert_eq!(view.zoom(), MAX_ZOOM);
        assert_eq!((view.latitude(), view.longitude()), (-33.86, 151.2));
        assert!(Viewport::fit(None, &[], 320, 480).is_none());
    }

    #[test]
    fn test_fit_zoom() {
        let targets = [target(0.0, 0.0), target(0.0, 10.0)];
        let view = Viewport::fit(None, &targets, 256, 256).unwrap();
        assert_eq!(view.zoom(), 5);
        assert!((view.longitude() - 5.0).abs() < 1e-9);
        assert!(view.latitude().abs() < 1e-9);

        // the current location is part of the view
        let current = Location::new(0.0, -10.0).unwrap();
        let view = Viewport::fit(Some(&current), &targets, 256, 256).unwrap();
        assert_eq!(view.zoom(), 4);
        assert!(view.longitude().abs() < 1e-9);
    }

    #[test]
    fn test_projection() {
        let view = Viewport::new(0.0, 0.0, 1, 256, 256);
        assert_eq!(view.world_size(), 256.0);
        let (x, y) = view.project(0.0, 0.0);
        assert!((x - 128.0).abs() < 1e-3 && (y - 128.0).abs() < 1e-3);
        let (x, _) = view.project(0.0, 90.0);
        assert!((x - 192.0).abs() < 1e-3);
        let (_, y) = view.project(45.0, 0.0);
        assert!(y < 128.0);
        assert!((view.metres_to_pixels(METRES_PER_DEGREE * 180.0) - 128.0).abs() < 1e-3);
    }

    #[test]
    fn test_draw_markers() {
        let precise = target(0.0, 0.0);
        let vague = Target::new(
            Location::new(0.001, 0.0).unwrap().with_accuracy(100.0),
            Color::new(0xc00000),
        );
        let current = Location::new(0.0, 0.001).unwrap();
        let view = Viewport::new(0.0, 0.0, 18, 256, 256);
        let mut canvas = RecordingCanvas::new(256, 256);
        draw_map(&mut canvas, &view, Some(&current), &[precise, vague]);

        assert_eq!(canvas.calls.len(), 5);
        assert_eq!(
            canvas.calls[0],
            DrawCall::FillCircle {
                centre: (128.0, 128.0),
                radius: 5.0,
                argb: 0xf000_a000
            }
        );
        match (&canvas.calls[1], &canvas.calls[2]) {
            (
                DrawCall::StrokeCircle { radius, argb, .. },
                DrawCall::FillCircle { argb: fill, .. },
            ) => {
                assert!(*radius > 6.0);
                assert_eq!(*argb, 0xf0c0_0000);
                assert_eq!(*fill, 0x60c0_0000);
            }
            calls => panic!("unexpected calls {:?}", calls),
        }
        match &canvas.calls[4] {
            DrawCall::FillCircle { centre, argb, .. } => {
                assert!(centre.0 > 128.0);
                assert_eq!(*argb, 0xf0ff_ffff);
            }
            call => panic!("unexpected call {:?}", call),
        }
    }
}
