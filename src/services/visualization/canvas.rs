//! Minimal drawing capability shared by the compass and map renderers
use image::RgbaImage;

/// A point in canvas pixels, origin at the top left
pub type Point = (f32, f32);

/// Axis aligned rectangle in canvas pixels
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Rect {
    pub fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Rect {
            left,
            top,
            right,
            bottom,
        }
    }

    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }

    pub fn centre_x(&self) -> f32 {
        (self.left + self.right) * 0.5
    }

    pub fn centre_y(&self) -> f32 {
        (self.top + self.bottom) * 0.5
    }

    /// Return the rectangle moved by (dx, dy)
    pub fn offset(&self, dx: f32, dy: f32) -> Self {
        Rect::new(self.left + dx, self.top + dy, self.right + dx, self.bottom + dy)
    }

    /// Return the rectangle grown by `padding` on every side
    pub fn pad(&self, padding: f32) -> Self {
        Rect::new(
            self.left - padding,
            self.top - padding,
            self.right + padding,
            self.bottom + padding,
        )
    }
}

/// Drawing operations a rendering backend has to provide, colors are ARGB
pub trait Canvas {
    fn width(&self) -> u32;

    fn height(&self) -> u32;

    /// Draw a sprite centred on `centre`, rotated clockwise by `degrees` around that point
    fn draw_sprite(&mut self, sprite: &RgbaImage, centre: Point, degrees: f32);

    /// Set the height in pixels used for text
    fn set_text_size(&mut self, size: f32);

    /// Bounds of the text relative to its baseline origin
    fn text_bounds(&self, text: &str) -> Rect;

    /// Draw text with the left end of its baseline at `origin`
    fn draw_text(&mut self, text: &str, origin: Point, argb: u32);

    fn fill_rect(&mut self, rect: Rect, argb: u32);

    fn fill_circle(&mut self, centre: Point, radius: f32, argb: u32);

    fn stroke_circle(&mut self, centre: Point, radius: f32, argb: u32);
}
