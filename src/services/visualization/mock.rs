//! Canvas that records drawing calls so renderers can be tested without pixels
use super::canvas::{Canvas, Point, Rect};
use image::RgbaImage;

/// A single recorded drawing call
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCall {
    Sprite {
        /// color of the most opaque pixel, identifies tinted needles
        tint: Option<[u8; 3]>,
        centre: Point,
        degrees: f32,
    },
    Text {
        text: String,
        origin: Point,
        argb: u32,
    },
    FillRect {
        rect: Rect,
        argb: u32,
    },
    FillCircle {
        centre: Point,
        radius: f32,
        argb: u32,
    },
    StrokeCircle {
        centre: Point,
        radius: f32,
        argb: u32,
    },
}

/// Each character is 10 pixels wide and text is 12 pixels tall
pub struct RecordingCanvas {
    width: u32,
    height: u32,
    pub calls: Vec<DrawCall>,
}

impl RecordingCanvas {
    pub fn new(width: u32, height: u32) -> Self {
        RecordingCanvas {
            width,
            height,
            calls: Vec::new(),
        }
    }
}

impl Canvas for RecordingCanvas {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn draw_sprite(&mut self, sprite: &RgbaImage, centre: Point, degrees: f32) {
        let tint = sprite
            .pixels()
            .filter(|p| p[3] > 0)
            .max_by_key(|p| p[3])
            .map(|p| [p[0], p[1], p[2]]);
        self.calls.push(DrawCall::Sprite {
            tint,
            centre,
            degrees,
        });
    }

    fn set_text_size(&mut self, _size: f32) {}

    fn text_bounds(&self, text: &str) -> Rect {
        Rect::new(0.0, -12.0, 10.0 * text.chars().count() as f32, 0.0)
    }

    fn draw_text(&mut self, text: &str, origin: Point, argb: u32) {
        self.calls.push(DrawCall::Text {
            text: text.to_string(),
            origin,
            argb,
        });
    }

    fn fill_rect(&mut self, rect: Rect, argb: u32) {
        self.calls.push(DrawCall::FillRect { rect, argb });
    }

    fn fill_circle(&mut self, centre: Point, radius: f32, argb: u32) {
        self.calls.push(DrawCall::FillCircle {
            centre,
            radius,
            argb,
        });
    }

    fn stroke_circle(&mut self, centre: Point, radius: f32, argb: u32) {
        self.calls.push(DrawCall::StrokeCircle {
            centre,
            radius,
            argb,
        });
    }
}
