//! Software canvas that draws into an RGBA image buffer
use super::canvas::{Canvas, Point, Rect};
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use std::io::Cursor;

/// glyph cell size before scaling, one blank column separates characters
const GLYPH_WIDTH: u32 = 5;
const GLYPH_HEIGHT: u32 = 7;
const GLYPH_ADVANCE: u32 = GLYPH_WIDTH + 1;

/// Canvas backed by an `RgbaImage`, everything is composited with straight alpha
pub struct RasterCanvas {
    image: RgbaImage,
    text_scale: u32,
}

impl RasterCanvas {
    pub fn new(width: u32, height: u32, background: u32) -> Self {
        RasterCanvas {
            image: RgbaImage::from_pixel(width, height, argb_to_rgba(background)),
            text_scale: 1,
        }
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    /// Encode the canvas as a PNG file
    pub fn to_png(&self) -> Result<Vec<u8>, image::ImageError> {
        let mut data = Cursor::new(Vec::new());
        DynamicImage::ImageRgba8(self.image.clone()).write_to(&mut data, ImageFormat::Png)?;
        Ok(data.into_inner())
    }

    /// Composite a single pixel over the canvas, pixels outside the canvas are dropped
    fn blend(&mut self, x: i64, y: i64, src: Rgba<u8>) {
        if x < 0 || y < 0 || x >= self.image.width() as i64 || y >= self.image.height() as i64 {
            return;
        }
        let sa = src[3] as f32 / 255.0;
        if sa <= 0.0 {
            return;
        }

        let dst = self.image.get_pixel_mut(x as u32, y as u32);
        let da = dst[3] as f32 / 255.0;
        let out_a = sa + da * (1.0 - sa);
        for c in 0..3 {
            let value = (src[c] as f32 * sa + dst[c] as f32 * da * (1.0 - sa)) / out_a;
            dst[c] = value.round().min(255.0) as u8;
        }
        dst[3] = (out_a * 255.0).round() as u8;
    }

    fn pixel_range(low: f32, high: f32, limit: u32) -> std::ops::Range<i64> {
        let low = low.floor().max(0.0) as i64;
        let high = (high.ceil() as i64).min(limit as i64);
        low..high.max(low)
    }
}

impl Canvas for RasterCanvas {
    fn width(&self) -> u32 {
        self.image.width()
    }

    fn height(&self) -> u32 {
        self.image.height()
    }

    fn draw_sprite(&mut self, sprite: &RgbaImage, centre: Point, degrees: f32) {
        let (sw, sh) = (sprite.width() as f32, sprite.height() as f32);
        let reach = (sw * sw + sh * sh).sqrt() * 0.5;
        let (sin, cos) = degrees.to_radians().sin_cos();

        // map each destination pixel back into the sprite
        for y in Self::pixel_range(centre.1 - reach, centre.1 + reach, self.height()) {
            for x in Self::pixel_range(centre.0 - reach, centre.0 + reach, self.width()) {
                let dx = x as f32 + 0.5 - centre.0;
                let dy = y as f32 + 0.5 - centre.1;
                let sx = dx * cos + dy * sin + sw * 0.5;
                let sy = -dx * sin + dy * cos + sh * 0.5;
                if sx < 0.0 || sy < 0.0 || sx >= sw || sy >= sh {
                    continue;
                }
                let src = *sprite.get_pixel(sx as u32, sy as u32);
                self.blend(x, y, src);
            }
        }
    }

    fn set_text_size(&mut self, size: f32) {
        self.text_scale = ((size / GLYPH_HEIGHT as f32).round() as u32).max(1);
    }

    fn text_bounds(&self, text: &str) -> Rect {
        let count = text.chars().count() as u32;
        if count == 0 {
            return Rect::new(0.0, 0.0, 0.0, 0.0);
        }
        let width = (count * GLYPH_ADVANCE - 1) * self.text_scale;
        let height = GLYPH_HEIGHT * self.text_scale;
        Rect::new(0.0, -(height as f32), width as f32, 0.0)
    }

    fn draw_text(&mut self, text: &str, origin: Point, argb: u32) {
        let color = argb_to_rgba(argb);
        let scale = self.text_scale as i64;
        let left = origin.0.round() as i64;
        let top = origin.1.round() as i64 - GLYPH_HEIGHT as i64 * scale;

        for (i, ch) in text.chars().enumerate() {
            let rows = glyph(ch);
            let cell_left = left + (i as i64) * GLYPH_ADVANCE as i64 * scale;
            for (row, bits) in rows.iter().enumerate() {
                for col in 0..GLYPH_WIDTH {
                    if bits & (0x10 >> col) == 0 {
                        continue;
                    }
                    let px = cell_left + col as i64 * scale;
                    let py = top + row as i64 * scale;
                    for oy in 0..scale {
                        for ox in 0..scale {
                            self.blend(px + ox, py + oy, color);
                        }
                    }
                }
            }
        }
    }

    fn fill_rect(&mut self, rect: Rect, argb: u32) {
        let color = argb_to_rgba(argb);
        for y in Self::pixel_range(rect.top, rect.bottom, self.height()) {
            for x in Self::pixel_range(rect.left, rect.right, self.width()) {
                self.blend(x, y, color);
            }
        }
    }

    fn fill_circle(&mut self, centre: Point, radius: f32, argb: u32) {
        let color = argb_to_rgba(argb);
        for y in Self::pixel_range(centre.1 - radius, centre.1 + radius, self.height()) {
            for x in Self::pixel_range(centre.0 - radius, centre.0 + radius, self.width()) {
                let dx = x as f32 + 0.5 - centre.0;
                let dy = y as f32 + 0.5 - centre.1;
                if dx * dx + dy * dy <= radius * radius {
                    self.blend(x, y, color);
                }
            }
        }
    }

    fn stroke_circle(&mut self, centre: Point, radius: f32, argb: u32) {
        let color = argb_to_rgba(argb);
        let reach = radius + 1.0;
        for y in Self::pixel_range(centre.1 - reach, centre.1 + reach, self.height()) {
            for x in Self::pixel_range(centre.0 - reach, centre.0 + reach, self.width()) {
                let dx = x as f32 + 0.5 - centre.0;
                let dy = y as f32 + 0.5 - centre.1;
                if ((dx * dx + dy * dy).sqrt() - radius).abs() <= 0.75 {
                    self.blend(x, y, color);
                }
            }
        }
    }
}

/// Convert a packed ARGB value into an image pixel
pub fn argb_to_rgba(argb: u32) -> Rgba<u8> {
    Rgba([
        (argb >> 16) as u8,
        (argb >> 8) as u8,
        argb as u8,
        (argb >> 24) as u8,
    ])
}

/// 5x7 bitmaps for the characters used in distance labels, unknown characters are blank
fn glyph(ch: char) -> [u8; 7] {
    match ch {
        '0' => [0x0e, 0x11, 0x13, 0x15, 0x19, 0x11, 0x0e],
        '1' => [0x04, 0x0c, 0x04, 0x04, 0x04, 0x04, 0x0e],
        '2' => [0x0e, 0x11, 0x01, 0x02, 0x04, 0x08, 0x1f],
        '3' => [0x1f, 0x02, 0x04, 0x02, 0x01, 0x11, 0x0e],
        '4' => [0x02, 0x06, 0x0a, 0x12, 0x1f, 0x02, 0x02],
        '5' => [0x1f, 0x10, 0x1e, 0x01, 0x01, 0x11, 0x0e],
        '6' => [0x06, 0x08, 0x10, 0x1e, 0x11, 0x11, 0x0e],
        '7' => [0x1f, 0x01, 0x02, 0x04, 0x08, 0x08, 0x08],
        '8' => [0x0e, 0x11, 0x11, 0x0e, 0x11, 0x11, 0x0e],
        '9' => [0x0e, 0x11, 0x11, 0x0f, 0x01, 0x02, 0x0c],
        '.' => [0x00, 0x00, 0x00, 0x00, 0x00, 0x0c, 0x0c],
        '-' => [0x00, 0x00, 0x00, 0x1f, 0x00, 0x00, 0x00],
        'd' => [0x01, 0x01, 0x0d, 0x13, 0x11, 0x11, 0x0f],
        'f' => [0x06, 0x09, 0x08, 0x1c, 0x08, 0x08, 0x08],
        'i' => [0x04, 0x00, 0x0c, 0x04, 0x04, 0x04, 0x0e],
        'k' => [0x10, 0x10, 0x12, 0x14, 0x18, 0x14, 0x12],
        'm' => [0x00, 0x00, 0x1a, 0x15, 0x15, 0x11, 0x11],
        't' => [0x08, 0x08, 0x1c, 0x08, 0x08, 0x09, 0x06],
        'y' => [0x00, 0x00, 0x11, 0x11, 0x0f, 0x01, 0x0e],
        _ => [0x00; 7],
    }
}
