//! Pixel drawing on an `RgbImage`.
//!
//! All coordinates are signed and clipped to the image, so callers can draw
//! shapes that run off the edge.

use image::{Rgb, RgbImage};

use super::font;

pub mod colors {
    use image::Rgb;

    pub const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
    pub const BLACK: Rgb<u8> = Rgb([0, 0, 0]);
    pub const DARK_GRAY: Rgb<u8> = Rgb([60, 60, 60]);
    pub const GRID: Rgb<u8> = Rgb([225, 225, 225]);
    /// Close price line.
    pub const PRICE_BLUE: Rgb<u8> = Rgb([0x1f, 0x77, 0xb4]);
    /// Sentiment line.
    pub const SENTIMENT_ORANGE: Rgb<u8> = Rgb([0xff, 0x7f, 0x0e]);
    /// Sentiment-vs-return scatter.
    pub const SCATTER_GREEN: Rgb<u8> = Rgb([0x2c, 0xa0, 0x2c]);
}

/// Linear blend from `c1` (t = 0) to `c2` (t = 1).
pub fn interpolate_color(c1: Rgb<u8>, c2: Rgb<u8>, t: f64) -> Rgb<u8> {
    let t = t.clamp(0.0, 1.0);
    let mix = |a: u8, b: u8| ((1.0 - t) * a as f64 + t * b as f64).round() as u8;
    Rgb([
        mix(c1.0[0], c2.0[0]),
        mix(c1.0[1], c2.0[1]),
        mix(c1.0[2], c2.0[2]),
    ])
}

pub struct Canvas {
    img: RgbImage,
}

impl Canvas {
    pub fn new(width: u32, height: u32, background: Rgb<u8>) -> Self {
        Self {
            img: RgbImage::from_pixel(width, height, background),
        }
    }

    pub fn width(&self) -> i64 {
        self.img.width() as i64
    }

    pub fn height(&self) -> i64 {
        self.img.height() as i64
    }

    pub fn into_image(self) -> RgbImage {
        self.img
    }

    #[cfg(test)]
    pub fn pixel(&self, x: u32, y: u32) -> Rgb<u8> {
        *self.img.get_pixel(x, y)
    }

    fn in_bounds(&self, x: i64, y: i64) -> bool {
        x >= 0 && y >= 0 && x < self.width() && y < self.height()
    }

    /// Paint `color` over the existing pixel with the given opacity.
    pub fn blend(&mut self, x: i64, y: i64, color: Rgb<u8>, alpha: f64) {
        if self.in_bounds(x, y) {
            let under = *self.img.get_pixel(x as u32, y as u32);
            self.img
                .put_pixel(x as u32, y as u32, interpolate_color(under, color, alpha));
        }
    }

    pub fn fill_rect(&mut self, x: i64, y: i64, w: i64, h: i64, color: Rgb<u8>) {
        let x0 = x.max(0);
        let y0 = y.max(0);
        let x1 = (x + w).min(self.width());
        let y1 = (y + h).min(self.height());
        for py in y0..y1 {
            for px in x0..x1 {
                self.img.put_pixel(px as u32, py as u32, color);
            }
        }
    }

    /// Rectangle outline drawn inside the given bounds.
    pub fn stroke_rect(&mut self, x: i64, y: i64, w: i64, h: i64, thickness: i64, color: Rgb<u8>) {
        self.fill_rect(x, y, w, thickness, color);
        self.fill_rect(x, y + h - thickness, w, thickness, color);
        self.fill_rect(x, y, thickness, h, color);
        self.fill_rect(x + w - thickness, y, thickness, h, color);
    }

    pub fn hline(&mut self, y: i64, x0: i64, x1: i64, thickness: i64, color: Rgb<u8>) {
        let (a, b) = if x0 <= x1 { (x0, x1) } else { (x1, x0) };
        self.fill_rect(a, y - thickness / 2, b - a + 1, thickness, color);
    }

    pub fn vline(&mut self, x: i64, y0: i64, y1: i64, thickness: i64, color: Rgb<u8>) {
        let (a, b) = if y0 <= y1 { (y0, y1) } else { (y1, y0) };
        self.fill_rect(x - thickness / 2, a, thickness, b - a + 1, color);
    }

    /// Bresenham line stamped with a square brush of side `thickness`.
    pub fn line(&mut self, from: (i64, i64), to: (i64, i64), thickness: i64, color: Rgb<u8>) {
        let (mut x, mut y) = from;
        let (x2, y2) = to;
        let dx = (x2 - x).abs();
        let dy = (y2 - y).abs();
        let sx = if x < x2 { 1 } else { -1 };
        let sy = if y < y2 { 1 } else { -1 };
        let mut err = dx - dy;
        let half = thickness / 2;

        loop {
            self.fill_rect(x - half, y - half, thickness, thickness, color);
            if x == x2 && y == y2 {
                break;
            }
            let e2 = 2 * err;
            if e2 > -dy {
                err -= dy;
                x += sx;
            }
            if e2 < dx {
                err += dx;
                y += sy;
            }
        }
    }

    /// Connect consecutive points with line segments.
    pub fn polyline(&mut self, points: &[(i64, i64)], thickness: i64, color: Rgb<u8>) {
        match points {
            [] => {}
            [only] => self.fill_circle(only.0, only.1, thickness.max(1), color, 1.0),
            _ => {
                for w in points.windows(2) {
                    self.line(w[0], w[1], thickness, color);
                }
            }
        }
    }

    /// Filled disc, alpha-blended over the existing pixels.
    pub fn fill_circle(&mut self, cx: i64, cy: i64, radius: i64, color: Rgb<u8>, alpha: f64) {
        let r2 = radius * radius;
        for dy in -radius..=radius {
            for dx in -radius..=radius {
                if dx * dx + dy * dy <= r2 {
                    self.blend(cx + dx, cy + dy, color, alpha);
                }
            }
        }
    }

    /// Draw `text` with its top-left corner at (x, y). Each font pixel becomes
    /// a `scale`×`scale` block.
    pub fn text(&mut self, x: i64, y: i64, text: &str, scale: u32, color: Rgb<u8>) {
        let s = scale.max(1) as i64;
        let mut pen = x;
        for c in text.chars() {
            let rows = font::glyph(c);
            for (row, bits) in rows.iter().enumerate() {
                for col in 0..font::GLYPH_WIDTH {
                    if bits & (0x10 >> col) != 0 {
                        self.fill_rect(pen + col as i64 * s, y + row as i64 * s, s, s, color);
                    }
                }
            }
            pen += font::ADVANCE as i64 * s;
        }
    }

    /// Draw `text` one character per line, top to bottom, starting at (x, y).
    pub fn text_vertical(&mut self, x: i64, y: i64, text: &str, scale: u32, color: Rgb<u8>) {
        let step = (font::GLYPH_HEIGHT + 2) as i64 * scale.max(1) as i64;
        let mut buf = [0u8; 4];
        for (i, c) in text.chars().enumerate() {
            self.text(x, y + i as i64 * step, c.encode_utf8(&mut buf), scale, color);
        }
    }
}

pub fn text_size(text: &str, scale: u32) -> (i64, i64) {
    let s = scale.max(1) as i64;
    (
        font::text_width(text) as i64 * s,
        font::GLYPH_HEIGHT as i64 * s,
    )
}

pub fn text_column_height(text: &str, scale: u32) -> i64 {
    let n = text.chars().count() as i64;
    if n == 0 {
        return 0;
    }
    let s = scale.max(1) as i64;
    (n - 1) * (font::GLYPH_HEIGHT + 2) as i64 * s + font::GLYPH_HEIGHT as i64 * s
}
