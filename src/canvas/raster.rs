use std::sync::Arc;

use euclid::default::{Box2D, Point2D};
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder, RgbaImage};

use crate::canvas::Canvas;
use crate::canvas::glyph_cache::{GlyphCache, GlyphKey};
use crate::color::Rgba8;
use crate::error::Result;
use crate::font_storage::LoadedFont;

/// Height of a line of text relative to the font size (em height at 96 dpi).
pub const NOMINAL_HEIGHT: f32 = 72.0 / 96.0;

/// RGBA pixel buffer with a single active font face.
///
/// Each render creates its own canvas; nothing in here is shared between
/// threads except the `fontdue` face, which is read-only.
pub struct RasterCanvas {
    image: RgbaImage,
    font: Option<LoadedFont>,
    font_size: f32,
    glyphs: GlyphCache,
}

impl RasterCanvas {
    /// Creates a fully transparent canvas.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: RgbaImage::new(width, height),
            font: None,
            font_size: 0.0,
            glyphs: GlyphCache::new(),
        }
    }

    /// Installs `font` as the active face at `size` pixels.
    pub fn load_font(&mut self, font: LoadedFont, size: f32) {
        self.font = Some(font);
        self.font_size = size;
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    /// Encodes the current pixels as PNG.
    pub fn encode_png(&self) -> Result<Vec<u8>> {
        let mut bytes = Vec::new();
        PngEncoder::new(&mut bytes).write_image(
            self.image.as_raw(),
            self.image.width(),
            self.image.height(),
            ExtendedColorType::Rgba8,
        )?;
        Ok(bytes)
    }

    /// Source-over blend of `color` scaled by `coverage` (0..=1).
    fn blend(&mut self, x: i64, y: i64, color: Rgba8, coverage: f32) {
        if x < 0 || y < 0 || x >= self.image.width() as i64 || y >= self.image.height() as i64 {
            return;
        }

        let a = color[3] as f32 / 255.0 * coverage;
        if a <= 0.0 {
            return;
        }

        let pixel = self.image.get_pixel_mut(x as u32, y as u32);
        let bg_a = pixel[3] as f32 / 255.0;
        let out_a = a + bg_a * (1.0 - a);
        if out_a <= 0.0 {
            return;
        }

        for channel in 0..3 {
            let src = color[channel] as f32 / 255.0;
            let dst = pixel[channel] as f32 / 255.0;
            let out = (src * a + dst * bg_a * (1.0 - a)) / out_a;
            pixel[channel] = (out * 255.0).round() as u8;
        }
        pixel[3] = (out_a * 255.0).round() as u8;
    }

    /// Pixel range `[from, to)` covering `min..max`, clipped to the canvas.
    fn span(&self, min: f32, max: f32, limit: u32) -> (i64, i64) {
        let from = (min.floor() as i64).max(0);
        let to = (max.ceil() as i64).min(limit as i64);
        (from, to)
    }
}

impl Canvas for RasterCanvas {
    fn size(&self) -> [f32; 2] {
        [self.image.width() as f32, self.image.height() as f32]
    }

    fn font_size(&self) -> f32 {
        self.font_size
    }

    fn set_font_size(&mut self, size: f32) {
        self.font_size = size;
    }

    /// Sums glyph advances without kerning, so a string split into runs
    /// measures exactly like the joined string.
    fn measure(&self, text: &str) -> [f32; 2] {
        let Some(loaded) = &self.font else {
            log::warn!("Measure called before a font was loaded.");
            return [0.0, 0.0];
        };

        let width = text
            .chars()
            .map(|ch| {
                let index = loaded.font.lookup_glyph_index(ch);
                loaded.font.metrics_indexed(index, self.font_size).advance_width
            })
            .sum();

        [width, self.font_size * NOMINAL_HEIGHT]
    }

    fn draw_text(&mut self, text: &str, x: f32, y: f32, color: Rgba8) {
        let Some(loaded) = &self.font else {
            log::warn!("Draw called before a font was loaded.");
            return;
        };
        let font = Arc::clone(&loaded.font);
        let font_id = loaded.id;
        let font_size = self.font_size;

        let mut pen_x = x;
        for ch in text.chars() {
            let index = font.lookup_glyph_index(ch);
            let glyph = self
                .glyphs
                .get_or_rasterize(GlyphKey::new(font_id, index, font_size), &font);
            let metrics = glyph.metrics;

            if metrics.width > 0 && metrics.height > 0 {
                // glyph bitmaps hang from their top edge, the pen sits on the baseline
                let origin_x = (pen_x + metrics.xmin as f32).round() as i64;
                let origin_y = (y - (metrics.ymin as f32 + metrics.height as f32)).round() as i64;

                for row in 0..metrics.height {
                    for col in 0..metrics.width {
                        let alpha = glyph.coverage[row * metrics.width + col];
                        if alpha == 0 {
                            continue;
                        }
                        self.blend(
                            origin_x + col as i64,
                            origin_y + row as i64,
                            color,
                            alpha as f32 / 255.0,
                        );
                    }
                }
            }

            pen_x += metrics.advance_width;
        }
    }

    fn fill_rounded_rect(&mut self, rect: Box2D<f32>, radius: f32, color: Rgba8) {
        if rect.is_empty() {
            return;
        }

        let half_w = rect.width() / 2.0;
        let half_h = rect.height() / 2.0;
        let radius = radius.max(0.0).min(half_w).min(half_h);
        let center = rect.center();

        let (x0, x1) = self.span(rect.min.x, rect.max.x, self.image.width());
        let (y0, y1) = self.span(rect.min.y, rect.max.y, self.image.height());

        for py in y0..y1 {
            for px in x0..x1 {
                // signed distance from the pixel center to the rounded outline
                let qx = (px as f32 + 0.5 - center.x).abs() - (half_w - radius);
                let qy = (py as f32 + 0.5 - center.y).abs() - (half_h - radius);
                let outside = qx.max(0.0).hypot(qy.max(0.0));
                let inside = qx.max(qy).min(0.0);
                let distance = outside + inside - radius;

                let coverage = (0.5 - distance).clamp(0.0, 1.0);
                if coverage > 0.0 {
                    self.blend(px, py, color, coverage);
                }
            }
        }
    }

    /// Strokes a segment with round caps.
    fn stroke_line(&mut self, from: Point2D<f32>, to: Point2D<f32>, width: f32, color: Rgba8) {
        let half = width.max(0.0) / 2.0;
        let segment = to - from;
        let length_sq = segment.square_length();

        let (x0, x1) = self.span(
            from.x.min(to.x) - half - 1.0,
            from.x.max(to.x) + half + 1.0,
            self.image.width(),
        );
        let (y0, y1) = self.span(
            from.y.min(to.y) - half - 1.0,
            from.y.max(to.y) + half + 1.0,
            self.image.height(),
        );

        for py in y0..y1 {
            for px in x0..x1 {
                let p = Point2D::new(px as f32 + 0.5, py as f32 + 0.5);
                let t = if length_sq > 0.0 {
                    ((p - from).dot(segment) / length_sq).clamp(0.0, 1.0)
                } else {
                    0.0
                };
                let distance = (p - (from + segment * t)).length() - half;

                let coverage = (0.5 - distance).clamp(0.0, 1.0);
                if coverage > 0.0 {
                    self.blend(px, py, color, coverage);
                }
            }
        }
    }

    fn draw_image(&mut self, image: &RgbaImage, x: i64, y: i64) {
        for (col, row, pixel) in image.enumerate_pixels() {
            if pixel[3] == 0 {
                continue;
            }
            let opaque = image::Rgba([pixel[0], pixel[1], pixel[2], 255]);
            self.blend(
                x + col as i64,
                y + row as i64,
                opaque,
                pixel[3] as f32 / 255.0,
            );
        }
    }
}
