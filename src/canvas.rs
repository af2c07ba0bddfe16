//! Drawing surfaces the card renderer paints on.
//!
//! Text layout only ever needs [`Canvas::measure`] and [`Canvas::draw_text`];
//! the shape primitives exist for card backgrounds and icons.

pub mod glyph_cache;
pub mod raster;

use std::ops::{Deref, DerefMut};

use euclid::default::{Box2D, Point2D};
use image::RgbaImage;

use crate::color::Rgba8;

pub use raster::RasterCanvas;

/// A fixed-size surface with a current font size.
///
/// **Y-axis goes down.** Text is positioned by its baseline.
pub trait Canvas {
    /// `[width, height]` in pixels.
    fn size(&self) -> [f32; 2];

    /// Size, in pixels, of the currently loaded font.
    fn font_size(&self) -> f32;

    /// Reloads the current face at another size.
    fn set_font_size(&mut self, size: f32);

    /// `[width, height]` of `text` at the current font size.
    fn measure(&self, text: &str) -> [f32; 2];

    /// Draws `text` with its baseline starting at `(x, y)`.
    fn draw_text(&mut self, text: &str, x: f32, y: f32, color: Rgba8);

    fn fill_rounded_rect(&mut self, rect: Box2D<f32>, radius: f32, color: Rgba8);

    fn stroke_line(&mut self, from: Point2D<f32>, to: Point2D<f32>, width: f32, color: Rgba8);

    /// Blends `image` with its top-left corner at `(x, y)`.
    fn draw_image(&mut self, image: &RgbaImage, x: i64, y: i64);
}

/// Temporarily switches a canvas to another font size.
///
/// The previous size comes back when the guard is dropped, so a resize can
/// never leak into text drawn after the scoped block.
pub struct FontSizeGuard<'a, C: Canvas + ?Sized> {
    canvas: &'a mut C,
    restore: f32,
}

/// Loads `size` on `canvas` until the returned guard goes out of scope.
pub fn scoped_font_size<C: Canvas + ?Sized>(canvas: &mut C, size: f32) -> FontSizeGuard<'_, C> {
    let restore = canvas.font_size();
    if (restore - size).abs() > f32::EPSILON {
        canvas.set_font_size(size);
    }
    FontSizeGuard { canvas, restore }
}

impl<C: Canvas + ?Sized> Deref for FontSizeGuard<'_, C> {
    type Target = C;

    fn deref(&self) -> &C {
        self.canvas
    }
}

impl<C: Canvas + ?Sized> DerefMut for FontSizeGuard<'_, C> {
    fn deref_mut(&mut self) -> &mut C {
        self.canvas
    }
}

impl<C: Canvas + ?Sized> Drop for FontSizeGuard<'_, C> {
    fn drop(&mut self) {
        if (self.canvas.font_size() - self.restore).abs() > f32::EPSILON {
            self.canvas.set_font_size(self.restore);
        }
    }
}
