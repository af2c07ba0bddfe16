pub mod outline;

use crate::canvas::Canvas;
use crate::color::Rgba8;
use crate::text::{Placement, RenderContext, RunLayout};

pub use outline::draw_outlined;

/// How text strokes are drawn.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TextStyle {
    /// Draw a black halo behind each string.
    pub outline: bool,
}

/// Draws `text` at a baseline origin in the given style.
pub fn draw_text_styled<C: Canvas + ?Sized>(
    canvas: &mut C,
    text: &str,
    x: f32,
    y: f32,
    color: Rgba8,
    style: TextStyle,
) {
    if style.outline {
        draw_outlined(canvas, text, x, y, color);
    } else {
        canvas.draw_text(text, x, y, color);
    }
}

/// Measures `text` at the current size and draws it where `placement` puts it.
///
/// Returns the measured `[width, height]`.
pub fn draw_placed<C: Canvas + ?Sized>(
    canvas: &mut C,
    ctx: &RenderContext,
    text: &str,
    placement: Placement,
    color: Rgba8,
    style: TextStyle,
) -> [f32; 2] {
    let size = canvas.measure(text);
    let (x, y) = placement.resolve(ctx, size);
    draw_text_styled(canvas, text, x, y, color, style);
    size
}

/// Draws every run of `layout`, each in its own color.
///
/// The canvas must still be at the size the layout was measured at.
pub fn draw_runs<C: Canvas + ?Sized>(
    canvas: &mut C,
    ctx: &RenderContext,
    layout: &RunLayout<'_>,
    placement: Placement,
    style: TextStyle,
) {
    if (canvas.font_size() - layout.font_size()).abs() > f32::EPSILON {
        log::warn!(
            "Runs measured at {}px are drawn at {}px; seams will not line up.",
            layout.font_size(),
            canvas.font_size()
        );
    }

    for run in layout {
        let (x, y) = placement.resolve_run(
            ctx,
            layout.total_width(),
            run.offset,
            [run.width, layout.height()],
        );
        draw_text_styled(canvas, &run.snippet.text, x, y, run.snippet.color, style);
    }
}
