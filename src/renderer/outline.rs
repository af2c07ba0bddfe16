//! Outlined text: a solid halo stamped around each string.
//!
//! The halo is made by drawing the string in [`OUTLINE_COLOR`] at every
//! integer offset inside a disc, then drawing it once more in the fill color.
//! The outline therefore has the same thickness whatever the stroke weight of
//! the face. It costs one draw per offset (45 for the default radius), which
//! is fine for the few dozen short strings of a card and nothing longer.

use crate::canvas::Canvas;
use crate::color::{BLACK, Rgba8};

/// Halo radius in pixels; offsets with `dx² + dy² < r²` are stamped.
pub const OUTLINE_RADIUS: i32 = 4;
pub const OUTLINE_COLOR: Rgba8 = BLACK;

/// Integer offsets strictly inside a disc of `radius`, row by row.
pub fn disc_offsets(radius: i32) -> impl Iterator<Item = (i32, i32)> {
    let limit = radius * radius;
    (-radius..=radius)
        .flat_map(move |dy| (-radius..=radius).map(move |dx| (dx, dy)))
        .filter(move |(dx, dy)| dx * dx + dy * dy < limit)
}

/// Draws `text` with a black outline and `fill` on top.
pub fn draw_outlined<C: Canvas + ?Sized>(canvas: &mut C, text: &str, x: f32, y: f32, fill: Rgba8) {
    for (dx, dy) in disc_offsets(OUTLINE_RADIUS) {
        canvas.draw_text(text, x + dx as f32, y + dy as f32, OUTLINE_COLOR);
    }
    canvas.draw_text(text, x, y, fill);
}

#[allow(clippy::unwrap_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::testing::RecordingCanvas;
    use crate::color::rgb;

    #[test]
    fn default_radius_stamps_45_offsets() {
        assert_eq!(disc_offsets(OUTLINE_RADIUS).count(), 45);
        assert!(disc_offsets(OUTLINE_RADIUS).all(|(dx, dy)| dx * dx + dy * dy < 16));
        assert!(disc_offsets(OUTLINE_RADIUS).any(|offset| offset == (0, 0)));
        assert!(!disc_offsets(OUTLINE_RADIUS).any(|offset| offset == (4, 0)));
    }

    #[test]
    fn zero_radius_has_no_halo() {
        assert_eq!(disc_offsets(0).count(), 0);
    }

    #[test]
    fn halo_surrounds_fill() {
        let mut canvas = RecordingCanvas::new(200.0, 100.0, 20.0);
        let fill = rgb(255, 215, 0);
        draw_outlined(&mut canvas, "Stats", 30.0, 50.0, fill);

        let texts = canvas.texts();
        let (halo, last) = texts.split_at(texts.len() - 1);
        assert_eq!(halo.len(), 45);
        assert!(halo.iter().all(|(_, _, _, color, _)| *color == OUTLINE_COLOR));
        assert!(halo.iter().all(|(_, x, y, ..)| (x - 30.0).abs() < 4.0 && (y - 50.0).abs() < 4.0));
        assert_eq!((last[0].1, last[0].2, last[0].3), (30.0, 50.0, fill));
    }
}
