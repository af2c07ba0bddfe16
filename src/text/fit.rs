use crate::canvas::{Canvas, FontSizeGuard, scoped_font_size};

/// Scale factor in `(0, 1]` that shrinks `full_text`, measured at
/// `base_size`, to at most `max_width` pixels.
///
/// The canvas is left at the size it had on entry.
pub fn fit_scale<C: Canvas + ?Sized>(
    canvas: &mut C,
    full_text: &str,
    max_width: f32,
    base_size: f32,
) -> f32 {
    let width = scoped_font_size(canvas, base_size).measure(full_text)[0];
    scale_for(width, max_width)
}

/// Loads the largest size up to `base_size` at which `full_text` fits
/// `max_width`, for as long as the returned guard lives.
///
/// Measure and draw the affected runs through the guard; dropping it restores
/// the size the canvas had before this call.
pub fn fit_to_width<'c, C: Canvas + ?Sized>(
    canvas: &'c mut C,
    full_text: &str,
    max_width: f32,
    base_size: f32,
) -> FontSizeGuard<'c, C> {
    let scale = fit_scale(canvas, full_text, max_width, base_size);
    if scale < 1.0 {
        log::debug!("Scaling {full_text:?} by {scale:.3} to fit {max_width}px");
    }
    scoped_font_size(canvas, base_size * scale)
}

fn scale_for(width: f32, max_width: f32) -> f32 {
    if width > max_width && width > 0.0 {
        (max_width / width).clamp(f32::EPSILON, 1.0)
    } else {
        1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::testing::RecordingCanvas;

    #[test]
    fn fitting_text_is_not_scaled() {
        let mut canvas = RecordingCanvas::new(878.0, 240.0, 40.0);
        // 10 chars * 20px = 200px
        assert_eq!(fit_scale(&mut canvas, "0123456789", 200.0, 40.0), 1.0);
        assert_eq!(fit_scale(&mut canvas, "0123456789", 500.0, 40.0), 1.0);
        assert_eq!(fit_scale(&mut canvas, "", 10.0, 40.0), 1.0);
    }

    #[test]
    fn wide_text_is_scaled_to_the_budget() {
        let mut canvas = RecordingCanvas::new(878.0, 240.0, 40.0);
        let text = "An Unreasonably Long Mod Display Name";
        let max_width = 300.0;

        let scale = fit_scale(&mut canvas, text, max_width, 40.0);
        assert!(scale < 1.0 && scale > 0.0);

        let scaled = scoped_font_size(&mut canvas, 40.0 * scale);
        assert!((scaled.measure(text)[0] - max_width).abs() < 0.01);
    }

    #[test]
    fn scale_is_measured_at_base_size() {
        let mut canvas = RecordingCanvas::new(878.0, 240.0, 12.0);
        // 10 chars at 40px = 200px, ignoring the current 12px face
        assert_eq!(fit_scale(&mut canvas, "0123456789", 100.0, 40.0), 0.5);
        assert_eq!(canvas.font_size(), 12.0);
    }

    #[test]
    fn guard_scales_then_restores() {
        let mut canvas = RecordingCanvas::new(878.0, 240.0, 40.0);
        {
            let fitted = fit_to_width(&mut canvas, "0123456789", 100.0, 40.0);
            assert_eq!(fitted.font_size(), 20.0);
            assert!(fitted.measure("0123456789")[0] <= 100.0);
        }
        assert_eq!(canvas.font_size(), 40.0);
    }

    #[test]
    fn non_positive_budget_stays_in_range() {
        let scale = scale_for(100.0, 0.0);
        assert!(scale > 0.0 && scale <= 1.0);
    }
}
