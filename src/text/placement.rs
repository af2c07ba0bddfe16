use crate::canvas::Canvas;

/// Bounds of the canvas a single render draws on.
///
/// Built fresh for every card and handed to each placement call, so
/// concurrent renders never see each other's dimensions.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RenderContext {
    pub width: f32,
    pub height: f32,
}

impl RenderContext {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Context matching the canvas dimensions.
    pub fn of<C: Canvas + ?Sized>(canvas: &C) -> Self {
        let [width, height] = canvas.size();
        Self { width, height }
    }

    /// Moves a baseline origin so that text of `size` stays on the canvas.
    ///
    /// `x` lands in `[0, width - text_w]`, `y` in `[text_h, height - text_h]`.
    /// Text larger than the canvas is pinned to the left/top bound.
    pub fn clamped(&self, x: f32, y: f32, size: [f32; 2]) -> (f32, f32) {
        let [text_w, text_h] = size;
        (
            clamp_low(x, 0.0, self.width - text_w),
            clamp_low(y, text_h, self.height - text_h),
        )
    }

    /// Left edge that centers text of `text_width` on the canvas.
    pub fn centered_x(&self, text_width: f32) -> f32 {
        (self.width - text_width) / 2.0
    }

    /// Left edge that centers text in the space right of an icon column
    /// `icon_dim` pixels wide, using the full canvas as reference frame.
    pub fn offset_centered_x(&self, text_width: f32, icon_dim: f32) -> f32 {
        (self.width - text_width + icon_dim) / 2.0
    }
}

/// Clamp where the lower bound wins if the bounds cross.
fn clamp_low(value: f32, min: f32, max: f32) -> f32 {
    value.min(max).max(min)
}

/// How a string (or a run sequence, as a whole) is positioned.
///
/// `y` is always the baseline.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Placement {
    /// Requested origin, moved back onto the canvas if it would overflow.
    Clamped { x: f32, y: f32 },
    /// Horizontally centered on the canvas.
    Centered { y: f32 },
    /// Centered right of an icon column `icon_dim` pixels wide.
    OffsetCentered { y: f32, icon_dim: f32 },
}

impl Placement {
    /// Baseline origin for a string of `size`.
    pub fn resolve(self, ctx: &RenderContext, size: [f32; 2]) -> (f32, f32) {
        self.resolve_run(ctx, size[0], 0.0, size)
    }

    /// Baseline origin of one run inside a sequence `total_width` wide.
    ///
    /// Centering uses the whole sequence; clamping applies to each run
    /// separately, as the last step before drawing.
    pub fn resolve_run(
        self,
        ctx: &RenderContext,
        total_width: f32,
        offset: f32,
        run_size: [f32; 2],
    ) -> (f32, f32) {
        match self {
            Placement::Clamped { x, y } => ctx.clamped(x + offset, y, run_size),
            Placement::Centered { y } => (ctx.centered_x(total_width) + offset, y),
            Placement::OffsetCentered { y, icon_dim } => {
                (ctx.offset_centered_x(total_width, icon_dim) + offset, y)
            }
        }
    }
}
