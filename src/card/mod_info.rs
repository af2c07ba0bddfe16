use euclid::default::{Box2D, Point2D};
use image::imageops::{self, FilterType};

use crate::api::ModCardData;
use crate::canvas::Canvas;
use crate::card::{CardConfig, display_name_snippets};
use crate::renderer::{draw_placed, draw_runs};
use crate::text::{Placement, RenderContext, RunLayout, fit_to_width, plain_text};

pub const WIDTH: f32 = 878.0;
pub const HEIGHT: f32 = 240.0;
pub const NAME_FONT_SIZE: f32 = 40.0;
const INFO_FONT_SIZE: f32 = 32.0;

const CARD_PADDING: f32 = 20.0;
const ICON_SIZE: u32 = 160;
const ICON_PADDING: i64 = 40;
/// Width of the icon column; text is centered in the space right of it.
const ICON_DIM: f32 = ICON_SIZE as f32 + CARD_PADDING * 3.0;
const NAME_Y: f32 = 60.0;
const NAME_MAX_WIDTH: f32 = WIDTH - ICON_DIM - 20.0;
const LINE_GAP: f32 = 15.0;

/// Draws the whole mod card. The canvas must be at [`NAME_FONT_SIZE`].
pub fn draw<C: Canvas + ?Sized>(canvas: &mut C, data: &ModCardData, config: &CardConfig) {
    let ctx = RenderContext::of(canvas);
    let style = config.text_style();
    let color = config.text_color;
    let record = &data.record;

    canvas.fill_rounded_rect(
        Box2D::new(Point2D::zero(), Point2D::new(ctx.width, ctx.height)),
        config.corner_radius as f32,
        config.border_color,
    );

    let panel_size = ICON_SIZE as f32 + CARD_PADDING * 2.0;
    canvas.fill_rounded_rect(
        Box2D::new(
            Point2D::new(CARD_PADDING, CARD_PADDING),
            Point2D::new(CARD_PADDING + panel_size, CARD_PADDING + panel_size),
        ),
        config.corner_radius.saturating_sub(5) as f32,
        config.bg_color,
    );

    let icon = imageops::resize(&data.icon, ICON_SIZE, ICON_SIZE, FilterType::Nearest);
    canvas.draw_image(&icon, ICON_PADDING, ICON_PADDING);

    let snippets = display_name_snippets(&record.display_name, color);
    {
        let mut fitted = fit_to_width(
            canvas,
            &plain_text(&snippets),
            NAME_MAX_WIDTH,
            NAME_FONT_SIZE,
        );
        let layout = RunLayout::measure(&*fitted, &snippets);
        draw_runs(
            &mut *fitted,
            &ctx,
            &layout,
            Placement::OffsetCentered {
                y: NAME_Y,
                icon_dim: ICON_DIM,
            },
            style,
        );
    }

    canvas.set_font_size(INFO_FONT_SIZE);
    let lines = [
        format!("{} Downloads Total", record.downloads_total),
        format!("{} Downloads Yesterday", record.downloads_yesterday),
        format!("Last updated: {} ({})", record.last_updated, record.version),
    ];

    let mut y = NAME_Y;
    for line in &lines {
        y += INFO_FONT_SIZE + LINE_GAP;
        draw_placed(
            canvas,
            &ctx,
            line,
            Placement::OffsetCentered {
                y,
                icon_dim: ICON_DIM,
            },
            color,
            style,
        );
    }
}
