use euclid::default::{Box2D, Point2D};

use crate::api::{Author, ModRecord};
use crate::canvas::Canvas;
use crate::card::{CardConfig, display_name_snippets};
use crate::renderer::{draw_placed, draw_runs};
use crate::text::{Placement, RenderContext, RunLayout, fit_to_width, plain_text};

pub const WIDTH: f32 = 878.0;
pub const FONT_SIZE: f32 = 35.0;
const PADDING: f32 = 15.0;
/// Height reserved per mod row.
const ROW_HEIGHT: f32 = 32.0;
/// Rows reserved even when the author has fewer mods.
const MIN_ROWS: usize = 2;

const RANK_X: f32 = 30.0;
const NAME_X: f32 = 120.0;
const DOWNLOADS_X: f32 = WIDTH - 190.0;
/// Space left for a display name between its column and the downloads column.
const NAME_MAX_WIDTH: f32 = DOWNLOADS_X - NAME_X - 20.0;

/// Text height of the title and the rows at [`FONT_SIZE`].
fn line_height() -> f32 {
    FONT_SIZE * 72.0 / 96.0
}

/// `[width, height]` of a card listing `mod_count` mods.
pub fn card_size(mod_count: usize, border_width: u32) -> [u32; 2] {
    let rows = mod_count.max(MIN_ROWS) as f32;
    let height =
        line_height() + 40.0 + border_width as f32 * 2.0 + (ROW_HEIGHT + PADDING) * rows + 10.0;
    [WIDTH as u32, height as u32]
}

/// Draws the whole author card. The canvas must be at [`FONT_SIZE`].
pub fn draw<C: Canvas + ?Sized>(canvas: &mut C, author: &Author, config: &CardConfig) {
    let ctx = RenderContext::of(canvas);
    let style = config.text_style();
    let color = config.text_color;
    let border = config.border_width as f32;
    let radius = config.corner_radius as f32;

    canvas.fill_rounded_rect(
        Box2D::new(Point2D::zero(), Point2D::new(ctx.width, ctx.height)),
        radius,
        config.border_color,
    );
    canvas.fill_rounded_rect(
        Box2D::new(
            Point2D::new(border, border),
            Point2D::new(ctx.width - border, ctx.height - border),
        ),
        radius,
        config.bg_color,
    );

    let title = format!("{}'s Stats", author.steam_name);
    let [title_w, title_h] = canvas.measure(&title);
    draw_placed(
        canvas,
        &ctx,
        &title,
        Placement::Clamped {
            x: ctx.centered_x(title_w),
            y: border + 35.0,
        },
        color,
        style,
    );

    let header_y = title_h + 40.0 + border * 2.0;

    if author.mods.is_empty() {
        draw_placed(
            canvas,
            &ctx,
            "No mods found",
            Placement::Clamped {
                x: RANK_X,
                y: header_y + FONT_SIZE / 2.0,
            },
            color,
            style,
        );
        return;
    }

    for (header, x) in [
        ("Rank", RANK_X),
        ("Display Name", NAME_X),
        ("Downloads", DOWNLOADS_X),
    ] {
        draw_placed(
            canvas,
            &ctx,
            header,
            Placement::Clamped { x, y: header_y },
            color,
            style,
        );
    }
    canvas.stroke_line(
        Point2D::new(RANK_X, header_y + 5.0),
        Point2D::new(ctx.width - RANK_X, header_y + 5.0),
        2.0,
        color,
    );

    let mut mods: Vec<&ModRecord> = author.mods.iter().collect();
    mods.sort_by(|a, b| b.downloads_total.cmp(&a.downloads_total));

    for (i, record) in mods.into_iter().enumerate() {
        let snippets = display_name_snippets(&record.display_name, color);
        let name = plain_text(&snippets);
        let name_h = canvas.measure(&name)[1];
        let y = (name_h + PADDING) * i as f32 + name_h * 2.0 + header_y;

        draw_placed(
            canvas,
            &ctx,
            &record.rank.to_string(),
            Placement::Clamped { x: RANK_X, y },
            color,
            style,
        );

        {
            let mut fitted = fit_to_width(canvas, &name, NAME_MAX_WIDTH, FONT_SIZE);
            let layout = RunLayout::measure(&*fitted, &snippets);
            draw_runs(
                &mut *fitted,
                &ctx,
                &layout,
                Placement::Clamped { x: NAME_X, y },
                style,
            );
        }

        let downloads = record.downloads_total.to_string();
        let downloads_w = canvas.measure(&downloads)[0];
        draw_placed(
            canvas,
            &ctx,
            &downloads,
            Placement::Clamped {
                x: ctx.width - downloads_w - 50.0,
                y,
            },
            color,
            style,
        );
    }
}
