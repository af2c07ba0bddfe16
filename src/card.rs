//! Card compositions: what goes where on the author and mod cards.
//!
//! Each `render_*` function owns a fresh [`RasterCanvas`] from creation to
//! PNG encoding. The `draw` functions of the submodules only need the
//! [`Canvas`](crate::canvas::Canvas) trait, so they can be exercised without
//! real fonts.

pub mod author;
pub mod mod_info;

use crate::api::{ApiVersion, Author, ModCardData};
use crate::canvas::RasterCanvas;
use crate::color::{Rgba8, WHITE, rgb};
use crate::error::Result;
use crate::font_storage::{FontChoice, FontStorage};
use crate::renderer::TextStyle;
use crate::text::{self, TextSnippet};

/// Everything about a card's look that the request can change.
#[derive(Clone, Debug, PartialEq)]
pub struct CardConfig {
    pub text_color: Rgba8,
    pub bg_color: Rgba8,
    pub border_color: Rgba8,
    pub border_width: u32,
    pub corner_radius: u32,
    pub version: ApiVersion,
    pub font: FontChoice,
    pub outline: bool,
}

impl CardConfig {
    pub const DEFAULT_TEXT_COLOR: Rgba8 = WHITE;
    pub const DEFAULT_BG_COLOR: Rgba8 = rgb(25, 28, 30);
    pub const DEFAULT_BORDER_COLOR: Rgba8 = rgb(35, 39, 42);
    pub const DEFAULT_BORDER_WIDTH: u32 = 4;
    pub const DEFAULT_CORNER_RADIUS: u32 = 15;
    /// Upper bound for `border_width`, which also grows the author card.
    pub const MAX_BORDER_WIDTH: u32 = 64;

    pub fn text_style(&self) -> TextStyle {
        TextStyle {
            outline: self.outline,
        }
    }
}

impl Default for CardConfig {
    fn default() -> Self {
        Self {
            text_color: Self::DEFAULT_TEXT_COLOR,
            bg_color: Self::DEFAULT_BG_COLOR,
            border_color: Self::DEFAULT_BORDER_COLOR,
            border_width: Self::DEFAULT_BORDER_WIDTH,
            corner_radius: Self::DEFAULT_CORNER_RADIUS,
            version: ApiVersion::default(),
            font: FontChoice::default(),
            outline: false,
        }
    }
}

/// Renders the author card to PNG bytes.
pub fn render_author_card(
    author: &Author,
    config: &CardConfig,
    fonts: &FontStorage,
) -> Result<Vec<u8>> {
    let face = fonts.face_for(config.font)?;
    let [width, height] = author::card_size(author.mods.len(), config.border_width);

    let mut canvas = RasterCanvas::new(width, height);
    canvas.load_font(face, author::FONT_SIZE);
    author::draw(&mut canvas, author, config);

    canvas.encode_png()
}

/// Renders the mod card to PNG bytes.
pub fn render_mod_card(
    data: &ModCardData,
    config: &CardConfig,
    fonts: &FontStorage,
) -> Result<Vec<u8>> {
    let face = fonts.face_for(config.font)?;

    let mut canvas = RasterCanvas::new(mod_info::WIDTH as u32, mod_info::HEIGHT as u32);
    canvas.load_font(face, mod_info::NAME_FONT_SIZE);
    mod_info::draw(&mut canvas, data, config);

    canvas.encode_png()
}

/// Unescapes and parses a display name from the API.
///
/// A name with a broken directive is still shown, as plain text in
/// `default_color`, instead of failing the whole card.
fn display_name_snippets(raw: &str, default_color: Rgba8) -> Vec<TextSnippet> {
    let name = html_escape::decode_html_entities(raw);
    match text::parse(&name, default_color) {
        Ok(snippets) => snippets,
        Err(err) => {
            log::warn!("Drawing display name {raw:?} as plain text: {err}");
            vec![TextSnippet {
                text: name.into_owned(),
                color: default_color,
            }]
        }
    }
}
