//! # readme-card
//!
//! Renders mod statistics cards as PNG images, ready to be embedded in a
//! README.
//!
//! ## Overview
//!
//! A card is drawn in a few steps:
//!
//! 1. Data is fetched from the statistics API ([`api::ApiClient`]).
//! 2. Display names are split into colored runs by the markup parser
//!    ([`text::parse`]), which understands `[c/RRGGBB:text]` directives.
//! 3. Runs are measured side by side ([`text::RunLayout`]), shrunk to fit their
//!    column ([`text::fit_to_width`]) and positioned ([`text::Placement`]).
//! 4. The renderer draws them, optionally outlined, on a [`canvas::RasterCanvas`].
//! 5. The canvas is encoded as PNG.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use readme_card::{CardConfig, FontStorage, api::Author, card};
//!
//! let mut fonts = FontStorage::new();
//! fonts.load_fonts_dir("fonts".as_ref());
//!
//! let author = Author {
//!     steam_name: "Tomat".to_string(),
//!     ..Author::default()
//! };
//! let png = card::render_author_card(&author, &CardConfig::default(), &fonts)?;
//! std::fs::write("card.png", png)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Features
//!
//! *   **Colored Names**: Inline color directives, drawn run by run without gaps.
//! *   **Fit to Width**: Long names are scaled down instead of overflowing.
//! *   **Thread Safety**: Renders own their canvas and share only the font storage.

pub mod api;
pub mod canvas;
pub mod card;
pub mod color;
pub mod config;
pub mod error;
pub mod font_storage;
pub mod renderer;
pub mod server;
pub mod text;

// common re-exports
pub use card::CardConfig;
pub use error::{CardError, Result};
pub use font_storage::{FontChoice, FontStorage};

// re-export dependencies
pub use fontdb;
pub use fontdue;
