/// Color directive parsing for display names.
pub mod markup;
/// Horizontal placement of consecutive colored runs.
pub mod layout;
/// Font scaling that keeps text inside a pixel budget.
pub mod fit;
/// Anchoring, centering and clamping of text on the canvas.
pub mod placement;

pub use fit::{fit_scale, fit_to_width};
pub use layout::{PlacedRun, RunLayout};
pub use markup::{ColorPolicy, TextSnippet, parse, parse_with_policy, plain_text};
pub use placement::{Placement, RenderContext};
