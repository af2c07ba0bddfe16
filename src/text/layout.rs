use crate::canvas::Canvas;
use crate::text::TextSnippet;

/// A snippet together with its horizontal position inside the run sequence.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlacedRun<'a> {
    pub snippet: &'a TextSnippet,
    /// Sum of the widths of every run before this one.
    pub offset: f32,
    pub width: f32,
}

/// Measured placement of a snippet sequence on a single line.
///
/// All widths are taken at the canvas font size current when
/// [`RunLayout::measure`] runs. Load the final size first: drawing the runs
/// at any other size breaks the seams between them.
#[derive(Clone, Debug, PartialEq)]
pub struct RunLayout<'a> {
    runs: Vec<PlacedRun<'a>>,
    total_width: f32,
    height: f32,
    font_size: f32,
}

impl<'a> RunLayout<'a> {
    /// Measures every snippet, in order, before anything is drawn.
    pub fn measure<C: Canvas + ?Sized>(canvas: &C, snippets: &'a [TextSnippet]) -> Self {
        let mut runs = Vec::with_capacity(snippets.len());
        let mut offset = 0.0;
        let mut height: f32 = 0.0;

        for snippet in snippets {
            let [width, run_height] = canvas.measure(&snippet.text);
            runs.push(PlacedRun {
                snippet,
                offset,
                width,
            });
            offset += width;
            height = height.max(run_height);
        }

        if runs.is_empty() {
            height = canvas.measure("")[1];
        }

        Self {
            runs,
            total_width: offset,
            height,
            font_size: canvas.font_size(),
        }
    }

    pub fn runs(&self) -> &[PlacedRun<'a>] {
        &self.runs
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PlacedRun<'a>> {
        self.runs.iter()
    }

    /// Width of the whole sequence.
    pub fn total_width(&self) -> f32 {
        self.total_width
    }

    /// Tallest run height.
    pub fn height(&self) -> f32 {
        self.height
    }

    /// Font size the runs were measured at.
    pub fn font_size(&self) -> f32 {
        self.font_size
    }

    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }
}

impl<'l, 'a> IntoIterator for &'l RunLayout<'a> {
    type Item = &'l PlacedRun<'a>;
    type IntoIter = std::slice::Iter<'l, PlacedRun<'a>>;

    fn into_iter(self) -> Self::IntoIter {
        self.runs.iter()
    }
}

#[allow(clippy::unwrap_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::testing::RecordingCanvas;
    use crate::color::WHITE;
    use crate::text::{parse, plain_text};

    #[test]
    fn offsets_accumulate_preceding_widths() {
        let canvas = RecordingCanvas::new(800.0, 100.0, 20.0);
        let snippets = parse("ab[c/FF0000:cde]f", WHITE).unwrap();
        let layout = RunLayout::measure(&canvas, &snippets);

        let offsets: Vec<_> = layout.iter().map(|run| run.offset).collect();
        assert_eq!(offsets, vec![0.0, 20.0, 50.0]);
        assert_eq!(layout.total_width(), 60.0);
        assert_eq!(layout.height(), 15.0);
    }

    #[test]
    fn last_run_ends_at_total_width() {
        let canvas = RecordingCanvas::new(800.0, 100.0, 35.0);
        let names = [
            "[c/FFD700:Golden] Age",
            "plain",
            "[c/00FF00:a][c/0000FF:bb][c/FF0000:ccc]",
            "x [c/123456:yy] z [c/654321:w]",
        ];

        for name in names {
            let snippets = parse(name, WHITE).unwrap();
            let layout = RunLayout::measure(&canvas, &snippets);
            let last = layout.runs().last().unwrap();
            let joined = canvas.measure(&plain_text(&snippets))[0];

            assert!((last.offset + last.width - joined).abs() < 1e-3, "{name}");
            assert!((layout.total_width() - joined).abs() < 1e-3, "{name}");
            assert!(
                layout.runs().windows(2).all(|w| w[0].offset <= w[1].offset),
                "{name}"
            );
        }
    }

    #[test]
    fn runs_keep_snippet_order() {
        let canvas = RecordingCanvas::new(800.0, 100.0, 10.0);
        let snippets = parse("[c/FF0000:1]2[c/00FF00:3]", WHITE).unwrap();
        let layout = RunLayout::measure(&canvas, &snippets);
        let texts: Vec<_> = layout.iter().map(|run| run.snippet.text.as_str()).collect();
        assert_eq!(texts, vec!["1", "2", "3"]);
    }

    #[test]
    fn empty_sequence_still_has_a_height() {
        let canvas = RecordingCanvas::new(800.0, 100.0, 40.0);
        let layout = RunLayout::measure(&canvas, &[]);
        assert!(layout.is_empty());
        assert_eq!(layout.total_width(), 0.0);
        assert_eq!(layout.height(), 30.0);
        assert_eq!(layout.font_size(), 40.0);
    }
}
