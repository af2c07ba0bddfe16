use std::collections::HashMap;
use std::sync::Arc;

pub const SIZE_QUANTIZE: f32 = 256f32;

/// Identifies one rasterization of a glyph: face, glyph and pixel size.
///
/// Sizes are quantized so that a size recomputed from a scale factor still
/// hits the entry rasterized earlier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GlyphKey {
    font_id: fontdb::ID,
    glyph_index: u16,
    font_size: u32, // font size * SIZE_QUANTIZE
}

impl GlyphKey {
    pub fn new(font_id: fontdb::ID, glyph_index: u16, font_size: f32) -> Self {
        Self {
            font_id,
            glyph_index,
            font_size: (font_size * SIZE_QUANTIZE).round() as u32,
        }
    }

    pub fn glyph_index(&self) -> u16 {
        self.glyph_index
    }

    pub fn font_size(&self) -> f32 {
        self.font_size as f32 / SIZE_QUANTIZE
    }
}

/// Coverage bitmap of a single glyph, one byte per pixel, row-major.
pub struct RasterGlyph {
    pub metrics: fontdue::Metrics,
    pub coverage: Vec<u8>,
}

/// Per-canvas cache of rasterized glyphs.
///
/// Outlined text draws the same string dozens of times, so each glyph is
/// rasterized once per size and then only blended.
#[derive(Default)]
pub struct GlyphCache {
    glyphs: HashMap<GlyphKey, Arc<RasterGlyph>, fxhash::FxBuildHasher>,
}

impl GlyphCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_rasterize(&mut self, key: GlyphKey, font: &fontdue::Font) -> Arc<RasterGlyph> {
        let entry = self.glyphs.entry(key).or_insert_with(|| {
            let (metrics, coverage) = font.rasterize_indexed(key.glyph_index(), key.font_size());
            Arc::new(RasterGlyph { metrics, coverage })
        });
        Arc::clone(entry)
    }
}
