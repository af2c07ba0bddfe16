use palette::Srgb;

/// 8-bit RGBA color, the pixel type of [`crate::canvas::RasterCanvas`].
pub type Rgba8 = image::Rgba<u8>;

pub const WHITE: Rgba8 = image::Rgba([255, 255, 255, 255]);
pub const BLACK: Rgba8 = image::Rgba([0, 0, 0, 255]);

/// Opaque color from its three channels.
pub const fn rgb(r: u8, g: u8, b: u8) -> Rgba8 {
    image::Rgba([r, g, b, 255])
}

/// Parses `RRGGBB` or `RGB`, with or without a leading `#`.
///
/// Returns `None` for anything else so callers can fall back to a default.
pub fn parse_hex(value: &str) -> Option<Rgba8> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    let color: Srgb<u8> = value.parse().ok()?;
    Some(rgb(color.red, color.green, color.blue))
}
