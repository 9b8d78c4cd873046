//! Color helpers
//!
//! Scene and config files describe colors as `0xRRGGBB` sRGB integers.
//! Shading happens in linear space, so everything is converted on the way in.

/// Convert one sRGB channel in `[0, 1]` to linear
#[inline]
pub fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// Split a `0xRRGGBB` integer into sRGB channels in `[0, 1]`
#[inline]
pub fn hex_to_srgb(hex: u32) -> [f32; 3] {
    [
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
    ]
}

/// Convert a `0xRRGGBB` sRGB integer to linear RGB
pub fn hex_to_linear(hex: u32) -> [f32; 3] {
    let [r, g, b] = hex_to_srgb(hex);
    [srgb_to_linear(r), srgb_to_linear(g), srgb_to_linear(b)]
}

/// Convert a `0xRRGGBB` sRGB integer to opaque linear RGBA
pub fn hex_to_linear_rgba(hex: u32) -> [f32; 4] {
    let [r, g, b] = hex_to_linear(hex);
    [r, g, b, 1.0]
}
