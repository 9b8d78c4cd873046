//! CPU-side texture images
//!
//! Pixels are stored as tightly packed RGBA8 in sRGB space. The renderer
//! uploads them to an sRGB texture so sampling returns linear values.

use std::path::Path;
use crate::asset_error::AssetError;

/// Sampler filtering mode
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TextureFilter {
    #[default]
    Linear,
    Nearest,
}

/// Sampler addressing mode
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TextureWrap {
    #[default]
    Clamp,
    Repeat,
}

/// An RGBA8 image plus sampling state
#[derive(Clone, Debug)]
pub struct TextureData {
    pub width: u32,
    pub height: u32,
    /// `width * height * 4` bytes, row-major, top row first
    pub pixels: Vec<u8>,
    pub filter: TextureFilter,
    pub wrap: TextureWrap,
    /// Bumped whenever the pixels are replaced, so GPU copies can be refreshed
    pub revision: u32,
}

impl TextureData {
    /// Wrap raw RGBA8 pixels
    pub fn from_rgba(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, AssetError> {
        let expected = width as usize * height as usize * 4;
        if width == 0 || height == 0 || pixels.len() != expected {
            return Err(AssetError::Image(format!(
                "expected {}x{} RGBA pixels ({} bytes), got {} bytes",
                width, height, expected, pixels.len()
            )));
        }
        Ok(Self {
            width,
            height,
            pixels,
            filter: TextureFilter::Linear,
            wrap: TextureWrap::Clamp,
            revision: 0,
        })
    }

    /// Decode an image file (PNG or JPEG)
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, AssetError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(AssetError::NotFound(path.display().to_string()));
        }
        let img = image::open(path)
            .map_err(|e| AssetError::Image(format!("{}: {}", path.display(), e)))?
            .to_rgba8();
        let (width, height) = img.dimensions();
        Self::from_rgba(width, height, img.into_raw())
    }

    /// Single opaque white pixel, used in place of missing images
    pub fn white() -> Self {
        Self {
            width: 1,
            height: 1,
            pixels: vec![255, 255, 255, 255],
            filter: TextureFilter::Nearest,
            wrap: TextureWrap::Repeat,
            revision: 0,
        }
    }

    /// 2x2 checkerboard of the two colors (`0xRRGGBB`), nearest-filtered and repeating
    pub fn checker(a: u32, b: u32) -> Self {
        let mut pixels = Vec::with_capacity(16);
        for (x, y) in [(0, 0), (1, 0), (0, 1), (1, 1)] {
            let hex = if (x + y) % 2 == 0 { a } else { b };
            pixels.extend_from_slice(&rgba_bytes(hex, 255));
        }
        Self {
            width: 2,
            height: 2,
            pixels,
            filter: TextureFilter::Nearest,
            wrap: TextureWrap::Repeat,
            revision: 0,
        }
    }

    /// Soft round blob for contact shadows: black, alpha fading out from the center
    pub fn round_shadow(size: u32) -> Self {
        let size = size.max(2);
        let mut pixels = Vec::with_capacity((size * size * 4) as usize);
        let half = size as f32 / 2.0;

        for y in 0..size {
            for x in 0..size {
                let dx = (x as f32 + 0.5 - half) / half;
                let dy = (y as f32 + 0.5 - half) / half;
                let d = (dx * dx + dy * dy).sqrt();
                // Solid core out to 30% of the radius, smooth falloff to the edge
                let t = ((d - 0.3) / 0.7).clamp(0.0, 1.0);
                let alpha = 1.0 - t * t * (3.0 - 2.0 * t);
                pixels.extend_from_slice(&[0, 0, 0, (alpha * 255.0).round() as u8]);
            }
        }

        Self {
            width: size,
            height: size,
            pixels,
            filter: TextureFilter::Linear,
            wrap: TextureWrap::Clamp,
            revision: 0,
        }
    }

    /// Set the filter mode
    pub fn with_filter(mut self, filter: TextureFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Set the wrap mode
    pub fn with_wrap(mut self, wrap: TextureWrap) -> Self {
        self.wrap = wrap;
        self
    }

    /// RGBA bytes of the pixel at (x, y)
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y * self.width + x) * 4) as usize;
        let p = &self.pixels[i..i + 4];
        Some([p[0], p[1], p[2], p[3]])
    }
}

fn rgba_bytes(hex: u32, alpha: u8) -> [u8; 4] {
    [
        ((hex >> 16) & 0xff) as u8,
        ((hex >> 8) & 0xff) as u8,
        (hex & 0xff) as u8,
        alpha,
    ]
}
