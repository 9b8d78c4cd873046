//! Material types
//!
//! A Material describes how one group of a mesh is shaded.

use bitflags::bitflags;
use serde::{Serialize, Deserialize};
use crate::color::hex_to_linear_rgba;
use crate::graph::TextureKey;

bitflags! {
    /// Render state flags of a material
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct MaterialFlags: u8 {
        /// Alpha-blended, drawn after opaque geometry
        const TRANSPARENT = 1 << 0;
        /// Lit from both sides
        const DOUBLE_SIDED = 1 << 1;
        /// Writes to the depth buffer
        const DEPTH_WRITE = 1 << 2;
    }
}

impl Default for MaterialFlags {
    fn default() -> Self {
        MaterialFlags::DEPTH_WRITE
    }
}

/// Lighting model
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Shading {
    /// Unlit: texture times color
    Basic,
    /// Diffuse only
    Lambert,
    /// Diffuse plus Blinn-Phong specular
    #[default]
    Phong,
}

impl Shading {
    /// Index passed to the shader
    pub fn shader_index(self) -> u32 {
        match self {
            Shading::Basic => 0,
            Shading::Lambert => 1,
            Shading::Phong => 2,
        }
    }
}

/// Surface description of a mesh group
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Material {
    /// Linear RGBA color, multiplied with the texture
    pub color: [f32; 4],
    /// Overall opacity (only visible when TRANSPARENT is set)
    pub opacity: f32,
    /// Optional diffuse texture
    pub texture: Option<TextureKey>,
    /// Texture coordinate repeat factors
    pub uv_repeat: [f32; 2],
    /// Lighting model
    pub shading: Shading,
    /// Render state
    pub flags: MaterialFlags,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            color: [1.0, 1.0, 1.0, 1.0],
            opacity: 1.0,
            texture: None,
            uv_repeat: [1.0, 1.0],
            shading: Shading::Phong,
            flags: MaterialFlags::default(),
        }
    }
}

impl Material {
    /// Phong material from a `0xRRGGBB` sRGB color
    pub fn phong(hex: u32) -> Self {
        Self {
            color: hex_to_linear_rgba(hex),
            ..Self::default()
        }
    }

    /// Lambert material from a `0xRRGGBB` sRGB color
    pub fn lambert(hex: u32) -> Self {
        Self {
            color: hex_to_linear_rgba(hex),
            shading: Shading::Lambert,
            ..Self::default()
        }
    }

    /// Unlit textured material
    pub fn textured(texture: TextureKey) -> Self {
        Self {
            texture: Some(texture),
            shading: Shading::Basic,
            ..Self::default()
        }
    }

    /// Transparent, unlit decal that does not write depth
    pub fn decal(texture: TextureKey) -> Self {
        Self {
            texture: Some(texture),
            shading: Shading::Basic,
            flags: MaterialFlags::TRANSPARENT,
            ..Self::default()
        }
    }

    /// Set a texture
    pub fn with_texture(mut self, texture: TextureKey) -> Self {
        self.texture = Some(texture);
        self
    }

    /// Set texture repeat factors
    pub fn with_uv_repeat(mut self, u: f32, v: f32) -> Self {
        self.uv_repeat = [u, v];
        self
    }

    /// Add render state flags
    pub fn with_flags(mut self, flags: MaterialFlags) -> Self {
        self.flags |= flags;
        self
    }

    /// Whether this material goes in the blended pass
    #[inline]
    pub fn is_transparent(&self) -> bool {
        self.flags.contains(MaterialFlags::TRANSPARENT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::SlotMap;

    #[test]
    fn test_material_default() {
        let m = Material::default();
        assert_eq!(m.color, [1.0, 1.0, 1.0, 1.0]);
        assert_eq!(m.opacity, 1.0);
        assert!(m.flags.contains(MaterialFlags::DEPTH_WRITE));
        assert!(!m.is_transparent());
    }

    #[test]
    fn test_decal_is_transparent_without_depth_write() {
        let mut textures: SlotMap<TextureKey, ()> = SlotMap::with_key();
        let key = textures.insert(());
        let m = Material::decal(key);
        assert!(m.is_transparent());
        assert!(!m.flags.contains(MaterialFlags::DEPTH_WRITE));
        assert_eq!(m.shading, Shading::Basic);
        assert_eq!(m.texture, Some(key));
    }

    #[test]
    fn test_lambert_and_phong() {
        assert_eq!(Material::lambert(0xffb3ff).shading, Shading::Lambert);
        assert_eq!(Material::phong(0x44aa88).shading, Shading::Phong);
    }

    #[test]
    fn test_flags_accumulate() {
        let m = Material::phong(0xffffff).with_flags(MaterialFlags::DOUBLE_SIDED);
        assert!(m.flags.contains(MaterialFlags::DOUBLE_SIDED | MaterialFlags::DEPTH_WRITE));
    }

    #[test]
    fn test_shader_index() {
        assert_eq!(Shading::Basic.shader_index(), 0);
        assert_eq!(Shading::Lambert.shader_index(), 1);
        assert_eq!(Shading::Phong.shader_index(), 2);
    }
}
