//! GPU-compatible data types for the scene pipeline
//!
//! These types are designed to match the shader layouts exactly.
//! All types derive Pod and Zeroable for safe GPU buffer operations.

use bytemuck::{Pod, Zeroable};
use diorama_core::{Material, Vertex};
use diorama_math::{mat4, Mat4};

use crate::camera::Camera3D;
use crate::lights::{radiance, Lighting};
use diorama_core::color::hex_to_linear;

/// Per-frame uniforms
/// Layout: 176 bytes total (must match scene.wgsl FrameUniforms)
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct FrameUniforms {
    /// Projection * view (64 bytes)
    pub view_proj: [[f32; 4]; 4],
    /// Camera world position, w unused
    pub camera_position: [f32; 4],
    /// Ambient radiance, w unused
    pub ambient: [f32; 4],
    /// Hemisphere sky radiance, w unused
    pub sky: [f32; 4],
    /// Hemisphere ground radiance, w unused
    pub ground: [f32; 4],
    /// Directional radiance, w unused
    pub light_color: [f32; 4],
    /// Unit vector toward the directional light, w unused
    pub light_direction: [f32; 4],
    /// Linear fog color in xyz, density in w
    pub fog: [f32; 4],
}

impl Default for FrameUniforms {
    fn default() -> Self {
        Self::new(&Camera3D::default(), &Lighting::default())
    }
}

impl FrameUniforms {
    pub fn new(camera: &Camera3D, lighting: &Lighting) -> Self {
        let vec4 = |v: [f32; 3], w: f32| [v[0], v[1], v[2], w];

        let ambient = radiance(lighting.ambient.color, lighting.ambient.intensity);
        let hemi = &lighting.hemisphere;
        let sun = &lighting.directional;

        Self {
            view_proj: camera.view_projection(),
            camera_position: vec4(camera.position.to_array(), 1.0),
            ambient: vec4(ambient, 0.0),
            sky: vec4(radiance(hemi.sky_color, hemi.intensity), 0.0),
            ground: vec4(radiance(hemi.ground_color, hemi.intensity), 0.0),
            light_color: vec4(radiance(sun.color, sun.intensity), 0.0),
            light_direction: vec4(sun.direction().to_array(), 0.0),
            fog: vec4(hex_to_linear(lighting.fog.color), lighting.fog.density),
        }
    }
}

/// Per-draw uniforms, one slot per mesh group in the dynamic buffer
/// Layout: 160 bytes total (must match scene.wgsl DrawUniforms)
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct DrawUniforms {
    /// Object to world (64 bytes)
    pub model: [[f32; 4]; 4],
    /// Inverse transpose of the model's upper 3x3 (64 bytes)
    pub normal_matrix: [[f32; 4]; 4],
    /// Linear RGBA color
    pub color: [f32; 4],
    /// opacity, shading index, uv repeat x, uv repeat y
    pub params: [f32; 4],
}

impl Default for DrawUniforms {
    fn default() -> Self {
        Self::new(&mat4::IDENTITY, &Material::default())
    }
}

impl DrawUniforms {
    pub fn new(world: &Mat4, material: &Material) -> Self {
        let opacity = if material.is_transparent() { material.opacity } else { 1.0 };
        Self {
            model: *world,
            normal_matrix: mat4::normal_matrix(world),
            color: material.color,
            params: [
                opacity,
                material.shading.shader_index() as f32,
                material.uv_repeat[0],
                material.uv_repeat[1],
            ],
        }
    }
}

/// Size of one dynamic-offset slot, rounded up to the device's alignment
pub fn draw_slot_size(min_alignment: u32) -> u64 {
    let size = std::mem::size_of::<DrawUniforms>() as u64;
    let align = (min_alignment as u64).max(1);
    size.div_ceil(align) * align
}

/// Vertex buffer layout for [`Vertex`]
pub fn vertex_buffer_layout() -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &[
            // position: vec3<f32>
            wgpu::VertexAttribute {
                format: wgpu::VertexFormat::Float32x3,
                offset: 0,
                shader_location: 0,
            },
            // normal: vec3<f32>
            wgpu::VertexAttribute {
                format: wgpu::VertexFormat::Float32x3,
                offset: 12,
                shader_location: 1,
            },
            // uv: vec2<f32>
            wgpu::VertexAttribute {
                format: wgpu::VertexFormat::Float32x2,
                offset: 24,
                shader_location: 2,
            },
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use diorama_core::{MaterialFlags, Shading};
    use std::mem::size_of;

    #[test]
    fn test_frame_uniforms_size() {
        // 16 floats view_proj + 7 vec4s = 44 floats = 176 bytes
        assert_eq!(size_of::<FrameUniforms>(), 176);
    }

    #[test]
    fn test_draw_uniforms_size() {
        // 2 matrices + color + params = 40 floats = 160 bytes
        assert_eq!(size_of::<DrawUniforms>(), 160);
    }

    #[test]
    fn test_alignment() {
        assert_eq!(std::mem::align_of::<FrameUniforms>(), 4);
        assert_eq!(std::mem::align_of::<DrawUniforms>(), 4);
    }

    #[test]
    fn test_vertex_buffer_layout_stride() {
        let layout = vertex_buffer_layout();
        assert_eq!(layout.array_stride, size_of::<Vertex>() as u64);
        assert_eq!(layout.array_stride, 32);
    }

    #[test]
    fn test_draw_slot_size() {
        assert_eq!(draw_slot_size(256), 256);
        assert_eq!(draw_slot_size(64), 192);
        assert_eq!(draw_slot_size(0), 160);
    }

    #[test]
    fn test_opaque_draw_ignores_opacity() {
        let material = Material {
            opacity: 0.3,
            ..Material::default()
        };
        assert_eq!(DrawUniforms::new(&mat4::IDENTITY, &material).params[0], 1.0);

        let fading = Material {
            opacity: 0.3,
            flags: MaterialFlags::TRANSPARENT,
            ..Material::default()
        };
        assert_eq!(DrawUniforms::new(&mat4::IDENTITY, &fading).params[0], 0.3);
    }

    #[test]
    fn test_shading_index_packed() {
        let material = Material {
            shading: Shading::Lambert,
            uv_repeat: [5.0, 5.0],
            ..Material::default()
        };
        let u = DrawUniforms::new(&mat4::IDENTITY, &material);
        assert_eq!(u.params, [1.0, 1.0, 5.0, 5.0]);
    }

    #[test]
    fn test_frame_uniforms_fog_density() {
        let u = FrameUniforms::default();
        assert!((u.fog[3] - 0.03).abs() < 1e-6);
        assert_eq!(u.camera_position[..3], [10.0, 10.0, 15.0]);
    }
}
