//! CPU-side mesh data and primitive generators
//!
//! Generators follow the usual conventions of web 3D libraries: boxes are
//! centered, spheres use latitude/longitude segments, cylinders stand on the
//! Y axis, and planes lie in the XY plane facing +Z. All triangles are wound
//! counter-clockwise when seen from outside.

use std::f32::consts::PI;
use bytemuck::{Pod, Zeroable};
use diorama_math::Vec3;

/// A mesh vertex
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    /// Local position
    pub position: [f32; 3],
    /// Unit surface normal
    pub normal: [f32; 3],
    /// Texture coordinates (v points down the image)
    pub uv: [f32; 2],
}

impl Vertex {
    /// Create a new vertex
    pub fn new(position: [f32; 3], normal: [f32; 3], uv: [f32; 2]) -> Self {
        Self { position, normal, uv }
    }
}

/// A contiguous index range drawn with one material slot
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MeshGroup {
    /// First index
    pub start: u32,
    /// Number of indices
    pub count: u32,
    /// Index into the owning node's material list
    pub material_index: usize,
}

/// Indexed triangle mesh
#[derive(Clone, Debug, Default)]
pub struct MeshData {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
    /// Material groups; always covers every index
    pub groups: Vec<MeshGroup>,
}

impl MeshData {
    /// Create a mesh drawn entirely with material slot 0
    pub fn new(vertices: Vec<Vertex>, indices: Vec<u32>) -> Self {
        let groups = vec![MeshGroup {
            start: 0,
            count: indices.len() as u32,
            material_index: 0,
        }];
        Self { vertices, indices, groups }
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Number of material slots the groups reference
    pub fn material_slots(&self) -> usize {
        self.groups
            .iter()
            .map(|g| g.material_index + 1)
            .max()
            .unwrap_or(0)
    }

    /// Centered box with one group per face
    ///
    /// Face order (and material slot) is +X, -X, +Y, -Y, +Z, -Z.
    pub fn cuboid(width: f32, height: f32, depth: f32) -> Self {
        let half = Vec3::new(width / 2.0, height / 2.0, depth / 2.0);

        // (normal, u axis, v axis) with u x v = normal
        let faces = [
            (Vec3::X, -Vec3::Z, Vec3::Y),
            (-Vec3::X, Vec3::Z, Vec3::Y),
            (Vec3::Y, Vec3::X, -Vec3::Z),
            (-Vec3::Y, Vec3::X, Vec3::Z),
            (Vec3::Z, Vec3::X, Vec3::Y),
            (-Vec3::Z, -Vec3::X, Vec3::Y),
        ];

        let mut vertices = Vec::with_capacity(24);
        let mut indices = Vec::with_capacity(36);
        let mut groups = Vec::with_capacity(6);

        for (face, (n, u, v)) in faces.iter().enumerate() {
            let base = vertices.len() as u32;
            let corners = [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)];
            for (su, sv) in corners {
                let p = (*n + *u * su + *v * sv).component_mul(half);
                let uv = [(su + 1.0) / 2.0, (1.0 - sv) / 2.0];
                vertices.push(Vertex::new(p.to_array(), n.to_array(), uv));
            }

            groups.push(MeshGroup {
                start: indices.len() as u32,
                count: 6,
                material_index: face,
            });
            indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
        }

        Self { vertices, indices, groups }
    }

    /// UV sphere centered at the origin
    pub fn sphere(radius: f32, width_segments: u32, height_segments: u32) -> Self {
        let width_segments = width_segments.max(3);
        let height_segments = height_segments.max(2);

        let mut vertices = Vec::with_capacity(((width_segments + 1) * (height_segments + 1)) as usize);
        let mut indices = Vec::new();

        for iy in 0..=height_segments {
            let v = iy as f32 / height_segments as f32;
            let phi = v * PI;

            for ix in 0..=width_segments {
                let u = ix as f32 / width_segments as f32;
                let theta = u * 2.0 * PI;

                let normal = Vec3::new(
                    -theta.cos() * phi.sin(),
                    phi.cos(),
                    theta.sin() * phi.sin(),
                );
                let position = normal * radius;

                vertices.push(Vertex::new(position.to_array(), normal.to_array(), [u, v]));
            }
        }

        let row = width_segments + 1;
        for iy in 0..height_segments {
            for ix in 0..width_segments {
                let a = iy * row + ix + 1;
                let b = iy * row + ix;
                let c = (iy + 1) * row + ix;
                let d = (iy + 1) * row + ix + 1;

                // Pole rows collapse to a single triangle per segment
                if iy != 0 {
                    indices.extend_from_slice(&[a, b, d]);
                }
                if iy != height_segments - 1 {
                    indices.extend_from_slice(&[b, c, d]);
                }
            }
        }

        Self::new(vertices, indices)
    }

    /// Cylinder (or truncated cone) centered at the origin along Y
    pub fn cylinder(
        radius_top: f32,
        radius_bottom: f32,
        height: f32,
        radial_segments: u32,
        height_segments: u32,
        open_ended: bool,
    ) -> Self {
        let radial_segments = radial_segments.max(3);
        let height_segments = height_segments.max(1);
        let half_height = height / 2.0;
        let slope = (radius_bottom - radius_top) / height;

        let mut vertices = Vec::new();
        let mut indices = Vec::new();

        // Torso
        let row = radial_segments + 1;
        for iy in 0..=height_segments {
            let v = iy as f32 / height_segments as f32;
            let radius = v * (radius_bottom - radius_top) + radius_top;

            for ix in 0..=radial_segments {
                let u = ix as f32 / radial_segments as f32;
                let theta = u * 2.0 * PI;
                let (sin, cos) = theta.sin_cos();

                let position = [radius * sin, -v * height + half_height, radius * cos];
                let normal = Vec3::new(sin, slope, cos).normalized();
                vertices.push(Vertex::new(position, normal.to_array(), [u, v]));
            }
        }

        for iy in 0..height_segments {
            for ix in 0..radial_segments {
                let a = iy * row + ix;
                let b = (iy + 1) * row + ix;
                let c = (iy + 1) * row + ix + 1;
                let d = iy * row + ix + 1;
                indices.extend_from_slice(&[a, b, d, b, c, d]);
            }
        }

        if !open_ended {
            if radius_top > 0.0 {
                Self::push_cap(&mut vertices, &mut indices, radius_top, half_height, radial_segments, true);
            }
            if radius_bottom > 0.0 {
                Self::push_cap(&mut vertices, &mut indices, radius_bottom, -half_height, radial_segments, false);
            }
        }

        Self::new(vertices, indices)
    }

    fn push_cap(
        vertices: &mut Vec<Vertex>,
        indices: &mut Vec<u32>,
        radius: f32,
        y: f32,
        radial_segments: u32,
        top: bool,
    ) {
        let sign = if top { 1.0 } else { -1.0 };
        let normal = [0.0, sign, 0.0];
        let center = vertices.len() as u32;
        vertices.push(Vertex::new([0.0, y, 0.0], normal, [0.5, 0.5]));

        for ix in 0..=radial_segments {
            let theta = ix as f32 / radial_segments as f32 * 2.0 * PI;
            let (sin, cos) = theta.sin_cos();
            vertices.push(Vertex::new(
                [radius * sin, y, radius * cos],
                normal,
                [cos * 0.5 + 0.5, sin * 0.5 * sign + 0.5],
            ));
        }

        for ix in 0..radial_segments {
            let a = center + 1 + ix;
            let b = a + 1;
            if top {
                indices.extend_from_slice(&[a, b, center]);
            } else {
                indices.extend_from_slice(&[b, a, center]);
            }
        }
    }

    /// Plane in the XY plane facing +Z
    pub fn plane(width: f32, height: f32) -> Self {
        let hw = width / 2.0;
        let hh = height / 2.0;
        let normal = [0.0, 0.0, 1.0];

        let vertices = vec![
            Vertex::new([-hw, -hh, 0.0], normal, [0.0, 1.0]),
            Vertex::new([hw, -hh, 0.0], normal, [1.0, 1.0]),
            Vertex::new([hw, hh, 0.0], normal, [1.0, 0.0]),
            Vertex::new([-hw, hh, 0.0], normal, [0.0, 0.0]),
        ];
        let indices = vec![0, 1, 2, 0, 2, 3];

        Self::new(vertices, indices)
    }
}
