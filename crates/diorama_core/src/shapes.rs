//! Serializable shape templates
//!
//! Each variant stores the construction parameters of one primitive. Shapes
//! are created in local space centered at the origin; the node transform
//! places them in the world.

use serde::{Serialize, Deserialize};
use crate::mesh::MeshData;

/// Serializable primitive shape
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ShapeTemplate {
    /// Axis-aligned box with one material slot per face
    Box {
        width: f32,
        height: f32,
        depth: f32,
    },
    /// UV sphere
    Sphere {
        radius: f32,
        width_segments: u32,
        height_segments: u32,
    },
    /// Cylinder or truncated cone standing on Y
    Cylinder {
        radius_top: f32,
        radius_bottom: f32,
        height: f32,
        radial_segments: u32,
        height_segments: u32,
        #[serde(default)]
        open_ended: bool,
    },
    /// Flat rectangle facing +Z
    Plane {
        width: f32,
        height: f32,
    },
}

impl ShapeTemplate {
    /// Build the mesh for this template
    pub fn create_mesh(&self) -> MeshData {
        match *self {
            ShapeTemplate::Box { width, height, depth } => MeshData::cuboid(width, height, depth),
            ShapeTemplate::Sphere { radius, width_segments, height_segments } => {
                MeshData::sphere(radius, width_segments, height_segments)
            }
            ShapeTemplate::Cylinder {
                radius_top,
                radius_bottom,
                height,
                radial_segments,
                height_segments,
                open_ended,
            } => MeshData::cylinder(
                radius_top,
                radius_bottom,
                height,
                radial_segments,
                height_segments,
                open_ended,
            ),
            ShapeTemplate::Plane { width, height } => MeshData::plane(width, height),
        }
    }

    /// Box template
    pub fn cuboid(width: f32, height: f32, depth: f32) -> Self {
        ShapeTemplate::Box { width, height, depth }
    }

    /// Cube template
    pub fn cube(size: f32) -> Self {
        Self::cuboid(size, size, size)
    }

    /// Sphere template
    pub fn sphere(radius: f32, width_segments: u32, height_segments: u32) -> Self {
        ShapeTemplate::Sphere { radius, width_segments, height_segments }
    }

    /// Closed cylinder template
    pub fn cylinder(
        radius_top: f32,
        radius_bottom: f32,
        height: f32,
        radial_segments: u32,
        height_segments: u32,
    ) -> Self {
        ShapeTemplate::Cylinder {
            radius_top,
            radius_bottom,
            height,
            radial_segments,
            height_segments,
            open_ended: false,
        }
    }

    /// Plane template
    pub fn plane(width: f32, height: f32) -> Self {
        ShapeTemplate::Plane { width, height }
    }

    /// Number of material slots the mesh exposes
    pub fn material_slots(&self) -> usize {
        match self {
            ShapeTemplate::Box { .. } => 6,
            _ => 1,
        }
    }
}
