//! Ordering of draw calls for one frame
//!
//! Every visible mesh node contributes one command per mesh group. Opaque
//! commands come first in graph order; transparent ones follow sorted from
//! the farthest to the nearest object so blending composes correctly.

use diorama_core::{Material, MaterialFlags, MeshGroup, MeshKey, NodeKey, SceneGraph};
use diorama_math::{Mat4, Vec3};

/// Which pipeline state a material needs
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PipelineKind {
    /// Depth write, back faces culled
    Opaque,
    /// Depth write, both faces drawn
    OpaqueDoubleSided,
    /// Alpha blended, both faces drawn, no depth write
    Transparent,
}

impl PipelineKind {
    pub fn for_material(material: &Material) -> Self {
        if material.is_transparent() {
            PipelineKind::Transparent
        } else if material.flags.contains(MaterialFlags::DOUBLE_SIDED) {
            PipelineKind::OpaqueDoubleSided
        } else {
            PipelineKind::Opaque
        }
    }

    #[inline]
    pub fn is_transparent(self) -> bool {
        self == PipelineKind::Transparent
    }
}

/// One indexed draw of a mesh group
#[derive(Clone, Copy, Debug)]
pub struct DrawCommand {
    pub node: NodeKey,
    pub mesh: MeshKey,
    pub group: MeshGroup,
    pub material: Material,
    pub world: Mat4,
    pub kind: PipelineKind,
    /// Squared distance from the camera to the node's origin
    pub depth: f32,
}

/// Collect and order the draws of every visible mesh node
pub fn build_draw_list(graph: &SceneGraph, camera_position: Vec3) -> Vec<DrawCommand> {
    let mut opaque = Vec::new();
    let mut transparent = Vec::new();

    for item in graph.collect_draws() {
        let (Some(node), Some(mesh)) = (graph.get(item.node), graph.mesh(item.mesh)) else {
            continue;
        };
        let origin = Vec3::new(item.world[3][0], item.world[3][1], item.world[3][2]);
        let depth = (origin - camera_position).length_squared();
        let materials = node.materials();

        for group in &mesh.groups {
            if group.count == 0 {
                continue;
            }
            let material = materials
                .get(group.material_index)
                .or_else(|| materials.last())
                .copied()
                .unwrap_or_default();
            let kind = PipelineKind::for_material(&material);

            let command = DrawCommand {
                node: item.node,
                mesh: item.mesh,
                group: *group,
                material,
                world: item.world,
                kind,
                depth,
            };
            if kind.is_transparent() {
                transparent.push(command);
            } else {
                opaque.push(command);
            }
        }
    }

    transparent.sort_by(|a, b| b.depth.total_cmp(&a.depth));
    opaque.extend(transparent);
    opaque
}
