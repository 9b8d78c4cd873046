//! Scene graph
//!
//! Nodes live in a slotmap arena and are addressed by generational [`NodeKey`]s.
//! A node is either a group (transform only) or a mesh instance. Mesh and
//! texture data are owned by the graph too, so several nodes can share them.

use slotmap::{new_key_type, SlotMap};
use diorama_math::{mat4, Mat4, Vec3};
use crate::animation::AnimationTarget;
use crate::material::Material;
use crate::mesh::MeshData;
use crate::texture::TextureData;
use crate::transform::Transform3D;

new_key_type! {
    /// Key to a node in the scene graph
    pub struct NodeKey;
    /// Key to mesh data owned by the scene graph
    pub struct MeshKey;
    /// Key to texture data owned by the scene graph
    pub struct TextureKey;
}

/// What a node contributes to the frame
#[derive(Clone, Debug)]
pub enum NodeKind {
    /// Transform-only node that positions its children
    Group,
    /// Mesh instance; `materials[g.material_index]` shades group `g`
    Mesh {
        mesh: MeshKey,
        materials: Vec<Material>,
    },
}

/// A node in the scene graph
#[derive(Clone, Debug)]
pub struct Node {
    /// Human-readable name (not required to be unique)
    pub name: String,
    /// Transform relative to the parent
    pub transform: Transform3D,
    /// Invisible nodes hide their whole subtree
    pub visible: bool,
    pub kind: NodeKind,
    parent: Option<NodeKey>,
    children: Vec<NodeKey>,
}

impl Node {
    /// Parent node, if any
    #[inline]
    pub fn parent(&self) -> Option<NodeKey> {
        self.parent
    }

    /// Child nodes in insertion order
    #[inline]
    pub fn children(&self) -> &[NodeKey] {
        &self.children
    }

    /// Materials of a mesh node (empty for groups)
    pub fn materials(&self) -> &[Material] {
        match &self.kind {
            NodeKind::Mesh { materials, .. } => materials.as_slice(),
            NodeKind::Group => &[],
        }
    }

    /// Mutable materials of a mesh node (empty for groups)
    pub fn materials_mut(&mut self) -> &mut [Material] {
        match &mut self.kind {
            NodeKind::Mesh { materials, .. } => materials.as_mut_slice(),
            NodeKind::Group => &mut [],
        }
    }
}

/// A mesh node ready to draw, with its composed world matrix
#[derive(Clone, Copy, Debug)]
pub struct DrawItem {
    pub node: NodeKey,
    pub mesh: MeshKey,
    pub world: Mat4,
}

/// Arena of nodes plus the mesh and texture data they reference
#[derive(Default)]
pub struct SceneGraph {
    nodes: SlotMap<NodeKey, Node>,
    meshes: SlotMap<MeshKey, MeshData>,
    textures: SlotMap<TextureKey, TextureData>,
    roots: Vec<NodeKey>,
}

impl SceneGraph {
    /// Create an empty graph
    pub fn new() -> Self {
        Self::default()
    }

    // --- Mesh and texture storage ---

    /// Store mesh data, returning its key
    pub fn add_mesh(&mut self, mesh: MeshData) -> MeshKey {
        self.meshes.insert(mesh)
    }

    /// Get mesh data by key
    pub fn mesh(&self, key: MeshKey) -> Option<&MeshData> {
        self.meshes.get(key)
    }

    /// Store texture data, returning its key
    pub fn add_texture(&mut self, texture: TextureData) -> TextureKey {
        self.textures.insert(texture)
    }

    /// Get texture data by key
    pub fn texture(&self, key: TextureKey) -> Option<&TextureData> {
        self.textures.get(key)
    }

    /// Replace the pixels behind an existing key
    ///
    /// The revision is bumped so cached GPU copies are refreshed. Returns
    /// false if the key is stale.
    pub fn replace_texture(&mut self, key: TextureKey, mut texture: TextureData) -> bool {
        match self.textures.get_mut(key) {
            Some(slot) => {
                texture.revision = slot.revision.wrapping_add(1);
                *slot = texture;
                true
            }
            None => false,
        }
    }

    #[inline]
    pub fn mesh_count(&self) -> usize {
        self.meshes.len()
    }

    #[inline]
    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }

    // --- Nodes ---

    /// Add a group node
    pub fn add_group(
        &mut self,
        name: impl Into<String>,
        transform: Transform3D,
        parent: Option<NodeKey>,
    ) -> NodeKey {
        self.insert_node(name.into(), transform, NodeKind::Group, parent)
    }

    /// Add a mesh node
    pub fn add_mesh_node(
        &mut self,
        name: impl Into<String>,
        transform: Transform3D,
        mesh: MeshKey,
        materials: Vec<Material>,
        parent: Option<NodeKey>,
    ) -> NodeKey {
        self.insert_node(name.into(), transform, NodeKind::Mesh { mesh, materials }, parent)
    }

    fn insert_node(
        &mut self,
        name: String,
        transform: Transform3D,
        kind: NodeKind,
        parent: Option<NodeKey>,
    ) -> NodeKey {
        // A stale parent key degrades to a root node
        let parent = parent.filter(|p| self.nodes.contains_key(*p));

        let key = self.nodes.insert(Node {
            name,
            transform,
            visible: true,
            kind,
            parent,
            children: Vec::new(),
        });

        match parent.and_then(|p| self.nodes.get_mut(p)) {
            Some(p) => p.children.push(key),
            None => self.roots.push(key),
        }
        key
    }

    /// Get a node by key
    pub fn get(&self, key: NodeKey) -> Option<&Node> {
        self.nodes.get(key)
    }

    /// Get a mutable node by key
    pub fn get_mut(&mut self, key: NodeKey) -> Option<&mut Node> {
        self.nodes.get_mut(key)
    }

    /// Check whether a key refers to a live node
    #[inline]
    pub fn contains(&self, key: NodeKey) -> bool {
        self.nodes.contains_key(key)
    }

    /// Find the first node with the given name (in insertion order)
    pub fn get_by_name(&self, name: &str) -> Option<NodeKey> {
        self.nodes
            .iter()
            .find(|(_, n)| n.name == name)
            .map(|(k, _)| k)
    }

    /// Root nodes in insertion order
    pub fn roots(&self) -> &[NodeKey] {
        &self.roots
    }

    /// Number of nodes
    #[inline]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the graph has no nodes
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterate over all nodes with their keys
    pub fn iter(&self) -> impl Iterator<Item = (NodeKey, &Node)> {
        self.nodes.iter()
    }

    /// World matrix of a node: parent transforms applied outermost
    pub fn world_matrix(&self, key: NodeKey) -> Option<Mat4> {
        let node = self.nodes.get(key)?;
        let mut m = node.transform.to_matrix();
        let mut parent = node.parent;
        while let Some(p) = parent.and_then(|p| self.nodes.get(p)) {
            m = mat4::mul(p.transform.to_matrix(), m);
            parent = p.parent;
        }
        Some(m)
    }

    /// World-space position of a node's origin
    pub fn world_position(&self, key: NodeKey) -> Option<Vec3> {
        self.world_matrix(key)
            .map(|m| Vec3::new(m[3][0], m[3][1], m[3][2]))
    }

    /// Every visible mesh node with its world matrix, parents before children
    pub fn collect_draws(&self) -> Vec<DrawItem> {
        let mut draws = Vec::new();
        let mut stack: Vec<(NodeKey, Mat4)> = self
            .roots
            .iter()
            .rev()
            .map(|&k| (k, mat4::IDENTITY))
            .collect();

        while let Some((key, parent_world)) = stack.pop() {
            let Some(node) = self.nodes.get(key) else { continue };
            if !node.visible {
                continue;
            }

            let world = mat4::mul(parent_world, node.transform.to_matrix());
            if let NodeKind::Mesh { mesh, .. } = node.kind {
                draws.push(DrawItem { node: key, mesh, world });
            }

            for &child in node.children.iter().rev() {
                stack.push((child, world));
            }
        }

        draws
    }
}

// Stale handles are ignored
impl AnimationTarget for SceneGraph {
    type Handle = NodeKey;

    fn set_rotation_xy(&mut self, handle: NodeKey, angle: f32) {
        if let Some(node) = self.nodes.get_mut(handle) {
            node.transform.rotation.x = angle;
            node.transform.rotation.y = angle;
        }
    }

    fn set_position(&mut self, handle: NodeKey, position: Vec3) {
        if let Some(node) = self.nodes.get_mut(handle) {
            node.transform.position = position;
        }
    }

    fn set_position_y(&mut self, handle: NodeKey, y: f32) {
        if let Some(node) = self.nodes.get_mut(handle) {
            node.transform.position.y = y;
        }
    }

    fn set_opacity(&mut self, handle: NodeKey, opacity: f32) {
        if let Some(node) = self.nodes.get_mut(handle) {
            for material in node.materials_mut() {
                material.opacity = opacity;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 0.0001;

    fn vec_approx_eq(a: Vec3, b: Vec3) -> bool {
        (a.x - b.x).abs() < EPSILON && (a.y - b.y).abs() < EPSILON && (a.z - b.z).abs() < EPSILON
    }

    fn graph_with_cube() -> (SceneGraph, MeshKey) {
        let mut graph = SceneGraph::new();
        let mesh = graph.add_mesh(MeshData::cuboid(1.0, 1.0, 1.0));
        (graph, mesh)
    }

    #[test]
    fn test_add_nodes() {
        let (mut graph, mesh) = graph_with_cube();
        let base = graph.add_group("base", Transform3D::identity(), None);
        let cube = graph.add_mesh_node("cube", Transform3D::identity(), mesh, vec![Material::default()], Some(base));

        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.roots(), &[base]);
        assert_eq!(graph.get(base).unwrap().children(), &[cube]);
        assert_eq!(graph.get(cube).unwrap().parent(), Some(base));
    }

    #[test]
    fn test_world_matrix_composes_parent() {
        let (mut graph, mesh) = graph_with_cube();
        let base = graph.add_group("base", Transform3D::from_position(Vec3::new(3.0, 0.0, -1.0)), None);
        let cube = graph.add_mesh_node(
            "cube",
            Transform3D::from_position(Vec3::new(0.0, 2.0, 0.0)),
            mesh,
            vec![Material::default()],
            Some(base),
        );

        let p = graph.world_position(cube).unwrap();
        assert!(vec_approx_eq(p, Vec3::new(3.0, 2.0, -1.0)), "got {:?}", p);
    }

    #[test]
    fn test_world_matrix_parent_scale() {
        let (mut graph, mesh) = graph_with_cube();
        let base = graph.add_group("base", Transform3D::identity().with_uniform_scale(2.0), None);
        let cube = graph.add_mesh_node(
            "cube",
            Transform3D::from_position(Vec3::new(1.0, 0.0, 0.0)),
            mesh,
            vec![Material::default()],
            Some(base),
        );
        let p = graph.world_position(cube).unwrap();
        assert!(vec_approx_eq(p, Vec3::new(2.0, 0.0, 0.0)), "got {:?}", p);
    }

    #[test]
    fn test_collect_draws_skips_groups_and_hidden() {
        let (mut graph, mesh) = graph_with_cube();
        let base = graph.add_group("base", Transform3D::identity(), None);
        let a = graph.add_mesh_node("a", Transform3D::identity(), mesh, vec![Material::default()], Some(base));
        let hidden = graph.add_group("hidden", Transform3D::identity(), None);
        graph.add_mesh_node("b", Transform3D::identity(), mesh, vec![Material::default()], Some(hidden));
        graph.get_mut(hidden).unwrap().visible = false;

        let draws = graph.collect_draws();
        assert_eq!(draws.len(), 1);
        assert_eq!(draws[0].node, a);
    }

    #[test]
    fn test_get_by_name() {
        let mut graph = SceneGraph::new();
        let k = graph.add_group("ground", Transform3D::identity(), None);
        assert_eq!(graph.get_by_name("ground"), Some(k));
        assert_eq!(graph.get_by_name("sky"), None);
    }

    #[test]
    fn test_replace_texture_bumps_revision() {
        let mut graph = SceneGraph::new();
        let key = graph.add_texture(TextureData::white());
        assert_eq!(graph.texture(key).unwrap().revision, 0);

        assert!(graph.replace_texture(key, TextureData::checker(0xffffff, 0x000000)));
        let tex = graph.texture(key).unwrap();
        assert_eq!(tex.revision, 1);
        assert_eq!(tex.width, 2);
    }

    #[test]
    fn test_animation_target_setters() {
        let (mut graph, mesh) = graph_with_cube();
        let node = graph.add_mesh_node("n", Transform3D::identity(), mesh, vec![Material::default(); 2], None);

        graph.set_rotation_xy(node, 0.5);
        graph.set_position(node, Vec3::new(1.0, 2.0, 3.0));
        graph.set_position_y(node, -2.0);
        graph.set_opacity(node, 0.25);

        let n = graph.get(node).unwrap();
        assert_eq!(n.transform.rotation, Vec3::new(0.5, 0.5, 0.0));
        assert_eq!(n.transform.position, Vec3::new(1.0, -2.0, 3.0));
        assert!(n.materials().iter().all(|m| m.opacity == 0.25));
    }

    #[test]
    fn test_animation_target_ignores_stale_handle() {
        let mut graph = SceneGraph::new();
        let mut other: SlotMap<NodeKey, ()> = SlotMap::with_key();
        let stale = other.insert(());
        other.remove(stale);

        graph.set_position(stale, Vec3::ONE);
        graph.set_opacity(stale, 0.5);
        assert!(graph.is_empty());
    }
}
