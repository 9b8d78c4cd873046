//! Core types for the Diorama scene
//!
//! This crate provides everything needed to describe and animate a scene
//! without touching the GPU:
//!
//! - [`Transform3D`] - Position, Euler rotation, and scale
//! - [`Material`] - Color, opacity, texture and shading model of a mesh
//! - [`MeshData`] - CPU-side geometry with primitive generators
//! - [`SceneGraph`] - Arena of group and mesh nodes keyed by [`NodeKey`]
//! - [`SceneRegistry`] - Ordered spin and bounce entries
//! - [`animation`] - The per-frame update driven by elapsed time
//! - [`Scene`] - Loadable/saveable scene description (RON)
//! - [`AssetLoader`] - Background texture and model loading

pub mod animation;
mod asset_error;
mod asset_loader;
pub mod color;
mod graph;
mod material;
mod mesh;
mod model;
mod registry;
mod scene;
mod shapes;
mod texture;
mod transform;

pub use animation::{AnimationTarget, BouncePose};
pub use asset_error::AssetError;
pub use asset_loader::{AssetLoader, AssetRequest, AssetTicket, LoadResult, LoadedAsset};
pub use graph::{DrawItem, MeshKey, Node, NodeKey, NodeKind, SceneGraph, TextureKey};
pub use material::{Material, MaterialFlags, Shading};
pub use mesh::{MeshData, MeshGroup, Vertex};
pub use model::{ModelData, ModelMaterial, ModelMesh};
pub use registry::{BounceEntry, SceneRegistry, SpinEntry};
pub use scene::{Animation, EntityTemplate, GroundTemplate, ModelTemplate, Scene, SceneLoadError, SceneSaveError, Surface};
pub use shapes::ShapeTemplate;
pub use texture::{TextureData, TextureFilter, TextureWrap};
pub use transform::Transform3D;

// Re-export commonly used types from diorama_math for convenience
pub use diorama_math::{lerp, Mat4, Vec3};
