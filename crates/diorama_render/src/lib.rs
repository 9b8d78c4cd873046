//! Diorama Rendering Library
//!
//! This crate provides the wgpu-based forward renderer for the Diorama
//! scene graph.
//!
//! ## Key Components
//!
//! - [`context::RenderContext`] - WGPU device, queue, and surface management
//! - [`camera::Camera3D`] - Perspective camera looking at a target
//! - [`lights::Lighting`] - Ambient, hemisphere and directional lights plus fog
//! - [`pipeline::ScenePipeline`] - Opaque, double-sided and blended pipelines
//! - [`renderer::SceneRenderer`] - Uploads graph resources and records draws

pub mod camera;
pub mod context;
pub mod draw_list;
pub mod lights;
pub mod mesh;
pub mod pipeline;
pub mod renderer;
pub mod texture;

pub use camera::Camera3D;
pub use context::{ContextError, RenderContext};
pub use draw_list::{build_draw_list, DrawCommand, PipelineKind};
pub use lights::{AmbientLight, DirectionalLight, Fog, HemisphereLight, Lighting};
pub use renderer::SceneRenderer;
