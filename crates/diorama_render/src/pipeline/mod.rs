//! Rendering pipeline components
//!
//! This module contains the GPU data layouts and the forward pipeline
//! that draws the scene graph.

pub mod types;
pub mod scene_pipeline;

// Re-export types
pub use types::{draw_slot_size, vertex_buffer_layout, DrawUniforms, FrameUniforms};

// Re-export pipelines
pub use scene_pipeline::{ScenePipeline, DEPTH_FORMAT};
