//! Scene construction
//!
//! Builds the diorama graph and animation registry from a [`Scene`](diorama_core::Scene)
//! and attaches background-loaded assets as they arrive.

mod scene_builder;

pub use scene_builder::{Diorama, SceneBuilder};
