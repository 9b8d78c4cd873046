//! 3D Mathematics Library
//!
//! This crate provides the vector and matrix types used by the Diorama scene.
//!
//! ## Core Types
//!
//! - [`Vec3`] - 3D vector with x, y, z components
//! - [`Mat4`] - 4x4 column-major matrix for affine transforms and projection
//!
//! ## Scalar helpers
//!
//! - [`lerp`] - linear interpolation between two scalars

mod vec3;
pub mod mat4;

pub use vec3::Vec3;
pub use mat4::Mat4;

/// Linear interpolation: `a + (b - a) * t`
///
/// `t` is not clamped, so values outside `[0, 1]` extrapolate.
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}
