//! Per-frame animation update
//!
//! Every animated property is a pure function of elapsed time and the entry's
//! position in the registry. Nothing is integrated between frames, so the
//! same `t` always produces the same pose.
//!
//! # Spin
//!
//! Entry `i` rotates about X and Y by `t * (1 + 0.1 * i)` radians.
//!
//! # Bounce
//!
//! Entry `i` of `n` travels on a circle around its anchor whose radius
//! oscillates between -10 and 10, bobs vertically between `anchor.y - 2` and
//! `anchor.y + 5`, and its shadow fades from 1 to 0.25 as it rises.

use std::f32::consts::TAU;
use diorama_math::{lerp, Vec3};
use crate::registry::SceneRegistry;

/// Base spin speed in radians per second
pub const SPIN_BASE_SPEED: f32 = 1.0;
/// Extra spin speed per registry index
pub const SPIN_SPEED_STEP: f32 = 0.1;
/// Angular speed of the bounce path in radians per second
pub const PATH_SPEED: f32 = 0.2;
/// Peak distance of the bounce path from the anchor
pub const PATH_RADIUS: f32 = 10.0;
/// Angular direction of the bounce path phase offsets
///
/// Every bounce entry uses the same direction.
pub const PATH_DIRECTION: f32 = -1.0;
/// Vertical bob frequency multiplier
pub const BOB_FREQUENCY: f32 = 2.0;
/// Shape y offset at the bottom of a bob
pub const BOB_LOW: f32 = -2.0;
/// Shape y offset at the top of a bob
pub const BOB_HIGH: f32 = 5.0;
/// Shadow opacity when the shape is lowest
pub const SHADOW_OPACITY_LOW: f32 = 1.0;
/// Shadow opacity when the shape is highest
pub const SHADOW_OPACITY_HIGH: f32 = 0.25;

/// Something whose nodes the animation update can move
///
/// Implementations ignore handles they do not know.
pub trait AnimationTarget {
    type Handle: Copy;

    /// Set rotation about X and Y to the same angle
    fn set_rotation_xy(&mut self, handle: Self::Handle, angle: f32);
    /// Set the local position
    fn set_position(&mut self, handle: Self::Handle, position: Vec3);
    /// Set only the local y coordinate
    fn set_position_y(&mut self, handle: Self::Handle, y: f32);
    /// Set the opacity of every material on the node
    fn set_opacity(&mut self, handle: Self::Handle, opacity: f32);
}

/// Spin angle of entry `index` at time `t`
#[inline]
pub fn spin_angle(t: f32, index: usize) -> f32 {
    t * (SPIN_BASE_SPEED + index as f32 * SPIN_SPEED_STEP)
}

/// Pose of one bounce entry at one instant
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BouncePose {
    /// Local position of the group node
    pub group_position: Vec3,
    /// Local y of the shape node
    pub shape_y: f32,
    /// Opacity of the shadow decal
    pub shadow_opacity: f32,
    /// Normalized height in `[0, 1]`
    pub lift: f32,
}

impl BouncePose {
    /// Compute the pose of entry `index` out of `count` entries
    ///
    /// `count` must be at least 1.
    pub fn compute(t: f32, index: usize, count: usize, anchor: Vec3) -> Self {
        let i = index as f32;
        let u = i / count as f32;
        let speed = t * PATH_SPEED;
        let angle = speed + u * TAU * PATH_DIRECTION;
        let radius = (speed - i).sin() * PATH_RADIUS;

        let group_position = Vec3::new(
            angle.cos() * radius + anchor.x,
            anchor.y,
            angle.sin() * radius + anchor.z,
        );

        let lift = (t * BOB_FREQUENCY + i).sin().abs();

        Self {
            group_position,
            shape_y: anchor.y + lerp(BOB_LOW, BOB_HIGH, lift),
            shadow_opacity: lerp(SHADOW_OPACITY_LOW, SHADOW_OPACITY_HIGH, lift),
            lift,
        }
    }
}

/// Apply the pose for time `t` to every registered entry
pub fn update<T: AnimationTarget>(registry: &SceneRegistry<T::Handle>, target: &mut T, t: f32) {
    for (i, entry) in registry.spin_entries().iter().enumerate() {
        target.set_rotation_xy(entry.handle, spin_angle(t, i));
    }

    let count = registry.bounce_count();
    for (i, entry) in registry.bounce_entries().iter().enumerate() {
        let pose = BouncePose::compute(t, i, count, entry.anchor);
        target.set_position(entry.group, pose.group_position);
        target.set_position_y(entry.shape, pose.shape_y);
        target.set_opacity(entry.shadow, pose.shadow_opacity);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::f32::consts::PI;

    const EPSILON: f32 = 0.0001;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    /// Records the last value written per handle
    #[derive(Default)]
    struct Recorder {
        rotation: HashMap<u32, f32>,
        position: HashMap<u32, Vec3>,
        y: HashMap<u32, f32>,
        opacity: HashMap<u32, f32>,
        writes: usize,
    }

    impl AnimationTarget for Recorder {
        type Handle = u32;

        fn set_rotation_xy(&mut self, handle: u32, angle: f32) {
            self.rotation.insert(handle, angle);
            self.writes += 1;
        }

        fn set_position(&mut self, handle: u32, position: Vec3) {
            self.position.insert(handle, position);
            self.writes += 1;
        }

        fn set_position_y(&mut self, handle: u32, y: f32) {
            self.y.insert(handle, y);
            self.writes += 1;
        }

        fn set_opacity(&mut self, handle: u32, opacity: f32) {
            self.opacity.insert(handle, opacity);
            self.writes += 1;
        }
    }

    #[test]
    fn test_spin_angle() {
        assert_eq!(spin_angle(0.0, 0), 0.0);
        assert!(approx_eq(spin_angle(PI, 0), PI));
        assert!(approx_eq(spin_angle(1.0, 1), 1.1));
        assert!(approx_eq(spin_angle(2.0, 5), 3.0));
    }

    #[test]
    fn test_bounce_at_rest() {
        let pose = BouncePose::compute(0.0, 0, 1, Vec3::ZERO);
        assert_eq!(pose.group_position, Vec3::ZERO);
        assert!(approx_eq(pose.shape_y, -2.0));
        assert!(approx_eq(pose.shadow_opacity, 1.0));
        assert_eq!(pose.lift, 0.0);
    }

    #[test]
    fn test_bounce_keeps_anchor_height() {
        let anchor = Vec3::new(2.0, 0.75, -4.0);
        for step in 0..50 {
            let pose = BouncePose::compute(step as f32 * 0.37, 1, 3, anchor);
            assert_eq!(pose.group_position.y, anchor.y);
        }
    }

    #[test]
    fn test_bounce_phase_uses_negative_direction() {
        // i = 1 of 4 at t = 1: angle = 0.2 - pi/2
        let pose = BouncePose::compute(1.0, 1, 4, Vec3::ZERO);
        let radius = (0.2f32 - 1.0).sin() * PATH_RADIUS;
        let angle = 0.2 - PI / 2.0;
        assert!(approx_eq(pose.group_position.x, angle.cos() * radius));
        assert!(approx_eq(pose.group_position.z, angle.sin() * radius));
    }

    #[test]
    fn test_update_empty_registry_writes_nothing() {
        let registry: SceneRegistry<u32> = SceneRegistry::new();
        let mut target = Recorder::default();
        update(&registry, &mut target, 12.5);
        assert_eq!(target.writes, 0);
    }

    #[test]
    fn test_update_writes_each_entry() {
        let mut registry = SceneRegistry::new();
        registry.register_spin(1u32);
        registry.register_spin(2);
        registry.register_bounce(10, 11, 12, Vec3::new(2.0, 0.0, -4.0));

        let mut target = Recorder::default();
        update(&registry, &mut target, 1.0);

        assert!(approx_eq(target.rotation[&1], 1.0));
        assert!(approx_eq(target.rotation[&2], 1.1));
        assert!(target.position.contains_key(&10));
        assert!(target.y.contains_key(&11));
        assert!(target.opacity.contains_key(&12));
        assert_eq!(target.writes, 2 + 3);
    }

    #[test]
    fn test_update_spin_only_leaves_bounce_untouched() {
        let mut registry = SceneRegistry::new();
        registry.register_spin(1u32);

        let mut target = Recorder::default();
        update(&registry, &mut target, 3.0);
        assert!(target.position.is_empty());
        assert!(target.opacity.is_empty());
    }
}
