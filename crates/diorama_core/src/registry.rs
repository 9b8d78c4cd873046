//! Registry of animated scene entries
//!
//! The registry remembers which nodes animate and how. It is append-only and
//! insertion order matters: a spin entry's index sets its speed, a bounce
//! entry's index sets its phase. Entries may be appended at any time,
//! including after the frame loop has started.

use diorama_math::Vec3;
use crate::graph::NodeKey;

/// A node that rotates about X and Y
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SpinEntry<H = NodeKey> {
    pub handle: H,
}

/// A shape that wanders around its anchor, bobbing, with a fading shadow
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BounceEntry<H = NodeKey> {
    /// Moves the shape and its shadow together
    pub group: H,
    /// Receives the vertical offset
    pub shape: H,
    /// Receives the opacity
    pub shadow: H,
    /// `(group.x, shape.y, group.z)` at registration
    pub anchor: Vec3,
}

/// Ordered spin and bounce entries
#[derive(Clone, Debug)]
pub struct SceneRegistry<H = NodeKey> {
    spin: Vec<SpinEntry<H>>,
    bounce: Vec<BounceEntry<H>>,
}

impl<H> Default for SceneRegistry<H> {
    fn default() -> Self {
        Self {
            spin: Vec::new(),
            bounce: Vec::new(),
        }
    }
}

impl<H> SceneRegistry<H> {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a spinning node
    pub fn register_spin(&mut self, handle: H) {
        self.spin.push(SpinEntry { handle });
    }

    /// Append a bouncing shape
    pub fn register_bounce(&mut self, group: H, shape: H, shadow: H, anchor: Vec3) {
        self.bounce.push(BounceEntry {
            group,
            shape,
            shadow,
            anchor,
        });
    }

    /// Spin entries in registration order
    #[inline]
    pub fn spin_entries(&self) -> &[SpinEntry<H>] {
        &self.spin
    }

    /// Bounce entries in registration order
    #[inline]
    pub fn bounce_entries(&self) -> &[BounceEntry<H>] {
        &self.bounce
    }

    #[inline]
    pub fn spin_count(&self) -> usize {
        self.spin.len()
    }

    #[inline]
    pub fn bounce_count(&self) -> usize {
        self.bounce.len()
    }

    /// Check if nothing is registered
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.spin.is_empty() && self.bounce.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_registry_is_empty() {
        let registry: SceneRegistry<u32> = SceneRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.spin_count(), 0);
        assert_eq!(registry.bounce_count(), 0);
    }

    #[test]
    fn test_spin_keeps_insertion_order() {
        let mut registry = SceneRegistry::new();
        registry.register_spin(7u32);
        registry.register_spin(3);
        registry.register_spin(7);

        let handles: Vec<u32> = registry.spin_entries().iter().map(|e| e.handle).collect();
        // Duplicates are kept
        assert_eq!(handles, vec![7, 3, 7]);
    }

    #[test]
    fn test_bounce_stores_anchor() {
        let mut registry = SceneRegistry::new();
        registry.register_bounce(1u32, 2, 3, Vec3::new(2.0, 0.0, -4.0));

        assert_eq!(registry.bounce_count(), 1);
        let entry = registry.bounce_entries()[0];
        assert_eq!((entry.group, entry.shape, entry.shadow), (1, 2, 3));
        assert_eq!(entry.anchor, Vec3::new(2.0, 0.0, -4.0));
        assert!(!registry.is_empty());
    }

    #[test]
    fn test_lists_are_independent() {
        let mut registry = SceneRegistry::new();
        registry.register_spin(1u32);
        registry.register_bounce(2, 3, 4, Vec3::ZERO);
        registry.register_spin(5);

        assert_eq!(registry.spin_count(), 2);
        assert_eq!(registry.bounce_count(), 1);
    }
}
