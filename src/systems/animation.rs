//! Animation system
//!
//! Owns the animation clock and drives the per-frame registry update:
//! - Elapsed time calculation (frozen while paused)
//! - Spin and bounce updates on the scene graph

use std::time::Instant;
use diorama_core::{animation, SceneGraph, SceneRegistry};

/// Elapsed animation time that can be paused
///
/// Time only accumulates while running, so resuming continues from where
/// the animation stopped instead of jumping ahead.
#[derive(Debug, Clone)]
pub struct AnimationClock {
    elapsed: f64,
    paused: bool,
}

impl AnimationClock {
    pub fn new(paused: bool) -> Self {
        Self { elapsed: 0.0, paused }
    }

    /// Add `dt` seconds unless paused
    pub fn advance(&mut self, dt: f64) {
        if !self.paused && dt > 0.0 {
            self.elapsed += dt;
        }
    }

    /// Seconds of running time so far
    pub fn elapsed(&self) -> f32 {
        self.elapsed as f32
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Flip between paused and running, returning the new paused state
    pub fn toggle_pause(&mut self) -> bool {
        self.paused = !self.paused;
        self.paused
    }
}

impl Default for AnimationClock {
    fn default() -> Self {
        Self::new(false)
    }
}

/// Advances the clock from wall time and animates the registry
pub struct AnimationSystem {
    clock: AnimationClock,
    last_frame: Instant,
}

impl AnimationSystem {
    /// Create a new animation system
    pub fn new(start_paused: bool) -> Self {
        Self {
            clock: AnimationClock::new(start_paused),
            last_frame: Instant::now(),
        }
    }

    /// Run one animation frame, returning the elapsed time used
    pub fn update(&mut self, registry: &SceneRegistry, graph: &mut SceneGraph) -> f32 {
        let now = Instant::now();
        self.clock.advance((now - self.last_frame).as_secs_f64());
        self.last_frame = now;

        let t = self.clock.elapsed();
        animation::update(registry, graph, t);
        t
    }

    /// Flip the pause state, returning whether the clock is now paused
    pub fn toggle_pause(&mut self) -> bool {
        let paused = self.clock.toggle_pause();
        log::info!("Animation {}", if paused { "paused" } else { "resumed" });
        paused
    }

    pub fn is_paused(&self) -> bool {
        self.clock.is_paused()
    }

    pub fn elapsed(&self) -> f32 {
        self.clock.elapsed()
    }
}

impl Default for AnimationSystem {
    fn default() -> Self {
        Self::new(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use diorama_core::{Material, MeshData, Transform3D};

    #[test]
    fn test_clock_accumulates() {
        let mut clock = AnimationClock::default();
        clock.advance(0.5);
        clock.advance(0.25);
        assert!((clock.elapsed() - 0.75).abs() < 1e-6);
    }

    #[test]
    fn test_paused_clock_holds() {
        let mut clock = AnimationClock::default();
        clock.advance(1.0);
        assert!(clock.toggle_pause());
        clock.advance(5.0);
        assert_eq!(clock.elapsed(), 1.0);

        assert!(!clock.toggle_pause());
        clock.advance(0.5);
        assert_eq!(clock.elapsed(), 1.5);
    }

    #[test]
    fn test_negative_dt_ignored() {
        let mut clock = AnimationClock::default();
        clock.advance(-1.0);
        assert_eq!(clock.elapsed(), 0.0);
    }

    #[test]
    fn test_start_paused() {
        let mut system = AnimationSystem::new(true);
        assert!(system.is_paused());

        let mut graph = SceneGraph::new();
        let cube = graph.add_mesh(MeshData::cuboid(1.0, 1.0, 1.0));
        let node = graph.add_mesh_node("cube", Transform3D::identity(), cube, vec![Material::phong(0x44aa88); 6], None);
        let mut registry = SceneRegistry::new();
        registry.register_spin(node);

        std::thread::sleep(std::time::Duration::from_millis(10));
        let t = system.update(&registry, &mut graph);
        assert_eq!(t, 0.0);
        assert_eq!(graph.get(node).unwrap().transform.rotation.x, 0.0);
    }

    #[test]
    fn test_update_spins_registered_nodes() {
        let mut system = AnimationSystem::default();
        let mut graph = SceneGraph::new();
        let cube = graph.add_mesh(MeshData::cuboid(1.0, 1.0, 1.0));
        let node = graph.add_mesh_node("cube", Transform3D::identity(), cube, vec![Material::phong(0x44aa88); 6], None);
        let mut registry = SceneRegistry::new();
        registry.register_spin(node);

        std::thread::sleep(std::time::Duration::from_millis(10));
        let t = system.update(&registry, &mut graph);
        assert!(t > 0.0);
        assert_eq!(graph.get(node).unwrap().transform.rotation.x, t);
    }
}
