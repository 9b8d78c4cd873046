//! Integration tests for the animation pipeline
//!
//! These tests drive the per-frame update against a real scene graph:
//! 1. Spin entries rotate at index-scaled speeds
//! 2. Bounce entries move their group, bob their shape and fade their shadow
//! 3. Updates are deterministic and stay within their bounds
//! 4. Entries registered after the loop started animate normally

use std::f32::consts::PI;

use diorama_core::animation::{self, spin_angle};
use diorama_core::{
    BouncePose, Material, MeshData, NodeKey, SceneGraph, SceneRegistry, TextureData, Transform3D,
    Vec3,
};

const EPSILON: f32 = 0.0001;

fn approx_eq(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

/// Base group with a shadow decal and a shape, laid out like the diorama builder does
struct Rig {
    base: NodeKey,
    shape: NodeKey,
    shadow: NodeKey,
}

fn add_rig(graph: &mut SceneGraph, position: Vec3) -> Rig {
    let cube = graph.add_mesh(MeshData::cuboid(1.0, 1.0, 1.0));
    let plane = graph.add_mesh(MeshData::plane(1.0, 1.0));
    let blob = graph.add_texture(TextureData::round_shadow(16));

    let base = graph.add_group(
        "base",
        Transform3D::from_position(Vec3::new(position.x, 0.0, position.z)),
        None,
    );
    let shadow = graph.add_mesh_node(
        "shadow",
        Transform3D::from_position(Vec3::new(0.0, -2.0, 0.0)),
        plane,
        vec![Material::decal(blob)],
        Some(base),
    );
    let shape = graph.add_mesh_node(
        "shape",
        Transform3D::from_position(Vec3::new(0.0, position.y, 0.0)),
        cube,
        vec![Material::phong(0x4d79ff); 6],
        Some(base),
    );
    Rig { base, shape, shadow }
}

fn rotation(graph: &SceneGraph, key: NodeKey) -> Vec3 {
    graph.get(key).unwrap().transform.rotation
}

fn position(graph: &SceneGraph, key: NodeKey) -> Vec3 {
    graph.get(key).unwrap().transform.position
}

fn opacity(graph: &SceneGraph, key: NodeKey) -> f32 {
    graph.get(key).unwrap().materials()[0].opacity
}

// ==================== Spin ====================

#[test]
fn test_spin_first_entry_tracks_time() {
    let mut graph = SceneGraph::new();
    let rig = add_rig(&mut graph, Vec3::ZERO);
    let mut registry = SceneRegistry::new();
    registry.register_spin(rig.shape);

    animation::update(&registry, &mut graph, 0.0);
    assert_eq!(rotation(&graph, rig.shape), Vec3::ZERO);

    animation::update(&registry, &mut graph, PI);
    let r = rotation(&graph, rig.shape);
    assert!(approx_eq(r.x, PI) && approx_eq(r.y, PI));
    assert_eq!(r.z, 0.0, "spin never touches Z");
}

#[test]
fn test_spin_second_entry_is_faster() {
    let mut graph = SceneGraph::new();
    let a = add_rig(&mut graph, Vec3::ZERO);
    let b = add_rig(&mut graph, Vec3::ZERO);
    let mut registry = SceneRegistry::new();
    registry.register_spin(a.shape);
    registry.register_spin(b.shape);

    animation::update(&registry, &mut graph, 1.0);
    assert!(approx_eq(rotation(&graph, b.shape).x, 1.1));
    assert!(approx_eq(rotation(&graph, b.shape).y, 1.1));
}

#[test]
fn test_spin_speed_strictly_increases_with_index() {
    for t in [0.5f32, 1.0, 7.25, 120.0] {
        for i in 0..20 {
            assert!(spin_angle(t, i + 1) > spin_angle(t, i), "t = {}, i = {}", t, i);
        }
    }
}

// ==================== Bounce ====================

#[test]
fn test_bounce_single_entry_at_rest() {
    let mut graph = SceneGraph::new();
    let rig = add_rig(&mut graph, Vec3::ZERO);
    let mut registry = SceneRegistry::new();
    registry.register_bounce(rig.base, rig.shape, rig.shadow, Vec3::ZERO);

    animation::update(&registry, &mut graph, 0.0);

    assert_eq!(position(&graph, rig.base), Vec3::ZERO);
    assert!(approx_eq(position(&graph, rig.shape).y, -2.0));
    assert!(approx_eq(opacity(&graph, rig.shadow), 1.0));
}

#[test]
fn test_bounce_peak_lift() {
    let mut graph = SceneGraph::new();
    let first = add_rig(&mut graph, Vec3::ZERO);
    let second = add_rig(&mut graph, Vec3::new(3.0, 1.0, 3.0));
    let mut registry = SceneRegistry::new();
    registry.register_bounce(first.base, first.shape, first.shadow, Vec3::ZERO);
    registry.register_bounce(second.base, second.shape, second.shadow, Vec3::new(3.0, 1.0, 3.0));

    // |sin(2t)| = 1 for entry 0
    let t = PI / 4.0;
    animation::update(&registry, &mut graph, t);

    assert!(approx_eq(position(&graph, first.shape).y, 5.0));
    assert!(approx_eq(opacity(&graph, first.shadow), 0.25));
}

#[test]
fn test_bounce_keeps_shadow_with_group() {
    let mut graph = SceneGraph::new();
    let rig = add_rig(&mut graph, Vec3::new(2.0, 0.0, -4.0));
    let mut registry = SceneRegistry::new();
    registry.register_bounce(rig.base, rig.shape, rig.shadow, Vec3::new(2.0, 0.0, -4.0));

    animation::update(&registry, &mut graph, 3.3);

    let base = graph.world_position(rig.base).unwrap();
    let shadow = graph.world_position(rig.shadow).unwrap();
    assert!(approx_eq(shadow.x, base.x));
    assert!(approx_eq(shadow.z, base.z));
}

#[test]
fn test_bounce_bounds_hold_over_time() {
    let anchor = Vec3::new(-4.0, 0.0, 3.0);
    let count = 3;

    for step in 0..2000 {
        let t = step as f32 * 0.05;
        for i in 0..count {
            let pose = BouncePose::compute(t, i, count, anchor);

            let dx = pose.group_position.x - anchor.x;
            let dz = pose.group_position.z - anchor.z;
            assert!((dx * dx + dz * dz).sqrt() <= 10.0 + EPSILON);

            assert!(pose.shadow_opacity >= 0.25 - EPSILON && pose.shadow_opacity <= 1.0 + EPSILON);
            assert!(pose.shape_y >= anchor.y - 2.0 - EPSILON && pose.shape_y <= anchor.y + 5.0 + EPSILON);
        }
    }
}

// ==================== Registry behavior ====================

#[test]
fn test_empty_registry_leaves_graph_untouched() {
    let mut graph = SceneGraph::new();
    let rig = add_rig(&mut graph, Vec3::new(1.0, 2.0, 3.0));
    let before = (position(&graph, rig.base), position(&graph, rig.shape), opacity(&graph, rig.shadow));

    let registry: SceneRegistry = SceneRegistry::new();
    animation::update(&registry, &mut graph, 42.0);

    let after = (position(&graph, rig.base), position(&graph, rig.shape), opacity(&graph, rig.shadow));
    assert_eq!(before, after);
}

#[test]
fn test_update_is_deterministic() {
    let build = || {
        let mut graph = SceneGraph::new();
        let a = add_rig(&mut graph, Vec3::new(-4.0, 0.0, 3.0));
        let b = add_rig(&mut graph, Vec3::new(0.0, 0.0, -2.0));
        let mut registry = SceneRegistry::new();
        registry.register_spin(a.shape);
        registry.register_bounce(a.base, a.shape, a.shadow, Vec3::new(-4.0, 0.0, 3.0));
        registry.register_bounce(b.base, b.shape, b.shadow, Vec3::new(0.0, 0.0, -2.0));
        (graph, registry, a, b)
    };

    let (mut g1, r1, a1, b1) = build();
    let (mut g2, r2, a2, b2) = build();

    // Different frame histories, same final time
    for t in [0.1, 5.0, 2.5] {
        animation::update(&r1, &mut g1, t);
    }
    animation::update(&r2, &mut g2, 2.5);

    assert_eq!(position(&g1, a1.base), position(&g2, a2.base));
    assert_eq!(position(&g1, b1.shape), position(&g2, b2.shape));
    assert_eq!(rotation(&g1, a1.shape), rotation(&g2, a2.shape));
    assert_eq!(opacity(&g1, b1.shadow), opacity(&g2, b2.shadow));
}

#[test]
fn test_late_registration_animates() {
    let mut graph = SceneGraph::new();
    let early = add_rig(&mut graph, Vec3::ZERO);
    let mut registry = SceneRegistry::new();
    registry.register_spin(early.shape);

    animation::update(&registry, &mut graph, 1.0);

    // A texture set finished loading mid-run
    let late = add_rig(&mut graph, Vec3::ZERO);
    registry.register_spin(late.shape);
    animation::update(&registry, &mut graph, 2.0);

    assert!(approx_eq(rotation(&graph, early.shape).x, 2.0));
    assert!(approx_eq(rotation(&graph, late.shape).x, 2.0 * 1.1));
}

#[test]
fn test_bounce_phase_shifts_when_entries_added() {
    let anchor = Vec3::ZERO;
    let alone = BouncePose::compute(4.0, 0, 1, anchor);
    let first_of_two = BouncePose::compute(4.0, 0, 2, anchor);
    // Entry 0 has u = 0 regardless of the count
    assert_eq!(alone.group_position, first_of_two.group_position);

    let second_of_two = BouncePose::compute(4.0, 1, 2, anchor);
    let second_of_three = BouncePose::compute(4.0, 1, 3, anchor);
    assert_ne!(second_of_two.group_position, second_of_three.group_position);
}
