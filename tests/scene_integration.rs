//! Integration tests for the shipped scene file and diorama assembly

use std::time::{Duration, Instant};

use diorama::scene::Diorama;
use diorama_core::{AssetLoader, Scene};

const SCENE_PATH: &str = "assets/scenes/diorama.ron";

#[test]
fn test_scene_file_matches_builtin_layout() {
    let scene = Scene::load(SCENE_PATH).unwrap();
    assert_eq!(scene, Scene::diorama());
}

#[test]
fn test_scene_file_builds_with_missing_assets() {
    let scene = Scene::load(SCENE_PATH).unwrap();
    let mut loader = AssetLoader::new("/nonexistent/assets");
    let mut diorama = Diorama::from_scene(&scene, &mut loader);

    let start = Instant::now();
    while diorama.is_loading() && start.elapsed() < Duration::from_secs(5) {
        if diorama.attach_loaded(&mut loader) == 0 {
            std::thread::sleep(Duration::from_millis(5));
        }
    }
    assert!(!diorama.is_loading());

    assert_eq!(diorama.registry.spin_count(), 6);
    assert_eq!(diorama.registry.bounce_count(), 3);

    // Every shape still draws; only the model is skipped
    diorama.animate(1.0);
    let draws = diorama.graph.collect_draws();
    // ground + 23 shapes + 23 shadows
    assert_eq!(draws.len(), 47);
}
