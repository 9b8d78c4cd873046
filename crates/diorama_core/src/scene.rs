//! Scene serialization
//!
//! A [`Scene`] lists what goes into the diorama: the ground, the primitive
//! shapes with their surfaces and animation modes, and any OBJ models. Scenes
//! are stored as RON files; [`Scene::diorama`] is the built-in layout used
//! when no file is available.

use serde::{Serialize, Deserialize};
use std::path::Path;
use std::fs;
use std::io;
use std::f32::consts::FRAC_PI_2;

use diorama_math::Vec3;
use crate::material::Shading;
use crate::shapes::ShapeTemplate;
use crate::transform::Transform3D;

/// Height of a shadow decal above the base of a static shape
pub const SHADOW_HEIGHT: f32 = 0.001;
/// Height of a shadow decal for bouncing shapes and cylinders
pub const LOW_SHADOW_HEIGHT: f32 = -2.0;
/// Edge length of a shadow decal
pub const SHADOW_SIZE: f32 = 4.0;

/// How a shape moves
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Animation {
    /// Static, with a shadow
    #[default]
    Still,
    /// Rotates about X and Y
    Spin,
    /// Wanders around its anchor and bobs
    Bounce,
    /// Spin and bounce at once
    All,
    /// Static, without a visible shadow
    Shadowless,
}

impl Animation {
    /// Whether the shape is registered for spinning
    #[inline]
    pub fn spins(self) -> bool {
        matches!(self, Animation::Spin | Animation::All)
    }

    /// Whether the shape is registered for bouncing
    #[inline]
    pub fn bounces(self) -> bool {
        matches!(self, Animation::Bounce | Animation::All)
    }

    /// Local y of the shadow decal under the shape
    pub fn shadow_height(self) -> f32 {
        if self.bounces() {
            LOW_SHADOW_HEIGHT
        } else {
            SHADOW_HEIGHT
        }
    }

    /// Uniform scale of the shadow decal
    pub fn shadow_scale(self) -> f32 {
        match self {
            Animation::Shadowless => 0.0,
            _ => SHADOW_SIZE,
        }
    }
}

/// What a shape's surface looks like
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Surface {
    /// Solid `0xRRGGBB` sRGB color
    Color(u32),
    /// One image on every face
    Texture(String),
    /// One image per box face (+X, -X, +Y, -Y, +Z, -Z); attached once all are loaded
    Textures(Vec<String>),
}

impl Default for Surface {
    fn default() -> Self {
        Surface::Color(0xffffff)
    }
}

impl Surface {
    /// Whether the surface samples an image
    #[inline]
    pub fn is_textured(&self) -> bool {
        !matches!(self, Surface::Color(_))
    }
}

/// A primitive shape placed in the diorama
///
/// The shape hangs under a base group at `(position.x, 0, position.z)`; the
/// shape itself sits at local height `position.y`, and a round shadow decal
/// sits next to it under the same base.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityTemplate {
    /// Name for debugging
    #[serde(default)]
    pub name: String,
    /// Geometry
    pub shape: ShapeTemplate,
    /// Placement: base x/z and shape y
    pub position: Vec3,
    /// Color or textures
    #[serde(default)]
    pub surface: Surface,
    /// Lighting model; derived from the shape and surface when absent
    #[serde(default)]
    pub shading: Option<Shading>,
    /// Animation mode
    #[serde(default)]
    pub animation: Animation,
}

impl EntityTemplate {
    /// Create a template with a solid color surface
    pub fn new(name: impl Into<String>, shape: ShapeTemplate, position: Vec3) -> Self {
        Self {
            name: name.into(),
            shape,
            position,
            surface: Surface::default(),
            shading: None,
            animation: Animation::Still,
        }
    }

    /// Set a solid `0xRRGGBB` color
    pub fn with_color(mut self, hex: u32) -> Self {
        self.surface = Surface::Color(hex);
        self
    }

    /// Set a single texture
    pub fn with_texture(mut self, path: impl Into<String>) -> Self {
        self.surface = Surface::Texture(path.into());
        self
    }

    /// Set one texture per face
    pub fn with_textures<S: Into<String>>(mut self, paths: impl IntoIterator<Item = S>) -> Self {
        self.surface = Surface::Textures(paths.into_iter().map(Into::into).collect());
        self
    }

    /// Set the animation mode
    pub fn with_animation(mut self, animation: Animation) -> Self {
        self.animation = animation;
        self
    }

    /// Override the lighting model
    pub fn with_shading(mut self, shading: Shading) -> Self {
        self.shading = Some(shading);
        self
    }

    /// Whether this is a cylinder (never animated, shadow always low)
    #[inline]
    fn is_cylinder(&self) -> bool {
        matches!(self.shape, ShapeTemplate::Cylinder { .. })
    }

    /// Animation mode that actually applies
    pub fn effective_animation(&self) -> Animation {
        if self.is_cylinder() {
            Animation::Still
        } else {
            self.animation
        }
    }

    /// Local y of the shadow decal
    pub fn shadow_height(&self) -> f32 {
        if self.is_cylinder() {
            LOW_SHADOW_HEIGHT
        } else {
            self.animation.shadow_height()
        }
    }

    /// Uniform scale of the shadow decal
    pub fn shadow_scale(&self) -> f32 {
        self.effective_animation().shadow_scale()
    }

    /// Lighting model: explicit, else unlit for textures, Lambert for cylinders, Phong otherwise
    pub fn resolved_shading(&self) -> Shading {
        match self.shading {
            Some(shading) => shading,
            None if self.surface.is_textured() => Shading::Basic,
            None if self.is_cylinder() => Shading::Lambert,
            None => Shading::Phong,
        }
    }
}

/// The checkered ground plane
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroundTemplate {
    /// Edge length of the square plane
    pub size: f32,
    /// Texture repeats across the plane
    pub repeat: f32,
    /// Optional image; the procedural checker is used when absent or unreadable
    pub texture: Option<String>,
    /// Checker colors (`0xRRGGBB`)
    pub checker: [u32; 2],
}

impl Default for GroundTemplate {
    fn default() -> Self {
        Self {
            size: 10.0,
            repeat: 5.0,
            texture: None,
            checker: [0xffffff, 0x808080],
        }
    }
}

/// An OBJ model placed in the scene
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelTemplate {
    #[serde(default)]
    pub name: String,
    /// OBJ path relative to the assets directory; materials come from its MTL
    pub path: String,
    #[serde(default)]
    pub transform: Transform3D,
}

/// A serializable scene
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    /// Scene name (for display/debugging)
    pub name: String,
    /// Ground plane, if any
    #[serde(default)]
    pub ground: Option<GroundTemplate>,
    /// Image for shadow decals; a procedural blob is used when absent
    #[serde(default)]
    pub shadow_texture: Option<String>,
    /// Shapes, in registration order
    #[serde(default)]
    pub entities: Vec<EntityTemplate>,
    /// Models loaded in the background
    #[serde(default)]
    pub models: Vec<ModelTemplate>,
}

impl Scene {
    /// Create a new empty scene
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ground: None,
            shadow_texture: None,
            entities: Vec::new(),
            models: Vec::new(),
        }
    }

    /// Load a scene from a RON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, SceneLoadError> {
        let contents = fs::read_to_string(path)?;
        let scene = ron::from_str(&contents)?;
        Ok(scene)
    }

    /// Save a scene to a RON file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), SceneSaveError> {
        let pretty = ron::ser::PrettyConfig::new().enumerate_arrays(false);
        let contents = ron::ser::to_string_pretty(self, pretty)?;
        fs::write(path, contents)?;
        Ok(())
    }

    /// Add an entity template to this scene
    pub fn add_entity(&mut self, entity: EntityTemplate) {
        self.entities.push(entity);
    }

    /// Add a model
    pub fn add_model(&mut self, model: ModelTemplate) {
        self.models.push(model);
    }

    /// Set the ground plane
    pub fn with_ground(mut self, ground: GroundTemplate) -> Self {
        self.ground = Some(ground);
        self
    }

    /// The built-in diorama layout
    pub fn diorama() -> Self {
        let mut scene = Scene::new("diorama").with_ground(GroundTemplate::default());

        let unit = ShapeTemplate::cube(1.0);

        // Boxes
        scene.add_entity(
            EntityTemplate::new("teal_cube", unit, Vec3::new(-2.0, 1.0, 3.0))
                .with_color(0x44aa88)
                .with_animation(Animation::Spin),
        );
        scene.add_entity(
            EntityTemplate::new("wall_cube", unit, Vec3::new(0.0, 1.0, 3.0))
                .with_texture("images/wall.jpg")
                .with_animation(Animation::Spin),
        );
        scene.add_entity(
            EntityTemplate::new("flower_cube", unit, Vec3::new(2.0, 1.0, 3.0))
                .with_textures((1..=6).map(|i| format!("images/flower-{}.jpg", i)))
                .with_animation(Animation::Spin),
        );
        scene.add_entity(
            EntityTemplate::new("blue_cube", ShapeTemplate::cube(0.5), Vec3::new(-4.0, 0.0, 3.0))
                .with_color(0x4d79ff)
                .with_animation(Animation::All),
        );
        scene.add_entity(
            EntityTemplate::new("yellow_cube", unit, Vec3::new(0.0, 0.0, -2.0))
                .with_color(0xffff99)
                .with_animation(Animation::All),
        );

        // Border walls
        let long_x = ShapeTemplate::cuboid(8.0, 1.0, 1.0);
        let long_z = ShapeTemplate::cuboid(1.0, 1.0, 8.0);
        let borders = [
            (long_x, Vec3::new(0.0, -0.5, 5.5)),
            (long_x, Vec3::new(0.0, -1.5, 6.5)),
            (long_x, Vec3::new(0.0, -0.5, -5.5)),
            (long_x, Vec3::new(0.0, -1.5, -6.5)),
            (long_z, Vec3::new(5.5, -0.5, 0.0)),
            (long_z, Vec3::new(6.5, -1.5, 0.0)),
            (long_z, Vec3::new(-5.5, -0.5, 0.0)),
            (long_z, Vec3::new(-6.5, -1.5, 0.0)),
        ];
        for (i, (shape, position)) in borders.into_iter().enumerate() {
            scene.add_entity(
                EntityTemplate::new(format!("border_{}", i), shape, position)
                    .with_color(0xf2ccff)
                    .with_animation(Animation::Shadowless),
            );
        }

        // Spheres
        scene.add_entity(
            EntityTemplate::new("gem", ShapeTemplate::sphere(2.0, 4, 1), Vec3::new(0.0, 7.0, 0.0))
                .with_color(0xccaa88)
                .with_animation(Animation::Spin),
        );
        scene.add_entity(
            EntityTemplate::new("ball", ShapeTemplate::sphere(0.5, 32, 16), Vec3::new(2.0, 0.0, -4.0))
                .with_color(0x13ecec)
                .with_animation(Animation::Bounce),
        );

        // Orbs and the pillars under them
        let corners = [(-5.0, -5.0), (5.0, -5.0), (-5.0, 5.0), (5.0, 5.0)];
        for (i, (x, z)) in corners.into_iter().enumerate() {
            scene.add_entity(
                EntityTemplate::new(format!("orb_{}", i), ShapeTemplate::sphere(1.0, 32, 16), Vec3::new(x, 9.0, z))
                    .with_color(0xb366ff)
                    .with_animation(Animation::Shadowless),
            );
        }
        let pillar_corners = [(-5.0, -5.0), (5.0, -5.0), (5.0, 5.0), (-5.0, 5.0)];
        for (i, (x, z)) in pillar_corners.into_iter().enumerate() {
            scene.add_entity(
                EntityTemplate::new(
                    format!("pillar_{}", i),
                    ShapeTemplate::cylinder(1.0, 1.0, 10.0, 5, 1),
                    Vec3::new(x, 3.0, z),
                )
                .with_color(0xffb3ff),
            );
        }

        scene.add_model(ModelTemplate {
            name: "cat".to_string(),
            path: "models/cat/12221_Cat_v1_l3.obj".to_string(),
            transform: Transform3D::from_position(Vec3::new(0.0, 0.0, -1.0))
                .with_rotation(Vec3::new(-FRAC_PI_2, 0.0, 0.0))
                .with_uniform_scale(0.1),
        });

        scene
    }
}

/// Error loading a scene
#[derive(Debug)]
pub enum SceneLoadError {
    /// IO error (file not found, permission denied, etc.)
    Io(io::Error),
    /// Parse error (invalid RON syntax)
    Parse(ron::error::SpannedError),
}

impl From<io::Error> for SceneLoadError {
    fn from(e: io::Error) -> Self {
        SceneLoadError::Io(e)
    }
}

impl From<ron::error::SpannedError> for SceneLoadError {
    fn from(e: ron::error::SpannedError) -> Self {
        SceneLoadError::Parse(e)
    }
}

impl std::fmt::Display for SceneLoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SceneLoadError::Io(e) => write!(f, "IO error: {}", e),
            SceneLoadError::Parse(e) => write!(f, "Parse error: {}", e),
        }
    }
}

impl std::error::Error for SceneLoadError {}

/// Error saving a scene
#[derive(Debug)]
pub enum SceneSaveError {
    /// IO error (permission denied, disk full, etc.)
    Io(io::Error),
    /// Serialization error
    Serialize(ron::Error),
}

impl From<io::Error> for SceneSaveError {
    fn from(e: io::Error) -> Self {
        SceneSaveError::Io(e)
    }
}

impl From<ron::Error> for SceneSaveError {
    fn from(e: ron::Error) -> Self {
        SceneSaveError::Serialize(e)
    }
}

impl std::fmt::Display for SceneSaveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SceneSaveError::Io(e) => write!(f, "IO error: {}", e),
            SceneSaveError::Serialize(e) => write!(f, "Serialize error: {}", e),
        }
    }
}

impl std::error::Error for SceneSaveError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_animation_modes() {
        assert!(Animation::Spin.spins() && !Animation::Spin.bounces());
        assert!(!Animation::Bounce.spins() && Animation::Bounce.bounces());
        assert!(Animation::All.spins() && Animation::All.bounces());
        assert!(!Animation::Still.spins() && !Animation::Still.bounces());
        assert!(!Animation::Shadowless.spins() && !Animation::Shadowless.bounces());
    }

    #[test]
    fn test_shadow_placement() {
        assert_eq!(Animation::Still.shadow_height(), SHADOW_HEIGHT);
        assert_eq!(Animation::Spin.shadow_height(), SHADOW_HEIGHT);
        assert_eq!(Animation::Bounce.shadow_height(), LOW_SHADOW_HEIGHT);
        assert_eq!(Animation::All.shadow_height(), LOW_SHADOW_HEIGHT);
        assert_eq!(Animation::Shadowless.shadow_scale(), 0.0);
        assert_eq!(Animation::Spin.shadow_scale(), SHADOW_SIZE);
    }

    #[test]
    fn test_cylinders_never_animate() {
        let pillar = EntityTemplate::new("p", ShapeTemplate::cylinder(1.0, 1.0, 10.0, 5, 1), Vec3::ZERO)
            .with_animation(Animation::All);
        assert_eq!(pillar.effective_animation(), Animation::Still);
        assert_eq!(pillar.shadow_height(), LOW_SHADOW_HEIGHT);
        assert_eq!(pillar.shadow_scale(), SHADOW_SIZE);
        assert_eq!(pillar.resolved_shading(), Shading::Lambert);
    }

    #[test]
    fn test_resolved_shading() {
        let cube = EntityTemplate::new("c", ShapeTemplate::cube(1.0), Vec3::ZERO);
        assert_eq!(cube.resolved_shading(), Shading::Phong);
        assert_eq!(cube.clone().with_texture("a.png").resolved_shading(), Shading::Basic);
        assert_eq!(cube.with_shading(Shading::Lambert).resolved_shading(), Shading::Lambert);
    }

    #[test]
    fn test_diorama_layout() {
        let scene = Scene::diorama();
        assert_eq!(scene.entities.len(), 5 + 8 + 2 + 4 + 4);
        assert_eq!(scene.models.len(), 1);

        let spins = scene.entities.iter().filter(|e| e.effective_animation().spins()).count();
        let bounces = scene.entities.iter().filter(|e| e.effective_animation().bounces()).count();
        assert_eq!(spins, 6);
        assert_eq!(bounces, 3);
    }

    #[test]
    fn test_save_then_load() {
        let path = std::env::temp_dir().join(format!("diorama_scene_{}.ron", std::process::id()));
        let scene = Scene::diorama();
        scene.save(&path).unwrap();

        let loaded = Scene::load(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(loaded, scene);
    }

    #[test]
    fn test_ground_checker_is_a_tuple() {
        let ground: GroundTemplate = ron::from_str("(checker: (0xffffff, 0x808080))").unwrap();
        assert_eq!(ground.checker, [0xffffff, 0x808080]);
        assert_eq!(ground.size, 10.0);
        assert!(ron::from_str::<GroundTemplate>("(checker: [0xffffff, 0x808080])").is_err());
    }

    #[test]
    fn test_save_to_missing_directory_fails() {
        let err = Scene::new("x").save("no/such/dir/scene.ron").unwrap_err();
        assert!(matches!(err, SceneSaveError::Io(_)));
    }

    #[test]
    fn test_minimal_entity_uses_defaults() {
        let text = r#"(
            name: "tiny",
            entities: [
                (shape: Box(width: 1.0, height: 1.0, depth: 1.0), position: (x: 0.0, y: 1.0, z: 0.0)),
            ],
        )"#;
        let scene: Scene = ron::from_str(text).unwrap();
        let e = &scene.entities[0];
        assert_eq!(e.surface, Surface::Color(0xffffff));
        assert_eq!(e.animation, Animation::Still);
        assert!(scene.ground.is_none());
    }

    #[test]
    fn test_load_missing_file() {
        let err = Scene::load("no/such/scene.ron").unwrap_err();
        assert!(matches!(err, SceneLoadError::Io(_)));
    }
}
