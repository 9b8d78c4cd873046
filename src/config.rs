//! Application configuration
//!
//! Configuration is loaded from multiple sources with the following priority (lowest to highest):
//! 1. `config/default.toml` (version controlled)
//! 2. `config/user.toml` (gitignored, user overrides)
//! 3. Environment variables (`DIORAMA_SECTION__KEY`)
//!
//! Colors are written as `0xRRGGBB` integers in sRGB.

use figment::{Figment, providers::{Format, Toml, Env}};
use serde::{Serialize, Deserialize};
use std::path::{Path, PathBuf};

use diorama_core::Vec3;
use diorama_render::{AmbientLight, Camera3D, DirectionalLight, Fog, HemisphereLight, Lighting};

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Window configuration
    #[serde(default)]
    pub window: WindowConfig,
    /// Camera configuration
    #[serde(default)]
    pub camera: CameraConfig,
    /// Light configuration
    #[serde(default)]
    pub lighting: LightingConfig,
    /// Fog configuration
    #[serde(default)]
    pub fog: FogConfig,
    /// Rendering configuration
    #[serde(default)]
    pub rendering: RenderingConfig,
    /// Scene and asset locations
    #[serde(default)]
    pub scene: SceneConfig,
    /// Debug configuration
    #[serde(default)]
    pub debug: DebugConfig,
}

impl AppConfig {
    /// Load configuration from default locations
    ///
    /// Priority (lowest to highest):
    /// 1. `config/default.toml`
    /// 2. `config/user.toml`
    /// 3. Environment variables (`DIORAMA_*`)
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration from a specific config directory
    pub fn load_from<P: AsRef<Path>>(config_dir: P) -> Result<Self, ConfigError> {
        let config_dir = config_dir.as_ref();
        let default_path = config_dir.join("default.toml");
        let user_path = config_dir.join("user.toml");

        let mut figment = Figment::new();

        if default_path.exists() {
            figment = figment.merge(Toml::file(&default_path));
        }

        // Load user config (optional)
        if user_path.exists() {
            figment = figment.merge(Toml::file(&user_path));
        }

        // Environment variables override everything
        // DIORAMA_WINDOW__TITLE=Test -> window.title = "Test"
        figment = figment.merge(Env::prefixed("DIORAMA_").split("__"));

        figment.extract().map_err(ConfigError::from)
    }

    /// Camera described by the `[camera]` section
    pub fn camera(&self) -> Camera3D {
        let c = &self.camera;
        Camera3D {
            position: Vec3::from_array(c.position),
            target: Vec3::from_array(c.target),
            fov_deg: c.fov,
            near: c.near,
            far: c.far,
            aspect: self.window.width as f32 / self.window.height.max(1) as f32,
            ..Camera3D::default()
        }
    }

    /// Lights and fog described by the `[lighting]` and `[fog]` sections
    pub fn lighting(&self) -> Lighting {
        let l = &self.lighting;
        Lighting {
            ambient: AmbientLight {
                color: l.ambient_color,
                intensity: l.ambient_intensity,
            },
            hemisphere: HemisphereLight {
                sky_color: l.sky_color,
                ground_color: l.ground_color,
                intensity: l.hemisphere_intensity,
            },
            directional: DirectionalLight {
                color: l.directional_color,
                intensity: l.directional_intensity,
                position: Vec3::from_array(l.directional_position),
                target: Vec3::from_array(l.directional_target),
            },
            fog: Fog {
                color: self.fog.color,
                density: if self.fog.enabled { self.fog.density } else { 0.0 },
            },
        }
    }
}

/// Window configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Window title
    pub title: String,
    /// Window width in pixels
    pub width: u32,
    /// Window height in pixels
    pub height: u32,
    /// Start in fullscreen mode
    pub fullscreen: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Diorama".to_string(),
            width: 1280,
            height: 720,
            fullscreen: false,
        }
    }
}

/// Camera configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Eye position [x, y, z]
    pub position: [f32; 3],
    /// Point the camera looks at [x, y, z]
    pub target: [f32; 3],
    /// Vertical field of view in degrees
    pub fov: f32,
    /// Near clipping plane
    pub near: f32,
    /// Far clipping plane
    pub far: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: [10.0, 10.0, 15.0],
            target: [0.0, 2.0, 0.0],
            fov: 45.0,
            near: 0.1,
            far: 100.0,
        }
    }
}

/// Light configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LightingConfig {
    pub ambient_color: u32,
    pub ambient_intensity: f32,
    /// Hemisphere light color from above
    pub sky_color: u32,
    /// Hemisphere light color from below
    pub ground_color: u32,
    pub hemisphere_intensity: f32,
    pub directional_color: u32,
    pub directional_intensity: f32,
    /// Where the directional light shines from [x, y, z]
    pub directional_position: [f32; 3],
    /// Where the directional light shines to [x, y, z]
    pub directional_target: [f32; 3],
}

impl Default for LightingConfig {
    fn default() -> Self {
        Self {
            ambient_color: 0xffffff,
            ambient_intensity: 1.0,
            sky_color: 0xb1e1ff,
            ground_color: 0xb97a20,
            hemisphere_intensity: 2.0,
            directional_color: 0xffffff,
            directional_intensity: 2.5,
            directional_position: [0.0, 10.0, 0.0],
            directional_target: [-5.0, 0.0, 0.0],
        }
    }
}

/// Exponential squared fog
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FogConfig {
    pub enabled: bool,
    pub color: u32,
    pub density: f32,
}

impl Default for FogConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            color: 0x2e5cb8,
            density: 0.03,
        }
    }
}

/// Rendering configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderingConfig {
    /// Enable VSync
    pub vsync: bool,
    /// Background color [r, g, b, a], linear
    pub background_color: [f32; 4],
}

impl Default for RenderingConfig {
    fn default() -> Self {
        Self {
            vsync: true,
            background_color: [0.03, 0.1, 0.48, 1.0],
        }
    }
}

/// Scene file and asset locations
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// RON scene description
    pub path: PathBuf,
    /// Root for texture and model paths named by the scene
    pub assets_dir: PathBuf,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("assets/scenes/diorama.ron"),
            assets_dir: PathBuf::from("assets"),
        }
    }
}

/// Debug configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level (error, warn, info, debug, trace)
    pub log_level: String,
    /// Start with the animation clock paused
    pub start_paused: bool,
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            start_paused: false,
        }
    }
}

/// Configuration error
#[derive(Debug)]
pub struct ConfigError {
    message: String,
}

impl From<figment::Error> for ConfigError {
    fn from(e: figment::Error) -> Self {
        ConfigError {
            message: e.to_string(),
        }
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Configuration error: {}", self.message)
    }
}

impl std::error::Error for ConfigError {}
