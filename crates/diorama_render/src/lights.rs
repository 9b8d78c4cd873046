//! Scene lighting and fog
//!
//! Colors are `0xRRGGBB` sRGB and converted to linear when packed for the
//! shader. Intensities multiply the linear color.

use diorama_core::color::hex_to_linear;
use diorama_math::Vec3;

/// Uniform light from every direction
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AmbientLight {
    pub color: u32,
    pub intensity: f32,
}

impl Default for AmbientLight {
    fn default() -> Self {
        Self { color: 0xffffff, intensity: 1.0 }
    }
}

/// Sky/ground gradient light, blended by the surface normal's Y
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HemisphereLight {
    pub sky_color: u32,
    pub ground_color: u32,
    pub intensity: f32,
}

impl Default for HemisphereLight {
    fn default() -> Self {
        Self {
            sky_color: 0xb1e1ff,
            ground_color: 0xb97a20,
            intensity: 2.0,
        }
    }
}

/// Parallel light shining from `position` toward `target`
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DirectionalLight {
    pub color: u32,
    pub intensity: f32,
    pub position: Vec3,
    pub target: Vec3,
}

impl Default for DirectionalLight {
    fn default() -> Self {
        Self {
            color: 0xffffff,
            intensity: 2.5,
            position: Vec3::new(0.0, 10.0, 0.0),
            target: Vec3::new(-5.0, 0.0, 0.0),
        }
    }
}

impl DirectionalLight {
    /// Unit vector from a lit surface toward the light
    pub fn direction(&self) -> Vec3 {
        let d = self.position - self.target;
        if d.length_squared() > 0.0 {
            d.normalized()
        } else {
            Vec3::Y
        }
    }
}

/// Exponential squared fog: `factor = 1 - exp(-(density * distance)^2)`
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Fog {
    pub color: u32,
    pub density: f32,
}

impl Default for Fog {
    fn default() -> Self {
        Self { color: 0x2e5cb8, density: 0.03 }
    }
}

impl Fog {
    /// How much of the fog color replaces a fragment at `distance`
    pub fn factor(&self, distance: f32) -> f32 {
        let d = self.density * distance;
        (1.0 - (-d * d).exp()).clamp(0.0, 1.0)
    }
}

/// Everything that lights the scene
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Lighting {
    pub ambient: AmbientLight,
    pub hemisphere: HemisphereLight,
    pub directional: DirectionalLight,
    pub fog: Fog,
}

/// Linear color scaled by intensity
pub(crate) fn radiance(color: u32, intensity: f32) -> [f32; 3] {
    hex_to_linear(color).map(|c| c * intensity)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 0.0001;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    #[test]
    fn test_default_direction_points_at_light() {
        let light = DirectionalLight::default();
        let d = light.direction();
        assert!(approx_eq(d.length(), 1.0));
        // Light sits above and to +X of its target
        assert!(d.y > 0.0 && d.x > 0.0);
        assert!(approx_eq(d.z, 0.0));
    }

    #[test]
    fn test_degenerate_direction() {
        let light = DirectionalLight {
            target: Vec3::new(0.0, 10.0, 0.0),
            ..DirectionalLight::default()
        };
        assert_eq!(light.direction(), Vec3::Y);
    }

    #[test]
    fn test_fog_factor() {
        let fog = Fog::default();
        assert_eq!(fog.factor(0.0), 0.0);
        let near = fog.factor(5.0);
        let far = fog.factor(50.0);
        assert!(near < far);
        assert!(far < 1.0);
        // density 0.03 at distance 1/0.03 gives 1 - e^-1
        assert!(approx_eq(fog.factor(1.0 / 0.03), 1.0 - (-1.0f32).exp()));
    }

    #[test]
    fn test_radiance_scales_linear_color() {
        let white = radiance(0xffffff, 2.5);
        assert!(white.iter().all(|&c| approx_eq(c, 2.5)));
        assert_eq!(radiance(0x000000, 3.0), [0.0; 3]);
    }
}
