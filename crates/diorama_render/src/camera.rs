//! Perspective camera looking at a fixed target

use diorama_math::{mat4, Mat4, Vec3};

/// 3D perspective camera
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera3D {
    pub position: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    /// Vertical field of view in degrees
    pub fov_deg: f32,
    pub near: f32,
    pub far: f32,
    /// Width over height
    pub aspect: f32,
}

impl Default for Camera3D {
    fn default() -> Self {
        Self {
            position: Vec3::new(10.0, 10.0, 15.0),
            target: Vec3::new(0.0, 2.0, 0.0),
            up: Vec3::Y,
            fov_deg: 45.0,
            near: 0.1,
            far: 100.0,
            aspect: 16.0 / 9.0,
        }
    }
}

impl Camera3D {
    /// Camera at `position` looking at `target`
    pub fn new(position: Vec3, target: Vec3) -> Self {
        Self {
            position,
            target,
            ..Self::default()
        }
    }

    pub fn view_matrix(&self) -> Mat4 {
        mat4::look_at(self.position, self.target, self.up)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        mat4::perspective(self.fov_deg.to_radians(), self.aspect, self.near, self.far)
    }

    /// Projection times view
    pub fn view_projection(&self) -> Mat4 {
        mat4::mul(self.projection_matrix(), self.view_matrix())
    }

    /// Update the aspect ratio after a resize (zero heights are ignored)
    pub fn set_aspect(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    /// Unit vector from the camera toward its target
    pub fn forward(&self) -> Vec3 {
        (self.target - self.position).normalized()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 0.0001;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    /// Apply a column-major matrix to a point and divide by w
    fn project(m: &Mat4, p: Vec3) -> (f32, f32, f32) {
        let v = [p.x, p.y, p.z, 1.0];
        let mut out = [0.0f32; 4];
        for (row, o) in out.iter_mut().enumerate() {
            *o = (0..4).map(|col| m[col][row] * v[col]).sum();
        }
        (out[0] / out[3], out[1] / out[3], out[2] / out[3])
    }

    #[test]
    fn test_target_projects_to_center() {
        let camera = Camera3D::default();
        let (x, y, z) = project(&camera.view_projection(), camera.target);
        assert!(approx_eq(x, 0.0) && approx_eq(y, 0.0), "got ({}, {})", x, y);
        assert!(z > 0.0 && z < 1.0);
    }

    #[test]
    fn test_depth_range() {
        let camera = Camera3D::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));
        let m = camera.view_projection();
        let (_, _, near) = project(&m, Vec3::new(0.0, 0.0, -camera.near));
        let (_, _, far) = project(&m, Vec3::new(0.0, 0.0, -camera.far));
        assert!(approx_eq(near, 0.0), "near = {}", near);
        assert!(approx_eq(far, 1.0), "far = {}", far);
    }

    #[test]
    fn test_up_is_up_on_screen() {
        let camera = Camera3D::new(Vec3::new(0.0, 0.0, 10.0), Vec3::ZERO);
        let (_, y, _) = project(&camera.view_projection(), Vec3::new(0.0, 1.0, 0.0));
        assert!(y > 0.0);
    }

    #[test]
    fn test_set_aspect() {
        let mut camera = Camera3D::default();
        camera.set_aspect(800, 400);
        assert!(approx_eq(camera.aspect, 2.0));

        camera.set_aspect(800, 0);
        assert!(approx_eq(camera.aspect, 2.0), "zero height is ignored");
    }

    #[test]
    fn test_forward() {
        let camera = Camera3D::new(Vec3::new(0.0, 5.0, 0.0), Vec3::ZERO);
        let f = camera.forward();
        assert!(approx_eq(f.y, -1.0));
    }
}
