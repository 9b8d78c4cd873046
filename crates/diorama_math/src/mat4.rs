//! 4x4 Matrix utilities for 3D transformations
//!
//! Matrices are column-major (`m[column][row]`) to match WGSL `mat4x4<f32>`
//! uniform layout. Projection targets wgpu's `[0, 1]` depth range.

use crate::Vec3;

/// 4x4 matrix type (column-major)
pub type Mat4 = [[f32; 4]; 4];

/// Identity matrix
pub const IDENTITY: Mat4 = [
    [1.0, 0.0, 0.0, 0.0],
    [0.0, 1.0, 0.0, 0.0],
    [0.0, 0.0, 1.0, 0.0],
    [0.0, 0.0, 0.0, 1.0],
];

/// Translation matrix
pub fn translation(t: Vec3) -> Mat4 {
    let mut m = IDENTITY;
    m[3] = [t.x, t.y, t.z, 1.0];
    m
}

/// Non-uniform scale matrix
pub fn scale(s: Vec3) -> Mat4 {
    let mut m = IDENTITY;
    m[0][0] = s.x;
    m[1][1] = s.y;
    m[2][2] = s.z;
    m
}

/// Rotation about the X axis (radians, right-handed)
pub fn rotation_x(angle: f32) -> Mat4 {
    let (s, c) = angle.sin_cos();
    let mut m = IDENTITY;
    m[1][1] = c;
    m[1][2] = s;
    m[2][1] = -s;
    m[2][2] = c;
    m
}

/// Rotation about the Y axis (radians, right-handed)
pub fn rotation_y(angle: f32) -> Mat4 {
    let (s, c) = angle.sin_cos();
    let mut m = IDENTITY;
    m[0][0] = c;
    m[0][2] = -s;
    m[2][0] = s;
    m[2][2] = c;
    m
}

/// Rotation about the Z axis (radians, right-handed)
pub fn rotation_z(angle: f32) -> Mat4 {
    let (s, c) = angle.sin_cos();
    let mut m = IDENTITY;
    m[0][0] = c;
    m[0][1] = s;
    m[1][0] = -s;
    m[1][1] = c;
    m
}

/// Rotation from Euler angles applied in XYZ order: `Rx * Ry * Rz`
pub fn from_euler_xyz(angles: Vec3) -> Mat4 {
    mul(mul(rotation_x(angles.x), rotation_y(angles.y)), rotation_z(angles.z))
}

/// Compose translation, Euler rotation and scale: `T * R * S`
pub fn from_trs(position: Vec3, rotation: Vec3, scale_factors: Vec3) -> Mat4 {
    mul(mul(translation(position), from_euler_xyz(rotation)), scale(scale_factors))
}

/// Multiply two 4x4 matrices: result = a * b
///
/// In column-major convention, this applies b first, then a.
#[allow(clippy::needless_range_loop)]
pub fn mul(a: Mat4, b: Mat4) -> Mat4 {
    let mut result = [[0.0f32; 4]; 4];

    for i in 0..4 {
        for j in 0..4 {
            for k in 0..4 {
                result[i][j] += a[k][j] * b[i][k];
            }
        }
    }

    result
}

/// Transform a point (w = 1)
pub fn transform_point(m: &Mat4, p: Vec3) -> Vec3 {
    Vec3::new(
        m[0][0] * p.x + m[1][0] * p.y + m[2][0] * p.z + m[3][0],
        m[0][1] * p.x + m[1][1] * p.y + m[2][1] * p.z + m[3][1],
        m[0][2] * p.x + m[1][2] * p.y + m[2][2] * p.z + m[3][2],
    )
}

/// Transform a direction (w = 0, translation ignored)
pub fn transform_vector(m: &Mat4, v: Vec3) -> Vec3 {
    Vec3::new(
        m[0][0] * v.x + m[1][0] * v.y + m[2][0] * v.z,
        m[0][1] * v.x + m[1][1] * v.y + m[2][1] * v.z,
        m[0][2] * v.x + m[1][2] * v.y + m[2][2] * v.z,
    )
}

/// Inverse-transpose of the upper 3x3, padded back into a Mat4
///
/// Used to transform normals under non-uniform scale. A degenerate matrix
/// (zero scale on some axis) yields the identity.
pub fn normal_matrix(m: &Mat4) -> Mat4 {
    // r[row][col]
    let r = [
        [m[0][0], m[1][0], m[2][0]],
        [m[0][1], m[1][1], m[2][1]],
        [m[0][2], m[1][2], m[2][2]],
    ];

    let cof = [
        [
            r[1][1] * r[2][2] - r[1][2] * r[2][1],
            -(r[1][0] * r[2][2] - r[1][2] * r[2][0]),
            r[1][0] * r[2][1] - r[1][1] * r[2][0],
        ],
        [
            -(r[0][1] * r[2][2] - r[0][2] * r[2][1]),
            r[0][0] * r[2][2] - r[0][2] * r[2][0],
            -(r[0][0] * r[2][1] - r[0][1] * r[2][0]),
        ],
        [
            r[0][1] * r[1][2] - r[0][2] * r[1][1],
            -(r[0][0] * r[1][2] - r[0][2] * r[1][0]),
            r[0][0] * r[1][1] - r[0][1] * r[1][0],
        ],
    ];

    let det = r[0][0] * cof[0][0] + r[0][1] * cof[0][1] + r[0][2] * cof[0][2];
    if det.abs() < 1e-12 {
        return IDENTITY;
    }
    let inv_det = 1.0 / det;

    let mut out = IDENTITY;
    for row in 0..3 {
        for col in 0..3 {
            out[col][row] = cof[row][col] * inv_det;
        }
    }
    out
}

/// Right-handed perspective projection with `[0, 1]` depth
pub fn perspective(fov_y: f32, aspect: f32, near: f32, far: f32) -> Mat4 {
    let f = 1.0 / (fov_y / 2.0).tan();
    let nf = 1.0 / (near - far);

    [
        [f / aspect, 0.0, 0.0, 0.0],
        [0.0, f, 0.0, 0.0],
        [0.0, 0.0, far * nf, -1.0],
        [0.0, 0.0, near * far * nf, 0.0],
    ]
}

/// Right-handed look-at view matrix
pub fn look_at(eye: Vec3, target: Vec3, up: Vec3) -> Mat4 {
    let f = (target - eye).normalized();
    let s = f.cross(up).normalized();
    let u = s.cross(f);

    [
        [s.x, u.x, -f.x, 0.0],
        [s.y, u.y, -f.y, 0.0],
        [s.z, u.z, -f.z, 0.0],
        [-s.dot(eye), -u.dot(eye), f.dot(eye), 1.0],
    ]
}
