//! 4x4 matrix helpers on top of `glam`.
//!
//! Matrices are column-major and follow OpenGL clip conventions (z in [-1, 1]).
//! The renderer converts to wgpu depth with [`OPENGL_TO_WGPU_MATRIX`] right
//! before upload; x/y (and therefore screen projection) are unaffected.

use glam::{Mat4, Vec3, Vec4};

/// Remaps OpenGL clip depth (z in [-w, w]) to WebGPU clip depth (z in [0, w]).
#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: Mat4 = Mat4::from_cols_array(&[
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
]);

/// Right-handed perspective projection with OpenGL depth range.
#[inline]
pub fn perspective(fov_y_rad: f32, aspect: f32, near: f32, far: f32) -> Mat4 {
    Mat4::perspective_rh_gl(fov_y_rad, aspect, near, far)
}

/// Normalizes `v`, falling back to the unnormalized vector when it is
/// too short to divide by.
#[inline]
fn normalize_or_keep(v: Vec3) -> Vec3 {
    let len = v.length();
    if len < 1e-6 {
        v
    } else {
        v / len
    }
}

/// Right-handed view matrix looking from `eye` toward `target`.
///
/// Unlike `Mat4::look_at_rh` this never produces NaN: a zero-length forward or
/// side axis is left unnormalized, which degrades to a (possibly singular)
/// matrix instead of poisoning every uniform derived from it.
pub fn look_at(eye: Vec3, target: Vec3, up: Vec3) -> Mat4 {
    let z = normalize_or_keep(eye - target);
    let x = normalize_or_keep(up.cross(z));
    let y = z.cross(x);

    Mat4::from_cols(
        Vec4::new(x.x, y.x, z.x, 0.0),
        Vec4::new(x.y, y.y, z.y, 0.0),
        Vec4::new(x.z, y.z, z.z, 0.0),
        Vec4::new(-x.dot(eye), -y.dot(eye), -z.dot(eye), 1.0),
    )
}

/// Post-multiplies a rotation about +X (`m * Rx`).
#[inline]
pub fn rotate_x(m: Mat4, angle_rad: f32) -> Mat4 {
    m * Mat4::from_rotation_x(angle_rad)
}

/// Post-multiplies a rotation about +Y (`m * Ry`).
#[inline]
pub fn rotate_y(m: Mat4, angle_rad: f32) -> Mat4 {
    m * Mat4::from_rotation_y(angle_rad)
}

/// Post-multiplies a rotation about +Z (`m * Rz`).
#[inline]
pub fn rotate_z(m: Mat4, angle_rad: f32) -> Mat4 {
    m * Mat4::from_rotation_z(angle_rad)
}

#[inline]
pub fn translate(m: Mat4, offset: Vec3) -> Mat4 {
    m * Mat4::from_translation(offset)
}

#[inline]
pub fn scale(m: Mat4, factors: Vec3) -> Mat4 {
    m * Mat4::from_scale(factors)
}

/// Cubic Hermite ease `t²(3 − 2t)`. Input is clamped to [0, 1].
#[inline]
pub fn smoothstep(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Clamps into [0, 1], mapping NaN to 0.
#[inline]
pub fn clamp01(v: f32) -> f32 {
    if v.is_nan() {
        0.0
    } else {
        v.clamp(0.0, 1.0)
    }
}
