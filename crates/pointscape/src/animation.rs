//! Scroll-driven animation: a pure function of scroll progress, elapsed time
//! and (cosmetically) the pointer.

use crate::math::{clamp01, look_at, perspective, rotate_x, rotate_y, rotate_z, scale, smoothstep, translate};
use glam::{Mat4, Vec2, Vec3};
use std::f32::consts::{PI, TAU};

/// Y of the focal object at scroll 0.
pub const HELIX_TOP_Y: f32 = 4.0;
/// Y of the focal object at scroll 1.
pub const HELIX_BOTTOM_Y: f32 = -3.0;
/// Peak X swing of the helix (at mid-scroll envelope).
pub const HELIX_SWAY_X: f32 = 1.5;
/// Peak Z swing of the helix.
pub const HELIX_SWAY_Z: f32 = 0.5;

/// Eye offset from the focal point at scroll 0, as (height, distance).
pub const EYE_OFFSET_START: (f32, f32) = (1.8, 4.5);
/// How much of the eye offset is pulled in at full scroll.
pub const EYE_PULL_IN: (f32, f32) = (0.5, 1.0);

/// Extra object scale reached at full scroll (total = 1 + this).
pub const OBJECT_EXPANSION: f32 = 0.8;
/// Scroll progress at which the morph completes.
pub const MORPH_END: f32 = 0.5;

pub const FOV_Y_RAD: f32 = PI / 3.2;
pub const Z_NEAR: f32 = 0.1;
pub const Z_FAR: f32 = 60.0;

/// Distance of the back light behind the focal object, away from the eye.
pub const BACK_LIGHT_DISTANCE: f32 = 3.5;

/// Per-frame inputs pushed in by the host. Setters clamp.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationState {
    scroll_progress: f32,
    elapsed_s: f32,
    pointer: Vec2,
}

impl Default for AnimationState {
    fn default() -> Self {
        Self {
            scroll_progress: 0.0,
            elapsed_s: 0.0,
            pointer: Vec2::splat(0.5),
        }
    }
}

impl AnimationState {
    pub fn new(scroll_progress: f32, elapsed_s: f32, pointer: Vec2) -> Self {
        let mut s = Self::default();
        s.set_scroll_progress(scroll_progress);
        s.set_elapsed(elapsed_s);
        s.set_pointer(pointer);
        s
    }

    pub fn scroll_progress(&self) -> f32 {
        self.scroll_progress
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed_s
    }

    pub fn pointer(&self) -> Vec2 {
        self.pointer
    }

    pub fn set_scroll_progress(&mut self, t: f32) {
        self.scroll_progress = clamp01(t);
    }

    /// Adds `delta` to the current progress, clamping the result.
    pub fn scroll_by(&mut self, delta: f32) {
        self.set_scroll_progress(self.scroll_progress + delta);
    }

    pub fn set_elapsed(&mut self, seconds: f32) {
        if seconds.is_finite() {
            self.elapsed_s = seconds.max(0.0);
        }
    }

    pub fn set_pointer(&mut self, p: Vec2) {
        self.pointer = Vec2::new(clamp01(p.x), clamp01(p.y));
    }
}

/// Eye, look target, and the fixed +Y up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    pub eye: Vec3,
    pub look_target: Vec3,
    pub up: Vec3,
}

impl CameraPose {
    pub fn view(&self) -> Mat4 {
        look_at(self.eye, self.look_target, self.up)
    }
}

/// Eased scroll progress.
#[inline]
pub fn eased(scroll: f32) -> f32 {
    smoothstep(clamp01(scroll))
}

/// `sin(π·t)²`: zero at both scroll ends, one at mid-scroll.
#[inline]
pub fn sway_envelope(scroll: f32) -> f32 {
    let b = (clamp01(scroll) * PI).sin();
    b * b
}

/// Focal object world position along the eased helix.
pub fn helix_position(scroll: f32) -> Vec3 {
    let t = clamp01(scroll);
    let e = smoothstep(t);
    let bump = sway_envelope(t);
    let angle = e * TAU;

    Vec3::new(
        angle.sin() * bump * HELIX_SWAY_X,
        HELIX_TOP_Y + (HELIX_BOTTOM_Y - HELIX_TOP_Y) * e,
        angle.cos() * bump * HELIX_SWAY_Z,
    )
}

/// Camera pose trailing the focal point. Height and distance shrink as the
/// eased progress grows; time and pointer add slow sway.
pub fn camera_pose(state: &AnimationState, focal: Vec3) -> CameraPose {
    let e = eased(state.scroll_progress());
    let time = state.elapsed();

    let sway_x = (time * 0.08).sin() * 0.2 + (state.pointer().x - 0.5) * 0.25;
    let sway_z = (time * 0.06).cos() * 0.12;

    let eye = focal
        + Vec3::new(
            sway_x,
            EYE_OFFSET_START.0 - e * EYE_PULL_IN.0,
            EYE_OFFSET_START.1 - e * EYE_PULL_IN.1 + sway_z,
        );
    let look_target = Vec3::new(
        focal.x + (time * 0.05).sin() * 0.04,
        focal.y - e * 0.2,
        focal.z,
    );

    CameraPose {
        eye,
        look_target,
        up: Vec3::Y,
    }
}

/// Cross-fade between the object cloud (0) and the environment cloud (1).
#[inline]
pub fn morph(scroll: f32) -> f32 {
    smoothstep(clamp01(scroll / MORPH_END))
}

/// Uniform object scale: 1 at scroll 0, `1 + OBJECT_EXPANSION` at scroll 1.
#[inline]
pub fn object_scale(scroll: f32) -> f32 {
    1.0 + eased(scroll) * OBJECT_EXPANSION
}

/// Model matrix for the focal object: spin with scroll and time, a slow
/// wobble, and the scroll expansion.
pub fn object_model(state: &AnimationState, focal: Vec3) -> Mat4 {
    let t = state.scroll_progress();
    let time = state.elapsed();
    let spin = t * PI * 4.0;

    let m = translate(Mat4::IDENTITY, focal);
    let m = rotate_y(m, time * 0.15 + spin);
    let m = rotate_x(m, (time * 0.25).sin() * 0.1 + t * 0.5);
    let m = rotate_z(m, (time * 0.18 + 1.0).sin() * 0.08);
    scale(m, Vec3::splat(object_scale(t)))
}

/// Projection for the given aspect ratio (OpenGL depth convention).
pub fn projection(aspect: f32) -> Mat4 {
    perspective(FOV_Y_RAD, aspect, Z_NEAR, Z_FAR)
}

/// A point behind the focal object on the far side from the eye.
pub fn back_light_position(focal: Vec3, eye: Vec3) -> Vec3 {
    let to_cam = eye - focal;
    let len = to_cam.length();
    let dir = if len > 0.01 { to_cam / len } else { to_cam };
    focal - dir * BACK_LIGHT_DISTANCE
}
