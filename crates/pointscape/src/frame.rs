//! GPU-independent half of the render orchestration: everything a frame
//! needs, derived from [`AnimationState`] and the viewport, plus the ordered
//! pass plan.

use crate::{
    animation::{self, AnimationState, CameraPose},
    math::OPENGL_TO_WGPU_MATRIX,
    projection::project_to_screen,
};
use glam::{Mat4, Vec2, Vec3};
use smallvec::SmallVec;

/// Scroll progress above which the pulse-ring pass is drawn.
pub const PULSE_RING_THRESHOLD: f32 = 0.4;

/// Clear color behind all passes.
pub const CLEAR_COLOR: [f64; 4] = [0.02, 0.02, 0.03, 1.0];

/// Highest device pixel ratio the sprite scale follows.
pub const MAX_PIXEL_RATIO: f64 = 2.0;

/// Drawing surface size in physical pixels plus the device pixel ratio.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
    pub scale_factor: f64,
}

impl Viewport {
    pub fn new(width: u32, height: u32, scale_factor: f64) -> Self {
        Self {
            width,
            height,
            scale_factor,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }

    pub fn physical_size(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32)
    }

    /// Device pixel ratio. A non-positive or non-finite scale factor
    /// counts as 1.
    pub fn pixel_ratio(&self) -> f64 {
        if self.scale_factor.is_finite() && self.scale_factor > 0.0 {
            self.scale_factor
        } else {
            1.0
        }
    }

    /// Size in logical (DPR-independent) units.
    pub fn logical_size(&self) -> Vec2 {
        self.physical_size() / self.pixel_ratio() as f32
    }

    /// Logical size scaled by the pixel ratio capped at [`MAX_PIXEL_RATIO`].
    /// Point sizes are measured in these pixels, so sprites keep the same
    /// on-screen size on displays denser than the cap.
    pub fn render_size(&self) -> Vec2 {
        self.logical_size() * self.pixel_ratio().min(MAX_PIXEL_RATIO) as f32
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassKind {
    /// Full-screen light scatter, additive.
    VolumetricLight,
    /// Instanced point sprites, alpha blended.
    PointCloud,
    /// Full-screen expanding rings, additive.
    PulseRing,
}

/// Uniform inputs for one frame. Recomputed from scratch every frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameState {
    pub time: f32,
    pub scroll: f32,
    pub morph: f32,
    pub camera: CameraPose,
    /// Projection * view, OpenGL depth convention.
    pub view_proj: Mat4,
    pub object_model: Mat4,
    pub object_scale: f32,
    pub focal: Vec3,
    pub focal_screen: Vec2,
    pub back_light: Vec3,
    pub back_light_screen: Vec2,
    /// Logical resolution.
    pub resolution: Vec2,
    /// Sprite pixel grid, see [`Viewport::render_size`].
    pub viewport_px: Vec2,
    pub pulse_ring: bool,
}

impl FrameState {
    /// Evaluates the scene for one frame. `None` for a zero-sized viewport:
    /// the host should skip the frame and retry on the next callback.
    pub fn evaluate(state: &AnimationState, viewport: &Viewport) -> Option<Self> {
        if viewport.is_empty() {
            return None;
        }

        let scroll = state.scroll_progress();
        let focal = animation::helix_position(scroll);
        let camera = animation::camera_pose(state, focal);
        let view_proj = animation::projection(viewport.aspect()) * camera.view();
        let back_light = animation::back_light_position(focal, camera.eye);

        Some(Self {
            time: state.elapsed(),
            scroll,
            morph: animation::morph(scroll),
            camera,
            view_proj,
            object_model: animation::object_model(state, focal),
            object_scale: animation::object_scale(scroll),
            focal,
            focal_screen: project_to_screen(focal, &view_proj),
            back_light,
            back_light_screen: project_to_screen(back_light, &view_proj),
            resolution: viewport.logical_size(),
            viewport_px: viewport.render_size(),
            pulse_ring: scroll > PULSE_RING_THRESHOLD,
        })
    }

    /// `view_proj` with depth remapped for wgpu clip space.
    pub fn clip_view_proj(&self) -> Mat4 {
        OPENGL_TO_WGPU_MATRIX * self.view_proj
    }

    /// Passes to draw this frame, in order.
    pub fn passes(&self) -> SmallVec<[PassKind; 3]> {
        let mut passes = SmallVec::new();
        passes.push(PassKind::VolumetricLight);
        passes.push(PassKind::PointCloud);
        if self.pulse_ring {
            passes.push(PassKind::PulseRing);
        }
        passes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::{HELIX_BOTTOM_Y, HELIX_SWAY_Z, HELIX_TOP_Y};

    fn viewport() -> Viewport {
        Viewport::new(1920, 1080, 2.0)
    }

    fn frame(scroll: f32) -> FrameState {
        let state = AnimationState::new(scroll, 12.5, Vec2::new(0.7, 0.4));
        FrameState::evaluate(&state, &viewport()).unwrap()
    }

    #[test]
    fn zero_viewport_skips_frame() {
        let state = AnimationState::default();
        assert!(FrameState::evaluate(&state, &Viewport::new(0, 720, 1.0)).is_none());
        assert!(FrameState::evaluate(&state, &Viewport::new(1280, 0, 1.0)).is_none());
    }

    #[test]
    fn scroll_start() {
        let f = frame(0.0);
        assert!(f.focal.abs_diff_eq(Vec3::new(0.0, HELIX_TOP_Y, 0.0), 1e-6));
        assert_eq!(f.morph, 0.0);
        assert!(!f.pulse_ring);
        assert_eq!(
            f.passes().as_slice(),
            &[PassKind::VolumetricLight, PassKind::PointCloud]
        );
    }

    #[test]
    fn scroll_midpoint() {
        let f = frame(0.5);
        assert_eq!(f.morph, 1.0);
        assert!((f.focal.y - (HELIX_TOP_Y + HELIX_BOTTOM_Y) * 0.5).abs() < 1e-5);
        // Widest point of the loop.
        assert!((f.focal.length_squared() - f.focal.y * f.focal.y - HELIX_SWAY_Z * HELIX_SWAY_Z).abs() < 1e-4);
        assert!(f.pulse_ring);
        assert_eq!(
            f.passes().as_slice(),
            &[PassKind::VolumetricLight, PassKind::PointCloud, PassKind::PulseRing]
        );
    }

    #[test]
    fn scroll_end() {
        let f = frame(1.0);
        assert!(f.focal.abs_diff_eq(Vec3::new(0.0, HELIX_BOTTOM_Y, 0.0), 1e-5));
        assert!((f.object_scale - 1.8).abs() < 1e-6);

        // Fully pulled in: height 1.3 above focal, distance 3.5 plus drift.
        let offset = f.camera.eye - f.focal;
        assert!((offset.y - 1.3).abs() < 1e-5);
        assert!((offset.z - 3.5).abs() <= 0.12 + 1e-5);
    }

    #[test]
    fn pulse_threshold_is_strict() {
        assert!(!frame(PULSE_RING_THRESHOLD).pulse_ring);
        assert!(frame(PULSE_RING_THRESHOLD + 0.001).pulse_ring);
    }

    #[test]
    fn focal_point_projects_near_screen_center() {
        for i in 0..=20 {
            let f = frame(i as f32 / 20.0);
            let s = f.focal_screen;
            assert!(s.is_finite());
            assert!((0.2..0.8).contains(&s.x) && (0.2..0.8).contains(&s.y), "{s:?}");
        }
    }

    #[test]
    fn back_light_is_behind_focal_from_the_eye() {
        let f = frame(0.3);
        let to_eye = (f.camera.eye - f.focal).normalize();
        let to_light = (f.back_light - f.focal).normalize();
        assert!(to_eye.dot(to_light) < -0.999);
    }

    #[test]
    fn resolution_is_logical_and_viewport_is_physical() {
        let f = frame(0.2);
        assert_eq!(f.resolution, Vec2::new(960.0, 540.0));
        assert_eq!(f.viewport_px, Vec2::new(1920.0, 1080.0));

        let odd = Viewport::new(800, 600, f64::NAN);
        assert_eq!(odd.logical_size(), Vec2::new(800.0, 600.0));
        assert_eq!(odd.render_size(), Vec2::new(800.0, 600.0));
    }

    #[test]
    fn dense_displays_cap_the_sprite_pixel_ratio() {
        let dense = Viewport::new(3000, 1500, 3.0);
        assert_eq!(dense.logical_size(), Vec2::new(1000.0, 500.0));
        assert_eq!(dense.render_size(), Vec2::new(2000.0, 1000.0));

        let f = FrameState::evaluate(&AnimationState::default(), &dense).unwrap();
        assert_eq!(f.resolution, Vec2::new(1000.0, 500.0));
        assert_eq!(f.viewport_px, Vec2::new(2000.0, 1000.0));

        let retina = Viewport::new(1920, 1080, 2.0);
        assert_eq!(retina.render_size(), retina.physical_size());
    }

    #[test]
    fn clip_matrix_only_touches_depth() {
        let f = frame(0.6);
        let p = f.focal.extend(1.0);
        let gl = f.view_proj * p;
        let wg = f.clip_view_proj() * p;
        assert!((gl.x - wg.x).abs() < 1e-5 && (gl.y - wg.y).abs() < 1e-5);
        assert!((gl.w - wg.w).abs() < 1e-5);
        assert!((wg.z - (gl.z + gl.w) * 0.5).abs() < 1e-4);
    }
}
