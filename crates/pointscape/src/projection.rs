//! World-to-screen projection for the screen-space passes.

use glam::{Mat4, Vec2, Vec3};

/// Smallest clip-space |w| used as a divisor.
pub const MIN_CLIP_W: f32 = 1e-4;

/// Projects a world point through `view_proj` to normalized screen
/// coordinates: (0, 0) bottom-left, (1, 1) top-right.
///
/// A clip `w` closer to zero than [`MIN_CLIP_W`] is clamped to that
/// magnitude, keeping its sign (zero counts as positive).
pub fn project_to_screen(point: Vec3, view_proj: &Mat4) -> Vec2 {
    let clip = *view_proj * point.extend(1.0);

    let w = if clip.w.abs() < MIN_CLIP_W {
        MIN_CLIP_W.copysign(clip.w)
    } else {
        clip.w
    };

    Vec2::new(clip.x / w, clip.y / w) * 0.5 + Vec2::splat(0.5)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{look_at, perspective};

    fn camera() -> Mat4 {
        perspective(std::f32::consts::PI / 3.2, 1.5, 0.1, 60.0)
            * look_at(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0), Vec3::Y)
    }

    #[test]
    fn point_on_axis_is_centered() {
        let vp = camera();
        for d in [0.5, 1.0, 10.0, 50.0] {
            let s = project_to_screen(Vec3::new(0.0, 0.0, -d), &vp);
            assert!(s.abs_diff_eq(Vec2::splat(0.5), 1e-6));
        }
    }

    #[test]
    fn offset_point_converges_to_center_with_distance() {
        let vp = camera();
        let mut prev = f32::INFINITY;
        for d in [1.0, 2.0, 4.0, 8.0, 16.0, 32.0, 64.0, 1000.0] {
            let s = project_to_screen(Vec3::new(0.3, -0.2, -d), &vp);
            let off = (s - Vec2::splat(0.5)).length();
            assert!(off < prev, "d={d}: {off} !< {prev}");
            prev = off;
        }
        assert!(prev < 1e-3);
    }

    #[test]
    fn orientation_matches_screen_axes() {
        let vp = camera();
        let right_up = project_to_screen(Vec3::new(0.5, 0.5, -3.0), &vp);
        assert!(right_up.x > 0.5 && right_up.y > 0.5);
    }

    #[test]
    fn near_zero_w_is_clamped_and_finite() {
        let vp = camera();
        // On the eye plane: clip w == 0.
        for p in [Vec3::new(1.0, 1.0, 0.0), Vec3::new(-2.0, 0.5, 1e-7), Vec3::ZERO] {
            let s = project_to_screen(p, &vp);
            assert!(s.is_finite(), "{p:?} -> {s:?}");
        }

        // Sign is preserved: a point just behind the eye flips to the other side.
        let front = project_to_screen(Vec3::new(1.0, 0.0, -5e-5), &vp);
        let behind = project_to_screen(Vec3::new(1.0, 0.0, 5e-5), &vp);
        assert!(front.x > 0.5 && behind.x < 0.5);
    }
}
