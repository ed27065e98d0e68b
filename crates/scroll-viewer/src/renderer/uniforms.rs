//! Uniform block layouts shared with the WGSL shaders.

use pointscape::FrameState;

/// Scene uniforms for the point-cloud pass.
/// Must match `Scene` in `point_cloud.wgsl`.
#[repr(C)]
#[derive(Clone, Copy, bytemuck::Pod, bytemuck::Zeroable, Debug, Default)]
pub struct SceneUniform {
    /// View-projection in wgpu clip space.
    pub view_proj: [[f32; 4]; 4],
    pub object_model: [[f32; 4]; 4],
    pub focal_pos: [f32; 3],
    pub time: f32,
    pub back_light_pos: [f32; 3],
    pub scroll: f32,
    pub eye_pos: [f32; 3],
    pub morph: f32,
    /// Logical resolution.
    pub resolution: [f32; 2],
    /// Physical pixels.
    pub viewport_px: [f32; 2],
}

/// Uniforms for the full-screen passes.
/// Must match `Screen` in `volumetric_light.wgsl` and `pulse_ring.wgsl`.
#[repr(C)]
#[derive(Clone, Copy, bytemuck::Pod, bytemuck::Zeroable, Debug, Default)]
pub struct ScreenUniform {
    pub focal_screen: [f32; 2],
    pub back_light_screen: [f32; 2],
    pub time: f32,
    pub scroll: f32,
    pub _pad: [f32; 2],
}

const _: [(); 192] = [(); std::mem::size_of::<SceneUniform>()];
const _: [(); 32] = [(); std::mem::size_of::<ScreenUniform>()];

impl SceneUniform {
    pub fn from_frame(frame: &FrameState) -> Self {
        Self {
            view_proj: frame.clip_view_proj().to_cols_array_2d(),
            object_model: frame.object_model.to_cols_array_2d(),
            focal_pos: frame.focal.to_array(),
            time: frame.time,
            back_light_pos: frame.back_light.to_array(),
            scroll: frame.scroll,
            eye_pos: frame.camera.eye.to_array(),
            morph: frame.morph,
            resolution: frame.resolution.to_array(),
            viewport_px: frame.viewport_px.to_array(),
        }
    }
}

impl ScreenUniform {
    pub fn from_frame(frame: &FrameState) -> Self {
        Self {
            focal_screen: frame.focal_screen.to_array(),
            back_light_screen: frame.back_light_screen.to_array(),
            time: frame.time,
            scroll: frame.scroll,
            _pad: [0.0; 2],
        }
    }
}
