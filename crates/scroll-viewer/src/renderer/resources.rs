//! Everything the passes read, created once when the scene is ready.

use super::{
    pipelines::{
        point_cloud::{PointBuffers, PointCloudPipeline},
        screen_pass::{PulseRingPass, VolumetricLightPass},
        QUAD_CORNERS,
    },
    uniforms::{SceneUniform, ScreenUniform},
};
use crate::loader::LoadedScene;
use wgpu::util::DeviceExt;

/// GPU handles for a loaded scene. Buffers other than the two uniform
/// blocks are never written after construction.
pub struct RenderResources {
    pub(super) quad_vb: wgpu::Buffer,
    pub(super) points: PointBuffers,
    pub(super) scene_ubo: wgpu::Buffer,
    pub(super) screen_ubo: wgpu::Buffer,
    pub(super) volumetric: VolumetricLightPass,
    pub(super) point_cloud: PointCloudPipeline,
    pub(super) pulse_ring: PulseRingPass,
}

impl RenderResources {
    pub fn initialize(
        device: &wgpu::Device,
        color_fmt: wgpu::TextureFormat,
        depth_fmt: wgpu::TextureFormat,
        scene: &LoadedScene,
    ) -> Self {
        let quad_vb = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Shared Quad VB"),
            contents: bytemuck::cast_slice(&QUAD_CORNERS),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let scene_ubo = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Scene UBO"),
            size: std::mem::size_of::<SceneUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let screen_ubo = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Screen UBO"),
            size: std::mem::size_of::<ScreenUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let points = PointBuffers::upload(device, &scene.object, &scene.environment);
        log::info!("uploaded {} points per stream", points.count);

        Self {
            volumetric: VolumetricLightPass::new(device, color_fmt, depth_fmt, &screen_ubo),
            point_cloud: PointCloudPipeline::new(device, color_fmt, depth_fmt, &scene_ubo),
            pulse_ring: PulseRingPass::new(device, color_fmt, depth_fmt, &screen_ubo),
            quad_vb,
            points,
            scene_ubo,
            screen_ubo,
        }
    }

    pub fn point_count(&self) -> u32 {
        self.points.count
    }
}
