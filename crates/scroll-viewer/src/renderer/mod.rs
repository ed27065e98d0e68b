//! The render orchestrator. Owns the GPU context and depth target; draws a
//! frame from a [`FrameState`] and the scene's [`RenderResources`].

pub mod context;
pub mod pipelines;
pub mod resources;
pub mod targets;
pub mod uniforms;

use self::{
    context::GfxContext,
    resources::RenderResources,
    targets::Targets,
    uniforms::{SceneUniform, ScreenUniform},
};
use pointscape::{frame::CLEAR_COLOR, FrameState, PassKind};
use std::sync::Arc;
use winit::window::Window;

fn clear_color() -> wgpu::Color {
    let [r, g, b, a] = CLEAR_COLOR;
    wgpu::Color { r, g, b, a }
}

pub struct Renderer {
    pub gfx: GfxContext,
    pub targets: Targets,
}

impl Renderer {
    pub async fn new(window: Arc<Window>) -> anyhow::Result<Self> {
        let gfx = GfxContext::new(window).await?;
        let targets = Targets::new(&gfx.device, gfx.size);
        Ok(Self { gfx, targets })
    }

    pub fn color_format(&self) -> wgpu::TextureFormat {
        self.gfx.config.format
    }

    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        self.gfx.resize(new_size);
        if new_size.width > 0 && new_size.height > 0 {
            self.targets.resize(&self.gfx.device, new_size);
        }
    }

    /// Uploads this frame's uniforms and draws the planned passes in order.
    pub fn render_frame(
        &self,
        frame: &FrameState,
        res: &RenderResources,
    ) -> Result<(), wgpu::SurfaceError> {
        let queue = &self.gfx.queue;
        queue.write_buffer(
            &res.scene_ubo,
            0,
            bytemuck::bytes_of(&SceneUniform::from_frame(frame)),
        );
        queue.write_buffer(
            &res.screen_ubo,
            0,
            bytemuck::bytes_of(&ScreenUniform::from_frame(frame)),
        );

        self.encode_and_present("Scene Pass", Some((frame, res)))
    }

    /// Clears the frame and draws nothing; used while loading or after a
    /// failed load.
    pub fn clear_frame(&self) -> Result<(), wgpu::SurfaceError> {
        self.encode_and_present("Clear Pass", None)
    }

    fn encode_and_present(
        &self,
        label: &str,
        scene: Option<(&FrameState, &RenderResources)>,
    ) -> Result<(), wgpu::SurfaceError> {
        let output = self.gfx.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .gfx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Frame Encoder"),
            });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some(label),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(clear_color()),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.targets.depth,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Discard,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            if let Some((frame, res)) = scene {
                for kind in frame.passes() {
                    match kind {
                        PassKind::VolumetricLight => res.volumetric.draw(&mut pass, &res.quad_vb),
                        PassKind::PointCloud => {
                            res.point_cloud.draw(&mut pass, &res.quad_vb, &res.points)
                        }
                        PassKind::PulseRing => res.pulse_ring.draw(&mut pass, &res.quad_vb),
                    }
                }
            }
        }

        self.gfx.queue.submit(std::iter::once(encoder.finish()));
        output.present();
        Ok(())
    }
}
