//! Full-screen passes: additive, no depth test, driven by `ScreenUniform`.

use super::{ADDITIVE_BLEND, QUAD_CORNERS, QUAD_LAYOUT};
use crate::renderer::{context::with_validation_scope, uniforms::ScreenUniform};

pub struct VolumetricLightPass {
    pipeline: wgpu::RenderPipeline,
    bind_group: wgpu::BindGroup,
}

pub struct PulseRingPass {
    pipeline: wgpu::RenderPipeline,
    bind_group: wgpu::BindGroup,
}

macro_rules! create_screen_pass {
    ($name:ident, $shader:expr) => {
        impl $name {
            pub fn new(
                device: &wgpu::Device,
                color_fmt: wgpu::TextureFormat,
                depth_fmt: wgpu::TextureFormat,
                screen_ubo: &wgpu::Buffer,
            ) -> Self {
                let layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                    label: Some(concat!(stringify!($name), " Layout")),
                    entries: &[wgpu::BindGroupLayoutEntry {
                        binding: 0,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Buffer {
                            ty: wgpu::BufferBindingType::Uniform,
                            has_dynamic_offset: false,
                            min_binding_size: wgpu::BufferSize::new(
                                std::mem::size_of::<ScreenUniform>() as u64,
                            ),
                        },
                        count: None,
                    }],
                });

                let pipeline = with_validation_scope(device, stringify!($name), || {
                    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
                        label: Some($shader),
                        source: wgpu::ShaderSource::Wgsl(
                            include_str!(concat!("../../../shaders/", $shader)).into(),
                        ),
                    });

                    let pipe_layout =
                        device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                            label: Some(concat!(stringify!($name), " PipelineLayout")),
                            bind_group_layouts: &[&layout],
                            push_constant_ranges: &[],
                        });

                    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                        label: Some(concat!(stringify!($name), " Pipeline")),
                        layout: Some(&pipe_layout),
                        vertex: wgpu::VertexState {
                            module: &shader,
                            entry_point: "vs_main",
                            buffers: &[QUAD_LAYOUT],
                            compilation_options: wgpu::PipelineCompilationOptions::default(),
                        },
                        fragment: Some(wgpu::FragmentState {
                            module: &shader,
                            entry_point: "fs_main",
                            targets: &[Some(wgpu::ColorTargetState {
                                format: color_fmt,
                                blend: Some(ADDITIVE_BLEND),
                                write_mask: wgpu::ColorWrites::ALL,
                            })],
                            compilation_options: wgpu::PipelineCompilationOptions::default(),
                        }),
                        primitive: wgpu::PrimitiveState::default(),
                        // Depth test off: always pass, never write.
                        depth_stencil: Some(wgpu::DepthStencilState {
                            format: depth_fmt,
                            depth_write_enabled: false,
                            depth_compare: wgpu::CompareFunction::Always,
                            stencil: wgpu::StencilState::default(),
                            bias: wgpu::DepthBiasState::default(),
                        }),
                        multisample: wgpu::MultisampleState::default(),
                        multiview: None,
                    })
                });

                let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
                    label: Some(concat!(stringify!($name), " Bind")),
                    layout: &layout,
                    entries: &[wgpu::BindGroupEntry {
                        binding: 0,
                        resource: screen_ubo.as_entire_binding(),
                    }],
                });

                Self {
                    pipeline,
                    bind_group,
                }
            }

            pub fn draw<'a>(&'a self, rpass: &mut wgpu::RenderPass<'a>, quad_vb: &'a wgpu::Buffer) {
                rpass.set_pipeline(&self.pipeline);
                rpass.set_bind_group(0, &self.bind_group, &[]);
                rpass.set_vertex_buffer(0, quad_vb.slice(..));
                rpass.draw(0..QUAD_CORNERS.len() as u32, 0..1);
            }
        }
    };
}

create_screen_pass!(VolumetricLightPass, "volumetric_light.wgsl");
create_screen_pass!(PulseRingPass, "pulse_ring.wgsl");
