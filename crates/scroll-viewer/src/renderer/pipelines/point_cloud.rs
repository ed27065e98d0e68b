use super::{ALPHA_BLEND, QUAD_CORNERS, QUAD_LAYOUT};
use crate::renderer::{context::with_validation_scope, uniforms::SceneUniform};
use pointscape::PointCloud;
use wgpu::util::DeviceExt;

/// Five per-point streams, written once at upload. Slot order matches the
/// `@location`s in `point_cloud.wgsl` (slot 0 is the quad).
pub struct PointBuffers {
    env_pos: wgpu::Buffer,
    object_pos: wgpu::Buffer,
    color: wgpu::Buffer,
    size: wgpu::Buffer,
    phase: wgpu::Buffer,
    pub count: u32,
}

impl PointBuffers {
    /// Uploads both clouds. Position streams come from their own cloud;
    /// color, size and phase from the environment cloud. Extra points in the
    /// longer cloud are not drawn.
    pub fn upload(device: &wgpu::Device, object: &PointCloud, environment: &PointCloud) -> Self {
        let count = object.len().min(environment.len());

        let make = |label: &str, bytes: &[u8]| {
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(label),
                contents: bytes,
                usage: wgpu::BufferUsages::VERTEX,
            })
        };

        Self {
            env_pos: make(
                "Env Position VB",
                bytemuck::cast_slice(&environment.positions[..count]),
            ),
            object_pos: make(
                "Object Position VB",
                bytemuck::cast_slice(&object.positions[..count]),
            ),
            color: make("Color VB", bytemuck::cast_slice(&environment.colors[..count])),
            size: make("Size VB", bytemuck::cast_slice(&environment.sizes[..count])),
            phase: make("Phase VB", bytemuck::cast_slice(&environment.phases[..count])),
            count: count as u32,
        }
    }
}

/// One tightly packed per-instance stream holding a single attribute.
const fn instance_layout(
    format: wgpu::VertexFormat,
    attributes: &'static [wgpu::VertexAttribute],
) -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: format.size(),
        step_mode: wgpu::VertexStepMode::Instance,
        attributes,
    }
}

const ENV_POS_ATTR: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![1 => Float32x3];
const OBJECT_POS_ATTR: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![2 => Float32x3];
const COLOR_ATTR: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![3 => Float32x3];
const SIZE_ATTR: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![4 => Float32];
const PHASE_ATTR: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![5 => Float32];

pub struct PointCloudPipeline {
    pipeline: wgpu::RenderPipeline,
    bind_group: wgpu::BindGroup,
}

impl PointCloudPipeline {
    pub fn new(
        device: &wgpu::Device,
        color_fmt: wgpu::TextureFormat,
        depth_fmt: wgpu::TextureFormat,
        scene_ubo: &wgpu::Buffer,
    ) -> Self {
        let layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Point Cloud Scene Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: wgpu::BufferSize::new(
                        std::mem::size_of::<SceneUniform>() as u64,
                    ),
                },
                count: None,
            }],
        });

        let vbuf_layouts = [
            QUAD_LAYOUT,
            instance_layout(wgpu::VertexFormat::Float32x3, &ENV_POS_ATTR),
            instance_layout(wgpu::VertexFormat::Float32x3, &OBJECT_POS_ATTR),
            instance_layout(wgpu::VertexFormat::Float32x3, &COLOR_ATTR),
            instance_layout(wgpu::VertexFormat::Float32, &SIZE_ATTR),
            instance_layout(wgpu::VertexFormat::Float32, &PHASE_ATTR),
        ];

        let pipeline = with_validation_scope(device, "PointCloudPipeline", || {
            let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some("shaders/point_cloud.wgsl"),
                source: wgpu::ShaderSource::Wgsl(
                    include_str!("../../../shaders/point_cloud.wgsl").into(),
                ),
            });

            let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("Point Cloud PipelineLayout"),
                bind_group_layouts: &[&layout],
                push_constant_ranges: &[],
            });

            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some("Point Cloud Pipeline"),
                layout: Some(&pipeline_layout),
                vertex: wgpu::VertexState {
                    module: &shader,
                    entry_point: "vs_main",
                    buffers: &vbuf_layouts,
                    compilation_options: wgpu::PipelineCompilationOptions::default(),
                },
                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    ..Default::default()
                },
                // Depth test on, writes off: points blend, never occlude.
                depth_stencil: Some(wgpu::DepthStencilState {
                    format: depth_fmt,
                    depth_write_enabled: false,
                    depth_compare: wgpu::CompareFunction::Less,
                    stencil: wgpu::StencilState::default(),
                    bias: wgpu::DepthBiasState::default(),
                }),
                fragment: Some(wgpu::FragmentState {
                    module: &shader,
                    entry_point: "fs_main",
                    targets: &[Some(wgpu::ColorTargetState {
                        format: color_fmt,
                        blend: Some(ALPHA_BLEND),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                    compilation_options: wgpu::PipelineCompilationOptions::default(),
                }),
                multisample: wgpu::MultisampleState::default(),
                multiview: None,
            })
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Point Cloud Scene Bind"),
            layout: &layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: scene_ubo.as_entire_binding(),
            }],
        });

        Self {
            pipeline,
            bind_group,
        }
    }

    pub fn draw<'a>(
        &'a self,
        rpass: &mut wgpu::RenderPass<'a>,
        quad_vb: &'a wgpu::Buffer,
        points: &'a PointBuffers,
    ) {
        rpass.set_pipeline(&self.pipeline);
        rpass.set_bind_group(0, &self.bind_group, &[]);
        rpass.set_vertex_buffer(0, quad_vb.slice(..));
        rpass.set_vertex_buffer(1, points.env_pos.slice(..));
        rpass.set_vertex_buffer(2, points.object_pos.slice(..));
        rpass.set_vertex_buffer(3, points.color.slice(..));
        rpass.set_vertex_buffer(4, points.size.slice(..));
        rpass.set_vertex_buffer(5, points.phase.slice(..));
        rpass.draw(0..QUAD_CORNERS.len() as u32, 0..points.count);
    }
}
