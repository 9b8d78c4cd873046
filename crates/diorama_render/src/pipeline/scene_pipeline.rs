//! Forward pipeline for lit and unlit scene geometry
//!
//! Bind groups:
//! - 0: per-frame uniforms (camera, lights, fog)
//! - 1: per-draw uniforms, one dynamic-offset slot per draw
//! - 2: diffuse texture and sampler

use std::num::NonZeroU64;

use wgpu::util::DeviceExt;

use super::types::{draw_slot_size, vertex_buffer_layout, DrawUniforms, FrameUniforms};
use crate::draw_list::PipelineKind;

/// Depth buffer format
pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Draw slots allocated up front
const INITIAL_DRAW_CAPACITY: usize = 128;

/// The three render pipelines plus their shared buffers
pub struct ScenePipeline {
    opaque: wgpu::RenderPipeline,
    double_sided: wgpu::RenderPipeline,
    transparent: wgpu::RenderPipeline,

    texture_layout: wgpu::BindGroupLayout,
    draw_layout: wgpu::BindGroupLayout,

    frame_buffer: wgpu::Buffer,
    frame_bind_group: wgpu::BindGroup,

    draw_buffer: wgpu::Buffer,
    draw_bind_group: wgpu::BindGroup,
    draw_capacity: usize,
    draw_slot: u64,

    depth_texture: Option<wgpu::TextureView>,
    depth_size: (u32, u32),
}

impl ScenePipeline {
    /// Create the pipelines for a surface format
    ///
    /// `min_uniform_alignment` is the device's `min_uniform_buffer_offset_alignment`.
    pub fn new(device: &wgpu::Device, surface_format: wgpu::TextureFormat, min_uniform_alignment: u32) -> Self {
        let frame_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Frame Bind Group Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let draw_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Draw Bind Group Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: true,
                    min_binding_size: NonZeroU64::new(std::mem::size_of::<DrawUniforms>() as u64),
                },
                count: None,
            }],
        });

        let texture_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Texture Bind Group Layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Scene Pipeline Layout"),
            bind_group_layouts: &[&frame_layout, &draw_layout, &texture_layout],
            push_constant_ranges: &[],
        });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Scene Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("../shaders/scene.wgsl").into()),
        });

        let build = |kind: PipelineKind| {
            create_pipeline(device, &pipeline_layout, &shader, surface_format, kind)
        };
        let opaque = build(PipelineKind::Opaque);
        let double_sided = build(PipelineKind::OpaqueDoubleSided);
        let transparent = build(PipelineKind::Transparent);

        let frame_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Frame Uniform Buffer"),
            contents: bytemuck::bytes_of(&FrameUniforms::default()),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let frame_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Frame Bind Group"),
            layout: &frame_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: frame_buffer.as_entire_binding(),
            }],
        });

        let draw_slot = draw_slot_size(min_uniform_alignment);
        let (draw_buffer, draw_bind_group) =
            create_draw_buffer(device, &draw_layout, draw_slot, INITIAL_DRAW_CAPACITY);

        Self {
            opaque,
            double_sided,
            transparent,
            texture_layout,
            draw_layout,
            frame_buffer,
            frame_bind_group,
            draw_buffer,
            draw_bind_group,
            draw_capacity: INITIAL_DRAW_CAPACITY,
            draw_slot,
            depth_texture: None,
            depth_size: (0, 0),
        }
    }

    /// Layout textures must use to bind at group 2
    pub fn texture_layout(&self) -> &wgpu::BindGroupLayout {
        &self.texture_layout
    }

    pub fn pipeline(&self, kind: PipelineKind) -> &wgpu::RenderPipeline {
        match kind {
            PipelineKind::Opaque => &self.opaque,
            PipelineKind::OpaqueDoubleSided => &self.double_sided,
            PipelineKind::Transparent => &self.transparent,
        }
    }

    pub fn frame_bind_group(&self) -> &wgpu::BindGroup {
        &self.frame_bind_group
    }

    pub fn draw_bind_group(&self) -> &wgpu::BindGroup {
        &self.draw_bind_group
    }

    /// Upload the per-frame uniforms
    pub fn update_frame(&self, queue: &wgpu::Queue, uniforms: &FrameUniforms) {
        queue.write_buffer(&self.frame_buffer, 0, bytemuck::bytes_of(uniforms));
    }

    /// Upload per-draw uniforms, growing the buffer when needed
    ///
    /// Draw `i` is bound later with [`Self::draw_offset`]`(i)`.
    pub fn write_draws(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, draws: &[DrawUniforms]) {
        if draws.is_empty() {
            return;
        }

        if draws.len() > self.draw_capacity {
            let capacity = draws.len().next_power_of_two();
            let (buffer, bind_group) = create_draw_buffer(device, &self.draw_layout, self.draw_slot, capacity);
            self.draw_buffer = buffer;
            self.draw_bind_group = bind_group;
            self.draw_capacity = capacity;
            log::debug!("Draw uniform buffer grown to {} slots", capacity);
        }

        let slot = self.draw_slot as usize;
        let mut bytes = vec![0u8; draws.len() * slot];
        for (chunk, draw) in bytes.chunks_exact_mut(slot).zip(draws) {
            let data = bytemuck::bytes_of(draw);
            chunk[..data.len()].copy_from_slice(data);
        }
        queue.write_buffer(&self.draw_buffer, 0, &bytes);
    }

    /// Dynamic offset of draw slot `index`
    pub fn draw_offset(&self, index: usize) -> u32 {
        (index as u64 * self.draw_slot) as u32
    }

    /// Ensure depth texture exists and is the right size
    pub fn ensure_depth_texture(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        let (width, height) = (width.max(1), height.max(1));
        if self.depth_texture.is_none() || self.depth_size != (width, height) {
            let depth_texture = device.create_texture(&wgpu::TextureDescriptor {
                label: Some("Depth Texture"),
                size: wgpu::Extent3d {
                    width,
                    height,
                    depth_or_array_layers: 1,
                },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: DEPTH_FORMAT,
                usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
                view_formats: &[],
            });

            self.depth_texture = Some(depth_texture.create_view(&wgpu::TextureViewDescriptor::default()));
            self.depth_size = (width, height);
        }
    }

    /// Current depth view, if [`Self::ensure_depth_texture`] has run
    pub fn depth_view(&self) -> Option<&wgpu::TextureView> {
        self.depth_texture.as_ref()
    }
}

fn create_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    shader: &wgpu::ShaderModule,
    surface_format: wgpu::TextureFormat,
    kind: PipelineKind,
) -> wgpu::RenderPipeline {
    let (label, cull_mode, blend, depth_write) = match kind {
        PipelineKind::Opaque => ("Opaque Pipeline", Some(wgpu::Face::Back), wgpu::BlendState::REPLACE, true),
        PipelineKind::OpaqueDoubleSided => ("Double Sided Pipeline", None, wgpu::BlendState::REPLACE, true),
        PipelineKind::Transparent => ("Transparent Pipeline", None, wgpu::BlendState::ALPHA_BLENDING, false),
    };

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some("vs_main"),
            buffers: &[vertex_buffer_layout()],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format: surface_format,
                blend: Some(blend),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode,
            unclipped_depth: false,
            polygon_mode: wgpu::PolygonMode::Fill,
            conservative: false,
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: DEPTH_FORMAT,
            depth_write_enabled: depth_write,
            depth_compare: wgpu::CompareFunction::LessEqual,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState {
            count: 1,
            mask: !0,
            alpha_to_coverage_enabled: false,
        },
        multiview: None,
        cache: None,
    })
}

fn create_draw_buffer(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    slot: u64,
    capacity: usize,
) -> (wgpu::Buffer, wgpu::BindGroup) {
    let buffer = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Draw Uniform Buffer"),
        size: slot * capacity as u64,
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    });

    let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("Draw Bind Group"),
        layout,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                buffer: &buffer,
                offset: 0,
                size: NonZeroU64::new(std::mem::size_of::<DrawUniforms>() as u64),
            }),
        }],
    });

    (buffer, bind_group)
}
