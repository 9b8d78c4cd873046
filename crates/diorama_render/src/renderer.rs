//! Draws a [`SceneGraph`] through the [`ScenePipeline`]
//!
//! Meshes and textures are uploaded the first time a draw needs them and
//! cached by key. A texture whose revision changed (an async load replaced
//! a placeholder) is uploaded again. Cache entries whose keys no longer
//! exist in the graph are dropped.

use std::collections::HashMap;

use diorama_core::{MeshGroup, MeshKey, SceneGraph, TextureData, TextureKey};

use crate::camera::Camera3D;
use crate::draw_list::{build_draw_list, PipelineKind};
use crate::lights::Lighting;
use crate::mesh::GpuMesh;
use crate::pipeline::{DrawUniforms, FrameUniforms, ScenePipeline};
use crate::texture::GpuTexture;

/// A draw whose uniforms are already in the dynamic buffer
#[derive(Clone, Copy, Debug)]
struct PreparedDraw {
    kind: PipelineKind,
    mesh: MeshKey,
    group: MeshGroup,
    texture: Option<TextureKey>,
    slot: usize,
}

/// Scene renderer with lazily filled GPU caches
pub struct SceneRenderer {
    pipeline: ScenePipeline,
    meshes: HashMap<MeshKey, GpuMesh>,
    textures: HashMap<TextureKey, GpuTexture>,
    white: GpuTexture,
    draws: Vec<PreparedDraw>,
}

impl SceneRenderer {
    pub fn new(device: &wgpu::Device, queue: &wgpu::Queue, surface_format: wgpu::TextureFormat) -> Self {
        let alignment = device.limits().min_uniform_buffer_offset_alignment;
        let pipeline = ScenePipeline::new(device, surface_format, alignment);
        let white = GpuTexture::upload(device, queue, pipeline.texture_layout(), &TextureData::white());

        Self {
            pipeline,
            meshes: HashMap::new(),
            textures: HashMap::new(),
            white,
            draws: Vec::new(),
        }
    }

    /// Resize the depth buffer to match the surface
    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        self.pipeline.ensure_depth_texture(device, width, height);
    }

    /// Upload what this frame needs and write all uniforms
    pub fn prepare(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        graph: &SceneGraph,
        camera: &Camera3D,
        lighting: &Lighting,
    ) {
        self.evict_stale(graph);
        self.pipeline.update_frame(queue, &FrameUniforms::new(camera, lighting));

        let commands = build_draw_list(graph, camera.position);
        let mut uniforms = Vec::with_capacity(commands.len());
        self.draws.clear();

        for command in &commands {
            if !self.ensure_mesh(device, graph, command.mesh) {
                continue;
            }
            let texture = command
                .material
                .texture
                .filter(|&key| self.ensure_texture(device, queue, graph, key));

            self.draws.push(PreparedDraw {
                kind: command.kind,
                mesh: command.mesh,
                group: command.group,
                texture,
                slot: uniforms.len(),
            });
            uniforms.push(DrawUniforms::new(&command.world, &command.material));
        }

        self.pipeline.write_draws(device, queue, &uniforms);
    }

    /// Record the prepared draws into a render pass on `view`
    pub fn render(&self, encoder: &mut wgpu::CommandEncoder, view: &wgpu::TextureView, clear_color: wgpu::Color) {
        let Some(depth_view) = self.pipeline.depth_view() else {
            log::warn!("Depth texture missing; call resize before render");
            return;
        };

        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Scene Render Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(clear_color),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: depth_view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        render_pass.set_bind_group(0, self.pipeline.frame_bind_group(), &[]);

        let mut current_kind = None;
        for draw in &self.draws {
            let Some(mesh) = self.meshes.get(&draw.mesh) else { continue };

            if current_kind != Some(draw.kind) {
                render_pass.set_pipeline(self.pipeline.pipeline(draw.kind));
                current_kind = Some(draw.kind);
            }

            let texture = draw
                .texture
                .and_then(|key| self.textures.get(&key))
                .unwrap_or(&self.white);

            render_pass.set_bind_group(1, self.pipeline.draw_bind_group(), &[self.pipeline.draw_offset(draw.slot)]);
            render_pass.set_bind_group(2, &texture.bind_group, &[]);
            render_pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
            render_pass.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);

            let end = (draw.group.start + draw.group.count).min(mesh.index_count);
            render_pass.draw_indexed(draw.group.start..end, 0, 0..1);
        }
    }

    /// Draws recorded by the last [`Self::prepare`]
    pub fn draw_count(&self) -> usize {
        self.draws.len()
    }

    fn ensure_mesh(&mut self, device: &wgpu::Device, graph: &SceneGraph, key: MeshKey) -> bool {
        if self.meshes.contains_key(&key) {
            return true;
        }
        let Some(data) = graph.mesh(key) else { return false };
        self.meshes.insert(key, GpuMesh::upload(device, data, "Scene Mesh"));
        log::debug!("Uploaded mesh {:?} ({} triangles)", key, data.triangle_count());
        true
    }

    fn ensure_texture(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        graph: &SceneGraph,
        key: TextureKey,
    ) -> bool {
        let Some(data) = graph.texture(key) else { return false };
        let fresh = self
            .textures
            .get(&key)
            .is_some_and(|gpu| gpu.revision == data.revision);

        if !fresh {
            let gpu = GpuTexture::upload(device, queue, self.pipeline.texture_layout(), data);
            self.textures.insert(key, gpu);
            log::debug!("Uploaded texture {:?} ({}x{}, revision {})", key, data.width, data.height, data.revision);
        }
        true
    }

    fn evict_stale(&mut self, graph: &SceneGraph) {
        self.meshes.retain(|&key, _| graph.mesh(key).is_some());
        self.textures.retain(|&key, _| graph.texture(key).is_some());
    }
}
