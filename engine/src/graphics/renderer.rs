//! Main renderer implementation
//!
//! The Renderer struct orchestrates all rendering operations, managing
//! render pipelines, GPU resources, and the rendering of entities.
//!
//! GPU copies of meshes, materials and textures are created lazily from the
//! [`AssetRegistry`] the first time an entity needs them.

use crate::core::camera::Camera;
use crate::core::entity::{Entity, GlobalTransform, Visible, World};
use crate::graphics::{
    assets::{AssetRegistry, Fallback, MaterialId, MeshId, TextureId},
    context::RenderContext,
    lighting::SceneLights,
    material::MaterialUniform,
    mesh::Mesh,
    pipeline::{PipelineKey, SceneLayouts, ScenePipelines},
    render_target::{BlitPass, RenderTarget, SCENE_FORMAT},
    texture::{create_sampler, ColorSpace, GpuTexture, SamplerOptions, TextureData},
    uniform::{FrameUniform, ObjectUniform, UniformBuffer},
};
use glam::Mat4;
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::{debug, info, trace, warn};
use wgpu::util::DeviceExt;

/// GPU resources for a mesh
struct MeshGpuData {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    num_indices: u32,
}

/// GPU resources for a material
struct MaterialGpuData {
    _uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    key: PipelineKey,
}

/// Per-entity uniform buffer, kept across frames
struct ObjectGpuData {
    buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

/// One entity queued for drawing
#[derive(Debug, Clone, PartialEq)]
pub struct DrawItem {
    pub entity: Entity,
    pub mesh: MeshId,
    pub material: MaterialId,
    pub key: PipelineKey,
    /// Normalised device depth of the entity origin
    pub depth: f32,
}

/// Put opaque draws first, nearest first, then transparent draws farthest first
pub fn order_draws(draws: &mut [DrawItem]) {
    draws.sort_by(|a, b| match (a.key.transparent, b.key.transparent) {
        (false, true) => Ordering::Less,
        (true, false) => Ordering::Greater,
        (false, false) => a.depth.total_cmp(&b.depth),
        (true, true) => b.depth.total_cmp(&a.depth),
    });
}

fn texture_view<'a>(
    textures: &'a HashMap<TextureId, GpuTexture>,
    slot: Option<&TextureId>,
    fallback: &'a GpuTexture,
) -> &'a wgpu::TextureView {
    slot.and_then(|t| textures.get(t))
        .map(|t| &t.view)
        .unwrap_or(&fallback.view)
}

/// Main renderer that manages all rendering operations
pub struct Renderer {
    /// Render context with device and queue
    context: Arc<RenderContext>,
    layouts: SceneLayouts,
    pipelines: ScenePipelines,
    /// Off-screen scene colour and depth
    target: RenderTarget,
    blit: BlitPass,
    frame_buffer: wgpu::Buffer,
    frame_bind_group: wgpu::BindGroup,
    meshes: HashMap<MeshId, MeshGpuData>,
    materials: HashMap<MaterialId, MaterialGpuData>,
    textures: HashMap<TextureId, GpuTexture>,
    samplers: HashMap<SamplerOptions, wgpu::Sampler>,
    objects: HashMap<Entity, ObjectGpuData>,
    white: GpuTexture,
    flat_normal: GpuTexture,
    /// Ids already reported missing, so each is logged once
    reported_missing: HashSet<String>,
}

impl Renderer {
    /// Create a new renderer drawing at `render_size` and presenting to `output_format`
    pub fn new(
        context: Arc<RenderContext>,
        output_format: wgpu::TextureFormat,
        render_size: (u32, u32),
    ) -> Self {
        info!(size = ?render_size, format = ?output_format, "Initializing renderer");
        let device = &context.device;

        let layouts = SceneLayouts::new(device);
        let pipelines = ScenePipelines::new(device, &layouts, SCENE_FORMAT);
        let target = RenderTarget::new(device, render_size.0, render_size.1, SCENE_FORMAT);
        let blit = BlitPass::new(device, &target, output_format);

        let frame_buffer =
            FrameUniform::default().create_buffer(device, Some("Frame Uniform Buffer"));
        let frame_bind_group = SceneLayouts::uniform_bind_group(
            device,
            &layouts.frame,
            &frame_buffer,
            "Frame Bind Group",
        );

        let white = GpuTexture::upload(
            device,
            &context.queue,
            "Fallback White",
            &TextureData::solid(Fallback::WHITE),
            ColorSpace::Linear,
            SamplerOptions::default(),
        );
        let flat_normal = GpuTexture::upload(
            device,
            &context.queue,
            "Fallback Normal",
            &TextureData::solid(Fallback::FLAT_NORMAL),
            ColorSpace::Linear,
            SamplerOptions::default(),
        );

        Self {
            context,
            layouts,
            pipelines,
            target,
            blit,
            frame_buffer,
            frame_bind_group,
            meshes: HashMap::new(),
            materials: HashMap::new(),
            textures: HashMap::new(),
            samplers: HashMap::new(),
            objects: HashMap::new(),
            white,
            flat_normal,
            reported_missing: HashSet::new(),
        }
    }

    /// Resize the off-screen target
    pub fn resize(&mut self, width: u32, height: u32) {
        if self.target.resize(&self.context.device, width, height) {
            self.blit.rebind(&self.context.device, &self.target);
        }
    }

    pub fn render_size(&self) -> (u32, u32) {
        self.target.size
    }

    fn report_missing(&mut self, kind: &str, name: &str) {
        if self.reported_missing.insert(format!("{kind}:{name}")) {
            warn!(kind, name, "Asset not registered, skipping");
        }
    }

    /// Upload a mesh to the GPU
    fn upload_mesh(&mut self, mesh: &Mesh, id: &MeshId) {
        let device = &self.context.device;
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{} Vertex Buffer", id.0)),
            contents: bytemuck::cast_slice(&mesh.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{} Index Buffer", id.0)),
            contents: bytemuck::cast_slice(&mesh.indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        self.meshes.insert(
            id.clone(),
            MeshGpuData {
                vertex_buffer,
                index_buffer,
                num_indices: mesh.indices.len() as u32,
            },
        );

        info!(
            name = %id.0,
            vertices = mesh.vertices.len(),
            indices = mesh.indices.len(),
            "Uploaded mesh to GPU"
        );
    }

    fn ensure_mesh(&mut self, assets: &AssetRegistry, id: &MeshId) -> bool {
        if self.meshes.contains_key(id) {
            return true;
        }
        match assets.mesh(id) {
            Some(mesh) => {
                self.upload_mesh(mesh, id);
                true
            }
            None => {
                self.report_missing("mesh", &id.0);
                false
            }
        }
    }

    fn ensure_texture(&mut self, assets: &AssetRegistry, id: &TextureId) {
        if self.textures.contains_key(id) {
            return;
        }
        let Some(asset) = assets.texture(id) else {
            self.report_missing("texture", &id.0);
            return;
        };

        let texture = GpuTexture::upload(
            &self.context.device,
            &self.context.queue,
            &id.0,
            &asset.data,
            asset.color_space,
            asset.sampler,
        );
        debug!(
            name = %id.0,
            width = asset.data.width,
            height = asset.data.height,
            "Uploaded texture to GPU"
        );
        self.textures.insert(id.clone(), texture);
    }

    fn ensure_sampler(&mut self, options: SamplerOptions) {
        let device = &self.context.device;
        self.samplers
            .entry(options)
            .or_insert_with(|| create_sampler(device, options));
    }

    fn ensure_material(&mut self, assets: &AssetRegistry, id: &MaterialId) -> bool {
        if self.materials.contains_key(id) {
            return true;
        }
        let Some(material) = assets.material(id) else {
            self.report_missing("material", &id.0);
            return false;
        };

        let slots = material.textures();
        for texture in slots.iter().flatten() {
            self.ensure_texture(assets, texture);
        }

        // The colour map has its own sampler; data maps share the first one's
        let color_options = slots[0]
            .and_then(|t| self.textures.get(t))
            .map(|t| t.sampler)
            .unwrap_or_default();
        let data_options = slots[1..]
            .iter()
            .flatten()
            .find_map(|t| self.textures.get(*t))
            .map(|t| t.sampler)
            .unwrap_or_default();
        self.ensure_sampler(color_options);
        self.ensure_sampler(data_options);

        let device = &self.context.device;
        let uniform_buffer =
            MaterialUniform::from(material).create_buffer(device, Some("Material Uniform Buffer"));

        let textures = &self.textures;
        let white = &self.white;
        let views = [
            texture_view(textures, slots[0], white),
            texture_view(textures, slots[1], white),
            texture_view(textures, slots[2], &self.flat_normal),
            texture_view(textures, slots[3], white),
            texture_view(textures, slots[4], white),
            texture_view(textures, slots[5], white),
        ];
        let (Some(color_sampler), Some(data_sampler)) = (
            self.samplers.get(&color_options),
            self.samplers.get(&data_options),
        ) else {
            return false;
        };

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(&format!("{} Material Bind Group", id.0)),
            layout: &self.layouts.material,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: uniform_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(views[0]),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(color_sampler),
                },
                wgpu::BindGroupEntry {
                    binding: 3,
                    resource: wgpu::BindingResource::TextureView(views[1]),
                },
                wgpu::BindGroupEntry {
                    binding: 4,
                    resource: wgpu::BindingResource::TextureView(views[2]),
                },
                wgpu::BindGroupEntry {
                    binding: 5,
                    resource: wgpu::BindingResource::TextureView(views[3]),
                },
                wgpu::BindGroupEntry {
                    binding: 6,
                    resource: wgpu::BindingResource::TextureView(views[4]),
                },
                wgpu::BindGroupEntry {
                    binding: 7,
                    resource: wgpu::BindingResource::TextureView(views[5]),
                },
                wgpu::BindGroupEntry {
                    binding: 8,
                    resource: wgpu::BindingResource::Sampler(data_sampler),
                },
            ],
        });

        let key = PipelineKey {
            transparent: material.transparent,
            double_sided: material.double_sided,
        };
        debug!(name = %id.0, key = ?key, "Created material bind group");
        self.materials.insert(
            id.clone(),
            MaterialGpuData {
                _uniform_buffer: uniform_buffer,
                bind_group,
                key,
            },
        );
        true
    }

    fn write_object_uniform(&mut self, entity: Entity, model: Mat4) {
        let uniform = ObjectUniform::new(model);
        if let Some(object) = self.objects.get(&entity) {
            uniform.update_buffer(&self.context.queue, &object.buffer);
            return;
        }

        let device = &self.context.device;
        let buffer = uniform.create_buffer(device, Some("Object Uniform Buffer"));
        let bind_group = SceneLayouts::uniform_bind_group(
            device,
            &self.layouts.object,
            &buffer,
            "Object Bind Group",
        );
        self.objects.insert(entity, ObjectGpuData { buffer, bind_group });
    }

    /// Record the scene and its copy onto `output` into `encoder`
    ///
    /// Uses the first entity carrying a [`Camera`]. Entities hidden through
    /// [`Visible`] are skipped. Returns the number of draw calls.
    pub fn render(
        &mut self,
        world: &World,
        assets: &AssetRegistry,
        encoder: &mut wgpu::CommandEncoder,
        output: &wgpu::TextureView,
    ) -> usize {
        let camera = world
            .query::<(&Camera, &GlobalTransform)>()
            .iter()
            .next()
            .map(|(_, (camera, transform))| (*camera, *transform));

        let view_proj = match camera {
            Some((camera, camera_transform)) => {
                let view_proj = camera.view_projection_matrix(&camera_transform);
                let lights = SceneLights::collect(world);
                FrameUniform::new(view_proj, camera_transform.position(), &lights)
                    .update_buffer(&self.context.queue, &self.frame_buffer);
                Some(view_proj)
            }
            None => {
                debug!("No camera in world, drawing empty frame");
                None
            }
        };

        let mut draws = Vec::new();
        if let Some(view_proj) = view_proj {
            let candidates: Vec<_> = world
                .query::<(&MeshId, &MaterialId, &GlobalTransform, Option<&Visible>)>()
                .iter()
                .filter(|(_, (_, _, _, visible))| visible.is_none_or(|v| v.0))
                .map(|(entity, (mesh, material, transform, _))| {
                    (entity, mesh.clone(), material.clone(), transform.matrix)
                })
                .collect();

            for (entity, mesh, material, model) in candidates {
                if !self.ensure_mesh(assets, &mesh) || !self.ensure_material(assets, &material) {
                    continue;
                }
                let Some(key) = self.materials.get(&material).map(|m| m.key) else {
                    continue;
                };
                self.write_object_uniform(entity, model);
                let depth = view_proj.project_point3(model.w_axis.truncate()).z;
                draws.push(DrawItem {
                    entity,
                    mesh,
                    material,
                    key,
                    depth,
                });
            }
        }

        // Drop buffers of entities that went away
        if self.objects.len() > draws.len() {
            let live: HashSet<Entity> = world
                .query::<&GlobalTransform>()
                .iter()
                .map(|(entity, _)| entity)
                .collect();
            self.objects.retain(|entity, _| live.contains(entity));
        }

        order_draws(&mut draws);

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &self.target.view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.target.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            render_pass.set_bind_group(0, &self.frame_bind_group, &[]);

            let mut current_key = None;
            for draw in &draws {
                let (Some(mesh), Some(material), Some(object)) = (
                    self.meshes.get(&draw.mesh),
                    self.materials.get(&draw.material),
                    self.objects.get(&draw.entity),
                ) else {
                    continue;
                };
                trace!(entity = ?draw.entity, mesh = %draw.mesh.0, "Drawing entity");

                if current_key != Some(draw.key) {
                    render_pass.set_pipeline(self.pipelines.get(draw.key));
                    current_key = Some(draw.key);
                }
                render_pass.set_bind_group(1, &object.bind_group, &[]);
                render_pass.set_bind_group(2, &material.bind_group, &[]);
                render_pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
                render_pass
                    .set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                render_pass.draw_indexed(0..mesh.num_indices, 0, 0..1);
            }
        }

        self.blit.draw(encoder, output);
        draws.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(index: u32, transparent: bool, depth: f32) -> DrawItem {
        let mut world = hecs::World::new();
        let mut entity = world.spawn(());
        for _ in 0..index {
            entity = world.spawn(());
        }
        DrawItem {
            entity,
            mesh: MeshId::new("mesh"),
            material: MaterialId::new(format!("material{index}")),
            key: PipelineKey {
                transparent,
                double_sided: false,
            },
            depth,
        }
    }

    #[test]
    fn test_opaque_before_transparent() {
        let mut draws = vec![item(0, true, 0.1), item(1, false, 0.9), item(2, true, 0.5)];
        order_draws(&mut draws);
        let transparent: Vec<bool> = draws.iter().map(|d| d.key.transparent).collect();
        assert_eq!(transparent, vec![false, true, true]);
    }

    #[test]
    fn test_transparent_back_to_front() {
        let mut draws = vec![item(0, true, 0.2), item(1, true, 0.8), item(2, true, 0.5)];
        order_draws(&mut draws);
        let depths: Vec<f32> = draws.iter().map(|d| d.depth).collect();
        assert_eq!(depths, vec![0.8, 0.5, 0.2]);
    }

    #[test]
    fn test_opaque_front_to_back() {
        let mut draws = vec![item(0, false, 0.7), item(1, false, 0.3)];
        order_draws(&mut draws);
        assert_eq!(draws[0].depth, 0.3);
        assert_eq!(draws[1].depth, 0.7);
    }
}
