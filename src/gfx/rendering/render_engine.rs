//! WGPU-based rendering engine for scrollscape
//!
//! Uploads scene geometry, materials and textures on demand and draws the scene
//! in one pass: backdrop first, then lit meshes, then helper lines.

use std::{collections::HashMap, sync::Arc};

use wgpu::util::DeviceExt;

use crate::error::{Error, Result};
use crate::gfx::{
    camera::perspective::PerspectiveCamera,
    resources::{
        material::MaterialUniform,
        texture::{Texture, TextureId},
        texture_resource::{ColorSpace, TextureResource},
        MaterialId,
    },
    scene::{GeometryId, Scene, SceneId},
};
use crate::wgpu_utils::{binding_types, UniformBuffer};

use super::{
    frame::{collect_frame, DrawItem, DrawKind, FrameUniform, NodeUniform, SceneLights, MAX_LIGHTS},
    pipeline_manager::{PipelineConfig, PipelineManager},
    Renderer,
};

const MESH_PIPELINE: &str = "Mesh";
const LINES_PIPELINE: &str = "Lines";
const BACKGROUND_PIPELINE: &str = "Background";

struct GpuGeometry {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
}

struct GpuMaterial {
    uniform: UniformBuffer<MaterialUniform>,
    bind_group: wgpu::BindGroup,
    /// Uploaded textures currently bound as (map, normal map); `None` means the fallback
    bound: (Option<TextureId>, Option<TextureId>),
}

struct GpuNode {
    uniform: UniformBuffer<NodeUniform>,
    bind_group: wgpu::BindGroup,
}

/// Core rendering engine managing GPU resources and draw calls
pub struct RenderEngine {
    surface: wgpu::Surface<'static>,
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    config: wgpu::SurfaceConfiguration,
    depth_texture: TextureResource,
    pipeline_manager: PipelineManager,

    frame_uniform: UniformBuffer<FrameUniform>,
    frame_bind_group: wgpu::BindGroup,
    node_layout: wgpu::BindGroupLayout,
    material_layout: wgpu::BindGroupLayout,
    background_layout: wgpu::BindGroupLayout,
    material_sampler: wgpu::Sampler,
    fallback_map: TextureResource,
    fallback_normal: TextureResource,

    // Caches for the scene last rendered
    scene_id: Option<SceneId>,
    geometries: HashMap<GeometryId, GpuGeometry>,
    materials: HashMap<MaterialId, GpuMaterial>,
    textures: HashMap<TextureId, TextureResource>,
    nodes: Vec<GpuNode>,
    background: Option<(TextureId, wgpu::BindGroup)>,
    draws: Vec<DrawItem>,
    warned_light_overflow: bool,

    logical_size: (u32, u32),
    pixel_ratio: f64,
}

impl RenderEngine {
    /// Creates a new render engine for the given window
    ///
    /// # Arguments
    /// * `window` - Window surface target for rendering
    /// * `width` - Initial surface width in physical pixels
    /// * `height` - Initial surface height in physical pixels
    ///
    /// # Errors
    /// Returns [`Error::Graphics`] if no surface, adapter or device can be created
    pub async fn new(
        window: impl Into<wgpu::SurfaceTarget<'static>>,
        width: u32,
        height: u32,
    ) -> Result<RenderEngine> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance
            .create_surface(window)
            .map_err(|e| Error::Graphics(format!("failed to create surface: {e}")))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| Error::Graphics(format!("failed to request adapter: {e}")))?;

        let info = adapter.get_info();
        log::info!("Using adapter {} ({:?})", info.name, info.backend);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("WGPU Device"),
                required_features: wgpu::Features::default(),
                required_limits: wgpu::Limits {
                    max_texture_dimension_2d: 8192,
                    ..wgpu::Limits::downlevel_defaults()
                },
                memory_hints: wgpu::MemoryHints::default(),
                trace: wgpu::Trace::Off,
            })
            .await
            .map_err(|e| Error::Graphics(format!("failed to request device: {e}")))?;
        let device = Arc::new(device);
        let queue = Arc::new(queue);

        let surface_capabilities = surface.get_capabilities(&adapter);
        let format = surface_capabilities
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| surface_capabilities.formats.first().copied())
            .ok_or_else(|| Error::Graphics("surface is not supported by the adapter".into()))?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: width.max(1),
            height: height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: surface_capabilities
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let depth_texture =
            TextureResource::create_depth_texture(&device, &config, "depth_texture");

        use wgpu::ShaderStages as Stages;
        let frame_layout = binding_types::create_layout(
            &device,
            "Frame Layout",
            &[(Stages::VERTEX | Stages::FRAGMENT, binding_types::uniform())],
        );
        let node_layout = binding_types::create_layout(
            &device,
            "Node Layout",
            &[(Stages::VERTEX | Stages::FRAGMENT, binding_types::uniform())],
        );
        let material_layout = binding_types::create_layout(
            &device,
            "Material Layout",
            &[
                (Stages::FRAGMENT, binding_types::uniform()),
                (Stages::FRAGMENT, binding_types::texture_2d()),
                (Stages::FRAGMENT, binding_types::texture_2d()),
                (
                    Stages::FRAGMENT,
                    binding_types::sampler(wgpu::SamplerBindingType::Filtering),
                ),
            ],
        );
        let background_layout = binding_types::create_layout(
            &device,
            "Background Layout",
            &[
                (Stages::FRAGMENT, binding_types::texture_2d()),
                (
                    Stages::FRAGMENT,
                    binding_types::sampler(wgpu::SamplerBindingType::Filtering),
                ),
            ],
        );

        let frame_uniform = UniformBuffer::new_with_data(
            &device,
            &FrameUniform::new(
                &PerspectiveCamera::new(75.0, 1.0, 0.1, 1000.0),
                &SceneLights::default(),
            ),
        );
        let frame_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Frame Bind Group"),
            layout: &frame_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: frame_uniform.binding_resource(),
            }],
        });

        let material_sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Material Sampler"),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });
        let fallback_map = TextureResource::create_solid(
            &device,
            &queue,
            [255, 255, 255, 255],
            "Fallback Map",
            ColorSpace::Srgb,
        );
        let fallback_normal = TextureResource::create_solid(
            &device,
            &queue,
            [128, 128, 255, 255],
            "Fallback Normal Map",
            ColorSpace::Linear,
        );

        let mut pipeline_manager = PipelineManager::new(device.clone());
        pipeline_manager.load_shader("mesh", include_str!("shaders/mesh.wgsl"));
        pipeline_manager.load_shader("lines", include_str!("shaders/lines.wgsl"));
        pipeline_manager.load_shader("background", include_str!("shaders/background.wgsl"));

        pipeline_manager.register_pipeline(
            MESH_PIPELINE,
            PipelineConfig::default()
                .with_label("Mesh Pipeline")
                .with_shader("mesh")
                .with_bind_group_layouts(vec![
                    frame_layout.clone(),
                    node_layout.clone(),
                    material_layout.clone(),
                ])
                .with_depth(TextureResource::DEPTH_FORMAT, true, wgpu::CompareFunction::Less)
                .with_color_format(format, Some(wgpu::BlendState::REPLACE)),
        );
        pipeline_manager.register_pipeline(
            LINES_PIPELINE,
            PipelineConfig::default()
                .with_label("Lines Pipeline")
                .with_shader("lines")
                .with_primitive_topology(wgpu::PrimitiveTopology::LineList)
                .with_cull_mode(None)
                .with_bind_group_layouts(vec![frame_layout.clone(), node_layout.clone()])
                .with_depth(TextureResource::DEPTH_FORMAT, true, wgpu::CompareFunction::Less)
                .with_color_format(format, Some(wgpu::BlendState::REPLACE)),
        );
        pipeline_manager.register_pipeline(
            BACKGROUND_PIPELINE,
            PipelineConfig::default()
                .with_label("Background Pipeline")
                .with_shader("background")
                .with_no_vertex_buffers()
                .with_cull_mode(None)
                .with_bind_group_layouts(vec![background_layout.clone()])
                .with_depth(TextureResource::DEPTH_FORMAT, false, wgpu::CompareFunction::Always)
                .with_color_format(format, Some(wgpu::BlendState::REPLACE)),
        );
        pipeline_manager
            .create_all_pipelines()
            .map_err(|errors| Error::Graphics(errors.join("; ")))?;
        log::debug!("Created {} pipelines", pipeline_manager.pipeline_count());

        Ok(Self {
            surface,
            device,
            queue,
            config,
            depth_texture,
            pipeline_manager,
            frame_uniform,
            frame_bind_group,
            node_layout,
            material_layout,
            background_layout,
            material_sampler,
            fallback_map,
            fallback_normal,
            scene_id: None,
            geometries: HashMap::new(),
            materials: HashMap::new(),
            textures: HashMap::new(),
            nodes: Vec::new(),
            background: None,
            draws: Vec::new(),
            warned_light_overflow: false,
            logical_size: (width.max(1), height.max(1)),
            pixel_ratio: 1.0,
        })
    }

    /// Reconfigures the surface to the logical size scaled by the pixel ratio
    fn configure_surface(&mut self) {
        let (width, height) = self.logical_size;
        let physical = |v: u32| ((v as f64 * self.pixel_ratio).round() as u32).max(1);
        self.config.width = physical(width);
        self.config.height = physical(height);
        self.surface.configure(&self.device, &self.config);
        self.depth_texture =
            TextureResource::create_depth_texture(&self.device, &self.config, "depth_texture");
        log::debug!(
            "Surface configured to {}x{} (logical {}x{}, ratio {})",
            self.config.width,
            self.config.height,
            width,
            height,
            self.pixel_ratio
        );
    }

    fn reset_caches(&mut self, scene_id: SceneId) {
        self.geometries.clear();
        self.materials.clear();
        self.textures.clear();
        self.nodes.clear();
        self.background = None;
        self.warned_light_overflow = false;
        self.scene_id = Some(scene_id);
    }

    /// Uploads a texture once its image has decoded
    fn upload_texture(&mut self, texture: &Texture, color_space: ColorSpace) -> Option<TextureId> {
        let id = texture.id();
        if self.textures.contains_key(&id) {
            return Some(id);
        }
        let image = texture.image()?;
        let label = texture.path().display().to_string();
        let resource = TextureResource::create_from_rgba_data(
            &self.device,
            &self.queue,
            &image.rgba,
            image.width,
            image.height,
            &label,
            color_space,
        );
        log::debug!("Uploaded texture {} ({}x{})", label, image.width, image.height);
        self.textures.insert(id, resource);
        Some(id)
    }

    fn prepare_geometries(&mut self, scene: &Scene) {
        for (id, data) in scene.geometries() {
            if self.geometries.contains_key(&id) || data.indices.is_empty() {
                continue;
            }
            let vertices = data.to_vertices();
            let vertex_buffer = self
                .device
                .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("Vertex Buffer"),
                    contents: bytemuck::cast_slice(&vertices),
                    usage: wgpu::BufferUsages::VERTEX,
                });
            let index_buffer = self
                .device
                .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("Index Buffer"),
                    contents: bytemuck::cast_slice(&data.indices),
                    usage: wgpu::BufferUsages::INDEX,
                });
            log::debug!(
                "Uploaded {:?} geometry with {} vertices",
                data.primitive,
                data.vertex_count()
            );
            self.geometries.insert(
                id,
                GpuGeometry {
                    vertex_buffer,
                    index_buffer,
                    index_count: data.indices.len() as u32,
                },
            );
        }
    }

    fn prepare_materials(&mut self, scene: &Scene) {
        for (id, material) in scene.materials() {
            let map = material
                .map
                .as_ref()
                .and_then(|t| self.upload_texture(t, ColorSpace::Srgb));
            let normal = material
                .normal_map
                .as_ref()
                .and_then(|t| self.upload_texture(t, ColorSpace::Linear));

            // Textures that are not uploaded yet are flagged off so the fallback is ignored
            let mut uniform = material.uniform();
            uniform.flags[1] = map.is_some() as u32;
            uniform.flags[2] = normal.is_some() as u32;

            if let Some(gpu) = self.materials.get_mut(&id) {
                if gpu.bound == (map, normal) {
                    gpu.uniform.update_content(&self.queue, uniform);
                    continue;
                }
            }

            let gpu_uniform = UniformBuffer::new_with_data(&self.device, &uniform);
            let map_view = map
                .and_then(|t| self.textures.get(&t))
                .map_or(&self.fallback_map.view, |r| &r.view);
            let normal_view = normal
                .and_then(|t| self.textures.get(&t))
                .map_or(&self.fallback_normal.view, |r| &r.view);
            let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some(&format!("{} Material", material.name)),
                layout: &self.material_layout,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: gpu_uniform.binding_resource(),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: wgpu::BindingResource::TextureView(map_view),
                    },
                    wgpu::BindGroupEntry {
                        binding: 2,
                        resource: wgpu::BindingResource::TextureView(normal_view),
                    },
                    wgpu::BindGroupEntry {
                        binding: 3,
                        resource: wgpu::BindingResource::Sampler(&self.material_sampler),
                    },
                ],
            });
            self.materials.insert(
                id,
                GpuMaterial {
                    uniform: gpu_uniform,
                    bind_group,
                    bound: (map, normal),
                },
            );
        }
    }

    fn prepare_background(&mut self, scene: &Scene) {
        let Some(texture) = scene.background() else {
            self.background = None;
            return;
        };
        if matches!(&self.background, Some((id, _)) if *id == texture.id()) {
            return;
        }
        let Some(id) = self.upload_texture(texture, ColorSpace::Srgb) else {
            return;
        };
        let Some(resource) = self.textures.get(&id) else {
            return;
        };
        let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Background Bind Group"),
            layout: &self.background_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&resource.view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&resource.sampler),
                },
            ],
        });
        self.background = Some((id, bind_group));
    }

    fn prepare_nodes(&mut self) {
        for draw in &self.draws {
            let uniform = draw.uniform();
            if let Some(node) = self.nodes.get_mut(draw.node) {
                node.uniform.update_content(&self.queue, uniform);
                continue;
            }
            // Nodes are only ever appended, so missing slots are filled in order
            while self.nodes.len() <= draw.node {
                let node_uniform = UniformBuffer::new_with_data(&self.device, &uniform);
                let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
                    label: Some("Node Bind Group"),
                    layout: &self.node_layout,
                    entries: &[wgpu::BindGroupEntry {
                        binding: 0,
                        resource: node_uniform.binding_resource(),
                    }],
                });
                self.nodes.push(GpuNode {
                    uniform: node_uniform,
                    bind_group,
                });
            }
        }
    }

    /// Brings every GPU cache in line with `scene` and uploads this frame's uniforms
    fn prepare(&mut self, scene: &Scene, camera: &PerspectiveCamera) {
        if self.scene_id != Some(scene.id()) {
            self.reset_caches(scene.id());
        }

        let mut draws = std::mem::take(&mut self.draws);
        let lights = collect_frame(scene, &mut draws);
        self.draws = draws;

        if lights.points.len() > MAX_LIGHTS && !self.warned_light_overflow {
            log::warn!(
                "Scene has {} point lights; only the first {} are shaded",
                lights.points.len(),
                MAX_LIGHTS
            );
            self.warned_light_overflow = true;
        }

        self.prepare_geometries(scene);
        self.prepare_materials(scene);
        self.prepare_background(scene);
        self.prepare_nodes();
        self.frame_uniform
            .update_content(&self.queue, FrameUniform::new(camera, &lights));
    }

    fn draw(&mut self) {
        let surface_texture = match self.surface.get_current_texture() {
            Ok(texture) => texture,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::warn!("Surface lost or outdated, reconfiguring");
                self.surface.configure(&self.device, &self.config);
                return;
            }
            Err(wgpu::SurfaceError::Timeout) => {
                log::warn!("Timed out waiting for surface texture, skipping frame");
                return;
            }
            Err(e) => {
                log::error!("Failed to acquire surface texture: {e}");
                return;
            }
        };

        let surface_view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &surface_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            if let (Some((_, bind_group)), Some(pipeline)) = (
                &self.background,
                self.pipeline_manager.get_pipeline(BACKGROUND_PIPELINE),
            ) {
                render_pass.set_pipeline(pipeline);
                render_pass.set_bind_group(0, bind_group, &[]);
                render_pass.draw(0..3, 0..1);
            }

            if let Some(pipeline) = self.pipeline_manager.get_pipeline(MESH_PIPELINE) {
                render_pass.set_pipeline(pipeline);
                render_pass.set_bind_group(0, &self.frame_bind_group, &[]);
                for draw in &self.draws {
                    let DrawKind::Mesh { geometry, material } = draw.kind else {
                        continue;
                    };
                    let (Some(gpu_geometry), Some(gpu_material), Some(node)) = (
                        self.geometries.get(&geometry),
                        self.materials.get(&material),
                        self.nodes.get(draw.node),
                    ) else {
                        continue;
                    };
                    render_pass.set_bind_group(1, &node.bind_group, &[]);
                    render_pass.set_bind_group(2, &gpu_material.bind_group, &[]);
                    render_pass.set_vertex_buffer(0, gpu_geometry.vertex_buffer.slice(..));
                    render_pass.set_index_buffer(
                        gpu_geometry.index_buffer.slice(..),
                        wgpu::IndexFormat::Uint32,
                    );
                    render_pass.draw_indexed(0..gpu_geometry.index_count, 0, 0..1);
                }
            }

            if let Some(pipeline) = self.pipeline_manager.get_pipeline(LINES_PIPELINE) {
                render_pass.set_pipeline(pipeline);
                render_pass.set_bind_group(0, &self.frame_bind_group, &[]);
                for draw in &self.draws {
                    let DrawKind::Lines { geometry, .. } = draw.kind else {
                        continue;
                    };
                    let (Some(gpu_geometry), Some(node)) =
                        (self.geometries.get(&geometry), self.nodes.get(draw.node))
                    else {
                        continue;
                    };
                    render_pass.set_bind_group(1, &node.bind_group, &[]);
                    render_pass.set_vertex_buffer(0, gpu_geometry.vertex_buffer.slice(..));
                    render_pass.set_index_buffer(
                        gpu_geometry.index_buffer.slice(..),
                        wgpu::IndexFormat::Uint32,
                    );
                    render_pass.draw_indexed(0..gpu_geometry.index_count, 0, 0..1);
                }
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        surface_texture.present();
    }
}

impl Renderer for RenderEngine {
    fn render(&mut self, scene: &Scene, camera: &PerspectiveCamera) {
        self.prepare(scene, camera);
        self.draw();
    }

    fn set_size(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.logical_size = (width, height);
        self.configure_surface();
    }

    fn set_pixel_ratio(&mut self, ratio: f64) {
        if ratio.is_nan() || ratio <= 0.0 || ratio == self.pixel_ratio {
            return;
        }
        self.pixel_ratio = ratio;
        self.configure_surface();
    }
}
