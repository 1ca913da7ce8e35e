//! wgpu implementation of [`RenderBackend`].
//!
//! Renders into an offscreen colour target. Every draw records one render
//! pass that loads the target, draws, and is submitted immediately, so
//! buffer writes made between draws are ordered the same way they are on
//! the headless backend. `wgpu::RenderPipeline`s are built on first use
//! for each (program, vertex layout, topology) and cached.

mod shaders;

use std::collections::HashMap;
use std::sync::{Arc, Weak};

use glam::Mat4;
use wgpu::util::DeviceExt;

use super::types::*;
use super::RenderBackend;
use crate::error::{RendererError, Result};
use crate::pipeline::{SCREEN_PROJECTION_UNIFORM, VIEW_PROJECTION_UNIFORM};

/// Format of the colour target and of uploaded textures.
pub const TARGET_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;

// ---------------------------------------------------------------------------
// Handles
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct GpuBuffer {
    id: u32,
    kind: BufferKind,
    raw: Arc<wgpu::Buffer>,
}

#[derive(Debug)]
pub struct GpuLayout {
    id: u32,
    stride: u64,
    attributes: Vec<wgpu::VertexAttribute>,
    buffer: GpuBuffer,
    /// Cached render pipelines built for this layout hold a weak reference.
    token: Arc<()>,
}

#[derive(Debug)]
struct PipelineInner {
    id: u32,
    program: ShaderProgram,
    texture_bindings: u32,
    shader: wgpu::ShaderModule,
    bind_group_layout: wgpu::BindGroupLayout,
    pipeline_layout: wgpu::PipelineLayout,
    uniforms: wgpu::Buffer,
}

#[derive(Debug, Clone)]
pub struct GpuPipeline {
    inner: Arc<PipelineInner>,
}

struct GpuTexture {
    _texture: wgpu::Texture,
    view: wgpu::TextureView,
}

type PipelineKey = (u32, u32, DrawMode);

/// A cached render pipeline and the layout it was built for.
#[derive(Debug)]
struct CachedPipeline<P> {
    layout: Weak<()>,
    pipeline: P,
}

/// Drop cache entries whose layout has been destroyed or dropped.
fn prune_released<P>(cache: &mut HashMap<PipelineKey, CachedPipeline<P>>) {
    cache.retain(|_, cached| cached.layout.strong_count() > 0);
}

// ---------------------------------------------------------------------------
// WgpuBackend
// ---------------------------------------------------------------------------

pub struct WgpuBackend {
    device: wgpu::Device,
    queue: wgpu::Queue,
    limits: BackendLimits,
    next_id: u32,

    target: wgpu::Texture,
    target_view: wgpu::TextureView,
    sampler: wgpu::Sampler,
    fallback: GpuTexture,

    textures: HashMap<TextureId, GpuTexture>,
    units: HashMap<u32, TextureId>,
    sampler_units: HashMap<u32, Vec<i32>>,
    index_buffer: Option<GpuBuffer>,
    active: Option<GpuPipeline>,
    render_pipelines: HashMap<PipelineKey, CachedPipeline<Arc<wgpu::RenderPipeline>>>,
}

impl WgpuBackend {
    /// Open a device on the best available adapter and render into a
    /// `width` x `height` offscreen target.
    pub fn new_offscreen(width: u32, height: u32) -> Result<Self> {
        pollster::block_on(Self::request_offscreen(width, height))
    }

    async fn request_offscreen(width: u32, height: u32) -> Result<Self> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                force_fallback_adapter: false,
                compatible_surface: None,
            })
            .await;

        let adapter = match adapter {
            Some(a) => a,
            None => {
                tracing::warn!("no hardware GPU adapter found, trying software fallback");
                instance
                    .request_adapter(&wgpu::RequestAdapterOptions {
                        power_preference: wgpu::PowerPreference::LowPower,
                        force_fallback_adapter: true,
                        compatible_surface: None,
                    })
                    .await
                    .ok_or(RendererError::AdapterNotFound)?
            }
        };

        let info = adapter.get_info();
        tracing::info!(
            "GPU adapter: {} ({:?}, {:?})",
            info.name,
            info.device_type,
            info.backend,
        );

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("lumen device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::default(),
                },
                None,
            )
            .await?;

        Ok(Self::from_device(device, queue, width, height))
    }

    /// Wrap an existing device. The offscreen target is created here.
    pub fn from_device(device: wgpu::Device, queue: wgpu::Queue, width: u32, height: u32) -> Self {
        let device_limits = device.limits();
        let limits = BackendLimits {
            max_texture_units: device_limits.max_sampled_textures_per_shader_stage,
            max_vertex_attributes: device_limits.max_vertex_attributes,
        };

        let target = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("lumen target"),
            size: wgpu::Extent3d {
                width: width.max(1),
                height: height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: TARGET_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
            view_formats: &[],
        });
        let target_view = target.create_view(&wgpu::TextureViewDescriptor::default());

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("lumen sampler"),
            mag_filter: wgpu::FilterMode::Nearest,
            min_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        let fallback = upload_texture(&device, &queue, Some("lumen fallback"), 1, 1, &[255; 4]);

        tracing::info!(
            "wgpu backend ready: {width}x{height} target, {} texture units",
            limits.max_texture_units
        );

        Self {
            device,
            queue,
            limits,
            next_id: 0,
            target,
            target_view,
            sampler,
            fallback,
            textures: HashMap::new(),
            units: HashMap::new(),
            sampler_units: HashMap::new(),
            index_buffer: None,
            active: None,
            render_pipelines: HashMap::new(),
        }
    }

    fn next_id(&mut self) -> u32 {
        self.next_id += 1;
        self.next_id
    }

    /// The texture every draw renders into.
    pub fn target(&self) -> &wgpu::Texture {
        &self.target
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    /// Block until submitted work has finished.
    pub fn wait_idle(&self) {
        let _ = self.device.poll(wgpu::Maintain::Wait);
    }

    fn render_pipeline(
        &mut self,
        pipeline: &GpuPipeline,
        layout: &GpuLayout,
        mode: DrawMode,
    ) -> Arc<wgpu::RenderPipeline> {
        let key = (pipeline.inner.id, layout.id, mode);
        if let Some(cached) = self.render_pipelines.get(&key) {
            return Arc::clone(&cached.pipeline);
        }

        let inner = &pipeline.inner;
        let label = format!("{:?} {mode:?}", inner.program);
        let raw = self
            .device
            .create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some(label.as_str()),
                layout: Some(&inner.pipeline_layout),
                vertex: wgpu::VertexState {
                    module: &inner.shader,
                    entry_point: Some("vs_main"),
                    compilation_options: wgpu::PipelineCompilationOptions::default(),
                    buffers: &[wgpu::VertexBufferLayout {
                        array_stride: layout.stride,
                        step_mode: wgpu::VertexStepMode::Vertex,
                        attributes: &layout.attributes,
                    }],
                },
                fragment: Some(wgpu::FragmentState {
                    module: &inner.shader,
                    entry_point: Some("fs_main"),
                    compilation_options: wgpu::PipelineCompilationOptions::default(),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: TARGET_FORMAT,
                        blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                }),
                primitive: wgpu::PrimitiveState {
                    topology: topology(mode),
                    strip_index_format: None,
                    front_face: wgpu::FrontFace::Ccw,
                    cull_mode: None,
                    polygon_mode: wgpu::PolygonMode::Fill,
                    unclipped_depth: false,
                    conservative: false,
                },
                depth_stencil: None,
                multisample: wgpu::MultisampleState::default(),
                multiview: None,
                cache: None,
            });

        tracing::debug!("built render pipeline {label}");
        let raw = Arc::new(raw);
        prune_released(&mut self.render_pipelines);
        self.render_pipelines.insert(
            key,
            CachedPipeline {
                layout: Arc::downgrade(&layout.token),
                pipeline: Arc::clone(&raw),
            },
        );
        raw
    }

    /// Bind group for the active pipeline: uniforms, sampler, then one
    /// view per texture binding resolved through the sampler mapping.
    fn bind_group(&self, pipeline: &GpuPipeline) -> wgpu::BindGroup {
        let inner = &pipeline.inner;
        let mapping = self.sampler_units.get(&inner.id);

        let views: Vec<&wgpu::TextureView> = (0..inner.texture_bindings)
            .map(|slot| {
                let unit = mapping
                    .and_then(|units| units.get(slot as usize))
                    .map_or(slot, |unit| *unit as u32);
                self.units
                    .get(&unit)
                    .and_then(|texture| self.textures.get(texture))
                    .map_or(&self.fallback.view, |texture| &texture.view)
            })
            .collect();

        let mut entries = vec![wgpu::BindGroupEntry {
            binding: 0,
            resource: inner.uniforms.as_entire_binding(),
        }];
        if inner.texture_bindings > 0 {
            entries.push(wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::Sampler(&self.sampler),
            });
            for (slot, view) in views.iter().enumerate() {
                entries.push(wgpu::BindGroupEntry {
                    binding: shaders::FIRST_TEXTURE_BINDING + slot as u32,
                    resource: wgpu::BindingResource::TextureView(view),
                });
            }
        }

        self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("lumen draw bind group"),
            layout: &inner.bind_group_layout,
            entries: &entries,
        })
    }

    fn submit_draw(&mut self, layout: &GpuLayout, mode: DrawMode, draw: DrawRange) {
        let Some(pipeline) = self.active.clone() else {
            tracing::warn!("draw with no pipeline in use skipped");
            return;
        };

        let render_pipeline = self.render_pipeline(&pipeline, layout, mode);
        let bind_group = self.bind_group(&pipeline);

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("lumen draw encoder"),
            });
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("lumen draw pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &self.target_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            pass.set_pipeline(&render_pipeline);
            pass.set_bind_group(0, &bind_group, &[]);
            pass.set_vertex_buffer(0, layout.buffer.raw.slice(..));

            match draw {
                DrawRange::Vertices { first, count } => pass.draw(first..first + count, 0..1),
                DrawRange::Indices { buffer, format, count } => {
                    pass.set_index_buffer(buffer.raw.slice(..), format);
                    pass.draw_indexed(0..count, 0, 0..1);
                }
            }
        }
        self.queue.submit(std::iter::once(encoder.finish()));
    }
}

enum DrawRange {
    Vertices { first: u32, count: u32 },
    Indices { buffer: GpuBuffer, format: wgpu::IndexFormat, count: u32 },
}

impl RenderBackend for WgpuBackend {
    type Buffer = GpuBuffer;
    type Layout = GpuLayout;
    type Pipeline = GpuPipeline;

    fn limits(&self) -> BackendLimits {
        self.limits
    }

    fn create_buffer(&mut self, desc: &BufferDescriptor<'_>) -> Result<GpuBuffer> {
        let usage = match desc.kind {
            BufferKind::Vertex => wgpu::BufferUsages::VERTEX,
            BufferKind::Index(_) => wgpu::BufferUsages::INDEX,
        } | wgpu::BufferUsages::COPY_DST;
        let size = wgpu::util::align_to(desc.size.max(1), wgpu::COPY_BUFFER_ALIGNMENT);

        let raw = match desc.contents {
            Some(contents) => {
                if contents.len() as u64 > desc.size {
                    return Err(RendererError::ResourceCreation(format!(
                        "buffer {:?}: {} bytes of contents exceed size {}",
                        desc.label.unwrap_or("unnamed"),
                        contents.len(),
                        desc.size
                    )));
                }
                let mut padded = vec![0u8; size as usize];
                padded[..contents.len()].copy_from_slice(contents);
                self.device
                    .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                        label: desc.label,
                        contents: &padded,
                        usage,
                    })
            }
            None => self.device.create_buffer(&wgpu::BufferDescriptor {
                label: desc.label,
                size,
                usage,
                mapped_at_creation: false,
            }),
        };

        Ok(GpuBuffer {
            id: self.next_id(),
            kind: desc.kind,
            raw: Arc::new(raw),
        })
    }

    fn write_buffer(&mut self, buffer: &GpuBuffer, offset: u64, data: &[u8]) {
        let end = offset + data.len() as u64;
        if end > buffer.raw.size() {
            tracing::warn!(
                "write of {} bytes at offset {offset} overruns buffer {} ({} bytes)",
                data.len(),
                buffer.id,
                buffer.raw.size()
            );
            return;
        }

        let aligned = wgpu::util::align_to(data.len() as u64, wgpu::COPY_BUFFER_ALIGNMENT);
        if aligned == data.len() as u64 {
            self.queue.write_buffer(&buffer.raw, offset, data);
        } else {
            let mut padded = data.to_vec();
            padded.resize(aligned as usize, 0);
            self.queue.write_buffer(&buffer.raw, offset, &padded);
        }
    }

    fn bind_buffer(&mut self, target: BufferTarget, buffer: Option<&GpuBuffer>) {
        // Vertex buffers are taken from the layout at draw time.
        if target == BufferTarget::Index {
            self.index_buffer = buffer.cloned();
        }
    }

    fn destroy_buffer(&mut self, buffer: GpuBuffer) {
        if self.index_buffer.as_ref().is_some_and(|b| b.id == buffer.id) {
            self.index_buffer = None;
        }
    }

    fn create_layout(&mut self, desc: &LayoutDescriptor<'_, GpuBuffer>) -> Result<GpuLayout> {
        let Some(buffer) = desc.buffers.last() else {
            return Err(RendererError::InvalidResource(
                "vertex layout has no vertex buffer".into(),
            ));
        };

        let attributes = desc
            .attributes
            .iter()
            .map(|attribute| {
                Ok(wgpu::VertexAttribute {
                    format: vertex_format(attribute)?,
                    offset: u64::from(attribute.offset),
                    shader_location: attribute.location,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(GpuLayout {
            id: self.next_id(),
            stride: u64::from(desc.stride),
            attributes,
            buffer: (*buffer).clone(),
            token: Arc::new(()),
        })
    }

    fn destroy_layout(&mut self, layout: GpuLayout) {
        drop(layout);
        prune_released(&mut self.render_pipelines);
    }

    fn create_pipeline(&mut self, desc: &PipelineDescriptor<'_>) -> Result<GpuPipeline> {
        let texture_bindings = shaders::texture_bindings(desc.program, desc.texture_slots);
        if texture_bindings > self.limits.max_texture_units {
            return Err(RendererError::InvalidCreateInfo(format!(
                "{texture_bindings} texture bindings exceed the device limit of {}",
                self.limits.max_texture_units
            )));
        }

        let shader = self
            .device
            .create_shader_module(wgpu::ShaderModuleDescriptor {
                label: desc.label,
                source: wgpu::ShaderSource::Wgsl(
                    shaders::source(desc.program, desc.texture_slots).into(),
                ),
            });

        let mut entries = vec![wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::VERTEX,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        }];
        if texture_bindings > 0 {
            entries.push(wgpu::BindGroupLayoutEntry {
                binding: 1,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                count: None,
            });
            entries.extend((0..texture_bindings).map(|slot| wgpu::BindGroupLayoutEntry {
                binding: shaders::FIRST_TEXTURE_BINDING + slot,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Texture {
                    sample_type: wgpu::TextureSampleType::Float { filterable: true },
                    view_dimension: wgpu::TextureViewDimension::D2,
                    multisampled: false,
                },
                count: None,
            }));
        }

        let bind_group_layout = self
            .device
            .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: desc.label,
                entries: &entries,
            });
        let pipeline_layout = self
            .device
            .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: desc.label,
                bind_group_layouts: &[&bind_group_layout],
                push_constant_ranges: &[],
            });

        let identity = [Mat4::IDENTITY.to_cols_array(), Mat4::IDENTITY.to_cols_array()];
        let uniforms = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("lumen uniforms"),
                contents: bytemuck::cast_slice(&identity),
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            });
        debug_assert_eq!(uniforms.size(), shaders::UNIFORM_SIZE);

        Ok(GpuPipeline {
            inner: Arc::new(PipelineInner {
                id: self.next_id(),
                program: desc.program,
                texture_bindings,
                shader,
                bind_group_layout,
                pipeline_layout,
                uniforms,
            }),
        })
    }

    fn use_pipeline(&mut self, pipeline: Option<&GpuPipeline>) {
        self.active = pipeline.cloned();
    }

    fn set_texture_uniform(&mut self, pipeline: &GpuPipeline, name: &str, units: &[i32]) {
        if pipeline.inner.program != ShaderProgram::BatchQuad {
            tracing::warn!("sampler array {name} set on {:?}, which has none", pipeline.inner.program);
            return;
        }
        self.sampler_units.insert(pipeline.inner.id, units.to_vec());
    }

    fn set_matrix_uniform(&mut self, pipeline: &GpuPipeline, name: &str, matrix: &Mat4) {
        let offset = match name {
            VIEW_PROJECTION_UNIFORM => 0,
            SCREEN_PROJECTION_UNIFORM => shaders::SCREEN_PROJECTION_OFFSET,
            _ => {
                tracing::warn!("unknown matrix uniform {name} ignored");
                return;
            }
        };
        self.queue.write_buffer(
            &pipeline.inner.uniforms,
            offset,
            bytemuck::cast_slice(&matrix.to_cols_array()),
        );
    }

    fn create_texture(&mut self, desc: &TextureDescriptor<'_>) -> Result<TextureId> {
        if desc.width == 0 || desc.height == 0 || desc.pixels.len() != desc.expected_len() {
            return Err(RendererError::ResourceCreation(format!(
                "texture {:?}: {}x{} with {} bytes of pixels",
                desc.label.unwrap_or("unnamed"),
                desc.width,
                desc.height,
                desc.pixels.len()
            )));
        }

        let texture = upload_texture(
            &self.device,
            &self.queue,
            desc.label,
            desc.width,
            desc.height,
            desc.pixels,
        );
        let id = TextureId(self.next_id());
        self.textures.insert(id, texture);
        Ok(id)
    }

    fn destroy_texture(&mut self, texture: TextureId) {
        self.textures.remove(&texture);
        self.units.retain(|_, bound| *bound != texture);
    }

    fn bind_texture(&mut self, texture: TextureId, unit: u32) {
        if !self.textures.contains_key(&texture) {
            tracing::warn!("bind of unknown texture {texture:?} to unit {unit} ignored");
            return;
        }
        if unit >= self.limits.max_texture_units {
            tracing::warn!("texture unit {unit} exceeds the device limit");
            return;
        }
        self.units.insert(unit, texture);
    }

    fn unbind_texture(&mut self, unit: u32) {
        self.units.remove(&unit);
    }

    fn clear(&mut self, color: [f32; 4]) {
        let [r, g, b, a] = color.map(f64::from);
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("lumen clear encoder"),
            });
        {
            let _pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("lumen clear pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &self.target_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color { r, g, b, a }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
        }
        self.queue.submit(std::iter::once(encoder.finish()));
    }

    fn draw(&mut self, layout: &GpuLayout, mode: DrawMode, first: u32, count: u32) {
        self.submit_draw(layout, mode, DrawRange::Vertices { first, count });
    }

    fn draw_indexed(&mut self, layout: &GpuLayout, mode: DrawMode, count: u32) {
        let Some(buffer) = self.index_buffer.clone() else {
            tracing::warn!("indexed draw with no index buffer bound skipped");
            return;
        };
        let format = match buffer.kind {
            BufferKind::Index(IndexFormat::Uint16) => wgpu::IndexFormat::Uint16,
            BufferKind::Index(IndexFormat::Uint32) => wgpu::IndexFormat::Uint32,
            BufferKind::Vertex => {
                tracing::warn!("indexed draw with a vertex buffer bound as indices skipped");
                return;
            }
        };
        self.submit_draw(layout, mode, DrawRange::Indices { buffer, format, count });
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn upload_texture(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    label: Option<&str>,
    width: u32,
    height: u32,
    pixels: &[u8],
) -> GpuTexture {
    let texture = device.create_texture_with_data(
        queue,
        &wgpu::TextureDescriptor {
            label,
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: TARGET_FORMAT,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        },
        wgpu::util::TextureDataOrder::LayerMajor,
        pixels,
    );
    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
    GpuTexture {
        _texture: texture,
        view,
    }
}

fn topology(mode: DrawMode) -> wgpu::PrimitiveTopology {
    match mode {
        DrawMode::Points => wgpu::PrimitiveTopology::PointList,
        DrawMode::Lines => wgpu::PrimitiveTopology::LineList,
        DrawMode::LineStrip => wgpu::PrimitiveTopology::LineStrip,
        DrawMode::Triangles => wgpu::PrimitiveTopology::TriangleList,
        DrawMode::TriangleStrip => wgpu::PrimitiveTopology::TriangleStrip,
    }
}

fn vertex_format(attribute: &AttributeDescriptor) -> Result<wgpu::VertexFormat> {
    use wgpu::VertexFormat as F;

    let format = match (attribute.data_type, attribute.element_count, attribute.normalised) {
        (AttributeType::Float32, 1, _) => F::Float32,
        (AttributeType::Float32, 2, _) => F::Float32x2,
        (AttributeType::Float32, 3, _) => F::Float32x3,
        (AttributeType::Float32, 4, _) => F::Float32x4,
        (AttributeType::Int32, 1, _) => F::Sint32,
        (AttributeType::Int32, 2, _) => F::Sint32x2,
        (AttributeType::Int32, 3, _) => F::Sint32x3,
        (AttributeType::Int32, 4, _) => F::Sint32x4,
        (AttributeType::UInt32, 1, _) => F::Uint32,
        (AttributeType::UInt32, 2, _) => F::Uint32x2,
        (AttributeType::UInt32, 3, _) => F::Uint32x3,
        (AttributeType::UInt32, 4, _) => F::Uint32x4,
        (AttributeType::UInt8, 2, false) => F::Uint8x2,
        (AttributeType::UInt8, 4, false) => F::Uint8x4,
        (AttributeType::UInt8, 2, true) => F::Unorm8x2,
        (AttributeType::UInt8, 4, true) => F::Unorm8x4,
        (data_type, count, _) => {
            return Err(RendererError::InvalidResource(format!(
                "no vertex format for {count} x {data_type:?}"
            )))
        }
    };
    Ok(format)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attribute(data_type: AttributeType, element_count: u32, normalised: bool) -> AttributeDescriptor {
        AttributeDescriptor {
            location: 0,
            element_count,
            data_type,
            normalised,
            offset: 0,
        }
    }

    #[test]
    fn float_attributes_map_to_float_formats() {
        assert_eq!(
            vertex_format(&attribute(AttributeType::Float32, 2, false)).unwrap(),
            wgpu::VertexFormat::Float32x2
        );
        assert_eq!(
            vertex_format(&attribute(AttributeType::Float32, 1, false)).unwrap(),
            wgpu::VertexFormat::Float32
        );
    }

    #[test]
    fn normalised_bytes_map_to_unorm() {
        assert_eq!(
            vertex_format(&attribute(AttributeType::UInt8, 4, true)).unwrap(),
            wgpu::VertexFormat::Unorm8x4
        );
    }

    #[test]
    fn odd_byte_counts_are_rejected() {
        assert!(vertex_format(&attribute(AttributeType::UInt8, 3, false)).is_err());
    }

    #[test]
    fn pipelines_of_released_layouts_are_pruned() {
        let kept = Arc::new(());
        let dropped = Arc::new(());
        let mut cache = HashMap::new();
        cache.insert(
            (1, 1, DrawMode::Triangles),
            CachedPipeline {
                layout: Arc::downgrade(&kept),
                pipeline: "kept",
            },
        );
        cache.insert(
            (1, 2, DrawMode::Lines),
            CachedPipeline {
                layout: Arc::downgrade(&dropped),
                pipeline: "dropped",
            },
        );

        drop(dropped);
        prune_released(&mut cache);

        assert_eq!(cache.len(), 1);
        assert_eq!(cache[&(1, 1, DrawMode::Triangles)].pipeline, "kept");
    }

    #[test]
    fn draw_modes_map_to_topologies() {
        assert_eq!(topology(DrawMode::Lines), wgpu::PrimitiveTopology::LineList);
        assert_eq!(
            topology(DrawMode::Triangles),
            wgpu::PrimitiveTopology::TriangleList
        );
    }
}
