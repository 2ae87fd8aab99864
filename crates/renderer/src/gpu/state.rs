use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Result;
use wgpu::util::DeviceExt;
use winit::dpi::PhysicalSize;
use winit::window::Window;

use crate::camera::Camera;
use crate::layout::Viewport;
use crate::scene::{Scene, Surface};
use crate::types::Antialiasing;

use super::context::GpuContext;
use super::pipeline::RipplePipeline;
use super::textures::{self, TextureResources};
use super::uniforms::GpuUniforms;

const CLEAR_COLOR: wgpu::Color = wgpu::Color::BLACK;

/// GPU buffers and bind groups of one scene surface.
struct SurfaceResources {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    texture_bind_group: wgpu::BindGroup,
    _texture: Arc<TextureResources>,
}

impl SurfaceResources {
    fn new(
        device: &wgpu::Device,
        pipeline: &RipplePipeline,
        surface: &Surface,
        texture: Arc<TextureResources>,
        index: usize,
    ) -> Self {
        let mesh = surface.mesh();
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("surface #{index} vertices")),
            contents: bytemuck::cast_slice(mesh.vertices()),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("surface #{index} indices")),
            contents: bytemuck::cast_slice(mesh.indices()),
            usage: wgpu::BufferUsages::INDEX,
        });
        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(&format!("surface #{index} uniforms")),
            size: std::mem::size_of::<GpuUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(&format!("surface #{index} uniform bind group")),
            layout: &pipeline.uniform_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });
        let texture_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(&format!("surface #{index} texture bind group")),
            layout: &pipeline.texture_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&texture.view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&texture.sampler),
                },
            ],
        });

        Self {
            vertex_buffer,
            index_buffer,
            index_count: mesh.indices().len() as u32,
            uniform_buffer,
            uniform_bind_group,
            texture_bind_group,
            _texture: texture,
        }
    }
}

struct MultisampleTarget {
    _texture: wgpu::Texture,
    view: wgpu::TextureView,
}

impl MultisampleTarget {
    fn new(
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
        size: PhysicalSize<u32>,
        sample_count: u32,
    ) -> Self {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("msaa color target"),
            size: wgpu::Extent3d {
                width: size.width.max(1),
                height: size.height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        Self {
            _texture: texture,
            view,
        }
    }
}

pub(crate) struct GpuState {
    context: GpuContext,
    pipeline: RipplePipeline,
    surfaces: Vec<SurfaceResources>,
    multisample_target: Option<MultisampleTarget>,
}

impl GpuState {
    /// Creates the device and uploads every surface of `scene`. Surfaces
    /// that share a decoded image share one GPU texture.
    pub(crate) fn new(window: Arc<Window>, scene: &Scene, antialiasing: Antialiasing) -> Result<Self> {
        let context = GpuContext::new(window, antialiasing)?;
        let pipeline = RipplePipeline::new(
            &context.device,
            context.config.format,
            context.sample_count,
        );

        let mut uploaded: HashMap<*const ripple::Texture, Arc<TextureResources>> = HashMap::new();
        let mut surfaces = Vec::with_capacity(scene.len());
        for (index, surface) in scene.surfaces().iter().enumerate() {
            let key = Arc::as_ptr(surface.texture());
            let texture = uploaded
                .entry(key)
                .or_insert_with(|| {
                    Arc::new(textures::upload(
                        &context.device,
                        &context.queue,
                        surface.texture(),
                        &surface.image().display().to_string(),
                    ))
                })
                .clone();
            surfaces.push(SurfaceResources::new(
                &context.device,
                &pipeline,
                surface,
                texture,
                index,
            ));
        }

        let multisample_target = (context.sample_count > 1).then(|| {
            MultisampleTarget::new(
                &context.device,
                context.config.format,
                context.size,
                context.sample_count,
            )
        });

        tracing::info!(
            surfaces = surfaces.len(),
            textures = uploaded.len(),
            sample_count = context.sample_count,
            "GPU state ready"
        );
        Ok(Self {
            context,
            pipeline,
            surfaces,
            multisample_target,
        })
    }

    pub(crate) fn size(&self) -> PhysicalSize<u32> {
        self.context.size
    }

    pub(crate) fn resize(&mut self, new_size: PhysicalSize<u32>) {
        self.context.resize(new_size);
        if self.context.sample_count > 1 {
            self.multisample_target = Some(MultisampleTarget::new(
                &self.context.device,
                self.context.config.format,
                self.context.size,
                self.context.sample_count,
            ));
        }
    }

    /// Draws every surface of `scene` into its viewport and presents.
    pub(crate) fn render(&mut self, scene: &Scene) -> Result<(), wgpu::SurfaceError> {
        let frame = self.context.surface.get_current_texture()?;
        let size = self.context.size;
        let viewports = scene.layout((size.width, size.height));

        for ((surface, resources), viewport) in scene
            .surfaces()
            .iter()
            .zip(&self.surfaces)
            .zip(&viewports)
        {
            let uniforms = GpuUniforms::new(&Camera::new(viewport.aspect()), surface.uniforms());
            self.context.queue.write_buffer(
                &resources.uniform_buffer,
                0,
                bytemuck::bytes_of(&uniforms),
            );
        }

        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder =
            self.context
                .device
                .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                    label: Some("render encoder"),
                });

        {
            let (attachment_view, resolve_target) = match self.multisample_target.as_ref() {
                Some(msaa) => (&msaa.view, Some(&view)),
                None => (&view, None),
            };
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("render pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: attachment_view,
                    depth_slice: None,
                    resolve_target,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(CLEAR_COLOR),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                occlusion_query_set: None,
                timestamp_writes: None,
            });
            render_pass.set_pipeline(&self.pipeline.pipeline);

            for (resources, viewport) in self.surfaces.iter().zip(&viewports) {
                let Some(viewport) = clip_viewport(viewport, size) else {
                    continue;
                };
                render_pass.set_viewport(
                    viewport.x,
                    viewport.y,
                    viewport.width,
                    viewport.height,
                    0.0,
                    1.0,
                );
                render_pass.set_bind_group(0, &resources.uniform_bind_group, &[]);
                render_pass.set_bind_group(1, &resources.texture_bind_group, &[]);
                render_pass.set_vertex_buffer(0, resources.vertex_buffer.slice(..));
                render_pass
                    .set_index_buffer(resources.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                render_pass.draw_indexed(0..resources.index_count, 0, 0..1);
            }
        }

        self.context.queue.submit(std::iter::once(encoder.finish()));
        frame.present();
        Ok(())
    }
}

/// Trims a viewport to the render target; wgpu rejects viewports that
/// extend past it.
fn clip_viewport(viewport: &Viewport, size: PhysicalSize<u32>) -> Option<Viewport> {
    let width = (size.width as f32 - viewport.x).min(viewport.width);
    let height = (size.height as f32 - viewport.y).min(viewport.height);
    (width >= 1.0 && height >= 1.0).then_some(Viewport {
        x: viewport.x,
        y: viewport.y,
        width,
        height,
    })
}
