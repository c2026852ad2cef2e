use anyhow::Result;
use raw_window_handle::{HasDisplayHandle, HasWindowHandle};
use refraction::{ImageTexture, Vec2};
use wgpu::util::DeviceExt;
use winit::dpi::PhysicalSize;

use crate::types::RendererConfig;

use super::context::GpuContext;
use super::pipeline::LensPipeline;
use super::texture::SourceTexture;
use super::uniforms::LensUniforms;

/// Every GPU resource needed to present a frame of the lens effect.
///
/// ```text
///   Window ─┐
///           ├─▶ Surface ─▶ Device ─▶ Queue
///           │                 │
///           │                 ├─▶ LensPipeline
///           │                 ├─▶ uniform buffer (LensUniforms)
///           │                 └─▶ source texture + sampler
/// ```
pub(crate) struct GpuState {
    context: GpuContext,
    pipeline: LensPipeline,
    /// Keeps the texture alive for the bind group.
    _source: SourceTexture,
    multisample_target: Option<MultisampleTarget>,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    /// CPU copy of the uniform data mirrored into the buffer each frame.
    uniforms: LensUniforms,
    resync_on_resize: bool,
}

impl GpuState {
    pub(crate) fn new<T>(
        target: &T,
        initial_size: PhysicalSize<u32>,
        image: &ImageTexture,
        config: &RendererConfig,
    ) -> Result<Self>
    where
        T: HasDisplayHandle + HasWindowHandle,
    {
        let context = GpuContext::new(
            target,
            initial_size,
            config.antialiasing,
            config.color_space,
        )?;

        let source = SourceTexture::upload(
            &context.device,
            &context.queue,
            image,
            context.color_space,
            context.limits.max_texture_dimension_2d,
        )?;
        let pipeline = LensPipeline::new(
            &context.device,
            context.surface_format,
            context.sample_count,
            &source,
        );

        let image_resolution = config.aspect.resolve(source.size);
        let size = context.size;
        let uniforms = LensUniforms::new((size.width, size.height), image_resolution, &config.lens);
        tracing::debug!(
            resolution = ?uniforms.resolution,
            image_resolution = ?uniforms.image_resolution,
            "seeded lens uniforms"
        );

        let uniform_buffer =
            context
                .device
                .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("lens uniform buffer"),
                    contents: bytemuck::bytes_of(&uniforms),
                    usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                });
        let uniform_bind_group = context
            .device
            .create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("lens uniform bind group"),
                layout: &pipeline.uniform_layout,
                entries: &[wgpu::BindGroupEntry {
                    binding: 0,
                    resource: uniform_buffer.as_entire_binding(),
                }],
            });

        let multisample_target = MultisampleTarget::for_context(&context);

        Ok(Self {
            context,
            pipeline,
            _source: source,
            multisample_target,
            uniform_buffer,
            uniform_bind_group,
            uniforms,
            resync_on_resize: config.resync_on_resize,
        })
    }

    /// Current surface size.
    pub(crate) fn size(&self) -> PhysicalSize<u32> {
        self.context.size
    }

    /// Reconfigures the swapchain for a new window size.
    ///
    /// The `resolution` uniform keeps its start-up value unless the renderer
    /// was configured to resync it.
    pub(crate) fn resize(&mut self, new_size: PhysicalSize<u32>) {
        if !self.context.resize(new_size) {
            return;
        }
        self.multisample_target = MultisampleTarget::for_context(&self.context);
        self.uniforms
            .on_resize(new_size.width, new_size.height, self.resync_on_resize);
        tracing::debug!(
            width = new_size.width,
            height = new_size.height,
            resync = self.resync_on_resize,
            "resized surface"
        );
    }

    /// Uploads the pointer and records a single full-screen draw.
    pub(crate) fn render_frame(&mut self, pointer: Vec2) -> Result<(), wgpu::SurfaceError> {
        self.uniforms.set_mouse(pointer);
        self.context.queue.write_buffer(
            &self.uniform_buffer,
            0,
            bytemuck::bytes_of(&self.uniforms),
        );

        let frame = self.context.surface.get_current_texture()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder =
            self.context
                .device
                .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                    label: Some("lens encoder"),
                });

        let (attachment_view, resolve_target) = match &self.multisample_target {
            Some(msaa) => (&msaa.view, Some(&view)),
            None => (&view, None),
        };

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("lens pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: attachment_view,
                    depth_slice: None,
                    resolve_target,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                occlusion_query_set: None,
                timestamp_writes: None,
            });
            render_pass.set_pipeline(&self.pipeline.pipeline);
            render_pass.set_bind_group(0, &self.uniform_bind_group, &[]);
            render_pass.set_bind_group(1, &self.pipeline.texture_bind_group, &[]);
            render_pass.draw(0..3, 0..1);
        }

        self.context
            .queue
            .submit(std::iter::once(encoder.finish()));
        frame.present();
        tracing::trace!(
            mouse = ?self.uniforms.mouse,
            "presented frame size={}x{}",
            self.context.size.width,
            self.context.size.height
        );
        Ok(())
    }
}

struct MultisampleTarget {
    _texture: wgpu::Texture,
    view: wgpu::TextureView,
}

impl MultisampleTarget {
    fn for_context(context: &GpuContext) -> Option<Self> {
        (context.sample_count > 1).then(|| {
            Self::new(
                &context.device,
                context.surface_format,
                context.size,
                context.sample_count,
            )
        })
    }

    fn new(
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
        size: PhysicalSize<u32>,
        sample_count: u32,
    ) -> Self {
        let extent = wgpu::Extent3d {
            width: size.width.max(1),
            height: size.height.max(1),
            depth_or_array_layers: 1,
        };

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("lens msaa color"),
            size: extent,
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
