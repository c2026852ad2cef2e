use anyhow::Result;
use refraction::ImageTexture;
use wgpu::util::{DeviceExt, TextureDataOrder};

use super::context::SurfaceColorSpace;

/// The source image on the GPU, bound as `u_tex`.
pub(crate) struct SourceTexture {
    _texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub sampler: wgpu::Sampler,
    pub size: (u32, u32),
}

impl SourceTexture {
    /// Uploads `image` with rows reordered bottom-up so `v = 0` addresses the
    /// bottom of the picture, as the CPU sampler does.
    pub(crate) fn upload(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        image: &ImageTexture,
        color_space: SurfaceColorSpace,
        max_dimension: u32,
    ) -> Result<Self> {
        let (width, height) = image.dimensions();
        if width > max_dimension || height > max_dimension {
            anyhow::bail!(
                "source image is {width}x{height} but the GPU max texture dimension is {max_dimension}"
            );
        }

        let rgba = image.bottom_up_rgba();
        let format = color_space.texture_format();
        let texture = device.create_texture_with_data(
            queue,
            &wgpu::TextureDescriptor {
                label: Some("lens source texture"),
                size: wgpu::Extent3d {
                    width,
                    height,
                    depth_or_array_layers: 1,
                },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format,
                usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
                view_formats: &[],
            },
            TextureDataOrder::LayerMajor,
            rgba.as_raw(),
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("lens source sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        tracing::debug!(width, height, ?format, "uploaded source texture");

        Ok(Self {
            _texture: texture,
            view,
            sampler,
            size: (width, height),
        })
    }
}
