use ripple::{Filter, Texture};
use wgpu::util::{DeviceExt, TextureDataOrder};

pub(crate) struct TextureResources {
    _texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub sampler: wgpu::Sampler,
}

/// Uploads a decoded image. Rows are already bottom-up, so texture row 0 is
/// `uv.y == 0` just like the CPU sampler.
pub(crate) fn upload(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    texture: &Texture,
    label: &str,
) -> TextureResources {
    let (width, height) = texture.dimensions();
    let gpu_texture = device.create_texture_with_data(
        queue,
        &wgpu::TextureDescriptor {
            label: Some(label),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8Unorm,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        },
        TextureDataOrder::LayerMajor,
        texture.as_bytes(),
    );

    let filter = match texture.filter() {
        Filter::Nearest => wgpu::FilterMode::Nearest,
        Filter::Linear => wgpu::FilterMode::Linear,
    };
    let view = gpu_texture.create_view(&wgpu::TextureViewDescriptor::default());
    let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
        label: Some(label),
        address_mode_u: wgpu::AddressMode::Repeat,
        address_mode_v: wgpu::AddressMode::Repeat,
        address_mode_w: wgpu::AddressMode::Repeat,
        mag_filter: filter,
        min_filter: filter,
        mipmap_filter: wgpu::FilterMode::Nearest,
        ..Default::default()
    });

    tracing::debug!(label, width, height, "uploaded surface texture");
    TextureResources {
        _texture: gpu_texture,
        view,
        sampler,
    }
}
