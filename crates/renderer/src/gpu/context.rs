use std::sync::Arc;

use anyhow::{bail, Context as _, Result};
use wgpu::TextureFormatFeatureFlags;
use winit::dpi::PhysicalSize;
use winit::window::Window;

use crate::types::Antialiasing;

/// Device, queue and configured swapchain of the preview window.
pub(crate) struct GpuContext {
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pub size: PhysicalSize<u32>,
    pub sample_count: u32,
}

impl GpuContext {
    pub(crate) fn new(window: Arc<Window>, antialiasing: Antialiasing) -> Result<Self> {
        let inner = window.inner_size();
        let size = PhysicalSize::new(inner.width.max(1), inner.height.max(1));

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());
        let surface = instance
            .create_surface(window)
            .context("window does not support a wgpu surface")?;
        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            compatible_surface: Some(&surface),
            ..Default::default()
        }))
        .context("no GPU adapter can present to this window")?;

        let info = adapter.get_info();
        tracing::debug!(
            adapter = %info.name,
            backend = ?info.backend,
            device_type = ?info.device_type,
            "adapter selected"
        );

        let limits = adapter.limits();
        let max_side = limits.max_texture_dimension_2d;
        if size.width > max_side || size.height > max_side {
            bail!(
                "window {}x{} exceeds the adapter's {max_side}px texture limit",
                size.width,
                size.height
            );
        }

        let caps = surface.get_capabilities(&adapter);
        let format = pick_surface_format(&caps.formats)
            .context("surface reports no supported formats")?;
        let features = adapter.get_texture_format_features(format);
        let sample_count = select_sample_count(
            antialiasing,
            features.flags.supported_sample_counts(),
            features
                .flags
                .contains(TextureFormatFeatureFlags::MULTISAMPLE_RESOLVE),
            info.device_type == wgpu::DeviceType::Cpu,
        );

        // 8x and 16x are adapter specific in wgpu.
        let required_features = if sample_count > 4 {
            wgpu::Features::TEXTURE_ADAPTER_SPECIFIC_FORMAT_FEATURES
        } else {
            wgpu::Features::empty()
        };
        let (device, queue) = pollster::block_on(adapter.request_device(&wgpu::DeviceDescriptor {
            label: Some("ripplewall device"),
            required_features,
            required_limits: limits,
            ..Default::default()
        }))
        .context("failed to open the GPU device")?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width,
            height: size.height,
            present_mode: pick_present_mode(&caps.present_modes),
            alpha_mode: caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: Vec::new(),
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);
        tracing::debug!(
            ?format,
            present_mode = ?config.present_mode,
            sample_count,
            "swapchain configured"
        );

        Ok(Self {
            surface,
            device,
            queue,
            config,
            size,
            sample_count,
        })
    }

    /// Reconfigures the swapchain; zero-sized (minimised) windows are ignored.
    pub(crate) fn resize(&mut self, new_size: PhysicalSize<u32>) {
        if new_size.width == 0 || new_size.height == 0 {
            return;
        }
        self.size = new_size;
        self.config.width = new_size.width;
        self.config.height = new_size.height;
        self.surface.configure(&self.device, &self.config);
    }
}

/// Shaded colours are written as-is, so a linear (non-sRGB) target keeps the
/// window byte-compatible with a CPU export.
fn pick_surface_format(formats: &[wgpu::TextureFormat]) -> Option<wgpu::TextureFormat> {
    formats
        .iter()
        .copied()
        .find(|format| !format.is_srgb())
        .or_else(|| formats.first().copied())
}

fn pick_present_mode(modes: &[wgpu::PresentMode]) -> wgpu::PresentMode {
    if modes.contains(&wgpu::PresentMode::Fifo) {
        wgpu::PresentMode::Fifo
    } else {
        modes.first().copied().unwrap_or(wgpu::PresentMode::Fifo)
    }
}

fn select_sample_count(
    antialiasing: Antialiasing,
    mut supported: Vec<u32>,
    supports_resolve: bool,
    is_software: bool,
) -> u32 {
    supported.push(1);
    supported.sort_unstable();
    supported.dedup();
    let highest = supported.last().copied().unwrap_or(1);

    let count = match antialiasing {
        Antialiasing::Off => return 1,
        Antialiasing::Auto => highest,
        Antialiasing::Samples(requested) => {
            let count = supported
                .iter()
                .copied()
                .rev()
                .find(|&count| count <= requested)
                .unwrap_or(1);
            if count != requested {
                tracing::warn!(requested, count, ?supported, "MSAA sample count unavailable");
            }
            count
        }
    };

    if count > 1 && !supports_resolve {
        tracing::warn!("surface format cannot resolve MSAA; rendering without it");
        return 1;
    }
    if count > 1 && is_software {
        tracing::warn!(count, "software adapter; rendering without MSAA");
        return 1;
    }
    count
}
