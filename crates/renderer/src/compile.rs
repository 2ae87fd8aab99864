use std::borrow::Cow;

use ripple::glsl::{FRAGMENT_SHADER, VERTEX_SHADER};
use wgpu::naga::ShaderStage;

/// Compiles the plane vertex shader through naga's GLSL frontend.
pub(crate) fn compile_vertex_shader(device: &wgpu::Device) -> wgpu::ShaderModule {
    device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("ripple vertex"),
        source: wgpu::ShaderSource::Glsl {
            shader: Cow::Borrowed(VERTEX_SHADER),
            stage: ShaderStage::Vertex,
            defines: &[],
        },
    })
}

pub(crate) fn compile_fragment_shader(device: &wgpu::Device) -> wgpu::ShaderModule {
    device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("ripple fragment"),
        source: wgpu::ShaderSource::Glsl {
            shader: Cow::Borrowed(FRAGMENT_SHADER),
            stage: ShaderStage::Fragment,
            defines: &[],
        },
    })
}
