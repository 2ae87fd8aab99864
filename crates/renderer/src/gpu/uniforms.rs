use bytemuck::{Pod, Zeroable};
use ripple::RippleUniforms;

use crate::camera::Camera;

/// std140 mirror of the `RippleParams` uniform block.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub(crate) struct GpuUniforms {
    pub view_proj: [[f32; 4]; 4],
    pub repeats: f32,
    pub time: f32,
    pub noise_amplitude: f32,
    pub _padding: f32,
}

impl GpuUniforms {
    pub fn new(camera: &Camera, uniforms: &RippleUniforms) -> Self {
        Self {
            view_proj: camera.view_proj().to_cols_array_2d(),
            repeats: uniforms.repeats(),
            time: uniforms.time(),
            noise_amplitude: uniforms.noise_amplitude(),
            _padding: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_matches_std140_block() {
        assert_eq!(std::mem::size_of::<GpuUniforms>(), 80);
    }

    #[test]
    fn copies_surface_values() {
        let uniforms = RippleUniforms::new(2.0, 0.03).unwrap().with_time(4.8);
        let gpu = GpuUniforms::new(&Camera::new(1.5), &uniforms);
        assert_eq!(gpu.repeats, 2.0);
        assert_eq!(gpu.time, 4.8);
        assert_eq!(gpu.noise_amplitude, 0.03);
        assert_eq!(bytemuck::bytes_of(&gpu).len(), 80);
    }
}
