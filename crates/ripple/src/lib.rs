//! Ripple shading of image textures.
//!
//! A surface samples its image through [`shade`]: uv coordinates tile
//! `repeats` times, then get displaced by a drifting periodic noise field
//! scaled by `noise_amplitude`, and finally the red, green and blue channels
//! are fetched at slightly different offsets. The renderer runs the GLSL form
//! of this program on the GPU; the CPU form here backs still exports and
//! tests.

pub mod glsl;
pub mod shader;
mod texture;
mod uniforms;

pub use shader::{shade, CHROMATIC_OFFSET};
pub use texture::{Filter, Texture, TextureError};
pub use uniforms::{
    RippleUniforms, UniformError, UniformField, DEFAULT_NOISE_AMPLITUDE, DEFAULT_REPEATS,
};
