//! wgpu side of the renderer.
//!
//! - `context` owns the instance/device/surface wiring and MSAA selection.
//! - `pipeline` compiles the ripple GLSL into one render pipeline with a
//!   uniform group and a texture group.
//! - `textures` uploads decoded surface images once per shared image.
//! - `uniforms` is the std140 mirror of the shader's uniform block.
//! - `state` ties them together: one set of buffers per scene surface, drawn
//!   into its own viewport each frame.

mod context;
mod pipeline;
mod state;
mod textures;
mod uniforms;

pub(crate) use state::GpuState;
