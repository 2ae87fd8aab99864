//! Renderer crate for ripplewall.
//!
//! Glues the preview window, the `wgpu` pipeline and the animated scene
//! together. The overall flow is:
//!
//! ```text
//!   CLI / ripplewall
//!          │ RendererConfig + Scene
//!          ▼
//!   Renderer::run ──▶ WindowState ──▶ winit event loop ──▶ render_frame()
//!          ▲                 │                                  │
//!          │                 └─▶ cursor ─▶ Scene::update_pointer │
//!          │                                                    ├─▶ Scene::advance(clock)
//!          │                                                    └─▶ GpuState::render ─▶ UBO per surface
//! ```
//!
//! `Scene` owns every surface's uniforms and animator and never touches the
//! GPU, so the same scene can be rendered to a PNG with [`render_still`].
//! `GpuState` uploads each distinct image once and draws every surface into
//! its own viewport of the window.

mod camera;
mod compile;
mod export;
mod gpu;
mod layout;
mod mesh;
mod runtime;
mod scene;
mod types;
mod window;

use anyhow::Result;

pub use camera::{Camera, PlanePicker, DEFAULT_CAMERA_DISTANCE, DEFAULT_FOV_Y_DEGREES};
pub use export::{export_png, render_still};
pub use layout::{stack_viewports, Viewport};
pub use mesh::{PlaneMesh, Vertex};
pub use runtime::{
    time_source_for_policy, BoxedTimeSource, FixedTimeSource, FrameScheduler, RenderPolicy,
    SteppedTimeSource, SystemTimeSource, TimeSample, TimeSource,
};
pub use scene::{bindings_from_policy, Scene, SceneError, Surface};
pub use types::{Antialiasing, RendererConfig};

/// Public entry point used by the CLI.
pub struct Renderer {
    config: RendererConfig,
}

impl Renderer {
    pub fn new(config: RendererConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RendererConfig {
        &self.config
    }

    /// Opens the window and animates `scene` until the window closes.
    ///
    /// Fails when no window or GPU device can be created (for example on a
    /// headless machine); use [`export_png`] there instead.
    pub fn run(&mut self, scene: Scene) -> Result<()> {
        tracing::info!(
            surfaces = scene.len(),
            width = self.config.surface_size.0,
            height = self.config.surface_size.1,
            policy = ?self.config.policy,
            "starting renderer"
        );
        window::run_window(&self.config, scene)
    }
}
