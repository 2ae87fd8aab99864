use crate::runtime::RenderPolicy;

/// MSAA request for the window path. The CPU exporter ignores it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Antialiasing {
    /// Highest sample count the surface format resolves.
    #[default]
    Auto,
    Off,
    /// Explicit sample count; unsupported counts fall back to the next lower one.
    Samples(u32),
}

/// Window settings handed to [`Renderer`](crate::Renderer).
#[derive(Debug, Clone, PartialEq)]
pub struct RendererConfig {
    /// Physical pixels; the planes stack vertically inside it.
    pub surface_size: (u32, u32),
    pub title: String,
    pub antialiasing: Antialiasing,
    pub policy: RenderPolicy,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            surface_size: (1280, 1600),
            title: "ripplewall".to_owned(),
            antialiasing: Antialiasing::Auto,
            policy: RenderPolicy::Animate { target_fps: None },
        }
    }
}
