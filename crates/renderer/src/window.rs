use std::sync::Arc;
use std::time::Instant;

use anyhow::{anyhow, Context, Result};
use glam::Vec2;
use winit::dpi::{PhysicalPosition, PhysicalSize};
use winit::event::{ElementState, Event, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::keyboard::{Key, NamedKey};
use winit::window::{Window, WindowBuilder};

use crate::gpu::GpuState;
use crate::runtime::{time_source_for_policy, BoxedTimeSource, FrameScheduler};
use crate::scene::Scene;
use crate::types::RendererConfig;

/// Everything the event loop closure owns: the window, its GPU state, the
/// scene being animated and the frame clock.
struct WindowState {
    window: Arc<Window>,
    gpu: GpuState,
    scene: Scene,
    cursor: Option<Vec2>,
    scheduler: FrameScheduler,
    time_source: BoxedTimeSource,
}

impl WindowState {
    fn new(window: Arc<Window>, scene: Scene, config: &RendererConfig) -> Result<Self> {
        let gpu = GpuState::new(Arc::clone(&window), &scene, config.antialiasing)
            .context("failed to initialise GPU state")?;
        Ok(Self {
            window,
            gpu,
            scene,
            cursor: None,
            scheduler: FrameScheduler::new(&config.policy),
            time_source: time_source_for_policy(&config.policy),
        })
    }

    fn window_size(&self) -> (u32, u32) {
        let size = self.gpu.size();
        (size.width, size.height)
    }

    fn handle_cursor(&mut self, position: Option<PhysicalPosition<f64>>) {
        self.cursor = position.map(|p| Vec2::new(p.x as f32, p.y as f32));
        let window = self.window_size();
        self.scene.update_pointer(window, self.cursor);
    }

    fn resize(&mut self, new_size: PhysicalSize<u32>) {
        self.gpu.resize(new_size);
        let window = self.window_size();
        self.scene.update_pointer(window, self.cursor);
        self.scheduler.reset();
        self.window.request_redraw();
    }

    fn render_frame(&mut self) -> Result<(), wgpu::SurfaceError> {
        let sample = self.time_source.sample();
        self.scene.advance(sample.seconds);
        self.gpu.render(&self.scene)?;
        self.scheduler.mark_rendered(Instant::now());
        Ok(())
    }
}

/// Opens the window and drives the `winit` event loop until it closes.
pub(crate) fn run_window(config: &RendererConfig, scene: Scene) -> Result<()> {
    let event_loop = EventLoop::new().context("failed to initialize event loop")?;
    let window_size = PhysicalSize::new(config.surface_size.0, config.surface_size.1);
    let window = WindowBuilder::new()
        .with_title(config.title.as_str())
        .with_inner_size(window_size)
        .build(&event_loop)
        .context("failed to create window")?;
    let mut state = WindowState::new(Arc::new(window), scene, config)?;
    state.window.request_redraw();

    let run_result = event_loop.run(move |event, elwt| match event {
        Event::WindowEvent { window_id, event } if window_id == state.window.id() => match event {
            WindowEvent::CloseRequested | WindowEvent::Destroyed => elwt.exit(),
            WindowEvent::KeyboardInput { event, .. } => {
                if event.state == ElementState::Pressed
                    && matches!(event.logical_key, Key::Named(NamedKey::Escape))
                {
                    elwt.exit();
                }
            }
            WindowEvent::CursorMoved { position, .. } => state.handle_cursor(Some(position)),
            WindowEvent::CursorLeft { .. } => state.handle_cursor(None),
            WindowEvent::Resized(new_size) => state.resize(new_size),
            WindowEvent::RedrawRequested => match state.render_frame() {
                Ok(()) => {}
                Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                    let size = state.gpu.size();
                    state.resize(size);
                }
                Err(wgpu::SurfaceError::OutOfMemory) => {
                    tracing::error!("surface out of memory; closing window");
                    elwt.exit();
                }
                Err(wgpu::SurfaceError::Timeout) => {
                    tracing::warn!("surface timeout; retrying next frame");
                }
                Err(other) => {
                    tracing::warn!(error = ?other, "surface error; retrying next frame");
                }
            },
            _ => {}
        },
        Event::AboutToWait => {
            let now = Instant::now();
            if state.scheduler.ready_for_frame(now) {
                state.window.request_redraw();
                elwt.set_control_flow(ControlFlow::Wait);
            } else if let Some(deadline) = state.scheduler.next_deadline() {
                elwt.set_control_flow(ControlFlow::WaitUntil(deadline));
            } else {
                elwt.set_control_flow(ControlFlow::Wait);
            }
        }
        _ => {}
    });

    run_result.map_err(|err| anyhow!("window event loop error: {err}"))
}
