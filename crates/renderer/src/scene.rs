use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use glam::Vec2;
use ripple::{RippleUniforms, Texture, TextureError, UniformError, UniformField};
use sceneconfig::{AnimationPolicy, ResolvedSurface, SceneConfig};
use tween::{EventBindings, LifecycleEvent, ParameterAnimator, TweenSpec};

use crate::camera::Camera;
use crate::layout::{stack_viewports, Viewport};
use crate::mesh::PlaneMesh;

#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    #[error(transparent)]
    Texture(#[from] TextureError),
    #[error("invalid uniforms for {path}: {source}")]
    Uniform {
        path: PathBuf,
        #[source]
        source: UniformError,
    },
    #[error("scene has no surfaces")]
    Empty,
}

/// Every lifecycle event drives the noise amplitude.
pub fn bindings_from_policy(policy: &AnimationPolicy) -> EventBindings<UniformField> {
    EventBindings::new()
        .bind(
            LifecycleEvent::Mount,
            UniformField::NoiseAmplitude,
            TweenSpec::from(policy.mount),
        )
        .bind(
            LifecycleEvent::PointerEnter,
            UniformField::NoiseAmplitude,
            TweenSpec::from(policy.pointer_enter),
        )
        .bind(
            LifecycleEvent::PointerLeave,
            UniformField::NoiseAmplitude,
            TweenSpec::from(policy.pointer_leave),
        )
}

/// One textured plane and the animation state that drives its uniforms.
#[derive(Debug)]
pub struct Surface {
    image: PathBuf,
    uniforms: RippleUniforms,
    texture: Arc<Texture>,
    frequency: f32,
    mesh: PlaneMesh,
    animator: ParameterAnimator<UniformField>,
    hovered: bool,
    pending: Option<LifecycleEvent>,
}

impl Surface {
    fn new(
        resolved: &ResolvedSurface,
        texture: Arc<Texture>,
        bindings: EventBindings<UniformField>,
    ) -> Result<Self, SceneError> {
        let uniforms = RippleUniforms::new(resolved.repeats, resolved.noise_amplitude).map_err(
            |source| SceneError::Uniform {
                path: resolved.image.clone(),
                source,
            },
        )?;
        let [width, height] = resolved.size;
        Ok(Self {
            image: resolved.image.clone(),
            uniforms,
            texture,
            frequency: resolved.frequency,
            mesh: PlaneMesh::new(width, height, resolved.segments, resolved.segments),
            animator: ParameterAnimator::new(bindings),
            hovered: false,
            pending: None,
        })
    }

    pub fn image(&self) -> &Path {
        &self.image
    }

    pub fn uniforms(&self) -> &RippleUniforms {
        &self.uniforms
    }

    pub fn texture(&self) -> &Arc<Texture> {
        &self.texture
    }

    pub fn frequency(&self) -> f32 {
        self.frequency
    }

    pub fn mesh(&self) -> &PlaneMesh {
        &self.mesh
    }

    pub fn plane_size(&self) -> Vec2 {
        Vec2::new(self.mesh.width(), self.mesh.height())
    }

    pub fn is_hovered(&self) -> bool {
        self.hovered
    }

    pub fn pending_event(&self) -> Option<LifecycleEvent> {
        self.pending
    }

    /// Queues a pointer-enter for the next [`Scene::advance`], replacing any
    /// event still waiting.
    pub fn pointer_enter(&mut self) {
        self.hovered = true;
        self.pending = Some(LifecycleEvent::PointerEnter);
    }

    pub fn pointer_leave(&mut self) {
        self.hovered = false;
        self.pending = Some(LifecycleEvent::PointerLeave);
    }

    /// Records the current hit state and queues enter/leave on transitions.
    pub fn set_hovered(&mut self, hovered: bool) -> bool {
        if hovered == self.hovered {
            return false;
        }
        if hovered {
            self.pointer_enter();
        } else {
            self.pointer_leave();
        }
        tracing::trace!(image = %self.image.display(), hovered, "pointer transition");
        true
    }

    fn mount(&mut self, now: f32) {
        self.animator
            .trigger(&mut self.uniforms, LifecycleEvent::Mount, now);
    }

    fn advance(&mut self, clock: f32) {
        if let Some(event) = self.pending.take() {
            self.animator.trigger(&mut self.uniforms, event, clock);
        }
        self.animator.advance(&mut self.uniforms, clock);
        self.uniforms.set_time(clock * self.frequency);
    }
}

/// The surfaces on screen, in layout order.
#[derive(Debug)]
pub struct Scene {
    surfaces: Vec<Surface>,
    gap: u32,
    mounted: bool,
}

impl Scene {
    /// Loads every texture up front; a missing image fails the whole scene.
    pub fn new(
        resolved: &[ResolvedSurface],
        policy: &AnimationPolicy,
        gap: u32,
    ) -> Result<Self, SceneError> {
        if resolved.is_empty() {
            return Err(SceneError::Empty);
        }

        let mut textures: HashMap<PathBuf, Arc<Texture>> = HashMap::new();
        let mut surfaces = Vec::with_capacity(resolved.len());
        for entry in resolved {
            let texture = match textures.get(&entry.image) {
                Some(texture) => Arc::clone(texture),
                None => {
                    let texture = Arc::new(Texture::open(&entry.image)?);
                    textures.insert(entry.image.clone(), Arc::clone(&texture));
                    texture
                }
            };
            surfaces.push(Surface::new(entry, texture, bindings_from_policy(policy))?);
        }

        tracing::debug!(
            surfaces = surfaces.len(),
            textures = textures.len(),
            gap,
            "scene built"
        );
        Ok(Self {
            surfaces,
            gap,
            mounted: false,
        })
    }

    pub fn from_config(config: &SceneConfig, base_dir: &Path) -> Result<Self, SceneError> {
        Self::new(
            &config.resolve_surfaces(base_dir),
            &config.animation,
            config.gap,
        )
    }

    pub fn surfaces(&self) -> &[Surface] {
        &self.surfaces
    }

    pub fn surface(&self, index: usize) -> Option<&Surface> {
        self.surfaces.get(index)
    }

    pub fn surface_mut(&mut self, index: usize) -> Option<&mut Surface> {
        self.surfaces.get_mut(index)
    }

    pub fn len(&self) -> usize {
        self.surfaces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.surfaces.is_empty()
    }

    pub fn gap(&self) -> u32 {
        self.gap
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Fires the mount event on every surface. Later calls do nothing.
    pub fn mount(&mut self, now: f32) {
        if self.mounted {
            return;
        }
        self.mounted = true;
        for surface in &mut self.surfaces {
            surface.mount(now);
        }
        tracing::info!(surfaces = self.surfaces.len(), now, "scene mounted");
    }

    /// Per-frame update: mounts on the first call, applies queued pointer
    /// events, advances every tween and sets each surface's shader time.
    pub fn advance(&mut self, clock: f32) {
        self.mount(clock);
        for surface in &mut self.surfaces {
            surface.advance(clock);
        }
    }

    pub fn layout(&self, window: (u32, u32)) -> Vec<Viewport> {
        stack_viewports(window, self.surfaces.len(), self.gap)
    }

    /// Hit-tests `cursor` (window pixels, `None` once it left the window)
    /// against every surface and queues enter/leave transitions.
    pub fn update_pointer(&mut self, window: (u32, u32), cursor: Option<Vec2>) {
        let viewports = self.layout(window);
        for (surface, viewport) in self.surfaces.iter_mut().zip(viewports) {
            let hit = cursor
                .filter(|point| viewport.contains(*point))
                .and_then(|point| {
                    Camera::new(viewport.aspect()).pick(viewport.to_ndc(point), surface.plane_size())
                })
                .is_some();
            surface.set_hovered(hit);
        }
    }
}
