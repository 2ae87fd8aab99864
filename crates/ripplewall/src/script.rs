use anyhow::{bail, Result};
use renderer::Scene;
use tween::LifecycleEvent;

/// One pointer transition replayed during an offline simulation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScriptedEvent {
    pub at: f32,
    pub surface: usize,
    pub event: LifecycleEvent,
}

/// Pointer transitions in time order, fed to the scene as the simulated
/// clock passes them.
#[derive(Debug, Clone, Default)]
pub struct PointerScript {
    events: Vec<ScriptedEvent>,
    next: usize,
}

impl PointerScript {
    pub fn new(mut events: Vec<ScriptedEvent>) -> Self {
        events.sort_by(|a, b| a.at.total_cmp(&b.at));
        Self { events, next: 0 }
    }

    /// Fails when an event targets a surface the scene does not have.
    pub fn check(&self, scene: &Scene) -> Result<()> {
        if let Some(event) = self.events.iter().find(|event| event.surface >= scene.len()) {
            bail!(
                "surface index {} out of range; the scene has {} surface(s)",
                event.surface,
                scene.len()
            );
        }
        Ok(())
    }

    /// Queues every event due at or before `clock`. Returns how many were
    /// queued.
    pub fn apply_due(&mut self, scene: &mut Scene, clock: f32) -> usize {
        let mut applied = 0;
        while let Some(event) = self.events.get(self.next).copied() {
            if event.at > clock {
                break;
            }
            self.next += 1;
            let Some(surface) = scene.surface_mut(event.surface) else {
                continue;
            };
            match event.event {
                LifecycleEvent::PointerEnter => surface.pointer_enter(),
                LifecycleEvent::PointerLeave => surface.pointer_leave(),
                LifecycleEvent::Mount => continue,
            }
            tracing::debug!(
                surface = event.surface,
                event = %event.event,
                at = event.at,
                clock,
                "scripted pointer event"
            );
            applied += 1;
        }
        applied
    }

    pub fn remaining(&self) -> usize {
        self.events.len() - self.next
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use image::{Rgba, RgbaImage};
    use sceneconfig::SceneConfig;
    use tempfile::TempDir;

    use super::*;

    fn scene(dir: &TempDir, count: usize) -> Scene {
        let path: PathBuf = dir.path().join("plane.png");
        RgbaImage::from_pixel(2, 2, Rgba([10, 20, 30, 255]))
            .save(&path)
            .unwrap();
        let config = SceneConfig::from_images(std::iter::repeat(path).take(count)).unwrap();
        Scene::from_config(&config, dir.path()).unwrap()
    }

    fn event(at: f32, surface: usize, event: LifecycleEvent) -> ScriptedEvent {
        ScriptedEvent { at, surface, event }
    }

    #[test]
    fn events_apply_in_time_order_once() {
        let dir = TempDir::new().unwrap();
        let mut scene = scene(&dir, 1);
        let mut script = PointerScript::new(vec![
            event(2.0, 0, LifecycleEvent::PointerLeave),
            event(1.0, 0, LifecycleEvent::PointerEnter),
        ]);

        assert_eq!(script.apply_due(&mut scene, 0.5), 0);
        assert_eq!(script.apply_due(&mut scene, 1.0), 1);
        assert_eq!(
            scene.surface(0).unwrap().pending_event(),
            Some(LifecycleEvent::PointerEnter)
        );
        assert_eq!(script.apply_due(&mut scene, 1.5), 0);
        assert_eq!(script.apply_due(&mut scene, 3.0), 1);
        assert_eq!(
            scene.surface(0).unwrap().pending_event(),
            Some(LifecycleEvent::PointerLeave)
        );
        assert_eq!(script.remaining(), 0);
    }

    #[test]
    fn out_of_range_surface_is_rejected() {
        let dir = TempDir::new().unwrap();
        let scene = scene(&dir, 2);
        let script = PointerScript::new(vec![event(0.0, 2, LifecycleEvent::PointerEnter)]);
        assert!(script.check(&scene).is_err());
    }
}
