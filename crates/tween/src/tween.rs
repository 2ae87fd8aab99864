use std::time::Duration;

use sceneconfig::TweenSetting;

use crate::easing::Ease;

/// Target value, timing and curve for one tween, independent of when it starts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TweenSpec {
    pub to: f32,
    pub duration: Duration,
    pub delay: Duration,
    pub ease: Ease,
}

impl TweenSpec {
    pub fn new(to: f32, duration: Duration) -> Self {
        Self {
            to,
            duration,
            delay: Duration::ZERO,
            ease: Ease::default(),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_ease(mut self, ease: Ease) -> Self {
        self.ease = ease;
        self
    }
}

impl From<TweenSetting> for TweenSpec {
    fn from(setting: TweenSetting) -> Self {
        Self {
            to: setting.to,
            duration: setting.duration,
            delay: setting.delay,
            ease: setting.ease.into(),
        }
    }
}

/// One running interpolation of a single field.
///
/// The start value is captured the first time the tween is sampled after its
/// delay has elapsed, so a tween always departs from wherever the field is at
/// that moment.
#[derive(Debug, Clone, PartialEq)]
pub struct Tween<F> {
    field: F,
    from: Option<f32>,
    spec: TweenSpec,
    started_at: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TweenSample {
    /// Still inside the delay window; the field keeps its current value.
    Pending,
    Running(f32),
    Finished(f32),
}

impl<F: Copy> Tween<F> {
    pub fn new(field: F, spec: TweenSpec, started_at: f32) -> Self {
        Self {
            field,
            from: None,
            spec,
            started_at,
        }
    }

    pub fn field(&self) -> F {
        self.field
    }

    pub fn from_value(&self) -> Option<f32> {
        self.from
    }

    /// Clock time at which the tween reaches its target.
    pub fn ends_at(&self) -> f32 {
        self.started_at + self.spec.delay.as_secs_f32() + self.spec.duration.as_secs_f32()
    }

    pub fn sample(&mut self, now: f32, current: f32) -> TweenSample {
        let elapsed = now - self.started_at - self.spec.delay.as_secs_f32();
        if elapsed < 0.0 {
            return TweenSample::Pending;
        }

        let from = *self.from.get_or_insert(current);
        let duration = self.spec.duration.as_secs_f32();
        if duration <= 0.0 {
            return TweenSample::Finished(self.spec.to);
        }

        let progress = (elapsed / duration).clamp(0.0, 1.0);
        if progress >= 1.0 {
            return TweenSample::Finished(self.spec.to);
        }

        let eased = self.spec.ease.sample(progress);
        TweenSample::Running(from + (self.spec.to - from) * eased)
    }
}
