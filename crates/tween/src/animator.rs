use std::fmt;

use crate::tween::{Tween, TweenSample, TweenSpec};

/// A set of named float parameters the animator can read and write.
pub trait Animated {
    type Field: Copy + Eq + fmt::Debug;

    fn value(&self, field: Self::Field) -> f32;
    fn set_value(&mut self, field: Self::Field, value: f32);
}

/// Lifecycle events of a rendered surface that may start tweens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifecycleEvent {
    Mount,
    PointerEnter,
    PointerLeave,
}

impl fmt::Display for LifecycleEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LifecycleEvent::Mount => f.write_str("mount"),
            LifecycleEvent::PointerEnter => f.write_str("pointer-enter"),
            LifecycleEvent::PointerLeave => f.write_str("pointer-leave"),
        }
    }
}

/// Tweens to start for each lifecycle event.
#[derive(Debug, Clone, PartialEq)]
pub struct EventBindings<F> {
    bindings: Vec<(LifecycleEvent, F, TweenSpec)>,
}

impl<F: Copy> EventBindings<F> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bind(mut self, event: LifecycleEvent, field: F, spec: TweenSpec) -> Self {
        self.bindings.push((event, field, spec));
        self
    }

    pub fn for_event(&self, event: LifecycleEvent) -> impl Iterator<Item = (F, TweenSpec)> + '_ {
        self.bindings
            .iter()
            .filter(move |(bound, _, _)| *bound == event)
            .map(|(_, field, spec)| (*field, *spec))
    }
}

impl<F> Default for EventBindings<F> {
    fn default() -> Self {
        Self {
            bindings: Vec::new(),
        }
    }
}

/// Drives tweens over the fields of an [`Animated`] target.
///
/// At most one tween is active per field. Starting a tween on a field that is
/// already animating replaces the old tween; the new one departs from the
/// field's current value, so the trajectory stays continuous.
#[derive(Debug, Clone)]
pub struct ParameterAnimator<F> {
    bindings: EventBindings<F>,
    tweens: Vec<Tween<F>>,
}

impl<F: Copy + Eq + fmt::Debug> ParameterAnimator<F> {
    pub fn new(bindings: EventBindings<F>) -> Self {
        Self {
            bindings,
            tweens: Vec::new(),
        }
    }

    pub fn is_animating(&self, field: F) -> bool {
        self.tweens.iter().any(|tween| tween.field() == field)
    }

    pub fn active_tweens(&self) -> usize {
        self.tweens.len()
    }

    /// Starts the tweens bound to `event` and returns how many were started.
    pub fn trigger<T>(&mut self, target: &mut T, event: LifecycleEvent, now: f32) -> usize
    where
        T: Animated<Field = F>,
    {
        let started: Vec<(F, TweenSpec)> = self.bindings.for_event(event).collect();
        for (field, spec) in &started {
            self.animate(target, *field, *spec, now);
        }
        tracing::trace!(%event, started = started.len(), now, "lifecycle event");
        started.len()
    }

    pub fn animate<T>(&mut self, target: &mut T, field: F, spec: TweenSpec, now: f32)
    where
        T: Animated<Field = F>,
    {
        // Settle every field at `now` first so the override departs from the
        // value the previous tween actually reached.
        self.advance(target, now);
        self.tweens.retain(|tween| tween.field() != field);
        self.tweens.push(Tween::new(field, spec, now));
        // Zero-delay tweens pin their start value immediately.
        self.advance(target, now);
    }

    /// Samples every active tween at `now`, writes the results into `target`
    /// and drops finished tweens. Returns the number still running.
    pub fn advance<T>(&mut self, target: &mut T, now: f32) -> usize
    where
        T: Animated<Field = F>,
    {
        self.tweens.retain_mut(|tween| {
            let field = tween.field();
            match tween.sample(now, target.value(field)) {
                TweenSample::Pending => true,
                TweenSample::Running(value) => {
                    target.set_value(field, value);
                    true
                }
                TweenSample::Finished(value) => {
                    target.set_value(field, value);
                    false
                }
            }
        });
        self.tweens.len()
    }
}
