//! Explicit, frame-driven parameter animation.
//!
//! There is no global animation registry: each animated surface owns a
//! [`ParameterAnimator`], the host advances it once per frame with the current
//! clock, and the animator writes eased values straight into the surface's
//! parameters through the [`Animated`] trait.
//!
//! ```text
//!   LifecycleEvent ──▶ EventBindings ──▶ Tween { from?, to, start, delay, duration, ease }
//!                                            │
//!   host clock ──▶ ParameterAnimator::advance ┴──▶ Animated::set_value
//! ```

mod animator;
mod easing;
mod tween;

pub use animator::{Animated, EventBindings, LifecycleEvent, ParameterAnimator};
pub use easing::Ease;
pub use tween::{Tween, TweenSample, TweenSpec};
