use std::time::{Duration, Instant};

/// High-level behaviour requested by the caller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RenderPolicy {
    /// Run the render loop continuously, optionally clamping the frame rate.
    Animate {
        /// Optional requested frames-per-second cap.
        target_fps: Option<f32>,
    },
    /// Evaluate every frame at one fixed clock value (seconds).
    Still { time: f32 },
}

impl Default for RenderPolicy {
    fn default() -> Self {
        Self::Animate { target_fps: None }
    }
}

/// Snapshot of the host clock handed to [`Scene::advance`](crate::Scene::advance).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeSample {
    /// Elapsed wall-clock or simulated time in seconds.
    pub seconds: f32,
    /// Monotonic frame counter for the running session.
    pub frame_index: u64,
}

impl TimeSample {
    pub fn new(seconds: f32, frame_index: u64) -> Self {
        Self {
            seconds,
            frame_index,
        }
    }
}

/// Abstraction over where time values originate from.
pub trait TimeSource: Send {
    /// Produces a time sample for the next frame.
    fn sample(&mut self) -> TimeSample;
}

/// Time source backed by the system monotonic clock.
#[derive(Debug, Clone, Copy)]
pub struct SystemTimeSource {
    origin: Instant,
    frame: u64,
}

impl SystemTimeSource {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Default for SystemTimeSource {
    fn default() -> Self {
        Self {
            origin: Instant::now(),
            frame: 0,
        }
    }
}

impl TimeSource for SystemTimeSource {
    fn sample(&mut self) -> TimeSample {
        let sample = TimeSample::new(self.origin.elapsed().as_secs_f32(), self.frame);
        self.frame = self.frame.saturating_add(1);
        sample
    }
}

/// Time source that always reports a fixed timestamp.
#[derive(Debug, Clone, Copy)]
pub struct FixedTimeSource {
    time: f32,
    frame: u64,
}

impl FixedTimeSource {
    pub fn new(time: f32) -> Self {
        Self { time, frame: 0 }
    }
}

impl TimeSource for FixedTimeSource {
    fn sample(&mut self) -> TimeSample {
        let sample = TimeSample::new(self.time, self.frame);
        self.frame = self.frame.saturating_add(1);
        sample
    }
}

/// Deterministic clock advancing by exactly `1 / fps` per sample, starting
/// at zero. Used for offline simulation.
#[derive(Debug, Clone, Copy)]
pub struct SteppedTimeSource {
    fps: f32,
    frame: u64,
}

impl SteppedTimeSource {
    pub fn new(fps: f32) -> Self {
        let fps = if fps.is_finite() && fps > 0.0 {
            fps
        } else {
            60.0
        };
        Self { fps, frame: 0 }
    }

    pub fn fps(&self) -> f32 {
        self.fps
    }
}

impl TimeSource for SteppedTimeSource {
    fn sample(&mut self) -> TimeSample {
        let sample = TimeSample::new(self.frame as f32 / self.fps, self.frame);
        self.frame = self.frame.saturating_add(1);
        sample
    }
}

pub type BoxedTimeSource = Box<dyn TimeSource + Send>;

/// Builds a time source suited to the requested render policy.
pub fn time_source_for_policy(policy: &RenderPolicy) -> BoxedTimeSource {
    match policy {
        RenderPolicy::Animate { .. } => Box::new(SystemTimeSource::new()),
        RenderPolicy::Still { time } => Box::new(FixedTimeSource::new(*time)),
    }
}

/// Slack allowed when comparing against the next frame deadline, so a wakeup
/// that lands a hair early still renders.
const DEADLINE_SLACK: Duration = Duration::from_micros(250);

/// Decides when the window loop should request the next redraw.
#[derive(Debug, Clone)]
pub struct FrameScheduler {
    interval: Option<Duration>,
    continuous: bool,
    last_frame: Option<Instant>,
}

impl FrameScheduler {
    pub fn new(policy: &RenderPolicy) -> Self {
        match policy {
            RenderPolicy::Animate { target_fps } => Self {
                interval: target_fps
                    .filter(|fps| fps.is_finite() && *fps > 0.0)
                    .map(|fps| Duration::from_secs_f32(1.0 / fps)),
                continuous: true,
                last_frame: None,
            },
            RenderPolicy::Still { .. } => Self {
                interval: None,
                continuous: false,
                last_frame: None,
            },
        }
    }

    pub fn reset(&mut self) {
        self.last_frame = None;
    }

    pub fn mark_rendered(&mut self, now: Instant) {
        self.last_frame = Some(now);
    }

    pub fn ready_for_frame(&self, now: Instant) -> bool {
        match (self.last_frame, self.interval) {
            (None, _) => true,
            (Some(_), None) => self.continuous,
            (Some(last), Some(interval)) => now + DEADLINE_SLACK >= last + interval,
        }
    }

    /// When the loop should wake up next, if it has to at all.
    pub fn next_deadline(&self) -> Option<Instant> {
        match (self.last_frame, self.interval) {
            (Some(last), Some(interval)) if self.continuous => Some(last + interval),
            _ => None,
        }
    }
}
