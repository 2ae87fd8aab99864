use std::io::{self, Write};

use anyhow::{bail, Context, Result};
use renderer::{Scene, SteppedTimeSource, TimeSource};
use serde::Serialize;
use tween::LifecycleEvent;

use crate::cli::TraceArgs;
use crate::run::load_scene;
use crate::script::{PointerScript, ScriptedEvent};

/// Uniform values of the traced surface after one frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TraceRecord {
    pub frame: u64,
    pub clock: f32,
    pub time: f32,
    pub noise_amplitude: f32,
    pub repeats: f32,
}

pub fn trace(args: TraceArgs) -> Result<()> {
    let mut scene = load_scene(&args.scene)?;
    if args.surface >= scene.len() {
        bail!(
            "surface index {} out of range; the scene has {} surface(s)",
            args.surface,
            scene.len()
        );
    }

    let enter = args.enter.iter().map(|&at| ScriptedEvent {
        at,
        surface: args.surface,
        event: LifecycleEvent::PointerEnter,
    });
    let leave = args.leave.iter().map(|&at| ScriptedEvent {
        at,
        surface: args.surface,
        event: LifecycleEvent::PointerLeave,
    });
    let mut script = PointerScript::new(enter.chain(leave).collect());

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let records = record_frames(&mut scene, &mut script, &args);
    for record in records {
        let line = serde_json::to_string(&record).context("failed to encode trace record")?;
        writeln!(out, "{line}").context("failed to write trace record")?;
    }
    out.flush().context("failed to flush trace output")?;
    Ok(())
}

fn record_frames(scene: &mut Scene, script: &mut PointerScript, args: &TraceArgs) -> Vec<TraceRecord> {
    let mut clock_source = SteppedTimeSource::new(args.fps);
    let mut records = Vec::with_capacity(args.frames as usize);
    for _ in 0..args.frames {
        let sample = clock_source.sample();
        script.apply_due(scene, sample.seconds);
        scene.advance(sample.seconds);
        let Some(surface) = scene.surface(args.surface) else {
            break;
        };
        let uniforms = surface.uniforms();
        records.push(TraceRecord {
            frame: sample.frame_index,
            clock: sample.seconds,
            time: uniforms.time(),
            noise_amplitude: uniforms.noise_amplitude(),
            repeats: uniforms.repeats(),
        });
    }
    records
}
