use std::path::Path;

use anyhow::{bail, Context, Result};
use renderer::{
    export_png, RenderPolicy, Renderer, RendererConfig, Scene, SteppedTimeSource, TimeSource,
};
use sceneconfig::SceneConfig;
use tracing_subscriber::EnvFilter;
use tween::LifecycleEvent;

use crate::cli::{ExportArgs, RunArgs, SceneArgs};
use crate::paths::AppPaths;
use crate::script::{PointerScript, ScriptedEvent};

const STILL_SIMULATION_FPS: f32 = 60.0;

pub fn initialise_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Builds the scene named on the command line, or the default `scene.toml`.
pub fn load_scene(args: &SceneArgs) -> Result<Scene> {
    if let Some(path) = &args.scene {
        return load_scene_file(path);
    }

    if !args.images.is_empty() {
        let config = SceneConfig::from_images(args.images.iter().cloned())
            .context("invalid image list")?;
        let base_dir = std::env::current_dir().context("failed to read working directory")?;
        return Scene::from_config(&config, &base_dir).context("failed to build scene");
    }

    let paths = AppPaths::discover()?;
    let scene_file = paths.scene_file();
    if !scene_file.exists() {
        bail!(
            "no scene given and {} does not exist; pass --scene FILE or --image PATH",
            scene_file.display()
        );
    }
    load_scene_file(&scene_file)
}

fn load_scene_file(path: &Path) -> Result<Scene> {
    let config = SceneConfig::load(path)
        .with_context(|| format!("failed to load scene {}", path.display()))?;
    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
    tracing::info!(
        scene = %path.display(),
        surfaces = config.surfaces.len(),
        "loaded scene"
    );
    Scene::from_config(&config, base_dir)
        .with_context(|| format!("failed to build scene {}", path.display()))
}

pub fn run(args: RunArgs) -> Result<()> {
    let mut scene = load_scene(&args.scene)?;
    let policy = match args.still_time {
        Some(time) => {
            // Replay the animation up to `time`; the window then holds it.
            let mut script = PointerScript::default();
            simulate(&mut scene, &mut script, STILL_SIMULATION_FPS, time);
            RenderPolicy::Still { time }
        }
        None => RenderPolicy::Animate {
            target_fps: args.fps.filter(|fps| fps.is_finite() && *fps > 0.0),
        },
    };
    let config = RendererConfig {
        surface_size: args.size.into(),
        antialiasing: args.antialias,
        policy,
        ..RendererConfig::default()
    };
    let mut renderer = Renderer::new(config);
    renderer.run(scene)
}

/// Steps the animation at `--fps` up to `--time`, replaying hovers, then
/// writes the frame through the CPU shader.
pub fn export(args: ExportArgs) -> Result<()> {
    let mut scene = load_scene(&args.scene)?;
    let events = args
        .hover
        .iter()
        .map(|hover| ScriptedEvent {
            at: hover.at,
            surface: hover.index,
            event: LifecycleEvent::PointerEnter,
        })
        .collect();
    let mut script = PointerScript::new(events);
    script.check(&scene)?;

    let frames = simulate(&mut scene, &mut script, args.fps, args.time);
    tracing::debug!(frames, time = args.time, "simulated animation");

    export_png(&scene, args.size.into(), &args.output)?;
    println!("{}", args.output.display());
    Ok(())
}

/// Advances `scene` frame by frame until the clock reaches `until`; the
/// final frame lands exactly on `until`. Returns the number of frames.
pub fn simulate(scene: &mut Scene, script: &mut PointerScript, fps: f32, until: f32) -> u64 {
    let mut clock_source = SteppedTimeSource::new(fps);
    let mut frames = 0;
    loop {
        let clock = clock_source.sample().seconds.min(until);
        script.apply_due(scene, clock);
        scene.advance(clock);
        frames += 1;
        if clock >= until {
            return frames;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use image::{Rgba, RgbaImage};
    use tempfile::TempDir;

    use super::*;

    fn write_image(dir: &TempDir) -> PathBuf {
        let path = dir.path().join("plane.png");
        RgbaImage::from_pixel(2, 2, Rgba([200, 100, 50, 255]))
            .save(&path)
            .unwrap();
        path
    }

    #[test]
    fn scene_file_paths_resolve_next_to_it() {
        let dir = TempDir::new().unwrap();
        write_image(&dir);
        let scene_path = dir.path().join("scene.toml");
        std::fs::write(
            &scene_path,
            "version = 1\n[[surfaces]]\nimage = \"plane.png\"\nrepeats = 2.0\n",
        )
        .unwrap();

        let scene = load_scene(&SceneArgs {
            scene: Some(scene_path),
            images: Vec::new(),
        })
        .unwrap();
        assert_eq!(scene.len(), 1);
        assert_eq!(scene.surface(0).unwrap().uniforms().repeats(), 2.0);
    }

    #[test]
    fn image_flags_build_a_default_scene() {
        let dir = TempDir::new().unwrap();
        let image = write_image(&dir);
        let scene = load_scene(&SceneArgs {
            scene: None,
            images: vec![image.clone(), image],
        })
        .unwrap();
        assert_eq!(scene.len(), 2);
    }

    #[test]
    fn simulation_ends_exactly_on_target() {
        let dir = TempDir::new().unwrap();
        let image = write_image(&dir);
        let mut scene = load_scene(&SceneArgs {
            scene: None,
            images: vec![image],
        })
        .unwrap();
        let mut script = PointerScript::default();

        let frames = simulate(&mut scene, &mut script, 10.0, 0.25);
        assert_eq!(frames, 4);
        let surface = scene.surface(0).unwrap();
        assert_eq!(surface.uniforms().time(), 0.25 * surface.frequency());
    }

    #[test]
    fn simulation_at_zero_only_mounts() {
        let dir = TempDir::new().unwrap();
        let image = write_image(&dir);
        let mut scene = load_scene(&SceneArgs {
            scene: None,
            images: vec![image],
        })
        .unwrap();
        let mut script = PointerScript::default();

        assert_eq!(simulate(&mut scene, &mut script, 60.0, 0.0), 1);
        assert!(scene.is_mounted());
        assert_eq!(scene.surface(0).unwrap().uniforms().time(), 0.0);
    }
}
