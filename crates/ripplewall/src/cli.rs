use std::path::PathBuf;
use std::str::FromStr;

use clap::{Args, Parser, Subcommand};
use renderer::Antialiasing;

#[derive(Parser, Debug)]
#[command(
    name = "ripplewall",
    author,
    version,
    about = "Water-ripple image planes animated on mount and hover"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Open a window and animate the scene; hovering a plane ripples it.
    Run(RunArgs),
    /// Render one still frame to a PNG without a GPU.
    Export(ExportArgs),
    /// Print the uniform trajectory of one surface as JSON lines.
    Trace(TraceArgs),
    /// Print the resolved config directory and default scene file.
    Where,
}

/// Where the surfaces come from. Falls back to `scene.toml` in the config
/// directory when neither flag is given.
#[derive(Args, Debug, Clone, Default)]
pub struct SceneArgs {
    /// Scene description (TOML); image paths resolve relative to it.
    #[arg(long, value_name = "FILE", conflicts_with = "images")]
    pub scene: Option<PathBuf>,

    /// Image to show with default parameters; repeat to stack several.
    #[arg(long = "image", value_name = "PATH")]
    pub images: Vec<PathBuf>,
}

#[derive(Args, Debug)]
pub struct RunArgs {
    #[command(flatten)]
    pub scene: SceneArgs,

    /// Window size in physical pixels (e.g. `1280x1600`).
    #[arg(long, value_name = "WIDTHxHEIGHT", default_value = "1280x1600")]
    pub size: SurfaceSize,

    /// Optional FPS cap (0 = uncapped).
    #[arg(long, value_name = "FPS")]
    pub fps: Option<f32>,

    /// Freeze the scene at this clock value instead of animating.
    #[arg(long, value_name = "SECONDS", value_parser = parse_seconds)]
    pub still_time: Option<f32>,

    /// Anti-aliasing policy: `auto`, `off`, or an explicit MSAA sample count (e.g. `4`).
    #[arg(
        long,
        value_name = "MODE",
        value_parser = parse_antialias,
        default_value = "auto"
    )]
    pub antialias: Antialiasing,
}

#[derive(Args, Debug)]
pub struct ExportArgs {
    #[command(flatten)]
    pub scene: SceneArgs,

    /// PNG file to write.
    #[arg(long, short, value_name = "PATH")]
    pub output: PathBuf,

    /// Clock value (seconds since mount) to render.
    #[arg(long, value_name = "SECONDS", default_value = "0", value_parser = parse_seconds)]
    pub time: f32,

    /// Output size in pixels.
    #[arg(long, value_name = "WIDTHxHEIGHT", default_value = "1280x1600")]
    pub size: SurfaceSize,

    /// Hover surface INDEX from SECS onwards (e.g. `0@1.5`); repeatable.
    #[arg(long, value_name = "INDEX@SECS")]
    pub hover: Vec<HoverAt>,

    /// Simulation rate used to step the animation up to `--time`.
    #[arg(long, value_name = "FPS", default_value = "60", value_parser = parse_fps)]
    pub fps: f32,
}

#[derive(Args, Debug)]
pub struct TraceArgs {
    #[command(flatten)]
    pub scene: SceneArgs,

    /// Number of frames to simulate.
    #[arg(long, value_name = "N", default_value = "240")]
    pub frames: u32,

    /// Simulated frame rate.
    #[arg(long, value_name = "FPS", default_value = "60", value_parser = parse_fps)]
    pub fps: f32,

    /// Pointer enters the traced surface at SECS; repeatable.
    #[arg(long, value_name = "SECS", value_parser = parse_seconds)]
    pub enter: Vec<f32>,

    /// Pointer leaves the traced surface at SECS; repeatable.
    #[arg(long, value_name = "SECS", value_parser = parse_seconds)]
    pub leave: Vec<f32>,

    /// Index of the surface to trace.
    #[arg(long, value_name = "INDEX", default_value = "0")]
    pub surface: usize,
}

pub fn parse() -> Cli {
    Cli::parse()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceSize {
    pub width: u32,
    pub height: u32,
}

impl From<SurfaceSize> for (u32, u32) {
    fn from(size: SurfaceSize) -> Self {
        (size.width, size.height)
    }
}

impl FromStr for SurfaceSize {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        let (width, height) = trimmed
            .split_once(['x', 'X'])
            .ok_or_else(|| format!("invalid size '{trimmed}'; expected WIDTHxHEIGHT"))?;
        let parse_dimension = |raw: &str| -> Result<u32, String> {
            match raw.trim().parse::<u32>() {
                Ok(0) => Err(format!("size '{trimmed}' must not have a zero dimension")),
                Ok(value) => Ok(value),
                Err(_) => Err(format!("invalid size '{trimmed}'; expected WIDTHxHEIGHT")),
            }
        };
        Ok(Self {
            width: parse_dimension(width)?,
            height: parse_dimension(height)?,
        })
    }
}

/// A scripted hover: surface `index` is entered at `at` seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HoverAt {
    pub index: usize,
    pub at: f32,
}

impl FromStr for HoverAt {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        let (index, at) = trimmed
            .split_once('@')
            .ok_or_else(|| format!("invalid hover '{trimmed}'; expected INDEX@SECS"))?;
        let index = index
            .trim()
            .parse::<usize>()
            .map_err(|_| format!("invalid surface index in hover '{trimmed}'"))?;
        Ok(Self {
            index,
            at: parse_seconds(at)?,
        })
    }
}

pub fn parse_antialias(value: &str) -> Result<Antialiasing, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err("anti-alias mode must not be empty".to_string());
    }

    let normalized = trimmed.to_ascii_lowercase();
    match normalized.as_str() {
        "auto" | "max" | "default" => Ok(Antialiasing::Auto),
        "off" | "none" | "disable" | "disabled" | "0" | "1" => Ok(Antialiasing::Off),
        _ => {
            let samples: u32 = normalized.parse().map_err(|_| {
                format!("invalid anti-alias sample count '{trimmed}'; use auto/off or 2/4/8/16")
            })?;
            if !matches!(samples, 2 | 4 | 8 | 16) {
                return Err(format!(
                    "unsupported sample count {samples}; supported values are 2, 4, 8, or 16"
                ));
            }
            Ok(Antialiasing::Samples(samples))
        }
    }
}

pub fn parse_seconds(value: &str) -> Result<f32, String> {
    let trimmed = value.trim();
    match trimmed.parse::<f32>() {
        Ok(seconds) if seconds.is_finite() && seconds >= 0.0 => Ok(seconds),
        Ok(_) => Err(format!("'{trimmed}' must be a non-negative number of seconds")),
        Err(_) => Err(format!("invalid number of seconds '{trimmed}'")),
    }
}

pub fn parse_fps(value: &str) -> Result<f32, String> {
    let trimmed = value.trim();
    match trimmed.parse::<f32>() {
        Ok(fps) if fps.is_finite() && fps > 0.0 => Ok(fps),
        _ => Err(format!("invalid frame rate '{trimmed}'; expected a positive number")),
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn antialias_accepts_named_modes_and_sample_counts() {
        assert_eq!(parse_antialias("auto").unwrap(), Antialiasing::Auto);
        assert_eq!(parse_antialias(" Off ").unwrap(), Antialiasing::Off);
        assert_eq!(parse_antialias("1").unwrap(), Antialiasing::Off);
        assert_eq!(parse_antialias("8").unwrap(), Antialiasing::Samples(8));
        assert!(parse_antialias("3").is_err());
        assert!(parse_antialias("").is_err());
    }

    #[test]
    fn size_parses_width_and_height() {
        assert_eq!(
            "640x480".parse::<SurfaceSize>().unwrap(),
            SurfaceSize {
                width: 640,
                height: 480
            }
        );
        assert!("640".parse::<SurfaceSize>().is_err());
        assert!("0x480".parse::<SurfaceSize>().is_err());
    }

    #[test]
    fn hover_parses_index_and_time() {
        assert_eq!(
            "1@2.5".parse::<HoverAt>().unwrap(),
            HoverAt { index: 1, at: 2.5 }
        );
        assert!("1".parse::<HoverAt>().is_err());
        assert!("x@1".parse::<HoverAt>().is_err());
        assert!("0@-1".parse::<HoverAt>().is_err());
    }

    #[test]
    fn scene_and_images_are_exclusive() {
        let result = Cli::try_parse_from([
            "ripplewall",
            "trace",
            "--scene",
            "scene.toml",
            "--image",
            "a.png",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn export_collects_repeated_hovers() {
        let cli = Cli::try_parse_from([
            "ripplewall",
            "export",
            "--image",
            "a.png",
            "--output",
            "out.png",
            "--time",
            "3",
            "--hover",
            "0@1",
            "--hover",
            "0@2",
        ])
        .unwrap();
        let Command::Export(args) = cli.command else {
            panic!("expected export command");
        };
        assert_eq!(args.time, 3.0);
        assert_eq!(args.hover.len(), 2);
        assert_eq!(args.size, SurfaceSize { width: 1280, height: 1600 });
    }
}
