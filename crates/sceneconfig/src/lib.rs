use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use serde::de::{self, Deserializer};
use serde::Deserialize;

pub const DEFAULT_FREQUENCY: f32 = 2.4;
pub const DEFAULT_REPEATS: f32 = 1.0;
pub const DEFAULT_NOISE_AMPLITUDE: f32 = 0.045;
pub const DEFAULT_SEGMENTS: u32 = 32;
pub const DEFAULT_PLANE_SIZE: [f32; 2] = [3.0, 2.0];
pub const DEFAULT_GAP: u32 = 56;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read configuration at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Scene description: the stacked image surfaces and the tweens bound to their
/// lifecycle events.
#[derive(Debug, Clone, Deserialize)]
pub struct SceneConfig {
    pub version: u32,
    /// Vertical gap between stacked viewports, in physical pixels.
    #[serde(default = "default_gap")]
    pub gap: u32,
    #[serde(default)]
    pub defaults: SurfaceDefaults,
    #[serde(default)]
    pub animation: AnimationPolicy,
    #[serde(default)]
    pub surfaces: Vec<SurfaceConfig>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SurfaceDefaults {
    pub frequency: f32,
    pub repeats: f32,
    pub noise_amplitude: f32,
    pub segments: u32,
    pub size: [f32; 2],
}

impl Default for SurfaceDefaults {
    fn default() -> Self {
        Self {
            frequency: DEFAULT_FREQUENCY,
            repeats: DEFAULT_REPEATS,
            noise_amplitude: DEFAULT_NOISE_AMPLITUDE,
            segments: DEFAULT_SEGMENTS,
            size: DEFAULT_PLANE_SIZE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SurfaceConfig {
    pub image: PathBuf,
    #[serde(default)]
    pub frequency: Option<f32>,
    #[serde(default)]
    pub repeats: Option<f32>,
    #[serde(default)]
    pub noise_amplitude: Option<f32>,
    #[serde(default)]
    pub segments: Option<u32>,
    #[serde(default)]
    pub size: Option<[f32; 2]>,
}

impl SurfaceConfig {
    pub fn from_image(image: impl Into<PathBuf>) -> Self {
        Self {
            image: image.into(),
            frequency: None,
            repeats: None,
            noise_amplitude: None,
            segments: None,
            size: None,
        }
    }
}

/// Tween policy for each lifecycle event. Every event animates the noise
/// amplitude; the numbers are policy and may be overridden per scene.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AnimationPolicy {
    pub mount: TweenSetting,
    pub pointer_enter: TweenSetting,
    pub pointer_leave: TweenSetting,
}

impl Default for AnimationPolicy {
    fn default() -> Self {
        Self {
            mount: TweenSetting {
                to: 0.002,
                duration: Duration::from_secs(2),
                delay: Duration::from_secs(1),
                ease: EaseSetting::default(),
            },
            pointer_enter: TweenSetting {
                to: 0.03,
                duration: Duration::from_secs(1),
                delay: Duration::ZERO,
                ease: EaseSetting::default(),
            },
            pointer_leave: TweenSetting {
                to: 0.005,
                duration: Duration::from_secs(2),
                delay: Duration::ZERO,
                ease: EaseSetting::default(),
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct TweenSetting {
    pub to: f32,
    #[serde(deserialize_with = "deserialize_duration")]
    pub duration: Duration,
    #[serde(default, deserialize_with = "deserialize_duration")]
    pub delay: Duration,
    #[serde(default)]
    pub ease: EaseSetting,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EaseDirection {
    In,
    Out,
    InOut,
}

/// Named easing curve as written in scene files (`power1.inOut`, `expo.out`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EaseSetting {
    Linear,
    Smoothstep,
    Power { degree: u8, direction: EaseDirection },
    Sine(EaseDirection),
    Expo(EaseDirection),
}

impl Default for EaseSetting {
    fn default() -> Self {
        Self::Power {
            degree: 1,
            direction: EaseDirection::InOut,
        }
    }
}

impl fmt::Display for EaseDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EaseDirection::In => f.write_str("in"),
            EaseDirection::Out => f.write_str("out"),
            EaseDirection::InOut => f.write_str("inOut"),
        }
    }
}

impl fmt::Display for EaseSetting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EaseSetting::Linear => f.write_str("linear"),
            EaseSetting::Smoothstep => f.write_str("smoothstep"),
            EaseSetting::Power { degree, direction } => write!(f, "power{degree}.{direction}"),
            EaseSetting::Sine(direction) => write!(f, "sine.{direction}"),
            EaseSetting::Expo(direction) => write!(f, "expo.{direction}"),
        }
    }
}

impl FromStr for EaseSetting {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let normalized = raw.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "linear" | "none" => return Ok(EaseSetting::Linear),
            "smoothstep" => return Ok(EaseSetting::Smoothstep),
            _ => {}
        }

        let (family, direction) = match normalized.split_once('.') {
            Some((family, direction)) => (family, parse_direction(direction, raw)?),
            // A bare family name eases out.
            None => (normalized.as_str(), EaseDirection::Out),
        };

        let setting = match family {
            "power" | "power1" | "quad" => EaseSetting::Power {
                degree: 1,
                direction,
            },
            "power2" | "cubic" => EaseSetting::Power {
                degree: 2,
                direction,
            },
            "power3" | "quart" => EaseSetting::Power {
                degree: 3,
                direction,
            },
            "power4" | "quint" | "strong" => EaseSetting::Power {
                degree: 4,
                direction,
            },
            "power0" => EaseSetting::Linear,
            "sine" => EaseSetting::Sine(direction),
            "expo" => EaseSetting::Expo(direction),
            _ => return Err(format!("unknown ease '{raw}'")),
        };
        Ok(setting)
    }
}

fn parse_direction(direction: &str, raw: &str) -> Result<EaseDirection, String> {
    let trimmed = direction.strip_prefix("ease").unwrap_or(direction);
    match trimmed {
        "in" => Ok(EaseDirection::In),
        "out" => Ok(EaseDirection::Out),
        "inout" => Ok(EaseDirection::InOut),
        _ => Err(format!("unknown ease direction in '{raw}'")),
    }
}

impl<'de> Deserialize<'de> for EaseSetting {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(de::Error::custom)
    }
}

/// Surface parameters after merging per-surface overrides with the defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedSurface {
    pub image: PathBuf,
    pub frequency: f32,
    pub repeats: f32,
    pub noise_amplitude: f32,
    pub segments: u32,
    pub size: [f32; 2],
}

fn default_gap() -> u32 {
    DEFAULT_GAP
}

fn deserialize_duration<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    struct Visitor;
    impl<'de> de::Visitor<'de> for Visitor {
        type Value = Duration;

        fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
            formatter.write_str("a duration as number of seconds or human-readable string")
        }

        fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            humantime::parse_duration(v)
                .map_err(|err| E::custom(format!("invalid duration '{v}': {err}")))
        }

        fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Duration::from_secs(v))
        }

        fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            if v < 0 {
                return Err(E::custom("duration must be non-negative"));
            }
            Ok(Duration::from_secs(v as u64))
        }

        fn visit_f64<E>(self, v: f64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            if !v.is_finite() || v.is_sign_negative() {
                return Err(E::custom("duration must be non-negative"));
            }
            Ok(Duration::from_secs_f64(v))
        }
    }

    deserializer.deserialize_any(Visitor)
}

impl SceneConfig {
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        let raw: SceneConfig = toml::from_str(input)?;
        raw.validate()?;
        Ok(raw)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let input = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&input)
    }

    /// Builds a scene with default parameters for each image, in order.
    pub fn from_images<I, P>(images: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        let config = Self {
            version: 1,
            gap: DEFAULT_GAP,
            defaults: SurfaceDefaults::default(),
            animation: AnimationPolicy::default(),
            surfaces: images.into_iter().map(SurfaceConfig::from_image).collect(),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.version != 1 {
            return Err(ConfigError::Invalid(format!(
                "unsupported config version {}; expected 1",
                self.version
            )));
        }

        if self.surfaces.is_empty() {
            return Err(ConfigError::Invalid(
                "scene must define at least one surface".into(),
            ));
        }

        validate_surface_values(
            "defaults",
            self.defaults.frequency,
            self.defaults.repeats,
            self.defaults.noise_amplitude,
            self.defaults.segments,
            self.defaults.size,
        )?;

        for (name, tween) in [
            ("animation.mount", &self.animation.mount),
            ("animation.pointer_enter", &self.animation.pointer_enter),
            ("animation.pointer_leave", &self.animation.pointer_leave),
        ] {
            if !tween.to.is_finite() || tween.to < 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "{name}.to must be a finite value >= 0"
                )));
            }
        }

        for (index, surface) in self.surfaces.iter().enumerate() {
            if surface.image.as_os_str().is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "surface #{index} has an empty image path"
                )));
            }
            let resolved = self.merge(surface, Path::new(""));
            validate_surface_values(
                &format!("surface #{index}"),
                resolved.frequency,
                resolved.repeats,
                resolved.noise_amplitude,
                resolved.segments,
                resolved.size,
            )?;
        }

        Ok(())
    }

    /// Merges defaults into every surface. Relative image paths are resolved
    /// against `base_dir` (normally the directory holding the scene file).
    pub fn resolve_surfaces(&self, base_dir: &Path) -> Vec<ResolvedSurface> {
        self.surfaces
            .iter()
            .map(|surface| self.merge(surface, base_dir))
            .collect()
    }

    fn merge(&self, surface: &SurfaceConfig, base_dir: &Path) -> ResolvedSurface {
        let image = if surface.image.is_absolute() {
            surface.image.clone()
        } else {
            base_dir.join(&surface.image)
        };
        ResolvedSurface {
            image,
            frequency: surface.frequency.unwrap_or(self.defaults.frequency),
            repeats: surface.repeats.unwrap_or(self.defaults.repeats),
            noise_amplitude: surface
                .noise_amplitude
                .unwrap_or(self.defaults.noise_amplitude),
            segments: surface.segments.unwrap_or(self.defaults.segments),
            size: surface.size.unwrap_or(self.defaults.size),
        }
    }
}

fn validate_surface_values(
    scope: &str,
    frequency: f32,
    repeats: f32,
    noise_amplitude: f32,
    segments: u32,
    size: [f32; 2],
) -> Result<(), ConfigError> {
    if !frequency.is_finite() || frequency <= 0.0 {
        return Err(ConfigError::Invalid(format!(
            "{scope} frequency must be a finite value > 0"
        )));
    }
    if !repeats.is_finite() || repeats < 1.0 {
        return Err(ConfigError::Invalid(format!(
            "{scope} repeats must be a finite value >= 1"
        )));
    }
    if !noise_amplitude.is_finite() || noise_amplitude < 0.0 {
        return Err(ConfigError::Invalid(format!(
            "{scope} noise_amplitude must be a finite value >= 0"
        )));
    }
    if segments == 0 {
        return Err(ConfigError::Invalid(format!(
            "{scope} segments must be at least 1"
        )));
    }
    if size.iter().any(|extent| !extent.is_finite() || *extent <= 0.0) {
        return Err(ConfigError::Invalid(format!(
            "{scope} size must be positive"
        )));
    }
    Ok(())
}
