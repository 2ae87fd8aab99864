use tween::Animated;

pub const DEFAULT_REPEATS: f32 = 1.0;
pub const DEFAULT_NOISE_AMPLITUDE: f32 = 0.045;

#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum UniformError {
    #[error("repeats must be a finite value >= 1 (got {0})")]
    Repeats(f32),
    #[error("noise amplitude must be a finite value >= 0 (got {0})")]
    NoiseAmplitude(f32),
}

/// Fields of [`RippleUniforms`] that tweens may drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UniformField {
    NoiseAmplitude,
    Repeats,
}

/// Per-surface shader inputs, constant across all pixels of a frame.
///
/// Every field stays finite; `repeats >= 1` and `noise_amplitude >= 0` hold
/// for the lifetime of the value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RippleUniforms {
    repeats: f32,
    time: f32,
    noise_amplitude: f32,
}

impl RippleUniforms {
    pub fn new(repeats: f32, noise_amplitude: f32) -> Result<Self, UniformError> {
        if !repeats.is_finite() || repeats < 1.0 {
            return Err(UniformError::Repeats(repeats));
        }
        if !noise_amplitude.is_finite() || noise_amplitude < 0.0 {
            return Err(UniformError::NoiseAmplitude(noise_amplitude));
        }
        Ok(Self {
            repeats,
            time: 0.0,
            noise_amplitude,
        })
    }

    pub fn repeats(&self) -> f32 {
        self.repeats
    }

    /// Elapsed time already scaled by the surface's frequency multiplier.
    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn noise_amplitude(&self) -> f32 {
        self.noise_amplitude
    }

    pub fn set_time(&mut self, time: f32) {
        if time.is_finite() {
            self.time = time;
        }
    }

    pub fn set_noise_amplitude(&mut self, amplitude: f32) {
        if amplitude.is_finite() {
            self.noise_amplitude = amplitude.max(0.0);
        }
    }

    pub fn set_repeats(&mut self, repeats: f32) {
        if repeats.is_finite() {
            self.repeats = repeats.max(1.0);
        }
    }

    pub fn with_time(mut self, time: f32) -> Self {
        self.set_time(time);
        self
    }
}

impl Default for RippleUniforms {
    fn default() -> Self {
        Self {
            repeats: DEFAULT_REPEATS,
            time: 0.0,
            noise_amplitude: DEFAULT_NOISE_AMPLITUDE,
        }
    }
}

impl Animated for RippleUniforms {
    type Field = UniformField;

    fn value(&self, field: UniformField) -> f32 {
        match field {
            UniformField::NoiseAmplitude => self.noise_amplitude,
            UniformField::Repeats => self.repeats,
        }
    }

    fn set_value(&mut self, field: UniformField, value: f32) {
        match field {
            UniformField::NoiseAmplitude => self.set_noise_amplitude(value),
            UniformField::Repeats => self.set_repeats(value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_invalid_construction() {
        assert_eq!(
            RippleUniforms::new(0.5, 0.0),
            Err(UniformError::Repeats(0.5))
        );
        assert!(RippleUniforms::new(f32::INFINITY, 0.0).is_err());
        assert_eq!(
            RippleUniforms::new(1.0, -0.1),
            Err(UniformError::NoiseAmplitude(-0.1))
        );
        assert!(RippleUniforms::new(1.0, f32::NAN).is_err());
    }

    #[test]
    fn setters_keep_invariants() {
        let mut uniforms = RippleUniforms::new(2.0, 0.01).unwrap();
        uniforms.set_noise_amplitude(-1.0);
        assert_eq!(uniforms.noise_amplitude(), 0.0);
        uniforms.set_noise_amplitude(f32::NAN);
        assert_eq!(uniforms.noise_amplitude(), 0.0);
        uniforms.set_repeats(0.25);
        assert_eq!(uniforms.repeats(), 1.0);
        uniforms.set_time(f32::INFINITY);
        assert_eq!(uniforms.time(), 0.0);
        uniforms.set_time(4.8);
        assert_eq!(uniforms.time(), 4.8);
    }

    #[test]
    fn animated_fields_round_through_setters() {
        let mut uniforms = RippleUniforms::default();
        uniforms.set_value(UniformField::NoiseAmplitude, 0.03);
        assert_eq!(uniforms.value(UniformField::NoiseAmplitude), 0.03);
        uniforms.set_value(UniformField::Repeats, 3.0);
        assert_eq!(uniforms.value(UniformField::Repeats), 3.0);
    }
}
