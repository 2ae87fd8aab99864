use std::f32::consts::PI;

use sceneconfig::{EaseDirection, EaseSetting};

/// Easing curve applied to normalised tween progress.
///
/// Every curve is monotonic non-decreasing on [0, 1] and maps the endpoints
/// exactly (0 -> 0, 1 -> 1), so a tween never overshoots its target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Ease {
    Linear,
    Smoothstep,
    /// `t^exponent`.
    PowerIn(i32),
    /// `1 - (1 - t)^exponent`.
    PowerOut(i32),
    PowerInOut(i32),
    SineIn,
    SineOut,
    SineInOut,
    ExpoIn,
    ExpoOut,
    ExpoInOut,
}

impl Default for Ease {
    fn default() -> Self {
        Ease::PowerInOut(2)
    }
}

impl Ease {
    pub fn sample(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        if t <= 0.0 {
            return 0.0;
        }
        if t >= 1.0 {
            return 1.0;
        }

        match self {
            Ease::Linear => t,
            Ease::Smoothstep => t * t * (3.0 - 2.0 * t),
            Ease::PowerIn(exponent) => t.powi(exponent),
            Ease::PowerOut(exponent) => 1.0 - (1.0 - t).powi(exponent),
            Ease::PowerInOut(exponent) => {
                if t < 0.5 {
                    0.5 * (2.0 * t).powi(exponent)
                } else {
                    1.0 - 0.5 * (2.0 * (1.0 - t)).powi(exponent)
                }
            }
            Ease::SineIn => 1.0 - (t * PI * 0.5).cos(),
            Ease::SineOut => (t * PI * 0.5).sin(),
            Ease::SineInOut => -0.5 * ((PI * t).cos() - 1.0),
            Ease::ExpoIn => 2f32.powf(10.0 * (t - 1.0)),
            Ease::ExpoOut => 1.0 - 2f32.powf(-10.0 * t),
            Ease::ExpoInOut => {
                if t < 0.5 {
                    0.5 * 2f32.powf(20.0 * t - 10.0)
                } else {
                    1.0 - 0.5 * 2f32.powf(-20.0 * t + 10.0)
                }
            }
        }
    }
}

impl From<EaseSetting> for Ease {
    fn from(setting: EaseSetting) -> Self {
        match setting {
            EaseSetting::Linear => Ease::Linear,
            EaseSetting::Smoothstep => Ease::Smoothstep,
            // power1 is quadratic, power4 quintic.
            EaseSetting::Power { degree, direction } => {
                let exponent = i32::from(degree.clamp(1, 4)) + 1;
                match direction {
                    EaseDirection::In => Ease::PowerIn(exponent),
                    EaseDirection::Out => Ease::PowerOut(exponent),
                    EaseDirection::InOut => Ease::PowerInOut(exponent),
                }
            }
            EaseSetting::Sine(direction) => match direction {
                EaseDirection::In => Ease::SineIn,
                EaseDirection::Out => Ease::SineOut,
                EaseDirection::InOut => Ease::SineInOut,
            },
            EaseSetting::Expo(direction) => match direction {
                EaseDirection::In => Ease::ExpoIn,
                EaseDirection::Out => Ease::ExpoOut,
                EaseDirection::InOut => Ease::ExpoInOut,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Ease; 13] = [
        Ease::Linear,
        Ease::Smoothstep,
        Ease::PowerIn(2),
        Ease::PowerOut(3),
        Ease::PowerInOut(2),
        Ease::PowerInOut(5),
        Ease::SineIn,
        Ease::SineOut,
        Ease::SineInOut,
        Ease::ExpoIn,
        Ease::ExpoOut,
        Ease::ExpoInOut,
        Ease::PowerOut(2),
    ];

    #[test]
    fn endpoints_are_exact() {
        for ease in ALL {
            assert_eq!(ease.sample(0.0), 0.0, "{ease:?} at 0");
            assert_eq!(ease.sample(1.0), 1.0, "{ease:?} at 1");
        }
    }

    #[test]
    fn curves_increase_monotonically() {
        for ease in ALL {
            let mut last = 0.0;
            for step in 0..=200 {
                let sample = ease.sample(step as f32 / 200.0);
                assert!(sample >= last, "{ease:?} decreased at step {step}");
                last = sample;
            }
        }
    }

    #[test]
    fn input_is_clamped() {
        assert_eq!(Ease::Linear.sample(-0.5), 0.0);
        assert_eq!(Ease::Linear.sample(1.5), 1.0);
        assert_eq!(Ease::ExpoIn.sample(-3.0), 0.0);
    }

    #[test]
    fn power_in_out_is_symmetric() {
        let ease = Ease::PowerInOut(2);
        assert!((ease.sample(0.5) - 0.5).abs() < 1e-6);
        assert!((ease.sample(0.25) - 0.125).abs() < 1e-6);
        assert!((ease.sample(0.75) - 0.875).abs() < 1e-6);
    }

    #[test]
    fn maps_config_settings() {
        assert_eq!(Ease::from(EaseSetting::default()), Ease::PowerInOut(2));
        assert_eq!(
            Ease::from(EaseSetting::Power {
                degree: 4,
                direction: EaseDirection::Out
            }),
            Ease::PowerOut(5)
        );
        assert_eq!(
            Ease::from(EaseSetting::Expo(EaseDirection::Out)),
            Ease::ExpoOut
        );
    }
}
