use std::f64::consts::LN_2;

use rug::Float;

use crate::core::actions::render_band::ports::colour_strategy::ColourStrategy;
use crate::core::data::colour::Colour;
use crate::core::data::scalar::Scalar;
use crate::core::fractals::mandelbrot::algorithm::EscapeSample;
use crate::core::fractals::mandelbrot::colour_strategies::hsv::hsv_to_colour;
use crate::core::fractals::mandelbrot::colour_strategies::kinds::ColourStrategyKind;

pub const DEFAULT_INTENSITY: f64 = -0.1275;

const DWELL_OFFSET: f64 = 7.847;

/// Continuous dwell colouring with distance-estimate darkening near the set
/// boundary.
#[derive(Debug)]
pub struct SmoothColouring {
    intensity: f64,
}

impl Default for SmoothColouring {
    fn default() -> Self {
        Self::new()
    }
}

impl SmoothColouring {
    #[must_use]
    pub fn new() -> Self {
        Self {
            intensity: DEFAULT_INTENSITY,
        }
    }

    #[must_use]
    pub fn with_intensity(intensity: f64) -> Self {
        Self { intensity }
    }

    pub fn set_colour_intensity(&mut self, intensity: f64) {
        self.intensity = intensity;
    }

    #[must_use]
    pub fn colour_intensity(&self) -> f64 {
        self.intensity
    }

    fn shade(&self, mod_z: f64, abs_dz: f64, scale: f64, iterations: u32) -> Colour {
        let log_mod_z = mod_z.ln();

        let mut value = 1.0;
        if abs_dz > 0.0 {
            let dist = 2.0 * mod_z * log_mod_z / abs_dz;
            let dist_scale = (dist / scale).ln() / LN_2 - 1.2;

            if dist_scale.is_finite() {
                if dist_scale < -8.0 {
                    value = 0.0;
                } else if dist_scale < 0.0 {
                    value = 1.0 + dist_scale / 8.0;
                }
            }
        }

        let dwell = iterations as f64 - log_mod_z.ln() / LN_2 + DWELL_OFFSET;
        let log_dwell = dwell.abs().ln();
        let q = if log_dwell.is_finite() {
            log_dwell * self.intensity.abs()
        } else {
            0.0
        };

        let (q, angle) = if q < 0.5 {
            let q = 1.0 - 1.5 * q;
            (q, 1.0 - q)
        } else {
            let q = 1.5 * q - 0.5;
            (q, q)
        };

        let mut radius = q.sqrt();
        if iterations % 2 == 1 && self.intensity > 0.0 {
            value *= 0.85;
            radius *= 0.667;
        }

        let hue = unit_fraction(angle * 10.0) * 360.0;
        let saturation = unit_fraction(radius);

        hsv_to_colour(hue, saturation, value)
    }
}

// wraps into [0, 1), including for negative input
fn unit_fraction(x: f64) -> f64 {
    let wrapped = x.rem_euclid(1.0);
    if wrapped.is_finite() && wrapped < 1.0 {
        wrapped
    } else {
        0.0
    }
}

impl ColourStrategy for SmoothColouring {
    fn colour(&self, sample: &EscapeSample<f64>) -> Colour {
        self.shade(
            sample.z.magnitude(),
            sample.dz.magnitude(),
            sample.scale,
            sample.iterations,
        )
    }

    fn colour_precise(&self, sample: &EscapeSample<Float>) -> Colour {
        let mod_z = Scalar::to_f64(&sample.z.magnitude());
        let abs_dz = Scalar::to_f64(&sample.dz.magnitude());

        self.shade(mod_z, abs_dz, sample.scale, sample.iterations)
    }

    fn colour_in_set(&self) -> Colour {
        Colour::BLACK
    }

    fn kind(&self) -> ColourStrategyKind {
        ColourStrategyKind::Smooth
    }
}
