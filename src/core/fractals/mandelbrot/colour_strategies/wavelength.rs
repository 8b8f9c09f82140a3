use std::f64::consts::LOG2_E;

use rug::Float;

use crate::core::actions::render_band::ports::colour_strategy::ColourStrategy;
use crate::core::data::colour::Colour;
use crate::core::data::scalar::Scalar;
use crate::core::fractals::mandelbrot::algorithm::EscapeSample;
use crate::core::fractals::mandelbrot::colour_strategies::kinds::ColourStrategyKind;

pub const PALETTE_SIZE: usize = 512;

const MAX_INDEX: usize = PALETTE_SIZE - 1;

/// Cyclic palette of three phase-shifted sine waves, indexed by normalised
/// continuous dwell.
#[derive(Debug, Clone)]
pub struct WavelengthColouring {
    palette: Box<[Colour; PALETTE_SIZE]>,
}

impl Default for WavelengthColouring {
    fn default() -> Self {
        Self::new()
    }
}

impl WavelengthColouring {
    #[must_use]
    pub fn new() -> Self {
        let mut palette = Box::new([Colour::BLACK; PALETTE_SIZE]);

        for (i, entry) in palette.iter_mut().enumerate() {
            let phase = 0.2 * i as f64;
            let channel = |shift: f64| ((phase + shift).sin() * 127.5 + 127.5) as u8;

            *entry = Colour::rgb(channel(0.0), channel(2.0), channel(4.0));
        }

        Self { palette }
    }

    #[must_use]
    pub fn palette(&self) -> &[Colour; PALETTE_SIZE] {
        &self.palette
    }

    fn lookup(&self, norm_z: f64, iterations: u32, max_iterations: u32) -> Colour {
        let dwell = 5.0 + iterations as f64 + 1.0 - norm_z.ln().ln() * LOG2_E;
        let normalized = dwell / max_iterations as f64;

        self.palette[palette_index(normalized)]
    }
}

fn palette_index(normalized: f64) -> usize {
    let scaled = (normalized * MAX_INDEX as f64).floor();

    if scaled.is_nan() || scaled <= 0.0 {
        0
    } else if scaled >= MAX_INDEX as f64 {
        MAX_INDEX
    } else {
        scaled as usize
    }
}

impl ColourStrategy for WavelengthColouring {
    fn colour(&self, sample: &EscapeSample<f64>) -> Colour {
        self.lookup(
            sample.z.magnitude_squared(),
            sample.iterations,
            sample.max_iterations,
        )
    }

    fn colour_precise(&self, sample: &EscapeSample<Float>) -> Colour {
        let norm_z = Scalar::to_f64(&sample.z.magnitude_squared());

        self.lookup(norm_z, sample.iterations, sample.max_iterations)
    }

    fn colour_in_set(&self) -> Colour {
        Colour::BLACK
    }

    fn kind(&self) -> ColourStrategyKind {
        ColourStrategyKind::Wavelength
    }
}
