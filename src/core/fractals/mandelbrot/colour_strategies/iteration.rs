use rug::Float;

use crate::core::actions::render_band::ports::colour_strategy::ColourStrategy;
use crate::core::data::colour::Colour;
use crate::core::fractals::mandelbrot::algorithm::EscapeSample;
use crate::core::fractals::mandelbrot::colour_strategies::kinds::ColourStrategyKind;

/// Blue-white polynomial gradient over the raw escape count.
#[derive(Debug, Default)]
pub struct IterationColouring;

impl IterationColouring {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn gradient(iterations: u32, max_iterations: u32) -> Colour {
        let t = iterations as f64 / max_iterations as f64;
        let inv = 1.0 - t;

        let r = (9.0 * inv * t * t * t * 255.0) as u8;
        let g = (15.0 * inv * inv * t * t * 255.0) as u8;
        let b = (8.5 * inv * inv * inv * t * 255.0) as u8;

        Colour::rgb(r, g, b)
    }
}

impl ColourStrategy for IterationColouring {
    fn colour(&self, sample: &EscapeSample<f64>) -> Colour {
        Self::gradient(sample.iterations, sample.max_iterations)
    }

    fn colour_precise(&self, sample: &EscapeSample<Float>) -> Colour {
        Self::gradient(sample.iterations, sample.max_iterations)
    }

    fn colour_in_set(&self) -> Colour {
        Colour::BLACK
    }

    fn kind(&self) -> ColourStrategyKind {
        ColourStrategyKind::Iteration
    }
}
