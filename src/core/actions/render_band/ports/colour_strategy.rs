use rug::Float;

use crate::core::data::colour::Colour;
use crate::core::data::scalar::Scalar;
use crate::core::fractals::mandelbrot::algorithm::EscapeSample;
use crate::core::fractals::mandelbrot::colour_strategies::kinds::ColourStrategyKind;

/// Turns the escape data of a single pixel into a colour. A strategy is shared
/// by every band of a render, so it must not keep per-call state.
pub trait ColourStrategy: Send + Sync {
    fn colour(&self, sample: &EscapeSample<f64>) -> Colour;

    fn colour_precise(&self, sample: &EscapeSample<Float>) -> Colour;

    /// Colour for points that never escaped.
    fn colour_in_set(&self) -> Colour;

    fn kind(&self) -> ColourStrategyKind;

    fn display_name(&self) -> &str {
        self.kind().display_name()
    }
}

/// Routes a sample to the strategy entry point matching its precision.
pub trait SampleColour: Scalar {
    fn colour_with(strategy: &dyn ColourStrategy, sample: &EscapeSample<Self>) -> Colour;
}

impl SampleColour for f64 {
    #[inline]
    fn colour_with(strategy: &dyn ColourStrategy, sample: &EscapeSample<Self>) -> Colour {
        strategy.colour(sample)
    }
}

impl SampleColour for Float {
    #[inline]
    fn colour_with(strategy: &dyn ColourStrategy, sample: &EscapeSample<Self>) -> Colour {
        strategy.colour_precise(sample)
    }
}
