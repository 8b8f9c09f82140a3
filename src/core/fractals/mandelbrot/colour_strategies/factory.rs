use crate::core::actions::render_band::ports::colour_strategy::ColourStrategy;
use crate::core::fractals::mandelbrot::colour_strategies::{
    iteration::IterationColouring, kinds::ColourStrategyKind, smooth::SmoothColouring,
    wavelength::WavelengthColouring,
};

#[must_use]
pub fn colour_strategy_factory(kind: ColourStrategyKind) -> Box<dyn ColourStrategy> {
    match kind {
        ColourStrategyKind::Smooth => Box::new(SmoothColouring::new()),
        ColourStrategyKind::Iteration => Box::new(IterationColouring::new()),
        ColourStrategyKind::Wavelength => Box::new(WavelengthColouring::new()),
    }
}
