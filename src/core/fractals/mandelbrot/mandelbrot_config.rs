use crate::core::actions::render_band::ports::colour_strategy::ColourStrategy;
use crate::core::fractals::mandelbrot::colour_strategies::factory::colour_strategy_factory;
use crate::core::fractals::mandelbrot::colour_strategies::kinds::ColourStrategyKind;
use crate::core::fractals::mandelbrot::colour_strategies::smooth::{
    DEFAULT_INTENSITY, SmoothColouring,
};
use crate::core::fractals::mandelbrot::engine::MandelbrotEngine;

pub const DEFAULT_CENTER: (f64, f64) = (-0.637011, -0.0395159);
pub const DEFAULT_SCALE: f64 = 0.00403897;
pub const DEFAULT_WIDTH: i32 = 1024;
pub const DEFAULT_HEIGHT: i32 = 768;
pub const DEFAULT_MAX_ITERATIONS: u32 = 400;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MandelbrotConfig {
    pub center: (f64, f64),
    pub scale: f64,
    pub width: i32,
    pub height: i32,
    pub max_iterations: u32,
    pub colour_strategy_kind: ColourStrategyKind,
    /// Only used by [`ColourStrategyKind::Smooth`].
    pub colour_intensity: f64,
}

impl Default for MandelbrotConfig {
    fn default() -> Self {
        Self {
            center: DEFAULT_CENTER,
            scale: DEFAULT_SCALE,
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            colour_strategy_kind: ColourStrategyKind::default(),
            colour_intensity: DEFAULT_INTENSITY,
        }
    }
}

impl MandelbrotConfig {
    #[must_use]
    pub fn build_colour_strategy(&self) -> Box<dyn ColourStrategy> {
        match self.colour_strategy_kind {
            ColourStrategyKind::Smooth => {
                Box::new(SmoothColouring::with_intensity(self.colour_intensity))
            }
            kind => colour_strategy_factory(kind),
        }
    }

    /// Pushes every render setting into `engine`. The output device is left
    /// to the caller.
    pub fn apply_to(&self, engine: &mut MandelbrotEngine) {
        engine.set_center(self.center.0, self.center.1);
        engine.set_scale(self.scale);
        engine.set_max_iterations(self.max_iterations);
        engine.set_output_dimensions(self.width, self.height);
        engine.set_colour_strategy(self.build_colour_strategy());
    }
}
