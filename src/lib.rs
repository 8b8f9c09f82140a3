mod controllers;
mod core;
mod presenters;
mod storage;

pub use controllers::cli::render_bmp::{RenderBmpController, RenderBmpError, with_bmp_extension};
pub use crate::core::actions::cancellation::{CancelFlag, CancelToken, Cancelled, NeverCancel};
pub use crate::core::actions::render_band::ports::colour_strategy::{ColourStrategy, SampleColour};
pub use crate::core::actions::render_band::ports::output_device::{DeviceError, OutputDevice};
pub use crate::core::actions::render_band::render_band::render_band;
pub use crate::core::data::colour::Colour;
pub use crate::core::data::complex::Complex;
pub use crate::core::data::render_params::{DEEP_ZOOM_SCALE_THRESHOLD, Precision, RenderParams};
pub use crate::core::data::row_band::RowBand;
pub use crate::core::data::scalar::{PRECISION, Scalar};
pub use crate::core::fractals::mandelbrot::algorithm::{Escape, EscapeSample, escape_time};
pub use crate::core::fractals::mandelbrot::colour_strategies::factory::colour_strategy_factory;
pub use crate::core::fractals::mandelbrot::colour_strategies::hsv::{hsv_to_colour, hsv_to_rgb};
pub use crate::core::fractals::mandelbrot::colour_strategies::iteration::IterationColouring;
pub use crate::core::fractals::mandelbrot::colour_strategies::kinds::{
    ColourStrategyKind, ParseColourStrategyKindError,
};
pub use crate::core::fractals::mandelbrot::colour_strategies::smooth::SmoothColouring;
pub use crate::core::fractals::mandelbrot::colour_strategies::wavelength::WavelengthColouring;
pub use crate::core::fractals::mandelbrot::engine::MandelbrotEngine;
pub use crate::core::fractals::mandelbrot::errors::{ConfigError, EngineError, RenderError};
pub use crate::core::fractals::mandelbrot::mandelbrot_config::MandelbrotConfig;
pub use crate::core::threading::completion_latch::{CompletionGuard, CompletionLatch};
pub use crate::core::threading::worker_pool::{DEFAULT_WORKERS, PoolError, WorkerPool};
pub use crate::core::util::calculate_row_bands::calculate_row_bands;
pub use crate::core::util::pixel_to_complex_coords::pixel_to_complex_coords;
pub use presenters::file::bmp::BmpFileDevice;
pub use storage::write_bmp::{encode_bmp_header, encode_bmp_pixels, write_bmp};
