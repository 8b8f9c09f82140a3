pub mod algorithm;
pub mod colour_strategies;
pub mod engine;
pub mod errors;
pub mod mandelbrot_config;
