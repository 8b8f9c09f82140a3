use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use thiserror::Error;

use crate::core::fractals::mandelbrot::engine::MandelbrotEngine;
use crate::core::fractals::mandelbrot::errors::{EngineError, RenderError};
use crate::core::fractals::mandelbrot::mandelbrot_config::MandelbrotConfig;
use crate::presenters::file::bmp::BmpFileDevice;

pub const DEFAULT_FILENAME: &str = "mandelbrot.bmp";

#[derive(Debug, Error)]
pub enum RenderBmpError {
    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error(transparent)]
    Render(#[from] RenderError),
}

/// Appends `.bmp` unless the name already contains it.
#[must_use]
pub fn with_bmp_extension(path: &Path) -> PathBuf {
    if path.to_string_lossy().contains(".bmp") {
        path.to_path_buf()
    } else {
        let mut name = path.as_os_str().to_owned();
        name.push(".bmp");
        PathBuf::from(name)
    }
}

/// Renders one image from a [`MandelbrotConfig`] straight into a BMP file.
pub struct RenderBmpController {
    config: MandelbrotConfig,
    path: PathBuf,
    threads: usize,
}

impl RenderBmpController {
    #[must_use]
    pub fn new(config: MandelbrotConfig, path: impl AsRef<Path>, threads: usize) -> Self {
        Self {
            config,
            path: with_bmp_extension(path.as_ref()),
            threads,
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns how long the render took, flush included.
    pub fn run(&self) -> Result<Duration, RenderBmpError> {
        let mut engine = MandelbrotEngine::with_workers(self.threads)?;
        self.config.apply_to(&mut engine);
        engine.set_output_device(Arc::new(BmpFileDevice::new(&self.path)));

        tracing::info!(
            width = self.config.width,
            height = self.config.height,
            max_iterations = self.config.max_iterations,
            colour = %self.config.colour_strategy_kind,
            threads = engine.worker_count(),
            "rendering mandelbrot set"
        );

        let start = Instant::now();
        engine.render()?;
        let duration = start.elapsed();

        tracing::info!(path = %self.path.display(), ?duration, "saved");

        Ok(duration)
    }
}
