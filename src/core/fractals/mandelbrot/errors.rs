use thiserror::Error;

use crate::core::actions::cancellation::Cancelled;
use crate::core::actions::render_band::ports::output_device::DeviceError;
use crate::core::threading::worker_pool::PoolError;

/// Why a render was refused before any work was queued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("no colour strategy has been set")]
    MissingColourStrategy,

    #[error("no output device has been set")]
    MissingOutputDevice,

    #[error("maximum iterations must be greater than zero")]
    ZeroMaxIterations,

    #[error("output width must be positive, got {0}")]
    InvalidWidth(i32),

    #[error("output height must be greater than 4, got {0}")]
    InvalidHeight(i32),
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("engine not configured: {0}")]
    NotConfigured(#[from] ConfigError),

    #[error("render {0}")]
    Cancelled(#[from] Cancelled),

    #[error("{0} render band(s) panicked before finishing")]
    BandsFailed(usize),

    #[error("render did not complete within {0:?}")]
    Timeout(std::time::Duration),

    #[error("bands from a timed-out render are still running")]
    Busy,

    #[error("output device error: {0}")]
    Device(#[from] DeviceError),
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("worker pool error: {0}")]
    Pool(#[from] PoolError),
}
