use thiserror::Error;

use crate::core::data::colour::Colour;

#[derive(Debug, Error)]
pub enum DeviceError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("image of {width}x{height} pixels does not fit the file format")]
    TooLarge { width: u32, height: u32 },
}

/// Sink for finished rows. Bands call `write` concurrently from different
/// workers, each with rows no other band touches.
pub trait OutputDevice: Send + Sync {
    /// Resizes and clears the device's buffer.
    fn set_dimensions(&self, width: u32, height: u32);

    /// Stores `row` starting at (`x_offset`, `y_offset`). Anything that would
    /// land past the end of the buffer is dropped.
    fn write(&self, x_offset: u32, y_offset: u32, row: Vec<Colour>);

    /// Called once after every band of a render has finished.
    fn flush(&self) -> Result<(), DeviceError>;
}
