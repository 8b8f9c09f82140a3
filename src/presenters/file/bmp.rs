use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use crate::core::actions::render_band::ports::output_device::{DeviceError, OutputDevice};
use crate::core::data::colour::Colour;
use crate::storage::write_bmp::write_bmp;

#[derive(Debug, Default)]
struct Frame {
    width: u32,
    height: u32,
    pixels: Vec<Colour>,
}

/// Collects rows in memory and writes them out as a 32-bit BMP on flush.
#[derive(Debug, Default)]
pub struct BmpFileDevice {
    path: Option<PathBuf>,
    frame: Mutex<Frame>,
}

impl BmpFileDevice {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            frame: Mutex::default(),
        }
    }

    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    // rows are plain colour data, so a writer that panicked mid-copy leaves
    // nothing inconsistent behind
    fn lock(&self) -> MutexGuard<'_, Frame> {
        self.frame.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    #[must_use]
    pub fn dimensions(&self) -> (u32, u32) {
        let frame = self.lock();
        (frame.width, frame.height)
    }

    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Option<Colour> {
        let frame = self.lock();
        if x >= frame.width || y >= frame.height {
            return None;
        }

        frame
            .pixels
            .get(y as usize * frame.width as usize + x as usize)
            .copied()
    }
}

impl OutputDevice for BmpFileDevice {
    fn set_dimensions(&self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }

        let mut frame = self.lock();
        frame.width = width;
        frame.height = height;
        frame.pixels.clear();
        frame
            .pixels
            .resize(width as usize * height as usize, Colour::BLACK);
    }

    fn write(&self, x_offset: u32, y_offset: u32, row: Vec<Colour>) {
        let mut frame = self.lock();
        let start = y_offset as usize * frame.width as usize + x_offset as usize;

        if start >= frame.pixels.len() {
            return;
        }

        let len = row.len().min(frame.pixels.len() - start);
        frame.pixels[start..start + len].copy_from_slice(&row[..len]);
    }

    fn flush(&self) -> Result<(), DeviceError> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        let frame = self.lock();
        if frame.width == 0 || frame.height == 0 {
            return Ok(());
        }

        let mut writer = BufWriter::new(File::create(path)?);
        write_bmp(&mut writer, frame.width, frame.height, &frame.pixels)?;
        writer.flush()?;

        tracing::debug!(
            path = %path.display(),
            width = frame.width,
            height = frame.height,
            "bitmap written"
        );

        Ok(())
    }
}
