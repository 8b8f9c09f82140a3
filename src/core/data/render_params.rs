use crate::core::fractals::mandelbrot::errors::ConfigError;

/// Below this scale adjacent pixels are no longer distinguishable in f64.
pub const DEEP_ZOOM_SCALE_THRESHOLD: f64 = 1e-16;

/// Smallest height the engine will render; shorter images are refused.
pub const MIN_HEIGHT_EXCLUSIVE: i32 = 4;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Precision {
    Standard,
    Deep,
}

impl Precision {
    #[must_use]
    pub fn for_scale(scale: f64) -> Self {
        if scale < DEEP_ZOOM_SCALE_THRESHOLD {
            Self::Deep
        } else {
            Self::Standard
        }
    }
}

/// Immutable snapshot of the plane window a single render works on.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct RenderParams {
    center_x: f64,
    center_y: f64,
    scale: f64,
    max_iterations: u32,
    width: u32,
    height: u32,
}

impl RenderParams {
    pub fn new(
        center: (f64, f64),
        scale: f64,
        max_iterations: u32,
        width: i32,
        height: i32,
    ) -> Result<Self, ConfigError> {
        if max_iterations == 0 {
            return Err(ConfigError::ZeroMaxIterations);
        }

        if width <= 0 {
            return Err(ConfigError::InvalidWidth(width));
        }

        if height <= MIN_HEIGHT_EXCLUSIVE {
            return Err(ConfigError::InvalidHeight(height));
        }

        Ok(Self {
            center_x: center.0,
            center_y: center.1,
            scale,
            max_iterations,
            width: width as u32,
            height: height as u32,
        })
    }

    #[must_use]
    pub fn center(&self) -> (f64, f64) {
        (self.center_x, self.center_y)
    }

    #[must_use]
    pub fn scale(&self) -> f64 {
        self.scale
    }

    #[must_use]
    pub fn max_iterations(&self) -> u32 {
        self.max_iterations
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[must_use]
    pub fn precision(&self) -> Precision {
        Precision::for_scale(self.scale)
    }

    /// Pixel offsets that put the configured center in the middle of the image.
    #[must_use]
    pub fn offsets(&self) -> (f64, f64) {
        (-(self.width as f64) / 2.0, -(self.height as f64) / 2.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_params() {
        let params = RenderParams::new((0.5, -0.25), 0.01, 100, 80, 60).unwrap();

        assert_eq!(params.center(), (0.5, -0.25));
        assert_eq!(params.width(), 80);
        assert_eq!(params.height(), 60);
        assert_eq!(params.offsets(), (-40.0, -30.0));
    }

    #[test]
    fn test_zero_iterations_rejected() {
        assert_eq!(
            RenderParams::new((0.0, 0.0), 1.0, 0, 10, 10),
            Err(ConfigError::ZeroMaxIterations)
        );
    }

    #[test]
    fn test_width_must_be_positive() {
        assert_eq!(
            RenderParams::new((0.0, 0.0), 1.0, 10, 0, 10),
            Err(ConfigError::InvalidWidth(0))
        );
        assert_eq!(
            RenderParams::new((0.0, 0.0), 1.0, 10, -3, 10),
            Err(ConfigError::InvalidWidth(-3))
        );
    }

    #[test]
    fn test_height_must_exceed_four() {
        assert_eq!(
            RenderParams::new((0.0, 0.0), 1.0, 10, 10, 4),
            Err(ConfigError::InvalidHeight(4))
        );
        assert!(RenderParams::new((0.0, 0.0), 1.0, 10, 10, 5).is_ok());
    }

    #[test]
    fn test_precision_switches_below_threshold() {
        assert_eq!(Precision::for_scale(1e-16), Precision::Standard);
        assert_eq!(Precision::for_scale(9.9e-17), Precision::Deep);
        assert_eq!(Precision::for_scale(0.004), Precision::Standard);
    }
}
