use std::num::NonZeroU32;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use rug::Float;

use crate::core::actions::cancellation::{CancelToken, Cancelled, NeverCancel};
use crate::core::actions::render_band::ports::colour_strategy::ColourStrategy;
use crate::core::actions::render_band::ports::output_device::OutputDevice;
use crate::core::actions::render_band::render_band::render_band;
use crate::core::data::render_params::{Precision, RenderParams};
use crate::core::data::row_band::RowBand;
use crate::core::fractals::mandelbrot::errors::{ConfigError, EngineError, RenderError};
use crate::core::threading::completion_latch::{CompletionGuard, CompletionLatch};
use crate::core::threading::worker_pool::{DEFAULT_WORKERS, WorkerPool};
use crate::core::util::calculate_row_bands::calculate_row_bands;

/// Everything one render's bands share. Each render builds its own, so bands
/// left running after a timeout cannot touch the next render's state.
struct RenderJob {
    params: RenderParams,
    strategy: Arc<dyn ColourStrategy>,
    device: Arc<dyn OutputDevice>,
    cancel: Arc<dyn CancelToken>,
    latch: CompletionLatch,
    cancelled_bands: AtomicUsize,
    finished_bands: AtomicUsize,
}

impl RenderJob {
    fn run_band(&self, band: RowBand) {
        tracing::trace!(
            start_row = band.start_row(),
            rows = band.row_count(),
            "band started"
        );

        let result = match self.params.precision() {
            Precision::Standard => render_band::<f64>(
                band,
                &self.params,
                self.strategy.as_ref(),
                self.device.as_ref(),
                self.cancel.as_ref(),
            ),
            Precision::Deep => render_band::<Float>(
                band,
                &self.params,
                self.strategy.as_ref(),
                self.device.as_ref(),
                self.cancel.as_ref(),
            ),
        };

        match result {
            Ok(()) => {
                self.finished_bands.fetch_add(1, Ordering::SeqCst);
                tracing::trace!(start_row = band.start_row(), "band finished");
            }
            Err(Cancelled) => {
                self.cancelled_bands.fetch_add(1, Ordering::SeqCst);
                tracing::trace!(start_row = band.start_row(), "band cancelled");
            }
        }
    }
}

/// Renders the Mandelbrot set into an [`OutputDevice`] using a fixed pool of
/// worker threads, one row band per worker.
pub struct MandelbrotEngine {
    pool: WorkerPool,
    center: (f64, f64),
    scale: f64,
    max_iterations: u32,
    width: i32,
    height: i32,
    strategy: Option<Arc<dyn ColourStrategy>>,
    device: Option<Arc<dyn OutputDevice>>,
    /// Set when a render timed out while bands were still running.
    abandoned: Option<Arc<RenderJob>>,
}

impl MandelbrotEngine {
    pub fn new() -> Result<Self, EngineError> {
        Self::with_workers(DEFAULT_WORKERS)
    }

    pub fn with_workers(num_workers: usize) -> Result<Self, EngineError> {
        Ok(Self {
            pool: WorkerPool::new(num_workers)?,
            center: (0.0, 0.0),
            scale: 0.0,
            max_iterations: 0,
            width: 0,
            height: 0,
            strategy: None,
            device: None,
            abandoned: None,
        })
    }

    #[must_use]
    pub fn worker_count(&self) -> usize {
        self.pool.size()
    }

    pub fn set_center(&mut self, x: f64, y: f64) {
        self.center = (x, y);
    }

    pub fn set_scale(&mut self, scale: f64) {
        self.scale = scale;
    }

    pub fn set_max_iterations(&mut self, max_iterations: u32) {
        self.max_iterations = max_iterations;
    }

    /// Also resizes the attached device when both dimensions are positive.
    pub fn set_output_dimensions(&mut self, width: i32, height: i32) {
        self.width = width;
        self.height = height;
        self.forward_dimensions();
    }

    pub fn set_colour_strategy(&mut self, strategy: Box<dyn ColourStrategy>) {
        self.strategy = Some(Arc::from(strategy));
    }

    pub fn set_output_device(&mut self, device: Arc<dyn OutputDevice>) {
        self.device = Some(device);
        self.forward_dimensions();
    }

    #[must_use]
    pub fn output_device(&self) -> Option<&Arc<dyn OutputDevice>> {
        self.device.as_ref()
    }

    #[must_use]
    pub fn colour_strategy(&self) -> Option<&dyn ColourStrategy> {
        self.strategy.as_deref()
    }

    fn forward_dimensions(&self) {
        if self.width <= 0 || self.height <= 0 {
            return;
        }

        if let Some(device) = &self.device {
            device.set_dimensions(self.width as u32, self.height as u32);
        }
    }

    /// Renders the whole image and flushes the device once every band has
    /// reported back.
    pub fn render(&mut self) -> Result<(), RenderError> {
        self.render_cancelable(Arc::new(NeverCancel))
    }

    /// Like [`render`](Self::render), but every band checks `cancel` before
    /// each row. A cancelled render is not flushed.
    pub fn render_cancelable(&mut self, cancel: Arc<dyn CancelToken>) -> Result<(), RenderError> {
        let job = self.dispatch(cancel)?;
        job.latch.wait();

        Self::finish(&job)
    }

    /// Gives up waiting after `timeout`. Bands still running keep writing to
    /// the device but the render is not flushed, and further renders return
    /// [`RenderError::Busy`] until those bands have finished.
    pub fn render_with_timeout(&mut self, timeout: Duration) -> Result<(), RenderError> {
        let job = self.dispatch(Arc::new(NeverCancel))?;

        if !job.latch.wait_timeout(timeout) {
            tracing::warn!(
                ?timeout,
                completed = job.latch.completed(),
                "render timed out waiting for bands"
            );
            self.abandoned = Some(job);
            return Err(RenderError::Timeout(timeout));
        }

        Self::finish(&job)
    }

    /// True while bands from a timed-out render are still running.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.abandoned
            .as_ref()
            .is_some_and(|job| !job.latch.is_complete())
    }

    /// Blocks until the bands of a timed-out render have finished.
    pub fn wait_idle(&mut self) {
        if let Some(job) = self.abandoned.take() {
            job.latch.wait();
        }
    }

    fn snapshot(&self) -> Result<RenderJobParts, ConfigError> {
        let strategy = self
            .strategy
            .clone()
            .ok_or(ConfigError::MissingColourStrategy)?;
        let device = self
            .device
            .clone()
            .ok_or(ConfigError::MissingOutputDevice)?;
        let params = RenderParams::new(
            self.center,
            self.scale,
            self.max_iterations,
            self.width,
            self.height,
        )?;

        Ok(RenderJobParts {
            params,
            strategy,
            device,
        })
    }

    fn dispatch(&mut self, cancel: Arc<dyn CancelToken>) -> Result<Arc<RenderJob>, RenderError> {
        if self.is_busy() {
            tracing::warn!("render refused while timed-out bands are still running");
            return Err(RenderError::Busy);
        }
        self.abandoned = None;

        let parts = self.snapshot().inspect_err(|err| {
            tracing::warn!(%err, "render skipped");
        })?;

        let workers = NonZeroU32::new(self.pool.size() as u32).unwrap_or(NonZeroU32::MIN);
        let bands = calculate_row_bands(parts.params.height(), workers);

        tracing::debug!(
            width = parts.params.width(),
            height = parts.params.height(),
            max_iterations = parts.params.max_iterations(),
            precision = ?parts.params.precision(),
            strategy = parts.strategy.display_name(),
            bands = bands.len(),
            "render started"
        );

        let job = Arc::new(RenderJob {
            params: parts.params,
            strategy: parts.strategy,
            device: parts.device,
            cancel,
            latch: CompletionLatch::new(bands.len()),
            cancelled_bands: AtomicUsize::new(0),
            finished_bands: AtomicUsize::new(0),
        });

        for band in bands {
            let job = Arc::clone(&job);

            self.pool.post(move || {
                let _guard = CompletionGuard::new(&job.latch);
                job.run_band(band);
            });
        }

        Ok(job)
    }

    fn finish(job: &RenderJob) -> Result<(), RenderError> {
        let expected = job.latch.expected();

        if job.cancelled_bands.load(Ordering::SeqCst) > 0 {
            tracing::debug!("render cancelled");
            return Err(RenderError::Cancelled(Cancelled));
        }

        let finished = job.finished_bands.load(Ordering::SeqCst);
        if finished < expected {
            tracing::warn!(failed = expected - finished, "render bands panicked");
            return Err(RenderError::BandsFailed(expected - finished));
        }

        job.device.flush()?;
        tracing::debug!("render flushed");

        Ok(())
    }
}

struct RenderJobParts {
    params: RenderParams,
    strategy: Arc<dyn ColourStrategy>,
    device: Arc<dyn OutputDevice>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::actions::cancellation::CancelFlag;
    use crate::core::actions::render_band::ports::output_device::DeviceError;
    use crate::core::data::colour::Colour;
    use crate::core::fractals::mandelbrot::algorithm::EscapeSample;
    use crate::core::fractals::mandelbrot::colour_strategies::iteration::IterationColouring;
    use crate::core::fractals::mandelbrot::colour_strategies::kinds::ColourStrategyKind;
    use std::sync::atomic::AtomicBool;
    use std::sync::mpsc;
    use std::sync::{Barrier, Mutex};

    #[derive(Default)]
    struct RecordingDevice {
        dimensions: Mutex<Option<(u32, u32)>>,
        rows: Mutex<Vec<(u32, u32, Vec<Colour>)>>,
        flushes: AtomicUsize,
    }

    impl RecordingDevice {
        fn row(&self, y: u32) -> Vec<Colour> {
            self.rows
                .lock()
                .unwrap()
                .iter()
                .find(|(_, row_y, _)| *row_y == y)
                .map(|(_, _, row)| row.clone())
                .unwrap()
        }

        fn write_count(&self) -> usize {
            self.rows.lock().unwrap().len()
        }

        fn flush_count(&self) -> usize {
            self.flushes.load(Ordering::SeqCst)
        }
    }

    impl OutputDevice for RecordingDevice {
        fn set_dimensions(&self, width: u32, height: u32) {
            *self.dimensions.lock().unwrap() = Some((width, height));
        }

        fn write(&self, x_offset: u32, y_offset: u32, row: Vec<Colour>) {
            self.rows.lock().unwrap().push((x_offset, y_offset, row));
        }

        fn flush(&self) -> Result<(), DeviceError> {
            self.flushes.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    /// Paints escaped pixels white and the set red so the two are easy to tell
    /// apart.
    struct MarkerColouring;

    const IN_SET: Colour = Colour::rgb(255, 0, 0);

    impl ColourStrategy for MarkerColouring {
        fn colour(&self, _sample: &EscapeSample<f64>) -> Colour {
            Colour::rgb(255, 255, 255)
        }

        fn colour_precise(&self, _sample: &EscapeSample<Float>) -> Colour {
            Colour::rgb(0, 0, 255)
        }

        fn colour_in_set(&self) -> Colour {
            IN_SET
        }

        fn kind(&self) -> ColourStrategyKind {
            ColourStrategyKind::Iteration
        }
    }

    /// Blocks every row until the test releases it.
    struct GatedColouring {
        gate: Arc<Barrier>,
        released: AtomicBool,
    }

    impl ColourStrategy for GatedColouring {
        fn colour(&self, _sample: &EscapeSample<f64>) -> Colour {
            if !self.released.swap(true, Ordering::SeqCst) {
                self.gate.wait();
            }
            Colour::BLACK
        }

        fn colour_precise(&self, _sample: &EscapeSample<Float>) -> Colour {
            Colour::BLACK
        }

        fn colour_in_set(&self) -> Colour {
            Colour::BLACK
        }

        fn kind(&self) -> ColourStrategyKind {
            ColourStrategyKind::Iteration
        }
    }

    struct PanickingColouring;

    impl ColourStrategy for PanickingColouring {
        fn colour(&self, _sample: &EscapeSample<f64>) -> Colour {
            panic!("colouring failed");
        }

        fn colour_precise(&self, _sample: &EscapeSample<Float>) -> Colour {
            panic!("colouring failed");
        }

        fn colour_in_set(&self) -> Colour {
            Colour::BLACK
        }

        fn kind(&self) -> ColourStrategyKind {
            ColourStrategyKind::Iteration
        }
    }

    fn configured_engine(
        width: i32,
        height: i32,
        max_iterations: u32,
    ) -> (MandelbrotEngine, Arc<RecordingDevice>) {
        let device = Arc::new(RecordingDevice::default());
        let mut engine = MandelbrotEngine::new().unwrap();

        engine.set_center(0.0, 0.0);
        engine.set_scale(1.0);
        engine.set_max_iterations(max_iterations);
        engine.set_output_dimensions(width, height);
        engine.set_colour_strategy(Box::new(IterationColouring::new()));
        engine.set_output_device(device.clone());

        (engine, device)
    }

    #[test]
    fn test_default_pool_has_four_workers() {
        let engine = MandelbrotEngine::new().unwrap();

        assert_eq!(engine.worker_count(), 4);
    }

    #[test]
    fn test_zero_workers_is_an_engine_error() {
        assert!(MandelbrotEngine::with_workers(0).is_err());
    }

    #[test]
    fn test_origin_pixel_gets_in_set_colour() {
        let (mut engine, device) = configured_engine(4, 8, 50);

        engine.render().unwrap();

        assert_eq!(device.row(4)[2], IterationColouring::new().colour_in_set());
        assert_eq!(device.flush_count(), 1);
    }

    #[test]
    fn test_far_pixel_escapes_with_gradient_colour() {
        // pixel (0, 0) is c = (-2, -4) and escapes on the first iteration
        let (mut engine, device) = configured_engine(4, 8, 50);

        engine.render().unwrap();

        let colour = device.row(0)[0];
        assert_ne!(colour, IterationColouring::new().colour_in_set());
        assert_eq!(colour.alpha(), 0xFF);
    }

    #[test]
    fn test_zero_iterations_writes_nothing() {
        let (mut engine, device) = configured_engine(4, 8, 0);

        let result = engine.render();

        assert!(matches!(
            result,
            Err(RenderError::NotConfigured(ConfigError::ZeroMaxIterations))
        ));
        assert_eq!(device.write_count(), 0);
        assert_eq!(device.flush_count(), 0);
    }

    #[test]
    fn test_invalid_dimensions_are_refused() {
        let (mut engine, device) = configured_engine(4, 4, 50);

        assert!(matches!(
            engine.render(),
            Err(RenderError::NotConfigured(ConfigError::InvalidHeight(4)))
        ));

        engine.set_output_dimensions(0, 8);
        assert!(matches!(
            engine.render(),
            Err(RenderError::NotConfigured(ConfigError::InvalidWidth(0)))
        ));
        assert_eq!(device.write_count(), 0);
        assert_eq!(device.flush_count(), 0);
    }

    #[test]
    fn test_missing_strategy_and_device_are_refused() {
        let mut engine = MandelbrotEngine::new().unwrap();
        engine.set_max_iterations(10);
        engine.set_output_dimensions(8, 8);

        assert!(matches!(
            engine.render(),
            Err(RenderError::NotConfigured(ConfigError::MissingColourStrategy))
        ));

        engine.set_colour_strategy(Box::new(IterationColouring::new()));
        assert!(matches!(
            engine.render(),
            Err(RenderError::NotConfigured(ConfigError::MissingOutputDevice))
        ));
    }

    #[test]
    fn test_every_row_written_exactly_once() {
        let (mut engine, device) = configured_engine(7, 10, 30);

        engine.render().unwrap();

        let rows = device.rows.lock().unwrap();
        let mut ys: Vec<u32> = rows.iter().map(|(_, y, _)| *y).collect();
        ys.sort_unstable();

        assert_eq!(ys, (0..10).collect::<Vec<_>>());
        assert!(rows.iter().all(|(x, _, row)| *x == 0 && row.len() == 7));
    }

    #[test]
    fn test_rows_within_a_band_arrive_in_order() {
        // 10 rows over 4 workers: bands start at 0, 2, 4 and 6
        let (mut engine, device) = configured_engine(3, 10, 20);

        engine.render().unwrap();

        let rows = device.rows.lock().unwrap();
        let last_band: Vec<u32> = rows
            .iter()
            .map(|(_, y, _)| *y)
            .filter(|y| *y >= 6)
            .collect();

        assert_eq!(last_band, vec![6, 7, 8, 9]);
    }

    #[test]
    fn test_in_set_pixels_use_strategy_in_set_colour() {
        let (mut engine, device) = configured_engine(16, 12, 100);
        engine.set_scale(0.25);
        engine.set_colour_strategy(Box::new(MarkerColouring));

        engine.render().unwrap();

        let rows = device.rows.lock().unwrap();
        let mut in_set = 0;
        for (_, y, row) in rows.iter() {
            for (x, colour) in row.iter().enumerate() {
                let c = (
                    (x as f64 - 8.0) * 0.25,
                    (*y as f64 - 6.0) * 0.25,
                );
                // main cardioid and period-2 bulb
                let q = (c.0 - 0.25).powi(2) + c.1 * c.1;
                let in_cardioid = q * (q + (c.0 - 0.25)) <= 0.25 * c.1 * c.1;
                let in_bulb = (c.0 + 1.0).powi(2) + c.1 * c.1 <= 1.0 / 16.0;

                if in_cardioid || in_bulb {
                    assert_eq!(*colour, IN_SET, "pixel ({}, {})", x, y);
                    in_set += 1;
                }
            }
        }

        assert!(in_set > 0);
    }

    #[test]
    fn test_deep_zoom_uses_precise_colouring() {
        let (mut engine, device) = configured_engine(4, 8, 50);
        engine.set_center(2.0, 2.0);
        engine.set_scale(1e-17);
        engine.set_colour_strategy(Box::new(MarkerColouring));

        engine.render().unwrap();

        assert_eq!(device.row(0)[0], Colour::rgb(0, 0, 255));
        assert_eq!(device.flush_count(), 1);
    }

    #[test]
    fn test_deep_zoom_classifies_like_standard_near_threshold() {
        let (mut standard, standard_device) = configured_engine(6, 6, 100);
        standard.set_center(0.5, 0.5);
        standard.set_scale(2e-16);
        standard.render().unwrap();

        let (mut deep, deep_device) = configured_engine(6, 6, 100);
        deep.set_center(0.5, 0.5);
        deep.set_scale(5e-17);
        deep.render().unwrap();

        for y in 0..6 {
            assert_eq!(standard_device.row(y), deep_device.row(y));
        }
    }

    #[test]
    fn test_dimensions_forwarded_to_device() {
        let (mut engine, device) = configured_engine(4, 8, 50);

        assert_eq!(*device.dimensions.lock().unwrap(), Some((4, 8)));

        engine.set_output_dimensions(32, 24);
        assert_eq!(*device.dimensions.lock().unwrap(), Some((32, 24)));

        engine.set_output_dimensions(-1, 24);
        assert_eq!(*device.dimensions.lock().unwrap(), Some((32, 24)));
    }

    #[test]
    fn test_output_device_accessor() {
        let (engine, _device) = configured_engine(4, 8, 50);

        assert!(engine.output_device().is_some());
        assert_eq!(
            engine.colour_strategy().map(|s| s.kind()),
            Some(ColourStrategyKind::Iteration)
        );
    }

    #[test]
    fn test_cancelled_render_is_not_flushed() {
        let (mut engine, device) = configured_engine(8, 40, 50);
        let flag = Arc::new(CancelFlag::new());
        flag.cancel();

        let result = engine.render_cancelable(flag);

        assert!(matches!(result, Err(RenderError::Cancelled(Cancelled))));
        assert_eq!(device.write_count(), 0);
        assert_eq!(device.flush_count(), 0);
    }

    #[test]
    fn test_render_usable_after_cancel() {
        let (mut engine, device) = configured_engine(8, 40, 50);
        let flag = Arc::new(CancelFlag::new());
        flag.cancel();
        let _ = engine.render_cancelable(flag);

        engine.render().unwrap();

        assert_eq!(device.write_count(), 40);
        assert_eq!(device.flush_count(), 1);
    }

    #[test]
    fn test_timeout_reports_stuck_band() {
        let (mut engine, device) = configured_engine(4, 8, 50);
        let gate = Arc::new(Barrier::new(2));
        engine.set_colour_strategy(Box::new(GatedColouring {
            gate: Arc::clone(&gate),
            released: AtomicBool::new(false),
        }));

        let result = engine.render_with_timeout(Duration::from_millis(50));

        assert!(matches!(result, Err(RenderError::Timeout(_))));
        assert_eq!(device.flush_count(), 0);

        // let the stuck band finish so the pool can shut down
        gate.wait();
    }

    #[test]
    fn test_render_after_timeout_waits_for_stalled_bands() {
        let device = Arc::new(RecordingDevice::default());
        let mut engine = MandelbrotEngine::with_workers(2).unwrap();
        engine.set_center(0.0, 0.0);
        engine.set_scale(0.1);
        engine.set_max_iterations(50);
        engine.set_output_dimensions(4, 40);
        engine.set_output_device(device.clone());

        let gate = Arc::new(Barrier::new(2));
        engine.set_colour_strategy(Box::new(GatedColouring {
            gate: Arc::clone(&gate),
            released: AtomicBool::new(false),
        }));

        assert!(matches!(
            engine.render_with_timeout(Duration::from_millis(50)),
            Err(RenderError::Timeout(_))
        ));
        assert!(engine.is_busy());

        engine.set_colour_strategy(Box::new(MarkerColouring));
        assert!(matches!(engine.render(), Err(RenderError::Busy)));

        gate.wait();
        engine.wait_idle();
        assert!(!engine.is_busy());

        let first_render_writes = device.write_count();
        engine.render().unwrap();

        let rows = device.rows.lock().unwrap();
        let second_render = &rows[first_render_writes..];
        assert_eq!(second_render.len(), 40);
        for (_, y, row) in second_render {
            for colour in row {
                assert!(
                    *colour == IN_SET || *colour == Colour::rgb(255, 255, 255),
                    "row {} still has the timed-out render's colour",
                    y
                );
            }
        }
        assert_eq!(device.flush_count(), 1);
    }

    #[test]
    fn test_render_with_timeout_completes_normally() {
        let (mut engine, device) = configured_engine(4, 8, 50);

        engine.render_with_timeout(Duration::from_secs(10)).unwrap();

        assert_eq!(device.write_count(), 8);
        assert_eq!(device.flush_count(), 1);
    }

    #[test]
    fn test_panicking_band_does_not_deadlock() {
        let (mut engine, device) = configured_engine(4, 8, 50);
        engine.set_colour_strategy(Box::new(PanickingColouring));

        let result = engine.render();

        assert!(matches!(result, Err(RenderError::BandsFailed(4))));
        assert_eq!(device.flush_count(), 0);
    }

    #[test]
    fn test_each_render_flushes_once() {
        let (mut engine, device) = configured_engine(4, 8, 50);
        let (tx, rx) = mpsc::channel();

        for _ in 0..3 {
            engine.render().unwrap();
            tx.send(device.flush_count()).unwrap();
        }
        drop(tx);

        assert_eq!(rx.iter().collect::<Vec<_>>(), vec![1, 2, 3]);
    }
}
