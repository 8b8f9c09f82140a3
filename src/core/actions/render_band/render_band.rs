use crate::core::actions::cancellation::{CancelToken, Cancelled};
use crate::core::actions::render_band::ports::colour_strategy::{ColourStrategy, SampleColour};
use crate::core::actions::render_band::ports::output_device::OutputDevice;
use crate::core::data::colour::Colour;
use crate::core::data::render_params::RenderParams;
use crate::core::data::row_band::RowBand;
use crate::core::fractals::mandelbrot::algorithm::{Escape, EscapeSample, escape_time};
use crate::core::util::pixel_to_complex_coords::pixel_to_complex_coords;

/// Computes every row of `band` with arithmetic `T` and hands each finished
/// row to `device`. Rows are written in increasing order; the token is polled
/// before each one.
pub fn render_band<T: SampleColour>(
    band: RowBand,
    params: &RenderParams,
    strategy: &dyn ColourStrategy,
    device: &dyn OutputDevice,
    cancel: &dyn CancelToken,
) -> Result<(), Cancelled> {
    let width = params.width();
    let center = params.center();
    let scale = params.scale();
    let offsets = params.offsets();
    let max_iterations = params.max_iterations();

    for y in band.rows() {
        if cancel.is_cancelled() {
            return Err(Cancelled);
        }

        let row: Vec<Colour> = (0..width)
            .map(|x| {
                let c = pixel_to_complex_coords::<T>(x, y, center, scale, offsets);

                match escape_time(&c, max_iterations) {
                    Escape::InSet => strategy.colour_in_set(),
                    Escape::Escaped { z, dz, iterations } => T::colour_with(
                        strategy,
                        &EscapeSample {
                            z,
                            dz,
                            scale,
                            iterations,
                            max_iterations,
                        },
                    ),
                }
            })
            .collect();

        device.write(0, y, row);
    }

    Ok(())
}
