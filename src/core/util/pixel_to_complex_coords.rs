use crate::core::data::complex::Complex;
use crate::core::data::scalar::Scalar;

/// Maps a pixel to the plane: `center + scale · (pixel + offset)`.
///
/// The pixel-plus-offset sum is exact in f64 for any realistic image size, so
/// only the multiply and the add need `T`'s precision.
pub fn pixel_to_complex_coords<T: Scalar>(
    x: u32,
    y: u32,
    center: (f64, f64),
    scale: f64,
    offsets: (f64, f64),
) -> Complex<T> {
    let real = T::from_f64(x as f64 + offsets.0)
        .mul_f64(scale)
        .add_f64(center.0);
    let imag = T::from_f64(y as f64 + offsets.1)
        .mul_f64(scale)
        .add_f64(center.1);

    Complex { real, imag }
}
