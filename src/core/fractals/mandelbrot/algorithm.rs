use crate::core::data::complex::Complex;
use crate::core::data::scalar::Scalar;

/// |z|² above which a point is known to escape.
pub const ESCAPE_RADIUS_SQUARED: f64 = 4.0;

/// Everything a colour strategy gets to see about one escaped pixel.
#[derive(Debug, Clone, PartialEq)]
pub struct EscapeSample<T = f64> {
    pub z: Complex<T>,
    pub dz: Complex<T>,
    pub scale: f64,
    pub iterations: u32,
    pub max_iterations: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Escape<T = f64> {
    /// The orbit stayed bounded for every allowed iteration.
    InSet,
    Escaped {
        z: Complex<T>,
        dz: Complex<T>,
        iterations: u32,
    },
}

/// Iterates z -> z² + c from z = 0 while tracking dz/dc, stopping as soon as
/// |z|² exceeds [`ESCAPE_RADIUS_SQUARED`].
///
/// Iterations are counted from 1. A point whose orbit first crosses the radius
/// on iteration `max_iterations` is reported as
/// [`Escaped`](Escape::Escaped) with `iterations == max_iterations`, not as
/// [`InSet`](Escape::InSet). Only orbits that stay bounded for all
/// `max_iterations` steps are in the set.
pub fn escape_time<T: Scalar>(c: &Complex<T>, max_iterations: u32) -> Escape<T> {
    let mut z = Complex::<T>::zero();
    let mut dz = Complex::<T>::zero();

    for iteration in 1..=max_iterations {
        dz = z.times(&dz).scaled(2.0).add_real(1.0);
        z = z.squared().plus(c);

        if z.magnitude_squared().gt_f64(ESCAPE_RADIUS_SQUARED) {
            return Escape::Escaped {
                z,
                dz,
                iterations: iteration,
            };
        }
    }

    Escape::InSet
}
