use crate::core::data::scalar::Scalar;

// implement Complex instead of using num-complex so the same type can carry
// either f64 or the deep zoom float
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Complex<T = f64> {
    pub real: T,
    pub imag: T,
}

impl<T: Scalar> Complex<T> {
    #[must_use]
    pub fn zero() -> Self {
        Self {
            real: T::zero(),
            imag: T::zero(),
        }
    }

    #[must_use]
    pub fn from_f64(real: f64, imag: f64) -> Self {
        Self {
            real: T::from_f64(real),
            imag: T::from_f64(imag),
        }
    }

    #[must_use]
    pub fn magnitude_squared(&self) -> T {
        self.real.square().add(&self.imag.square())
    }

    /// |z|, computed at the precision of `T`.
    #[must_use]
    pub fn magnitude(&self) -> T {
        self.magnitude_squared().sqrt()
    }

    #[must_use]
    pub fn plus(&self, other: &Self) -> Self {
        Self {
            real: self.real.add(&other.real),
            imag: self.imag.add(&other.imag),
        }
    }

    #[must_use]
    pub fn times(&self, other: &Self) -> Self {
        Self {
            real: self.real.mul(&other.real).sub(&self.imag.mul(&other.imag)),
            imag: self.real.mul(&other.imag).add(&self.imag.mul(&other.real)),
        }
    }

    #[must_use]
    pub fn squared(&self) -> Self {
        Self {
            real: self.real.square().sub(&self.imag.square()),
            imag: self.real.mul(&self.imag).mul_f64(2.0),
        }
    }

    #[must_use]
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            real: self.real.mul_f64(factor),
            imag: self.imag.mul_f64(factor),
        }
    }

    #[must_use]
    pub fn add_real(&self, value: f64) -> Self {
        Self {
            real: self.real.add_f64(value),
            imag: self.imag.clone(),
        }
    }
}
