use rug::Float;

/// Bits of mantissa used by the deep zoom backend.
pub const PRECISION: u32 = 128;

/// The arithmetic the escape-time recurrence needs. Implemented once for native
/// `f64` and once for 128-bit `rug::Float`, so both backends share one loop.
pub trait Scalar: Clone + Send + Sync + 'static {
    fn from_f64(value: f64) -> Self;

    fn zero() -> Self {
        Self::from_f64(0.0)
    }

    fn add(&self, other: &Self) -> Self;

    fn sub(&self, other: &Self) -> Self;

    fn mul(&self, other: &Self) -> Self;

    fn add_f64(&self, value: f64) -> Self;

    fn mul_f64(&self, value: f64) -> Self;

    fn square(&self) -> Self;

    fn sqrt(&self) -> Self;

    fn gt_f64(&self, limit: f64) -> bool;

    fn to_f64(&self) -> f64;
}

impl Scalar for f64 {
    #[inline]
    fn from_f64(value: f64) -> Self {
        value
    }

    #[inline]
    fn add(&self, other: &Self) -> Self {
        self + other
    }

    #[inline]
    fn sub(&self, other: &Self) -> Self {
        self - other
    }

    #[inline]
    fn mul(&self, other: &Self) -> Self {
        self * other
    }

    #[inline]
    fn add_f64(&self, value: f64) -> Self {
        self + value
    }

    #[inline]
    fn mul_f64(&self, value: f64) -> Self {
        self * value
    }

    #[inline]
    fn square(&self) -> Self {
        self * self
    }

    #[inline]
    fn sqrt(&self) -> Self {
        f64::sqrt(*self)
    }

    #[inline]
    fn gt_f64(&self, limit: f64) -> bool {
        *self > limit
    }

    #[inline]
    fn to_f64(&self) -> f64 {
        *self
    }
}

impl Scalar for Float {
    fn from_f64(value: f64) -> Self {
        Float::with_val(PRECISION, value)
    }

    fn add(&self, other: &Self) -> Self {
        Float::with_val(PRECISION, self + other)
    }

    fn sub(&self, other: &Self) -> Self {
        Float::with_val(PRECISION, self - other)
    }

    fn mul(&self, other: &Self) -> Self {
        Float::with_val(PRECISION, self * other)
    }

    fn add_f64(&self, value: f64) -> Self {
        Float::with_val(PRECISION, self + value)
    }

    fn mul_f64(&self, value: f64) -> Self {
        Float::with_val(PRECISION, self * value)
    }

    fn square(&self) -> Self {
        Float::with_val(PRECISION, self.square_ref())
    }

    fn sqrt(&self) -> Self {
        Float::with_val(PRECISION, self.sqrt_ref())
    }

    fn gt_f64(&self, limit: f64) -> bool {
        *self > limit
    }

    fn to_f64(&self) -> f64 {
        Float::to_f64(self)
    }
}
