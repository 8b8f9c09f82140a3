pub mod factory;
pub mod hsv;
pub mod iteration;
pub mod kinds;
pub mod smooth;
pub mod wavelength;
