pub mod colour;
pub mod complex;
pub mod render_params;
pub mod row_band;
pub mod scalar;
