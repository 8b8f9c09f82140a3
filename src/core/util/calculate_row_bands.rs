use crate::core::data::row_band::RowBand;
use std::num::NonZeroU32;

/// Splits `height` rows into `bands` bands of `height / bands` rows each. The
/// last band takes the remainder, so every row is covered exactly once even
/// when there are more bands than rows.
pub fn calculate_row_bands(height: u32, bands: NonZeroU32) -> Vec<RowBand> {
    let bands = bands.get();
    let band_height = height / bands;

    (0..bands)
        .map(|band_num| {
            let start_row = band_num * band_height;

            let row_count = if band_num == bands - 1 {
                height - start_row // Last band takes any remainder rows
            } else {
                band_height
            };

            RowBand::new(start_row, row_count)
        })
        .collect()
}
