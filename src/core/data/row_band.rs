use std::ops::Range;

/// A contiguous range of image rows owned by one worker for one render.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct RowBand {
    start_row: u32,
    row_count: u32,
}

impl RowBand {
    #[must_use]
    pub fn new(start_row: u32, row_count: u32) -> Self {
        Self {
            start_row,
            row_count,
        }
    }

    #[must_use]
    pub fn start_row(&self) -> u32 {
        self.start_row
    }

    #[must_use]
    pub fn row_count(&self) -> u32 {
        self.row_count
    }

    #[must_use]
    pub fn rows(&self) -> Range<u32> {
        self.start_row..self.start_row + self.row_count
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.row_count == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rows_range() {
        let band = RowBand::new(6, 4);

        assert_eq!(band.rows(), 6..10);
        assert!(!band.is_empty());
    }

    #[test]
    fn test_empty_band() {
        let band = RowBand::new(3, 0);

        assert_eq!(band.rows().count(), 0);
        assert!(band.is_empty());
    }
}
