//! Knobs for a single scan.
use chrono::{Local, NaiveDate};

/// Options for one scan.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanOptions {
    /// Margin added on every side of a field region, as a fraction of the card.
    pub roi_padding: f32,
    /// Smallest crop edge in pixels.
    pub min_crop_size: u32,
    /// Issue the field OCR calls together instead of one after another.
    pub concurrent_field_ocr: bool,
    /// "Today" for date-of-birth age checks, in parsing and in validation. The
    /// local date when unset.
    pub reference_date: Option<NaiveDate>,
}

impl ScanOptions {
    pub fn today(&self) -> NaiveDate {
        self.reference_date.unwrap_or_else(|| Local::now().date_naive())
    }
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            roi_padding: 0.02,
            min_crop_size: 8,
            concurrent_field_ocr: true,
            reference_date: None,
        }
    }
}
