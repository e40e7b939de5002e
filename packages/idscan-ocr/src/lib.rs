pub mod crop;
pub mod engine;
pub mod region;
pub mod tesseract;

pub use crop::{CardCropper, CropError, ImageCropper};
pub use engine::{OcrEngine, OcrError, OcrInput, OcrMode, OcrOutput, OcrProfile, RecognizeOptions};
pub use region::{BoundingBox, NormalizedRect, TextRegion};
pub use tesseract::TesseractEngine;
