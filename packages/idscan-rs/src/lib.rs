//! # idscan-rs
//!
//! Identity field extraction for photographed government ID cards: per-type
//! parsing of OCR text, fusion of a per-field (ROI) read with a whole-card
//! read, and validation of the fused result.
//!
//! ## Features
//!
//! - **Per-type parsers**: National ID, PhilHealth, UMID, Driver's License,
//!   Quezon City Citizen ID, PWD ID and SSS, plus a generic fallback
//! - **Type detection**: keyword and number-shape classification of raw card text
//! - **Date normalization**: month-name, ISO-ordered and local numeric dates to `YYYY-MM-DD`
//! - **ROI templates**: built-in field layouts per card type, with JSON overrides
//! - **Merge & validation**: confidence-aware fusion of both reads and per-type business rules
//! - **Scan orchestration**: cropping, OCR and parsing behind pluggable collaborators
//!
//! ## Quick Start
//!
//! ```ignore
//! use idscan_rs::prelude::*;
//!
//! // Parse raw OCR text for a known card type
//! let info = parse_text_by_id_type(text, IdType::NationalId);
//!
//! // Check the fields before accepting them
//! let outcome = validate(info.id_type, &info.full_name, &info.dob, &info.id_number);
//!
//! // Run a whole scan against a card photo
//! let orchestrator = ScanOrchestrator::with_image_cropper(Arc::new(TesseractEngine::new()), ScanOptions::default());
//! let result = orchestrator.scan(&card, &RoiSet::defaults(IdType::Umid)).await;
//! println!("{}", serde_json::to_string_pretty(&result)?);
//! ```

pub mod date;
pub mod detect;
pub mod error;
pub mod field_text;
pub mod heuristics;
pub mod id_numbers;
pub mod id_type;
pub mod merge;
pub mod ocr_adapter;
pub mod options;
pub mod parsers;
pub mod pipeline;
pub mod registry;
pub mod roi;
pub mod templates;
pub mod types;
pub mod validation;

// Re-export commonly used types at the root level
pub use date::{is_iso_calendar_date, normalize_date, parse_date};
pub use detect::{detect_id_type, DetectedIdType};
pub use error::ScanError;
pub use id_type::IdType;
pub use merge::{merge, MergeResult, RoiFields};
pub use ocr_adapter::{OcrFieldAdapter, OcrFieldResult};
pub use options::ScanOptions;
pub use parsers::{parse_text_by_id_type, parse_text_by_id_type_at, post_process};
pub use pipeline::{ScanDiagnostics, ScanOrchestrator, ScanResult, ScanState};
pub use registry::{get_descriptor, get_descriptor_by_key, list_selectable_types, Descriptor, TypeOption};
pub use templates::{default_rois, CustomRois, RoiSet, RoiSpec};
pub use types::{ExtractedInfo, FieldConfidence, FieldKey};
pub use validation::{validate, validate_at, ValidationOutcome};

/// Prelude module for convenient imports
///
/// Import everything you need with:
/// ```ignore
/// use idscan_rs::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        default_rois, detect_id_type, get_descriptor, list_selectable_types, merge, normalize_date,
        parse_text_by_id_type, parse_text_by_id_type_at, validate, validate_at, CustomRois, DetectedIdType,
        ExtractedInfo, FieldConfidence, FieldKey, IdType, MergeResult, RoiFields, RoiSet, RoiSpec, ScanError, ScanOptions, ScanOrchestrator,
        ScanResult, ValidationOutcome,
    };
    pub use idscan_ocr::{CardCropper, ImageCropper, OcrEngine, TesseractEngine};
}
