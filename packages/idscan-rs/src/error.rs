use std::path::PathBuf;
use thiserror::Error;

use crate::id_type::IdType;
use crate::types::FieldKey;

/// Integration errors. Noisy OCR never produces one of these; it yields empty
/// fields and a failed validation instead.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("invalid ROI for {key}: {reason}")]
    InvalidRoi { key: FieldKey, reason: String },
    #[error("ROI override was saved for {found}, expected {expected}")]
    RoiMismatch { expected: IdType, found: IdType },
    #[error("ROI file {path}: {source}")]
    RoiFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed ROI document: {0}")]
    Json(#[from] serde_json::Error),
}
