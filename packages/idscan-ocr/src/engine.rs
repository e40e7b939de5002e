use std::fmt;
use std::path::PathBuf;

use async_trait::async_trait;
use thiserror::Error;

use crate::region::TextRegion;

#[derive(Debug, Clone)]
pub enum OcrInput {
    FilePath(PathBuf),
    Bytes(Vec<u8>),
}

/// Page segmentation hint. `Line` is for short single-field crops, `Block`
/// for whole-card recognition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OcrMode {
    Line,
    #[default]
    Block,
}

impl OcrMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            OcrMode::Line => "line",
            OcrMode::Block => "block",
        }
    }
}

/// Field-type hint passed through to the recognizer. Engines may ignore it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OcrProfile {
    Name,
    Numeric,
    Dob,
}

impl OcrProfile {
    pub fn as_str(&self) -> &'static str {
        match self {
            OcrProfile::Name => "name",
            OcrProfile::Numeric => "numeric",
            OcrProfile::Dob => "dob",
        }
    }
}

impl fmt::Display for OcrProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecognizeOptions {
    pub mode: OcrMode,
    pub profile: Option<OcrProfile>,
}

impl RecognizeOptions {
    pub fn line() -> Self {
        Self {
            mode: OcrMode::Line,
            profile: None,
        }
    }

    pub fn block() -> Self {
        Self {
            mode: OcrMode::Block,
            profile: None,
        }
    }

    pub fn with_profile(mut self, profile: OcrProfile) -> Self {
        self.profile = Some(profile);
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct OcrOutput {
    pub text: String,
    pub regions: Vec<TextRegion>,
    /// Mean word confidence on a 0-100 scale, when the engine reports one.
    pub mean_confidence: Option<f32>,
    /// Person-name candidates found by the engine's own name finder, if any.
    pub person_names: Vec<String>,
}

#[derive(Debug, Error)]
pub enum OcrError {
    #[error("unsupported operation")]
    Unsupported,
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("engine error: {0}")]
    EngineError(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

#[async_trait]
pub trait OcrEngine: Send + Sync {
    async fn recognize(
        &self,
        input: &OcrInput,
        options: &RecognizeOptions,
    ) -> Result<OcrOutput, OcrError>;
}
