//! Thin wrapper over an [`OcrEngine`] that takes decoded images and returns
//! just the parts the scan pipeline consumes.
use image::{DynamicImage, ImageFormat};
use idscan_ocr::{OcrEngine, OcrError, OcrInput, RecognizeOptions};
use serde::Serialize;
use std::io::Cursor;
use std::sync::Arc;
use tracing::warn;

/// Text recognized from one image.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OcrFieldResult {
    pub text: String,
    /// 0-100, when the engine reports it.
    pub confidence: Option<f32>,
    pub person_names: Vec<String>,
}

#[derive(Clone)]
pub struct OcrFieldAdapter {
    engine: Arc<dyn OcrEngine>,
}

impl OcrFieldAdapter {
    pub fn new(engine: Arc<dyn OcrEngine>) -> Self {
        Self { engine }
    }

    pub async fn recognize(
        &self,
        image: &DynamicImage,
        options: RecognizeOptions,
    ) -> Result<OcrFieldResult, OcrError> {
        let input = OcrInput::Bytes(encode_png(image)?);
        let output = self.engine.recognize(&input, &options).await?;
        Ok(OcrFieldResult {
            text: output.text,
            confidence: output.mean_confidence,
            person_names: output.person_names,
        })
    }

    /// Like [`recognize`](Self::recognize), but a failure is logged and read
    /// as "nothing recognized".
    pub async fn recognize_or_empty(
        &self,
        what: &str,
        image: &DynamicImage,
        options: RecognizeOptions,
    ) -> OcrFieldResult {
        match self.recognize(image, options).await {
            Ok(result) => result,
            Err(e) => {
                warn!(source = what, mode = options.mode.as_str(), error = %e, "recognition failed");
                OcrFieldResult::default()
            }
        }
    }
}

fn encode_png(image: &DynamicImage) -> Result<Vec<u8>, OcrError> {
    let mut buf = Cursor::new(Vec::new());
    image
        .write_to(&mut buf, ImageFormat::Png)
        .map_err(|e| OcrError::InvalidInput(format!("failed to encode image: {e}")))?;
    Ok(buf.into_inner())
}
