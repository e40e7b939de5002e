use std::path::PathBuf;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

use crate::engine::{OcrEngine, OcrError, OcrInput, OcrMode, OcrOutput, OcrProfile, RecognizeOptions};
use crate::region::{BoundingBox, TextRegion};

const PSM_SINGLE_BLOCK: &str = "6";
const PSM_SINGLE_LINE: &str = "7";

const WHITELIST_DEFAULT: &str =
    "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789- /,.";
const WHITELIST_NAME: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz -,.'";
const WHITELIST_NUMERIC: &str = "0123456789-";

/// Runs the `tesseract` command line tool and reads its TSV output.
pub struct TesseractEngine {
    binary: PathBuf,
    language: String,
}

impl TesseractEngine {
    pub fn new() -> Self {
        Self {
            binary: PathBuf::from("tesseract"),
            language: "eng".to_string(),
        }
    }

    pub fn with_binary(mut self, binary: impl Into<PathBuf>) -> Self {
        self.binary = binary.into();
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    fn args(&self, source: &str, options: &RecognizeOptions) -> Vec<String> {
        // Any profile forces single-line segmentation.
        let psm = match (options.profile, options.mode) {
            (Some(_), _) | (None, OcrMode::Line) => PSM_SINGLE_LINE,
            (None, OcrMode::Block) => PSM_SINGLE_BLOCK,
        };
        let whitelist = match options.profile {
            Some(OcrProfile::Name) => WHITELIST_NAME,
            Some(OcrProfile::Numeric) => WHITELIST_NUMERIC,
            // Some cards print the month name.
            Some(OcrProfile::Dob) | None => WHITELIST_DEFAULT,
        };

        vec![
            source.to_string(),
            "stdout".to_string(),
            "-l".to_string(),
            self.language.clone(),
            "--oem".to_string(),
            "1".to_string(),
            "--psm".to_string(),
            psm.to_string(),
            "--dpi".to_string(),
            "300".to_string(),
            "-c".to_string(),
            "preserve_interword_spaces=1".to_string(),
            "-c".to_string(),
            format!("tessedit_char_whitelist={}", whitelist),
            "tsv".to_string(),
        ]
    }
}

impl Default for TesseractEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Default)]
struct LineAccumulator {
    key: (u32, u32, u32),
    words: Vec<String>,
    confidences: Vec<f32>,
    bounds: Option<(f32, f32, f32, f32)>,
}

impl LineAccumulator {
    fn push(&mut self, word: &str, conf: f32, left: f32, top: f32, width: f32, height: f32) {
        self.words.push(word.to_string());
        if conf >= 0.0 {
            self.confidences.push(conf);
        }
        let (right, bottom) = (left + width, top + height);
        self.bounds = Some(match self.bounds {
            Some((l, t, r, b)) => (l.min(left), t.min(top), r.max(right), b.max(bottom)),
            None => (left, top, right, bottom),
        });
    }

    fn finish(self) -> Option<TextRegion> {
        if self.words.is_empty() {
            return None;
        }
        let confidence = if self.confidences.is_empty() {
            None
        } else {
            Some(self.confidences.iter().sum::<f32>() / self.confidences.len() as f32)
        };
        Some(TextRegion {
            text: self.words.join(" "),
            bounding_box: self.bounds.map(|(l, t, r, b)| BoundingBox {
                x: l,
                y: t,
                width: r - l,
                height: b - t,
            }),
            confidence,
        })
    }
}

/// Folds tesseract's word-level TSV rows into line regions.
pub(crate) fn parse_tsv(tsv: &str) -> OcrOutput {
    let mut regions = Vec::new();
    let mut current = LineAccumulator::default();
    let mut word_confidences = Vec::new();

    for row in tsv.lines().skip(1) {
        let cols: Vec<&str> = row.split('\t').collect();
        if cols.len() < 12 || cols[0] != "5" {
            continue;
        }
        let text = cols[11].trim();
        if text.is_empty() {
            continue;
        }

        let num = |i: usize| cols[i].trim().parse::<f32>().unwrap_or(0.0);
        let idx = |i: usize| cols[i].trim().parse::<u32>().unwrap_or(0);
        let key = (idx(2), idx(3), idx(4));
        let conf = cols[10].trim().parse::<f32>().unwrap_or(-1.0);

        if key != current.key && !current.words.is_empty() {
            let done = std::mem::take(&mut current);
            regions.extend(done.finish());
        }
        current.key = key;
        current.push(text, conf, num(6), num(7), num(8), num(9));
        if conf >= 0.0 {
            word_confidences.push(conf);
        }
    }
    regions.extend(current.finish());

    let text = regions
        .iter()
        .map(|r| r.text.as_str())
        .collect::<Vec<_>>()
        .join("\n");
    let mean_confidence = if word_confidences.is_empty() {
        None
    } else {
        Some(word_confidences.iter().sum::<f32>() / word_confidences.len() as f32)
    };

    OcrOutput {
        text,
        regions,
        mean_confidence,
        person_names: Vec::new(),
    }
}

#[async_trait]
impl OcrEngine for TesseractEngine {
    async fn recognize(
        &self,
        input: &OcrInput,
        options: &RecognizeOptions,
    ) -> Result<OcrOutput, OcrError> {
        let (source, stdin_bytes) = match input {
            OcrInput::FilePath(path) => (path.display().to_string(), None),
            OcrInput::Bytes(data) if data.is_empty() => {
                return Err(OcrError::InvalidInput("empty image buffer".into()))
            }
            OcrInput::Bytes(data) => ("stdin".to_string(), Some(data.as_slice())),
        };

        debug!(
            mode = options.mode.as_str(),
            profile = options.profile.map(|p| p.as_str()),
            "running tesseract"
        );

        let mut child = Command::new(&self.binary)
            .args(self.args(&source, options))
            .stdin(if stdin_bytes.is_some() {
                Stdio::piped()
            } else {
                Stdio::null()
            })
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        if let Some(bytes) = stdin_bytes {
            if let Some(mut stdin) = child.stdin.take() {
                stdin.write_all(bytes).await?;
            }
        }

        let output = child.wait_with_output().await?;
        if !output.status.success() {
            return Err(OcrError::EngineError(
                String::from_utf8_lossy(&output.stderr).trim().to_string(),
            ));
        }

        let tsv = String::from_utf8(output.stdout)
            .map_err(|e| OcrError::EngineError(format!("non-utf8 output: {}", e)))?;
        Ok(parse_tsv(&tsv))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str =
        "level\tpage_num\tblock_num\tpar_num\tline_num\tword_num\tleft\ttop\twidth\theight\tconf\ttext";

    #[test]
    fn groups_words_into_lines() {
        let tsv = [
            HEADER,
            "1\t1\t0\t0\t0\t0\t0\t0\t640\t400\t-1\t",
            "5\t1\t1\t1\t1\t1\t10\t20\t50\t12\t90\tJUAN",
            "5\t1\t1\t1\t1\t2\t65\t20\t40\t12\t80\tDELA",
            "5\t1\t1\t1\t2\t1\t10\t40\t120\t12\t70\t1234-5678-9012-3456",
        ]
        .join("\n");

        let out = parse_tsv(&tsv);
        assert_eq!(out.text, "JUAN DELA\n1234-5678-9012-3456");
        assert_eq!(out.regions.len(), 2);
        assert_eq!(out.regions[0].confidence, Some(85.0));
        assert_eq!(
            out.regions[0].bounding_box,
            Some(BoundingBox {
                x: 10.0,
                y: 20.0,
                width: 95.0,
                height: 12.0
            })
        );
        assert_eq!(out.mean_confidence, Some(80.0));
    }

    #[test]
    fn empty_tsv_has_no_confidence() {
        let out = parse_tsv(HEADER);
        assert!(out.text.is_empty());
        assert!(out.mean_confidence.is_none());
    }

    #[test]
    fn profile_forces_single_line() {
        let engine = TesseractEngine::new();
        let args = engine.args("stdin", &RecognizeOptions::block().with_profile(OcrProfile::Numeric));
        let psm = args.iter().position(|a| a == "--psm").unwrap();
        assert_eq!(args[psm + 1], PSM_SINGLE_LINE);
        assert!(args.contains(&"tessedit_char_whitelist=0123456789-".to_string()));
    }

    #[tokio::test]
    async fn rejects_empty_buffer() {
        let engine = TesseractEngine::new();
        let err = engine
            .recognize(&OcrInput::Bytes(Vec::new()), &RecognizeOptions::line())
            .await
            .unwrap_err();
        assert!(matches!(err, OcrError::InvalidInput(_)));
    }
}
