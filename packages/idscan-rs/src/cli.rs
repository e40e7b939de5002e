//! Command line arguments backing the `idscan` binary.
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
  name = "idscan",
  about = "Extract, merge and validate identity fields from ID card scans",
  version
)]
pub struct Args {
  /// Log debug output to stderr
  #[arg(long, short = 'v', global = true)]
  pub verbose: bool,

  #[command(subcommand)]
  pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
  /// Print version information
  Version,
  /// List the document types a caller can pick
  Types {
    /// Include the internal "Unknown" and "Blank" types
    #[arg(long)]
    all: bool,
  },
  /// Parse raw OCR text into identity fields
  Parse {
    /// Document type key, e.g. "National ID"; "Unknown" detects the type
    #[arg(long, short = 't', default_value = "Unknown")]
    id_type: String,

    /// Text file to read, or "-" for stdin
    input: Option<PathBuf>,

    /// Date to compute ages against (defaults to today)
    #[arg(long)]
    today: Option<NaiveDate>,
  },
  /// Guess the document type of raw OCR text
  Detect {
    /// Text file to read, or "-" for stdin
    input: Option<PathBuf>,
  },
  /// Check identity fields against the rules for a document type
  Validate {
    /// Document type key
    #[arg(long, short = 't')]
    id_type: String,

    #[arg(long, default_value = "")]
    full_name: String,

    /// Date of birth as YYYY-MM-DD
    #[arg(long, default_value = "")]
    dob: String,

    #[arg(long, default_value = "")]
    id_number: String,

    /// Date to compute ages against (defaults to today)
    #[arg(long)]
    today: Option<NaiveDate>,
  },
  /// Print the built-in field layout of a document type as an override document
  Rois {
    /// Document type key
    #[arg(long, short = 't')]
    id_type: String,
  },
  /// Run a full scan of a card photo with the Tesseract engine
  Scan {
    /// Document type key
    #[arg(long, short = 't')]
    id_type: String,

    /// Cropped card photo
    #[arg(long, short = 'i')]
    image: PathBuf,

    /// Field layout override (JSON) to use instead of the built-in one
    #[arg(long)]
    rois: Option<PathBuf>,

    /// Path to the tesseract executable
    #[arg(long, default_value = "tesseract")]
    tesseract: PathBuf,

    /// Tesseract language
    #[arg(long, default_value = "eng")]
    lang: String,

    /// Margin around each field region, as a fraction of the card (0 to 0.5)
    #[arg(long, default_value = "0.02", value_parser = parse_padding)]
    padding: f32,

    /// Recognize fields one after another
    #[arg(long)]
    no_concurrent: bool,

    /// Date to compute ages against (defaults to today)
    #[arg(long)]
    today: Option<NaiveDate>,
  },
}

fn parse_padding(raw: &str) -> Result<f32, String> {
  let padding: f32 = raw.parse().map_err(|e| format!("{e}"))?;
  if !(0.0..=0.5).contains(&padding) {
    return Err(format!("padding must be between 0 and 0.5, got {raw}"));
  }
  Ok(padding)
}
