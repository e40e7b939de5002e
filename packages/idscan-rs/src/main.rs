mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Args, Commands};
use idscan_rs::prelude::*;
use serde::Serialize;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

fn init_tracing(verbose: bool) {
  let filter = if verbose {
    EnvFilter::new("debug")
  } else {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
  };
  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .init();
}

/// Reads the whole file, or stdin when no path (or "-") is given.
fn read_input(path: Option<&Path>) -> Result<String> {
  match path {
    Some(p) if p != Path::new("-") => {
      std::fs::read_to_string(p).with_context(|| format!("Failed to read {}", p.display()))
    }
    _ => {
      let mut text = String::new();
      std::io::stdin()
        .read_to_string(&mut text)
        .context("Failed to read stdin")?;
      Ok(text)
    }
  }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
  println!("{}", serde_json::to_string_pretty(value)?);
  Ok(())
}

/// Runs one command and returns the process exit code.
async fn run(command: Commands) -> Result<i32> {
  match command {
    Commands::Version => {
      println!("idscan {}", env!("CARGO_PKG_VERSION"));
    }
    Commands::Types { all } => {
      print_json(&list_selectable_types(all))?;
    }
    Commands::Parse { id_type, input, today } => {
      let text = read_input(input.as_deref())?;
      let id_type = IdType::from_key(&id_type);
      let info = match today {
        Some(day) => parse_text_by_id_type_at(&text, id_type, day),
        None => parse_text_by_id_type(&text, id_type),
      };
      print_json(&info)?;
    }
    Commands::Detect { input } => {
      let text = read_input(input.as_deref())?;
      print_json(&detect_id_type(&text))?;
    }
    Commands::Validate {
      id_type,
      full_name,
      dob,
      id_number,
      today,
    } => {
      let id_type = IdType::from_key(&id_type);
      let outcome = match today {
        Some(day) => validate_at(id_type, &full_name, &dob, &id_number, day),
        None => validate(id_type, &full_name, &dob, &id_number),
      };
      print_json(&outcome)?;
      if !outcome.ok {
        return Ok(1);
      }
    }
    Commands::Rois { id_type } => {
      print_json(&CustomRois::from_defaults(IdType::from_key(&id_type)))?;
    }
    Commands::Scan {
      id_type,
      image: image_path,
      rois,
      tesseract,
      lang,
      padding,
      no_concurrent,
      today,
    } => {
      let id_type = IdType::from_key(&id_type);
      let custom = rois
        .as_deref()
        .map(|path| CustomRois::load(path))
        .transpose()
        .context("Failed to load ROI override")?;
      let roi_set = RoiSet::resolve(id_type, custom.as_ref())?;

      let card = image::open(&image_path)
        .with_context(|| format!("Failed to open card image {}", image_path.display()))?;

      let engine = TesseractEngine::new().with_binary(tesseract).with_language(lang);
      let options = ScanOptions {
        roi_padding: padding,
        concurrent_field_ocr: !no_concurrent,
        reference_date: today,
        ..Default::default()
      };
      let orchestrator = ScanOrchestrator::with_image_cropper(Arc::new(engine), options);
      let result = orchestrator.scan(&card, &roi_set).await;
      print_json(&result)?;
    }
  }
  Ok(0)
}

#[tokio::main]
async fn main() {
  let args = Args::parse();
  init_tracing(args.verbose);

  match run(args.command).await {
    Ok(code) => std::process::exit(code),
    Err(e) => {
      eprintln!("Error: {:#}", e);
      std::process::exit(1);
    }
  }
}
