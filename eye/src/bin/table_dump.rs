//! One-shot extraction over a screenshot file.
//!
//! Prints the rendered message blocks as JSON; useful for checking a
//! calibration against saved hand screenshots.
//!
//! Usage: `table_dump <screenshot> <masks-dir> <models-dir> [profile.json]`

use std::fs;

use anyhow::{Context, Result};
use eye::ocr::PaddleOcr;
use eye::{Extractor, OwnedImage};
use layout::{Banks, LayoutProfile};

fn main() -> Result<()> {
    // Structured logging. Use `RUST_LOG=info` etc.
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let mut args = std::env::args().skip(1);
    let usage = "usage: table_dump <screenshot> <masks-dir> <models-dir> [profile.json]";
    let shot_path = args.next().context(usage)?;
    let masks_dir = args.next().context(usage)?;
    let models_dir = std::path::PathBuf::from(args.next().context(usage)?);

    let profile = match args.next() {
        Some(path) => LayoutProfile::load(path)?,
        None => LayoutProfile::default(),
    };

    let banks = Banks::load(&masks_dir)?;
    let ocr = PaddleOcr::try_new(
        models_dir.join("detection.onnx"),
        models_dir.join("recognition.onnx"),
        models_dir.join("charset.txt"),
    )?;

    let extractor = Extractor::try_new(profile, banks, Box::new(ocr))?;

    let bytes = fs::read(&shot_path).with_context(|| format!("read {shot_path}"))?;
    let shot = OwnedImage::decode(&bytes)?;

    let message = extractor.snapshot_message(&shot)?;
    println!("{}", serde_json::to_string_pretty(&message)?);

    Ok(())
}
