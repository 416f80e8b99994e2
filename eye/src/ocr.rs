//! Text recognition seam.
//!
//! The extractor only depends on the `TextRead` capability: hand it a crop,
//! get back the ordered recognized lines. The shipped implementation wraps
//! `ocr-rs` (Rust PaddleOCR bindings); tests substitute scripted readers.

use std::path::Path;
use std::sync::LazyLock;

use anyhow::{Context, Result};
use regex::Regex;

use crate::image::Image;

/// Minimum crop height handed to the engine; OCR generally performs better
/// on larger glyphs, and the value crops are under 50 px tall.
const MIN_H: u32 = 80;

static SPACE_RUNS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("regex"));

/// External text-recognition capability.
///
/// Contract assumed by the extractor: for stack/bet regions the first line
/// is the value; for the pot region two lines mean `[pot, pot_total]` and a
/// single line means `[pot]`. An empty result is a recognition miss, not an
/// error of the backend.
pub trait TextRead {
    fn read_lines(&self, crop: Image<'_>) -> Result<Vec<String>>;
}

/// PaddleOCR-backed reader.
pub struct PaddleOcr {
    engine: ocr_rs::OcrEngine,
}

impl PaddleOcr {
    /// Initialize the OCR engine with the given model paths.
    pub fn try_new(
        detection: impl AsRef<Path>,
        recognition: impl AsRef<Path>,
        charsset: impl AsRef<Path>,
    ) -> Result<Self> {
        let thread_count = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);

        let engine = ocr_rs::OcrEngine::new(
            detection,
            recognition,
            charsset,
            Some(ocr_rs::OcrEngineConfig {
                backend: ocr_rs::Backend::CPU,
                thread_count,
                // The value crops use a small stylized font; High costs CPU
                // but reads them reliably.
                precision_mode: ocr_rs::PrecisionMode::High,
                enable_parallel: thread_count > 1,
                min_result_confidence: 0.5,
                ..Default::default()
            }),
        )
        .context("failed to initialize OCR engine")?;

        Ok(Self { engine })
    }
}

impl TextRead for PaddleOcr {
    fn read_lines(&self, crop: Image<'_>) -> Result<Vec<String>> {
        // Upscale small crops before recognition.
        let mut owned = crop.to_owned_image();
        if owned.height() < MIN_H {
            owned = owned.resized_h(MIN_H);
        }

        let view = owned.as_image();
        let img = ocr_rs::preprocess::rgb_to_image(&view.get_bytes(), view.width(), view.height());

        let results = self
            .engine
            .recognize(&img)
            .context("recognize text crop")?;

        Ok(results
            .into_iter()
            .map(|v| normalize_line(&v.text))
            .filter(|line| !line.is_empty())
            .collect())
    }
}

/// Collapse whitespace runs and trim. Engines are inconsistent about spacing
/// around currency suffixes like `BB`.
fn normalize_line(raw: &str) -> String {
    SPACE_RUNS.replace_all(raw.trim(), " ").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_collapses_runs_and_trims() {
        assert_eq!(normalize_line("  12.5\tBB "), "12.5 BB");
        assert_eq!(normalize_line("\n\n"), "");
        assert_eq!(normalize_line("100"), "100");
    }
}
