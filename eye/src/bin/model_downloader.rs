//! Fetches the OCR model files into a local `models/` directory.
//!
//! The extractor itself never touches the network; run this once before
//! first use (or drop your own model files into place).

use std::fs;
use std::io;
use std::path::Path;

use anyhow::{Context, Result};

const MODELS: &[(&str, &str)] = &[
    (
        "detection.onnx",
        "https://github.com/RapidAI/RapidOCR/releases/download/v1.1.0/ch_PP-OCRv3_det_infer.onnx",
    ),
    (
        "recognition.onnx",
        "https://github.com/RapidAI/RapidOCR/releases/download/v1.1.0/en_PP-OCRv3_rec_infer.onnx",
    ),
    (
        "charset.txt",
        "https://raw.githubusercontent.com/RapidAI/RapidOCR/v1.1.0/python/rapidocr_onnxruntime/models/en_dict.txt",
    ),
];

fn main() -> Result<()> {
    let dir = std::env::args().nth(1).unwrap_or_else(|| "models".to_string());
    let dir = Path::new(&dir);
    fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;

    for (name, url) in MODELS {
        let target = dir.join(name);
        if target.exists() {
            println!("{} already present, skipping", target.display());
            continue;
        }

        println!("downloading {name} ...");
        let response = ureq::get(url).call().with_context(|| format!("GET {url}"))?;
        let mut reader = response.into_reader();

        let tmp = target.with_extension("part");
        let mut file = fs::File::create(&tmp).with_context(|| format!("create {}", tmp.display()))?;
        io::copy(&mut reader, &mut file).with_context(|| format!("write {}", tmp.display()))?;
        fs::rename(&tmp, &target).with_context(|| format!("persist {}", target.display()))?;

        println!("saved {}", target.display());
    }

    Ok(())
}
