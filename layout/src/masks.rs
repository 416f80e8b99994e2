//! Reference mask bank: the glyph templates the card recognizer matches
//! against.
//!
//! Each bank is an ordered set of same-sized boolean bitmaps with a parallel
//! index→label table. Banks are plain files (one PNG per template, any
//! nonzero luma = set bit) loaded once and read-only afterwards; nothing here
//! runs at import time.

use std::path::Path;
use std::sync::OnceLock;

use anyhow::{Context, Result, bail};

/// Rank labels in bank index order.
pub const RANK_LABELS: [&str; 13] = [
    "A", "2", "3", "4", "5", "6", "7", "8", "9", "10", "J", "Q", "K",
];

/// Suit labels in bank index order.
pub const SUIT_LABELS: [&str; 4] = ["♦", "♠", "♣", "♥"];

/// A 2D boolean bitmap (row-major).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmap {
    width: u32,
    height: u32,
    bits: Vec<bool>,
}

impl Bitmap {
    /// Build a bitmap from row-major bits. `bits.len()` must equal
    /// `width * height`.
    pub fn new(width: u32, height: u32, bits: Vec<bool>) -> Result<Self> {
        if bits.len() != (width as usize) * (height as usize) {
            bail!(
                "bitmap data length {} does not match {}x{}",
                bits.len(),
                width,
                height
            );
        }
        Ok(Self {
            width,
            height,
            bits,
        })
    }

    /// Decode a PNG into a bitmap: any pixel with luma above 127 is set.
    pub fn from_png(bytes: &[u8]) -> Result<Self> {
        let img = image::load_from_memory(bytes)
            .context("decode template png")?
            .to_luma8();
        let (width, height) = img.dimensions();
        let bits = img.pixels().map(|p| p.0[0] > 127).collect();
        Self::new(width, height, bits)
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn get(&self, x: u32, y: u32) -> bool {
        self.bits[(x + y * self.width) as usize]
    }

    #[inline]
    pub fn bits(&self) -> &[bool] {
        &self.bits
    }
}

/// An ordered collection of same-sized templates with their labels.
#[derive(Debug, Clone)]
pub struct MaskBank {
    width: u32,
    height: u32,
    masks: Vec<Bitmap>,
    labels: Vec<String>,
}

impl MaskBank {
    /// Build a bank, validating that it is non-empty, that every bitmap has
    /// identical dimensions, and that labels and masks line up 1:1.
    pub fn new(masks: Vec<Bitmap>, labels: Vec<String>) -> Result<Self> {
        if masks.is_empty() {
            bail!("mask bank must contain at least one template");
        }
        if masks.len() != labels.len() {
            bail!(
                "mask bank has {} templates but {} labels",
                masks.len(),
                labels.len()
            );
        }
        let width = masks[0].width();
        let height = masks[0].height();
        for (i, m) in masks.iter().enumerate() {
            if m.width() != width || m.height() != height {
                bail!(
                    "template {} is {}x{}, expected {}x{}",
                    i,
                    m.width(),
                    m.height(),
                    width,
                    height
                );
            }
        }
        Ok(Self {
            width,
            height,
            masks,
            labels,
        })
    }

    /// Load `{prefix}_00.png .. {prefix}_NN.png` from `dir`, one file per
    /// label, in index order.
    pub fn from_dir(dir: impl AsRef<Path>, prefix: &str, labels: &[&str]) -> Result<Self> {
        let dir = dir.as_ref();
        let mut masks = Vec::with_capacity(labels.len());
        for i in 0..labels.len() {
            let path = dir.join(format!("{prefix}_{i:02}.png"));
            let bytes =
                std::fs::read(&path).with_context(|| format!("read {}", path.display()))?;
            let mask =
                Bitmap::from_png(&bytes).with_context(|| format!("load {}", path.display()))?;
            masks.push(mask);
        }
        Self::new(masks, labels.iter().map(|s| s.to_string()).collect())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.masks.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.masks.is_empty()
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn mask(&self, index: usize) -> &Bitmap {
        &self.masks[index]
    }

    #[inline]
    pub fn label(&self, index: usize) -> &str {
        &self.labels[index]
    }
}

/// The two banks the card recognizer needs.
#[derive(Debug, Clone)]
pub struct Banks {
    pub ranks: MaskBank,
    pub suits: MaskBank,
}

impl Banks {
    /// Load `rank_00..rank_12.png` and `suit_00..suit_03.png` from `dir`.
    pub fn load(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        Ok(Self {
            ranks: MaskBank::from_dir(dir, "rank", &RANK_LABELS).context("rank bank")?,
            suits: MaskBank::from_dir(dir, "suit", &SUIT_LABELS).context("suit bank")?,
        })
    }

    /// Load the process-wide banks exactly once; later calls return the same
    /// instance regardless of `dir`.
    pub fn global(dir: impl AsRef<Path>) -> Result<&'static Self> {
        static BANKS: OnceLock<Banks> = OnceLock::new();
        if let Some(banks) = BANKS.get() {
            return Ok(banks);
        }
        let loaded = Self::load(dir)?;
        Ok(BANKS.get_or_init(|| loaded))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bitmap(width: u32, height: u32, set: &[(u32, u32)]) -> Bitmap {
        let mut bits = vec![false; (width * height) as usize];
        for &(x, y) in set {
            bits[(x + y * width) as usize] = true;
        }
        Bitmap::new(width, height, bits).unwrap()
    }

    #[test]
    fn bank_rejects_mixed_dimensions() {
        let masks = vec![bitmap(4, 4, &[]), bitmap(4, 5, &[])];
        let labels = vec!["a".to_string(), "b".to_string()];
        assert!(MaskBank::new(masks, labels).is_err());
    }

    #[test]
    fn bank_rejects_label_mismatch() {
        let masks = vec![bitmap(4, 4, &[])];
        assert!(MaskBank::new(masks, vec![]).is_err());
    }

    #[test]
    fn bank_rejects_empty() {
        assert!(MaskBank::new(vec![], vec![]).is_err());
    }

    #[test]
    fn bitmap_indexing_is_row_major() {
        let b = bitmap(3, 2, &[(2, 0), (0, 1)]);
        assert!(b.get(2, 0));
        assert!(b.get(0, 1));
        assert!(!b.get(1, 1));
    }

    #[test]
    fn label_tables_have_expected_sizes() {
        assert_eq!(RANK_LABELS.len(), 13);
        assert_eq!(SUIT_LABELS.len(), 4);
        assert_eq!(RANK_LABELS[9], "10");
        assert_eq!(SUIT_LABELS[0], "♦");
    }
}
