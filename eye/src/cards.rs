//! Card recognition: glyph crops → rank/suit labels.
//!
//! The pipeline per crop is preprocessing (corner masking for ranks, ink
//! thresholding for both) followed by nearest-template matching against the
//! reference bank, scored by XOR pixel mismatch. Rank and suit are
//! recognized independently; a card label is just their concatenation.

use layout::{Banks, Bitmap, MaskBank};

use crate::error::{ExtractError, Result};
use crate::image::{Color, Image, OwnedImage};

/// A recognized card: bank rank label plus bank suit label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardLabel {
    pub rank: String,
    pub suit: String,
}

impl std::fmt::Display for CardLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.rank, self.suit)
    }
}

/// Zero out the top-left triangular wedge of the crop.
///
/// The table skin overlays a UI element on the corner of the rank glyph; the
/// wedge varies between cards and would dominate the mismatch score if left
/// in. `strength` is the fraction of each dimension covered by the wedge.
pub fn apply_corner_mask(img: &mut OwnedImage, strength: f32) {
    let max_x = (img.width() as f32 * strength).round() as u32;
    let max_y = (img.height() as f32 * strength).round() as u32;
    if max_y == 0 {
        return;
    }

    for y in 0..max_y.min(img.height()) {
        let x_limit = max_x - ((max_x as f32 / max_y as f32) * y as f32) as u32;
        for x in 0..x_limit.min(img.width()) {
            img.set(x, y, Color::BLACK);
        }
    }
}

/// Threshold a crop into a binary ink mask.
///
/// A pixel is ink iff the sum of its channels exceeds `threshold`; summation
/// rather than luma keeps parity with the thresholds the banks were built
/// with.
pub fn ink_mask(img: &OwnedImage, threshold: u16) -> Bitmap {
    let mut bits = Vec::with_capacity((img.width() * img.height()) as usize);
    for y in 0..img.height() {
        for x in 0..img.width() {
            bits.push(img.get(x, y).channel_sum() > threshold);
        }
    }
    Bitmap::new(img.width(), img.height(), bits).expect("bitmap sized from its own image")
}

/// Render a mask back to an image (ink white on black). Lets the ink
/// thresholding be re-applied to its own output.
pub fn mask_to_image(mask: &Bitmap) -> OwnedImage {
    let mut img = OwnedImage::filled(mask.width(), mask.height(), Color::BLACK);
    for y in 0..mask.height() {
        for x in 0..mask.width() {
            if mask.get(x, y) {
                img.set(x, y, Color::WHITE);
            }
        }
    }
    img
}

/// Index of the bank template with the fewest mismatched pixels.
///
/// Ties break toward the lowest index. Errors if the input mask and the bank
/// disagree on dimensions (profile/bank calibration mismatch).
pub fn best_match(input: &Bitmap, bank: &MaskBank, bank_name: &'static str) -> Result<usize> {
    if input.width() != bank.width() || input.height() != bank.height() {
        return Err(ExtractError::BankShapeMismatch {
            bank: bank_name,
            got_w: input.width(),
            got_h: input.height(),
            want_w: bank.width(),
            want_h: bank.height(),
        });
    }

    let mut best = 0usize;
    let mut best_score = usize::MAX;
    for i in 0..bank.len() {
        let score = mismatch_count(input, bank.mask(i));
        if score < best_score {
            best_score = score;
            best = i;
        }
    }
    Ok(best)
}

fn mismatch_count(a: &Bitmap, b: &Bitmap) -> usize {
    a.bits()
        .iter()
        .zip(b.bits())
        .filter(|(x, y)| x != y)
        .count()
}

/// Recognizes rank and suit crops against the reference banks.
pub struct CardReader<'a> {
    banks: &'a Banks,
    rank_threshold: u16,
    suit_threshold: u16,
    corner_strength: f32,
}

impl<'a> CardReader<'a> {
    pub fn new(banks: &'a Banks, profile: &layout::LayoutProfile) -> Self {
        Self {
            banks,
            rank_threshold: profile.rank_ink_threshold,
            suit_threshold: profile.suit_ink_threshold,
            corner_strength: profile.corner_mask_strength,
        }
    }

    /// Recognize a rank glyph crop.
    pub fn rank(&self, crop: Image<'_>) -> Result<String> {
        let mut img = crop.to_owned_image();
        apply_corner_mask(&mut img, self.corner_strength);
        let mask = ink_mask(&img, self.rank_threshold);
        let index = best_match(&mask, &self.banks.ranks, "rank")?;
        Ok(self.banks.ranks.label(index).to_string())
    }

    /// Recognize a suit glyph crop. No corner masking: the overlay never
    /// reaches the suit area.
    pub fn suit(&self, crop: Image<'_>) -> Result<String> {
        let mask = ink_mask(&crop.to_owned_image(), self.suit_threshold);
        let index = best_match(&mask, &self.banks.suits, "suit")?;
        Ok(self.banks.suits.label(index).to_string())
    }

    /// Assemble a card from independently recognized rank and suit crops.
    pub fn card(&self, rank_crop: Image<'_>, suit_crop: Image<'_>) -> Result<CardLabel> {
        Ok(CardLabel {
            rank: self.rank(rank_crop)?,
            suit: self.suit(suit_crop)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bitmap_from(rows: &[&[u8]]) -> Bitmap {
        let height = rows.len() as u32;
        let width = rows[0].len() as u32;
        let bits = rows.iter().flat_map(|r| r.iter().map(|&v| v != 0)).collect();
        Bitmap::new(width, height, bits).unwrap()
    }

    #[test]
    fn corner_mask_zeroes_exactly_the_wedge() {
        let mut img = OwnedImage::filled(10, 10, Color::WHITE);
        apply_corner_mask(&mut img, 0.3);

        // strength 0.3 on 10x10: max_x = max_y = 3.
        // Row y zeroes columns [0, 3 - y).
        let mut expected_black = Vec::new();
        for y in 0..3u32 {
            for x in 0..(3 - y) {
                expected_black.push((x, y));
            }
        }

        assert_eq!(img.width(), 10);
        assert_eq!(img.height(), 10);
        for y in 0..10 {
            for x in 0..10 {
                let want = if expected_black.contains(&(x, y)) {
                    Color::BLACK
                } else {
                    Color::WHITE
                };
                assert_eq!(img.get(x, y), want, "pixel ({x},{y})");
            }
        }
    }

    #[test]
    fn corner_mask_is_a_noop_for_tiny_strength() {
        let mut img = OwnedImage::filled(4, 4, Color::WHITE);
        apply_corner_mask(&mut img, 0.05);
        for y in 0..4 {
            for x in 0..4 {
                assert_eq!(img.get(x, y), Color::WHITE);
            }
        }
    }

    #[test]
    fn ink_mask_is_idempotent_on_its_own_output() {
        let mut img = OwnedImage::filled(6, 4, Color::new(90, 90, 90));
        img.set(1, 1, Color::new(250, 250, 250));
        img.set(4, 2, Color::new(120, 130, 10));

        for threshold in [200u16, 240] {
            let mask = ink_mask(&img, threshold);
            let again = ink_mask(&mask_to_image(&mask), threshold);
            assert_eq!(again, mask, "threshold {threshold}");
        }
    }

    #[test]
    fn best_match_returns_identical_entry() {
        let a = bitmap_from(&[&[1, 0], &[0, 1]]);
        let b = bitmap_from(&[&[1, 1], &[1, 1]]);
        let c = bitmap_from(&[&[0, 0], &[0, 1]]);
        let bank = MaskBank::new(
            vec![a.clone(), b, c.clone()],
            vec!["a".into(), "b".into(), "c".into()],
        )
        .unwrap();

        assert_eq!(best_match(&c, &bank, "rank").unwrap(), 2);
        assert_eq!(best_match(&a, &bank, "rank").unwrap(), 0);
    }

    #[test]
    fn best_match_ties_break_to_lowest_index() {
        let dup = bitmap_from(&[&[1, 0], &[0, 1]]);
        let bank = MaskBank::new(
            vec![dup.clone(), bitmap_from(&[&[0, 0], &[0, 0]]), dup.clone()],
            vec!["first".into(), "mid".into(), "dup".into()],
        )
        .unwrap();

        // Identical to entries 0 and 2; the stable argmin picks 0.
        assert_eq!(best_match(&dup, &bank, "rank").unwrap(), 0);
    }

    #[test]
    fn best_match_rejects_shape_mismatch() {
        let bank = MaskBank::new(vec![bitmap_from(&[&[1, 0], &[0, 1]])], vec!["a".into()]).unwrap();
        let wide = bitmap_from(&[&[1, 0, 0], &[0, 1, 0]]);
        assert!(matches!(
            best_match(&wide, &bank, "rank"),
            Err(crate::error::ExtractError::BankShapeMismatch { .. })
        ));
    }

    #[test]
    fn card_label_concatenates_rank_and_suit() {
        let card = CardLabel {
            rank: "10".into(),
            suit: "♠".into(),
        };
        assert_eq!(card.to_string(), "10♠");
    }
}
