//! Layout profile: the pixel calibration for one table skin.
//!
//! Stored as pretty JSON so a recalibration (new resolution, new skin) ships
//! as data. The `Default` impl carries the reference calibration this
//! project was tuned on; every rectangle and threshold in it assumes that
//! exact window geometry.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle in screenshot pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub left: u32,
    pub top: u32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub const fn new(left: u32, top: u32, width: u32, height: u32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Same rectangle moved right by `dx` pixels (slot layouts are a base
    /// rectangle plus a per-slot horizontal shift).
    pub const fn shifted(self, dx: u32) -> Self {
        Self {
            left: self.left + dx,
            top: self.top,
            width: self.width,
            height: self.height,
        }
    }
}

/// Inclusive RGB band. A pixel matches iff every channel falls inside its
/// `[lo, hi]` range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorBand {
    pub r: [u8; 2],
    pub g: [u8; 2],
    pub b: [u8; 2],
}

impl ColorBand {
    pub const fn new(r: [u8; 2], g: [u8; 2], b: [u8; 2]) -> Self {
        Self { r, g, b }
    }

    #[inline]
    pub fn contains(&self, r: u8, g: u8, b: u8) -> bool {
        (self.r[0]..=self.r[1]).contains(&r)
            && (self.g[0]..=self.g[1]).contains(&g)
            && (self.b[0]..=self.b[1]).contains(&b)
    }
}

/// A color band plus the minimum matching-pixel count that counts as a hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BandSpec {
    pub band: ColorBand,
    pub min_pixels: u32,
}

/// Calibration for the white-contour card-presence check.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OutlineSpec {
    /// Grayscale binarization level.
    pub intensity: u8,
    /// Minimum contour area that counts as a card.
    pub min_area: f64,
}

/// Full pixel calibration for one table layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutProfile {
    /// Bumped whenever the reference calibration changes shape or values.
    pub version: u32,

    // Per-seat regions, seat order (seat 0 = hero).
    pub stack_regions: [Rect; 5],
    pub bet_regions: [Rect; 5],
    /// Card backs exist only for seats 2-5; the hero's own cards are face up.
    pub card_back_regions: [Rect; 4],
    pub button_regions: [Rect; 5],

    pub pot_region: Rect,

    // Community card slots: base rectangle + per-slot horizontal shift.
    pub board_card_base: Rect,
    pub board_card_shift: u32,
    pub board_rank_base: Rect,
    pub board_rank_shift: u32,
    pub board_suit_base: Rect,
    pub board_suit_shift: u32,

    // Hero hole cards.
    pub hero_rank_base: Rect,
    pub hero_rank_shift: u32,
    pub hero_suit_base: Rect,
    pub hero_suit_shift: u32,

    // Color classifiers.
    pub stack_text: BandSpec,
    pub bet_text: BandSpec,
    pub all_in_text: BandSpec,
    pub card_back: BandSpec,
    pub dealer_button: BandSpec,
    pub card_outline: OutlineSpec,

    // Glyph ink thresholds, compared against the channel sum of a pixel.
    pub rank_ink_threshold: u16,
    pub suit_ink_threshold: u16,
    /// Fraction of the rank crop masked out at the top-left corner.
    pub corner_mask_strength: f32,
}

impl Default for LayoutProfile {
    fn default() -> Self {
        Self {
            version: 1,

            stack_regions: [
                // Seat 0 sits right of center so the crop skips the turn timer.
                Rect::new(793, 800, 273, 44),
                Rect::new(262, 637, 273, 44),
                Rect::new(452, 187, 273, 44),
                Rect::new(1080, 187, 273, 44),
                Rect::new(1278, 635, 273, 44),
            ],
            bet_regions: [
                Rect::new(807, 653, 190, 30),
                Rect::new(469, 575, 190, 30),
                Rect::new(611, 320, 190, 30),
                Rect::new(1009, 319, 190, 30),
                Rect::new(1159, 574, 190, 30),
            ],
            card_back_regions: [
                Rect::new(322, 522, 147, 86),
                Rect::new(516, 75, 149, 86),
                Rect::new(1144, 78, 149, 84),
                Rect::new(1341, 524, 146, 82),
            ],
            button_regions: [
                Rect::new(745, 653, 49, 46),
                Rect::new(452, 444, 49, 46),
                Rect::new(746, 235, 49, 46),
                Rect::new(1238, 272, 49, 46),
                Rect::new(1239, 615, 49, 46),
            ],

            pot_region: Rect::new(832, 555, 259, 30),

            board_card_base: Rect::new(618, 352, 112, 164),
            board_card_shift: 114,
            board_rank_base: Rect::new(622, 354, 36, 41),
            board_rank_shift: 114,
            board_suit_base: Rect::new(622, 407, 35, 31),
            board_suit_shift: 114,

            hero_rank_base: Rect::new(830, 689, 36, 41),
            hero_rank_shift: 43,
            hero_suit_base: Rect::new(830, 741, 35, 31),
            hero_suit_shift: 43,

            stack_text: BandSpec {
                band: ColorBand::new([200, 255], [150, 197], [0, 90]),
                min_pixels: 30,
            },
            bet_text: BandSpec {
                band: ColorBand::new([200, 255], [170, 240], [0, 100]),
                min_pixels: 30,
            },
            all_in_text: BandSpec {
                band: ColorBand::new([170, 255], [0, 60], [0, 60]),
                min_pixels: 40,
            },
            card_back: BandSpec {
                // Bright/dark red of the card backs, excluding the white border.
                band: ColorBand::new([200, 255], [25, 60], [25, 60]),
                min_pixels: 100,
            },
            dealer_button: BandSpec {
                band: ColorBand::new([200, 255], [130, 255], [0, 100]),
                min_pixels: 50,
            },
            card_outline: OutlineSpec {
                intensity: 240,
                min_area: 200.0,
            },

            rank_ink_threshold: 240,
            suit_ink_threshold: 200,
            corner_mask_strength: 0.3,
        }
    }
}

impl LayoutProfile {
    /// Load a profile from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
        let profile = serde_json::from_str(&json).with_context(|| format!("parse {}", path.display()))?;
        Ok(profile)
    }

    /// Save a profile as pretty JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(self).context("serialize profile")?;
        fs::write(path, json).with_context(|| format!("write {}", path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn band_bounds_are_inclusive() {
        let band = ColorBand::new([200, 255], [150, 197], [0, 90]);
        assert!(band.contains(200, 150, 0));
        assert!(band.contains(255, 197, 90));
        assert!(!band.contains(199, 150, 0));
        assert!(!band.contains(200, 198, 0));
        assert!(!band.contains(200, 150, 91));
    }

    #[test]
    fn profile_roundtrips_through_json() {
        let profile = LayoutProfile::default();
        let json = serde_json::to_string(&profile).unwrap();
        let back: LayoutProfile = serde_json::from_str(&json).unwrap();
        assert_eq!(back, profile);
    }

    #[test]
    fn slot_shift_moves_left_edge_only() {
        let base = Rect::new(618, 352, 112, 164);
        let slot3 = base.shifted(3 * 114);
        assert_eq!(slot3, Rect::new(618 + 342, 352, 112, 164));
    }
}
