//! Static calibration data for the table-state extractor.
//!
//! Two kinds of data live here, both fixed for one table skin/resolution:
//!
//! - the layout profile: pixel rectangles and color/threshold calibration,
//!   serialized as versioned JSON so a new skin is a new profile file, not a
//!   code change;
//! - the reference mask bank: boolean glyph templates (13 ranks, 4 suits)
//!   the card recognizer matches against.

mod masks;
mod profile;

pub use masks::{Banks, Bitmap, MaskBank, RANK_LABELS, SUIT_LABELS};
pub use profile::{BandSpec, ColorBand, LayoutProfile, OutlineSpec, Rect};

/// Number of seats in the fixed layout. Seat 0 is the hero.
pub const SEATS: usize = 5;

/// Community card slots (flop + turn + river).
pub const BOARD_SLOTS: usize = 5;
