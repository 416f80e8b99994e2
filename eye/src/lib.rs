mod image;
pub use image::*;
pub mod cards;
pub mod classify;
mod error;
pub use error::{ExtractError, Result};
pub mod ocr;

pub mod table;

use layout::{Banks, LayoutProfile};

use crate::ocr::TextRead;
use crate::table::extract::TableExtractor;
use crate::table::message::{self, SnapshotMessage};
use crate::table::state::TableSnapshot;

/// The extraction engine: calibration profile, reference banks and a text
/// reader, wired into a reusable facade.
///
/// One `snapshot` call is one screenshot; the call owns all of its working
/// state, so a single `Extractor` can serve sequential extractions but a
/// call's results must not be shared with a concurrent call.
pub struct Extractor {
	profile: LayoutProfile,
	banks: Banks,
	ocr: Box<dyn TextRead>,
}

impl Extractor {
	/// Build an extractor, validating the banks against their label tables.
	pub fn try_new(profile: LayoutProfile, banks: Banks, ocr: Box<dyn TextRead>) -> Result<Self> {
		table::extract::validate_banks(&banks)?;
		Ok(Self {
			profile,
			banks,
			ocr,
		})
	}

	/// Extract the symbolic table state from one screenshot.
	pub fn snapshot(&self, shot: &OwnedImage) -> Result<TableSnapshot> {
		let extractor = TableExtractor::new(&self.profile, &self.banks, self.ocr.as_ref())?;
		extractor.snapshot(shot.as_image())
	}

	/// Extract and render into the structured message blocks.
	pub fn snapshot_message(&self, shot: &OwnedImage) -> Result<SnapshotMessage> {
		Ok(message::render(&self.snapshot(shot)?))
	}
}
