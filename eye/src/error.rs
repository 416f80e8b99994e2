//! Extraction error taxonomy.
//!
//! Only one condition aborts a snapshot: the dealer button missing from all
//! five seat regions, which breaks the exactly-one-button UI invariant.
//! Everything else either degrades in place (logged warnings, `unknown`
//! moves) or is a configuration error surfaced before extraction runs.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractError {
    /// Fatal: no seat's button region fired. The snapshot is discarded.
    #[error("dealer button not found in any seat region")]
    DealerButtonNotFound,

    /// The text recognizer returned zero lines where a value was expected.
    /// The orchestrator handles this by substituting empty text.
    #[error("text recognition returned no lines for the {region} region")]
    RecognitionEmpty { region: &'static str },

    /// A glyph crop does not match the bank's template dimensions; the
    /// profile and the bank disagree about the calibration.
    #[error("{bank} crop is {got_w}x{got_h} but bank templates are {want_w}x{want_h}")]
    BankShapeMismatch {
        bank: &'static str,
        got_w: u32,
        got_h: u32,
        want_w: u32,
        want_h: u32,
    },

    /// A bank has the wrong number of templates for its label table.
    #[error("{bank} bank has {got} templates, expected {want}")]
    BankSizeMismatch {
        bank: &'static str,
        got: usize,
        want: usize,
    },

    /// The text-recognition backend itself failed.
    #[error("text recognition failed: {0}")]
    TextRead(#[source] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, ExtractError>;
