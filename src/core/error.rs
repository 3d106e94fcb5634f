use thiserror::Error;

use super::types::DocumentStage;

/// Errors that can occur while turning NF-e documents into GNRE guides.
///
/// Every variant except [`GnreError::Config`] and [`GnreError::Io`] is scoped
/// to a single input document and is recorded by the batch aggregator
/// instead of aborting the batch.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum GnreError {
    /// The input is not well-formed XML or could not be read as text.
    #[error("XML parse error: {0}")]
    Parse(String),

    /// A mandatory field is absent from the invoice.
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// Neither the totals block nor the line items carry a positive amount.
    #[error("no positive ICMS-ST or DIFAL amount found")]
    NoPositiveValue,

    /// A monetary field in the totals block is not a decimal number, or the
    /// item amounts for a field overflow when summed.
    #[error("invalid amount in {field}: '{value}'")]
    InvalidAmount {
        /// Local tag name of the offending element (e.g. "vST").
        field: &'static str,
        /// Raw text content of the element.
        value: String,
    },

    /// Adding this document's guide would overflow the batch total.
    #[error("batch total overflows when adding {0}")]
    TotalOverflow(rust_decimal::Decimal),

    /// Shared batch parameters are invalid.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// XML generation error.
    #[error("XML write error: {0}")]
    Xml(String),

    /// Filesystem error outside of a single document (listing inputs, writing the lot).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl GnreError {
    /// Last processing stage a document reached before failing with this error.
    ///
    /// `None` means the document never parsed.
    pub fn last_stage(&self) -> Option<DocumentStage> {
        match self {
            Self::Parse(_) | Self::Config(_) | Self::Io(_) => None,
            Self::MissingField(_) => Some(DocumentStage::Parsed),
            Self::InvalidAmount { .. } | Self::NoPositiveValue => {
                Some(DocumentStage::FieldsExtracted)
            }
            Self::Xml(_) => Some(DocumentStage::ValueResolved),
            Self::TotalOverflow(_) => Some(DocumentStage::Composed),
        }
    }
}
