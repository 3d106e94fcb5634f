//! Origin-document tagging (`<documentoOrigem tipo="…">`).
//!
//! Receiving state systems disagree on which pair of document type and
//! reference value they accept (rejections 217 and 302). The default pairs
//! type 10 with the short invoice number; the full access key always travels
//! in extra field 90.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::core::{GnreError, InvoiceRecord};

/// Which invoice value is referenced by `<documentoOrigem>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OriginValue {
    /// `ide/nNF`.
    InvoiceNumber,
    /// `chNFe`.
    AccessKey,
}

/// The `tipo` attribute and value written to `<documentoOrigem>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OriginReference<'r> {
    pub type_code: String,
    pub value: &'r str,
}

/// Strategy choosing the origin-document reference for a guide.
///
/// [`OriginPolicy`] covers the table-driven cases; implement this trait for
/// anything that needs to look at the record itself.
pub trait OriginDocument {
    fn origin_reference<'r>(&self, record: &'r InvoiceRecord) -> OriginReference<'r>;
}

/// A (type code, value) pairing for `<documentoOrigem>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OriginPolicy {
    /// GNRE document type code, written zero-padded to two digits.
    pub type_code: u8,
    pub value: OriginValue,
}

impl OriginPolicy {
    /// Type 10 with the invoice number (default).
    pub const INVOICE_NUMBER: Self = Self {
        type_code: 10,
        value: OriginValue::InvoiceNumber,
    };

    /// Type 22 with the full access key, for states on the newer layout.
    pub const ACCESS_KEY: Self = Self {
        type_code: 22,
        value: OriginValue::AccessKey,
    };

    /// Type 18 with the invoice number, the older layout.
    pub const LEGACY_INVOICE_NUMBER: Self = Self {
        type_code: 18,
        value: OriginValue::InvoiceNumber,
    };

    pub const PRESETS: [(&'static str, Self); 3] = [
        ("numero", Self::INVOICE_NUMBER),
        ("chave", Self::ACCESS_KEY),
        ("legado", Self::LEGACY_INVOICE_NUMBER),
    ];

    pub fn new(type_code: u8, value: OriginValue) -> Self {
        Self { type_code, value }
    }
}

impl Default for OriginPolicy {
    fn default() -> Self {
        Self::INVOICE_NUMBER
    }
}

impl OriginDocument for OriginPolicy {
    fn origin_reference<'r>(&self, record: &'r InvoiceRecord) -> OriginReference<'r> {
        let value = match self.value {
            OriginValue::InvoiceNumber => record.invoice_number.as_str(),
            OriginValue::AccessKey => record.access_key.as_str(),
        };
        OriginReference {
            type_code: format!("{:02}", self.type_code),
            value,
        }
    }
}

impl FromStr for OriginValue {
    type Err = GnreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "numero" | "número" | "number" | "nnf" => Ok(Self::InvoiceNumber),
            "chave" | "key" | "chnfe" => Ok(Self::AccessKey),
            other => Err(GnreError::Config(format!(
                "unknown origin value '{other}' (expected numero or chave)"
            ))),
        }
    }
}

impl FromStr for OriginPolicy {
    type Err = GnreError;

    /// Accepts a preset name (`numero`, `chave`, `legado`) or an explicit
    /// `TYPE:VALUE` pair such as `24:chave`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Some((_, policy)) = Self::PRESETS
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(s))
        {
            return Ok(*policy);
        }
        let (code, value) = s.split_once(':').ok_or_else(|| {
            GnreError::Config(format!(
                "unknown origin policy '{s}' (expected numero, chave, legado or TYPE:VALUE)"
            ))
        })?;
        let type_code = code
            .trim()
            .parse::<u8>()
            .map_err(|e| GnreError::Config(format!("invalid origin type code '{code}': {e}")))?;
        Ok(Self::new(type_code, value.parse()?))
    }
}
