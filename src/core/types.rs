use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Issuer of the invoice (`emit`), the taxpayer paying the guide.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmitterRecord {
    /// `emit/CNPJ`, digits only.
    pub tax_id: String,
    /// `emit/xNome`.
    pub legal_name: String,
    /// `enderEmit/xLgr`.
    pub street_address: String,
    /// `enderEmit/nro`.
    pub address_number: String,
    /// `enderEmit/cMun`, last five digits.
    pub municipality_code: String,
    /// `enderEmit/UF`.
    pub state_code: String,
    /// `enderEmit/CEP`, digits only.
    pub postal_code: String,
    /// `enderEmit/fone`, digits only.
    pub phone: String,
}

impl EmitterRecord {
    /// Single-line address as written to `<endereco>`: "street, number".
    ///
    /// Missing parts are left out together with their separator.
    pub fn address_line(&self) -> String {
        match (self.street_address.is_empty(), self.address_number.is_empty()) {
            (false, false) => format!("{}, {}", self.street_address, self.address_number),
            (false, true) => self.street_address.clone(),
            (true, false) => self.address_number.clone(),
            (true, true) => String::new(),
        }
    }
}

/// Identifier of the invoice recipient. Exactly one kind is ever populated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value")]
pub enum RecipientDocument {
    /// Company registration (14 digits).
    Cnpj(String),
    /// Individual taxpayer registration (11 digits).
    Cpf(String),
}

impl RecipientDocument {
    /// Element name used inside `<identificacao>`.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Cnpj(_) => "CNPJ",
            Self::Cpf(_) => "CPF",
        }
    }

    /// The digits of the identifier.
    pub fn value(&self) -> &str {
        match self {
            Self::Cnpj(v) | Self::Cpf(v) => v,
        }
    }
}

/// Receiver of the goods (`dest`); its state is the one collecting the tax.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipientRecord {
    /// `dest/CNPJ` or, failing that, `dest/CPF`.
    pub document: RecipientDocument,
    /// `dest/xNome`.
    pub legal_name: String,
    /// `enderDest/cMun`, last five digits.
    pub municipality_code: String,
    /// `enderDest/UF`.
    pub state_code: String,
    /// `dest/IE`; `None` when absent or marked exempt (`ISENTO`).
    pub state_registration: Option<String>,
}

/// Which field of the invoice produced the payable amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValueSource {
    /// `ICMSTot/vST`.
    TotalsSubstitution,
    /// `ICMSTot/vICMSUFDest`.
    TotalsDifferential,
    /// Sum of `det//vICMSST`.
    ItemSubstitution,
    /// Sum of `det//vICMSUFDest`.
    ItemDifferential,
}

/// The amount payable for one invoice. Always strictly positive; a
/// deserialized value with a zero or negative amount is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "UncheckedValue")]
pub struct ResolvedValue {
    pub amount: Decimal,
    pub source: ValueSource,
}

#[derive(Deserialize)]
struct UncheckedValue {
    amount: Decimal,
    source: ValueSource,
}

impl TryFrom<UncheckedValue> for ResolvedValue {
    type Error = String;

    fn try_from(raw: UncheckedValue) -> Result<Self, Self::Error> {
        if raw.amount <= Decimal::ZERO {
            return Err(format!("payable amount must be positive, got {}", raw.amount));
        }
        Ok(Self {
            amount: raw.amount,
            source: raw.source,
        })
    }
}

/// Everything extracted from one NF-e that a guide needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceRecord {
    pub emitter: EmitterRecord,
    pub recipient: RecipientRecord,
    /// `chNFe`, the 44-digit access key.
    pub access_key: String,
    /// `ide/nNF`; `"0"` when absent.
    pub invoice_number: String,
    pub payable: ResolvedValue,
}

/// Per-document processing stages, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DocumentStage {
    Parsed,
    FieldsExtracted,
    ValueResolved,
    Composed,
    Succeeded,
}

impl std::fmt::Display for DocumentStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Parsed => "parsed",
            Self::FieldsExtracted => "fields extracted",
            Self::ValueResolved => "value resolved",
            Self::Composed => "composed",
            Self::Succeeded => "succeeded",
        };
        f.write_str(s)
    }
}
