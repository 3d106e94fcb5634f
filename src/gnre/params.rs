use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::origin::OriginPolicy;
use crate::core::GnreError;

/// Default GNRE revenue code (`receita`).
pub const DEFAULT_RECEIPT_CODE: &str = "100102";
/// Default product code.
pub const DEFAULT_PRODUCT_CODE: &str = "88";

const XML_RESERVED: [char; 5] = ['&', '<', '>', '"', '\''];

/// Parameters shared by every guide in a batch.
///
/// Codes are written to the XML verbatim, so construction goes through
/// [`GuideParamsBuilder`], which rejects values that would not stay
/// well-formed.
///
/// ```
/// use chrono::NaiveDate;
/// use gnre_batch::gnre::{GuideParams, OriginPolicy};
///
/// let params = GuideParams::builder(NaiveDate::from_ymd_opt(2024, 7, 10).unwrap())
///     .receipt_code("100099")
///     .origin(OriginPolicy::ACCESS_KEY)
///     .build()
///     .unwrap();
/// assert_eq!(params.product_code(), "88");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuideParams {
    receipt_code: String,
    product_code: String,
    due_date: NaiveDate,
    origin: OriginPolicy,
}

impl GuideParams {
    /// Defaults for everything except the due date.
    pub fn new(due_date: NaiveDate) -> Self {
        Self {
            receipt_code: DEFAULT_RECEIPT_CODE.to_string(),
            product_code: DEFAULT_PRODUCT_CODE.to_string(),
            due_date,
            origin: OriginPolicy::default(),
        }
    }

    pub fn builder(due_date: NaiveDate) -> GuideParamsBuilder {
        GuideParamsBuilder {
            params: Self::new(due_date),
        }
    }

    /// `<receita>`.
    pub fn receipt_code(&self) -> &str {
        &self.receipt_code
    }

    /// `<produto>`.
    pub fn product_code(&self) -> &str {
        &self.product_code
    }

    /// `<dataVencimento>` and `<dataPagamento>`; also the reference month.
    pub fn due_date(&self) -> NaiveDate {
        self.due_date
    }

    pub fn origin(&self) -> OriginPolicy {
        self.origin
    }
}

/// Builder for [`GuideParams`].
#[derive(Debug, Clone)]
pub struct GuideParamsBuilder {
    params: GuideParams,
}

impl GuideParamsBuilder {
    pub fn receipt_code(mut self, code: impl Into<String>) -> Self {
        self.params.receipt_code = code.into().trim().to_string();
        self
    }

    pub fn product_code(mut self, code: impl Into<String>) -> Self {
        self.params.product_code = code.into().trim().to_string();
        self
    }

    pub fn origin(mut self, origin: OriginPolicy) -> Self {
        self.params.origin = origin;
        self
    }

    pub fn build(self) -> Result<GuideParams, GnreError> {
        check_code("receipt code", &self.params.receipt_code)?;
        check_code("product code", &self.params.product_code)?;
        Ok(self.params)
    }
}

fn check_code(label: &str, code: &str) -> Result<(), GnreError> {
    if code.is_empty() {
        return Err(GnreError::Config(format!("{label} must not be empty")));
    }
    if code.contains(XML_RESERVED) {
        return Err(GnreError::Config(format!(
            "{label} '{code}' contains XML-reserved characters"
        )));
    }
    Ok(())
}
