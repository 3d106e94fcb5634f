//! GNRE 2.00 lot generation.
//!
//! Turns extracted [`InvoiceRecord`](crate::core::InvoiceRecord)s into
//! `<TDadosGNRE>` guide fragments and wraps them in a `<TLote_GNRE>` lot.
//!
//! # Example
//!
//! ```no_run
//! use chrono::NaiveDate;
//! use gnre_batch::gnre::{BatchInput, GuideParams, process_batch};
//!
//! let params = GuideParams::new(NaiveDate::from_ymd_opt(2024, 7, 10).unwrap());
//! let inputs = vec![BatchInput::new("nota-1.xml", std::fs::read_to_string("nota-1.xml").unwrap())];
//! let result = process_batch(&inputs, &params);
//! if let Some(lot) = result.to_lot_xml() {
//!     std::fs::write("lote.xml", lot).unwrap();
//! }
//! for failure in &result.failures {
//!     eprintln!("{failure}");
//! }
//! ```

mod batch;
mod guide;
mod origin;
mod params;
pub(crate) mod xml_utils;

pub use batch::*;
pub use guide::{GuideFragment, compose_guide, compose_guide_with};
pub use origin::{OriginDocument, OriginPolicy, OriginReference, OriginValue};
pub use params::{DEFAULT_PRODUCT_CODE, DEFAULT_RECEIPT_CODE, GuideParams, GuideParamsBuilder};
pub use xml_utils::{escape_text, format_amount};

/// GNRE layout version, written to `versao` on the lot and on each guide.
pub const GNRE_VERSION: &str = "2.00";

/// GNRE namespace, declared once on `<TLote_GNRE>`.
pub const GNRE_NAMESPACE: &str = "http://www.gnre.pe.gov.br";

/// `<tipoGnre>`: 0 = simple guide, one item.
pub const GUIDE_TYPE: &str = "0";

/// `tipo` attribute of `<valor>`: 11 = principal amount.
pub const VALUE_TYPE: &str = "11";

/// Extra field code carrying the NF-e access key.
pub const ACCESS_KEY_EXTRA_FIELD: &str = "90";

/// Lot envelope opening: declaration, root element and `<guias>`.
pub const LOT_HEADER: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\" ?>\n\
<TLote_GNRE versao=\"2.00\" xmlns=\"http://www.gnre.pe.gov.br\">\n     <guias>\n";

/// Lot envelope closing.
pub const LOT_FOOTER: &str = "     </guias>\n</TLote_GNRE>";
