//! # gnre-batch
//!
//! Builds GNRE 2.00 tax-collection lots (`TLote_GNRE`) from Brazilian NF-e
//! invoice XML: one guide per invoice, carrying the ICMS-ST or DIFAL amount
//! owed to the destination state.
//!
//! All monetary values use [`rust_decimal::Decimal`], never floating point.
//!
//! ## Quick Start
//!
//! ```rust
//! use chrono::NaiveDate;
//! use gnre_batch::gnre::{BatchInput, GuideParams, process_batch};
//!
//! let nfe = r#"<nfeProc xmlns="http://www.portalfiscal.inf.br/nfe">
//!   <NFe><infNFe>
//!     <ide><nNF>42</nNF></ide>
//!     <emit><CNPJ>12345678000195</CNPJ><xNome>ACME Ltda</xNome></emit>
//!     <dest><CNPJ>11222333000181</CNPJ><xNome>Cliente SA</xNome>
//!       <enderDest><cMun>3106200</cMun><UF>MG</UF></enderDest></dest>
//!     <total><ICMSTot><vST>87.30</vST></ICMSTot></total>
//!   </infNFe></NFe>
//!   <protNFe><infProt><chNFe>35240612345678000195550010000000421000000420</chNFe></infProt></protNFe>
//! </nfeProc>"#;
//!
//! let params = GuideParams::new(NaiveDate::from_ymd_opt(2024, 7, 10).unwrap());
//! let result = process_batch(&[BatchInput::new("nota-42.xml", nfe)], &params);
//!
//! assert_eq!(result.total_formatted(), "87.30");
//! assert!(result.to_lot_xml().unwrap().contains("<ufFavorecida>MG</ufFavorecida>"));
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `core` (default) | Record types, errors, field sanitizers |
//! | `nfe` (default) | NF-e parsing, field extraction, value resolution |
//! | `gnre` (default) | Guide rendering and lot aggregation |
//! | `cli` | `gnre-batch` command-line tool |
//! | `all` | Everything |

#[cfg(feature = "core")]
pub mod core;

#[cfg(feature = "nfe")]
pub mod nfe;

#[cfg(feature = "gnre")]
pub mod gnre;

// Re-export core types at crate root for convenience
#[cfg(feature = "core")]
pub use crate::core::*;
