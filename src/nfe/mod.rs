//! NF-e reading: namespace-agnostic tag lookup, field extraction and
//! payable-value resolution.
//!
//! Issuer systems declare the NF-e namespace inconsistently (default
//! namespace, prefixed, or none at all), so every lookup here compares
//! local element names only.
//!
//! # Example
//!
//! ```no_run
//! use gnre_batch::nfe;
//!
//! let xml = std::fs::read_to_string("35240612345678000195550010000012341000012345-nfe.xml").unwrap();
//! let record = nfe::extract_invoice(&xml).unwrap();
//! println!("{} -> {}", record.access_key, record.payable.amount);
//! ```

mod extract;
pub mod resolver;
mod value;

pub use extract::{extract_from_document, extract_invoice};
pub use value::resolve_payable;

/// NF-e 4.00 namespace, for reference; lookups never depend on it.
pub const NFE_NAMESPACE: &str = "http://www.portalfiscal.inf.br/nfe";
