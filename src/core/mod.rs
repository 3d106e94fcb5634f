//! Core record types, errors, and field sanitizers.
//!
//! Everything here is independent of XML parsing and generation; the
//! `nfe` and `gnre` modules build on these types.

mod error;
pub mod sanitize;
mod types;

pub use error::*;
pub use sanitize::{digits_only, municipality_code, state_code, state_registration};
pub use types::*;
