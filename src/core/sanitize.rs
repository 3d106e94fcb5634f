//! Field sanitizers applied to raw NF-e text.
//!
//! These are filters, not parsers: malformed input degrades to an empty
//! string instead of an error.

/// Marker used in `IE` for recipients exempt from state registration.
pub const EXEMPT_MARKER: &str = "ISENTO";

/// Keep only the ASCII digits of `text`.
///
/// ```
/// use gnre_batch::core::digits_only;
///
/// assert_eq!(digits_only("12.345.678/0001-95"), "12345678000195");
/// assert_eq!(digits_only("n/a"), "");
/// ```
pub fn digits_only(text: &str) -> String {
    text.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Format an IBGE municipality code for GNRE.
///
/// After digit filtering, codes with five or more digits keep their last
/// five; shorter codes are kept as-is and never padded.
///
/// ```
/// use gnre_batch::core::municipality_code;
///
/// assert_eq!(municipality_code("3550308"), "50308");
/// assert_eq!(municipality_code("123"), "123");
/// ```
pub fn municipality_code(text: &str) -> String {
    let digits = digits_only(text);
    if digits.len() >= 5 {
        digits[digits.len() - 5..].to_string()
    } else {
        digits
    }
}

/// Normalize a state abbreviation (`UF`): ASCII letters only, upper-cased.
///
/// ```
/// use gnre_batch::core::state_code;
///
/// assert_eq!(state_code(" mg "), "MG");
/// ```
pub fn state_code(text: &str) -> String {
    text.chars()
        .filter(|c| c.is_ascii_alphabetic())
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

/// Normalize a recipient state registration (`IE`).
///
/// Returns `None` for exempt recipients and for values without digits.
pub fn state_registration(text: &str) -> Option<String> {
    if text.trim().to_uppercase() == EXEMPT_MARKER {
        return None;
    }
    let digits = digits_only(text);
    (!digits.is_empty()).then_some(digits)
}
