use rust_decimal::{Decimal, RoundingStrategy};
use roxmltree::Node;
use std::str::FromStr;
use tracing::{debug, warn};

use super::resolver::{child_text, descendants_named, element_text};
use crate::core::{GnreError, ResolvedValue, ValueSource};

/// Totals block holding the document-level ICMS amounts.
const TOTALS_BLOCK: &str = "ICMSTot";
/// ICMS-ST total inside `ICMSTot`.
const TOTAL_SUBSTITUTION: &str = "vST";
/// ICMS-ST per item, inside `det/imposto/ICMS/ICMSxx`.
const ITEM_SUBSTITUTION: &str = "vICMSST";
/// DIFAL owed to the destination state; same name at both levels.
const DIFFERENTIAL: &str = "vICMSUFDest";
/// One invoice line.
const ITEM: &str = "det";

/// Decide which amount the guide collects.
///
/// Priority, first amount that is positive once rounded to cents wins:
/// 1. `ICMSTot/vST`, then `ICMSTot/vICMSUFDest`;
/// 2. the sum of item `vICMSST`, then the sum of item `vICMSUFDest`.
///
/// The totals block is authoritative when non-zero since it already carries
/// the issuer's rounding. Returns `Ok(None)` when nothing is positive.
///
/// A malformed amount in the totals block fails the document; a malformed
/// item amount is skipped. Item amounts whose sum overflows fail the document.
pub fn resolve_payable(root: Node<'_, '_>) -> Result<Option<ResolvedValue>, GnreError> {
    if let Some(totals) = descendants_named(root, TOTALS_BLOCK).next() {
        let substitution = totals_amount(totals, TOTAL_SUBSTITUTION)?;
        let differential = totals_amount(totals, DIFFERENTIAL)?;
        debug!(%substitution, %differential, "totals block");
        if let Some(v) = first_positive(
            (substitution, ValueSource::TotalsSubstitution),
            (differential, ValueSource::TotalsDifferential),
        ) {
            return Ok(Some(v));
        }
    }

    let mut scopes: Vec<Node<'_, '_>> = descendants_named(root, ITEM).collect();
    if scopes.is_empty() {
        scopes.push(root);
    }
    let substitution = sum_items(&scopes, ITEM_SUBSTITUTION)?;
    let differential = sum_items(&scopes, DIFFERENTIAL)?;
    debug!(items = scopes.len(), %substitution, %differential, "item fallback");

    Ok(first_positive(
        (substitution, ValueSource::ItemSubstitution),
        (differential, ValueSource::ItemDifferential),
    ))
}

fn first_positive(
    preferred: (Decimal, ValueSource),
    fallback: (Decimal, ValueSource),
) -> Option<ResolvedValue> {
    [preferred, fallback]
        .into_iter()
        .find(|(amount, _)| is_payable(*amount))
        .map(|(amount, source)| ResolvedValue { amount, source })
}

/// Sub-cent amounts round to `0.00` and cannot be collected.
fn is_payable(amount: Decimal) -> bool {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero) > Decimal::ZERO
}

fn parse_amount(text: &str) -> Option<Decimal> {
    Decimal::from_str(text).ok()
}

fn totals_amount(totals: Node<'_, '_>, field: &'static str) -> Result<Decimal, GnreError> {
    match child_text(totals, field) {
        None => Ok(Decimal::ZERO),
        Some(text) => parse_amount(text).ok_or_else(|| GnreError::InvalidAmount {
            field,
            value: text.to_string(),
        }),
    }
}

fn sum_items(scopes: &[Node<'_, '_>], field: &'static str) -> Result<Decimal, GnreError> {
    let mut total = Decimal::ZERO;
    for text in scopes
        .iter()
        .flat_map(|scope| descendants_named(*scope, field))
        .filter_map(element_text)
    {
        let Some(amount) = parse_amount(text) else {
            warn!(field, value = text, "skipping malformed item amount");
            continue;
        };
        total = total.checked_add(amount).ok_or_else(|| GnreError::InvalidAmount {
            field,
            value: text.to_string(),
        })?;
    }
    Ok(total)
}
