//! Property-based tests for sanitizers, value resolution and escaping.
//!
//! Run with: `cargo test --test proptest_tests`

#![cfg(feature = "gnre")]

use chrono::NaiveDate;
use gnre_batch::core::*;
use gnre_batch::gnre::*;
use gnre_batch::nfe;
use proptest::prelude::*;
use rust_decimal::Decimal;

// ── Strategies ──────────────────────────────────────────────────────────────

/// Amount in cents, 0.00 to 99999.99.
fn arb_amount() -> impl Strategy<Value = Decimal> {
    (0u64..10_000_000u64).prop_map(|cents| Decimal::new(cents as i64, 2))
}

fn arb_positive_amount() -> impl Strategy<Value = Decimal> {
    (1u64..10_000_000u64).prop_map(|cents| Decimal::new(cents as i64, 2))
}

fn nfe_with(totals_st: Decimal, totals_difal: Decimal, items: &[(Decimal, Decimal)], name: &str) -> String {
    let dets: String = items
        .iter()
        .enumerate()
        .map(|(i, (st, difal))| {
            format!(
                "<det nItem=\"{}\"><imposto><ICMS><ICMS10><vICMSST>{st}</vICMSST></ICMS10></ICMS>\
                 <ICMSUFDest><vICMSUFDest>{difal}</vICMSUFDest></ICMSUFDest></imposto></det>",
                i + 1
            )
        })
        .collect();
    format!(
        "<NFe xmlns=\"http://www.portalfiscal.inf.br/nfe\"><infNFe>\
         <ide><nNF>77</nNF></ide>\
         <emit><CNPJ>12345678000195</CNPJ><xNome>Emitente</xNome></emit>\
         <dest><CNPJ>11222333000181</CNPJ><xNome>{name}</xNome><enderDest><UF>BA</UF></enderDest></dest>\
         {dets}\
         <total><ICMSTot><vICMSUFDest>{totals_difal}</vICMSUFDest><vST>{totals_st}</vST></ICMSTot></total>\
         <chNFe>29240612345678000195550010000000771000000770</chNFe>\
         </infNFe></NFe>"
    )
}

fn escape_for_input(s: &str) -> String {
    s.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

proptest! {
    #[test]
    fn digits_only_yields_only_digits(s in ".*") {
        let d = digits_only(&s);
        prop_assert!(d.chars().all(|c| c.is_ascii_digit()));
        prop_assert_eq!(d.len(), s.chars().filter(|c| c.is_ascii_digit()).count());
    }

    #[test]
    fn municipality_code_is_suffix_of_digits(s in "[0-9./-]{0,12}") {
        let digits = digits_only(&s);
        let code = municipality_code(&s);
        prop_assert!(code.len() <= 5);
        prop_assert!(digits.ends_with(&code));
        if digits.len() < 5 {
            prop_assert_eq!(code, digits);
        }
    }

    #[test]
    fn positive_totals_substitution_always_wins(
        st in arb_positive_amount(),
        difal in arb_amount(),
        items in prop::collection::vec((arb_amount(), arb_amount()), 0..5),
    ) {
        let r = nfe::extract_invoice(&nfe_with(st, difal, &items, "X")).unwrap();
        prop_assert_eq!(r.payable.amount, st);
        prop_assert_eq!(r.payable.source, ValueSource::TotalsSubstitution);
    }

    #[test]
    fn zero_totals_use_item_sums(
        items in prop::collection::vec((arb_amount(), arb_amount()), 1..6),
    ) {
        let st_sum: Decimal = items.iter().map(|(st, _)| *st).sum();
        let difal_sum: Decimal = items.iter().map(|(_, d)| *d).sum();
        let result = nfe::extract_invoice(&nfe_with(Decimal::ZERO, Decimal::ZERO, &items, "X"));
        if st_sum > Decimal::ZERO {
            let r = result.unwrap();
            prop_assert_eq!(r.payable.amount, st_sum);
            prop_assert_eq!(r.payable.source, ValueSource::ItemSubstitution);
        } else if difal_sum > Decimal::ZERO {
            let r = result.unwrap();
            prop_assert_eq!(r.payable.amount, difal_sum);
            prop_assert_eq!(r.payable.source, ValueSource::ItemDifferential);
        } else {
            prop_assert!(matches!(result, Err(GnreError::NoPositiveValue)));
        }
    }

    #[test]
    fn any_recipient_name_stays_well_formed(name in "[ -~À-ú]{1,40}") {
        let xml = nfe_with(Decimal::ONE, Decimal::ZERO, &[], &escape_for_input(&name));
        let record = nfe::extract_invoice(&xml).unwrap();
        let params = GuideParams::new(NaiveDate::from_ymd_opt(2024, 1, 31).unwrap());
        let guide = compose_guide(&record, &params).unwrap();

        let doc = roxmltree::Document::parse(&guide.xml).unwrap();
        let rendered = doc
            .descendants()
            .filter(|n| n.has_tag_name("razaoSocial"))
            .nth(1)
            .and_then(|n| n.text())
            .unwrap_or_default();
        prop_assert_eq!(rendered, name.trim());
    }

    #[test]
    fn guides_never_carry_a_zero_value(thousandths in 0i64..50) {
        let amount = Decimal::new(thousandths, 3);
        let xml = nfe_with(amount, Decimal::ZERO, &[], "X");
        let params = GuideParams::new(NaiveDate::from_ymd_opt(2024, 1, 31).unwrap());
        let result = process_batch(&[BatchInput::new("a.xml", xml)], &params);
        if thousandths < 5 {
            prop_assert!(!result.has_guides());
        } else {
            prop_assert_eq!(result.fragments.len(), 1);
            prop_assert!(result.fragments[0].value > Decimal::ZERO);
            prop_assert!(!result.fragments[0].xml.contains(">0.00<"));
        }
    }

    #[test]
    fn running_total_is_sum_of_guide_values(
        amounts in prop::collection::vec(arb_positive_amount(), 0..8),
    ) {
        let inputs: Vec<BatchInput> = amounts
            .iter()
            .enumerate()
            .map(|(i, a)| BatchInput::new(format!("{i}.xml"), nfe_with(*a, Decimal::ZERO, &[], "X")))
            .collect();
        let params = GuideParams::new(NaiveDate::from_ymd_opt(2024, 1, 31).unwrap());
        let result = process_batch(&inputs, &params);
        let expected: Decimal = amounts.iter().sum();
        prop_assert_eq!(result.fragments.len(), amounts.len());
        prop_assert_eq!(result.running_total, expected);
    }
}
