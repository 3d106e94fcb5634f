#![cfg(feature = "nfe")]

//! Extraction and value resolution against realistic NF-e documents.

use gnre_batch::core::*;
use gnre_batch::nfe;
use rust_decimal_macros::dec;
use std::fs;
use std::path::{Path, PathBuf};

fn fixture(name: &str) -> String {
    let path: PathBuf = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name);
    fs::read_to_string(path).unwrap()
}

// ---------------------------------------------------------------------------
// ICMS-ST invoice, default namespace, authorized envelope
// ---------------------------------------------------------------------------

#[test]
fn st_invoice_emitter() {
    let r = nfe::extract_invoice(&fixture("nfe_st_totals.xml")).unwrap();
    assert_eq!(r.emitter.tax_id, "12345678000195");
    assert_eq!(r.emitter.legal_name, "Distribuidora Paulista de Autopecas Ltda");
    assert_eq!(r.emitter.address_line(), "Avenida Industrial, 1500");
    assert_eq!(r.emitter.municipality_code, "50308");
    assert_eq!(r.emitter.state_code, "SP");
    assert_eq!(r.emitter.postal_code, "04001000");
    assert_eq!(r.emitter.phone, "1133334444");
}

#[test]
fn st_invoice_recipient_and_keys() {
    let r = nfe::extract_invoice(&fixture("nfe_st_totals.xml")).unwrap();
    assert_eq!(
        r.recipient.document,
        RecipientDocument::Cnpj("11222333000181".into())
    );
    // Entities are decoded by the parser; escaping happens on output.
    assert_eq!(
        r.recipient.legal_name,
        "Pecas & Servicos Mineiros <Filial> \"Centro\""
    );
    assert_eq!(r.recipient.municipality_code, "06200");
    assert_eq!(r.recipient.state_code, "MG");
    assert_eq!(r.recipient.state_registration.as_deref(), Some("0623079040081"));
    assert_eq!(r.access_key, "35240612345678000195550010000012341000012345");
    assert_eq!(r.invoice_number, "1234");
}

#[test]
fn totals_block_is_authoritative_over_items() {
    // Items sum to 171.60, the totals block says 171.59.
    let r = nfe::extract_invoice(&fixture("nfe_st_totals.xml")).unwrap();
    assert_eq!(r.payable.amount, dec!(171.59));
    assert_eq!(r.payable.source, ValueSource::TotalsSubstitution);
}

// ---------------------------------------------------------------------------
// DIFAL invoice, prefixed namespace, CPF recipient
// ---------------------------------------------------------------------------

#[test]
fn prefixed_namespace_and_cpf() {
    let r = nfe::extract_invoice(&fixture("nfe_difal_items.xml")).unwrap();
    assert_eq!(r.emitter.tax_id, "98765432000110");
    assert_eq!(r.emitter.address_line(), "Rua XV de Novembro, S/N");
    assert_eq!(r.emitter.postal_code, "80020310");
    assert_eq!(r.emitter.phone, "4132221000");
    assert_eq!(r.recipient.document, RecipientDocument::Cpf("12345678909".into()));
    assert_eq!(r.recipient.state_code, "RS");
    assert_eq!(r.recipient.municipality_code, "14902");
    assert_eq!(r.recipient.state_registration, None);
    assert_eq!(r.invoice_number, "567");
}

#[test]
fn zero_totals_fall_back_to_item_differential() {
    let r = nfe::extract_invoice(&fixture("nfe_difal_items.xml")).unwrap();
    assert_eq!(r.payable.amount, dec!(75.35));
    assert_eq!(r.payable.source, ValueSource::ItemDifferential);
}

// ---------------------------------------------------------------------------
// Failure modes
// ---------------------------------------------------------------------------

#[test]
fn recipient_without_cnpj_or_cpf() {
    let xml = fixture("nfe_st_totals.xml").replace("<CNPJ>11222333000181</CNPJ>", "");
    let err = nfe::extract_invoice(&xml).unwrap_err();
    assert!(matches!(err, GnreError::MissingField(_)));
    assert_eq!(err.last_stage(), Some(DocumentStage::Parsed));
}

#[test]
fn cnpj_wins_when_both_present() {
    let xml = fixture("nfe_st_totals.xml").replace(
        "<CNPJ>11222333000181</CNPJ>",
        "<CNPJ>11222333000181</CNPJ><CPF>12345678909</CPF>",
    );
    let r = nfe::extract_invoice(&xml).unwrap();
    assert_eq!(r.recipient.document.tag(), "CNPJ");
}

#[test]
fn empty_cnpj_falls_back_to_cpf() {
    let xml = fixture("nfe_st_totals.xml").replace(
        "<CNPJ>11222333000181</CNPJ>",
        "<CNPJ></CNPJ><CPF>12345678909</CPF>",
    );
    let r = nfe::extract_invoice(&xml).unwrap();
    assert_eq!(r.recipient.document, RecipientDocument::Cpf("12345678909".into()));
}

#[test]
fn unauthorized_invoice_has_no_access_key() {
    let xml = fixture("nfe_st_totals.xml").replace(
        "<chNFe>35240612345678000195550010000012341000012345</chNFe>",
        "",
    );
    let err = nfe::extract_invoice(&xml).unwrap_err();
    assert_eq!(err.to_string(), "missing required field: access key (chNFe)");
}

#[test]
fn all_zero_document_rejected() {
    let xml = fixture("nfe_difal_items.xml")
        .replace("60.00</nfe:vICMSUFDest>", "0.00</nfe:vICMSUFDest>")
        .replace("15.35</nfe:vICMSUFDest>", "0.00</nfe:vICMSUFDest>");
    let err = nfe::extract_invoice(&xml).unwrap_err();
    assert!(matches!(err, GnreError::NoPositiveValue));
}

#[test]
fn truncated_document_is_parse_error() {
    let xml = fixture("nfe_st_totals.xml");
    let err = nfe::extract_invoice(&xml[..xml.len() / 2]).unwrap_err();
    assert!(matches!(err, GnreError::Parse(_)));
}

#[test]
fn not_xml_is_parse_error() {
    let err = nfe::extract_invoice("PK\u{3}\u{4} not an xml file").unwrap_err();
    assert!(matches!(err, GnreError::Parse(_)));
}
