use roxmltree::{Document, Node};
use tracing::debug;

use super::resolver::{child_named, child_text, descendants_named, first_text};
use super::value::resolve_payable;
use crate::core::*;

/// Parse an NF-e XML string and extract the fields needed for a GNRE guide.
///
/// Accepts both a bare `NFe` and an authorized `nfeProc` envelope. A leading
/// byte-order mark is ignored.
pub fn extract_invoice(xml: &str) -> Result<InvoiceRecord, GnreError> {
    let xml = xml.strip_prefix('\u{feff}').unwrap_or(xml);
    let doc = Document::parse(xml).map_err(|e| GnreError::Parse(e.to_string()))?;
    extract_from_document(&doc)
}

/// Extract guide fields from an already parsed NF-e tree.
///
/// Fails when the recipient state, the recipient identifier or the access
/// key is missing, or when no positive payable amount can be resolved.
pub fn extract_from_document(doc: &Document<'_>) -> Result<InvoiceRecord, GnreError> {
    let root = doc.root();

    let emitter = extract_emitter(root);
    let recipient = extract_recipient(root)?;

    let access_key = first_text(root, "chNFe")
        .map(digits_only)
        .filter(|k| !k.is_empty())
        .ok_or(GnreError::MissingField("access key (chNFe)"))?;
    let invoice_number = first_text(root, "nNF")
        .map(digits_only)
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| "0".to_string());
    debug!(%access_key, %invoice_number, "fields extracted");

    let payable = resolve_payable(root)?.ok_or(GnreError::NoPositiveValue)?;
    debug!(amount = %payable.amount, source = ?payable.source, "value resolved");

    Ok(InvoiceRecord {
        emitter,
        recipient,
        access_key,
        invoice_number,
        payable,
    })
}

fn owned(text: Option<&str>) -> String {
    text.unwrap_or_default().to_string()
}

fn extract_emitter(root: Node<'_, '_>) -> EmitterRecord {
    // Without an `emit` block, fall back to the first match in the document.
    let emit = descendants_named(root, "emit").next().unwrap_or(root);
    let address = descendants_named(emit, "enderEmit").next();
    let address_text = |name: &str| address.and_then(|a| child_text(a, name));

    EmitterRecord {
        tax_id: digits_only(first_text(emit, "CNPJ").unwrap_or_default()),
        legal_name: owned(first_text(emit, "xNome")),
        street_address: owned(first_text(emit, "xLgr")),
        address_number: owned(first_text(emit, "nro")),
        municipality_code: municipality_code(address_text("cMun").unwrap_or_default()),
        state_code: state_code(address_text("UF").unwrap_or_default()),
        postal_code: digits_only(first_text(emit, "CEP").unwrap_or_default()),
        phone: digits_only(first_text(emit, "fone").unwrap_or_default()),
    }
}

fn extract_recipient(root: Node<'_, '_>) -> Result<RecipientRecord, GnreError> {
    let dest = descendants_named(root, "dest").next();
    let dest_text = |name: &str| dest.and_then(|d| child_text(d, name));
    let address = dest.and_then(|d| child_named(d, "enderDest"));
    let address_text = |name: &str| address.and_then(|a| child_text(a, name));

    let uf = address_text("UF")
        .map(state_code)
        .filter(|uf| !uf.is_empty())
        .ok_or(GnreError::MissingField("recipient state (dest/enderDest/UF)"))?;

    let cnpj = dest_text("CNPJ").map(digits_only).filter(|v| !v.is_empty());
    let cpf = dest_text("CPF").map(digits_only).filter(|v| !v.is_empty());
    let document = match (cnpj, cpf) {
        (Some(cnpj), _) => RecipientDocument::Cnpj(cnpj),
        (None, Some(cpf)) => RecipientDocument::Cpf(cpf),
        (None, None) => {
            return Err(GnreError::MissingField("recipient document (CNPJ/CPF)"));
        }
    };

    Ok(RecipientRecord {
        document,
        legal_name: owned(dest_text("xNome")),
        municipality_code: municipality_code(address_text("cMun").unwrap_or_default()),
        state_code: uf,
        state_registration: dest_text("IE").and_then(state_registration),
    })
}
