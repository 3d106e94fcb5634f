use chrono::Datelike;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::origin::OriginDocument;
use super::params::GuideParams;
use super::xml_utils::{XmlWriter, format_amount, round_cents};
use super::{ACCESS_KEY_EXTRA_FIELD, GNRE_VERSION, GUIDE_TYPE, VALUE_TYPE};
use crate::core::*;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// One rendered `<TDadosGNRE>` element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuideFragment {
    /// The fragment XML, without declaration.
    pub xml: String,
    /// Amount written to `<valorGNRE>`, already rounded to cents.
    pub value: Decimal,
    /// Access key of the source invoice.
    pub access_key: String,
}

/// Render one guide using the origin policy configured in `params`.
pub fn compose_guide(record: &InvoiceRecord, params: &GuideParams) -> Result<GuideFragment, GnreError> {
    compose_guide_with(record, params, &params.origin())
}

/// Render one guide with a custom origin-document strategy.
///
/// Pure: the same record and parameters always produce byte-identical XML.
pub fn compose_guide_with(
    record: &InvoiceRecord,
    params: &GuideParams,
    origin: &dyn OriginDocument,
) -> Result<GuideFragment, GnreError> {
    let value = round_cents(record.payable.amount);
    if value <= Decimal::ZERO {
        return Err(GnreError::NoPositiveValue);
    }
    let amount = format_amount(value);
    let due = params.due_date();
    let due_str = due.format(DATE_FORMAT).to_string();
    let reference = origin.origin_reference(record);

    let mut w = XmlWriter::new();
    w.start_element_with_attrs("TDadosGNRE", &[("versao", GNRE_VERSION)])?;
    w.code_element("ufFavorecida", &record.recipient.state_code)?;
    w.code_element("tipoGnre", GUIDE_TYPE)?;
    write_emitter(&mut w, &record.emitter)?;

    w.start_element("itensGNRE")?;
    w.start_element("item")?;
    w.code_element("receita", params.receipt_code())?;
    w.code_element_with_attrs(
        "documentoOrigem",
        reference.value,
        &[("tipo", reference.type_code.as_str())],
    )?;
    w.code_element("produto", params.product_code())?;

    w.start_element("referencia")?;
    w.code_element("periodo", "0")?;
    w.code_element("mes", &format!("{:02}", due.month()))?;
    w.code_element("ano", &due.year().to_string())?;
    w.code_element("parcela", "1")?;
    w.end_element("referencia")?;

    w.code_element("dataVencimento", &due_str)?;
    w.code_element_with_attrs("valor", &amount, &[("tipo", VALUE_TYPE)])?;
    write_recipient(&mut w, &record.recipient)?;

    w.start_element("camposExtras")?;
    w.start_element("campoExtra")?;
    w.code_element("codigo", ACCESS_KEY_EXTRA_FIELD)?;
    w.code_element("valor", &record.access_key)?;
    w.end_element("campoExtra")?;
    w.end_element("camposExtras")?;

    w.end_element("item")?;
    w.end_element("itensGNRE")?;
    w.code_element("valorGNRE", &amount)?;
    w.code_element("dataPagamento", &due_str)?;
    w.end_element("TDadosGNRE")?;

    debug!(access_key = %record.access_key, %amount, "guide composed");
    Ok(GuideFragment {
        xml: w.into_string()?,
        value,
        access_key: record.access_key.clone(),
    })
}

fn write_emitter(w: &mut XmlWriter, emitter: &EmitterRecord) -> Result<(), GnreError> {
    w.start_element("contribuinteEmitente")?;
    w.start_element("identificacao")?;
    w.code_element("CNPJ", &emitter.tax_id)?;
    w.end_element("identificacao")?;
    w.text_element("razaoSocial", &emitter.legal_name)?;
    w.text_element("endereco", &emitter.address_line())?;
    w.code_element("municipio", &emitter.municipality_code)?;
    w.code_element("uf", &emitter.state_code)?;
    w.code_element("cep", &emitter.postal_code)?;
    w.code_element("telefone", &emitter.phone)?;
    w.end_element("contribuinteEmitente")?;
    Ok(())
}

fn write_recipient(w: &mut XmlWriter, recipient: &RecipientRecord) -> Result<(), GnreError> {
    w.start_element("contribuinteDestinatario")?;
    w.start_element("identificacao")?;
    w.code_element(recipient.document.tag(), recipient.document.value())?;
    if let Some(ie) = &recipient.state_registration {
        w.code_element("IE", ie)?;
    }
    w.end_element("identificacao")?;
    w.text_element("razaoSocial", &recipient.legal_name)?;
    w.code_element("municipio", &recipient.municipality_code)?;
    w.end_element("contribuinteDestinatario")?;
    Ok(())
}
