//! Build a GNRE lot from the NF-e fixtures shipped with the test suite.
//!
//! Run with: `cargo run --example build_lot`

use chrono::NaiveDate;
use gnre_batch::gnre::{BatchInput, GuideParams, OriginPolicy, process_batch_with_progress};
use std::path::Path;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures");
    let mut inputs = Vec::new();
    for name in ["nfe_st_totals.xml", "nfe_difal_items.xml"] {
        inputs.push(BatchInput::new(name, std::fs::read_to_string(dir.join(name))?));
    }
    // A third document without an access key, to show failure reporting.
    inputs.push(BatchInput::new("sem_chave.xml", "<NFe><dest/></NFe>"));

    let params = GuideParams::builder(NaiveDate::from_ymd_opt(2024, 7, 10).unwrap())
        .receipt_code("100099")
        .origin(OriginPolicy::INVOICE_NUMBER)
        .build()?;

    let result = process_batch_with_progress(&inputs, &params, |p| {
        println!("[{}/{}] {} {:?}", p.processed, p.total, p.file_name, p.outcome);
    });

    match result.to_lot_xml() {
        Some(lot) => {
            println!("{lot}");
            println!("Total: R$ {}", result.total_formatted());
        }
        None => println!("Sem guias geradas."),
    }
    for failure in &result.failures {
        eprintln!("{failure}");
    }
    Ok(())
}
