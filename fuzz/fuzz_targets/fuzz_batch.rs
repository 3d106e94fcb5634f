#![no_main]

use chrono::NaiveDate;
use gnre_batch::gnre::{BatchInput, GuideParams, process_batch};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let Some(due) = NaiveDate::from_ymd_opt(2024, 7, 10) else {
            return;
        };
        let result = process_batch(&[BatchInput::new("fuzz.xml", s)], &GuideParams::new(due));
        // A produced lot must itself be well-formed.
        if let Some(lot) = result.to_lot_xml() {
            assert!(roxmltree::Document::parse(&lot).is_ok());
        }
    }
});
