use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::guide::{GuideFragment, compose_guide};
use super::params::GuideParams;
use super::xml_utils::format_amount;
use super::{LOT_FOOTER, LOT_HEADER};
use crate::core::{DocumentStage, GnreError};
use crate::nfe;

/// One input document: a display name (usually the file name) and its XML.
#[derive(Debug, Clone)]
pub struct BatchInput {
    pub name: String,
    pub xml: String,
}

impl BatchInput {
    pub fn new(name: impl Into<String>, xml: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            xml: xml.into(),
        }
    }
}

/// A document that produced no guide.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentFailure {
    pub file_name: String,
    /// Human-readable reason, the `Display` of the underlying error.
    pub reason: String,
    /// Last stage reached before failing; `None` if the XML never parsed.
    pub last_stage: Option<DocumentStage>,
}

impl std::fmt::Display for DocumentFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.file_name, self.reason)
    }
}

/// Outcome of a whole batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchResult {
    /// Guides in input order.
    pub fragments: Vec<GuideFragment>,
    /// Failed documents in input order.
    pub failures: Vec<DocumentFailure>,
    /// Sum of the `<valorGNRE>` amounts of all fragments.
    pub running_total: Decimal,
}

impl BatchResult {
    pub fn has_guides(&self) -> bool {
        !self.fragments.is_empty()
    }

    /// The complete `<TLote_GNRE>` document, or `None` if no guide was produced.
    pub fn to_lot_xml(&self) -> Option<String> {
        if !self.has_guides() {
            return None;
        }
        let body = self
            .fragments
            .iter()
            .map(|f| f.xml.as_str())
            .collect::<Vec<_>>()
            .join("\n");
        Some(format!("{LOT_HEADER}{body}\n{LOT_FOOTER}"))
    }

    /// Running total with two decimals, as shown to the user.
    pub fn total_formatted(&self) -> String {
        format_amount(self.running_total)
    }

    pub fn summary(&self) -> BatchSummary {
        BatchSummary {
            guides: self.fragments.len(),
            failures: self.failures.clone(),
            total: self.total_formatted(),
        }
    }
}

/// Serializable report of a batch run, without the guide XML.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub guides: usize,
    pub failures: Vec<DocumentFailure>,
    pub total: String,
}

/// Outcome of one document, reported through the progress callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentOutcome {
    Succeeded,
    Failed,
}

/// Progress after each document.
#[derive(Debug, Clone, Copy)]
pub struct BatchProgress<'a> {
    /// Documents handled so far, including this one.
    pub processed: usize,
    pub total: usize,
    pub file_name: &'a str,
    pub outcome: DocumentOutcome,
}

/// Collects guides and failures document by document.
///
/// The aggregator is the only owner of the growing [`BatchResult`]; a
/// failing document is recorded and never aborts the batch.
#[derive(Debug)]
pub struct BatchAggregator {
    params: GuideParams,
    result: BatchResult,
}

impl BatchAggregator {
    pub fn new(params: GuideParams) -> Self {
        Self {
            params,
            result: BatchResult::default(),
        }
    }

    pub fn params(&self) -> &GuideParams {
        &self.params
    }

    /// Extract, resolve and compose one document, then record the outcome.
    pub fn push(&mut self, file_name: &str, xml: &str) -> DocumentOutcome {
        let composed = nfe::extract_invoice(xml).and_then(|record| compose_guide(&record, &self.params));
        let accepted = composed.and_then(|fragment| {
            let total = self
                .result
                .running_total
                .checked_add(fragment.value)
                .ok_or(GnreError::TotalOverflow(fragment.value))?;
            Ok((fragment, total))
        });
        match accepted {
            Ok((fragment, total)) => {
                self.result.running_total = total;
                self.result.fragments.push(fragment);
                DocumentOutcome::Succeeded
            }
            Err(e) => {
                self.push_failure(file_name, e);
                DocumentOutcome::Failed
            }
        }
    }

    /// Record a document that failed before reaching the pipeline
    /// (e.g. the file could not be read).
    pub fn push_failure(&mut self, file_name: &str, error: GnreError) {
        warn!(file = file_name, error = %error, "document skipped");
        self.result.failures.push(DocumentFailure {
            file_name: file_name.to_string(),
            reason: error.to_string(),
            last_stage: error.last_stage(),
        });
    }

    pub fn finish(self) -> BatchResult {
        info!(
            guides = self.result.fragments.len(),
            failures = self.result.failures.len(),
            total = %self.result.total_formatted(),
            "batch finished"
        );
        self.result
    }
}

/// Process every input in order.
pub fn process_batch(inputs: &[BatchInput], params: &GuideParams) -> BatchResult {
    process_batch_with_progress(inputs, params, |_| {})
}

/// Process every input in order, calling `progress` after each document.
pub fn process_batch_with_progress<F>(
    inputs: &[BatchInput],
    params: &GuideParams,
    mut progress: F,
) -> BatchResult
where
    F: FnMut(BatchProgress<'_>),
{
    let mut aggregator = BatchAggregator::new(params.clone());
    for (i, input) in inputs.iter().enumerate() {
        let outcome = aggregator.push(&input.name, &input.xml);
        progress(BatchProgress {
            processed: i + 1,
            total: inputs.len(),
            file_name: &input.name,
            outcome,
        });
    }
    aggregator.finish()
}
