//! Per-item results and the aggregated batch report.

use super::manifest::ManifestEntry;
use crate::backend::{Backend, ConversionError};
use serde::Serialize;

/// Why an item was not converted without being a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    SourceMissing,
    AlreadyExists,
}

/// Outcome of processing one manifest entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ConversionResult {
    Converted {
        source: String,
        output: String,
        backend: Backend,
    },
    Skipped {
        source: String,
        reason: SkipReason,
    },
    Failed {
        source: String,
        error: String,
    },
}

impl ConversionResult {
    pub fn converted(entry: &ManifestEntry, backend: Backend) -> Self {
        ConversionResult::Converted {
            source: entry.source.clone(),
            output: entry.output.clone(),
            backend,
        }
    }

    pub fn skipped(entry: &ManifestEntry, reason: SkipReason) -> Self {
        ConversionResult::Skipped {
            source: entry.source.clone(),
            reason,
        }
    }

    pub fn failed(entry: &ManifestEntry, error: impl ToString) -> Self {
        ConversionResult::Failed {
            source: entry.source.clone(),
            error: error.to_string(),
        }
    }

    /// Classify the outcome of a conversion attempt.
    pub fn from_outcome(entry: &ManifestEntry, outcome: Result<Backend, ConversionError>) -> Self {
        match outcome {
            Ok(backend) => Self::converted(entry, backend),
            Err(ConversionError::SourceMissing(_)) => Self::skipped(entry, SkipReason::SourceMissing),
            Err(ConversionError::AlreadyExists(_)) => Self::skipped(entry, SkipReason::AlreadyExists),
            Err(e) => Self::failed(entry, e),
        }
    }

    pub fn source(&self) -> &str {
        match self {
            ConversionResult::Converted { source, .. }
            | ConversionResult::Skipped { source, .. }
            | ConversionResult::Failed { source, .. } => source,
        }
    }
}

/// The single structured output of a run.
///
/// Each sequence keeps manifest order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BatchReport {
    pub converted: Vec<ConversionResult>,
    pub skipped: Vec<ConversionResult>,
    pub failed: Vec<ConversionResult>,
}

impl BatchReport {
    /// Split results, already in manifest order, into the three sequences.
    pub fn from_results(results: impl IntoIterator<Item = ConversionResult>) -> Self {
        let mut report = Self::default();
        for result in results {
            match result {
                ConversionResult::Converted { .. } => report.converted.push(result),
                ConversionResult::Skipped { .. } => report.skipped.push(result),
                ConversionResult::Failed { .. } => report.failed.push(result),
            }
        }
        report
    }

    /// A run succeeds unless an item failed; skips don't count.
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn exit_code(&self) -> u8 {
        if self.is_success() {
            0
        } else {
            1
        }
    }

    pub fn total(&self) -> usize {
        self.converted.len() + self.skipped.len() + self.failed.len()
    }
}
