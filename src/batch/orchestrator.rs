//! Batch orchestration: idempotency checks, failure isolation, reporting.

use super::manifest::ManifestEntry;
use super::report::{BatchReport, ConversionResult, SkipReason};
use crate::backend::{BackendSelector, ConversionError};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{error, info};

/// Settings for one batch run.
#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// Root that manifest sources are resolved against.
    pub source_dir: PathBuf,
    /// Root that manifest outputs are resolved against.
    pub output_dir: PathBuf,
    /// Maximum number of items converted at the same time.
    pub concurrency: usize,
    /// Per-item limit; `None` waits indefinitely.
    pub item_timeout: Option<Duration>,
}

impl BatchOptions {
    pub fn new(source_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            source_dir: source_dir.into(),
            output_dir: output_dir.into(),
            ..Default::default()
        }
    }
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            source_dir: PathBuf::from("."),
            output_dir: PathBuf::from("."),
            concurrency: default_concurrency(),
            item_timeout: Some(Duration::from_secs(120)),
        }
    }
}

/// Number of available CPUs, at least one.
pub fn default_concurrency() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

/// Runs a manifest through the backend selector.
///
/// No item can abort the batch: every entry yields exactly one
/// [`ConversionResult`], and the report lists them in manifest order
/// regardless of completion order.
#[derive(Clone)]
pub struct BatchOrchestrator {
    selector: BackendSelector,
    options: BatchOptions,
}

impl BatchOrchestrator {
    pub fn new(selector: BackendSelector, options: BatchOptions) -> Self {
        Self { selector, options }
    }

    pub fn options(&self) -> &BatchOptions {
        &self.options
    }

    /// Process every entry and assemble the report.
    pub async fn run(&self, entries: &[ManifestEntry]) -> BatchReport {
        info!(
            "Processing {} manifest entries (concurrency {})",
            entries.len(),
            self.options.concurrency.max(1)
        );

        let semaphore = Arc::new(Semaphore::new(self.options.concurrency.max(1)));
        let mut tasks = JoinSet::new();

        for (index, entry) in entries.iter().cloned().enumerate() {
            let orchestrator = self.clone();
            let semaphore = semaphore.clone();
            tasks.spawn(async move {
                let _permit = semaphore.acquire_owned().await.ok();
                let source = entry.clone();
                // A panic inside one conversion must not lose the item.
                let result = match tokio::spawn(async move { orchestrator.convert_entry(&entry).await }).await {
                    Ok(result) => result,
                    Err(e) => {
                        error!("Conversion task for {} aborted: {}", source.source, e);
                        ConversionResult::failed(&source, format!("conversion task aborted: {}", e))
                    }
                };
                (index, result)
            });
        }

        let mut results = Vec::with_capacity(entries.len());
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(indexed) => results.push(indexed),
                Err(e) => error!("Batch worker aborted: {}", e),
            }
        }
        results.sort_by_key(|(index, _)| *index);

        let report = BatchReport::from_results(results.into_iter().map(|(_, r)| r));
        info!(
            "Batch complete: {} converted, {} skipped, {} failed",
            report.converted.len(),
            report.skipped.len(),
            report.failed.len()
        );
        report
    }

    /// Process a single entry. Never fails; errors become `Failed` results.
    pub async fn convert_entry(&self, entry: &ManifestEntry) -> ConversionResult {
        let source_path = self.options.source_dir.join(&entry.source);
        let output_path = self.options.output_dir.join(&entry.output);

        if !source_path.is_file() {
            info!("Skipping {}: source not found at {:?}", entry.source, source_path);
            return ConversionResult::skipped(entry, SkipReason::SourceMissing);
        }

        if output_path.exists() {
            info!("Skipping {}: {:?} already exists", entry.source, output_path);
            return ConversionResult::skipped(entry, SkipReason::AlreadyExists);
        }

        if let Some(parent) = output_path.parent() {
            if let Err(e) = tokio::fs::create_dir_all(parent).await {
                error!("Failed to create {:?}: {}", parent, e);
                return ConversionResult::failed(entry, ConversionError::Io(e));
            }
        }

        let conversion = self.selector.convert(&source_path, &output_path);
        let outcome = match self.options.item_timeout {
            Some(limit) => match tokio::time::timeout(limit, conversion).await {
                Ok(outcome) => outcome,
                Err(_) => Err(ConversionError::Timeout(limit)),
            },
            None => conversion.await,
        };

        let result = ConversionResult::from_outcome(entry, outcome);
        match &result {
            ConversionResult::Converted { backend, .. } => {
                let size = tokio::fs::metadata(&output_path)
                    .await
                    .map(|m| m.len())
                    .unwrap_or(0);
                info!(
                    "Converted {} -> {} with {} ({} bytes)",
                    entry.source, entry.output, backend, size
                );
            }
            ConversionResult::Skipped { .. } => {
                info!("Skipping {}: {:?} appeared during conversion", entry.source, output_path);
            }
            ConversionResult::Failed { error, .. } => {
                error!("Failed to convert {}: {}", entry.source, error);
            }
        }
        result
    }
}
