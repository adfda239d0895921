//! Transfer executor
//!
//! Applies a [`TransferPlan`] with a bounded pool of workers. Each item owns
//! its source and destination path, so items run independently; the only
//! ordering constraint is that an item's parent directory exists before its
//! file is written, and `create_dir_all` is safe to race.
//!
//! A failed item is recorded and the remaining items carry on. Existing
//! destination files are never overwritten: copies and conversions alike fail
//! the item when their destination path is already taken.

use crate::models::{
    ItemOutcome, RemovalFailure, RemovalReport, TransferAction, TransferFailure, TransferItem,
    TransferPlan, TransferReport,
};
use crate::services::codec::Codec;
use filetime::FileTime;
use futures::stream::{self, StreamExt};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Runs transfer items on a bounded worker pool
pub struct TransferExecutor {
    codec: Arc<dyn Codec>,
    workers: usize,
}

impl TransferExecutor {
    pub fn new(codec: Arc<dyn Codec>, workers: usize) -> Self {
        Self {
            codec,
            workers: workers.max(1),
        }
    }

    /// Execute every plan item, recording outcomes into `report`
    pub async fn execute(&self, plan: TransferPlan, report: &mut TransferReport) {
        report.failed.extend(plan.rejected);
        let total = plan.items.len();
        let completed = Arc::new(AtomicUsize::new(0));

        info!(items = total, workers = self.workers, "Starting transfer");

        let results: Vec<(TransferItem, ItemOutcome)> = stream::iter(plan.items)
            .map(|item| {
                let codec = Arc::clone(&self.codec);
                let completed = Arc::clone(&completed);

                async move {
                    let job_item = item.clone();
                    let outcome =
                        tokio::task::spawn_blocking(move || transfer_item(&job_item, codec.as_ref()))
                            .await
                            .unwrap_or_else(|e| ItemOutcome::Failed {
                                reason: format!("Worker task failed: {}", e),
                            });

                    let current = completed.fetch_add(1, Ordering::Relaxed) + 1;
                    if current % 10 == 0 || current == total {
                        debug!(progress = format!("{}/{}", current, total), "Transfer progress");
                    }

                    (item, outcome)
                }
            })
            .buffer_unordered(self.workers)
            .collect()
            .await;

        for (item, outcome) in results {
            match outcome {
                ItemOutcome::Copied => report.copied.push(item.destination),
                ItemOutcome::Converted => report.converted.push(item.destination),
                ItemOutcome::Failed { reason } => report.failed.push(TransferFailure {
                    source: item.source,
                    destination: item.destination,
                    action: item.action,
                    reason,
                }),
            }
        }

        // Completion order is arbitrary; keep the report stable
        report.copied.sort();
        report.converted.sort();
        report.failed.sort_by(|a, b| a.source.cmp(&b.source));
    }
}

/// Transfer one item: create the parent directory, then copy or convert
pub fn transfer_item(item: &TransferItem, codec: &dyn Codec) -> ItemOutcome {
    if item.destination.symlink_metadata().is_ok() {
        return failed(item, format!("{} already exists", item.destination.display()));
    }

    if let Some(parent) = item.destination.parent() {
        if let Err(e) = std::fs::create_dir_all(parent) {
            return failed(item, format!("Cannot create {}: {}", parent.display(), e));
        }
    }

    let result = match item.action {
        TransferAction::Copy => copy_preserving_times(&item.source, &item.destination)
            .map(|_| ItemOutcome::Copied)
            .map_err(|e| e.to_string()),
        TransferAction::Convert => codec
            .convert(&item.source, &item.destination)
            .map(|_| ItemOutcome::Converted)
            .map_err(|e| e.to_string()),
    };

    match result {
        Ok(outcome) => {
            debug!(
                source = %item.source.display(),
                destination = %item.destination.display(),
                outcome = ?outcome,
                "Transferred"
            );
            outcome
        }
        Err(reason) => failed(item, reason),
    }
}

fn failed(item: &TransferItem, reason: String) -> ItemOutcome {
    warn!(
        source = %item.source.display(),
        destination = %item.destination.display(),
        reason = %reason,
        "Transfer failed"
    );
    ItemOutcome::Failed { reason }
}

/// Byte-preserving copy that also carries over access and modification times
pub fn copy_preserving_times(source: &Path, destination: &Path) -> std::io::Result<()> {
    std::fs::copy(source, destination)?;
    let metadata = std::fs::metadata(source)?;
    let accessed = FileTime::from_last_access_time(&metadata);
    let modified = FileTime::from_last_modification_time(&metadata);
    filetime::set_file_times(destination, accessed, modified)
}

/// Delete every path, recording failures instead of stopping
pub fn remove_files<'a, I>(paths: I, report: &mut RemovalReport)
where
    I: IntoIterator<Item = &'a Path>,
{
    for path in paths {
        match std::fs::remove_file(path) {
            Ok(()) => {
                debug!(path = %path.display(), "Removed");
                report.removed.push(path.to_path_buf());
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Removal failed");
                report.failed.push(RemovalFailure {
                    path: PathBuf::from(path),
                    reason: e.to_string(),
                });
            }
        }
    }
}
