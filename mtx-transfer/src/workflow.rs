//! Transfer run workflow
//!
//! Manifest → collect destination → collect source → common ancestor →
//! reconcile → confirm and remove orphans → plan → execute.
//!
//! [`TransferWorkflow::prepare`] stops after planning so the caller can
//! announce the transfer before [`TransferWorkflow::execute`] starts writing.
//!
//! Every run recomputes both sides from the filesystem, so an interrupted run
//! resumes naturally: files already present are excluded by reconciliation.

use crate::error::TransferResult;
use crate::manifest::read_manifest;
use crate::models::{ExtensionSet, TransferPlan, TransferReport};
use crate::services::{
    longest_common_ancestor, reconcile, remove_files, AncestorError, Codec, FileCollector,
    RemovalConfirmer, TransferExecutor, TransferPlanner,
};
use chrono::Utc;
use mtx_common::config::TransferConfig;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, trace};

/// Inputs of one run
#[derive(Debug, Clone)]
pub struct TransferRequest {
    /// Manifest listing source files and directories
    pub manifest: PathBuf,
    /// Destination directory (created on demand)
    pub destination: PathBuf,
}

/// How a run ended
#[derive(Debug)]
pub enum TransferOutcome {
    /// No allowlisted source files were found
    NoSourceFiles,
    /// Every source file already exists in the destination
    AllPresent { already_present: usize },
    /// Removal and transfer were carried out
    Completed(TransferReport),
}

/// Result of the preparation phase
#[derive(Debug)]
pub enum Preparation {
    /// Nothing to transfer; the run is over
    Finished(TransferOutcome),
    /// Orphans handled and items planned, awaiting execution
    Ready(PreparedTransfer),
}

/// A planned transfer that has not been executed yet
#[derive(Debug)]
pub struct PreparedTransfer {
    plan: TransferPlan,
    report: TransferReport,
}

impl PreparedTransfer {
    pub fn plan(&self) -> &TransferPlan {
        &self.plan
    }

    /// Report so far (removal results are already filled in)
    pub fn report(&self) -> &TransferReport {
        &self.report
    }
}

/// Runs transfers for one configuration
pub struct TransferWorkflow {
    config: TransferConfig,
    codec: Arc<dyn Codec>,
}

impl TransferWorkflow {
    pub fn new(config: TransferConfig, codec: Arc<dyn Codec>) -> Self {
        Self { config, codec }
    }

    pub fn config(&self) -> &TransferConfig {
        &self.config
    }

    /// Run one transfer from start to finish
    pub async fn run(
        &self,
        request: &TransferRequest,
        confirmer: &mut dyn RemovalConfirmer,
    ) -> TransferResult<TransferOutcome> {
        match self.prepare(request, confirmer)? {
            Preparation::Finished(outcome) => Ok(outcome),
            Preparation::Ready(prepared) => Ok(self.execute(prepared).await),
        }
    }

    /// Everything up to and including planning: collect, reconcile, remove
    /// confirmed orphans, plan
    pub fn prepare(
        &self,
        request: &TransferRequest,
        confirmer: &mut dyn RemovalConfirmer,
    ) -> TransferResult<Preparation> {
        let started_at = Utc::now();
        let roots = read_manifest(&request.manifest)?;

        debug!("Gathering destination files list");
        let destination = FileCollector::for_destination(ExtensionSet::destination(&self.config))
            .collect(std::slice::from_ref(&request.destination))?
            .files;
        debug!("Gathered {} destination files", destination.len());

        debug!("Gathering source files list");
        let source = FileCollector::for_sources(ExtensionSet::source(&self.config))
            .collect(roots.as_slice())?
            .files;
        debug!("Gathered {} source files", source.len());

        debug!("Finding longest common prefix of source files");
        let ancestor = match longest_common_ancestor(source.paths()) {
            Ok(ancestor) => ancestor,
            Err(AncestorError::EmptyInput) => {
                return Ok(Preparation::Finished(TransferOutcome::NoSourceFiles))
            }
        };
        debug!(ancestor = %ancestor.display(), "Common ancestor resolved");

        debug!("Filtering files already present in destination");
        let reconciliation = reconcile(&source, &destination);
        if reconciliation.to_transfer.is_empty() {
            return Ok(Preparation::Finished(TransferOutcome::AllPresent {
                already_present: reconciliation.already_present.len(),
            }));
        }

        let mut report = TransferReport::new(request.destination.clone());
        report.started_at = started_at;

        let orphans: Vec<PathBuf> = reconciliation
            .only_in_destination
            .paths()
            .map(Path::to_path_buf)
            .collect();
        if !orphans.is_empty() {
            report.removal.candidates = orphans.len();
            report.removal.confirmed = confirmer.confirm(&orphans)?;
            if report.removal.confirmed {
                remove_files(orphans.iter().map(PathBuf::as_path), &mut report.removal);
                info!("Removed {} files from destination", report.removal.removed.len());
            } else {
                info!("Keeping {} files not found in source files list", orphans.len());
            }
        }

        let planner = TransferPlanner::new(
            &ancestor,
            &request.destination,
            &self.config.target_extension,
        );
        let plan = planner.plan(&reconciliation.to_transfer)?;

        info!(
            source_files = source.len(),
            conversions = plan.conversions(),
            rejected = plan.rejected.len(),
            "Copying {} songs to {}",
            plan.len(),
            request.destination.display()
        );
        for item in &plan.items {
            trace!(
                source = %item.source.display(),
                destination = %item.destination.display(),
                action = ?item.action,
                "Planned"
            );
        }

        Ok(Preparation::Ready(PreparedTransfer { plan, report }))
    }

    /// Execute a prepared transfer
    pub async fn execute(&self, prepared: PreparedTransfer) -> TransferOutcome {
        let PreparedTransfer { plan, mut report } = prepared;

        TransferExecutor::new(Arc::clone(&self.codec), self.config.worker_count())
            .execute(plan, &mut report)
            .await;

        report.finished_at = Utc::now();
        TransferOutcome::Completed(report)
    }
}
