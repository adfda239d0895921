//! Reconciliation engine components
//!
//! Collector runs once per side, the reconciler partitions the two sets, the
//! planner derives destination paths and the executor applies the plan.

pub mod ancestor;
pub mod codec;
pub mod confirm;
pub mod executor;
pub mod file_collector;
pub mod planner;
pub mod reconciler;

pub use ancestor::{longest_common_ancestor, AncestorError};
pub use codec::{Codec, CodecError, FfmpegCodec};
pub use confirm::{FixedAnswer, PromptConfirmer, RemovalConfirmer};
pub use executor::{copy_preserving_times, remove_files, transfer_item, TransferExecutor};
pub use file_collector::{CollectError, Collection, CollectionStats, FileCollector, MissingRoot};
pub use planner::{PlanError, TransferPlanner};
pub use reconciler::{reconcile, MatchedPair, Reconciliation};
