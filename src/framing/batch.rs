//! Batch conversion.
//!
//! One [`ProfileFrameCache`] is shared by every member of a pull batch. A
//! member that fails or degrades never stops the batch; the outcome of each
//! member is returned in input order together with a [`BatchReport`].
//! With the `parallel` feature members are converted on the rayon pool.

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::cache::ProfileFrameCache;
use super::host::HostMember;
use super::reconcile::{
    PullOutcome, PushInput, PushOutcome, ReconcileError, ReconcileOptions, pull_member, push,
};

/// Counts over one batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BatchReport {
    /// Members converted without any warning.
    pub converted: usize,
    /// Members converted with warnings or dropped data.
    pub degraded: usize,
    /// Members rejected with an error.
    pub failed: usize,
}

impl BatchReport {
    #[must_use]
    pub const fn total(&self) -> usize {
        self.converted + self.degraded + self.failed
    }

    fn record_pull(&mut self, outcome: &PullOutcome) {
        if outcome.diagnostics.is_clean() {
            self.converted += 1;
        } else {
            self.degraded += 1;
        }
    }

    fn record_push(&mut self, outcome: &Result<PushOutcome, ReconcileError>) {
        match outcome {
            Ok(outcome) if outcome.diagnostics.is_clean() => self.converted += 1,
            Ok(_) => self.degraded += 1,
            Err(_) => self.failed += 1,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PullBatch {
    pub outcomes: Vec<PullOutcome>,
    pub report: BatchReport,
}

#[derive(Debug, Clone)]
pub struct PushBatch {
    pub outcomes: Vec<Result<PushOutcome, ReconcileError>>,
    pub report: BatchReport,
}

/// Pulls every member of `members`.
pub fn pull_batch<M: HostMember + Sync>(members: &[M], options: &ReconcileOptions) -> PullBatch {
    let cache = ProfileFrameCache::new();
    let outcomes = pull_all(members, &cache, options);

    let mut report = BatchReport::default();
    for outcome in &outcomes {
        report.record_pull(outcome);
    }
    let stats = cache.stats();
    log::debug!(
        "pull batch: {} members, {} profiles, profile hit rate {:.2}; {report:?}",
        members.len(),
        stats.entries,
        stats.hit_rate()
    );
    PullBatch { outcomes, report }
}

/// Pushes every input of `inputs`.
pub fn push_batch(inputs: &[PushInput], options: &ReconcileOptions) -> PushBatch {
    let outcomes = push_all(inputs, options);

    let mut report = BatchReport::default();
    for outcome in &outcomes {
        report.record_push(outcome);
    }
    log::debug!("push batch: {} members; {report:?}", inputs.len());
    PushBatch { outcomes, report }
}

#[cfg(feature = "parallel")]
fn pull_all<M: HostMember + Sync>(
    members: &[M],
    cache: &ProfileFrameCache,
    options: &ReconcileOptions,
) -> Vec<PullOutcome> {
    members
        .par_iter()
        .map(|member| pull_member(member, cache, options))
        .collect()
}

#[cfg(not(feature = "parallel"))]
fn pull_all<M: HostMember + Sync>(
    members: &[M],
    cache: &ProfileFrameCache,
    options: &ReconcileOptions,
) -> Vec<PullOutcome> {
    members
        .iter()
        .map(|member| pull_member(member, cache, options))
        .collect()
}

#[cfg(feature = "parallel")]
fn push_all(inputs: &[PushInput], options: &ReconcileOptions) -> Vec<Result<PushOutcome, ReconcileError>> {
    inputs.par_iter().map(|input| push(input, options)).collect()
}

#[cfg(not(feature = "parallel"))]
fn push_all(inputs: &[PushInput], options: &ReconcileOptions) -> Vec<Result<PushOutcome, ReconcileError>> {
    inputs.iter().map(|input| push(input, options)).collect()
}
