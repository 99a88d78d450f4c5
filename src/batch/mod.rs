//! Sequential batch driver over every incentive still waiting for a scored result.

mod error;
mod skip_list;


pub use error::{BatchError, BatchResult};
pub use skip_list::SkipList;

use std::process::ExitCode;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use tracing::{error, info, instrument, warn};

use crate::domain::Incentive;
use crate::orchestrator::MatchingOrchestrator;
use crate::store::{IncentiveStore, ResultStore, rebuild_reverse_index};

#[derive(Debug, Clone, Default)]
pub struct BatchOptions {
    pub offset: usize,
    pub limit: Option<usize>,
    /// Also process incentives on the skip-list, after the others.
    pub include_skipped: bool,
}

impl BatchOptions {
    pub fn with_offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_include_skipped(mut self, include: bool) -> Self {
        self.include_skipped = include;
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchSummary {
    pub succeeded: usize,
    pub failed: usize,
    /// Incentives left on the skip-list by this run.
    pub skipped: usize,
    pub cancelled: bool,
    /// Entries written by the closing reverse index rebuild, if it ran.
    pub reverse_index_companies: Option<usize>,
    pub elapsed: Duration,
}

impl BatchSummary {
    pub fn attempted(&self) -> usize {
        self.succeeded + self.failed + self.skipped
    }

    /// Non-zero when any incentive failed outright.
    pub fn exit_code(&self) -> ExitCode {
        if self.failed > 0 {
            ExitCode::FAILURE
        } else {
            ExitCode::SUCCESS
        }
    }
}

enum Outcome {
    Matched,
    Empty,
    Failed,
}

pub struct BatchRunner {
    orchestrator: MatchingOrchestrator,
    incentives: Arc<dyn IncentiveStore>,
    results: Arc<dyn ResultStore>,
    skip_list: SkipList,
    cancel: Arc<AtomicBool>,
}

impl BatchRunner {
    pub fn new(
        orchestrator: MatchingOrchestrator,
        incentives: Arc<dyn IncentiveStore>,
        results: Arc<dyn ResultStore>,
        skip_list: SkipList,
    ) -> Self {
        Self {
            orchestrator,
            incentives,
            results,
            skip_list,
            cancel: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Handle that stops the run before the next incentive when set.
    pub fn cancel_handle(&self) -> Arc<AtomicBool> {
        self.cancel.clone()
    }

    pub fn skip_list(&self) -> &SkipList {
        &self.skip_list
    }

    fn is_cancelled(&self) -> bool {
        self.cancel.load(Ordering::Acquire)
    }

    /// Pending incentives in processing order, after offset and limit.
    async fn queue(&self, options: &BatchOptions) -> BatchResult<Vec<Incentive>> {
        let (mut queue, skipped): (Vec<_>, Vec<_>) = self
            .incentives
            .pending_incentives()
            .await?
            .into_iter()
            .partition(|incentive| !self.skip_list.contains(&incentive.id));

        if options.include_skipped {
            queue.extend(skipped);
        } else if !skipped.is_empty() {
            info!(count = skipped.len(), "Leaving skipped incentives out");
        }

        Ok(queue
            .into_iter()
            .skip(options.offset)
            .take(options.limit.unwrap_or(usize::MAX))
            .collect())
    }

    async fn process(&mut self, incentive: &Incentive) -> BatchResult<Outcome> {
        match self.orchestrator.run(incentive).await {
            Ok(outcome) if outcome.company_count() == 0 => {
                warn!(incentive_id = %incentive.id, "No eligible companies, skipping");
                self.skip_list.insert(&incentive.id)?;
                Ok(Outcome::Empty)
            }
            Ok(outcome) => {
                info!(
                    incentive_id = %incentive.id,
                    companies = outcome.company_count(),
                    iterations = outcome.iterations,
                    geocoding_calls = outcome.geocoding_calls,
                    "Incentive done"
                );
                self.skip_list.remove(&incentive.id)?;
                Ok(Outcome::Matched)
            }
            Err(e) => {
                error!(incentive_id = %incentive.id, error = %e, "Incentive failed");
                Ok(Outcome::Failed)
            }
        }
    }

    /// Processes the queue, retries empty incentives once, then rebuilds the reverse index.
    #[instrument(skip_all, fields(offset = options.offset, limit = ?options.limit))]
    pub async fn run(&mut self, options: &BatchOptions) -> BatchResult<BatchSummary> {
        let started = Instant::now();
        let queue = self.queue(options).await?;
        info!(queued = queue.len(), "Batch started");

        let mut summary = BatchSummary::default();
        let mut retries = Vec::new();

        for (position, incentive) in queue.iter().enumerate() {
            if self.is_cancelled() {
                summary.cancelled = true;
                break;
            }
            info!(
                incentive_id = %incentive.id,
                position = position + 1,
                total = queue.len(),
                "Processing incentive"
            );
            match self.process(incentive).await? {
                Outcome::Matched => summary.succeeded += 1,
                Outcome::Failed => summary.failed += 1,
                Outcome::Empty => {
                    summary.skipped += 1;
                    retries.push(incentive);
                }
            }
        }

        if !summary.cancelled && !retries.is_empty() {
            info!(count = retries.len(), "Retrying skipped incentives");
            for incentive in retries {
                if self.is_cancelled() {
                    summary.cancelled = true;
                    break;
                }
                match self.process(incentive).await? {
                    Outcome::Matched => {
                        summary.skipped -= 1;
                        summary.succeeded += 1;
                    }
                    Outcome::Failed => {
                        summary.skipped -= 1;
                        summary.failed += 1;
                    }
                    Outcome::Empty => {}
                }
            }
        }

        if summary.cancelled && summary.succeeded == 0 {
            warn!("Cancelled before any incentive completed, reverse index left as is");
        } else {
            summary.reverse_index_companies =
                Some(rebuild_reverse_index(self.results.as_ref()).await?);
        }

        summary.elapsed = started.elapsed();
        info!(
            succeeded = summary.succeeded,
            failed = summary.failed,
            skipped = summary.skipped,
            cancelled = summary.cancelled,
            elapsed_secs = summary.elapsed.as_secs(),
            "Batch finished"
        );
        Ok(summary)
    }
}
