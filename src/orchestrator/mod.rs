//! Iterative matching of one incentive against the company index.
//!
//! Each iteration retrieves `candidates_to_try` companies, reranks them, resolves their
//! locations and asks for geographic eligibility. The loop stops as soon as enough
//! companies are eligible or the search size reaches its maximum; the final companies are
//! then scored and persisted.

mod config;
mod error;
mod state;


pub use config::MatchConfig;
pub use error::{OrchestratorError, OrchestratorResult};
pub use state::{Iteration, MatchState};

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use tracing::{debug, info, instrument};

use crate::domain::{CandidateCompany, Incentive, LocatedCandidate};
use crate::eligibility::GeoEligibilityFilter;
use crate::location::LocationResolver;
use crate::rerank::CandidateReranker;
use crate::retrieval::CandidateRetriever;
use crate::scoring::{CompanyScorer, ScoredCompany};
use crate::store::{CompanyStore, MatchResult, RankedCompany, ResultStore};

/// What one run produced, with its persisted result.
#[derive(Debug, Clone)]
pub struct MatchOutcome {
    pub result: MatchResult,
    pub iterations: usize,
    /// Search size of the final iteration.
    pub candidates_tried: usize,
    pub geocoding_calls: u64,
}

impl MatchOutcome {
    pub fn company_count(&self) -> usize {
        self.result.semantic_ranking.len()
    }
}

pub struct MatchingOrchestrator {
    retriever: CandidateRetriever,
    companies: Arc<dyn CompanyStore>,
    reranker: CandidateReranker,
    resolver: Arc<LocationResolver>,
    eligibility: GeoEligibilityFilter,
    scorer: CompanyScorer,
    results: Arc<dyn ResultStore>,
    config: MatchConfig,
}

impl MatchingOrchestrator {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        retriever: CandidateRetriever,
        companies: Arc<dyn CompanyStore>,
        reranker: CandidateReranker,
        resolver: Arc<LocationResolver>,
        eligibility: GeoEligibilityFilter,
        scorer: CompanyScorer,
        results: Arc<dyn ResultStore>,
        config: MatchConfig,
    ) -> OrchestratorResult<Self> {
        config.validate()?;
        Ok(Self {
            retriever,
            companies,
            reranker,
            resolver,
            eligibility,
            scorer,
            results,
            config,
        })
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    pub fn resolver(&self) -> &LocationResolver {
        &self.resolver
    }

    /// Runs the matching loop for one incentive and persists the result.
    #[instrument(skip_all, fields(incentive_id = %incentive.id))]
    pub async fn run(&self, incentive: &Incentive) -> OrchestratorResult<MatchOutcome> {
        let requirement = incentive.geo_requirement().ok_or_else(|| {
            OrchestratorError::MissingGeoRequirement {
                incentive_id: incentive.id.clone(),
            }
        })?;

        let started = Instant::now();
        let calls_before = self.resolver.api_calls();
        let query = incentive.query_text();

        let mut iterations = 0;
        let mut candidates_tried = self.config.initial_candidates;
        let mut state = MatchState::Searching {
            candidates_to_try: self.config.initial_candidates,
        };

        let result = loop {
            state = match state {
                MatchState::Searching { candidates_to_try } => {
                    iterations += 1;
                    candidates_tried = candidates_to_try;
                    let iteration = self.search(&query, requirement, candidates_to_try).await?;
                    self.decide(iteration)
                }
                MatchState::Expanding { from } => {
                    let candidates_to_try = self.config.next_step(from);
                    info!(from, to = candidates_to_try, "Expanding search");
                    MatchState::Searching { candidates_to_try }
                }
                MatchState::Finalizing {
                    iteration,
                    selected,
                } => {
                    let result = self
                        .finalize(incentive, &iteration, selected, started)
                        .await;
                    self.results
                        .save_match(&result)
                        .await
                        .map_err(OrchestratorError::Persistence)?;
                    MatchState::Done { result }
                }
                MatchState::Done { result } => break result,
            };
        };

        let geocoding_calls = self.resolver.api_calls().saturating_sub(calls_before);

        info!(
            companies = result.semantic_ranking.len(),
            iterations,
            candidates_tried,
            geocoding_calls,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Incentive matched"
        );

        Ok(MatchOutcome {
            result,
            iterations,
            candidates_tried,
            geocoding_calls,
        })
    }

    /// One iteration: retrieve, enrich, rerank, locate, evaluate.
    async fn search(
        &self,
        query: &str,
        requirement: &str,
        candidates_to_try: usize,
    ) -> OrchestratorResult<Iteration> {
        let hits = self.retriever.retrieve(query, candidates_to_try).await;
        if hits.is_empty() {
            return Ok(Iteration {
                candidates_to_try,
                ..Default::default()
            });
        }

        let ids: Vec<_> = hits.iter().map(|h| h.id).collect();
        let records: HashMap<_, _> = self
            .companies
            .fetch_companies(&ids)
            .await
            .map_err(OrchestratorError::CompanyLookup)?
            .into_iter()
            .map(|record| (record.id, record))
            .collect();

        let candidates: Vec<CandidateCompany> = hits
            .iter()
            .filter_map(|hit| {
                let record = records.get(&hit.id)?;
                Some(CandidateCompany::new(record.clone(), hit.score))
            })
            .collect();
        if candidates.len() < hits.len() {
            debug!(
                dropped = hits.len() - candidates.len(),
                "Retrieved companies missing from the store"
            );
        }

        let reranked = self.reranker.rerank(query, candidates);

        let mut located = Vec::with_capacity(reranked.len());
        for company in reranked {
            let location = self
                .resolver
                .resolve(
                    company.id(),
                    company.name(),
                    company.record.address_hint.as_deref(),
                )
                .await;
            located.push(LocatedCandidate { company, location });
        }

        let eligibility = self.eligibility.evaluate(&located, requirement).await;

        Ok(Iteration {
            candidates_to_try,
            located,
            eligibility,
        })
    }

    fn decide(&self, iteration: Iteration) -> MatchState {
        let mut eligible = iteration.eligible();
        let candidates_to_try = iteration.candidates_to_try;

        debug!(
            candidates_to_try,
            located = iteration.located.len(),
            eligible = eligible.len(),
            "Iteration evaluated"
        );

        if iteration.located.is_empty() || eligible.len() >= self.config.threshold_count {
            eligible.truncate(self.config.threshold_count);
            MatchState::Finalizing {
                iteration,
                selected: eligible,
            }
        } else if candidates_to_try >= self.config.max_candidates {
            MatchState::Finalizing {
                iteration,
                selected: eligible,
            }
        } else {
            MatchState::Expanding {
                from: candidates_to_try,
            }
        }
    }

    async fn finalize(
        &self,
        incentive: &Incentive,
        iteration: &Iteration,
        selected: Vec<LocatedCandidate>,
        started: Instant,
    ) -> MatchResult {
        let scored = self
            .scorer
            .score(incentive, &selected, &iteration.eligibility)
            .await;

        let semantic_ranking: Vec<RankedCompany> = scored
            .iter()
            .enumerate()
            .map(|(i, s)| {
                RankedCompany::new(i + 1, &s.candidate.company, &s.candidate.location)
                    .with_score(s.final_score, s.components)
            })
            .collect();

        MatchResult {
            incentive_id: incentive.id.clone(),
            semantic_ranking,
            scored_ranking: scored_ranking(scored),
            candidates_searched: iteration.candidates_to_try,
            eligible_count: selected.len(),
            processing_time: started.elapsed(),
            processed_at: Utc::now(),
        }
    }
}

/// Score-ordered rows; semantic order is kept unless every company has a final score.
fn scored_ranking(mut scored: Vec<ScoredCompany>) -> Vec<RankedCompany> {
    if scored.iter().all(|s| s.final_score.is_some()) {
        scored.sort_by(|a, b| {
            b.final_score
                .unwrap_or_default()
                .total_cmp(&a.final_score.unwrap_or_default())
        });
    }

    scored
        .iter()
        .enumerate()
        .map(|(i, s)| {
            RankedCompany::new(i + 1, &s.candidate.company, &s.candidate.location)
                .with_score(s.final_score, s.components)
        })
        .collect()
}
