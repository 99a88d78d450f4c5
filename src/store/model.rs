use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::{ACTIVITY_PREVIEW_CHARS, SCORING_FORMULA};
use crate::domain::{CandidateCompany, CompanyId, IncentiveId};
use crate::location::LocationRecord;
use crate::scoring::ScoreComponents;

/// One row of a persisted ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedCompany {
    pub id: CompanyId,
    /// 1-based position in its ranking.
    pub rank: usize,
    /// Rerank score (or retrieval score when reranking degraded).
    pub semantic_score: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score_components: Option<ScoreComponents>,
    pub name: String,
    pub cae_classification: Option<String>,
    pub website: Option<String>,
    pub location_address: Option<String>,
    pub activities: Option<String>,
}

impl RankedCompany {
    pub fn new(rank: usize, company: &CandidateCompany, location: &LocationRecord) -> Self {
        Self {
            id: company.id(),
            rank,
            semantic_score: company.rerank_score,
            company_score: None,
            score_components: None,
            name: company.record.name.clone(),
            cae_classification: company.record.category_label.clone(),
            website: company.record.website.clone(),
            location_address: location.address().map(str::to_string),
            activities: company
                .record
                .activity
                .as_deref()
                .filter(|a| !a.is_empty())
                .map(|a| a.chars().take(ACTIVITY_PREVIEW_CHARS).collect()),
        }
    }

    pub fn with_score(mut self, final_score: Option<f64>, components: ScoreComponents) -> Self {
        self.company_score = final_score;
        self.score_components = Some(components);
        self
    }
}

/// Outcome of one orchestrator run for one incentive.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchResult {
    pub incentive_id: IncentiveId,
    /// Ordered by rerank score.
    pub semantic_ranking: Vec<RankedCompany>,
    /// Ordered by final score, or identical to the semantic order when scoring degraded.
    pub scored_ranking: Vec<RankedCompany>,
    pub candidates_searched: usize,
    pub eligible_count: usize,
    pub processing_time: Duration,
    pub processed_at: DateTime<Utc>,
}

/// JSON stored for the semantic ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SemanticDocument {
    pub companies: Vec<RankedCompany>,
    pub total_candidates_searched: usize,
    /// Seconds.
    pub processing_time: f64,
    pub processed_at: DateTime<Utc>,
    pub geographic_eligible_count: usize,
}

/// JSON stored for the score-ordered ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredDocument {
    pub companies: Vec<RankedCompany>,
    /// Seconds.
    pub processing_time: f64,
    pub processed_at: DateTime<Utc>,
    pub scoring_formula: String,
}

impl MatchResult {
    pub fn is_empty(&self) -> bool {
        self.semantic_ranking.is_empty()
    }

    pub fn semantic_document(&self) -> SemanticDocument {
        SemanticDocument {
            companies: self.semantic_ranking.clone(),
            total_candidates_searched: self.candidates_searched,
            processing_time: self.processing_time.as_secs_f64(),
            processed_at: self.processed_at,
            geographic_eligible_count: self.eligible_count,
        }
    }

    pub fn scored_document(&self) -> ScoredDocument {
        ScoredDocument {
            companies: self.scored_ranking.clone(),
            processing_time: self.processing_time.as_secs_f64(),
            processed_at: self.processed_at,
            scoring_formula: SCORING_FORMULA.to_string(),
        }
    }
}

/// A persisted score-ordered ranking, as read back for the reverse index.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredRanking {
    pub incentive_id: IncentiveId,
    pub title: String,
    pub companies: Vec<RankedCompany>,
}

/// One incentive listed under a company in the reverse index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReverseIndexEntry {
    pub incentive_id: IncentiveId,
    pub title: String,
    pub rank: usize,
    pub company_score: f64,
}

/// Batch progress counters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProgressReport {
    pub total: u64,
    /// Incentives with every matching field present.
    pub processable: u64,
    /// Incentives with a semantic ranking stored.
    pub processed: u64,
    pub processed_last_24h: u64,
    pub average_processing_secs: Option<f64>,
}

impl ProgressReport {
    pub fn remaining(&self) -> u64 {
        self.processable.saturating_sub(self.processed)
    }

    /// Fraction of processable incentives already processed, in percent.
    pub fn percent_complete(&self) -> f64 {
        if self.processable == 0 {
            return 0.0;
        }
        (self.processed.min(self.processable) as f64 / self.processable as f64) * 100.0
    }
}
