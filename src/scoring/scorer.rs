use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::{debug, info, instrument, warn};

use super::error::ScoringError;
use super::features::{
    category_match, geographic_fit, normalize_semantic, org_direction, org_fit, website_presence,
};
use super::prompt::build_prompt;
use super::ScoreComponents;
use crate::constants::SCORE_DEVIATION_TOLERANCE;
use crate::domain::{CompanyId, Incentive, LocatedCandidate};
use crate::eligibility::EligibilityDecision;
use crate::reasoning::{ReasoningClient, ReasoningError, extract_json_object};

/// A finalized candidate with its signals and, when the combination succeeded, its score.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredCompany {
    pub candidate: LocatedCandidate,
    pub components: ScoreComponents,
    pub final_score: Option<f64>,
}

impl ScoredCompany {
    pub fn id(&self) -> CompanyId {
        self.candidate.id()
    }
}

pub struct CompanyScorer {
    reasoner: Arc<dyn ReasoningClient>,
}

impl CompanyScorer {
    pub fn new(reasoner: Arc<dyn ReasoningClient>) -> Self {
        Self { reasoner }
    }

    /// Local signals for every company, in input order.
    pub fn components(
        incentive: &Incentive,
        companies: &[LocatedCandidate],
        eligibility: &EligibilityDecision,
    ) -> Vec<ScoreComponents> {
        let raw: Vec<f64> = companies
            .iter()
            .map(|c| f64::from(c.company.rerank_score))
            .collect();
        let semantic = normalize_semantic(&raw);
        let direction = org_direction(incentive);

        companies
            .iter()
            .zip(semantic)
            .map(|(c, s)| {
                let record = &c.company.record;
                ScoreComponents {
                    semantic: s,
                    category_match: category_match(incentive, record),
                    geographic: geographic_fit(eligibility.is_eligible(c.id()), &c.location),
                    org_fit: org_fit(&record.name),
                    org_direction: direction,
                    website: website_presence(record.website.as_deref()),
                }
            })
            .collect()
    }

    /// Scores `companies` in input order.
    ///
    /// `final_score` is set for all companies or for none.
    #[instrument(skip_all, fields(incentive_id = %incentive.id, companies = companies.len()))]
    pub async fn score(
        &self,
        incentive: &Incentive,
        companies: &[LocatedCandidate],
        eligibility: &EligibilityDecision,
    ) -> Vec<ScoredCompany> {
        let components = Self::components(incentive, companies, eligibility);

        let finals = if companies.is_empty() {
            None
        } else {
            let rows: Vec<(CompanyId, ScoreComponents)> = companies
                .iter()
                .map(LocatedCandidate::id)
                .zip(components.iter().copied())
                .collect();

            match self.combine(incentive, &rows).await {
                Ok(scores) => {
                    info!(scored = scores.len(), "Final scores accepted");
                    Some(scores)
                }
                Err(e) => {
                    warn!(error = %e, "Score combination rejected, keeping semantic order");
                    None
                }
            }
        };

        companies
            .iter()
            .zip(components)
            .map(|(candidate, components)| ScoredCompany {
                final_score: finals.as_ref().and_then(|f| f.get(&candidate.id()).copied()),
                candidate: candidate.clone(),
                components,
            })
            .collect()
    }

    async fn combine(
        &self,
        incentive: &Incentive,
        rows: &[(CompanyId, ScoreComponents)],
    ) -> Result<BTreeMap<CompanyId, f64>, ScoringError> {
        let prompt = build_prompt(incentive, rows).map_err(ReasoningError::from)?;
        let reply = self.reasoner.complete(&prompt).await?;
        let map = extract_json_object(&reply)?;

        let scores = parse_scores(&map, rows.iter().map(|(id, _)| *id))?;

        for (id, components) in rows {
            let local = components.weighted_total();
            let delegated = scores[id];
            if (local - delegated).abs() > SCORE_DEVIATION_TOLERANCE {
                warn!(
                    company_id = id,
                    local,
                    delegated,
                    "Delegated score deviates from the local formula"
                );
            } else {
                debug!(company_id = id, score = delegated, "Score accepted");
            }
        }

        Ok(scores)
    }
}

/// Requires a finite number in [0, 1] for every expected id.
fn parse_scores(
    map: &Map<String, Value>,
    expected: impl IntoIterator<Item = CompanyId>,
) -> Result<BTreeMap<CompanyId, f64>, ScoringError> {
    expected
        .into_iter()
        .map(|company_id| {
            let value = map
                .get(&company_id.to_string())
                .ok_or(ScoringError::MissingScore { company_id })?
                .as_f64()
                .ok_or(ScoringError::NotNumeric { company_id })?;

            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(ScoringError::OutOfRange { company_id, value });
            }
            Ok((company_id, value))
        })
        .collect()
}
