//! Fail-closed geographic eligibility.
//!
//! Only candidates with a trusted location reach the reasoning service. Anything the reply
//! does not affirm with a JSON `true` is ineligible.

mod decision;
mod prompt;

#[cfg(test)]
mod tests;

pub use decision::EligibilityDecision;
pub use prompt::build_prompt;

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use crate::domain::LocatedCandidate;
use crate::reasoning::{ReasoningClient, extract_json_object};

pub struct GeoEligibilityFilter {
    reasoner: Arc<dyn ReasoningClient>,
}

impl GeoEligibilityFilter {
    pub fn new(reasoner: Arc<dyn ReasoningClient>) -> Self {
        Self { reasoner }
    }

    /// Returns a verdict for every supplied candidate.
    #[instrument(skip_all, fields(candidates = candidates.len(), requirement = %requirement))]
    pub async fn evaluate(
        &self,
        candidates: &[LocatedCandidate],
        requirement: &str,
    ) -> EligibilityDecision {
        let mut decision = EligibilityDecision::all_ineligible(candidates.iter().map(|c| c.id()));

        let trusted: Vec<&LocatedCandidate> = candidates
            .iter()
            .filter(|c| c.location.is_trusted())
            .collect();

        if trusted.is_empty() {
            debug!("No candidate has a trusted location, skipping reasoning call");
            return decision;
        }

        let prompt = build_prompt(requirement, &trusted);

        let reply = match self.reasoner.complete(&prompt).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!(error = %e, "Eligibility reasoning failed, marking all ineligible");
                return decision;
            }
        };

        let verdicts = match extract_json_object(&reply) {
            Ok(map) => map,
            Err(e) => {
                warn!(error = %e, "Unparseable eligibility reply, marking all ineligible");
                return decision;
            }
        };

        for candidate in trusted {
            let key = candidate.id().to_string();
            match verdicts.get(&key) {
                Some(Value::Bool(eligible)) => decision.set(candidate.id(), *eligible),
                Some(other) => {
                    debug!(company_id = candidate.id(), value = %other, "Non-boolean verdict");
                }
                None => debug!(company_id = candidate.id(), "Verdict missing"),
            }
        }

        info!(
            eligible = decision.eligible_count(),
            evaluated = decision.len(),
            "Eligibility evaluated"
        );
        decision
    }
}
