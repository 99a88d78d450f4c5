use std::sync::Arc;

use super::*;
use crate::location::{LocationRecord, LocationStatus};
use crate::reasoning::ScriptedReasoner;
use crate::test_support::{located, located_failed, located_ok, verdicts};

fn filter(reasoner: &Arc<ScriptedReasoner>) -> GeoEligibilityFilter {
    GeoEligibilityFilter::new(reasoner.clone())
}

#[tokio::test]
async fn test_no_trusted_location_skips_reasoning() {
    let reasoner = Arc::new(ScriptedReasoner::new().reply(verdicts(&[1, 2], true)));
    let candidates = vec![
        located_failed(1, LocationStatus::NotFound),
        located_failed(2, LocationStatus::RateLimited),
    ];

    let decision = filter(&reasoner).evaluate(&candidates, "Norte").await;

    assert_eq!(reasoner.call_count(), 0);
    assert_eq!(decision.len(), 2);
    assert_eq!(decision.eligible_count(), 0);
}

#[tokio::test]
async fn test_untrusted_candidates_stay_ineligible_even_if_affirmed() {
    let reasoner = Arc::new(ScriptedReasoner::new().reply(verdicts(&[1, 2, 3], true)));
    let candidates = vec![
        located_ok(1, 0.9),
        located_failed(2, LocationStatus::ApiError),
        located_ok(3, 0.7),
    ];

    let decision = filter(&reasoner).evaluate(&candidates, "Lisboa").await;

    assert!(decision.is_eligible(1));
    assert!(!decision.is_eligible(2));
    assert!(decision.is_eligible(3));

    let prompt = &reasoner.prompts()[0];
    assert!(prompt.contains("Company 1 "));
    assert!(!prompt.contains("Company 2 "));
    assert!(prompt.contains("Company 3 "));
}

#[tokio::test]
async fn test_empty_reply_marks_everyone_ineligible() {
    let reasoner = Arc::new(ScriptedReasoner::new().reply(""));
    let candidates: Vec<_> = (1..=4).map(|id| located_ok(id, 0.5)).collect();

    let decision = filter(&reasoner).evaluate(&candidates, "Centro").await;

    assert_eq!(reasoner.call_count(), 1);
    assert_eq!(decision.len(), 4);
    assert!(decision.iter().all(|(_, eligible)| !eligible));
}

#[tokio::test]
async fn test_reasoning_failure_marks_everyone_ineligible() {
    let reasoner = Arc::new(ScriptedReasoner::new().fail());
    let candidates = vec![located_ok(1, 0.5), located_ok(2, 0.4)];

    let decision = filter(&reasoner).evaluate(&candidates, "Algarve").await;

    assert_eq!(decision.len(), 2);
    assert_eq!(decision.eligible_count(), 0);
}

#[tokio::test]
async fn test_non_boolean_and_missing_verdicts_are_false() {
    let reasoner = Arc::new(
        ScriptedReasoner::new().reply("Result: {\"1\": \"yes\", \"2\": 1, \"3\": true} thanks"),
    );
    let candidates: Vec<_> = (1..=4).map(|id| located_ok(id, 0.5)).collect();

    let decision = filter(&reasoner).evaluate(&candidates, "Nacional").await;

    assert!(!decision.is_eligible(1));
    assert!(!decision.is_eligible(2));
    assert!(decision.is_eligible(3));
    assert!(!decision.is_eligible(4));
    assert_eq!(decision.len(), 4);
}

#[tokio::test]
async fn test_cached_success_is_trusted_but_cached_failure_is_not() {
    let reasoner = Arc::new(ScriptedReasoner::new().reply(verdicts(&[1, 2], true)));

    let cached_success = LocationRecord::resolved(1, 41.15, -8.61, "Porto").into_cached();
    let cached_failure = LocationRecord::unresolved(2, LocationStatus::NotFound).into_cached();
    let candidates = vec![
        located(1, "Norte SA", 0.8, cached_success),
        located(2, "Sul Lda", 0.8, cached_failure),
    ];

    let decision = filter(&reasoner).evaluate(&candidates, "Norte").await;

    assert!(decision.is_eligible(1));
    assert!(!decision.is_eligible(2));
}

#[test]
fn test_prompt_lists_requirement_regions_and_companies() {
    let a = located_ok(10, 0.9);
    let b = located_ok(11, 0.8);

    let prompt = build_prompt("Alentejo", &[&a, &b]);

    assert!(prompt.contains("\"Alentejo\""));
    assert!(prompt.contains("NUTS II regions: Norte, Centro, Lisboa"));
    assert!(prompt.contains("\"Nacional\" means anywhere in Portugal"));
    assert!(prompt.contains("Company 10 (Empresa 10 Lda): Avenida da Liberdade 1, Lisboa"));
    assert!(prompt.contains("Company 11 (Empresa 11 Lda)"));
}

#[test]
fn test_decision_defaults_to_ineligible() {
    let decision = EligibilityDecision::all_ineligible([1, 2]);

    assert!(!decision.is_eligible(1));
    assert!(!decision.is_eligible(99));
    assert!(decision.contains(2));
    assert!(!decision.contains(99));
}
