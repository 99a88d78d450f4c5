use serde::Serialize;

use super::ScoreComponents;
use crate::constants::SCORING_FORMULA;
use crate::domain::{CompanyId, Incentive};

#[derive(Serialize)]
struct FeatureRow<'a> {
    company_id: CompanyId,
    #[serde(flatten)]
    components: &'a ScoreComponents,
}

/// Builds the combination prompt for one incentive.
pub fn build_prompt(
    incentive: &Incentive,
    rows: &[(CompanyId, ScoreComponents)],
) -> Result<String, serde_json::Error> {
    let rows: Vec<FeatureRow<'_>> = rows
        .iter()
        .map(|(company_id, components)| FeatureRow {
            company_id: *company_id,
            components,
        })
        .collect();
    let features = serde_json::to_string_pretty(&rows)?;

    Ok(format!(
        "Compute a match score for each company against the incentive \"{title}\".\n\
         \n\
         Formula: FinalScore = {SCORING_FORMULA}\n\
         where s = semantic relevance, m = category match, g = geographic fit,\n\
         o = organisational capacity, w = website presence, and O' is derived from o and\n\
         org_direction:\n\
         - org_direction = 1: O' = o\n\
         - org_direction = -1: O' = 1 - o\n\
         - org_direction = 0: O' = 1 if o >= 0.9, otherwise 0.5\n\
         \n\
         Company features:\n\
         {features}\n\
         \n\
         Reply with only a JSON object mapping each company_id (as a string) to its\n\
         FinalScore between 0 and 1, for example {{\"123\": 0.82}}.",
        title = incentive.title,
    ))
}
