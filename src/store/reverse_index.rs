use std::cmp::Ordering;
use std::collections::BTreeMap;

use tracing::{info, instrument};

use super::{ResultStore, ReverseIndexEntry, ScoredRanking, StoreResult};
use crate::constants::REVERSE_INDEX_LIMIT;
use crate::domain::CompanyId;

/// Company id → best incentives for that company, highest score first.
pub type ReverseIndex = BTreeMap<CompanyId, Vec<ReverseIndexEntry>>;

/// Groups rankings by company, sorts by final score descending and keeps the top entries.
///
/// A missing final score counts as 0. Ties keep ranking order (the sort is stable).
pub fn build_reverse_index(rankings: &[ScoredRanking]) -> ReverseIndex {
    let mut index = ReverseIndex::new();

    for ranking in rankings {
        for company in &ranking.companies {
            index.entry(company.id).or_default().push(ReverseIndexEntry {
                incentive_id: ranking.incentive_id.clone(),
                title: ranking.title.clone(),
                rank: company.rank,
                company_score: company.company_score.unwrap_or(0.0),
            });
        }
    }

    for entries in index.values_mut() {
        entries.sort_by(|a, b| {
            b.company_score
                .partial_cmp(&a.company_score)
                .unwrap_or(Ordering::Equal)
        });
        entries.truncate(REVERSE_INDEX_LIMIT);
    }

    index
}

/// Full pass: reads every scored ranking and replaces the stored index. Returns the number
/// of companies indexed.
#[instrument(skip(store))]
pub async fn rebuild_reverse_index(store: &dyn ResultStore) -> StoreResult<usize> {
    let rankings = store.scored_rankings().await?;
    let index = build_reverse_index(&rankings);

    store.replace_reverse_index(&index).await?;

    info!(
        incentives = rankings.len(),
        companies = index.len(),
        "Reverse index rebuilt"
    );
    Ok(index.len())
}
