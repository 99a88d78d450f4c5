use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;

use super::{
    CompanyStore, IncentiveStore, LocationStore, MatchResult, ProgressReport, ResultStore,
    ReverseIndex, ScoredRanking, StoreError, StoreResult,
};
use crate::domain::{CompanyId, CompanyRecord, Incentive};
use crate::location::LocationRecord;

/// In-memory implementation of every store trait, with failure injection for tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    incentives: Mutex<BTreeMap<String, Incentive>>,
    companies: Mutex<HashMap<CompanyId, CompanyRecord>>,
    locations: Mutex<HashMap<CompanyId, LocationRecord>>,
    results: Mutex<BTreeMap<String, MatchResult>>,
    reverse_index: Mutex<ReverseIndex>,
    failing_saves: Mutex<HashSet<String>>,
    fail_location_reads: AtomicBool,
    fail_location_writes: AtomicBool,
    location_writes: AtomicUsize,
    match_saves: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_incentive(self, incentive: Incentive) -> Self {
        self.insert_incentive(incentive);
        self
    }

    pub fn with_company(self, company: CompanyRecord) -> Self {
        self.insert_company(company);
        self
    }

    pub fn with_location(self, record: LocationRecord) -> Self {
        self.locations.lock().insert(record.company_id, record);
        self
    }

    pub fn insert_incentive(&self, incentive: Incentive) {
        self.incentives.lock().insert(incentive.id.clone(), incentive);
    }

    pub fn insert_company(&self, company: CompanyRecord) {
        self.companies.lock().insert(company.id, company);
    }

    /// Makes `save_match` fail for one incentive.
    pub fn fail_saves_for(&self, incentive_id: &str) {
        self.failing_saves.lock().insert(incentive_id.to_string());
    }

    pub fn set_fail_location_reads(&self, fail: bool) {
        self.fail_location_reads.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_location_writes(&self, fail: bool) {
        self.fail_location_writes.store(fail, Ordering::SeqCst);
    }

    pub fn stored_location(&self, company_id: CompanyId) -> Option<LocationRecord> {
        self.locations.lock().get(&company_id).cloned()
    }

    pub fn location_writes(&self) -> usize {
        self.location_writes.load(Ordering::SeqCst)
    }

    pub fn result(&self, incentive_id: &str) -> Option<MatchResult> {
        self.results.lock().get(incentive_id).cloned()
    }

    pub fn result_count(&self) -> usize {
        self.results.lock().len()
    }

    pub fn match_saves(&self) -> usize {
        self.match_saves.load(Ordering::SeqCst)
    }

    pub fn reverse_index(&self) -> ReverseIndex {
        self.reverse_index.lock().clone()
    }

    fn is_processable(incentive: &Incentive) -> bool {
        incentive.sector.is_some()
            && incentive.eligible_actions.is_some()
            && incentive.geo_requirement.is_some()
            && incentive.description.is_some()
    }
}

#[async_trait]
impl CompanyStore for MemoryStore {
    async fn fetch_companies(&self, ids: &[CompanyId]) -> StoreResult<Vec<CompanyRecord>> {
        let companies = self.companies.lock();
        Ok(ids
            .iter()
            .filter_map(|id| companies.get(id).cloned())
            .collect())
    }
}

#[async_trait]
impl LocationStore for MemoryStore {
    async fn load_location(&self, company_id: CompanyId) -> StoreResult<Option<LocationRecord>> {
        if self.fail_location_reads.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable {
                reason: "location reads disabled".to_string(),
            });
        }
        Ok(self.locations.lock().get(&company_id).cloned())
    }

    async fn save_location(&self, record: &LocationRecord) -> StoreResult<()> {
        if self.fail_location_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable {
                reason: "location writes disabled".to_string(),
            });
        }
        self.location_writes.fetch_add(1, Ordering::SeqCst);

        let mut stored = record.clone();
        stored.status = stored.origin_status;
        self.locations.lock().insert(stored.company_id, stored);
        Ok(())
    }
}

#[async_trait]
impl IncentiveStore for MemoryStore {
    async fn fetch_incentive(&self, incentive_id: &str) -> StoreResult<Option<Incentive>> {
        Ok(self.incentives.lock().get(incentive_id).cloned())
    }

    async fn pending_incentives(&self) -> StoreResult<Vec<Incentive>> {
        let incentives = self.incentives.lock();
        let results = self.results.lock();
        Ok(incentives
            .values()
            .filter(|incentive| Self::is_processable(incentive))
            .filter(|incentive| {
                results
                    .get(&incentive.id)
                    .is_none_or(|result| result.scored_ranking.is_empty())
            })
            .cloned()
            .collect())
    }

    async fn progress(&self) -> StoreResult<ProgressReport> {
        let incentives = self.incentives.lock();
        let results = self.results.lock();
        let cutoff = Utc::now() - chrono::Duration::hours(24);

        let processed: Vec<&MatchResult> = results.values().collect();
        let average_processing_secs = if processed.is_empty() {
            None
        } else {
            let total: f64 = processed
                .iter()
                .map(|r| r.processing_time.as_secs_f64())
                .sum();
            Some(total / processed.len() as f64)
        };

        Ok(ProgressReport {
            total: incentives.len() as u64,
            processable: incentives
                .values()
                .filter(|i| Self::is_processable(i))
                .count() as u64,
            processed: processed.len() as u64,
            processed_last_24h: processed
                .iter()
                .filter(|r| r.processed_at > cutoff)
                .count() as u64,
            average_processing_secs,
        })
    }
}

#[async_trait]
impl ResultStore for MemoryStore {
    async fn save_match(&self, result: &MatchResult) -> StoreResult<()> {
        if self.failing_saves.lock().contains(&result.incentive_id) {
            return Err(StoreError::Unavailable {
                reason: format!("save disabled for {}", result.incentive_id),
            });
        }
        self.match_saves.fetch_add(1, Ordering::SeqCst);
        self.results
            .lock()
            .insert(result.incentive_id.clone(), result.clone());
        Ok(())
    }

    async fn scored_rankings(&self) -> StoreResult<Vec<ScoredRanking>> {
        let incentives = self.incentives.lock();
        Ok(self
            .results
            .lock()
            .values()
            .map(|result| ScoredRanking {
                incentive_id: result.incentive_id.clone(),
                title: incentives
                    .get(&result.incentive_id)
                    .map(|i| i.title.clone())
                    .unwrap_or_default(),
                companies: result.scored_ranking.clone(),
            })
            .collect())
    }

    async fn replace_reverse_index(&self, index: &ReverseIndex) -> StoreResult<()> {
        *self.reverse_index.lock() = index.clone();
        Ok(())
    }
}
