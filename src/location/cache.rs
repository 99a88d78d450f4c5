use moka::sync::Cache;

use super::LocationRecord;
use crate::domain::CompanyId;

/// In-process location tier.
///
/// Unbounded by default: one batch run keeps every resolved company. A capacity turns on
/// size-based eviction for long-lived processes.
#[derive(Clone)]
pub struct LocationCache {
    entries: Cache<CompanyId, LocationRecord>,
}

impl std::fmt::Debug for LocationCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocationCache")
            .field("entries", &self.entries.entry_count())
            .finish()
    }
}

impl Default for LocationCache {
    fn default() -> Self {
        Self::unbounded()
    }
}

impl LocationCache {
    pub fn unbounded() -> Self {
        Self {
            entries: Cache::builder().build(),
        }
    }

    pub fn with_capacity(capacity: u64) -> Self {
        Self {
            entries: Cache::builder().max_capacity(capacity).build(),
        }
    }

    pub fn from_capacity(capacity: Option<u64>) -> Self {
        capacity.map_or_else(Self::unbounded, Self::with_capacity)
    }

    #[inline]
    pub fn get(&self, company_id: CompanyId) -> Option<LocationRecord> {
        self.entries.get(&company_id)
    }

    #[inline]
    pub fn insert(&self, record: LocationRecord) {
        self.entries.insert(record.company_id, record);
    }

    #[inline]
    pub fn contains(&self, company_id: CompanyId) -> bool {
        self.entries.contains_key(&company_id)
    }

    /// Entry count after flushing pending maintenance.
    pub fn len(&self) -> u64 {
        self.entries.run_pending_tasks();
        self.entries.entry_count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.entries.invalidate_all();
        self.entries.run_pending_tasks();
    }
}
