use std::collections::BTreeMap;

use crate::domain::CompanyId;

/// Per-candidate eligibility verdicts. Unknown ids are ineligible.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EligibilityDecision {
    verdicts: BTreeMap<CompanyId, bool>,
}

impl EligibilityDecision {
    pub fn all_ineligible(ids: impl IntoIterator<Item = CompanyId>) -> Self {
        Self {
            verdicts: ids.into_iter().map(|id| (id, false)).collect(),
        }
    }

    pub(crate) fn set(&mut self, id: CompanyId, eligible: bool) {
        self.verdicts.insert(id, eligible);
    }

    pub fn is_eligible(&self, id: CompanyId) -> bool {
        self.verdicts.get(&id).copied().unwrap_or(false)
    }

    pub fn contains(&self, id: CompanyId) -> bool {
        self.verdicts.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.verdicts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.verdicts.is_empty()
    }

    pub fn eligible_count(&self) -> usize {
        self.verdicts.values().filter(|v| **v).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = (CompanyId, bool)> + '_ {
        self.verdicts.iter().map(|(id, v)| (*id, *v))
    }
}
