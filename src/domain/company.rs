use serde::{Deserialize, Serialize};

use crate::location::LocationRecord;

pub type CompanyId = i64;

/// Company row as stored in the company store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyRecord {
    pub id: CompanyId,
    pub name: String,
    pub category_label: Option<String>,
    pub activity: Option<String>,
    pub website: Option<String>,
    /// Free-text address hint used to disambiguate geocoding queries.
    pub address_hint: Option<String>,
}

impl CompanyRecord {
    pub fn new(id: CompanyId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            category_label: None,
            activity: None,
            website: None,
            address_hint: None,
        }
    }

    pub fn with_category(mut self, label: impl Into<String>) -> Self {
        self.category_label = Some(label.into());
        self
    }

    pub fn with_activity(mut self, activity: impl Into<String>) -> Self {
        self.activity = Some(activity.into());
        self
    }

    pub fn with_website(mut self, website: impl Into<String>) -> Self {
        self.website = Some(website.into());
        self
    }

    pub fn with_address_hint(mut self, hint: impl Into<String>) -> Self {
        self.address_hint = Some(hint.into());
        self
    }
}

/// A company considered during one expansion iteration.
///
/// `rerank_score` equals `retrieval_score` until the reranker assigns one.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateCompany {
    pub record: CompanyRecord,
    pub retrieval_score: f32,
    pub rerank_score: f32,
}

impl CandidateCompany {
    pub fn new(record: CompanyRecord, retrieval_score: f32) -> Self {
        Self {
            record,
            retrieval_score,
            rerank_score: retrieval_score,
        }
    }

    #[inline]
    pub fn id(&self) -> CompanyId {
        self.record.id
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.record.name
    }

    /// Reranker document: `name category activity`.
    pub fn document(&self) -> String {
        format!(
            "{} {} {}",
            self.record.name,
            self.record.category_label.as_deref().unwrap_or_default(),
            self.record.activity.as_deref().unwrap_or_default()
        )
    }
}

/// Candidate paired with its resolved location.
#[derive(Debug, Clone, PartialEq)]
pub struct LocatedCandidate {
    pub company: CandidateCompany,
    pub location: LocationRecord,
}

impl LocatedCandidate {
    #[inline]
    pub fn id(&self) -> CompanyId {
        self.company.id()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rerank_score_starts_at_retrieval_score() {
        let candidate = CandidateCompany::new(CompanyRecord::new(7, "Acme"), 0.42);
        assert_eq!(candidate.rerank_score, 0.42);
        assert_eq!(candidate.id(), 7);
    }

    #[test]
    fn test_document_joins_name_category_activity() {
        let record = CompanyRecord::new(1, "Metalúrgica Lda")
            .with_category("Fabricação de estruturas metálicas")
            .with_activity("Serralharia");
        let candidate = CandidateCompany::new(record, 0.5);

        assert_eq!(
            candidate.document(),
            "Metalúrgica Lda Fabricação de estruturas metálicas Serralharia"
        );
    }
}
