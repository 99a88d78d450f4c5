use serde::{Deserialize, Serialize};

pub type IncentiveId = String;

/// A funding incentive as loaded from the incentive store.
///
/// Immutable for the duration of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Incentive {
    pub id: IncentiveId,
    pub title: String,
    pub sector: Option<String>,
    pub geo_requirement: Option<String>,
    pub eligible_actions: Option<String>,
    pub description: Option<String>,
}

impl Incentive {
    pub fn new(id: impl Into<IncentiveId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            sector: None,
            geo_requirement: None,
            eligible_actions: None,
            description: None,
        }
    }

    pub fn with_sector(mut self, sector: impl Into<String>) -> Self {
        self.sector = Some(sector.into());
        self
    }

    pub fn with_geo_requirement(mut self, requirement: impl Into<String>) -> Self {
        self.geo_requirement = Some(requirement.into());
        self
    }

    pub fn with_eligible_actions(mut self, actions: impl Into<String>) -> Self {
        self.eligible_actions = Some(actions.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Retrieval query: title, sector, description and eligible actions, skipping empties.
    pub fn query_text(&self) -> String {
        [
            Some(self.title.as_str()),
            self.sector.as_deref(),
            self.description.as_deref(),
            self.eligible_actions.as_deref(),
        ]
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
    }

    /// Geographic requirement, if present and non-blank.
    pub fn geo_requirement(&self) -> Option<&str> {
        self.geo_requirement
            .as_deref()
            .map(str::trim)
            .filter(|r| !r.is_empty())
    }

    pub(crate) fn sector_text(&self) -> &str {
        self.sector.as_deref().unwrap_or_default()
    }

    pub(crate) fn actions_text(&self) -> &str {
        self.eligible_actions.as_deref().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_text_orders_fields_and_skips_empties() {
        let incentive = Incentive::new("INC-1", "Apoio à inovação")
            .with_sector("Indústria")
            .with_description("   ")
            .with_eligible_actions("Aquisição de equipamento");

        assert_eq!(
            incentive.query_text(),
            "Apoio à inovação Indústria Aquisição de equipamento"
        );
    }

    #[test]
    fn test_query_text_includes_description_before_actions() {
        let incentive = Incentive::new("INC-2", "T")
            .with_sector("S")
            .with_description("D")
            .with_eligible_actions("A");

        assert_eq!(incentive.query_text(), "T S D A");
    }

    #[test]
    fn test_blank_geo_requirement_is_none() {
        let incentive = Incentive::new("INC-3", "T").with_geo_requirement("  ");
        assert!(incentive.geo_requirement().is_none());

        let incentive = Incentive::new("INC-3", "T").with_geo_requirement(" Norte ");
        assert_eq!(incentive.geo_requirement(), Some("Norte"));
    }
}
