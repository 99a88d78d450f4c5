use serde::{Deserialize, Serialize};

use crate::constants::{
    WEIGHT_CATEGORY, WEIGHT_GEOGRAPHIC, WEIGHT_ORG_FIT, WEIGHT_SEMANTIC, WEIGHT_WEBSITE,
};

/// Which organisation size an incentive favours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "i8", try_from = "i8")]
pub enum OrgDirection {
    /// Small businesses and startups (-1).
    Smaller,
    /// Social economy or no preference (0).
    Neutral,
    /// Large or institutional organisations (+1).
    Larger,
}

impl From<OrgDirection> for i8 {
    fn from(direction: OrgDirection) -> Self {
        match direction {
            OrgDirection::Smaller => -1,
            OrgDirection::Neutral => 0,
            OrgDirection::Larger => 1,
        }
    }
}

impl TryFrom<i8> for OrgDirection {
    type Error = String;

    fn try_from(value: i8) -> Result<Self, Self::Error> {
        match value {
            -1 => Ok(OrgDirection::Smaller),
            0 => Ok(OrgDirection::Neutral),
            1 => Ok(OrgDirection::Larger),
            other => Err(format!("org direction must be -1, 0 or 1, got {other}")),
        }
    }
}

/// Per-company scoring signals.
///
/// Serialized with the short keys used in stored rankings and in the scoring prompt.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreComponents {
    /// S: normalized semantic score.
    #[serde(rename = "s")]
    pub semantic: f64,
    /// M: category/activity keyword overlap.
    #[serde(rename = "m")]
    pub category_match: f64,
    /// G: geographic fit (0, 0.5 or 1).
    #[serde(rename = "g")]
    pub geographic: f64,
    /// O: organisational capacity from the legal form.
    #[serde(rename = "o")]
    pub org_fit: f64,
    pub org_direction: OrgDirection,
    /// W: website presence (0 or 1).
    #[serde(rename = "w")]
    pub website: f64,
}

impl ScoreComponents {
    /// O′: organisational fit adjusted for the incentive's preferred direction.
    pub fn contextual_org_fit(&self) -> f64 {
        match self.org_direction {
            OrgDirection::Larger => self.org_fit,
            OrgDirection::Smaller => 1.0 - self.org_fit,
            OrgDirection::Neutral if self.org_fit >= 0.9 => 1.0,
            OrgDirection::Neutral => 0.5,
        }
    }

    /// Local evaluation of the match formula.
    pub fn weighted_total(&self) -> f64 {
        WEIGHT_SEMANTIC * self.semantic
            + WEIGHT_CATEGORY * self.category_match
            + WEIGHT_GEOGRAPHIC * self.geographic
            + WEIGHT_ORG_FIT * self.contextual_org_fit()
            + WEIGHT_WEBSITE * self.website
    }

    pub fn in_range(&self) -> bool {
        let unit = |v: f64| (0.0..=1.0).contains(&v);
        unit(self.semantic)
            && unit(self.category_match)
            && [0.0, 0.5, 1.0].contains(&self.geographic)
            && unit(self.org_fit)
            && (self.website == 0.0 || self.website == 1.0)
    }
}
