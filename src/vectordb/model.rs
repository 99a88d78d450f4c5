use std::collections::HashMap;

use qdrant_client::qdrant::ScoredPoint;
use qdrant_client::qdrant::point_id::PointIdOptions;

use crate::domain::CompanyId;

/// One company returned by a similarity search.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit {
    pub id: CompanyId,
    pub score: f32,
    /// String payload fields of the point.
    pub attributes: HashMap<String, String>,
}

impl SearchHit {
    pub fn new(id: CompanyId, score: f32) -> Self {
        Self {
            id,
            score,
            attributes: HashMap::new(),
        }
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Converts a Qdrant point. Points without a numeric id are dropped.
    pub fn from_scored_point(point: ScoredPoint) -> Option<Self> {
        let id = match point.id.and_then(|pid| pid.point_id_options) {
            Some(PointIdOptions::Num(n)) => CompanyId::try_from(n).ok()?,
            _ => return None,
        };

        let attributes = point
            .payload
            .iter()
            .filter_map(|(key, value)| value.as_str().map(|s| (key.clone(), s.to_string())))
            .collect();

        Some(Self {
            id,
            score: point.score,
            attributes,
        })
    }
}
