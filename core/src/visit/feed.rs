use serde::{Deserialize, Serialize};

use crate::prelude::MapResult;
use crate::visit::record::{VisitId, VisitRecord};
use crate::visit::summary::VisitSummary;

/// Envelope returned by the backend visit endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VisitFeed {
    #[serde(default)]
    pub visits: Vec<VisitRecord>,
    #[serde(default)]
    pub total_count: usize,
}

impl VisitFeed {
    pub fn new(visits: Vec<VisitRecord>) -> Self {
        let total_count = visits.len();
        Self {
            visits,
            total_count,
        }
    }

    pub fn from_json(input: &str) -> MapResult<Self> {
        let feed: VisitFeed = serde_json::from_str(input)?;
        Ok(feed.normalized())
    }

    pub fn to_json(&self) -> MapResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Reconciles `total_count` with the records actually present.
    pub fn normalized(mut self) -> Self {
        self.total_count = self.total_count.max(self.visits.len());
        self
    }

    pub fn len(&self) -> usize {
        self.visits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.visits.is_empty()
    }

    pub fn find(&self, id: &VisitId) -> Option<&VisitRecord> {
        self.visits.iter().find(|visit| &visit.id == id)
    }

    /// Copy sorted oldest first; records without a timestamp keep their
    /// relative order at the end.
    pub fn chronological(&self) -> Vec<VisitRecord> {
        let mut visits = self.visits.clone();
        visits.sort_by(|a, b| match (a.visited_at, b.visited_at) {
            (Some(a), Some(b)) => a.cmp(&b),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => std::cmp::Ordering::Equal,
        });
        visits
    }

    pub fn summary(&self) -> VisitSummary {
        VisitSummary::from_visits(&self.visits)
    }
}
