use mapcore::VisitFeed;
use serde::{Deserialize, Serialize};

/// Feed currently served to map hosts.
///
/// `revision` increases on every replacement so pollers can skip
/// unchanged payloads.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FeedModel {
    pub feed: VisitFeed,
    pub revision: u64,
}

impl FeedModel {
    pub fn replace(&mut self, feed: VisitFeed) -> u64 {
        self.feed = feed.normalized();
        self.revision += 1;
        self.revision
    }
}
