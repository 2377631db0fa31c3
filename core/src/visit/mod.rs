pub mod feed;
pub mod record;
pub mod summary;

pub use feed::VisitFeed;
pub use record::{VisitId, VisitRecord};
pub use summary::{CategoryShare, VisitSummary};
