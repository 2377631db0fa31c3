//! Core of the exploration map: visit records, geographic projection, scene
//! rendering, hit-testing and theming.
//!
//! Rendering produces a [`render::Scene`], an ordered display list that hosts
//! replay onto their own drawing surface. Nothing here depends on a UI toolkit.

pub mod geometry;
pub mod interaction;
pub mod prelude;
pub mod render;
pub mod telemetry;
pub mod visit;

pub use prelude::{Layer, MapError, MapResult, RenderOptions};
pub use render::{ExplorationMapRenderer, MapFrame, Scene};
pub use visit::{VisitFeed, VisitId, VisitRecord};
