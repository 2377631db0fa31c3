pub mod point;
pub mod projection;

pub use point::{Point, Rect, Size, Viewport};
pub use projection::{GeoBounds, ProjectionOptions, Projector};
