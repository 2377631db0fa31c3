pub mod selection;

pub use hit_test::{HitPolicy, HitTester, PointerEvent};
pub use selection::{next_selection, SelectionState};
