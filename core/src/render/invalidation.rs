use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use crate::geometry::Viewport;
use crate::render::theme::ThemeConfig;
use crate::visit::{VisitId, VisitRecord};

/// Everything a frame depends on.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameKey {
    visits: u64,
    selection: Option<VisitId>,
    theme: ThemeConfig,
    viewport: Viewport,
}

impl FrameKey {
    pub fn new(
        visits: &[VisitRecord],
        selection: Option<&VisitId>,
        theme: &ThemeConfig,
        viewport: Viewport,
    ) -> Self {
        Self {
            visits: fingerprint(visits),
            selection: selection.cloned(),
            theme: theme.clone(),
            viewport,
        }
    }
}

/// Hash of the visit fields that influence drawing, in input order.
pub fn fingerprint(visits: &[VisitRecord]) -> u64 {
    let mut hasher = DefaultHasher::new();
    visits.len().hash(&mut hasher);
    for visit in visits {
        visit.id.hash(&mut hasher);
        visit.place_name.hash(&mut hasher);
        visit.latitude.to_bits().hash(&mut hasher);
        visit.longitude.to_bits().hash(&mut hasher);
        visit.accent_color.hash(&mut hasher);
    }
    hasher.finish()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedrawReason {
    Initial,
    /// The surface changed size or density; reallocate the backing store.
    Resize { width: u32, height: u32 },
    Visits,
    Theme,
    Selection,
}

/// Decides when a host must repaint. Any change triggers a full redraw.
#[derive(Debug, Default)]
pub struct RedrawTracker {
    last: Option<FrameKey>,
}

impl RedrawTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn observe(&mut self, key: FrameKey) -> Option<RedrawReason> {
        let reason = match &self.last {
            None => Some(RedrawReason::Initial),
            Some(last) if last.viewport != key.viewport => {
                let (width, height) = key.viewport.backing_size();
                Some(RedrawReason::Resize { width, height })
            }
            Some(last) if last.visits != key.visits => Some(RedrawReason::Visits),
            Some(last) if last.theme != key.theme => Some(RedrawReason::Theme),
            Some(last) if last.selection != key.selection => Some(RedrawReason::Selection),
            Some(_) => None,
        };
        self.last = Some(key);
        reason
    }

    pub fn reset(&mut self) {
        self.last = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn visits() -> Vec<VisitRecord> {
        vec![
            VisitRecord::new(1, "a", 37.56, 126.92),
            VisitRecord::new(2, "b", 37.55, 127.00),
        ]
    }

    #[test]
    fn each_input_change_triggers_redraw() {
        let mut tracker = RedrawTracker::new();
        let theme = ThemeConfig::dark();
        let viewport = Viewport::new(360.0, 280.0);
        let visits = visits();

        assert_eq!(
            tracker.observe(FrameKey::new(&visits, None, &theme, viewport)),
            Some(RedrawReason::Initial)
        );
        assert_eq!(
            tracker.observe(FrameKey::new(&visits, None, &theme, viewport)),
            None
        );
        let selected = VisitId::Number(1);
        assert_eq!(
            tracker.observe(FrameKey::new(&visits, Some(&selected), &theme, viewport)),
            Some(RedrawReason::Selection)
        );
        assert_eq!(
            tracker.observe(FrameKey::new(
                &visits,
                Some(&selected),
                &ThemeConfig::light(),
                viewport
            )),
            Some(RedrawReason::Theme)
        );
        let resized = viewport.with_pixel_ratio(2.0);
        assert_eq!(
            tracker.observe(FrameKey::new(
                &visits,
                Some(&selected),
                &ThemeConfig::light(),
                resized
            )),
            Some(RedrawReason::Resize {
                width: 720,
                height: 560
            })
        );
    }

    #[test]
    fn reordering_visits_changes_fingerprint() {
        let forward = visits();
        let reversed: Vec<_> = forward.iter().rev().cloned().collect();
        assert_ne!(fingerprint(&forward), fingerprint(&reversed));
        assert_eq!(fingerprint(&forward), fingerprint(&visits()));
    }
}
