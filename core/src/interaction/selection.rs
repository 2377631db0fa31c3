use crate::visit::VisitId;

/// Selection after a click: hitting the selected visit clears it, hitting
/// another visit selects it, hitting nothing clears.
pub fn next_selection(current: Option<&VisitId>, hit: Option<VisitId>) -> Option<VisitId> {
    match hit {
        Some(id) if current == Some(&id) => None,
        other => other,
    }
}

/// Host-owned selection; the renderer only ever reads it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionState {
    selected: Option<VisitId>,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected(&self) -> Option<&VisitId> {
        self.selected.as_ref()
    }

    pub fn is_selected(&self, id: &VisitId) -> bool {
        self.selected.as_ref() == Some(id)
    }

    /// Replaces the selection, returning whether it changed.
    pub fn set(&mut self, selected: Option<VisitId>) -> bool {
        let changed = self.selected != selected;
        self.selected = selected;
        changed
    }

    pub fn clear(&mut self) -> bool {
        self.set(None)
    }
}
