use crate::academic::EntityKind;

/// Records removed by a delete, including dependents removed by cascade.
///
/// Empty when the requested identity did not exist.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeleteOutcome {
    removed: Vec<(EntityKind, i64)>,
}

impl DeleteOutcome {
    /// An outcome for a delete that matched nothing.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn new(removed: Vec<(EntityKind, i64)>) -> Self {
        Self { removed }
    }

    pub fn is_empty(&self) -> bool {
        self.removed.is_empty()
    }

    pub fn removed(&self) -> &[(EntityKind, i64)] {
        &self.removed
    }

    pub fn contains(&self, kind: EntityKind, id: i64) -> bool {
        self.removed.contains(&(kind, id))
    }

    pub fn push(&mut self, kind: EntityKind, id: i64) {
        self.removed.push((kind, id));
    }
}
