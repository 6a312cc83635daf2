

use super::change_set::{ChangeSet, ChangeSetKind};

/// The change sets computed for a single flush cycle.
///
/// Subscribers get a mutable slice only, so they can rewrite records in place
/// but never add, drop, or reorder them.
#[derive(Debug, Default)]
pub struct UnitOfWork {
    change_sets: Vec<ChangeSet>,
}

impl UnitOfWork {
    
    pub fn new(change_sets: Vec<ChangeSet>) -> Self {
        Self { change_sets }
    }

    pub fn change_sets(&self) -> &[ChangeSet] {
        &self.change_sets
    }

    pub fn change_sets_mut(&mut self) -> &mut [ChangeSet] {
        &mut self.change_sets
    }

    pub fn len(&self) -> usize {
        self.change_sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.change_sets.is_empty()
    }

    pub fn count(&self, kind: ChangeSetKind) -> usize {
        self.change_sets.iter().filter(|cs| cs.kind == kind).count()
    }

    pub fn into_change_sets(self) -> Vec<ChangeSet> {
        self.change_sets
    }
}
