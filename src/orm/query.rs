

use std::collections::HashSet;

use super::entity::Entity;

/// A named row predicate applied by `EntityManager::find`.
pub trait QueryFilter: Send + Sync {
    fn name(&self) -> &str;

    fn enabled_by_default(&self) -> bool {
        true
    }

    /// Filters that hide soft-deleted rows; `FindOptions::with_deleted`
    /// switches all of them off whatever their name.
    fn hides_deleted(&self) -> bool {
        false
    }

    /// `true` keeps the row in the result.
    fn matches(&self, entity: &Entity) -> bool;
}


#[derive(Debug, Clone, Default)]
pub struct FindOptions {
    enabled: HashSet<String>,
    disabled: HashSet<String>,
    with_deleted: bool,
}

impl FindOptions {
    
    pub fn new() -> Self {
        Self::default()
    }

    
    #[must_use]
    pub fn with_filter(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        self.disabled.remove(&name);
        self.enabled.insert(name);
        self
    }

    
    #[must_use]
    pub fn without_filter(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        self.enabled.remove(&name);
        self.disabled.insert(name);
        self
    }

    /// Include soft-deleted rows.
    #[must_use]
    pub fn with_deleted(mut self) -> Self {
        self.with_deleted = true;
        self
    }

    pub fn is_active(&self, filter: &dyn QueryFilter) -> bool {
        if self.with_deleted && filter.hides_deleted() {
            return false;
        }
        if self.disabled.contains(filter.name()) {
            return false;
        }
        self.enabled.contains(filter.name()) || filter.enabled_by_default()
    }
}
