

use std::sync::Arc;

use super::registry::SoftDeletableRegistry;
use crate::DEFAULT_FILTER_NAME;
use crate::orm::{Entity, QueryFilter};

/// Hides rows whose marker no longer equals the configured initial value.
/// Types without a configuration always pass.
pub struct SoftDeletableFilter {
    name: String,
    registry: Arc<SoftDeletableRegistry>,
    enabled_by_default: bool,
}

impl SoftDeletableFilter {
    
    pub fn new(registry: Arc<SoftDeletableRegistry>) -> Self {
        Self {
            name: DEFAULT_FILTER_NAME.to_string(),
            registry,
            enabled_by_default: true,
        }
    }

    
    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    
    #[must_use]
    pub fn default_enabled(mut self, enabled: bool) -> Self {
        self.enabled_by_default = enabled;
        self
    }
}

impl QueryFilter for SoftDeletableFilter {
    fn name(&self) -> &str {
        &self.name
    }

    fn enabled_by_default(&self) -> bool {
        self.enabled_by_default
    }

    fn hides_deleted(&self) -> bool {
        true
    }

    fn matches(&self, entity: &Entity) -> bool {
        match self.registry.get(entity.name()) {
            Some(config) => config.is_live(entity.get(config.field())),
            None => true,
        }
    }
}
