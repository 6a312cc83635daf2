

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use super::config::SoftDeletableConfig;
use crate::core::error::{Result, SoftDeleteError};

/// Entity type name → soft-delete configuration.
///
/// Filled at startup, then shared read-only behind an `Arc`.
#[derive(Debug, Default)]
pub struct SoftDeletableRegistry {
    configs: HashMap<String, Arc<SoftDeletableConfig>>,
}

impl SoftDeletableRegistry {
    
    pub fn new() -> Self {
        Self::default()
    }

    
    pub fn register(
        &mut self,
        entity_type: impl Into<String>,
        config: SoftDeletableConfig,
    ) -> Result<()> {
        let entity_type = entity_type.into();
        config.validate(&entity_type)?;

        if self.configs.contains_key(&entity_type) {
            return Err(SoftDeleteError::AlreadyRegistered(entity_type));
        }

        debug!(
            "Registered soft-deletable entity: {} (field={}, deleted_by={:?})",
            entity_type,
            config.field(),
            config.deleted_by_field()
        );
        self.configs.insert(entity_type, Arc::new(config));
        Ok(())
    }

    
    pub fn with(mut self, entity_type: impl Into<String>, config: SoftDeletableConfig) -> Result<Self> {
        self.register(entity_type, config)?;
        Ok(self)
    }

    pub fn get(&self, entity_type: &str) -> Option<&Arc<SoftDeletableConfig>> {
        self.configs.get(entity_type)
    }

    pub fn is_soft_deletable(&self, entity_type: &str) -> bool {
        self.configs.contains_key(entity_type)
    }

    pub fn entity_types(&self) -> Vec<&str> {
        let mut types: Vec<&str> = self.configs.keys().map(String::as_str).collect();
        types.sort_unstable();
        types
    }

    pub fn len(&self) -> usize {
        self.configs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.configs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_and_lookup() {
        let registry = SoftDeletableRegistry::new()
            .with("Post", SoftDeletableConfig::timestamp("deletedAt"))
            .unwrap()
            .with("Comment", SoftDeletableConfig::flag("deleted"))
            .unwrap();

        assert_eq!(registry.len(), 2);
        assert!(registry.is_soft_deletable("Post"));
        assert!(!registry.is_soft_deletable("Tag"));
        assert_eq!(registry.get("Comment").unwrap().field(), "deleted");
        assert_eq!(registry.entity_types(), vec!["Comment", "Post"]);
    }

    #[test]
    fn test_duplicate_registration_rejected() {
        let mut registry = SoftDeletableRegistry::new();
        registry
            .register("Post", SoftDeletableConfig::timestamp("deletedAt"))
            .unwrap();

        let err = registry
            .register("Post", SoftDeletableConfig::timestamp("removedAt"))
            .unwrap_err();
        assert!(matches!(err, SoftDeleteError::AlreadyRegistered(ref t) if t == "Post"));
        assert_eq!(registry.get("Post").unwrap().field(), "deletedAt");
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut registry = SoftDeletableRegistry::new();
        let err = registry
            .register("Post", SoftDeletableConfig::timestamp(""))
            .unwrap_err();

        assert!(matches!(err, SoftDeleteError::InvalidConfig { .. }));
        assert!(registry.is_empty());
    }
}
