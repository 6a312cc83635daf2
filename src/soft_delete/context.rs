

use std::collections::HashMap;

use serde_json::Value;

/// Who is deleting, for one entity type.
///
/// `deleted_by: None` means "unknown" and leaves the deleted-by field alone.
/// `Some(Value::Null)` is an explicit null actor and is written.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SoftDeleteContext {
    pub deleted_by: Option<Value>,
}

impl SoftDeleteContext {
    
    pub fn new() -> Self {
        Self::default()
    }

    
    pub fn deleted_by(actor: impl Into<Value>) -> Self {
        Self {
            deleted_by: Some(actor.into()),
        }
    }
}

/// Per-flush deletion contexts, keyed by entity type.
#[derive(Debug, Clone, Default)]
pub struct DeletionContexts {
    by_type: HashMap<String, SoftDeleteContext>,
}

impl DeletionContexts {
    
    pub fn new() -> Self {
        Self::default()
    }

    
    #[must_use]
    pub fn with(mut self, entity_type: impl Into<String>, context: SoftDeleteContext) -> Self {
        self.insert(entity_type, context);
        self
    }

    
    pub fn insert(
        &mut self,
        entity_type: impl Into<String>,
        context: SoftDeleteContext,
    ) -> Option<SoftDeleteContext> {
        self.by_type.insert(entity_type.into(), context)
    }

    pub fn remove(&mut self, entity_type: &str) -> Option<SoftDeleteContext> {
        self.by_type.remove(entity_type)
    }

    pub fn get(&self, entity_type: &str) -> Option<&SoftDeleteContext> {
        self.by_type.get(entity_type)
    }

    /// The actor for `entity_type`, if a context exists and names one.
    pub fn actor_for(&self, entity_type: &str) -> Option<&Value> {
        self.get(entity_type)?.deleted_by.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.by_type.is_empty()
    }
}
