

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use strum::{Display, EnumString, IntoStaticStr};

use super::entity::Entity;


#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, IntoStaticStr, Display,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ChangeSetKind {
    /// INSERT
    Create,
    
    Update,
    
    Delete,
}

/// One entity's pending write for the current flush.
///
/// `entity` is the live instance, `payload` the fields the engine will
/// persist. Subscribers may mutate both in place during `on_flush`.
#[derive(Debug, Clone, PartialEq)]
pub struct ChangeSet {
    pub kind: ChangeSetKind,
    pub entity: Entity,
    pub payload: Map<String, Value>,
}

impl ChangeSet {
    
    pub fn new(kind: ChangeSetKind, entity: Entity, payload: Map<String, Value>) -> Self {
        Self {
            kind,
            entity,
            payload,
        }
    }

    pub fn create(entity: Entity) -> Self {
        let payload = entity.data().clone();
        Self::new(ChangeSetKind::Create, entity, payload)
    }

    pub fn delete(entity: Entity) -> Self {
        Self::new(ChangeSetKind::Delete, entity, Map::new())
    }

    pub fn entity_name(&self) -> &str {
        self.entity.name()
    }

    /// Writes the field on both the live instance and the outgoing payload.
    pub fn set_field(&mut self, field: &str, value: Value) {
        self.entity.set(field, value.clone());
        self.payload.insert(field.to_string(), value);
    }
}
