

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// A dynamic row: entity type name, identity, and a JSON field map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    name: String,
    id: Uuid,
    #[serde(default)]
    data: Map<String, Value>,
}

impl Entity {
    
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_id(name, Uuid::new_v4())
    }

    
    pub fn with_id(name: impl Into<String>, id: Uuid) -> Self {
        Self {
            name: name.into(),
            id,
            data: Map::new(),
        }
    }

    
    #[must_use]
    pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.data.insert(field.into(), value.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.data.get(field)
    }

    /// Returns the previous value of the field, if any.
    pub fn set(&mut self, field: impl Into<String>, value: Value) -> Option<Value> {
        self.data.insert(field.into(), value)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.data.contains_key(field)
    }

    pub fn data(&self) -> &Map<String, Value> {
        &self.data
    }

    
    pub fn diff(&self, previous: &Entity) -> Map<String, Value> {
        self.data
            .iter()
            .filter(|(field, value)| previous.data.get(*field) != Some(*value))
            .map(|(field, value)| (field.clone(), value.clone()))
            .collect()
    }
}
