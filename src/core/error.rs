

use thiserror::Error;


#[derive(Error, Debug)]
pub enum SoftDeleteError {
    #[error("Invalid soft-delete configuration for {entity_type}: {reason}")]
    InvalidConfig { entity_type: String, reason: String },

    #[error("Entity type already registered as soft-deletable: {0}")]
    AlreadyRegistered(String),

    #[error("Value producer for {entity_type}.{field} failed: {source}")]
    ValueProducer {
        entity_type: String,
        field: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("Actor provider for {entity_type}.{field} failed: {source}")]
    ActorProvider {
        entity_type: String,
        field: String,
        #[source]
        source: anyhow::Error,
    },
}

impl SoftDeleteError {
    pub fn invalid_config(entity_type: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            entity_type: entity_type.into(),
            reason: reason.into(),
        }
    }

    /// True for failures raised by user-supplied producer closures.
    pub fn is_provider_failure(&self) -> bool {
        matches!(self, Self::ValueProducer { .. } | Self::ActorProvider { .. })
    }
}


pub type Result<T> = std::result::Result<T, SoftDeleteError>;
