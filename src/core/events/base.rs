

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::soft_delete::SoftDeletedEntity;

pub const SOFT_DELETE_REWRITTEN: &str = "soft_delete.rewritten";

/// One DELETE change set that was rewritten into a soft delete.
///
/// Events raised by the same flush share `flush_id`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SoftDeleteEvent {
    pub event_id: Uuid,
    pub event_type: &'static str,
    pub flush_id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub entity: SoftDeletedEntity,
}

impl SoftDeleteEvent {
    #[must_use]
    pub fn new(flush_id: Uuid, entity: SoftDeletedEntity) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            event_type: SOFT_DELETE_REWRITTEN,
            flush_id,
            timestamp: Utc::now(),
            entity,
        }
    }

    pub fn entity_type(&self) -> &str {
        &self.entity.entity_type
    }

    pub fn actor_written(&self) -> bool {
        self.entity.deleted_by.is_some()
    }
}
