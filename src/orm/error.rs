

use thiserror::Error;
use uuid::Uuid;

use crate::core::error::SoftDeleteError;


#[derive(Error, Debug)]
pub enum OrmError {
    #[error("Entity is not managed: {entity_type}#{id}")]
    NotManaged { entity_type: String, id: Uuid },

    #[error("Flush aborted: {0}")]
    Flush(#[from] SoftDeleteError),
}
