

pub mod core;
pub mod orm;
pub mod soft_delete;


pub use crate::core::config::SoftDeleteSettings;
pub use crate::core::error::{Result, SoftDeleteError};
pub use crate::core::events::{EventBus, SOFT_DELETE_REWRITTEN, SoftDeleteEvent};
pub use orm::{
    ChangeSet, ChangeSetKind, Entity, EntityManager, EventSubscriber, FindOptions,
    FlushEventArgs, FlushSummary, OrmError, UnitOfWork,
};
pub use soft_delete::{
    DeletionContexts, FlushReport, SoftDeletableConfig, SoftDeletableFilter,
    SoftDeletableRegistry, SoftDeleteContext, SoftDeleteHandler, SoftDeletedEntity,
};


pub const DEFAULT_FILTER_NAME: &str = "soft-deletable-filter";
