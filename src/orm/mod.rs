

pub mod change_set;
pub mod entity;
pub mod entity_manager;
pub mod error;
pub mod event_manager;
pub mod query;
pub mod unit_of_work;

pub use change_set::{ChangeSet, ChangeSetKind};
pub use entity::Entity;
pub use entity_manager::{EntityManager, FlushSummary};
pub use error::OrmError;
pub use event_manager::{EventManager, EventSubscriber, FlushEventArgs};
pub use query::{FindOptions, QueryFilter};
pub use unit_of_work::UnitOfWork;
