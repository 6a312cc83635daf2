pub mod config;
pub mod context;
pub mod filter;
pub mod handler;
pub mod registry;


pub use config::{ActorProvider, SoftDeletableConfig, ValueProducer};
pub use context::{DeletionContexts, SoftDeleteContext};
pub use filter::SoftDeletableFilter;
pub use handler::{FlushReport, SoftDeleteHandler, SoftDeletedEntity};
pub use registry::SoftDeletableRegistry;
