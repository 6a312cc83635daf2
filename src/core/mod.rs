

pub mod config;
pub mod error;
pub mod events;

pub use config::SoftDeleteSettings;
pub use error::{Result, SoftDeleteError};
pub use events::{EventBus, EventHandler, SoftDeleteEvent};
