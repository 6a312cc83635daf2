

pub mod base;
pub mod bus;

pub use base::{SOFT_DELETE_REWRITTEN, SoftDeleteEvent};
pub use bus::{EventBus, EventHandler};
