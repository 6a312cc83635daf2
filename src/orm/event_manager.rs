

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use tracing::debug;

use super::unit_of_work::UnitOfWork;
use crate::core::error::Result;
use crate::soft_delete::DeletionContexts;


pub struct FlushEventArgs<'a> {
    pub uow: &'a mut UnitOfWork,
    pub contexts: &'a DeletionContexts,
}

/// Hook invoked by the entity manager once per flush, after change sets are
/// computed and before anything is committed.
#[async_trait]
pub trait EventSubscriber: Send + Sync {
    fn name(&self) -> &str;

    /// An error aborts the flush; nothing from the cycle is committed.
    async fn on_flush(&self, args: &mut FlushEventArgs<'_>) -> Result<()>;
}


#[derive(Default)]
pub struct EventManager {
    subscribers: RwLock<Vec<Arc<dyn EventSubscriber>>>,
}

impl EventManager {
    
    pub fn new() -> Self {
        Self::default()
    }

    /// Not deduplicated: registering the same subscriber twice runs it twice.
    pub fn register_subscriber(&self, subscriber: Arc<dyn EventSubscriber>) {
        debug!("Registered flush subscriber: {}", subscriber.name());
        self.subscribers.write().push(subscriber);
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.read().len()
    }

    
    pub async fn dispatch_flush(&self, args: &mut FlushEventArgs<'_>) -> Result<()> {
        let subscribers: Vec<Arc<dyn EventSubscriber>> = self.subscribers.read().clone();

        for subscriber in subscribers {
            debug!(
                "Dispatching onFlush to {} ({} change sets)",
                subscriber.name(),
                args.uow.len()
            );
            subscriber.on_flush(args).await?;
        }

        Ok(())
    }
}
