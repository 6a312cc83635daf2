

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, trace};

use super::base::SoftDeleteEvent;


pub type EventHandler = Arc<dyn Fn(SoftDeleteEvent) + Send + Sync>;

#[derive(Default)]
struct Handlers {
    all_types: Vec<EventHandler>,
    by_type: HashMap<String, Vec<EventHandler>>,
}

/// Fans soft-delete events out to subscribers, either for every entity type
/// or for a single one. Handlers run on spawned tasks, so `emit` never waits
/// on them.
#[derive(Default)]
pub struct EventBus {
    handlers: RwLock<Handlers>,
}

impl EventBus {
    
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    
    pub async fn subscribe(&self, handler: EventHandler) {
        self.handlers.write().await.all_types.push(handler);
        debug!("Subscribed soft-delete handler for all entity types");
    }

    
    pub async fn subscribe_to(&self, entity_type: &str, handler: EventHandler) {
        self.handlers
            .write()
            .await
            .by_type
            .entry(entity_type.to_string())
            .or_default()
            .push(handler);
        debug!("Subscribed soft-delete handler for {}", entity_type);
    }

    /// Handlers that would receive an event for `entity_type`.
    pub async fn handler_count(&self, entity_type: &str) -> usize {
        let handlers = self.handlers.read().await;
        handlers.all_types.len() + handlers.by_type.get(entity_type).map_or(0, Vec::len)
    }

    /// Returns how many handlers the event was dispatched to.
    pub async fn emit(&self, event: SoftDeleteEvent) -> usize {
        let targets: Vec<EventHandler> = {
            let handlers = self.handlers.read().await;
            handlers
                .all_types
                .iter()
                .chain(handlers.by_type.get(event.entity_type()).into_iter().flatten())
                .cloned()
                .collect()
        };

        if targets.is_empty() {
            trace!("No soft-delete handlers for {}", event.entity_type());
            return 0;
        }

        for handler in &targets {
            let handler = Arc::clone(handler);
            let event = event.clone();

            tokio::spawn(async move {
                handler(event);
            });
        }
        targets.len()
    }
}
