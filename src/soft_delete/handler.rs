

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, trace, warn};
use uuid::Uuid;

use super::config::SoftDeletableConfig;
use super::context::DeletionContexts;
use super::filter::SoftDeletableFilter;
use super::registry::SoftDeletableRegistry;
use crate::core::config::SoftDeleteSettings;
use crate::core::error::{Result, SoftDeleteError};
use crate::core::events::{EventBus, SoftDeleteEvent};
use crate::orm::{ChangeSet, ChangeSetKind, EntityManager, EventSubscriber, FlushEventArgs, UnitOfWork};


#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SoftDeletedEntity {
    pub entity_type: String,
    pub id: Uuid,
    pub field: String,
    pub value: Value,
    pub deleted_by_field: Option<String>,
    /// `Some` only when an actor was actually written.
    pub deleted_by: Option<Value>,
}


#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlushReport {
    pub inspected: usize,
    pub skipped: usize,
    pub soft_deleted: Vec<SoftDeletedEntity>,
}

/// Rewrites deletions of soft-deletable entities into updates during flush.
///
/// For every DELETE change set whose entity type is registered, the kind
/// becomes UPDATE and the marker field (plus the deleted-by field when one is
/// configured and an actor is known) is written to both the live instance and
/// the payload. Everything else passes through untouched.
pub struct SoftDeleteHandler {
    registry: Arc<SoftDeletableRegistry>,
    events: Option<Arc<EventBus>>,
    settings: SoftDeleteSettings,
}

impl SoftDeleteHandler {

    pub fn new(registry: Arc<SoftDeletableRegistry>) -> Self {
        info!(
            "SoftDeleteHandler initialized for {} entity types",
            registry.len()
        );
        Self {
            registry,
            events: None,
            settings: SoftDeleteSettings::default(),
        }
    }


    #[must_use]
    pub fn with_settings(mut self, settings: SoftDeleteSettings) -> Self {
        self.settings = settings;
        self
    }


    #[must_use]
    pub fn with_event_bus(mut self, bus: Arc<EventBus>) -> Self {
        self.events = Some(bus);
        self
    }

    pub fn registry(&self) -> &SoftDeletableRegistry {
        &self.registry
    }

    /// Attaches a default handler to `em`. Call once per entity manager.
    pub fn register(em: &EntityManager, registry: Arc<SoftDeletableRegistry>) -> Arc<Self> {
        Self::new(registry).attach(em)
    }

    /// Subscribes this handler to `em`'s flushes and installs the matching
    /// query filter.
    pub fn attach(self, em: &EntityManager) -> Arc<Self> {
        let filter = SoftDeletableFilter::new(Arc::clone(&self.registry))
            .named(self.settings.filter_name.clone())
            .default_enabled(self.settings.filter_by_default);
        em.add_filter(Arc::new(filter));

        let handler = Arc::new(self);
        em.event_manager().register_subscriber(handler.clone());
        handler
    }

    /// Runs the rewrite over every change set of the cycle, in order.
    ///
    /// Stops at the first failing producer. The failing change set is left
    /// exactly as it was; earlier ones keep their rewrite and are discarded
    /// with the aborted cycle.
    pub async fn process(
        &self,
        uow: &mut UnitOfWork,
        contexts: &DeletionContexts,
    ) -> Result<FlushReport> {
        let mut report = FlushReport::default();

        for change_set in uow.change_sets_mut() {
            report.inspected += 1;

            if change_set.kind != ChangeSetKind::Delete {
                report.skipped += 1;
                continue;
            }
            let Some(config) = self.registry.get(change_set.entity_name()) else {
                trace!("{} is not soft-deletable", change_set.entity_name());
                report.skipped += 1;
                continue;
            };

            let deleted = Self::soft_delete(change_set, config, contexts).await?;
            report.soft_deleted.push(deleted);
        }

        Ok(report)
    }

    async fn soft_delete(
        change_set: &mut ChangeSet,
        config: &SoftDeletableConfig,
        contexts: &DeletionContexts,
    ) -> Result<SoftDeletedEntity> {
        let entity_type = change_set.entity_name().to_string();

        // Both values are resolved before the change set is touched.
        let value = config.produce_value().map_err(|source| {
            warn!("Value producer failed for {}.{}: {}", entity_type, config.field(), source);
            SoftDeleteError::ValueProducer {
                entity_type: entity_type.clone(),
                field: config.field().to_string(),
                source,
            }
        })?;

        let deleted_by = match config.deleted_by_field() {
            Some(field) => Self::resolve_actor(config, &entity_type, field, contexts).await?,
            None => None,
        };

        change_set.kind = ChangeSetKind::Update;
        change_set.set_field(config.field(), value.clone());
        if let (Some(field), Some(actor)) = (config.deleted_by_field(), &deleted_by) {
            change_set.set_field(field, actor.clone());
        }
        // No recompute of the change set: relation fields in the payload were
        // finalized before onFlush, and re-deriving them nulls required
        // references.

        debug!(
            "Soft-deleted {}#{}: {}={}",
            entity_type,
            change_set.entity.id(),
            config.field(),
            value
        );

        Ok(SoftDeletedEntity {
            entity_type,
            id: change_set.entity.id(),
            field: config.field().to_string(),
            value,
            deleted_by_field: config.deleted_by_field().map(String::from),
            deleted_by,
        })
    }

    /// Provider first, then the flush's context. `None` leaves the field alone.
    async fn resolve_actor(
        config: &SoftDeletableConfig,
        entity_type: &str,
        field: &str,
        contexts: &DeletionContexts,
    ) -> Result<Option<Value>> {
        match config.deleted_by_provider() {
            Some(provider) => provider.resolve().await.map(Some).map_err(|source| {
                warn!("Actor provider failed for {}.{}: {}", entity_type, field, source);
                SoftDeleteError::ActorProvider {
                    entity_type: entity_type.to_string(),
                    field: field.to_string(),
                    source,
                }
            }),
            None => Ok(contexts.actor_for(entity_type).cloned()),
        }
    }

    async fn emit(&self, report: &FlushReport) {
        let Some(bus) = &self.events else {
            return;
        };
        if !self.settings.emit_events || report.soft_deleted.is_empty() {
            return;
        }

        let flush_id = Uuid::new_v4();
        for deleted in &report.soft_deleted {
            bus.emit(SoftDeleteEvent::new(flush_id, deleted.clone())).await;
        }
    }
}

#[async_trait]
impl EventSubscriber for SoftDeleteHandler {
    fn name(&self) -> &str {
        "SoftDeleteHandler"
    }

    async fn on_flush(&self, args: &mut FlushEventArgs<'_>) -> Result<()> {
        let report = self.process(args.uow, args.contexts).await?;

        if !report.soft_deleted.is_empty() {
            info!(
                "Rewrote {} of {} change sets into soft deletes",
                report.soft_deleted.len(),
                report.inspected
            );
        }
        self.emit(&report).await;
        Ok(())
    }
}
