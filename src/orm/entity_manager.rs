

use std::collections::BTreeMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::change_set::{ChangeSet, ChangeSetKind};
use super::entity::Entity;
use super::error::OrmError;
use super::event_manager::{EventManager, FlushEventArgs};
use super::query::{FindOptions, QueryFilter};
use super::unit_of_work::UnitOfWork;
use crate::soft_delete::DeletionContexts;


#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct EntityKey {
    name: String,
    id: Uuid,
}

impl EntityKey {
    fn of(entity: &Entity) -> Self {
        Self {
            name: entity.name().to_string(),
            id: entity.id(),
        }
    }
}

#[derive(Debug, Clone)]
enum PendingOp {
    Persist(Entity),
    Remove(Entity),
}

impl PendingOp {
    fn entity(&self) -> &Entity {
        match self {
            Self::Persist(entity) | Self::Remove(entity) => entity,
        }
    }
}


#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlushSummary {
    pub created: usize,
    pub updated: usize,
    pub deleted: usize,
}

impl FlushSummary {
    pub fn total(&self) -> usize {
        self.created + self.updated + self.deleted
    }
}

/// In-memory unit-of-work engine.
///
/// `persist` and `remove` queue operations; `flush` turns them into change
/// sets, hands those to every registered subscriber, then commits whatever
/// the subscribers left behind. `rows` is storage; `managed` holds the live
/// instances as the subscribers left them.
#[derive(Default)]
pub struct EntityManager {
    events: EventManager,
    filters: RwLock<Vec<Arc<dyn QueryFilter>>>,
    rows: BTreeMap<EntityKey, Entity>,
    managed: BTreeMap<EntityKey, Entity>,
    pending: Vec<PendingOp>,
}

impl EntityManager {
    
    pub fn new() -> Self {
        info!("Initializing EntityManager");
        Self::default()
    }

    pub fn event_manager(&self) -> &EventManager {
        &self.events
    }

    pub fn add_filter(&self, filter: Arc<dyn QueryFilter>) {
        debug!("Registered query filter: {}", filter.name());
        self.filters.write().push(filter);
    }

    pub fn filter_names(&self) -> Vec<String> {
        self.filters
            .read()
            .iter()
            .map(|f| f.name().to_string())
            .collect()
    }

    /// Queues an insert, or an update when the row already exists.
    pub fn persist(&mut self, entity: Entity) {
        self.queue(PendingOp::Persist(entity));
    }

    
    pub fn remove(&mut self, entity: &Entity) -> Result<(), OrmError> {
        let key = EntityKey::of(entity);

        if self.rows.contains_key(&key) {
            self.queue(PendingOp::Remove(entity.clone()));
            return Ok(());
        }

        // Removing a never-flushed entity just cancels its insert.
        let before = self.pending.len();
        self.pending.retain(|op| EntityKey::of(op.entity()) != key);
        if self.pending.len() == before {
            return Err(OrmError::NotManaged {
                entity_type: key.name,
                id: key.id,
            });
        }
        Ok(())
    }

    /// The live instance after the last flush that touched it. Hard-deleted
    /// entities are no longer managed.
    pub fn managed(&self, entity_type: &str, id: Uuid) -> Option<&Entity> {
        self.managed.get(&EntityKey {
            name: entity_type.to_string(),
            id,
        })
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    
    pub async fn flush(&mut self) -> Result<FlushSummary, OrmError> {
        self.flush_with(&DeletionContexts::default()).await
    }

    /// Flush with an explicit deletion context for this cycle.
    ///
    /// If a subscriber fails nothing is committed and the pending operations
    /// are kept, so the flush can be retried.
    pub async fn flush_with(
        &mut self,
        contexts: &DeletionContexts,
    ) -> Result<FlushSummary, OrmError> {
        let change_sets = self.compute_change_sets();
        if change_sets.is_empty() {
            self.pending.clear();
            return Ok(FlushSummary::default());
        }

        let mut uow = UnitOfWork::new(change_sets);
        let mut args = FlushEventArgs {
            uow: &mut uow,
            contexts,
        };
        if let Err(e) = self.events.dispatch_flush(&mut args).await {
            warn!("Flush aborted, {} pending operations kept: {}", self.pending.len(), e);
            return Err(e.into());
        }

        let summary = self.commit(uow.into_change_sets());
        self.pending.clear();

        info!(
            "Flush committed: created={}, updated={}, deleted={}",
            summary.created, summary.updated, summary.deleted
        );
        Ok(summary)
    }

    
    pub fn find(&self, entity_type: &str, options: &FindOptions) -> Vec<Entity> {
        let filters = self.active_filters(options);

        self.rows
            .values()
            .filter(|row| row.name() == entity_type)
            .filter(|row| filters.iter().all(|f| f.matches(row)))
            .cloned()
            .collect()
    }

    
    pub fn find_one(&self, entity_type: &str, id: Uuid, options: &FindOptions) -> Option<Entity> {
        let key = EntityKey {
            name: entity_type.to_string(),
            id,
        };
        let row = self.rows.get(&key)?;

        self.active_filters(options)
            .iter()
            .all(|f| f.matches(row))
            .then(|| row.clone())
    }

    fn active_filters(&self, options: &FindOptions) -> Vec<Arc<dyn QueryFilter>> {
        self.filters
            .read()
            .iter()
            .filter(|f| options.is_active(f.as_ref()))
            .cloned()
            .collect()
    }

    fn queue(&mut self, op: PendingOp) {
        let key = EntityKey::of(op.entity());
        match self
            .pending
            .iter_mut()
            .find(|queued| EntityKey::of(queued.entity()) == key)
        {
            Some(queued) => *queued = op,
            None => self.pending.push(op),
        }
    }

    fn compute_change_sets(&self) -> Vec<ChangeSet> {
        let change_sets: Vec<ChangeSet> = self
            .pending
            .iter()
            .filter_map(|op| {
                let stored = self.rows.get(&EntityKey::of(op.entity()));
                match (op, stored) {
                    (PendingOp::Persist(entity), None) => Some(ChangeSet::create(entity.clone())),
                    (PendingOp::Persist(entity), Some(previous)) => {
                        let payload = entity.diff(previous);
                        (!payload.is_empty()).then(|| {
                            ChangeSet::new(ChangeSetKind::Update, entity.clone(), payload)
                        })
                    }
                    (PendingOp::Remove(entity), Some(_)) => Some(ChangeSet::delete(entity.clone())),
                    (PendingOp::Remove(_), None) => None,
                }
            })
            .collect();

        debug!(
            "Computed {} change sets from {} pending operations",
            change_sets.len(),
            self.pending.len()
        );
        change_sets
    }

    fn commit(&mut self, change_sets: Vec<ChangeSet>) -> FlushSummary {
        let mut summary = FlushSummary::default();

        for change_set in change_sets {
            let key = EntityKey::of(&change_set.entity);
            match change_set.kind {
                ChangeSetKind::Create => {
                    let mut row = Entity::with_id(key.name.clone(), key.id);
                    for (field, value) in change_set.payload {
                        row.set(field, value);
                    }
                    self.rows.insert(key.clone(), row);
                    self.managed.insert(key, change_set.entity);
                    summary.created += 1;
                }
                ChangeSetKind::Update => {
                    let row = self
                        .rows
                        .entry(key.clone())
                        .or_insert_with(|| Entity::with_id(key.name.clone(), key.id));
                    for (field, value) in change_set.payload {
                        row.set(field, value);
                    }
                    self.managed.insert(key, change_set.entity);
                    summary.updated += 1;
                }
                ChangeSetKind::Delete => {
                    self.rows.remove(&key);
                    self.managed.remove(&key);
                    summary.deleted += 1;
                }
            }
        }

        summary
    }
}
