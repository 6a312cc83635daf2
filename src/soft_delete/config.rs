

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use chrono::{SecondsFormat, Utc};
use futures::future::BoxFuture;
use serde_json::Value;

use crate::core::error::{Result, SoftDeleteError};

/// Produces the "deleted" marker value. Called once per rewritten record.
pub type ValueProducer = Arc<dyn Fn() -> anyhow::Result<Value> + Send + Sync>;

type AsyncActorFn = dyn Fn() -> BoxFuture<'static, anyhow::Result<Value>> + Send + Sync;


#[derive(Clone)]
pub enum ActorProvider {
    Sync(Arc<dyn Fn() -> anyhow::Result<Value> + Send + Sync>),
    Async(Arc<AsyncActorFn>),
}

impl ActorProvider {
    
    pub async fn resolve(&self) -> anyhow::Result<Value> {
        match self {
            Self::Sync(provider) => provider(),
            Self::Async(provider) => provider().await,
        }
    }
}

impl fmt::Debug for ActorProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sync(_) => f.write_str("ActorProvider::Sync"),
            Self::Async(_) => f.write_str("ActorProvider::Async"),
        }
    }
}

/// How an entity type is soft-deleted.
///
/// `field` receives `value()` on deletion. Rows whose marker equals
/// `value_initial` (null unless set) count as not deleted. When
/// `deleted_by_field` is set the actor comes from `get_deleted_by`, or from
/// the flush's deletion context when no provider is configured.
#[derive(Clone)]
pub struct SoftDeletableConfig {
    field: String,
    value: ValueProducer,
    value_initial: Value,
    deleted_by_field: Option<String>,
    get_deleted_by: Option<ActorProvider>,
}

impl SoftDeletableConfig {
    
    pub fn new<F>(field: impl Into<String>, value: F) -> Self
    where
        F: Fn() -> Value + Send + Sync + 'static,
    {
        Self::try_new(field, move || Ok(value()))
    }

    
    pub fn try_new<F>(field: impl Into<String>, value: F) -> Self
    where
        F: Fn() -> anyhow::Result<Value> + Send + Sync + 'static,
    {
        Self {
            field: field.into(),
            value: Arc::new(value),
            value_initial: Value::Null,
            deleted_by_field: None,
            get_deleted_by: None,
        }
    }

    /// Marker is the RFC 3339 UTC time of each individual deletion.
    pub fn timestamp(field: impl Into<String>) -> Self {
        Self::new(field, || {
            Value::String(Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true))
        })
    }

    /// Boolean marker: `false` while live, `true` once deleted.
    pub fn flag(field: impl Into<String>) -> Self {
        Self::new(field, || Value::Bool(true)).with_value_initial(Value::Bool(false))
    }

    
    #[must_use]
    pub fn with_value_initial(mut self, value: Value) -> Self {
        self.value_initial = value;
        self
    }

    
    #[must_use]
    pub fn with_deleted_by_field(mut self, field: impl Into<String>) -> Self {
        self.deleted_by_field = Some(field.into());
        self
    }

    
    #[must_use]
    pub fn with_deleted_by<F>(self, provider: F) -> Self
    where
        F: Fn() -> Value + Send + Sync + 'static,
    {
        self.with_fallible_deleted_by(move || Ok(provider()))
    }

    
    #[must_use]
    pub fn with_fallible_deleted_by<F>(mut self, provider: F) -> Self
    where
        F: Fn() -> anyhow::Result<Value> + Send + Sync + 'static,
    {
        self.get_deleted_by = Some(ActorProvider::Sync(Arc::new(provider)));
        self
    }

    /// The future is awaited inside the flush, before anything is committed.
    #[must_use]
    pub fn with_async_deleted_by<F, Fut>(mut self, provider: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<Value>> + Send + 'static,
    {
        let provider: Arc<AsyncActorFn> = Arc::new(move || -> BoxFuture<'static, anyhow::Result<Value>> {
            Box::pin(provider())
        });
        self.get_deleted_by = Some(ActorProvider::Async(provider));
        self
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn value_initial(&self) -> &Value {
        &self.value_initial
    }

    pub fn deleted_by_field(&self) -> Option<&str> {
        self.deleted_by_field.as_deref()
    }

    pub fn deleted_by_provider(&self) -> Option<&ActorProvider> {
        self.get_deleted_by.as_ref()
    }

    
    pub fn produce_value(&self) -> anyhow::Result<Value> {
        (self.value)()
    }

    /// True when `marker` means "not deleted". Rows that never had the
    /// marker written are live.
    pub fn is_live(&self, marker: Option<&Value>) -> bool {
        marker.is_none_or(|value| value == &self.value_initial)
    }

    pub(crate) fn validate(&self, entity_type: &str) -> Result<()> {
        if self.field.trim().is_empty() {
            return Err(SoftDeleteError::invalid_config(
                entity_type,
                "marker field name is empty",
            ));
        }
        match self.deleted_by_field.as_deref() {
            Some(f) if f.trim().is_empty() => Err(SoftDeleteError::invalid_config(
                entity_type,
                "deleted-by field name is empty",
            )),
            Some(f) if f == self.field => Err(SoftDeleteError::invalid_config(
                entity_type,
                format!("deleted-by field '{f}' is also the marker field"),
            )),
            _ => Ok(()),
        }
    }
}

impl fmt::Debug for SoftDeletableConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SoftDeletableConfig")
            .field("field", &self.field)
            .field("value_initial", &self.value_initial)
            .field("deleted_by_field", &self.deleted_by_field)
            .field("get_deleted_by", &self.get_deleted_by)
            .finish_non_exhaustive()
    }
}
