use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use serde_json::{Value, json};
use soft_deletable::{
    ChangeSetKind, DeletionContexts, Entity, EntityManager, FindOptions, OrmError,
    SoftDeletableConfig, SoftDeletableRegistry, SoftDeleteContext, SoftDeleteError,
    SoftDeleteHandler, SoftDeleteSettings,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn registry() -> Arc<SoftDeletableRegistry> {
    let post = SoftDeletableConfig::new("deletedAt", || json!("2024-01-01T00:00:00Z"))
        .with_deleted_by_field("deletedBy")
        .with_deleted_by(|| json!("admin"));
    let comment = SoftDeletableConfig::timestamp("deletedAt").with_deleted_by_field("deletedBy");

    Arc::new(
        SoftDeletableRegistry::new()
            .with("Post", post)
            .unwrap()
            .with("Comment", comment)
            .unwrap(),
    )
}

async fn seeded(em: &mut EntityManager, entities: &[Entity]) {
    for entity in entities {
        em.persist(entity.clone());
    }
    em.flush().await.unwrap();
}

#[tokio::test]
async fn test_remove_soft_deletes_row() {
    init_tracing();
    let mut em = EntityManager::new();
    SoftDeleteHandler::register(&em, registry());

    let post = Entity::new("Post").with("title", "hi");
    seeded(&mut em, &[post.clone()]).await;

    em.remove(&post).unwrap();
    let summary = em.flush().await.unwrap();
    assert_eq!(summary.updated, 1);
    assert_eq!(summary.deleted, 0);

    let row = em
        .find_one("Post", post.id(), &FindOptions::new().with_deleted())
        .expect("row kept in storage");
    assert_eq!(row.get("title"), Some(&json!("hi")));
    assert_eq!(row.get("deletedAt"), Some(&json!("2024-01-01T00:00:00Z")));
    assert_eq!(row.get("deletedBy"), Some(&json!("admin")));

    let live = em.managed("Post", post.id()).expect("instance still managed");
    assert_eq!(live.get("deletedAt"), row.get("deletedAt"));
    assert_eq!(live.get("deletedBy"), row.get("deletedBy"));
}

#[tokio::test]
async fn test_flag_marker_keeps_never_deleted_rows_visible() {
    let registry = Arc::new(
        SoftDeletableRegistry::new()
            .with("Comment", SoftDeletableConfig::flag("deleted"))
            .unwrap(),
    );
    let mut em = EntityManager::new();
    SoftDeleteHandler::register(&em, registry);

    let live = Entity::new("Comment").with("body", "live");
    let gone = Entity::new("Comment").with("body", "gone");
    seeded(&mut em, &[live.clone(), gone.clone()]).await;
    assert_eq!(em.find("Comment", &FindOptions::new()).len(), 2);

    em.remove(&gone).unwrap();
    em.flush().await.unwrap();

    let visible = em.find("Comment", &FindOptions::new());
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].id(), live.id());

    let row = em.find_one("Comment", gone.id(), &FindOptions::new().with_deleted()).unwrap();
    assert_eq!(row.get("deleted"), Some(&json!(true)));
}

#[tokio::test]
async fn test_default_find_hides_soft_deleted_rows() {
    let mut em = EntityManager::new();
    SoftDeleteHandler::register(&em, registry());

    let kept = Entity::new("Post").with("title", "kept");
    let gone = Entity::new("Post").with("title", "gone");
    seeded(&mut em, &[kept.clone(), gone.clone()]).await;

    em.remove(&gone).unwrap();
    em.flush().await.unwrap();

    let visible = em.find("Post", &FindOptions::new());
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].id(), kept.id());
    assert!(em.find_one("Post", gone.id(), &FindOptions::new()).is_none());

    let all = em.find("Post", &FindOptions::new().with_deleted());
    assert_eq!(all.len(), 2);
}

#[tokio::test]
async fn test_unconfigured_type_is_hard_deleted() {
    let mut em = EntityManager::new();
    SoftDeleteHandler::register(&em, registry());

    let tag = Entity::new("Tag").with("label", "rust");
    seeded(&mut em, &[tag.clone()]).await;

    em.remove(&tag).unwrap();
    let summary = em.flush().await.unwrap();

    assert_eq!(summary.deleted, 1);
    assert!(em.find("Tag", &FindOptions::new().with_deleted()).is_empty());
}

#[tokio::test]
async fn test_actor_from_flush_context() {
    let mut em = EntityManager::new();
    SoftDeleteHandler::register(&em, registry());

    let comment = Entity::new("Comment").with("body", "first");
    let other = Entity::new("Comment").with("body", "second");
    seeded(&mut em, &[comment.clone(), other.clone()]).await;

    em.remove(&comment).unwrap();
    let contexts = DeletionContexts::new().with("Comment", SoftDeleteContext::deleted_by("user-7"));
    em.flush_with(&contexts).await.unwrap();

    em.remove(&other).unwrap();
    em.flush().await.unwrap();

    let all = FindOptions::new().with_deleted();
    let first = em.find_one("Comment", comment.id(), &all).unwrap();
    assert_eq!(first.get("deletedBy"), Some(&json!("user-7")));
    assert!(first.get("deletedAt").and_then(Value::as_str).is_some());

    let second = em.find_one("Comment", other.id(), &all).unwrap();
    assert!(second.get("deletedAt").is_some());
    assert!(!second.contains("deletedBy"));
}

#[tokio::test]
async fn test_failing_producer_aborts_flush() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let config = SoftDeletableConfig::try_new("deletedAt", move || {
        if counter.fetch_add(1, Ordering::SeqCst) == 0 {
            anyhow::bail!("clock unavailable");
        }
        Ok(json!("2024-01-02T00:00:00Z"))
    });
    let registry = Arc::new(SoftDeletableRegistry::new().with("Post", config).unwrap());

    let mut em = EntityManager::new();
    SoftDeleteHandler::register(&em, registry);

    let post = Entity::new("Post").with("title", "hi");
    let draft = Entity::new("Draft").with("title", "new");
    seeded(&mut em, &[post.clone()]).await;

    em.remove(&post).unwrap();
    em.persist(draft.clone());
    let err = em.flush().await.unwrap_err();
    assert!(matches!(err, OrmError::Flush(SoftDeleteError::ValueProducer { .. })));

    // Nothing from the aborted cycle was committed.
    assert_eq!(em.pending_count(), 2);
    assert!(em.find_one("Draft", draft.id(), &FindOptions::new()).is_none());
    let row = em.find_one("Post", post.id(), &FindOptions::new()).unwrap();
    assert!(!row.contains("deletedAt"));

    // Retrying succeeds once the producer recovers.
    let summary = em.flush().await.unwrap();
    assert_eq!(summary.created, 1);
    assert_eq!(summary.updated, 1);
    assert!(em.find_one("Post", post.id(), &FindOptions::new()).is_none());
}

#[tokio::test]
async fn test_filter_can_be_opt_in() {
    let settings = SoftDeleteSettings {
        filter_by_default: false,
        filter_name: "trash".to_string(),
        ..SoftDeleteSettings::default()
    };
    let mut em = EntityManager::new();
    SoftDeleteHandler::new(registry()).with_settings(settings).attach(&em);
    assert_eq!(em.filter_names(), vec!["trash".to_string()]);

    let post = Entity::new("Post").with("title", "hi");
    seeded(&mut em, &[post.clone()]).await;
    em.remove(&post).unwrap();
    em.flush().await.unwrap();

    assert_eq!(em.find("Post", &FindOptions::new()).len(), 1);
    assert!(em.find("Post", &FindOptions::new().with_filter("trash")).is_empty());
    assert_eq!(
        em.find("Post", &FindOptions::new().with_filter("trash").with_deleted()).len(),
        1
    );
}

#[tokio::test]
async fn test_with_deleted_ignores_filter_name() {
    let settings = SoftDeleteSettings {
        filter_name: "archive".to_string(),
        ..SoftDeleteSettings::default()
    };
    let mut em = EntityManager::new();
    SoftDeleteHandler::new(registry()).with_settings(settings).attach(&em);

    let post = Entity::new("Post").with("title", "hi");
    seeded(&mut em, &[post.clone()]).await;
    em.remove(&post).unwrap();
    em.flush().await.unwrap();

    assert!(em.find("Post", &FindOptions::new()).is_empty());
    assert_eq!(em.find("Post", &FindOptions::new().with_deleted()).len(), 1);
}

#[tokio::test]
async fn test_removing_soft_deleted_row_again_rewrites_again() {
    let mut em = EntityManager::new();
    SoftDeleteHandler::register(&em, registry());
    assert_eq!(em.event_manager().subscriber_count(), 1);

    let post = Entity::new("Post").with("title", "hi");
    seeded(&mut em, &[post.clone()]).await;
    em.remove(&post).unwrap();
    em.flush().await.unwrap();

    em.remove(&post).unwrap();
    let summary = em.flush().await.unwrap();
    assert_eq!(summary.updated, 1);

    let all = FindOptions::new().with_deleted();
    assert_eq!(em.find("Post", &all).len(), 1);
}

#[test]
fn test_change_set_kind_parse() {
    assert_eq!("UPDATE".parse::<ChangeSetKind>().unwrap(), ChangeSetKind::Update);
}
