use mastery_core::model::{EnablerId, TaskId};
use mastery_core::time::fixed_now;
use storage::repository::{ProgressRepository, WeaknessRepository};
use storage::sqlite::SqliteRepository;

async fn connect(name: &str) -> SqliteRepository {
    let url = format!("sqlite:file:{name}?mode=memory&cache=shared");
    let repo = SqliteRepository::connect(&url).await.expect("connect");
    repo.migrate().await.expect("migrate");
    repo
}

#[tokio::test]
async fn sqlite_round_trips_completed_set() {
    let repo = connect("memdb_progress").await;
    let a = EnablerId::new("p1-1");
    let b = EnablerId::new("be5-2");

    repo.set_completed(&a, true, fixed_now()).await.unwrap();
    repo.set_completed(&b, true, fixed_now()).await.unwrap();

    let record = repo.load_completed().await.unwrap();
    assert_eq!(record.completed_count(), 2);
    assert!(record.is_completed(&a));
    assert!(record.is_completed(&b));
}

#[tokio::test]
async fn sqlite_toggle_off_removes_row() {
    let repo = connect("memdb_toggle").await;
    let id = EnablerId::new("p2-3");

    repo.set_completed(&id, true, fixed_now()).await.unwrap();
    repo.set_completed(&id, false, fixed_now()).await.unwrap();

    let record = repo.load_completed().await.unwrap();
    assert!(!record.is_completed(&id));
    assert_eq!(record.completed_count(), 0);
}

#[tokio::test]
async fn sqlite_set_completed_is_idempotent() {
    let repo = connect("memdb_idem").await;
    let id = EnablerId::new("pr1-1");

    repo.set_completed(&id, true, fixed_now()).await.unwrap();
    repo.set_completed(&id, true, fixed_now()).await.unwrap();

    let record = repo.load_completed().await.unwrap();
    assert_eq!(record.completed_count(), 1);
}

#[tokio::test]
async fn sqlite_failure_batch_counts_duplicates() {
    let repo = connect("memdb_failures").await;
    let t = TaskId::new("p2");
    let u = TaskId::new("be5");

    repo.add_failures(&[t.clone(), t.clone(), u.clone()])
        .await
        .unwrap();

    let record = repo.load_failures().await.unwrap();
    assert_eq!(record.failures(&t), 2);
    assert_eq!(record.failures(&u), 1);
    assert_eq!(record.failures(&TaskId::new("p3")), 0);
}

#[tokio::test]
async fn sqlite_failures_accumulate_across_sessions() {
    let repo = connect("memdb_accumulate").await;
    let t = TaskId::new("pr8");

    repo.add_failures(&[t.clone()]).await.unwrap();
    repo.add_failures(&[t.clone()]).await.unwrap();

    let record = repo.load_failures().await.unwrap();
    assert_eq!(record.failures(&t), 2);
}

#[tokio::test]
async fn sqlite_migration_is_rerunnable() {
    let repo = connect("memdb_migrate_twice").await;
    repo.migrate().await.expect("second migrate is a no-op");

    let record = repo.load_failures().await.unwrap();
    assert!(record.is_empty());
}
