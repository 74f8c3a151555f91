use migration::{Migrator, MigratorTrait};
use products_hr::{
    EmployeeDraft, EmployeeId, EmployeeStore, HrError, InMemoryEmployeeStore, SeaOrmEmployeeStore,
};
use sea_orm::Database;

async fn sqlite_store() -> SeaOrmEmployeeStore {
    let conn = Database::connect("sqlite::memory:").await.unwrap();
    Migrator::up(&conn, None).await.unwrap();
    SeaOrmEmployeeStore::new(conn)
}

fn john() -> EmployeeDraft {
    EmployeeDraft::new("John Doe", "john.doe@example.com", "Engineering").unwrap()
}

fn jane() -> EmployeeDraft {
    EmployeeDraft::new("Jane Smith", "jane.smith@example.com", "Marketing").unwrap()
}

async fn empty_store_lists_nothing(store: &dyn EmployeeStore) {
    assert!(store.list_all().await.unwrap().is_empty());
}

async fn list_follows_creation_order(store: &dyn EmployeeStore) {
    store.create(john()).await.unwrap();
    store.create(jane()).await.unwrap();
    let names: Vec<String> = store
        .list_all()
        .await
        .unwrap()
        .into_iter()
        .map(|e| e.name)
        .collect();
    assert_eq!(names, vec!["John Doe", "Jane Smith"]);
}

async fn created_record_is_readable(store: &dyn EmployeeStore) {
    let created = store.create(john()).await.unwrap();
    assert_eq!(created.name, "John Doe");
    let fetched = store.get_by_id(created.id).await.unwrap().unwrap();
    assert_eq!(fetched, john().into_employee(created.id));
}

async fn update_keeps_id(store: &dyn EmployeeStore) {
    let created = store.create(john()).await.unwrap();
    let replacement = EmployeeDraft::new("John Q. Doe", "jq@example.com", "Research").unwrap();
    let updated = store.update(created.id, replacement.clone()).await.unwrap();
    assert_eq!(updated.id, created.id);
    let fetched = store.get_by_id(created.id).await.unwrap().unwrap();
    assert_eq!(fetched, replacement.into_employee(created.id));
}

async fn unknown_ids_are_not_found(store: &dyn EmployeeStore) {
    let missing = EmployeeId(9_999);
    assert!(store.get_by_id(missing).await.unwrap().is_none());
    assert!(matches!(
        store.update(missing, john()).await,
        Err(HrError::NotFound(id)) if id == missing
    ));
    assert!(matches!(
        store.delete(missing).await,
        Err(HrError::NotFound(id)) if id == missing
    ));
}

async fn deleted_record_is_gone(store: &dyn EmployeeStore) {
    let created = store.create(john()).await.unwrap();
    let kept = store.create(jane()).await.unwrap();
    store.delete(created.id).await.unwrap();
    assert!(store.get_by_id(created.id).await.unwrap().is_none());
    let remaining = store.list_all().await.unwrap();
    assert_eq!(remaining, vec![kept]);
}

async fn ids_are_distinct(store: &dyn EmployeeStore) {
    let a = store.create(john()).await.unwrap();
    let b = store.create(john()).await.unwrap();
    assert_ne!(a.id, b.id);
}

macro_rules! contract_tests {
    ($module:ident, $make:expr) => {
        mod $module {
            use super::*;

            #[tokio::test]
            async fn empty_store_lists_nothing() {
                super::empty_store_lists_nothing(&$make).await;
            }

            #[tokio::test]
            async fn list_follows_creation_order() {
                super::list_follows_creation_order(&$make).await;
            }

            #[tokio::test]
            async fn created_record_is_readable() {
                super::created_record_is_readable(&$make).await;
            }

            #[tokio::test]
            async fn update_keeps_id() {
                super::update_keeps_id(&$make).await;
            }

            #[tokio::test]
            async fn unknown_ids_are_not_found() {
                super::unknown_ids_are_not_found(&$make).await;
            }

            #[tokio::test]
            async fn deleted_record_is_gone() {
                super::deleted_record_is_gone(&$make).await;
            }

            #[tokio::test]
            async fn ids_are_distinct() {
                super::ids_are_distinct(&$make).await;
            }

            #[tokio::test]
            async fn ping_succeeds() {
                $make.ping().await.unwrap();
            }
        }
    };
}

contract_tests!(in_memory, InMemoryEmployeeStore::new());
contract_tests!(sqlite, sqlite_store().await);
