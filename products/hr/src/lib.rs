//! HR module: employee records, payload validation and the stores that hold them.

mod error;
mod model;
pub mod store;

pub use error::{HrError, HrResult};
pub use model::{Employee, EmployeeDraft, EmployeeId, EmployeePayload};
pub use store::{EmployeeStore, InMemoryEmployeeStore, SeaOrmEmployeeStore};

/// Demo roster used by the `seed` command.
pub fn demo_roster() -> Vec<EmployeeDraft> {
    [
        ("John Doe", "john.doe@example.com", "Engineering"),
        ("Jane Smith", "jane.smith@example.com", "Marketing"),
    ]
    .into_iter()
    .filter_map(|(name, email, department)| EmployeeDraft::new(name, email, department).ok())
    .collect()
}

/// Insert [`demo_roster`] into an empty store. Returns the records created,
/// which is empty when the store already held data.
pub async fn seed_demo(store: &dyn EmployeeStore) -> HrResult<Vec<Employee>> {
    if !store.list_all().await?.is_empty() {
        tracing::info!("employee store already populated; skipping seed");
        return Ok(Vec::new());
    }
    let mut created = Vec::new();
    for draft in demo_roster() {
        created.push(store.create(draft).await?);
    }
    tracing::info!(count = created.len(), "seeded demo employees");
    Ok(created)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn seeding_only_fills_an_empty_store() {
        let store = InMemoryEmployeeStore::new();
        let first = seed_demo(&store).await.unwrap();
        assert_eq!(first.len(), 2);
        assert_eq!(first[0].name, "John Doe");
        assert_eq!(first[1].name, "Jane Smith");

        let second = seed_demo(&store).await.unwrap();
        assert!(second.is_empty());
        assert_eq!(store.list_all().await.unwrap().len(), 2);
    }
}
