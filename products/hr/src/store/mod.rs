//! Persistence contract for employee records and its implementations.

mod database;
mod memory;

use async_trait::async_trait;

use crate::{Employee, EmployeeDraft, EmployeeId, HrResult};

pub use database::SeaOrmEmployeeStore;
pub use memory::InMemoryEmployeeStore;

#[async_trait]
pub trait EmployeeStore: Send + Sync {
    /// All employees in the order they were created.
    async fn list_all(&self) -> HrResult<Vec<Employee>>;

    async fn get_by_id(&self, id: EmployeeId) -> HrResult<Option<Employee>>;

    /// Persist a draft and return it with its assigned id.
    async fn create(&self, draft: EmployeeDraft) -> HrResult<Employee>;

    /// Replace every field except the id. Fails with `NotFound` when no
    /// employee has `id`.
    async fn update(&self, id: EmployeeId, draft: EmployeeDraft) -> HrResult<Employee>;

    /// Fails with `NotFound` when no employee has `id`.
    async fn delete(&self, id: EmployeeId) -> HrResult<()>;

    async fn ping(&self) -> HrResult<()> {
        Ok(())
    }
}
