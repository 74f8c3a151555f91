use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::EmployeeStore;
use crate::{Employee, EmployeeDraft, EmployeeId, HrError, HrResult};

/// Process-local employee store. Ids start at 1 and are never reused, so
/// ordering by id is creation order.
#[derive(Debug, Default)]
pub struct InMemoryEmployeeStore {
    inner: RwLock<Roster>,
}

#[derive(Debug, Default)]
struct Roster {
    last_id: i64,
    records: BTreeMap<EmployeeId, Employee>,
}

impl InMemoryEmployeeStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EmployeeStore for InMemoryEmployeeStore {
    async fn list_all(&self) -> HrResult<Vec<Employee>> {
        let roster = self.inner.read().await;
        Ok(roster.records.values().cloned().collect())
    }

    async fn get_by_id(&self, id: EmployeeId) -> HrResult<Option<Employee>> {
        let roster = self.inner.read().await;
        Ok(roster.records.get(&id).cloned())
    }

    async fn create(&self, draft: EmployeeDraft) -> HrResult<Employee> {
        let mut roster = self.inner.write().await;
        roster.last_id += 1;
        let employee = draft.into_employee(EmployeeId(roster.last_id));
        roster.records.insert(employee.id, employee.clone());
        Ok(employee)
    }

    async fn update(&self, id: EmployeeId, draft: EmployeeDraft) -> HrResult<Employee> {
        let mut roster = self.inner.write().await;
        let slot = roster.records.get_mut(&id).ok_or(HrError::NotFound(id))?;
        *slot = draft.into_employee(id);
        Ok(slot.clone())
    }

    async fn delete(&self, id: EmployeeId) -> HrResult<()> {
        let mut roster = self.inner.write().await;
        roster
            .records
            .remove(&id)
            .map(|_| ())
            .ok_or(HrError::NotFound(id))
    }
}
