use async_trait::async_trait;
use entity::employees;
use sea_orm::{
    ActiveModelTrait,
    ActiveValue::{NotSet, Set},
    DatabaseConnection, DbErr, EntityTrait, QueryOrder,
};

use super::EmployeeStore;
use crate::{Employee, EmployeeDraft, EmployeeId, HrError, HrResult};

/// Employee store backed by the `employees` table.
#[derive(Clone, Debug)]
pub struct SeaOrmEmployeeStore {
    db: DatabaseConnection,
}

impl SeaOrmEmployeeStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl EmployeeStore for SeaOrmEmployeeStore {
    async fn list_all(&self) -> HrResult<Vec<Employee>> {
        let rows = employees::Entity::find()
            .order_by_asc(employees::Column::Id)
            .all(&self.db)
            .await?;
        Ok(rows.into_iter().map(Employee::from).collect())
    }

    async fn get_by_id(&self, id: EmployeeId) -> HrResult<Option<Employee>> {
        let row = employees::Entity::find_by_id(id.0).one(&self.db).await?;
        Ok(row.map(Employee::from))
    }

    async fn create(&self, draft: EmployeeDraft) -> HrResult<Employee> {
        let active = employees::ActiveModel {
            id: NotSet,
            name: Set(draft.name().to_string()),
            email: Set(draft.email().to_string()),
            department: Set(draft.department().to_string()),
        };
        let model = active.insert(&self.db).await?;
        tracing::debug!(id = model.id, "employee row inserted");
        Ok(model.into())
    }

    async fn update(&self, id: EmployeeId, draft: EmployeeDraft) -> HrResult<Employee> {
        let existing = employees::Entity::find_by_id(id.0)
            .one(&self.db)
            .await?
            .ok_or(HrError::NotFound(id))?;
        let mut active: employees::ActiveModel = existing.into();
        active.name = Set(draft.name().to_string());
        active.email = Set(draft.email().to_string());
        active.department = Set(draft.department().to_string());
        match active.update(&self.db).await {
            Ok(model) => Ok(model.into()),
            // Row removed between the lookup and the update.
            Err(DbErr::RecordNotUpdated) => Err(HrError::NotFound(id)),
            Err(err) => Err(err.into()),
        }
    }

    async fn delete(&self, id: EmployeeId) -> HrResult<()> {
        let res = employees::Entity::delete_by_id(id.0).exec(&self.db).await?;
        if res.rows_affected == 0 {
            return Err(HrError::NotFound(id));
        }
        Ok(())
    }

    async fn ping(&self) -> HrResult<()> {
        self.db.ping().await.map_err(Into::into)
    }
}
