use platform_api::ApiError;
use sea_orm::DbErr;
use thiserror::Error;

use crate::model::EmployeeId;

pub type HrResult<T> = Result<T, HrError>;

#[derive(Debug, Error)]
pub enum HrError {
    #[error("employee {0} not found")]
    NotFound(EmployeeId),
    #[error("{field} {reason}")]
    Invalid { field: &'static str, reason: String },
    #[error("database error: {0}")]
    Database(#[from] DbErr),
}

impl HrError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

impl From<HrError> for ApiError {
    fn from(value: HrError) -> Self {
        match value {
            HrError::NotFound(_) => ApiError::not_found(value.to_string()),
            HrError::Invalid { .. } => ApiError::invalid_input(value.to_string()),
            HrError::Database(err) => ApiError::internal(err.into()),
        }
    }
}
