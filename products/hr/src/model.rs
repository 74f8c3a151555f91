use std::fmt;

use entity::employees;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{HrError, HrResult};

const MAX_NAME_LEN: usize = 255;
const MAX_DEPARTMENT_LEN: usize = 255;
const MAX_EMAIL_LEN: usize = 320;

/// Store-assigned identifier of a persisted employee.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmployeeId(pub i64);

impl fmt::Display for EmployeeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A persisted employee. The id is always assigned.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    pub id: EmployeeId,
    pub name: String,
    pub email: String,
    pub department: String,
}

impl From<employees::Model> for Employee {
    fn from(model: employees::Model) -> Self {
        Self {
            id: EmployeeId(model.id),
            name: model.name,
            email: model.email,
            department: model.department,
        }
    }
}

/// Validated employee fields that have not been given an id yet.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EmployeeDraft {
    name: String,
    email: String,
    department: String,
}

impl EmployeeDraft {
    pub fn new(
        name: impl AsRef<str>,
        email: impl AsRef<str>,
        department: impl AsRef<str>,
    ) -> HrResult<Self> {
        Ok(Self {
            name: required_text("name", name.as_ref(), MAX_NAME_LEN)?,
            email: validate_email(email.as_ref())?,
            department: required_text("department", department.as_ref(), MAX_DEPARTMENT_LEN)?,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn department(&self) -> &str {
        &self.department
    }

    pub fn into_employee(self, id: EmployeeId) -> Employee {
        Employee {
            id,
            name: self.name,
            email: self.email,
            department: self.department,
        }
    }
}

/// Request body for create and update. Every field is optional on the wire so
/// that a missing field is reported by name instead of as a decode failure.
/// `id` is kept as raw JSON: create discards it whatever its type.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct EmployeePayload {
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
}

impl EmployeePayload {
    /// Validate for creation. A client-supplied id is ignored.
    pub fn into_draft(self) -> HrResult<EmployeeDraft> {
        let name = self.name.ok_or_else(|| missing("name"))?;
        let email = self.email.ok_or_else(|| missing("email"))?;
        let department = self.department.ok_or_else(|| missing("department"))?;
        EmployeeDraft::new(name, email, department)
    }

    /// Validate for replacing the record at `target`. A body id, when
    /// present, must equal `target`.
    pub fn into_draft_for(self, target: EmployeeId) -> HrResult<EmployeeDraft> {
        if let Some(body_id) = &self.id {
            if body_id.as_i64() != Some(target.0) {
                return Err(HrError::invalid(
                    "id",
                    format!("{body_id} does not match path id {target}"),
                ));
            }
        }
        self.into_draft()
    }
}

fn missing(field: &'static str) -> HrError {
    HrError::invalid(field, "is required")
}

fn required_text(field: &'static str, raw: &str, max_len: usize) -> HrResult<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(HrError::invalid(field, "must not be blank"));
    }
    if trimmed.chars().count() > max_len {
        return Err(HrError::invalid(
            field,
            format!("must be at most {max_len} characters"),
        ));
    }
    Ok(trimmed.to_string())
}

fn validate_email(raw: &str) -> HrResult<String> {
    let email = required_text("email", raw, MAX_EMAIL_LEN)?;
    if is_plausible_email(&email) {
        Ok(email)
    } else {
        Err(HrError::invalid("email", "is not a valid address"))
    }
}

fn is_plausible_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    let labels: Vec<&str> = domain.split('.').collect();
    labels.len() >= 2 && labels.iter().all(|label| !label.is_empty())
}
