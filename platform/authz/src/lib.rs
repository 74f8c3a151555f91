//! Authorization primitives for HR modules.

use platform_api::ApiError;
use platform_authn::{Caller, Principal, Role};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthzError {
    #[error("authentication required")]
    Unauthenticated,
    #[error("{subject} lacks capability {capability}")]
    Denied { subject: String, capability: String },
}

impl From<AuthzError> for ApiError {
    fn from(value: AuthzError) -> Self {
        match value {
            AuthzError::Unauthenticated => ApiError::unauthorized(value.to_string()),
            AuthzError::Denied { .. } => ApiError::forbidden(value.to_string()),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Capability {
    ManageEmployees,
}

impl Capability {
    pub fn as_str(self) -> &'static str {
        match self {
            Capability::ManageEmployees => "employees:manage",
        }
    }

    pub fn required_role(self) -> Role {
        match self {
            Capability::ManageEmployees => Role::Admin,
        }
    }
}

#[derive(Default, Debug, Clone, Copy)]
pub struct PolicyEngine;

impl PolicyEngine {
    pub fn authorize<'a>(
        &self,
        caller: &'a Caller,
        capability: Capability,
    ) -> Result<&'a Principal, AuthzError> {
        let Caller::Authenticated(principal) = caller else {
            return Err(AuthzError::Unauthenticated);
        };
        if principal.has_role(capability.required_role()) {
            Ok(principal)
        } else {
            tracing::warn!(
                subject = %principal.subject,
                capability = capability.as_str(),
                "capability denied"
            );
            Err(AuthzError::Denied {
                subject: principal.subject.clone(),
                capability: capability.as_str().to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anonymous_caller_is_unauthenticated() {
        let err = PolicyEngine
            .authorize(&Caller::Anonymous, Capability::ManageEmployees)
            .unwrap_err();
        assert_eq!(err, AuthzError::Unauthenticated);
        assert_eq!(ApiError::from(err).code(), "UNAUTHORIZED");
    }

    #[test]
    fn user_role_is_denied() {
        let caller = Caller::Authenticated(Principal::new("jane", vec![Role::User]));
        let err = PolicyEngine
            .authorize(&caller, Capability::ManageEmployees)
            .unwrap_err();
        assert!(matches!(err, AuthzError::Denied { .. }));
        assert_eq!(ApiError::from(err).code(), "FORBIDDEN");
    }

    #[test]
    fn admin_role_is_allowed() {
        let caller = Caller::Authenticated(Principal::new("admin", vec![Role::User, Role::Admin]));
        let principal = PolicyEngine
            .authorize(&caller, Capability::ManageEmployees)
            .unwrap();
        assert_eq!(principal.subject, "admin");
    }
}
