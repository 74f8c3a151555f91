//! Platform authentication helpers.
//!
//! Callers present `Authorization: Bearer <jwt>`; the token carries a subject
//! and a role list. An [`Authenticator`] turns request headers into a
//! [`Caller`], leaving capability decisions to `platform-authz`.

use axum::http::{HeaderMap, header::AUTHORIZATION};
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum AuthnError {
    #[error("malformed authorization header")]
    MalformedHeader,
    #[error("invalid token: {0}")]
    InvalidToken(#[from] jsonwebtoken::errors::Error),
    #[error("token lifetime of {0} minutes is out of range")]
    TokenLifetime(i64),
}

#[derive(Clone, Debug)]
pub struct AuthConfig {
    pub secret: Vec<u8>,
    pub issuer: String,
    pub token_ttl_minutes: i64,
}

impl AuthConfig {
    pub fn encoding_key(&self) -> EncodingKey {
        EncodingKey::from_secret(&self.secret)
    }

    pub fn decoding_key(&self) -> DecodingKey {
        DecodingKey::from_secret(&self.secret)
    }

    fn validation(&self) -> Validation {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[self.issuer.as_str()]);
        validation
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: String,
    pub iss: String,
    pub roles: Vec<String>,
    pub exp: usize,
    pub iat: usize,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum Role {
    Admin,
    User,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::User => "USER",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_uppercase().as_str() {
            "ADMIN" => Some(Role::Admin),
            "USER" => Some(Role::User),
            _ => None,
        }
    }

    pub fn level(self) -> u8 {
        match self {
            Role::Admin => 2,
            Role::User => 1,
        }
    }
}

/// An authenticated subject and the roles its token granted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub subject: String,
    pub roles: Vec<Role>,
}

impl Principal {
    pub fn new(subject: impl Into<String>, roles: Vec<Role>) -> Self {
        Self {
            subject: subject.into(),
            roles,
        }
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.roles.iter().any(|r| r.level() >= role.level())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Caller {
    Anonymous,
    Authenticated(Principal),
}

pub trait Authenticator: Send + Sync {
    /// A request without credentials is `Ok(Caller::Anonymous)`; credentials
    /// that are present but unusable are an error. Role names the service does
    /// not know are dropped from the principal.
    fn authenticate(&self, headers: &HeaderMap) -> Result<Caller, AuthnError>;
}

#[derive(Clone, Debug)]
pub struct JwtAuthenticator {
    config: AuthConfig,
}

impl JwtAuthenticator {
    pub fn new(config: AuthConfig) -> Self {
        Self { config }
    }
}

impl Authenticator for JwtAuthenticator {
    fn authenticate(&self, headers: &HeaderMap) -> Result<Caller, AuthnError> {
        let Some(token) = extract_bearer(headers)? else {
            return Ok(Caller::Anonymous);
        };
        let claims = decode_token(token, &self.config)?;
        let roles = claims
            .roles
            .iter()
            .filter_map(|raw| {
                let role = Role::parse(raw);
                if role.is_none() {
                    debug!(subject = %claims.sub, role = %raw, "ignoring unknown role");
                }
                role
            })
            .collect();
        Ok(Caller::Authenticated(Principal::new(claims.sub, roles)))
    }
}

fn extract_bearer(headers: &HeaderMap) -> Result<Option<&str>, AuthnError> {
    let Some(value) = headers.get(AUTHORIZATION) else {
        return Ok(None);
    };
    let text = value.to_str().map_err(|_| AuthnError::MalformedHeader)?;
    let token = text
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or(AuthnError::MalformedHeader)?;
    Ok(Some(token))
}

pub fn issue_token(
    subject: &str,
    roles: &[Role],
    config: &AuthConfig,
) -> Result<String, AuthnError> {
    let now = Utc::now();
    let exp = Duration::try_minutes(config.token_ttl_minutes)
        .and_then(|ttl| now.checked_add_signed(ttl))
        .filter(|exp| exp.timestamp() >= 0)
        .ok_or(AuthnError::TokenLifetime(config.token_ttl_minutes))?
        .timestamp() as usize;
    let claims = SessionClaims {
        sub: subject.to_string(),
        iss: config.issuer.clone(),
        roles: roles.iter().map(|r| r.as_str().to_string()).collect(),
        exp,
        iat: now.timestamp() as usize,
    };
    Ok(jsonwebtoken::encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &config.encoding_key(),
    )?)
}

pub fn decode_token(
    token: &str,
    config: &AuthConfig,
) -> jsonwebtoken::errors::Result<SessionClaims> {
    jsonwebtoken::decode::<SessionClaims>(token, &config.decoding_key(), &config.validation())
        .map(|data| data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn config() -> AuthConfig {
        AuthConfig {
            secret: b"0123456789abcdef0123456789abcdef".to_vec(),
            issuer: "employee-directory".into(),
            token_ttl_minutes: 5,
        }
    }

    fn bearer(token: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {token}")).unwrap(),
        );
        headers
    }

    #[test]
    fn missing_header_is_anonymous() {
        let auth = JwtAuthenticator::new(config());
        let caller = auth.authenticate(&HeaderMap::new()).unwrap();
        assert_eq!(caller, Caller::Anonymous);
    }

    #[test]
    fn issued_token_round_trips_roles() {
        let cfg = config();
        let token = issue_token("admin", &[Role::Admin], &cfg).unwrap();
        let caller = JwtAuthenticator::new(cfg).authenticate(&bearer(&token)).unwrap();
        let Caller::Authenticated(principal) = caller else {
            panic!("expected authenticated caller");
        };
        assert_eq!(principal.subject, "admin");
        assert!(principal.has_role(Role::Admin));
    }

    #[test]
    fn expired_token_is_rejected() {
        let mut expired = config();
        expired.token_ttl_minutes = -10;
        let token = issue_token("admin", &[Role::Admin], &expired).unwrap();
        let err = JwtAuthenticator::new(config())
            .authenticate(&bearer(&token))
            .unwrap_err();
        assert!(matches!(err, AuthnError::InvalidToken(_)));
    }

    #[test]
    fn out_of_range_lifetime_is_an_error() {
        let mut cfg = config();
        cfg.token_ttl_minutes = i64::MAX / 2;
        let err = issue_token("admin", &[Role::Admin], &cfg).unwrap_err();
        assert!(matches!(err, AuthnError::TokenLifetime(_)));
    }

    #[test]
    fn unknown_roles_are_dropped() {
        let cfg = config();
        let now = Utc::now().timestamp() as usize;
        let claims = SessionClaims {
            sub: "auditor".into(),
            iss: cfg.issuer.clone(),
            roles: vec!["ADMIN".into(), "AUDITOR".into()],
            exp: now + 300,
            iat: now,
        };
        let token =
            jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &cfg.encoding_key())
                .unwrap();
        let caller = JwtAuthenticator::new(cfg).authenticate(&bearer(&token)).unwrap();
        assert_eq!(
            caller,
            Caller::Authenticated(Principal::new("auditor", vec![Role::Admin]))
        );
    }

    #[test]
    fn user_role_does_not_satisfy_admin() {
        let principal = Principal::new("jane", vec![Role::User]);
        assert!(principal.has_role(Role::User));
        assert!(!principal.has_role(Role::Admin));
    }

    #[test]
    fn token_from_another_issuer_is_rejected() {
        let mut other = config();
        other.issuer = "someone-else".into();
        let token = issue_token("admin", &[Role::Admin], &other).unwrap();
        let err = JwtAuthenticator::new(config())
            .authenticate(&bearer(&token))
            .unwrap_err();
        assert!(matches!(err, AuthnError::InvalidToken(_)));
    }

    #[test]
    fn token_signed_with_another_secret_is_rejected() {
        let mut other = config();
        other.secret = b"ffffffffffffffffffffffffffffffff".to_vec();
        let token = issue_token("admin", &[Role::Admin], &other).unwrap();
        assert!(JwtAuthenticator::new(config()).authenticate(&bearer(&token)).is_err());
    }

    #[test]
    fn non_bearer_scheme_is_malformed() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic YWRtaW46YWRtaW4="));
        let err = JwtAuthenticator::new(config())
            .authenticate(&headers)
            .unwrap_err();
        assert!(matches!(err, AuthnError::MalformedHeader));
    }

    #[test]
    fn role_parsing_is_case_insensitive() {
        assert_eq!(Role::parse("admin"), Some(Role::Admin));
        assert_eq!(Role::parse("USER"), Some(Role::User));
        assert_eq!(Role::parse("owner"), None);
    }
}
