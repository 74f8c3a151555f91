use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use platform_api::ApiError;
use platform_authz::Capability;

use crate::http::AppState;

/// Runs before every employee handler. Anonymous or badly authenticated
/// callers get 401, authenticated callers without the capability get 403.
/// On success the [`platform_authn::Principal`] is stored in request extensions.
pub async fn require_capability(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let caller = state
        .authenticator
        .authenticate(request.headers())
        .map_err(|err| {
            tracing::debug!(error = %err, "rejecting request credentials");
            ApiError::unauthorized(err.to_string())
        })?;
    let principal = state
        .policy
        .authorize(&caller, Capability::ManageEmployees)?
        .clone();
    request.extensions_mut().insert(principal);
    Ok(next.run(request).await)
}
