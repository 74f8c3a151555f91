//! Employee resource endpoint mounted at `/api/employees`.

use axum::{
    Extension, Json, Router,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
    middleware,
    routing::get,
};
use platform_api::{ApiError, ApiResult};
use platform_authn::Principal;
use products_hr::{Employee, EmployeeId, EmployeePayload, HrError};
use tracing::{info, instrument};

use crate::{auth::require_capability, http::AppState};

pub fn router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/api/employees", get(list_employees).post(create_employee))
        .route(
            "/api/employees/{id}",
            get(get_employee).put(update_employee).delete(delete_employee),
        )
        .route_layer(middleware::from_fn_with_state(state, require_capability))
}

fn employee_id(path: Result<Path<i64>, PathRejection>) -> ApiResult<EmployeeId> {
    path.map(|Path(id)| EmployeeId(id))
        .map_err(|rejection| ApiError::invalid_input(rejection.body_text()))
}

fn payload(body: Result<Json<EmployeePayload>, JsonRejection>) -> ApiResult<EmployeePayload> {
    body.map(|Json(payload)| payload)
        .map_err(|rejection| ApiError::invalid_input(rejection.body_text()))
}

#[instrument(name = "employees.list", skip_all)]
async fn list_employees(State(state): State<AppState>) -> ApiResult<Json<Vec<Employee>>> {
    let employees = state.store.list_all().await?;
    Ok(Json(employees))
}

#[instrument(name = "employees.get", skip_all)]
async fn get_employee(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<Employee>> {
    let id = employee_id(path)?;
    let employee = state
        .store
        .get_by_id(id)
        .await?
        .ok_or(HrError::NotFound(id))?;
    Ok(Json(employee))
}

#[instrument(name = "employees.create", skip_all)]
async fn create_employee(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    body: Result<Json<EmployeePayload>, JsonRejection>,
) -> ApiResult<Json<Employee>> {
    let draft = payload(body)?.into_draft()?;
    let employee = state.store.create(draft).await?;
    info!(actor = %principal.subject, id = %employee.id, "employee created");
    Ok(Json(employee))
}

#[instrument(name = "employees.update", skip_all)]
async fn update_employee(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    path: Result<Path<i64>, PathRejection>,
    body: Result<Json<EmployeePayload>, JsonRejection>,
) -> ApiResult<Json<Employee>> {
    let id = employee_id(path)?;
    let draft = payload(body)?.into_draft_for(id)?;
    let employee = state.store.update(id, draft).await?;
    info!(actor = %principal.subject, %id, "employee updated");
    Ok(Json(employee))
}

#[instrument(name = "employees.delete", skip_all)]
async fn delete_employee(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    path: Result<Path<i64>, PathRejection>,
) -> ApiResult<StatusCode> {
    let id = employee_id(path)?;
    state.store.delete(id).await?;
    info!(actor = %principal.subject, %id, "employee deleted");
    Ok(StatusCode::NO_CONTENT)
}
