//! Handlers for `/api/v1/employees`.
//!
//! Each handler makes one service call and translates its outcome:
//! `Ok(None)` becomes 404, a service fault becomes 500.

use std::time::Instant;

use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use futures::{future, stream, StreamExt, TryStreamExt};
use service::{employee::EmployeeDto, errors::ServiceError};
use tracing::{error, info};

use super::ServerState;
use crate::errors::JsonApiError;
use crate::observability::{record, Outcome};

#[utoipa::path(
    post, path = "/api/v1/employees/create", tag = "employees",
    request_body = crate::openapi::EmployeeDtoDoc,
    responses(
        (status = 201, description = "Created", body = crate::openapi::EmployeeDtoDoc),
        (status = 422, description = "Missing field"),
        (status = 500, description = "Save Failed")
    )
)]
pub async fn create(
    State(state): State<ServerState>,
    Json(input): Json<EmployeeDto>,
) -> Result<(StatusCode, Json<EmployeeDto>), JsonApiError> {
    let started = Instant::now();
    match state.employees.save(input).await {
        Ok(dto) => {
            record("create", Outcome::Ok, started);
            info!(employee_id = %dto.id, "employee created");
            Ok((StatusCode::CREATED, Json(dto)))
        }
        Err(e) => {
            record("create", Outcome::Error, started);
            error!(err = %e, "save employee failed");
            Err(JsonApiError::internal("Save Failed", e))
        }
    }
}

#[utoipa::path(
    get, path = "/api/v1/employees/{employeeId}", tag = "employees",
    params(("employeeId" = String, Path, description = "Employee ID")),
    responses(
        (status = 200, description = "OK", body = crate::openapi::EmployeeDtoDoc),
        (status = 404, description = "Not Found"),
        (status = 500, description = "Lookup Failed")
    )
)]
pub async fn get(
    State(state): State<ServerState>,
    Path(employee_id): Path<String>,
) -> Result<Json<EmployeeDto>, JsonApiError> {
    let started = Instant::now();
    match state.employees.get(&employee_id).await {
        Ok(Some(dto)) => {
            record("get", Outcome::Ok, started);
            Ok(Json(dto))
        }
        Ok(None) => {
            record("get", Outcome::NotFound, started);
            Err(JsonApiError::not_found(&employee_id))
        }
        Err(e) => {
            record("get", Outcome::Error, started);
            error!(err = %e, %employee_id, "get employee failed");
            Err(JsonApiError::internal("Lookup Failed", e))
        }
    }
}

/// Streams a JSON array. The first element is pulled before the status line
/// is committed so an immediate store fault still maps to 500; a fault after
/// that aborts the body.
#[utoipa::path(
    get, path = "/api/v1/employees", tag = "employees",
    responses(
        (status = 200, description = "List OK", body = [crate::openapi::EmployeeDtoDoc]),
        (status = 500, description = "List Failed")
    )
)]
pub async fn list(State(state): State<ServerState>) -> Result<Response, JsonApiError> {
    let started = Instant::now();
    let mut rows = state.employees.list();

    let first = match rows.next().await {
        None => {
            record("list", Outcome::Ok, started);
            return Ok(json_body(Body::from("[]")));
        }
        Some(Err(e)) => {
            record("list", Outcome::Error, started);
            error!(err = %e, "list employees failed");
            return Err(JsonApiError::internal("List Failed", e));
        }
        Some(Ok(dto)) => dto,
    };

    let mut head = b"[".to_vec();
    serde_json::to_writer(&mut head, &first).map_err(|e| JsonApiError::internal("List Failed", e))?;
    record("list", Outcome::Ok, started);

    let tail = rows
        .map(|row| -> Result<Vec<u8>, ServiceError> {
            let mut chunk = vec![b','];
            serde_json::to_writer(&mut chunk, &row?)?;
            Ok(chunk)
        })
        .inspect_err(|e| error!(err = %e, "list employees aborted mid-stream"));

    let body = stream::once(future::ready(Ok(head)))
        .chain(tail)
        .chain(stream::once(future::ready(Ok(b"]".to_vec()))));
    Ok(json_body(Body::from_stream(body)))
}

fn json_body(body: Body) -> Response {
    ([(header::CONTENT_TYPE, "application/json")], body).into_response()
}

#[utoipa::path(
    put, path = "/api/v1/employees/update/{employeeId}", tag = "employees",
    params(("employeeId" = String, Path, description = "Employee ID")),
    request_body = crate::openapi::EmployeeDtoDoc,
    responses(
        (status = 200, description = "Updated", body = crate::openapi::EmployeeDtoDoc),
        (status = 404, description = "Not Found"),
        (status = 422, description = "Missing field"),
        (status = 500, description = "Update Failed")
    )
)]
pub async fn update(
    State(state): State<ServerState>,
    Path(employee_id): Path<String>,
    Json(input): Json<EmployeeDto>,
) -> Result<Json<EmployeeDto>, JsonApiError> {
    let started = Instant::now();
    match state.employees.update(&employee_id, input).await {
        Ok(Some(dto)) => {
            record("update", Outcome::Ok, started);
            info!(employee_id = %dto.id, "employee updated");
            Ok(Json(dto))
        }
        Ok(None) => {
            record("update", Outcome::NotFound, started);
            Err(JsonApiError::not_found(&employee_id))
        }
        Err(e) => {
            record("update", Outcome::Error, started);
            error!(err = %e, %employee_id, "update employee failed");
            Err(JsonApiError::internal("Update Failed", e))
        }
    }
}

#[utoipa::path(
    delete, path = "/api/v1/employees/delete/{employeeId}", tag = "employees",
    params(("employeeId" = String, Path, description = "Employee ID")),
    responses(
        (status = 204, description = "Deleted, or nothing to delete"),
        (status = 500, description = "Delete Failed")
    )
)]
pub async fn delete(
    State(state): State<ServerState>,
    Path(employee_id): Path<String>,
) -> Result<StatusCode, JsonApiError> {
    let started = Instant::now();
    match state.employees.delete(&employee_id).await {
        Ok(()) => {
            record("delete", Outcome::Ok, started);
            info!(%employee_id, "employee deleted");
            Ok(StatusCode::NO_CONTENT)
        }
        Err(e) => {
            record("delete", Outcome::Error, started);
            error!(err = %e, %employee_id, "delete employee failed");
            Err(JsonApiError::internal("Delete Failed", e))
        }
    }
}
