use axum::{
    extract::{Path, State},
    response::Json,
};
use common::{RegistrationRequestDto, UserDto};
use serde::{Deserialize, Serialize};
use service::mapping::user_dto;
use tracing::{info, instrument};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::auth::Employee;
use crate::error::ApiResult;
use crate::extract::{ValidJson, ValidQuery};
use crate::schemas::{ApiResponse, AppState, ErrorResponse};

/// Query parameters for listing registration requests
#[derive(Debug, Deserialize, ToSchema, IntoParams, Validate)]
pub struct RegistrationRequestQuery {
    /// Include approved and rejected requests (default: pending only)
    pub include_processed: Option<bool>,
}

/// Request body for rejecting a registration request
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
pub struct RejectRequest {
    /// Shown to the applicant
    #[validate(length(min = 1, max = 500))]
    pub reason: String,
}

/// List registration requests, newest first
#[utoipa::path(
    get,
    path = "/api/v1/registration-requests",
    tag = "registration-requests",
    params(RegistrationRequestQuery),
    responses(
        (status = 200, description = "Registration requests", body = ApiResponse<Vec<RegistrationRequestDto>>),
        (status = 401, description = "No session", body = ErrorResponse),
        (status = 403, description = "Employee role required", body = ErrorResponse)
    )
)]
#[instrument(skip(state, _employee))]
pub async fn get_registration_requests(
    State(state): State<AppState>,
    _employee: Employee,
    ValidQuery(query): ValidQuery<RegistrationRequestQuery>,
) -> ApiResult<Json<ApiResponse<Vec<RegistrationRequestDto>>>> {
    let registrations = state.registrations();
    let requests = if query.include_processed.unwrap_or(false) {
        registrations.get_all_requests().await?
    } else {
        registrations.get_pending_requests().await?
    };

    Ok(Json(ApiResponse::ok(
        requests,
        "Registration requests retrieved successfully",
    )))
}

/// Get a single registration request
#[utoipa::path(
    get,
    path = "/api/v1/registration-requests/{id}",
    tag = "registration-requests",
    params(("id" = i32, Path, description = "Registration request ID")),
    responses(
        (status = 200, description = "Registration request", body = ApiResponse<RegistrationRequestDto>),
        (status = 404, description = "Not found", body = ErrorResponse)
    )
)]
#[instrument(skip(state, _employee))]
pub async fn get_registration_request(
    State(state): State<AppState>,
    _employee: Employee,
    Path(id): Path<i32>,
) -> ApiResult<Json<ApiResponse<RegistrationRequestDto>>> {
    let request = state.registrations().get_request(id).await?;
    Ok(Json(ApiResponse::ok(request, "Registration request retrieved successfully")))
}

/// Approve a pending registration request and create the farmer account
#[utoipa::path(
    post,
    path = "/api/v1/registration-requests/{id}/approve",
    tag = "registration-requests",
    params(("id" = i32, Path, description = "Registration request ID")),
    responses(
        (status = 200, description = "Approved; returns the new user", body = ApiResponse<UserDto>),
        (status = 404, description = "Not found", body = ErrorResponse),
        (status = 409, description = "Already processed, or username/e-mail taken", body = ErrorResponse)
    )
)]
#[instrument(skip(state, employee), fields(employee_id = employee.0.id()))]
pub async fn approve_registration_request(
    State(state): State<AppState>,
    employee: Employee,
    Path(id): Path<i32>,
) -> ApiResult<Json<ApiResponse<UserDto>>> {
    let user = state.registrations().approve_request(id).await?;
    info!(request_id = id, user_id = user.id, "Registration request approved");
    Ok(Json(ApiResponse::ok(
        user_dto(&user),
        format!("Registration request for {} has been approved", user.username),
    )))
}

/// Reject a pending registration request
#[utoipa::path(
    post,
    path = "/api/v1/registration-requests/{id}/reject",
    tag = "registration-requests",
    params(("id" = i32, Path, description = "Registration request ID")),
    request_body = RejectRequest,
    responses(
        (status = 200, description = "Rejected", body = ApiResponse<RegistrationRequestDto>),
        (status = 400, description = "Missing reason", body = ErrorResponse),
        (status = 404, description = "Not found", body = ErrorResponse),
        (status = 409, description = "Already processed", body = ErrorResponse)
    )
)]
#[instrument(skip(state, employee, request), fields(employee_id = employee.0.id()))]
pub async fn reject_registration_request(
    State(state): State<AppState>,
    employee: Employee,
    Path(id): Path<i32>,
    ValidJson(request): ValidJson<RejectRequest>,
) -> ApiResult<Json<ApiResponse<RegistrationRequestDto>>> {
    let rejected = state.registrations().reject_request(id, &request.reason).await?;
    info!(request_id = id, "Registration request rejected");
    Ok(Json(ApiResponse::ok(
        rejected,
        "Registration request has been rejected",
    )))
}
