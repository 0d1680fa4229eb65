use axum::{
    extract::State,
    http::{header::SET_COOKIE, StatusCode},
    response::{AppendHeaders, IntoResponse, Json},
};
use common::{RegistrationRequestDto, UserDto};
use model::entities::user::UserRole;
use serde::{Deserialize, Serialize};
use service::{mapping::user_dto, RegisterFarmer, RegisterUser};
use tracing::{debug, info, instrument};
use utoipa::ToSchema;
use validator::Validate;

use crate::auth::{CurrentUser, SessionStore};
use crate::error::{ApiError, ApiResult};
use crate::extract::ValidJson;
use crate::schemas::{ApiResponse, AppState, ErrorResponse};

/// Request body for logging in
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, max = 50))]
    pub username: String,
    #[validate(length(min = 1))]
    pub password: String,
}

/// Session token plus the logged-in user
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct LoginResponse {
    /// Send back as `Authorization: Bearer <token>` or via the session cookie
    pub token: String,
    pub user: UserDto,
}

/// Sign-up form. Farmers without an employee session end up as a pending
/// registration request; employees create accounts directly.
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 4, max = 50))]
    pub username: String,
    #[validate(length(min = 6, max = 100))]
    pub password: String,
    #[validate(must_match(other = "password"))]
    pub confirm_password: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1, max = 50))]
    pub first_name: String,
    #[validate(length(min = 1, max = 50))]
    pub last_name: String,
    #[validate(length(min = 1, max = 20))]
    pub phone_number: String,
    /// "Farmer" (default) or "Employee"
    pub role: Option<String>,
    /// Required for farmers
    #[validate(length(max = 100))]
    pub farm_name: Option<String>,
    /// Required for farmers
    #[validate(length(max = 100))]
    pub location: Option<String>,
}

/// Exactly one of the fields is set: the created account, or the pending
/// request awaiting approval.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct RegisterResponse {
    pub user: Option<UserDto>,
    pub request: Option<RegistrationRequestDto>,
}

fn parse_role(role: Option<&str>) -> ApiResult<UserRole> {
    match role.map(str::trim) {
        None | Some("") => Ok(UserRole::Farmer),
        Some(r) if r.eq_ignore_ascii_case("farmer") => Ok(UserRole::Farmer),
        Some(r) if r.eq_ignore_ascii_case("employee") => Ok(UserRole::Employee),
        Some(other) => Err(ApiError::bad_request(format!("Invalid role: {}", other))),
    }
}

/// Log in
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in; the session cookie is set", body = ApiResponse<LoginResponse>),
        (status = 401, description = "Invalid credentials", body = ErrorResponse)
    )
)]
#[instrument(skip(state, request), fields(username = %request.username))]
pub async fn login(
    State(state): State<AppState>,
    ValidJson(request): ValidJson<LoginRequest>,
) -> ApiResult<impl IntoResponse> {
    let user = state
        .auth()
        .authenticate(&request.username, &request.password)
        .await?;

    let token = state.sessions.create(user.id).await;
    let cookie = state.sessions.cookie(&token);
    info!(user_id = user.id, "Login succeeded");

    Ok((
        AppendHeaders([(SET_COOKIE, cookie)]),
        Json(ApiResponse::ok(
            LoginResponse {
                token,
                user: user_dto(&user),
            },
            "Logged in successfully",
        )),
    ))
}

/// Log out and drop the session
#[utoipa::path(
    post,
    path = "/api/v1/auth/logout",
    tag = "auth",
    responses(
        (status = 200, description = "Logged out", body = ApiResponse<String>),
        (status = 401, description = "No session", body = ErrorResponse)
    )
)]
#[instrument(skip(state, current), fields(user_id = current.id()))]
pub async fn logout(State(state): State<AppState>, current: CurrentUser) -> impl IntoResponse {
    state.sessions.remove(&current.token).await;
    debug!("Session removed");
    (
        AppendHeaders([(SET_COOKIE, SessionStore::expired_cookie())]),
        Json(ApiResponse::ok(String::new(), "Logged out successfully")),
    )
}

/// Current user
#[utoipa::path(
    get,
    path = "/api/v1/auth/me",
    tag = "auth",
    responses(
        (status = 200, description = "The logged-in user", body = ApiResponse<UserDto>),
        (status = 401, description = "No session", body = ErrorResponse)
    )
)]
pub async fn me(current: CurrentUser) -> Json<ApiResponse<UserDto>> {
    Json(ApiResponse::ok(user_dto(&current.user), "User retrieved successfully"))
}

/// Register a farmer or an employee
#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    tag = "auth",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created, or registration request submitted", body = ApiResponse<RegisterResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 403, description = "Only employees may create employee accounts", body = ErrorResponse),
        (status = 409, description = "Username or e-mail already in use", body = ErrorResponse)
    )
)]
#[instrument(skip(state, current, request), fields(username = %request.username))]
pub async fn register(
    State(state): State<AppState>,
    current: Option<CurrentUser>,
    ValidJson(request): ValidJson<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<RegisterResponse>>)> {
    let role = parse_role(request.role.as_deref())?;
    let by_employee = current.as_ref().is_some_and(CurrentUser::is_employee);

    if by_employee {
        let user = state
            .auth()
            .register_user(RegisterUser {
                username: request.username,
                password: request.password,
                email: request.email,
                first_name: request.first_name,
                last_name: request.last_name,
                phone_number: request.phone_number,
                role,
                farm_name: request.farm_name,
                location: request.location,
            })
            .await?;
        info!(user_id = user.id, role = %user.role, "Account registered by employee");
        return Ok((
            StatusCode::CREATED,
            Json(ApiResponse::ok(
                RegisterResponse {
                    user: Some(user_dto(&user)),
                    request: None,
                },
                "User registered successfully",
            )),
        ));
    }

    if role == UserRole::Employee {
        return Err(ApiError::forbidden("Only employees can register employee accounts"));
    }

    let pending = state
        .registrations()
        .create_request(RegisterFarmer {
            username: request.username,
            password: request.password,
            email: request.email,
            first_name: request.first_name,
            last_name: request.last_name,
            phone_number: request.phone_number,
            farm_name: request.farm_name.unwrap_or_default(),
            location: request.location.unwrap_or_default(),
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(
            RegisterResponse {
                user: None,
                request: Some(pending),
            },
            "Registration request submitted. An employee will review it shortly.",
        )),
    ))
}
