use axum::{extract::State, response::Json};
use common::EmployeeDashboard;
use tracing::instrument;

use crate::auth::Employee;
use crate::error::ApiResult;
use crate::schemas::{ApiResponse, AppState, ErrorResponse};

/// Employee dashboard
#[utoipa::path(
    get,
    path = "/api/v1/dashboard/employee",
    tag = "dashboard",
    responses(
        (status = 200, description = "Employee dashboard", body = ApiResponse<EmployeeDashboard>),
        (status = 403, description = "Employee role required", body = ErrorResponse)
    )
)]
#[instrument(skip(state, _employee))]
pub async fn get_employee_dashboard(
    State(state): State<AppState>,
    _employee: Employee,
) -> ApiResult<Json<ApiResponse<EmployeeDashboard>>> {
    let dashboard = state.dashboards().employee_dashboard(service::now()).await?;
    Ok(Json(ApiResponse::ok(dashboard, "Dashboard retrieved successfully")))
}
