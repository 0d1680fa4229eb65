use axum::response::Json;
use common::CategoryDto;
use service::category::all_categories;

use crate::auth::CurrentUser;
use crate::schemas::{ApiResponse, ErrorResponse};

/// Product category catalogue with display colours
#[utoipa::path(
    get,
    path = "/api/v1/categories",
    tag = "categories",
    responses(
        (status = 200, description = "All categories", body = ApiResponse<Vec<CategoryDto>>),
        (status = 401, description = "No session", body = ErrorResponse)
    )
)]
pub async fn get_categories(_current: CurrentUser) -> Json<ApiResponse<Vec<CategoryDto>>> {
    Json(ApiResponse::ok(all_categories(), "Categories retrieved successfully"))
}
