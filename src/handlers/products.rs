use axum::{
    extract::{Path, State},
    response::Json,
};
use chrono::NaiveDate;
use common::{ProductDto, ProductPage};
use serde::{Deserialize, Serialize};
use service::{NewProduct, Pagination, ProductFilter};
use tracing::{info, instrument};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::auth::{CurrentUser, Employee};
use crate::error::{ApiError, ApiResult};
use crate::extract::ValidQuery;
use crate::schemas::{ApiResponse, AppState, ErrorResponse};

/// Product fields a farmer submits when adding or editing a product
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
pub struct ProductRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(length(min = 1, max = 100))]
    pub category: String,
    pub production_date: NaiveDate,
    #[validate(length(max = 500))]
    pub description: Option<String>,
}

impl From<ProductRequest> for NewProduct {
    fn from(request: ProductRequest) -> Self {
        NewProduct {
            name: request.name,
            category: request.category,
            production_date: request.production_date,
            description: request.description,
        }
    }
}

/// Query parameters for the employee product listing
#[derive(Debug, Deserialize, ToSchema, IntoParams, Validate)]
pub struct ProductQuery {
    /// Only this farmer's products
    pub farmer_id: Option<i32>,
    /// Inclusive lower bound on the production date
    pub start_date: Option<NaiveDate>,
    /// Inclusive upper bound on the production date
    pub end_date: Option<NaiveDate>,
    /// Category name; "All Categories" disables the filter
    pub category: Option<String>,
    /// Matches name, description or category
    pub search: Option<String>,
    /// Only active (true) or inactive (false) products
    pub active: Option<bool>,
    /// Page number (default: 1)
    #[validate(range(min = 1, max = 10000))]
    pub page: Option<u64>,
    /// Page size (default: 10)
    #[validate(range(min = 1, max = 100))]
    pub page_size: Option<u64>,
}

/// Employees see every product; farmers only their own.
async fn owner_scope(state: &AppState, current: &CurrentUser) -> ApiResult<Option<i32>> {
    if current.is_employee() {
        return Ok(None);
    }
    state
        .farmers()
        .farmer_id_for_user(current.id())
        .await?
        .map(Some)
        .ok_or_else(|| ApiError::forbidden("No farm profile for this account"))
}

/// List products (employees)
#[utoipa::path(
    get,
    path = "/api/v1/products",
    tag = "products",
    params(ProductQuery),
    responses(
        (status = 200, description = "One page of products", body = ApiResponse<ProductPage>),
        (status = 400, description = "Invalid query", body = ErrorResponse),
        (status = 403, description = "Employee role required", body = ErrorResponse)
    )
)]
#[instrument(skip(state, _employee))]
pub async fn get_products(
    State(state): State<AppState>,
    _employee: Employee,
    ValidQuery(query): ValidQuery<ProductQuery>,
) -> ApiResult<Json<ApiResponse<ProductPage>>> {
    let pagination = Pagination::new(query.page, query.page_size);
    let filter = ProductFilter {
        farmer_id: query.farmer_id,
        start_date: query.start_date,
        end_date: query.end_date,
        category: query.category,
        search: query.search,
        active: query.active,
    };

    let page = state
        .products()
        .get_admin_products_view(filter, pagination)
        .await?;
    Ok(Json(ApiResponse::ok(page, "Products retrieved successfully")))
}

/// Product details
#[utoipa::path(
    get,
    path = "/api/v1/products/{id}",
    tag = "products",
    params(("id" = i32, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Product details", body = ApiResponse<ProductDto>),
        (status = 404, description = "Product not found or not yours", body = ErrorResponse)
    )
)]
#[instrument(skip(state, current), fields(user_id = current.id()))]
pub async fn get_product(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<i32>,
) -> ApiResult<Json<ApiResponse<ProductDto>>> {
    let owner = owner_scope(&state, &current).await?;
    let product = state.products().get_product_for(id, owner).await?;
    Ok(Json(ApiResponse::ok(product, "Product retrieved successfully")))
}

/// Mark a product active
#[utoipa::path(
    post,
    path = "/api/v1/products/{id}/activate",
    tag = "products",
    params(("id" = i32, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Product activated", body = ApiResponse<ProductDto>),
        (status = 404, description = "Product not found or not yours", body = ErrorResponse)
    )
)]
#[instrument(skip(state, current), fields(user_id = current.id()))]
pub async fn activate_product(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<i32>,
) -> ApiResult<Json<ApiResponse<ProductDto>>> {
    let owner = owner_scope(&state, &current).await?;
    let product = state.products().activate_product(id, owner).await?;
    info!(product_id = id, "Product activated");
    Ok(Json(ApiResponse::ok(product, "Product activated successfully")))
}

/// Mark a product inactive
#[utoipa::path(
    post,
    path = "/api/v1/products/{id}/deactivate",
    tag = "products",
    params(("id" = i32, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Product deactivated", body = ApiResponse<ProductDto>),
        (status = 404, description = "Product not found or not yours", body = ErrorResponse)
    )
)]
#[instrument(skip(state, current), fields(user_id = current.id()))]
pub async fn deactivate_product(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<i32>,
) -> ApiResult<Json<ApiResponse<ProductDto>>> {
    let owner = owner_scope(&state, &current).await?;
    let product = state.products().deactivate_product(id, owner).await?;
    info!(product_id = id, "Product deactivated");
    Ok(Json(ApiResponse::ok(product, "Product deactivated successfully")))
}
