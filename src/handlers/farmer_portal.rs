//! Endpoints scoped to the logged-in farmer.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use common::{FarmerDashboard, FarmerDto, FarmerProductsView, ProductDto};
use tracing::{info, instrument};

use crate::auth::Farmer;
use crate::error::ApiResult;
use crate::extract::{ValidJson, ValidQuery};
use crate::handlers::farmers::FarmerProductQuery;
use crate::handlers::products::ProductRequest;
use crate::schemas::{ApiResponse, AppState, ErrorResponse};

/// Dashboard of the logged-in farmer
#[utoipa::path(
    get,
    path = "/api/v1/me/dashboard",
    tag = "farmer-portal",
    responses(
        (status = 200, description = "Farmer dashboard", body = ApiResponse<FarmerDashboard>),
        (status = 403, description = "Farmer role required", body = ErrorResponse)
    )
)]
#[instrument(skip(state, farmer), fields(farmer_id = farmer.farmer_id))]
pub async fn get_my_dashboard(
    State(state): State<AppState>,
    farmer: Farmer,
) -> ApiResult<Json<ApiResponse<FarmerDashboard>>> {
    let dashboard = state
        .dashboards()
        .farmer_dashboard(farmer.current.id(), service::now())
        .await?;
    Ok(Json(ApiResponse::ok(dashboard, "Dashboard retrieved successfully")))
}

/// Profile of the logged-in farmer
#[utoipa::path(
    get,
    path = "/api/v1/me/profile",
    tag = "farmer-portal",
    responses(
        (status = 200, description = "Farmer profile", body = ApiResponse<FarmerDto>),
        (status = 403, description = "Farmer role required", body = ErrorResponse)
    )
)]
#[instrument(skip(state, farmer), fields(farmer_id = farmer.farmer_id))]
pub async fn get_my_profile(
    State(state): State<AppState>,
    farmer: Farmer,
) -> ApiResult<Json<ApiResponse<FarmerDto>>> {
    let profile = state.farmers().get_farmer_by_id(farmer.farmer_id).await?;
    Ok(Json(ApiResponse::ok(profile, "Profile retrieved successfully")))
}

/// Own products with optional filters
#[utoipa::path(
    get,
    path = "/api/v1/me/products",
    tag = "farmer-portal",
    params(FarmerProductQuery),
    responses(
        (status = 200, description = "Own products", body = ApiResponse<FarmerProductsView>),
        (status = 403, description = "Farmer role required", body = ErrorResponse)
    )
)]
#[instrument(skip(state, farmer), fields(farmer_id = farmer.farmer_id))]
pub async fn get_my_products(
    State(state): State<AppState>,
    farmer: Farmer,
    ValidQuery(query): ValidQuery<FarmerProductQuery>,
) -> ApiResult<Json<ApiResponse<FarmerProductsView>>> {
    let view = state
        .products()
        .get_farmer_products_view(farmer.farmer_id, query.into())
        .await?;
    Ok(Json(ApiResponse::ok(view, "Products retrieved successfully")))
}

/// Add a product
#[utoipa::path(
    post,
    path = "/api/v1/me/products",
    tag = "farmer-portal",
    request_body = ProductRequest,
    responses(
        (status = 201, description = "Product added", body = ApiResponse<ProductDto>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 403, description = "Farmer role required", body = ErrorResponse)
    )
)]
#[instrument(skip(state, farmer, request), fields(farmer_id = farmer.farmer_id))]
pub async fn create_my_product(
    State(state): State<AppState>,
    farmer: Farmer,
    ValidJson(request): ValidJson<ProductRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<ProductDto>>)> {
    let product = state
        .products()
        .add_product(farmer.farmer_id, request.into())
        .await?;
    info!(product_id = product.id, "Product added by farmer");
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(product, "Product added successfully")),
    ))
}

/// Edit one of the farmer's own products
#[utoipa::path(
    put,
    path = "/api/v1/me/products/{id}",
    tag = "farmer-portal",
    params(("id" = i32, Path, description = "Product ID")),
    request_body = ProductRequest,
    responses(
        (status = 200, description = "Product updated", body = ApiResponse<ProductDto>),
        (status = 404, description = "Product not found or not yours", body = ErrorResponse)
    )
)]
#[instrument(skip(state, farmer, request), fields(farmer_id = farmer.farmer_id))]
pub async fn update_my_product(
    State(state): State<AppState>,
    farmer: Farmer,
    Path(id): Path<i32>,
    ValidJson(request): ValidJson<ProductRequest>,
) -> ApiResult<Json<ApiResponse<ProductDto>>> {
    let product = state
        .products()
        .update_product(id, Some(farmer.farmer_id), request.into())
        .await?;
    Ok(Json(ApiResponse::ok(product, "Product updated successfully")))
}
