use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use chrono::NaiveDate;
use common::{FarmerDto, FarmerPage, FarmerProductsView};
use serde::{Deserialize, Deserializer, Serialize};
use service::{FarmerListQuery, NewFarmer, Pagination, ProductFilter, StatusFilter, UpdateFarmer};
use tracing::{debug, info, instrument};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::auth::Employee;
use crate::error::ApiResult;
use crate::extract::{ValidJson, ValidQuery};
use crate::schemas::{ApiResponse, AppState, ErrorResponse};

/// Request body for creating a farmer account
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
pub struct CreateFarmerRequest {
    #[validate(length(min = 4, max = 50))]
    pub username: String,
    #[validate(length(min = 6, max = 100))]
    pub password: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1, max = 50))]
    pub first_name: String,
    #[validate(length(min = 1, max = 50))]
    pub last_name: String,
    #[validate(length(min = 1, max = 20))]
    pub phone_number: String,
    #[validate(length(min = 1, max = 100))]
    pub farm_name: String,
    #[validate(length(min = 1, max = 100))]
    pub location: String,
}

/// Blank strings deserialize as `None`.
fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|v| !v.trim().is_empty()))
}

/// Request body for updating a farmer. Leave `password` out or blank to keep it.
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
pub struct UpdateFarmerRequest {
    #[validate(length(min = 4, max = 50))]
    pub username: String,
    #[serde(default, deserialize_with = "blank_as_none")]
    #[validate(length(min = 6, max = 100))]
    pub password: Option<String>,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1, max = 50))]
    pub first_name: String,
    #[validate(length(min = 1, max = 50))]
    pub last_name: String,
    #[validate(length(min = 1, max = 20))]
    pub phone_number: String,
    #[validate(length(min = 1, max = 100))]
    pub farm_name: String,
    #[validate(length(min = 1, max = 100))]
    pub location: String,
}

/// Query parameters for the farmer listing
#[derive(Debug, Deserialize, ToSchema, IntoParams, Validate)]
pub struct FarmerQuery {
    /// Matches owner name, farm name or location
    pub search: Option<String>,
    /// Exact location (case-insensitive)
    pub location: Option<String>,
    /// "all" (default), "active" or "inactive"
    pub status: Option<String>,
    /// Page number (default: 1)
    #[validate(range(min = 1, max = 10000))]
    pub page: Option<u64>,
    /// Page size (default: 10)
    #[validate(range(min = 1, max = 100))]
    pub page_size: Option<u64>,
}

/// Query parameters for a farmer's products
#[derive(Debug, Default, Deserialize, ToSchema, IntoParams, Validate)]
pub struct FarmerProductQuery {
    /// Inclusive lower bound on the production date
    pub start_date: Option<NaiveDate>,
    /// Inclusive upper bound on the production date
    pub end_date: Option<NaiveDate>,
    /// Category name; "All Categories" disables the filter
    pub category: Option<String>,
    /// Matches name, description or category
    #[validate(length(max = 100))]
    pub search: Option<String>,
    /// Only active (true) or inactive (false) products
    pub active: Option<bool>,
}

impl From<FarmerProductQuery> for ProductFilter {
    fn from(query: FarmerProductQuery) -> Self {
        ProductFilter {
            farmer_id: None,
            start_date: query.start_date,
            end_date: query.end_date,
            category: query.category,
            search: query.search,
            active: query.active,
        }
    }
}

/// List farmers with filtering and pagination
#[utoipa::path(
    get,
    path = "/api/v1/farmers",
    tag = "farmers",
    params(FarmerQuery),
    responses(
        (status = 200, description = "One page of farmers", body = ApiResponse<FarmerPage>),
        (status = 400, description = "Invalid query", body = ErrorResponse),
        (status = 403, description = "Employee role required", body = ErrorResponse)
    )
)]
#[instrument(skip(state, _employee))]
pub async fn get_farmers(
    State(state): State<AppState>,
    _employee: Employee,
    ValidQuery(query): ValidQuery<FarmerQuery>,
) -> ApiResult<Json<ApiResponse<FarmerPage>>> {
    let status = query
        .status
        .as_deref()
        .map(str::parse::<StatusFilter>)
        .transpose()?
        .unwrap_or_default();

    let page = state
        .farmers()
        .get_filtered_farmers(FarmerListQuery {
            search: query.search,
            location: query.location,
            status,
            pagination: Pagination::new(query.page, query.page_size),
        })
        .await?;

    debug!(total = page.total_farmers, "Farmers listed");
    Ok(Json(ApiResponse::ok(page, "Farmers retrieved successfully")))
}

/// Create a farmer account (user + farm profile)
#[utoipa::path(
    post,
    path = "/api/v1/farmers",
    tag = "farmers",
    request_body = CreateFarmerRequest,
    responses(
        (status = 201, description = "Farmer created", body = ApiResponse<FarmerDto>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 409, description = "Username or e-mail already in use", body = ErrorResponse)
    )
)]
#[instrument(skip(state, _employee, request), fields(username = %request.username))]
pub async fn create_farmer(
    State(state): State<AppState>,
    _employee: Employee,
    ValidJson(request): ValidJson<CreateFarmerRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<FarmerDto>>)> {
    let farmer = state
        .farmers()
        .add_farmer(NewFarmer {
            username: request.username,
            password: request.password,
            email: request.email,
            first_name: request.first_name,
            last_name: request.last_name,
            phone_number: request.phone_number,
            farm_name: request.farm_name,
            location: request.location,
        })
        .await?;

    info!(farmer_id = farmer.id, "Farmer created");
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(farmer, "Farmer created successfully")),
    ))
}

/// Farmer details
#[utoipa::path(
    get,
    path = "/api/v1/farmers/{id}",
    tag = "farmers",
    params(("id" = i32, Path, description = "Farmer ID")),
    responses(
        (status = 200, description = "Farmer details", body = ApiResponse<FarmerDto>),
        (status = 404, description = "Farmer not found", body = ErrorResponse)
    )
)]
#[instrument(skip(state, _employee))]
pub async fn get_farmer(
    State(state): State<AppState>,
    _employee: Employee,
    Path(id): Path<i32>,
) -> ApiResult<Json<ApiResponse<FarmerDto>>> {
    let farmer = state.farmers().get_farmer_by_id(id).await?;
    Ok(Json(ApiResponse::ok(farmer, "Farmer retrieved successfully")))
}

/// Update a farmer and its user account
#[utoipa::path(
    put,
    path = "/api/v1/farmers/{id}",
    tag = "farmers",
    params(("id" = i32, Path, description = "Farmer ID")),
    request_body = UpdateFarmerRequest,
    responses(
        (status = 200, description = "Farmer updated", body = ApiResponse<FarmerDto>),
        (status = 404, description = "Farmer not found", body = ErrorResponse),
        (status = 409, description = "Username or e-mail already in use", body = ErrorResponse)
    )
)]
#[instrument(skip(state, _employee, request))]
pub async fn update_farmer(
    State(state): State<AppState>,
    _employee: Employee,
    Path(id): Path<i32>,
    ValidJson(request): ValidJson<UpdateFarmerRequest>,
) -> ApiResult<Json<ApiResponse<FarmerDto>>> {
    let farmer = state
        .farmers()
        .update_farmer(
            id,
            UpdateFarmer {
                username: request.username,
                password: request.password,
                email: request.email,
                first_name: request.first_name,
                last_name: request.last_name,
                phone_number: request.phone_number,
                farm_name: request.farm_name,
                location: request.location,
            },
        )
        .await?;

    info!(farmer_id = id, "Farmer updated");
    Ok(Json(ApiResponse::ok(farmer, "Farmer updated successfully")))
}

/// Deactivate a farmer; the account can no longer log in
#[utoipa::path(
    post,
    path = "/api/v1/farmers/{id}/deactivate",
    tag = "farmers",
    params(("id" = i32, Path, description = "Farmer ID")),
    responses(
        (status = 200, description = "Farmer deactivated", body = ApiResponse<FarmerDto>),
        (status = 404, description = "Farmer not found", body = ErrorResponse)
    )
)]
#[instrument(skip(state, _employee))]
pub async fn deactivate_farmer(
    State(state): State<AppState>,
    _employee: Employee,
    Path(id): Path<i32>,
) -> ApiResult<Json<ApiResponse<FarmerDto>>> {
    let farmer = state.farmers().deactivate_farmer(id).await?;
    Ok(Json(ApiResponse::ok(farmer, "Farmer deactivated successfully")))
}

/// Reactivate a farmer
#[utoipa::path(
    post,
    path = "/api/v1/farmers/{id}/reactivate",
    tag = "farmers",
    params(("id" = i32, Path, description = "Farmer ID")),
    responses(
        (status = 200, description = "Farmer reactivated", body = ApiResponse<FarmerDto>),
        (status = 404, description = "Farmer not found", body = ErrorResponse)
    )
)]
#[instrument(skip(state, _employee))]
pub async fn reactivate_farmer(
    State(state): State<AppState>,
    _employee: Employee,
    Path(id): Path<i32>,
) -> ApiResult<Json<ApiResponse<FarmerDto>>> {
    let farmer = state.farmers().reactivate_farmer(id).await?;
    Ok(Json(ApiResponse::ok(farmer, "Farmer reactivated successfully")))
}

/// A farmer's products with optional filters
#[utoipa::path(
    get,
    path = "/api/v1/farmers/{id}/products",
    tag = "farmers",
    params(("id" = i32, Path, description = "Farmer ID"), FarmerProductQuery),
    responses(
        (status = 200, description = "Products of the farmer", body = ApiResponse<FarmerProductsView>),
        (status = 404, description = "Farmer not found", body = ErrorResponse)
    )
)]
#[instrument(skip(state, _employee))]
pub async fn get_farmer_products(
    State(state): State<AppState>,
    _employee: Employee,
    Path(id): Path<i32>,
    ValidQuery(query): ValidQuery<FarmerProductQuery>,
) -> ApiResult<Json<ApiResponse<FarmerProductsView>>> {
    // unknown farmers are a 404, not an empty list
    state.farmers().get_farmer_by_id(id).await?;

    let view = state
        .products()
        .get_farmer_products_view(id, query.into())
        .await?;
    Ok(Json(ApiResponse::ok(view, "Products retrieved successfully")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn update_body(password: serde_json::Value) -> serde_json::Value {
        json!({
            "username": "thandi",
            "password": password,
            "email": "thandi@example.com",
            "first_name": "Thandi",
            "last_name": "Nkosi",
            "phone_number": "0821234567",
            "farm_name": "Sunrise Farm",
            "location": "Limpopo"
        })
    }

    #[test]
    fn test_blank_update_password_means_keep() {
        for blank in [json!(""), json!("   "), json!(null)] {
            let request: UpdateFarmerRequest = serde_json::from_value(update_body(blank)).unwrap();
            assert_eq!(request.password, None);
            assert!(request.validate().is_ok());
        }

        let mut missing = update_body(json!(null));
        missing.as_object_mut().unwrap().remove("password");
        let request: UpdateFarmerRequest = serde_json::from_value(missing).unwrap();
        assert_eq!(request.password, None);
    }

    #[test]
    fn test_short_update_password_is_rejected() {
        let request: UpdateFarmerRequest = serde_json::from_value(update_body(json!("abc"))).unwrap();
        assert!(request.validate().is_err());
    }
}
