use std::sync::Arc;

use common::{
    ActivityItem, CategoryDto, EmployeeDashboard, FarmerDashboard, FarmerDto, FarmerPage,
    FarmerProductsView, FarmerSummaryDto, MessageDto, MessageSummaryDto, ProductDto, ProductPage,
    ProductSummaryDto, RegistrationRequestDto, UserDto,
};
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use service::{
    AuthService, DashboardService, FarmerService, MessageService, PasswordHasher, ProductService,
    RegistrationNotifier, RegistrationService,
};
use utoipa::{OpenApi, ToSchema};

use crate::auth::SessionStore;
use crate::handlers::{
    auth::{LoginRequest, LoginResponse, RegisterRequest, RegisterResponse},
    farmers::{CreateFarmerRequest, UpdateFarmerRequest},
    messages::{SendMessageRequest, UnreadCountResponse},
    products::ProductRequest,
    registration_requests::RejectRequest,
};

pub use common::ApiResponse;

/// Application state shared across handlers
#[derive(Clone, Debug)]
pub struct AppState {
    /// Database connection
    pub db: DatabaseConnection,
    /// Logged-in sessions
    pub sessions: SessionStore,
    /// Password hashing settings
    pub hasher: PasswordHasher,
    /// Delivers registration decisions to applicants
    pub notifier: Arc<dyn RegistrationNotifier>,
}

impl AppState {
    pub fn auth(&self) -> AuthService {
        AuthService::new(self.db.clone(), self.hasher)
    }

    pub fn farmers(&self) -> FarmerService {
        FarmerService::new(self.db.clone(), self.hasher)
    }

    pub fn products(&self) -> ProductService {
        ProductService::new(self.db.clone())
    }

    pub fn messages(&self) -> MessageService {
        MessageService::new(self.db.clone())
    }

    pub fn registrations(&self) -> RegistrationService {
        RegistrationService::new(self.db.clone(), self.hasher, self.notifier.clone())
    }

    pub fn dashboards(&self) -> DashboardService {
        DashboardService::new(self.db.clone())
    }
}

/// Error response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
    /// Error code
    pub code: String,
    /// Success status (always false for errors)
    pub success: bool,
}

/// Health check response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// Service version
    pub version: String,
    /// Database connection status
    pub database: String,
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::health::health_check,
        crate::handlers::auth::login,
        crate::handlers::auth::logout,
        crate::handlers::auth::me,
        crate::handlers::auth::register,
        crate::handlers::registration_requests::get_registration_requests,
        crate::handlers::registration_requests::get_registration_request,
        crate::handlers::registration_requests::approve_registration_request,
        crate::handlers::registration_requests::reject_registration_request,
        crate::handlers::farmers::get_farmers,
        crate::handlers::farmers::create_farmer,
        crate::handlers::farmers::get_farmer,
        crate::handlers::farmers::update_farmer,
        crate::handlers::farmers::deactivate_farmer,
        crate::handlers::farmers::reactivate_farmer,
        crate::handlers::farmers::get_farmer_products,
        crate::handlers::products::get_products,
        crate::handlers::products::get_product,
        crate::handlers::products::activate_product,
        crate::handlers::products::deactivate_product,
        crate::handlers::categories::get_categories,
        crate::handlers::dashboard::get_employee_dashboard,
        crate::handlers::farmer_portal::get_my_dashboard,
        crate::handlers::farmer_portal::get_my_profile,
        crate::handlers::farmer_portal::get_my_products,
        crate::handlers::farmer_portal::create_my_product,
        crate::handlers::farmer_portal::update_my_product,
        crate::handlers::messages::get_inbox,
        crate::handlers::messages::get_sent,
        crate::handlers::messages::get_unread_count,
        crate::handlers::messages::send_message,
        crate::handlers::messages::get_message,
        crate::handlers::messages::mark_message_read,
    ),
    components(
        schemas(
            ErrorResponse,
            HealthResponse,
            LoginRequest,
            LoginResponse,
            RegisterRequest,
            RegisterResponse,
            RejectRequest,
            CreateFarmerRequest,
            UpdateFarmerRequest,
            ProductRequest,
            SendMessageRequest,
            UnreadCountResponse,
            UserDto,
            FarmerDto,
            FarmerSummaryDto,
            FarmerPage,
            ProductDto,
            ProductSummaryDto,
            ProductPage,
            FarmerProductsView,
            CategoryDto,
            MessageDto,
            MessageSummaryDto,
            RegistrationRequestDto,
            ActivityItem,
            EmployeeDashboard,
            FarmerDashboard,
            ApiResponse<UserDto>,
            ApiResponse<FarmerDto>,
            ApiResponse<FarmerPage>,
            ApiResponse<ProductDto>,
            ApiResponse<ProductPage>,
            ApiResponse<MessageDto>,
            ApiResponse<Vec<MessageSummaryDto>>,
            ApiResponse<RegistrationRequestDto>,
            ApiResponse<Vec<RegistrationRequestDto>>,
            ApiResponse<EmployeeDashboard>,
            ApiResponse<FarmerDashboard>,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Login, logout and registration"),
        (name = "registration-requests", description = "Farmer sign-up approval"),
        (name = "farmers", description = "Farmer management for employees"),
        (name = "products", description = "Product listings"),
        (name = "categories", description = "Product category catalogue"),
        (name = "dashboard", description = "Dashboards"),
        (name = "farmer-portal", description = "Endpoints for the logged-in farmer"),
        (name = "messages", description = "Internal messaging"),
    ),
    info(
        title = "AgriConnect API",
        description = "Marketplace connecting farmers with agri-energy employees",
        version = "0.1.0",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    )
)]
pub struct ApiDoc;
