use crate::handlers::{
    auth::{login, logout, me, register},
    categories::get_categories,
    dashboard::get_employee_dashboard,
    farmer_portal::{
        create_my_product, get_my_dashboard, get_my_products, get_my_profile, update_my_product,
    },
    farmers::{
        create_farmer, deactivate_farmer, get_farmer, get_farmer_products, get_farmers,
        reactivate_farmer, update_farmer,
    },
    health::health_check,
    messages::{get_inbox, get_message, get_sent, get_unread_count, mark_message_read, send_message},
    products::{activate_product, deactivate_product, get_product, get_products},
    registration_requests::{
        approve_registration_request, get_registration_request, get_registration_requests,
        reject_registration_request,
    },
};
use crate::schemas::{ApiDoc, AppState};
use axum::{
    routing::{get, post, put},
    Router,
};
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Create application router with all routes and middleware
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health_check))
        // Authentication
        .route("/api/v1/auth/login", post(login))
        .route("/api/v1/auth/logout", post(logout))
        .route("/api/v1/auth/me", get(me))
        .route("/api/v1/auth/register", post(register))
        // Registration requests
        .route("/api/v1/registration-requests", get(get_registration_requests))
        .route("/api/v1/registration-requests/:id", get(get_registration_request))
        .route(
            "/api/v1/registration-requests/:id/approve",
            post(approve_registration_request),
        )
        .route(
            "/api/v1/registration-requests/:id/reject",
            post(reject_registration_request),
        )
        // Farmer management
        .route("/api/v1/farmers", get(get_farmers).post(create_farmer))
        .route("/api/v1/farmers/:id", get(get_farmer).put(update_farmer))
        .route("/api/v1/farmers/:id/deactivate", post(deactivate_farmer))
        .route("/api/v1/farmers/:id/reactivate", post(reactivate_farmer))
        .route("/api/v1/farmers/:id/products", get(get_farmer_products))
        // Products
        .route("/api/v1/products", get(get_products))
        .route("/api/v1/products/:id", get(get_product))
        .route("/api/v1/products/:id/activate", post(activate_product))
        .route("/api/v1/products/:id/deactivate", post(deactivate_product))
        .route("/api/v1/categories", get(get_categories))
        // Dashboards
        .route("/api/v1/dashboard/employee", get(get_employee_dashboard))
        // Logged-in farmer
        .route("/api/v1/me/dashboard", get(get_my_dashboard))
        .route("/api/v1/me/profile", get(get_my_profile))
        .route("/api/v1/me/products", get(get_my_products).post(create_my_product))
        .route("/api/v1/me/products/:id", put(update_my_product))
        // Messages
        .route("/api/v1/messages", post(send_message))
        .route("/api/v1/messages/inbox", get(get_inbox))
        .route("/api/v1/messages/sent", get(get_sent))
        .route("/api/v1/messages/unread-count", get(get_unread_count))
        .route("/api/v1/messages/:id", get(get_message))
        .route("/api/v1/messages/:id/read", post(mark_message_read))
        // Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Add middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(TimeoutLayer::new(Duration::from_secs(30)))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
