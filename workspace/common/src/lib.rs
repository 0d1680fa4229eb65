//! Transport-layer types shared between the service layer and the HTTP handlers.
//! Services build these from entities; handlers serialize them unchanged.

mod dashboard;

pub use dashboard::{ActivityItem, EmployeeDashboard, FarmerDashboard};

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Generic API response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    /// Response data
    pub data: T,
    /// Response message
    pub message: String,
    /// Success flag
    pub success: bool,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T, message: impl Into<String>) -> Self {
        Self {
            data,
            message: message.into(),
            success: true,
        }
    }
}

// ===================== Users =====================

/// Public view of a user account. Never carries the password hash.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct UserDto {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub full_name: String,
    pub phone_number: String,
    /// "Farmer" or "Employee"
    pub role: String,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub last_login_at: Option<NaiveDateTime>,
}

// ===================== Farmers =====================

/// Detailed farmer profile, including the owning user's contact details.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct FarmerDto {
    pub id: i32,
    pub farm_name: String,
    pub location: String,
    pub user_id: i32,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
    /// When the owning user account was created.
    pub joined_at: NaiveDateTime,
    pub product_count: u64,
    pub is_active: bool,
    /// Up to five most recently added products.
    pub recent_products: Vec<ProductSummaryDto>,
}

/// Row in farmer listings.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct FarmerSummaryDto {
    pub id: i32,
    pub farm_name: String,
    pub location: String,
    /// "First Last" of the owning user.
    pub owner_name: String,
    pub product_count: u64,
    pub is_active: bool,
    pub joined_at: NaiveDateTime,
}

/// One page of filtered farmer summaries.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct FarmerPage {
    pub farmers: Vec<FarmerSummaryDto>,
    pub total_farmers: u64,
    pub total_pages: u64,
    pub current_page: u64,
    pub page_size: u64,
    /// Distinct locations over all farmers, sorted, for filter drop-downs.
    pub unique_locations: Vec<String>,
}

// ===================== Products =====================

/// Product with its owner resolved.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct ProductDto {
    pub id: i32,
    pub name: String,
    pub category: String,
    /// Display colour of the category, e.g. "#E1F5FE".
    pub category_color: String,
    pub production_date: NaiveDate,
    pub description: Option<String>,
    pub farmer_id: i32,
    pub farmer_name: String,
    pub farm_name: String,
    pub created_at: NaiveDateTime,
    pub is_active: bool,
}

/// Compact product entry used inside farmer profiles.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct ProductSummaryDto {
    pub id: i32,
    pub name: String,
    pub category: String,
    pub production_date: NaiveDate,
    pub is_active: bool,
}

/// Products of a single farmer together with the categories present in them.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct FarmerProductsView {
    pub farmer_id: i32,
    pub products: Vec<ProductDto>,
    pub categories: Vec<String>,
}

/// Paginated product listing for employees.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct ProductPage {
    pub products: Vec<ProductDto>,
    /// Every category in use, regardless of the current filter.
    pub categories: Vec<String>,
    pub total_products: u64,
    pub total_pages: u64,
    pub current_page: u64,
    pub page_size: u64,
}

/// Catalogue entry for a product category.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct CategoryDto {
    pub name: String,
    pub color: String,
}

// ===================== Messages =====================

/// Full message as shown to its sender or recipient.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct MessageDto {
    pub id: i32,
    pub subject: String,
    pub content: String,
    pub sender_id: i32,
    pub sender_name: String,
    pub sender_role: String,
    pub recipient_id: i32,
    pub recipient_name: String,
    pub recipient_role: String,
    pub sent_at: NaiveDateTime,
    pub read_at: Option<NaiveDateTime>,
    pub is_read: bool,
}

/// Inbox / sent-items row.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct MessageSummaryDto {
    pub id: i32,
    pub subject: String,
    pub sender_id: i32,
    pub sender_name: String,
    pub recipient_id: i32,
    pub recipient_name: String,
    pub sent_at: NaiveDateTime,
    pub is_read: bool,
}

// ===================== Registration requests =====================

/// A farmer sign-up as seen by employees.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct RegistrationRequestDto {
    pub id: i32,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
    pub farm_name: String,
    pub location: String,
    pub requested_at: NaiveDateTime,
    /// "Pending", "Approved" or "Rejected"
    pub status: String,
    pub rejection_reason: Option<String>,
}
