use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{FarmerDto, FarmerSummaryDto, ProductDto};

/// Entry in a dashboard activity feed.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct ActivityItem {
    pub title: String,
    pub description: String,
    /// When the activity happened.
    pub occurred_at: NaiveDateTime,
    /// Human label such as "Yesterday, 09:15 AM" or "3 days ago".
    pub time: String,
    pub color: String,
    pub icon: String,
}

/// Aggregated figures for the employee landing page.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct EmployeeDashboard {
    pub total_farmers: u64,
    pub total_products: u64,
    pub total_users: u64,
    pub active_users: u64,
    /// Share of active users in percent, rounded to one decimal.
    pub active_percentage: f64,
    /// Farmers whose account was created in the last seven days.
    pub new_farmers: u64,
    /// Products created in the last seven days.
    pub new_products: u64,
    pub recent_farmers: Vec<FarmerSummaryDto>,
    pub recent_activities: Vec<ActivityItem>,
}

/// Aggregated figures for a farmer's landing page.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct FarmerDashboard {
    pub farmer: FarmerDto,
    pub total_products: u64,
    pub category_count: u64,
    pub categories: Vec<String>,
    pub last_product_added_at: Option<NaiveDateTime>,
    /// "2 days ago", or "No products yet".
    pub last_added: String,
    pub recent_products: Vec<ProductDto>,
    pub recent_activities: Vec<ActivityItem>,
}
