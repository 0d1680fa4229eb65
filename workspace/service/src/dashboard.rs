//! Dashboard aggregation.
//!
//! The builders are pure functions over already loaded records so the
//! figures can be checked without a database; [`DashboardService`] only
//! loads the records and supplies "now".

use std::collections::{BTreeSet, HashMap};

use chrono::{Duration, NaiveDateTime};
use common::{ActivityItem, EmployeeDashboard, FarmerDashboard};
use model::entities::user;
use sea_orm::DatabaseConnection;
use tracing::instrument;

use crate::error::{Result, ServiceError};
use crate::format::{format_activity_time, format_time_ago};
use crate::mapping::{farmer_dto, farmer_summary, product_dto};
use crate::repository::farmer::FarmerRecord;
use crate::repository::product::ProductRecord;
use crate::repository::{farmer as farmer_repo, product as product_repo, user as user_repo};

/// Window for "new" farmers and products.
pub const RECENT_WINDOW_DAYS: i64 = 7;
/// Farmers listed on the employee dashboard.
pub const RECENT_FARMERS_LIMIT: usize = 4;
/// Products and activities listed on the farmer dashboard.
pub const FARMER_RECENT_LIMIT: usize = 5;

fn new_farmer_activity(name: &str, at: NaiveDateTime, now: NaiveDateTime) -> ActivityItem {
    ActivityItem {
        title: "New Farmer Added".to_string(),
        description: format!("{} was added to the system", name),
        occurred_at: at,
        time: format_activity_time(at, now),
        color: "#00897B".to_string(),
        icon: "fa-plus".to_string(),
    }
}

fn product_update_activity(
    name: &str,
    count: usize,
    at: NaiveDateTime,
    now: NaiveDateTime,
) -> ActivityItem {
    ActivityItem {
        title: "Product Update".to_string(),
        description: format!("{} new products added by {}", count, name),
        occurred_at: at,
        time: format_activity_time(at, now),
        color: "#FF9800".to_string(),
        icon: "fa-edit".to_string(),
    }
}

fn product_added_activity(name: &str, at: NaiveDateTime, now: NaiveDateTime) -> ActivityItem {
    ActivityItem {
        title: "Product Added".to_string(),
        description: format!("Added \"{}\"", name),
        occurred_at: at,
        time: format_time_ago(now - at),
        color: "#4CAF50".to_string(),
        icon: "fa-plus".to_string(),
    }
}

/// Share of `part` in `total` as a percentage with one decimal; 0 for an empty total.
fn percentage(part: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (part as f64 / total as f64 * 1000.0).round() / 10.0
}

/// Builds the employee dashboard from all farmers (with their products)
/// and all users.
pub fn build_employee_dashboard(
    farmers: &[FarmerRecord],
    users: &[user::Model],
    now: NaiveDateTime,
) -> EmployeeDashboard {
    let since = now - Duration::days(RECENT_WINDOW_DAYS);

    let total_products: usize = farmers.iter().map(|f| f.products.len()).sum();
    let active_users = users.iter().filter(|u| u.is_active).count() as u64;
    let total_users = users.len() as u64;

    let mut by_join_date: Vec<&FarmerRecord> = farmers.iter().collect();
    by_join_date.sort_by(|a, b| {
        b.user
            .created_at
            .cmp(&a.user.created_at)
            .then(b.farmer.id.cmp(&a.farmer.id))
    });

    let new_farmers: Vec<&FarmerRecord> = by_join_date
        .iter()
        .copied()
        .filter(|f| f.user.created_at >= since)
        .collect();

    // Products created this week, grouped per farmer: (count, latest).
    let mut batches: HashMap<i32, (usize, NaiveDateTime)> = HashMap::new();
    for farmer in farmers {
        for product in farmer.products.iter().filter(|p| p.created_at >= since) {
            let entry = batches
                .entry(farmer.farmer.id)
                .or_insert((0, product.created_at));
            entry.0 += 1;
            entry.1 = entry.1.max(product.created_at);
        }
    }
    let new_products: usize = batches.values().map(|(count, _)| count).sum();

    let mut recent_activities = Vec::new();
    if let Some(farmer) = new_farmers.first() {
        recent_activities.push(new_farmer_activity(
            &farmer.user.full_name(),
            farmer.user.created_at,
            now,
        ));
    }
    let latest_batch = batches
        .iter()
        .max_by(|a, b| a.1.1.cmp(&b.1.1).then(a.0.cmp(b.0)));
    if let Some((farmer_id, (count, latest))) = latest_batch {
        if let Some(farmer) = farmers.iter().find(|f| f.farmer.id == *farmer_id) {
            recent_activities.push(product_update_activity(
                &farmer.user.full_name(),
                *count,
                *latest,
                now,
            ));
        }
    }

    EmployeeDashboard {
        total_farmers: farmers.len() as u64,
        total_products: total_products as u64,
        total_users,
        active_users,
        active_percentage: percentage(active_users, total_users),
        new_farmers: new_farmers.len() as u64,
        new_products: new_products as u64,
        recent_farmers: by_join_date
            .iter()
            .take(RECENT_FARMERS_LIMIT)
            .map(|f| farmer_summary(f))
            .collect(),
        recent_activities,
    }
}

/// Builds a farmer's dashboard. `products` must all belong to `farmer`.
pub fn build_farmer_dashboard(
    farmer: &FarmerRecord,
    products: &[ProductRecord],
    now: NaiveDateTime,
) -> FarmerDashboard {
    let mut newest_first: Vec<&ProductRecord> = products.iter().collect();
    newest_first.sort_by(|a, b| {
        b.product
            .created_at
            .cmp(&a.product.created_at)
            .then(b.product.id.cmp(&a.product.id))
    });

    let categories: Vec<String> = products
        .iter()
        .map(|p| p.product.category.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let last_product_added_at = newest_first.first().map(|p| p.product.created_at);
    let last_added = match last_product_added_at {
        Some(at) => format_time_ago(now - at),
        None => "No products yet".to_string(),
    };

    FarmerDashboard {
        farmer: farmer_dto(farmer),
        total_products: products.len() as u64,
        category_count: categories.len() as u64,
        categories,
        last_product_added_at,
        last_added,
        recent_products: newest_first
            .iter()
            .take(FARMER_RECENT_LIMIT)
            .map(|p| product_dto(p))
            .collect(),
        recent_activities: newest_first
            .iter()
            .take(FARMER_RECENT_LIMIT)
            .map(|p| product_added_activity(&p.product.name, p.product.created_at, now))
            .collect(),
    }
}

#[derive(Debug, Clone)]
pub struct DashboardService {
    db: DatabaseConnection,
}

impl DashboardService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    #[instrument(skip(self))]
    pub async fn employee_dashboard(&self, now: NaiveDateTime) -> Result<EmployeeDashboard> {
        let farmers = farmer_repo::find_all(&self.db).await?;
        let users = user_repo::find_all(&self.db).await?;
        Ok(build_employee_dashboard(&farmers, &users, now))
    }

    #[instrument(skip(self))]
    pub async fn farmer_dashboard(&self, user_id: i32, now: NaiveDateTime) -> Result<FarmerDashboard> {
        let farmer = farmer_repo::find_by_user_id(&self.db, user_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Farmer for user {}", user_id)))?;
        let products = product_repo::find_all(&self.db, Some(farmer.farmer.id)).await?;
        Ok(build_farmer_dashboard(&farmer, &products, now))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{at, create_employee, create_farmer, create_product, date, setup_db};
    use model::entities::{farmer, product};

    fn user(id: i32, first: &str, created_at: NaiveDateTime, is_active: bool) -> user::Model {
        user::Model {
            id,
            username: first.to_lowercase(),
            password_hash: "hash".to_string(),
            email: format!("{}@example.com", first.to_lowercase()),
            first_name: first.to_string(),
            last_name: "Farmer".to_string(),
            phone_number: "0123456789".to_string(),
            role: user::UserRole::Farmer,
            created_at,
            last_login_at: None,
            is_active,
        }
    }

    fn product(id: i32, farmer_id: i32, name: &str, category: &str, created_at: NaiveDateTime) -> product::Model {
        product::Model {
            id,
            name: name.to_string(),
            category: category.to_string(),
            production_date: created_at.date(),
            description: None,
            farmer_id,
            created_at,
            is_active: true,
        }
    }

    fn record(id: i32, user: user::Model, products: Vec<product::Model>) -> FarmerRecord {
        FarmerRecord {
            farmer: farmer::Model {
                id,
                farm_name: format!("Farm {}", id),
                location: "Western Cape".to_string(),
                user_id: user.id,
            },
            user,
            products,
        }
    }

    #[test]
    fn test_percentage() {
        assert_eq!(percentage(0, 0), 0.0);
        assert_eq!(percentage(2, 3), 66.7);
        assert_eq!(percentage(3, 3), 100.0);
    }

    #[test]
    fn test_employee_dashboard_figures() {
        let now = at(20, 12);
        let old = record(1, user(10, "Old", at(1, 9), true), vec![
            product(1, 1, "Maize", "Grains", at(2, 9)),
            product(2, 1, "Milk", "Dairy", at(18, 9)),
            product(3, 1, "Eggs", "Eggs", at(19, 9)),
        ]);
        let fresh = record(2, user(11, "Fresh", at(19, 8), false), vec![
            product(4, 2, "Honey", "Honey", at(17, 9)),
        ]);
        let users = vec![old.user.clone(), fresh.user.clone()];

        let dashboard = build_employee_dashboard(&[old, fresh], &users, now);

        assert_eq!(dashboard.total_farmers, 2);
        assert_eq!(dashboard.total_products, 4);
        assert_eq!(dashboard.total_users, 2);
        assert_eq!(dashboard.active_users, 1);
        assert_eq!(dashboard.active_percentage, 50.0);
        assert_eq!(dashboard.new_farmers, 1);
        assert_eq!(dashboard.new_products, 3);
        assert_eq!(dashboard.recent_farmers[0].owner_name, "Fresh Farmer");

        assert_eq!(dashboard.recent_activities.len(), 2);
        assert_eq!(dashboard.recent_activities[0].title, "New Farmer Added");
        assert_eq!(
            dashboard.recent_activities[0].description,
            "Fresh Farmer was added to the system"
        );
        assert_eq!(dashboard.recent_activities[0].time, "Yesterday, 08:00 AM");
        assert_eq!(
            dashboard.recent_activities[1].description,
            "2 new products added by Old Farmer"
        );
        assert_eq!(dashboard.recent_activities[1].occurred_at, at(19, 9));
    }

    #[test]
    fn test_employee_dashboard_empty() {
        let dashboard = build_employee_dashboard(&[], &[], at(20, 12));
        assert_eq!(dashboard.total_farmers, 0);
        assert_eq!(dashboard.active_percentage, 0.0);
        assert!(dashboard.recent_farmers.is_empty());
        assert!(dashboard.recent_activities.is_empty());
    }

    #[test]
    fn test_recent_farmers_limited_to_four() {
        let farmers: Vec<FarmerRecord> = (1..=6)
            .map(|i| record(i, user(i + 10, &format!("F{}", i), at(i as u32, 9), true), vec![]))
            .collect();
        let dashboard = build_employee_dashboard(&farmers, &[], at(30, 12));

        let ids: Vec<i32> = dashboard.recent_farmers.iter().map(|f| f.id).collect();
        assert_eq!(ids, vec![6, 5, 4, 3]);
        assert_eq!(dashboard.new_farmers, 0);
    }

    #[tokio::test]
    async fn test_farmer_dashboard() {
        let db = setup_db().await;
        create_employee(&db, "admin").await;
        let (user, farm) = create_farmer(&db, "jsmith", "Green Acres Farm", "Western Cape", at(1, 9)).await;
        create_product(&db, farm.id, "Organic Maize", "Grains", date(4, 26), at(1, 10)).await;
        create_product(&db, farm.id, "Fresh Milk", "Dairy", date(4, 24), at(3, 10)).await;
        create_product(&db, farm.id, "Free-range Eggs", "Dairy", date(4, 23), at(2, 10)).await;

        let service = DashboardService::new(db);
        let dashboard = service.farmer_dashboard(user.id, at(5, 10)).await.unwrap();

        assert_eq!(dashboard.farmer.farm_name, "Green Acres Farm");
        assert_eq!(dashboard.total_products, 3);
        assert_eq!(dashboard.category_count, 2);
        assert_eq!(dashboard.categories, vec!["Dairy", "Grains"]);
        assert_eq!(dashboard.last_product_added_at, Some(at(3, 10)));
        assert_eq!(dashboard.last_added, "2 days ago");
        assert_eq!(dashboard.recent_products[0].name, "Fresh Milk");
        assert_eq!(dashboard.recent_activities.len(), 3);
        assert_eq!(dashboard.recent_activities[0].description, "Added \"Fresh Milk\"");
        assert_eq!(dashboard.recent_activities[2].time, "4 days ago");

        let missing = service.farmer_dashboard(999, at(5, 10)).await;
        assert!(matches!(missing, Err(ServiceError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_farmer_dashboard_without_products() {
        let db = setup_db().await;
        let (user, _) = create_farmer(&db, "jsmith", "Green Acres Farm", "Western Cape", at(1, 9)).await;

        let dashboard = DashboardService::new(db)
            .farmer_dashboard(user.id, at(5, 10))
            .await
            .unwrap();
        assert_eq!(dashboard.last_added, "No products yet");
        assert_eq!(dashboard.last_product_added_at, None);
        assert!(dashboard.recent_activities.is_empty());
    }

    #[tokio::test]
    async fn test_employee_dashboard_from_db() {
        let db = setup_db().await;
        create_employee(&db, "admin").await;
        let (_, farm) = create_farmer(&db, "jsmith", "Green Acres Farm", "Western Cape", at(1, 9)).await;
        create_product(&db, farm.id, "Carrots", "Vegetables", date(4, 16), at(1, 10)).await;

        let dashboard = DashboardService::new(db)
            .employee_dashboard(at(3, 9))
            .await
            .unwrap();
        assert_eq!(dashboard.total_users, 2);
        assert_eq!(dashboard.total_farmers, 1);
        assert_eq!(dashboard.total_products, 1);
        assert_eq!(dashboard.new_farmers, 1);
        assert_eq!(dashboard.new_products, 1);
        assert_eq!(dashboard.active_percentage, 100.0);
    }
}
