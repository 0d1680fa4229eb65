//! Demo data for a fresh database.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use model::entities::{message, product, user};
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set, TransactionTrait};
use tracing::{info, instrument};

use crate::error::Result;
use crate::password::PasswordHasher;
use crate::repository::farmer::{self as farmer_repo, NewFarmerAccount};
use crate::repository::user as user_repo;

pub const SEED_EMPLOYEE_USERNAME: &str = "admin";
pub const SEED_FARMER_USERNAME: &str = "jsmith";
pub const SEED_PASSWORD: &str = "password";

/// (name, category, description, days before now)
const SEED_PRODUCTS: [(&str, &str, &str, i64); 4] = [
    ("Organic Maize", "Grains", "Non-GMO certified", 5),
    ("Free-range Eggs", "Dairy", "Large, brown eggs", 8),
    ("Fresh Milk", "Dairy", "Unpasteurised", 7),
    ("Carrots", "Vegetables", "Organic, freshly harvested", 15),
];

fn accounts_created_at() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 5, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .unwrap_or_default()
}

/// Inserts one employee, one farmer with four products and two messages.
///
/// Does nothing when any user already exists. Returns whether data was
/// written.
#[instrument(skip(db, hasher))]
pub async fn seed_database(
    db: &DatabaseConnection,
    hasher: &PasswordHasher,
    now: NaiveDateTime,
) -> Result<bool> {
    if user_repo::count_all(db).await? > 0 {
        info!("Database already has users, skipping seed");
        return Ok(false);
    }

    let password_hash = hasher.hash(SEED_PASSWORD).await?;
    let created_at = accounts_created_at();

    let txn = db.begin().await?;

    let admin = user::ActiveModel {
        username: Set(SEED_EMPLOYEE_USERNAME.to_string()),
        password_hash: Set(password_hash.clone()),
        email: Set("admin@agrienergyconnect.com".to_string()),
        first_name: Set("Emily".to_string()),
        last_name: Set("Mathews".to_string()),
        phone_number: Set("0841258975".to_string()),
        role: Set(user::UserRole::Employee),
        created_at: Set(created_at),
        last_login_at: Set(None),
        is_active: Set(true),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    let (farmer_user, farmer) = farmer_repo::create_with_user(
        &txn,
        NewFarmerAccount {
            username: SEED_FARMER_USERNAME.to_string(),
            password_hash,
            email: "john@greenacres.com".to_string(),
            first_name: "John".to_string(),
            last_name: "Smith".to_string(),
            phone_number: "0601091293".to_string(),
            farm_name: "Green Acres Farm".to_string(),
            location: "Western Cape".to_string(),
            created_at,
        },
    )
    .await?;

    for (name, category, description, days_ago) in SEED_PRODUCTS {
        product::ActiveModel {
            name: Set(name.to_string()),
            category: Set(category.to_string()),
            production_date: Set((now - Duration::days(days_ago)).date()),
            description: Set(Some(description.to_string())),
            farmer_id: Set(farmer.id),
            created_at: Set(created_at),
            is_active: Set(true),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
    }

    let welcome_sent = now - Duration::days(30);
    message::ActiveModel {
        sender_id: Set(admin.id),
        recipient_id: Set(farmer_user.id),
        subject: Set("Welcome to Agri-Energy Connect".to_string()),
        content: Set("Welcome to the platform. We're excited to have you join our community of farmers and green energy experts.".to_string()),
        sent_at: Set(welcome_sent),
        read_at: Set(Some(welcome_sent)),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    message::ActiveModel {
        sender_id: Set(admin.id),
        recipient_id: Set(farmer_user.id),
        subject: Set("Important: New Green Energy Subsidies Available".to_string()),
        content: Set("We wanted to inform you of new government subsidies for green energy solutions on farms. Contact us for more details.".to_string()),
        sent_at: Set(now),
        read_at: Set(None),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    txn.commit().await?;

    info!(
        employee_id = admin.id,
        farmer_id = farmer.id,
        products = SEED_PRODUCTS.len(),
        "Database seeded"
    );
    Ok(true)
}
