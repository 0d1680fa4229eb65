//! Fixtures for service tests.

use chrono::{NaiveDate, NaiveDateTime};
use migration::{Migrator, MigratorTrait};
use model::entities::{farmer, product, user};
use sea_orm::{ActiveModelTrait, ConnectionTrait, Database, DatabaseConnection, Set};

use crate::password::PasswordHasher;

/// In-memory SQLite with foreign keys on and the schema migrated.
pub async fn setup_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to connect to in-memory database");

    db.execute_unprepared("PRAGMA foreign_keys = ON;")
        .await
        .expect("Failed to enable foreign keys");

    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    db
}

/// Cheapest bcrypt cost so tests stay fast.
pub fn hasher() -> PasswordHasher {
    PasswordHasher::new(crate::password::MIN_COST)
}

/// 2024-05-`day` at `hour`:00.
pub fn at(day: u32, hour: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 5, day)
        .unwrap()
        .and_hms_opt(hour, 0, 0)
        .unwrap()
}

pub fn date(month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, month, day).unwrap()
}

pub async fn create_user(
    db: &DatabaseConnection,
    username: &str,
    role: user::UserRole,
    password: &str,
    created_at: NaiveDateTime,
) -> user::Model {
    user::ActiveModel {
        username: Set(username.to_string()),
        password_hash: Set(hasher().hash(password).await.unwrap()),
        email: Set(format!("{}@example.com", username)),
        first_name: Set(format!("{}-first", username)),
        last_name: Set(format!("{}-last", username)),
        phone_number: Set("0123456789".to_string()),
        role: Set(role),
        created_at: Set(created_at),
        last_login_at: Set(None),
        is_active: Set(true),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("Failed to create user")
}

pub async fn create_employee(db: &DatabaseConnection, username: &str) -> user::Model {
    create_user(db, username, user::UserRole::Employee, "password", at(1, 8)).await
}

pub async fn create_farmer(
    db: &DatabaseConnection,
    username: &str,
    farm_name: &str,
    location: &str,
    created_at: NaiveDateTime,
) -> (user::Model, farmer::Model) {
    let user = create_user(db, username, user::UserRole::Farmer, "password", created_at).await;
    let farmer = farmer::ActiveModel {
        farm_name: Set(farm_name.to_string()),
        location: Set(location.to_string()),
        user_id: Set(user.id),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("Failed to create farmer");
    (user, farmer)
}

pub async fn create_product(
    db: &DatabaseConnection,
    farmer_id: i32,
    name: &str,
    category: &str,
    production_date: NaiveDate,
    created_at: NaiveDateTime,
) -> product::Model {
    product::ActiveModel {
        name: Set(name.to_string()),
        category: Set(category.to_string()),
        production_date: Set(production_date),
        description: Set(None),
        farmer_id: Set(farmer_id),
        created_at: Set(created_at),
        is_active: Set(true),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("Failed to create product")
}
