//! Business rules of the AgriConnect portal.
//!
//! Services own a database connection (cheap to clone) and expose the
//! operations the HTTP layer calls. Persistence lives in [`repository`];
//! conversions to transport types live in [`mapping`].

pub mod auth;
pub mod category;
pub mod dashboard;
pub mod error;
pub mod farmer;
pub mod filter;
pub mod format;
pub mod mapping;
pub mod message;
pub mod notifier;
pub mod pagination;
pub mod password;
pub mod product;
pub mod registration;
pub mod repository;
pub mod seed;
mod validate;

#[cfg(test)]
pub(crate) mod testing;

use chrono::{NaiveDateTime, Utc};

pub use auth::{AuthService, RegisterUser};
pub use dashboard::DashboardService;
pub use error::{Result, ServiceError};
pub use farmer::{FarmerListQuery, FarmerService, NewFarmer, UpdateFarmer};
pub use filter::StatusFilter;
pub use message::MessageService;
pub use notifier::{LogNotifier, RegistrationNotifier};
pub use pagination::Pagination;
pub use password::PasswordHasher;
pub use product::{NewProduct, ProductFilter, ProductService, UpdateProduct};
pub use registration::{RegisterFarmer, RegistrationService};
pub use seed::seed_database;

/// Current time as stored in the database (UTC, without offset).
pub fn now() -> NaiveDateTime {
    Utc::now().naive_utc()
}
