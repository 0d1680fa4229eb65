pub mod auth;
pub mod categories;
pub mod dashboard;
pub mod farmer_portal;
pub mod farmers;
pub mod health;
pub mod messages;
pub mod products;
pub mod registration_requests;
