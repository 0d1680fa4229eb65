//! SeaORM entities for the AgriConnect portal.
//!
//! Users log in; a user with the farmer role owns exactly one farmer
//! profile, which in turn owns products. Messages link two users, and
//! registration requests are standalone until an employee approves them.

pub mod farmer;
pub mod message;
pub mod product;
pub mod registration_request;
pub mod user;

pub mod prelude {
    //! A prelude module for easy importing of all entities.
    pub use super::farmer::Entity as Farmer;
    pub use super::message::Entity as Message;
    pub use super::product::Entity as Product;
    pub use super::registration_request::Entity as RegistrationRequest;
    pub use super::user::Entity as User;
}
