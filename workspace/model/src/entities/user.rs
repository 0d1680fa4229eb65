use sea_orm::entity::prelude::*;

/// The role a user plays in the portal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum UserRole {
    /// Produces and lists products.
    #[sea_orm(string_value = "Farmer")]
    Farmer,
    /// Administrator: approves registrations, manages farmers, sends messages.
    #[sea_orm(string_value = "Employee")]
    Employee,
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserRole::Farmer => write!(f, "Farmer"),
            UserRole::Employee => write!(f, "Employee"),
        }
    }
}

/// Represents an account that can log into the portal.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub username: String,
    /// bcrypt hash, never the plain password.
    pub password_hash: String,
    #[sea_orm(unique)]
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: String,
    pub role: UserRole,
    pub created_at: DateTime,
    pub last_login_at: Option<DateTime>,
    /// Inactive users cannot log in.
    #[sea_orm(default_value = "true")]
    pub is_active: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Farmer profile, present only for users with the `Farmer` role.
    #[sea_orm(has_one = "super::farmer::Entity")]
    Farmer,
}

impl Related<super::farmer::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Farmer.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// "First Last", trimmed so a missing part does not leave stray spaces.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }

    pub fn is_employee(&self) -> bool {
        self.role == UserRole::Employee
    }
}
