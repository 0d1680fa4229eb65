use model::entities::user::{self, UserRole};
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set, TransactionTrait};
use tracing::{debug, info, instrument, warn};

use crate::error::{Result, ServiceError};
use crate::password::PasswordHasher;
use crate::repository::{farmer as farmer_repo, user as user_repo};
use crate::validate::{self, required};

/// Direct account creation, used when an employee registers someone.
#[derive(Debug, Clone)]
pub struct RegisterUser {
    pub username: String,
    pub password: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: String,
    pub role: UserRole,
    /// Required for the farmer role.
    pub farm_name: Option<String>,
    /// Required for the farmer role.
    pub location: Option<String>,
}

/// Login and account management.
#[derive(Debug, Clone)]
pub struct AuthService {
    db: DatabaseConnection,
    hasher: PasswordHasher,
}

impl AuthService {
    pub fn new(db: DatabaseConnection, hasher: PasswordHasher) -> Self {
        Self { db, hasher }
    }

    /// Verifies the credentials and records the login time.
    ///
    /// Unknown users, wrong passwords and deactivated accounts all yield
    /// [`ServiceError::InvalidCredentials`].
    #[instrument(skip(self, password))]
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<user::Model> {
        let Some(user) = user_repo::find_by_username(&self.db, username).await? else {
            debug!("Unknown username");
            return Err(ServiceError::InvalidCredentials);
        };

        if !self.hasher.verify(password, &user.password_hash).await {
            debug!(user_id = user.id, "Password mismatch");
            return Err(ServiceError::InvalidCredentials);
        }

        if !user.is_active {
            warn!(user_id = user.id, "Login attempt for deactivated account");
            return Err(ServiceError::InvalidCredentials);
        }

        let mut active: user::ActiveModel = user.into();
        active.last_login_at = Set(Some(crate::now()));
        let user = active.update(&self.db).await?;

        info!(user_id = user.id, role = %user.role, "User authenticated");
        Ok(user)
    }

    pub async fn get_user_by_id(&self, id: i32) -> Result<user::Model> {
        user_repo::find_by_id(&self.db, id)
            .await?
            .ok_or_else(|| ServiceError::not_found("User", id))
    }

    pub async fn get_user_by_username(&self, username: &str) -> Result<Option<user::Model>> {
        Ok(user_repo::find_by_username(&self.db, username).await?)
    }

    pub async fn get_all_users(&self) -> Result<Vec<user::Model>> {
        Ok(user_repo::find_all(&self.db).await?)
    }

    pub async fn username_exists(&self, username: &str) -> Result<bool> {
        Ok(user_repo::username_taken(&self.db, username, None).await?)
    }

    pub async fn email_exists(&self, email: &str) -> Result<bool> {
        Ok(user_repo::email_taken(&self.db, email, None).await?)
    }

    /// Creates the account immediately. Farmers get their farm profile in
    /// the same transaction.
    #[instrument(skip(self, request), fields(username = %request.username, role = %request.role))]
    pub async fn register_user(&self, request: RegisterUser) -> Result<user::Model> {
        let username = required("Username", &request.username, 50)?;
        let email = required("Email", &request.email, 255)?;
        let first_name = required("First name", &request.first_name, 50)?;
        let last_name = required("Last name", &request.last_name, 50)?;
        let phone_number = required("Phone number", &request.phone_number, 20)?;
        validate::password(&request.password)?;

        let farm = match request.role {
            UserRole::Farmer => Some((
                required("Farm name", request.farm_name.as_deref().unwrap_or(""), 100)?,
                required("Location", request.location.as_deref().unwrap_or(""), 100)?,
            )),
            UserRole::Employee => None,
        };

        let password_hash = self.hasher.hash(&request.password).await?;
        let created_at = crate::now();

        let txn = self.db.begin().await?;

        if user_repo::username_taken(&txn, &username, None).await? {
            return Err(ServiceError::Conflict("Username already exists".to_string()));
        }
        if user_repo::email_taken(&txn, &email, None).await? {
            return Err(ServiceError::Conflict("Email already exists".to_string()));
        }

        let user = match farm {
            Some((farm_name, location)) => {
                let (user, _) = farmer_repo::create_with_user(
                    &txn,
                    farmer_repo::NewFarmerAccount {
                        username,
                        password_hash,
                        email,
                        first_name,
                        last_name,
                        phone_number,
                        farm_name,
                        location,
                        created_at,
                    },
                )
                .await?;
                user
            }
            None => {
                user::ActiveModel {
                    username: Set(username),
                    password_hash: Set(password_hash),
                    email: Set(email),
                    first_name: Set(first_name),
                    last_name: Set(last_name),
                    phone_number: Set(phone_number),
                    role: Set(UserRole::Employee),
                    created_at: Set(created_at),
                    last_login_at: Set(None),
                    is_active: Set(true),
                    ..Default::default()
                }
                .insert(&txn)
                .await?
            }
        };

        txn.commit().await?;

        info!(user_id = user.id, "User registered");
        Ok(user)
    }
}
