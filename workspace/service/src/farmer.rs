use std::collections::BTreeSet;

use common::{FarmerDto, FarmerPage, FarmerSummaryDto};
use model::entities::{farmer, user};
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set, TransactionTrait};
use tracing::{debug, info, instrument};

use crate::error::{Result, ServiceError};
use crate::filter::{StatusFilter, contains_lower, search_term};
use crate::mapping::{farmer_dto, farmer_summary};
use crate::pagination::Pagination;
use crate::password::PasswordHasher;
use crate::repository::{farmer as farmer_repo, user as user_repo};
use crate::validate::{self, required};

/// Fields an employee fills in to create a farmer account.
#[derive(Debug, Clone)]
pub struct NewFarmer {
    pub username: String,
    pub password: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: String,
    pub farm_name: String,
    pub location: String,
}

/// Replacement values for a farmer and its user. The password is changed
/// only when a non-blank one is given.
#[derive(Debug, Clone)]
pub struct UpdateFarmer {
    pub username: String,
    pub password: Option<String>,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: String,
    pub farm_name: String,
    pub location: String,
}

/// Filters for the farmer listing.
#[derive(Debug, Clone, Default)]
pub struct FarmerListQuery {
    /// Case-insensitive substring of owner name, farm name or location.
    pub search: Option<String>,
    /// Case-insensitive location equality.
    pub location: Option<String>,
    pub status: StatusFilter,
    pub pagination: Pagination,
}

#[derive(Debug, Clone)]
pub struct FarmerService {
    db: DatabaseConnection,
    hasher: PasswordHasher,
}

impl FarmerService {
    pub fn new(db: DatabaseConnection, hasher: PasswordHasher) -> Self {
        Self { db, hasher }
    }

    pub async fn get_all_farmers(&self) -> Result<Vec<FarmerDto>> {
        let records = farmer_repo::find_all(&self.db).await?;
        Ok(records.iter().map(farmer_dto).collect())
    }

    pub async fn get_all_farmer_summaries(&self) -> Result<Vec<FarmerSummaryDto>> {
        let records = farmer_repo::find_all(&self.db).await?;
        Ok(records.iter().map(farmer_summary).collect())
    }

    pub async fn get_farmer_by_id(&self, id: i32) -> Result<FarmerDto> {
        farmer_repo::find_by_id(&self.db, id)
            .await?
            .map(|record| farmer_dto(&record))
            .ok_or_else(|| ServiceError::not_found("Farmer", id))
    }

    pub async fn get_farmer_by_user_id(&self, user_id: i32) -> Result<FarmerDto> {
        farmer_repo::find_by_user_id(&self.db, user_id)
            .await?
            .map(|record| farmer_dto(&record))
            .ok_or_else(|| ServiceError::NotFound(format!("Farmer for user {}", user_id)))
    }

    /// Farmer id owned by the user, if the user is a farmer.
    pub async fn farmer_id_for_user(&self, user_id: i32) -> Result<Option<i32>> {
        Ok(farmer_repo::find_model_by_user_id(&self.db, user_id)
            .await?
            .map(|farmer| farmer.id))
    }

    pub async fn farmer_exists(&self, id: i32) -> Result<bool> {
        Ok(farmer_repo::exists(&self.db, id).await?)
    }

    #[instrument(skip(self, request), fields(username = %request.username))]
    pub async fn add_farmer(&self, request: NewFarmer) -> Result<FarmerDto> {
        let account = farmer_repo::NewFarmerAccount {
            username: required("Username", &request.username, 50)?,
            email: required("Email", &request.email, 255)?,
            first_name: required("First name", &request.first_name, 50)?,
            last_name: required("Last name", &request.last_name, 50)?,
            phone_number: required("Phone number", &request.phone_number, 20)?,
            farm_name: required("Farm name", &request.farm_name, 100)?,
            location: required("Location", &request.location, 100)?,
            password_hash: {
                validate::password(&request.password)?;
                self.hasher.hash(&request.password).await?
            },
            created_at: crate::now(),
        };

        let txn = self.db.begin().await?;

        if user_repo::username_taken(&txn, &account.username, None).await? {
            return Err(ServiceError::Conflict("Username already exists".to_string()));
        }
        if user_repo::email_taken(&txn, &account.email, None).await? {
            return Err(ServiceError::Conflict("Email already exists".to_string()));
        }

        let (_, farmer) = farmer_repo::create_with_user(&txn, account).await?;
        txn.commit().await?;

        info!(farmer_id = farmer.id, "Farmer added");
        self.get_farmer_by_id(farmer.id).await
    }

    #[instrument(skip(self, request))]
    pub async fn update_farmer(&self, id: i32, request: UpdateFarmer) -> Result<FarmerDto> {
        let username = required("Username", &request.username, 50)?;
        let email = required("Email", &request.email, 255)?;
        let first_name = required("First name", &request.first_name, 50)?;
        let last_name = required("Last name", &request.last_name, 50)?;
        let phone_number = required("Phone number", &request.phone_number, 20)?;
        let farm_name = required("Farm name", &request.farm_name, 100)?;
        let location = required("Location", &request.location, 100)?;

        let password_hash = match request.password.as_deref().filter(|p| !p.is_empty()) {
            Some(password) => {
                validate::password(password)?;
                Some(self.hasher.hash(password).await?)
            }
            None => None,
        };

        let txn = self.db.begin().await?;

        let record = farmer_repo::find_by_id(&txn, id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Farmer", id))?;

        if user_repo::username_taken(&txn, &username, Some(record.user.id)).await? {
            return Err(ServiceError::Conflict("Username already exists".to_string()));
        }
        if user_repo::email_taken(&txn, &email, Some(record.user.id)).await? {
            return Err(ServiceError::Conflict("Email already exists".to_string()));
        }

        let mut farm: farmer::ActiveModel = record.farmer.into();
        farm.farm_name = Set(farm_name);
        farm.location = Set(location);
        farm.update(&txn).await?;

        let mut user: user::ActiveModel = record.user.into();
        user.username = Set(username);
        user.email = Set(email);
        user.first_name = Set(first_name);
        user.last_name = Set(last_name);
        user.phone_number = Set(phone_number);
        if let Some(hash) = password_hash {
            debug!("Replacing password");
            user.password_hash = Set(hash);
        }
        user.update(&txn).await?;

        txn.commit().await?;

        info!(farmer_id = id, "Farmer updated");
        self.get_farmer_by_id(id).await
    }

    /// Filters, searches and paginates farmer summaries.
    #[instrument(skip(self))]
    pub async fn get_filtered_farmers(&self, query: FarmerListQuery) -> Result<FarmerPage> {
        let records = farmer_repo::find_all(&self.db).await?;

        let unique_locations: Vec<String> = records
            .iter()
            .map(|r| r.farmer.location.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let search = search_term(query.search.as_deref());
        let location = query
            .location
            .as_deref()
            .map(str::trim)
            .filter(|l| !l.is_empty());

        let farmers: Vec<FarmerSummaryDto> = records
            .iter()
            .map(farmer_summary)
            .filter(|f| query.status.matches(f.is_active))
            .filter(|f| {
                search.as_deref().is_none_or(|term| {
                    contains_lower(&f.owner_name, term)
                        || contains_lower(&f.farm_name, term)
                        || contains_lower(&f.location, term)
                })
            })
            .filter(|f| location.is_none_or(|l| f.location.eq_ignore_ascii_case(l)))
            .collect();

        let total_farmers = farmers.len() as u64;
        let pagination = query.pagination;
        debug!(total_farmers, "Farmers matched filter");

        Ok(FarmerPage {
            farmers: pagination.apply(farmers),
            total_farmers,
            total_pages: pagination.total_pages(total_farmers),
            current_page: pagination.page,
            page_size: pagination.page_size,
            unique_locations,
        })
    }

    pub async fn deactivate_farmer(&self, id: i32) -> Result<FarmerDto> {
        self.set_active(id, false).await
    }

    pub async fn reactivate_farmer(&self, id: i32) -> Result<FarmerDto> {
        self.set_active(id, true).await
    }

    #[instrument(skip(self))]
    async fn set_active(&self, id: i32, is_active: bool) -> Result<FarmerDto> {
        let record = farmer_repo::find_by_id(&self.db, id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Farmer", id))?;

        if record.user.is_active != is_active {
            let mut user: user::ActiveModel = record.user.into();
            user.is_active = Set(is_active);
            user.update(&self.db).await?;
            info!(farmer_id = id, is_active, "Farmer account status changed");
        }

        self.get_farmer_by_id(id).await
    }
}
