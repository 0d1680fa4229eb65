use std::sync::Arc;

use common::RegistrationRequestDto;
use model::entities::registration_request::{self, RequestStatus};
use model::entities::user;
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set, TransactionTrait};
use tracing::{debug, error, info, instrument, warn};

use crate::error::{Result, ServiceError};
use crate::mapping::registration_request_dto;
use crate::notifier::RegistrationNotifier;
use crate::password::PasswordHasher;
use crate::repository::{
    farmer as farmer_repo, message as message_repo, registration_request as request_repo,
    user as user_repo,
};
use crate::validate::{self, required};

pub const WELCOME_SUBJECT: &str = "Welcome to Agri-Energy Connect";

fn welcome_body(first_name: &str) -> String {
    format!(
        "Dear {},\n\n\
         Your registration request has been approved. Welcome to the Agri-Energy Connect platform!\n\n\
         You can now log in and start using all the features available to farmers on our platform.\n\n\
         If you have any questions or need assistance, please don't hesitate to contact us.\n\n\
         Best regards,\n\
         The Agri-Energy Connect Team",
        first_name
    )
}

fn already_processed() -> ServiceError {
    ServiceError::InvalidState("This registration request has already been processed".to_string())
}

/// Self-service sign-up submitted by a prospective farmer.
#[derive(Debug, Clone)]
pub struct RegisterFarmer {
    pub username: String,
    pub password: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: String,
    pub farm_name: String,
    pub location: String,
}

/// Registration requests move `Pending -> Approved` or `Pending -> Rejected`,
/// never back.
#[derive(Debug, Clone)]
pub struct RegistrationService {
    db: DatabaseConnection,
    hasher: PasswordHasher,
    notifier: Arc<dyn RegistrationNotifier>,
}

impl RegistrationService {
    pub fn new(
        db: DatabaseConnection,
        hasher: PasswordHasher,
        notifier: Arc<dyn RegistrationNotifier>,
    ) -> Self {
        Self {
            db,
            hasher,
            notifier,
        }
    }

    /// Pending requests, newest first.
    pub async fn get_pending_requests(&self) -> Result<Vec<RegistrationRequestDto>> {
        let requests = request_repo::find_pending(&self.db).await?;
        Ok(requests.iter().map(registration_request_dto).collect())
    }

    /// Every request, newest first.
    pub async fn get_all_requests(&self) -> Result<Vec<RegistrationRequestDto>> {
        let requests = request_repo::find_all(&self.db).await?;
        Ok(requests.iter().map(registration_request_dto).collect())
    }

    pub async fn get_request(&self, id: i32) -> Result<RegistrationRequestDto> {
        request_repo::find_by_id(&self.db, id)
            .await?
            .map(|request| registration_request_dto(&request))
            .ok_or_else(|| ServiceError::not_found("Registration request", id))
    }

    /// True when a pending request already uses the username or e-mail.
    pub async fn request_exists(&self, username: &str, email: &str) -> Result<bool> {
        Ok(request_repo::pending_exists(&self.db, username, email).await?)
    }

    /// Stores a pending request with a hashed password.
    ///
    /// Fails with `Conflict` when the username or e-mail belongs to an
    /// existing user or to another pending request.
    #[instrument(skip(self, request), fields(username = %request.username))]
    pub async fn create_request(&self, request: RegisterFarmer) -> Result<RegistrationRequestDto> {
        let username = required("Username", &request.username, 50)?;
        let email = required("Email", &request.email, 255)?;
        let first_name = required("First name", &request.first_name, 50)?;
        let last_name = required("Last name", &request.last_name, 50)?;
        let phone_number = required("Phone number", &request.phone_number, 20)?;
        let farm_name = required("Farm name", &request.farm_name, 100)?;
        let location = required("Location", &request.location, 100)?;
        validate::password(&request.password)?;

        if user_repo::username_taken(&self.db, &username, None).await? {
            return Err(ServiceError::Conflict("Username already exists".to_string()));
        }
        if user_repo::email_taken(&self.db, &email, None).await? {
            return Err(ServiceError::Conflict("Email already exists".to_string()));
        }
        if request_repo::pending_exists(&self.db, &username, &email).await? {
            return Err(ServiceError::Conflict(
                "A registration request with this username or email already exists".to_string(),
            ));
        }

        let saved = registration_request::ActiveModel {
            username: Set(username),
            password_hash: Set(self.hasher.hash(&request.password).await?),
            first_name: Set(first_name),
            last_name: Set(last_name),
            email: Set(email),
            phone_number: Set(phone_number),
            farm_name: Set(farm_name),
            location: Set(location),
            requested_at: Set(crate::now()),
            status: Set(RequestStatus::Pending),
            rejection_reason: Set(None),
            ..Default::default()
        }
        .insert(&self.db)
        .await?;

        info!(request_id = saved.id, "Registration request created");
        Ok(registration_request_dto(&saved))
    }

    /// Creates the farmer account and marks the request approved in one
    /// transaction, then notifies the applicant and sends a welcome message.
    /// Failures after the commit are logged and do not undo the approval.
    #[instrument(skip(self))]
    pub async fn approve_request(&self, id: i32) -> Result<user::Model> {
        let txn = self.db.begin().await?;

        let request = request_repo::find_by_id(&txn, id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Registration request", id))?;

        if !request.is_pending() {
            warn!(status = %request.status, "Request already processed");
            return Err(already_processed());
        }

        if user_repo::username_taken(&txn, &request.username, None).await? {
            return Err(ServiceError::Conflict("Username already exists".to_string()));
        }
        if user_repo::email_taken(&txn, &request.email, None).await? {
            return Err(ServiceError::Conflict("Email already exists".to_string()));
        }

        if !request_repo::finish_pending(&txn, id, RequestStatus::Approved, None).await? {
            warn!("Request was processed concurrently");
            return Err(already_processed());
        }
        let request = registration_request::Model {
            status: RequestStatus::Approved,
            ..request
        };

        let (user, farmer) = farmer_repo::create_with_user(
            &txn,
            farmer_repo::NewFarmerAccount {
                username: request.username.clone(),
                password_hash: request.password_hash.clone(),
                email: request.email.clone(),
                first_name: request.first_name.clone(),
                last_name: request.last_name.clone(),
                phone_number: request.phone_number.clone(),
                farm_name: request.farm_name.clone(),
                location: request.location.clone(),
                created_at: crate::now(),
            },
        )
        .await?;

        txn.commit().await?;
        info!(user_id = user.id, farmer_id = farmer.id, "Registration request approved");

        if let Err(err) = self.notifier.request_approved(&request).await {
            error!(?err, "Failed to send approval notification");
        }
        if let Err(err) = self.send_welcome_message(&user).await {
            error!(?err, "Failed to send welcome message");
        }

        Ok(user)
    }

    /// Marks the request rejected with a reason and notifies the applicant.
    #[instrument(skip(self, reason))]
    pub async fn reject_request(&self, id: i32, reason: &str) -> Result<RegistrationRequestDto> {
        let reason = required("Rejection reason", reason, 500)?;

        let request = request_repo::find_by_id(&self.db, id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Registration request", id))?;

        if !request.is_pending() {
            warn!(status = %request.status, "Request already processed");
            return Err(already_processed());
        }

        if !request_repo::finish_pending(
            &self.db,
            id,
            RequestStatus::Rejected,
            Some(reason.clone()),
        )
        .await?
        {
            warn!("Request was processed concurrently");
            return Err(already_processed());
        }
        let request = registration_request::Model {
            status: RequestStatus::Rejected,
            rejection_reason: Some(reason.clone()),
            ..request
        };
        info!("Registration request rejected");

        if let Err(err) = self.notifier.request_rejected(&request, &reason).await {
            error!(?err, "Failed to send rejection notification");
        }

        Ok(registration_request_dto(&request))
    }

    async fn send_welcome_message(&self, user: &user::Model) -> Result<()> {
        let Some(sender) = user_repo::first_employee(&self.db).await? else {
            debug!("No employee account to send the welcome message from");
            return Ok(());
        };

        message_repo::insert(
            &self.db,
            sender.id,
            user.id,
            WELCOME_SUBJECT.to_string(),
            welcome_body(&user.first_name),
            crate::now(),
        )
        .await?;
        Ok(())
    }
}
