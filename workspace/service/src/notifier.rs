use async_trait::async_trait;
use model::entities::registration_request;
use tracing::info;

use crate::error::Result;

/// Tells an applicant about the decision on their registration request.
#[async_trait]
pub trait RegistrationNotifier: Send + Sync + std::fmt::Debug {
    async fn request_approved(&self, request: &registration_request::Model) -> Result<()>;

    async fn request_rejected(
        &self,
        request: &registration_request::Model,
        reason: &str,
    ) -> Result<()>;
}

/// Writes the notification to the log instead of delivering it.
#[derive(Debug, Clone, Default)]
pub struct LogNotifier;

#[async_trait]
impl RegistrationNotifier for LogNotifier {
    async fn request_approved(&self, request: &registration_request::Model) -> Result<()> {
        info!(
            request_id = request.id,
            email = %request.email,
            status = "Approved",
            "Registration notification sent"
        );
        Ok(())
    }

    async fn request_rejected(
        &self,
        request: &registration_request::Model,
        reason: &str,
    ) -> Result<()> {
        info!(
            request_id = request.id,
            email = %request.email,
            status = "Rejected",
            reason,
            "Registration notification sent"
        );
        Ok(())
    }
}
