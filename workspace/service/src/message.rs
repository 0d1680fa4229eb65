use common::{MessageDto, MessageSummaryDto};
use model::entities::message::{self, MAX_CONTENT_LEN, MAX_SUBJECT_LEN};
use sea_orm::DatabaseConnection;
use tracing::{debug, info, instrument};

use crate::error::{Result, ServiceError};
use crate::mapping::{message_dto, message_summary};
use crate::repository::{message as message_repo, user as user_repo};
use crate::validate::required;

#[derive(Debug, Clone)]
pub struct MessageService {
    db: DatabaseConnection,
}

impl MessageService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Received messages, newest first.
    pub async fn get_inbox(&self, user_id: i32) -> Result<Vec<MessageSummaryDto>> {
        let records = message_repo::inbox(&self.db, user_id).await?;
        Ok(records.iter().map(message_summary).collect())
    }

    /// Sent messages, newest first.
    pub async fn get_sent(&self, user_id: i32) -> Result<Vec<MessageSummaryDto>> {
        let records = message_repo::sent(&self.db, user_id).await?;
        Ok(records.iter().map(message_summary).collect())
    }

    pub async fn get_message(&self, id: i32) -> Result<MessageDto> {
        message_repo::find_by_id(&self.db, id)
            .await?
            .map(|record| message_dto(&record))
            .ok_or_else(|| ServiceError::not_found("Message", id))
    }

    /// Opens a message for one of its participants. The recipient's first
    /// view marks it read. Anyone else gets `NotFound`.
    #[instrument(skip(self))]
    pub async fn view_message(&self, id: i32, user_id: i32) -> Result<MessageDto> {
        let record = message_repo::find_by_id(&self.db, id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Message", id))?;

        if !record.message.is_visible_to(user_id) {
            debug!("Message not visible to user");
            return Err(ServiceError::not_found("Message", id));
        }

        if record.message.recipient_id == user_id && !record.message.is_read() {
            self.mark_as_read(id, user_id).await?;
            return self.get_message(id).await;
        }

        Ok(message_dto(&record))
    }

    /// Stores a new message. Subject and content are trimmed, required and
    /// length-limited; the recipient must exist.
    #[instrument(skip(self, subject, content))]
    pub async fn send_message(
        &self,
        sender_id: i32,
        recipient_id: i32,
        subject: &str,
        content: &str,
    ) -> Result<message::Model> {
        let subject = required("Subject", subject, MAX_SUBJECT_LEN)?;
        let content = required("Content", content, MAX_CONTENT_LEN)?;

        if user_repo::find_by_id(&self.db, recipient_id).await?.is_none() {
            return Err(ServiceError::not_found("Recipient", recipient_id));
        }

        let message = message_repo::insert(
            &self.db,
            sender_id,
            recipient_id,
            subject,
            content,
            crate::now(),
        )
        .await?;

        info!(message_id = message.id, "Message sent");
        Ok(message)
    }

    /// Returns true only when `user_id` is the recipient and the message
    /// went from unread to read by this call.
    #[instrument(skip(self))]
    pub async fn mark_as_read(&self, message_id: i32, user_id: i32) -> Result<bool> {
        let changed = message_repo::mark_read(&self.db, message_id, user_id, crate::now()).await?;
        debug!(changed, "Mark as read");
        Ok(changed)
    }

    pub async fn get_unread_count(&self, user_id: i32) -> Result<u64> {
        Ok(message_repo::unread_count(&self.db, user_id).await?)
    }
}
