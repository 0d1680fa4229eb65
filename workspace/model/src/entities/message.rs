use sea_orm::entity::prelude::*;

/// Longest accepted subject, in characters.
pub const MAX_SUBJECT_LEN: usize = 200;
/// Longest accepted body, in characters.
pub const MAX_CONTENT_LEN: usize = 1000;

/// A message sent from one user to another.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "messages")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub sender_id: i32,
    pub recipient_id: i32,
    pub subject: String,
    pub content: String,
    pub sent_at: DateTime,
    /// Set once, when the recipient first reads the message.
    pub read_at: Option<DateTime>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::SenderId",
        to = "super::user::Column::Id"
    )]
    Sender,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::RecipientId",
        to = "super::user::Column::Id"
    )]
    Recipient,
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn is_read(&self) -> bool {
        self.read_at.is_some()
    }

    /// Only the sender and the recipient may see a message.
    pub fn is_visible_to(&self, user_id: i32) -> bool {
        self.sender_id == user_id || self.recipient_id == user_id
    }
}
