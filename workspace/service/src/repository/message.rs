use chrono::NaiveDateTime;
use model::entities::{message, prelude::*, user};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};

use super::user as user_repo;

/// A message with both participants loaded.
#[derive(Debug, Clone)]
pub struct MessageRecord {
    pub message: message::Model,
    pub sender: user::Model,
    pub recipient: user::Model,
}

async fn attach<C: ConnectionTrait>(
    db: &C,
    messages: Vec<message::Model>,
) -> Result<Vec<MessageRecord>, DbErr> {
    let mut ids: Vec<i32> = messages
        .iter()
        .flat_map(|m| [m.sender_id, m.recipient_id])
        .collect();
    ids.sort_unstable();
    ids.dedup();

    let users = user_repo::find_by_ids(db, ids).await?;
    Ok(messages
        .into_iter()
        .filter_map(|message| {
            let sender = users.get(&message.sender_id)?.clone();
            let recipient = users.get(&message.recipient_id)?.clone();
            Some(MessageRecord {
                message,
                sender,
                recipient,
            })
        })
        .collect())
}

/// Messages received by the user, newest first.
pub async fn inbox<C: ConnectionTrait>(db: &C, user_id: i32) -> Result<Vec<MessageRecord>, DbErr> {
    let messages = Message::find()
        .filter(message::Column::RecipientId.eq(user_id))
        .order_by_desc(message::Column::SentAt)
        .order_by_desc(message::Column::Id)
        .all(db)
        .await?;
    attach(db, messages).await
}

/// Messages sent by the user, newest first.
pub async fn sent<C: ConnectionTrait>(db: &C, user_id: i32) -> Result<Vec<MessageRecord>, DbErr> {
    let messages = Message::find()
        .filter(message::Column::SenderId.eq(user_id))
        .order_by_desc(message::Column::SentAt)
        .order_by_desc(message::Column::Id)
        .all(db)
        .await?;
    attach(db, messages).await
}

pub async fn find_by_id<C: ConnectionTrait>(
    db: &C,
    id: i32,
) -> Result<Option<MessageRecord>, DbErr> {
    let Some(message) = Message::find_by_id(id).one(db).await? else {
        return Ok(None);
    };
    Ok(attach(db, vec![message]).await?.into_iter().next())
}

pub async fn insert<C: ConnectionTrait>(
    db: &C,
    sender_id: i32,
    recipient_id: i32,
    subject: String,
    content: String,
    sent_at: NaiveDateTime,
) -> Result<message::Model, DbErr> {
    message::ActiveModel {
        sender_id: Set(sender_id),
        recipient_id: Set(recipient_id),
        subject: Set(subject),
        content: Set(content),
        sent_at: Set(sent_at),
        read_at: Set(None),
        ..Default::default()
    }
    .insert(db)
    .await
}

/// Sets `read_at` only if `user_id` is the recipient and the message is
/// still unread. Returns whether a row changed.
pub async fn mark_read<C: ConnectionTrait>(
    db: &C,
    id: i32,
    user_id: i32,
    read_at: NaiveDateTime,
) -> Result<bool, DbErr> {
    let result = Message::update_many()
        .col_expr(message::Column::ReadAt, Expr::value(read_at))
        .filter(message::Column::Id.eq(id))
        .filter(message::Column::RecipientId.eq(user_id))
        .filter(message::Column::ReadAt.is_null())
        .exec(db)
        .await?;
    Ok(result.rows_affected > 0)
}

pub async fn unread_count<C: ConnectionTrait>(db: &C, user_id: i32) -> Result<u64, DbErr> {
    Message::find()
        .filter(message::Column::RecipientId.eq(user_id))
        .filter(message::Column::ReadAt.is_null())
        .count(db)
        .await
}
