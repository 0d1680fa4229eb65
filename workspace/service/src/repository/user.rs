use std::collections::HashMap;

use model::entities::{prelude::*, user};
use sea_orm::{
    ColumnTrait, ConnectionTrait, DbErr, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
};

use super::eq_ignore_case;

pub async fn find_by_id<C: ConnectionTrait>(db: &C, id: i32) -> Result<Option<user::Model>, DbErr> {
    User::find_by_id(id).one(db).await
}

/// Exact username match, as used by login.
pub async fn find_by_username<C: ConnectionTrait>(
    db: &C,
    username: &str,
) -> Result<Option<user::Model>, DbErr> {
    User::find()
        .filter(user::Column::Username.eq(username))
        .one(db)
        .await
}

pub async fn find_all<C: ConnectionTrait>(db: &C) -> Result<Vec<user::Model>, DbErr> {
    User::find().order_by_asc(user::Column::Id).all(db).await
}

/// Loads the given users keyed by id.
pub async fn find_by_ids<C: ConnectionTrait>(
    db: &C,
    ids: Vec<i32>,
) -> Result<HashMap<i32, user::Model>, DbErr> {
    if ids.is_empty() {
        return Ok(HashMap::new());
    }

    let users = User::find()
        .filter(user::Column::Id.is_in(ids))
        .all(db)
        .await?;
    Ok(users.into_iter().map(|u| (u.id, u)).collect())
}

/// Case-insensitive check, optionally ignoring one user (the one being edited).
pub async fn username_taken<C: ConnectionTrait>(
    db: &C,
    username: &str,
    exclude_id: Option<i32>,
) -> Result<bool, DbErr> {
    let mut query = User::find().filter(eq_ignore_case(user::Column::Username, username));
    if let Some(id) = exclude_id {
        query = query.filter(user::Column::Id.ne(id));
    }
    Ok(query.count(db).await? > 0)
}

/// Case-insensitive check, optionally ignoring one user (the one being edited).
pub async fn email_taken<C: ConnectionTrait>(
    db: &C,
    email: &str,
    exclude_id: Option<i32>,
) -> Result<bool, DbErr> {
    let mut query = User::find().filter(eq_ignore_case(user::Column::Email, email));
    if let Some(id) = exclude_id {
        query = query.filter(user::Column::Id.ne(id));
    }
    Ok(query.count(db).await? > 0)
}

/// The oldest employee account, used as sender of system messages.
pub async fn first_employee<C: ConnectionTrait>(db: &C) -> Result<Option<user::Model>, DbErr> {
    User::find()
        .filter(user::Column::Role.eq(user::UserRole::Employee))
        .order_by_asc(user::Column::Id)
        .one(db)
        .await
}

pub async fn count_all<C: ConnectionTrait>(db: &C) -> Result<u64, DbErr> {
    User::find().count(db).await
}
