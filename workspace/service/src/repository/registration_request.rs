use model::entities::{prelude::*, registration_request};
use model::entities::registration_request::RequestStatus;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, Condition, ConnectionTrait, DbErr, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder,
};

use super::eq_ignore_case;

/// Pending requests, newest first.
pub async fn find_pending<C: ConnectionTrait>(
    db: &C,
) -> Result<Vec<registration_request::Model>, DbErr> {
    RegistrationRequest::find()
        .filter(registration_request::Column::Status.eq(RequestStatus::Pending))
        .order_by_desc(registration_request::Column::RequestedAt)
        .order_by_desc(registration_request::Column::Id)
        .all(db)
        .await
}

/// Every request regardless of status, newest first.
pub async fn find_all<C: ConnectionTrait>(
    db: &C,
) -> Result<Vec<registration_request::Model>, DbErr> {
    RegistrationRequest::find()
        .order_by_desc(registration_request::Column::RequestedAt)
        .order_by_desc(registration_request::Column::Id)
        .all(db)
        .await
}

pub async fn find_by_id<C: ConnectionTrait>(
    db: &C,
    id: i32,
) -> Result<Option<registration_request::Model>, DbErr> {
    RegistrationRequest::find_by_id(id).one(db).await
}

/// True when a pending request already uses the username or e-mail
/// (case-insensitive).
pub async fn pending_exists<C: ConnectionTrait>(
    db: &C,
    username: &str,
    email: &str,
) -> Result<bool, DbErr> {
    let count = RegistrationRequest::find()
        .filter(registration_request::Column::Status.eq(RequestStatus::Pending))
        .filter(
            Condition::any()
                .add(eq_ignore_case(registration_request::Column::Username, username))
                .add(eq_ignore_case(registration_request::Column::Email, email)),
        )
        .count(db)
        .await?;
    Ok(count > 0)
}

/// Moves a request out of `Pending` in a single conditional UPDATE.
///
/// Returns false when the row is missing or no longer pending, so two
/// concurrent decisions cannot both win.
pub async fn finish_pending<C: ConnectionTrait>(
    db: &C,
    id: i32,
    status: RequestStatus,
    rejection_reason: Option<String>,
) -> Result<bool, DbErr> {
    let result = RegistrationRequest::update_many()
        .col_expr(registration_request::Column::Status, Expr::value(status))
        .col_expr(
            registration_request::Column::RejectionReason,
            Expr::value(rejection_reason),
        )
        .filter(registration_request::Column::Id.eq(id))
        .filter(registration_request::Column::Status.eq(RequestStatus::Pending))
        .exec(db)
        .await?;
    Ok(result.rows_affected == 1)
}
