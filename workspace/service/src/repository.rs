//! Query modules, one per entity.
//!
//! Every function is generic over [`sea_orm::ConnectionTrait`] so the same
//! query runs against the pool or inside a transaction.

pub mod farmer;
pub mod message;
pub mod product;
pub mod registration_request;
pub mod user;

use sea_orm::sea_query::{Expr, Func, SimpleExpr};
use sea_orm::ColumnTrait;

/// `LOWER(column) = LOWER(value)`
pub(crate) fn eq_ignore_case<C: ColumnTrait>(column: C, value: &str) -> SimpleExpr {
    Expr::expr(Func::lower(Expr::col(column))).eq(value.to_lowercase())
}
