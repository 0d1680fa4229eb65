use std::collections::HashMap;

use chrono::NaiveDateTime;
use model::entities::{farmer, prelude::*, product, user};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};

/// A farmer together with its owning user and all of its products.
#[derive(Debug, Clone)]
pub struct FarmerRecord {
    pub farmer: farmer::Model,
    pub user: user::Model,
    pub products: Vec<product::Model>,
}

/// Fields for creating a farmer account. The password must already be hashed.
#[derive(Debug, Clone)]
pub struct NewFarmerAccount {
    pub username: String,
    pub password_hash: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: String,
    pub farm_name: String,
    pub location: String,
    pub created_at: NaiveDateTime,
}

async fn attach<C: ConnectionTrait>(
    db: &C,
    rows: Vec<(farmer::Model, Option<user::Model>)>,
) -> Result<Vec<FarmerRecord>, DbErr> {
    if rows.is_empty() {
        return Ok(Vec::new());
    }

    let farmer_ids: Vec<i32> = rows.iter().map(|(f, _)| f.id).collect();
    let mut products_by_farmer: HashMap<i32, Vec<product::Model>> = HashMap::new();
    for product in Product::find()
        .filter(product::Column::FarmerId.is_in(farmer_ids))
        .order_by_desc(product::Column::CreatedAt)
        .order_by_desc(product::Column::Id)
        .all(db)
        .await?
    {
        products_by_farmer
            .entry(product.farmer_id)
            .or_default()
            .push(product);
    }

    Ok(rows
        .into_iter()
        .filter_map(|(farmer, user)| {
            let products = products_by_farmer.remove(&farmer.id).unwrap_or_default();
            user.map(|user| FarmerRecord {
                farmer,
                user,
                products,
            })
        })
        .collect())
}

/// All farmers ordered by id. Products are newest first.
pub async fn find_all<C: ConnectionTrait>(db: &C) -> Result<Vec<FarmerRecord>, DbErr> {
    let rows = Farmer::find()
        .find_also_related(User)
        .order_by_asc(farmer::Column::Id)
        .all(db)
        .await?;
    attach(db, rows).await
}

pub async fn find_by_id<C: ConnectionTrait>(db: &C, id: i32) -> Result<Option<FarmerRecord>, DbErr> {
    let rows = Farmer::find_by_id(id)
        .find_also_related(User)
        .all(db)
        .await?;
    Ok(attach(db, rows).await?.into_iter().next())
}

pub async fn find_by_user_id<C: ConnectionTrait>(
    db: &C,
    user_id: i32,
) -> Result<Option<FarmerRecord>, DbErr> {
    let rows = Farmer::find()
        .filter(farmer::Column::UserId.eq(user_id))
        .find_also_related(User)
        .all(db)
        .await?;
    Ok(attach(db, rows).await?.into_iter().next())
}

/// Only the farmer row, without joins.
pub async fn find_model_by_user_id<C: ConnectionTrait>(
    db: &C,
    user_id: i32,
) -> Result<Option<farmer::Model>, DbErr> {
    Farmer::find()
        .filter(farmer::Column::UserId.eq(user_id))
        .one(db)
        .await
}

pub async fn exists<C: ConnectionTrait>(db: &C, id: i32) -> Result<bool, DbErr> {
    Ok(Farmer::find()
        .filter(farmer::Column::Id.eq(id))
        .count(db)
        .await?
        > 0)
}

pub async fn count_all<C: ConnectionTrait>(db: &C) -> Result<u64, DbErr> {
    Farmer::find().count(db).await
}

/// Inserts the user (role `Farmer`) and its farm profile. Run it inside a
/// transaction so both rows land together.
pub async fn create_with_user<C: ConnectionTrait>(
    db: &C,
    account: NewFarmerAccount,
) -> Result<(user::Model, farmer::Model), DbErr> {
    let user = user::ActiveModel {
        username: Set(account.username),
        password_hash: Set(account.password_hash),
        email: Set(account.email),
        first_name: Set(account.first_name),
        last_name: Set(account.last_name),
        phone_number: Set(account.phone_number),
        role: Set(user::UserRole::Farmer),
        created_at: Set(account.created_at),
        last_login_at: Set(None),
        is_active: Set(true),
        ..Default::default()
    }
    .insert(db)
    .await?;

    let farmer = farmer::ActiveModel {
        farm_name: Set(account.farm_name),
        location: Set(account.location),
        user_id: Set(user.id),
        ..Default::default()
    }
    .insert(db)
    .await?;

    Ok((user, farmer))
}
