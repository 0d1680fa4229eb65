use std::collections::HashMap;

use model::entities::{farmer, prelude::*, product, user};
use sea_orm::{
    ColumnTrait, ConnectionTrait, DbErr, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect,
};

/// A product with its farmer and the farmer's user.
#[derive(Debug, Clone)]
pub struct ProductRecord {
    pub product: product::Model,
    pub farmer: farmer::Model,
    pub owner: user::Model,
}

async fn owners<C: ConnectionTrait>(
    db: &C,
    farmer_ids: Vec<i32>,
) -> Result<HashMap<i32, (farmer::Model, user::Model)>, DbErr> {
    if farmer_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let rows = Farmer::find()
        .filter(farmer::Column::Id.is_in(farmer_ids))
        .find_also_related(User)
        .all(db)
        .await?;

    Ok(rows
        .into_iter()
        .filter_map(|(farmer, user)| user.map(|user| (farmer.id, (farmer, user))))
        .collect())
}

async fn attach<C: ConnectionTrait>(
    db: &C,
    products: Vec<product::Model>,
) -> Result<Vec<ProductRecord>, DbErr> {
    let mut farmer_ids: Vec<i32> = products.iter().map(|p| p.farmer_id).collect();
    farmer_ids.sort_unstable();
    farmer_ids.dedup();

    let owners = owners(db, farmer_ids).await?;
    Ok(products
        .into_iter()
        .filter_map(|product| {
            owners
                .get(&product.farmer_id)
                .map(|(farmer, owner)| ProductRecord {
                    product,
                    farmer: farmer.clone(),
                    owner: owner.clone(),
                })
        })
        .collect())
}

/// Products ordered by production date (newest first), optionally for one farmer.
pub async fn find_all<C: ConnectionTrait>(
    db: &C,
    farmer_id: Option<i32>,
) -> Result<Vec<ProductRecord>, DbErr> {
    let mut query = Product::find();
    if let Some(farmer_id) = farmer_id {
        query = query.filter(product::Column::FarmerId.eq(farmer_id));
    }

    let products = query
        .order_by_desc(product::Column::ProductionDate)
        .order_by_desc(product::Column::Id)
        .all(db)
        .await?;
    attach(db, products).await
}

pub async fn find_by_id<C: ConnectionTrait>(
    db: &C,
    id: i32,
) -> Result<Option<ProductRecord>, DbErr> {
    let Some(product) = Product::find_by_id(id).one(db).await? else {
        return Ok(None);
    };
    Ok(attach(db, vec![product]).await?.into_iter().next())
}

pub async fn find_model_by_id<C: ConnectionTrait>(
    db: &C,
    id: i32,
) -> Result<Option<product::Model>, DbErr> {
    Product::find_by_id(id).one(db).await
}

pub async fn exists<C: ConnectionTrait>(db: &C, id: i32) -> Result<bool, DbErr> {
    Ok(Product::find()
        .filter(product::Column::Id.eq(id))
        .count(db)
        .await?
        > 0)
}

pub async fn count_all<C: ConnectionTrait>(db: &C) -> Result<u64, DbErr> {
    Product::find().count(db).await
}

/// Distinct categories in use, sorted.
pub async fn distinct_categories<C: ConnectionTrait>(db: &C) -> Result<Vec<String>, DbErr> {
    Product::find()
        .select_only()
        .column(product::Column::Category)
        .distinct()
        .order_by_asc(product::Column::Category)
        .into_tuple::<String>()
        .all(db)
        .await
}
