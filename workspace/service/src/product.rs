use std::collections::BTreeSet;

use chrono::NaiveDate;
use common::{FarmerProductsView, ProductDto, ProductPage};
use model::entities::product;
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};
use tracing::{debug, info, instrument};

use crate::category::category_filter;
use crate::error::{Result, ServiceError};
use crate::filter::{contains_lower, search_term, within};
use crate::mapping::product_dto;
use crate::pagination::Pagination;
use crate::repository::{farmer as farmer_repo, product as product_repo};
use crate::validate::{optional, required};

/// Product fields supplied by a farmer.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub category: String,
    pub production_date: NaiveDate,
    pub description: Option<String>,
}

/// Replacement values for an existing product.
pub type UpdateProduct = NewProduct;

/// Criteria for product listings. Every field is optional.
#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    pub farmer_id: Option<i32>,
    /// Inclusive lower bound on the production date.
    pub start_date: Option<NaiveDate>,
    /// Inclusive upper bound on the production date.
    pub end_date: Option<NaiveDate>,
    /// Case-insensitive equality; blank or "All Categories" disables it.
    pub category: Option<String>,
    /// Case-insensitive substring of name, description or category.
    pub search: Option<String>,
    pub active: Option<bool>,
}

impl ProductFilter {
    fn matches(&self, product: &product::Model, search: Option<&str>) -> bool {
        if !within(product.production_date, self.start_date, self.end_date) {
            return false;
        }
        if let Some(category) = category_filter(self.category.as_deref()) {
            if !product.category.eq_ignore_ascii_case(category) {
                return false;
            }
        }
        if let Some(term) = search {
            let hit = contains_lower(&product.name, term)
                || product
                    .description
                    .as_deref()
                    .is_some_and(|d| contains_lower(d, term))
                || contains_lower(&product.category, term);
            if !hit {
                return false;
            }
        }
        self.active.is_none_or(|active| product.is_active == active)
    }
}

#[derive(Debug, Clone)]
pub struct ProductService {
    db: DatabaseConnection,
}

impl ProductService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn get_all_products(&self) -> Result<Vec<ProductDto>> {
        let records = product_repo::find_all(&self.db, None).await?;
        Ok(records.iter().map(product_dto).collect())
    }

    /// Newest production date first.
    pub async fn get_products_by_farmer_id(&self, farmer_id: i32) -> Result<Vec<ProductDto>> {
        let records = product_repo::find_all(&self.db, Some(farmer_id)).await?;
        Ok(records.iter().map(product_dto).collect())
    }

    pub async fn get_product_by_id(&self, id: i32) -> Result<ProductDto> {
        product_repo::find_by_id(&self.db, id)
            .await?
            .map(|record| product_dto(&record))
            .ok_or_else(|| ServiceError::not_found("Product", id))
    }

    /// Product visible to `owner`: when an owner is given, other farmers'
    /// products are reported as missing.
    pub async fn get_product_for(&self, id: i32, owner: Option<i32>) -> Result<ProductDto> {
        let product = self.get_product_by_id(id).await?;
        if owner.is_some_and(|owner| owner != product.farmer_id) {
            debug!(product_id = id, "Product belongs to another farmer");
            return Err(ServiceError::not_found("Product", id));
        }
        Ok(product)
    }

    /// One farmer's products in a production-date range and category.
    pub async fn get_products_by_filter(
        &self,
        farmer_id: i32,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
        category: Option<&str>,
    ) -> Result<Vec<ProductDto>> {
        self.get_filtered_products(ProductFilter {
            farmer_id: Some(farmer_id),
            start_date,
            end_date,
            category: category.map(str::to_string),
            ..Default::default()
        })
        .await
    }

    #[instrument(skip(self))]
    pub async fn get_filtered_products(&self, filter: ProductFilter) -> Result<Vec<ProductDto>> {
        let records = product_repo::find_all(&self.db, filter.farmer_id).await?;
        let search = search_term(filter.search.as_deref());

        let products: Vec<ProductDto> = records
            .iter()
            .filter(|r| filter.matches(&r.product, search.as_deref()))
            .map(product_dto)
            .collect();

        debug!(count = products.len(), "Products matched filter");
        Ok(products)
    }

    #[instrument(skip(self, request), fields(name = %request.name))]
    pub async fn add_product(&self, farmer_id: i32, request: NewProduct) -> Result<ProductDto> {
        let name = required("Name", &request.name, 100)?;
        let category = required("Category", &request.category, 100)?;
        let description = optional("Description", request.description.as_deref(), 500)?;

        if !farmer_repo::exists(&self.db, farmer_id).await? {
            return Err(ServiceError::not_found("Farmer", farmer_id));
        }

        let product = product::ActiveModel {
            name: Set(name),
            category: Set(category),
            production_date: Set(request.production_date),
            description: Set(description),
            farmer_id: Set(farmer_id),
            created_at: Set(crate::now()),
            is_active: Set(true),
            ..Default::default()
        }
        .insert(&self.db)
        .await?;

        info!(product_id = product.id, farmer_id, "Product added");
        self.get_product_by_id(product.id).await
    }

    /// Replaces the editable fields. With an `owner`, only that farmer's
    /// products can be edited.
    #[instrument(skip(self, request))]
    pub async fn update_product(
        &self,
        id: i32,
        owner: Option<i32>,
        request: UpdateProduct,
    ) -> Result<ProductDto> {
        let name = required("Name", &request.name, 100)?;
        let category = required("Category", &request.category, 100)?;
        let description = optional("Description", request.description.as_deref(), 500)?;

        let product = self.owned_product(id, owner).await?;

        let mut active: product::ActiveModel = product.into();
        active.name = Set(name);
        active.category = Set(category);
        active.production_date = Set(request.production_date);
        active.description = Set(description);
        active.update(&self.db).await?;

        info!(product_id = id, "Product updated");
        self.get_product_by_id(id).await
    }

    pub async fn product_exists(&self, id: i32) -> Result<bool> {
        Ok(product_repo::exists(&self.db, id).await?)
    }

    /// Distinct categories currently in use, sorted.
    pub async fn get_all_categories(&self) -> Result<Vec<String>> {
        Ok(product_repo::distinct_categories(&self.db).await?)
    }

    /// A farmer's own product list plus the categories found in it.
    pub async fn get_farmer_products_view(
        &self,
        farmer_id: i32,
        filter: ProductFilter,
    ) -> Result<FarmerProductsView> {
        let products = self
            .get_filtered_products(ProductFilter {
                farmer_id: Some(farmer_id),
                ..filter
            })
            .await?;

        let categories = products
            .iter()
            .map(|p| p.category.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        Ok(FarmerProductsView {
            farmer_id,
            products,
            categories,
        })
    }

    /// Paginated listing for employees.
    #[instrument(skip(self))]
    pub async fn get_admin_products_view(
        &self,
        filter: ProductFilter,
        pagination: Pagination,
    ) -> Result<ProductPage> {
        let products = self.get_filtered_products(filter).await?;
        let categories = self.get_all_categories().await?;
        let total_products = products.len() as u64;

        Ok(ProductPage {
            products: pagination.apply(products),
            categories,
            total_products,
            total_pages: pagination.total_pages(total_products),
            current_page: pagination.page,
            page_size: pagination.page_size,
        })
    }

    pub async fn activate_product(&self, id: i32, owner: Option<i32>) -> Result<ProductDto> {
        self.set_active(id, owner, true).await
    }

    pub async fn deactivate_product(&self, id: i32, owner: Option<i32>) -> Result<ProductDto> {
        self.set_active(id, owner, false).await
    }

    async fn owned_product(&self, id: i32, owner: Option<i32>) -> Result<product::Model> {
        let product = product_repo::find_model_by_id(&self.db, id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Product", id))?;

        if owner.is_some_and(|owner| owner != product.farmer_id) {
            debug!(product_id = id, "Product belongs to another farmer");
            return Err(ServiceError::not_found("Product", id));
        }
        Ok(product)
    }

    #[instrument(skip(self))]
    async fn set_active(&self, id: i32, owner: Option<i32>, is_active: bool) -> Result<ProductDto> {
        let product = self.owned_product(id, owner).await?;

        if product.is_active != is_active {
            let mut active: product::ActiveModel = product.into();
            active.is_active = Set(is_active);
            active.update(&self.db).await?;
            info!(product_id = id, is_active, "Product status changed");
        }

        self.get_product_by_id(id).await
    }
}
