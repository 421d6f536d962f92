//! Product repository.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use super::entities::product::{self, images_to_json, ActiveModel, Entity as ProductEntity};
use crate::domain::{NewProduct, Product, ProductChanges};
use crate::errors::{AppError, AppResult};
use crate::types::PaginationParams;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// One page of products, newest first, optionally within one category.
    /// Returns the page and the total matching count.
    async fn list(
        &self,
        category_id: Option<Uuid>,
        page: PaginationParams,
    ) -> AppResult<(Vec<Product>, u64)>;

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Product>>;

    /// Products for the given ids; unknown ids are skipped.
    async fn find_by_ids(&self, ids: Vec<Uuid>) -> AppResult<Vec<Product>>;

    async fn create(&self, product: NewProduct) -> AppResult<Product>;

    async fn update(&self, id: Uuid, changes: ProductChanges) -> AppResult<Product>;

    async fn delete(&self, id: Uuid) -> AppResult<()>;

    async fn count_in_category(&self, category_id: Uuid) -> AppResult<u64>;

    async fn count(&self) -> AppResult<u64>;
}

pub struct ProductStore {
    db: DatabaseConnection,
}

impl ProductStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ProductRepository for ProductStore {
    async fn list(
        &self,
        category_id: Option<Uuid>,
        page: PaginationParams,
    ) -> AppResult<(Vec<Product>, u64)> {
        let mut query = ProductEntity::find().order_by_desc(product::Column::CreatedAt);
        if let Some(category_id) = category_id {
            query = query.filter(product::Column::CategoryId.eq(category_id));
        }

        let paginator = query.paginate(&self.db, page.limit());
        let total = paginator.num_items().await?;
        let models = paginator.fetch_page(page.page_index()).await?;

        Ok((models.into_iter().map(Product::from).collect(), total))
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Product>> {
        let result = ProductEntity::find_by_id(id).one(&self.db).await?;
        Ok(result.map(Product::from))
    }

    async fn find_by_ids(&self, ids: Vec<Uuid>) -> AppResult<Vec<Product>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let models = ProductEntity::find()
            .filter(product::Column::Id.is_in(ids))
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(Product::from).collect())
    }

    async fn create(&self, new_product: NewProduct) -> AppResult<Product> {
        let now = chrono::Utc::now();
        let active_model = ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(new_product.name),
            description: Set(new_product.description),
            price: Set(new_product.price),
            stock: Set(new_product.stock),
            images: Set(images_to_json(&new_product.images)),
            category_id: Set(new_product.category_id),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = active_model.insert(&self.db).await?;
        Ok(Product::from(model))
    }

    async fn update(&self, id: Uuid, changes: ProductChanges) -> AppResult<Product> {
        let existing = ProductEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)?;

        let mut active: ActiveModel = existing.into();
        if let Some(name) = changes.name {
            active.name = Set(name);
        }
        if let Some(description) = changes.description {
            active.description = Set(description);
        }
        if let Some(price) = changes.price {
            active.price = Set(price);
        }
        if let Some(stock) = changes.stock {
            active.stock = Set(stock);
        }
        if let Some(images) = changes.images {
            active.images = Set(images_to_json(&images));
        }
        if let Some(category_id) = changes.category_id {
            active.category_id = Set(category_id);
        }
        active.updated_at = Set(chrono::Utc::now());

        let model = active.update(&self.db).await?;
        Ok(Product::from(model))
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = ProductEntity::delete_by_id(id).exec(&self.db).await?;
        if result.rows_affected == 0 {
            return Err(AppError::NotFound);
        }
        Ok(())
    }

    async fn count_in_category(&self, category_id: Uuid) -> AppResult<u64> {
        Ok(ProductEntity::find()
            .filter(product::Column::CategoryId.eq(category_id))
            .count(&self.db)
            .await?)
    }

    async fn count(&self) -> AppResult<u64> {
        Ok(ProductEntity::find().count(&self.db).await?)
    }
}
