//! Catalog: categories and products. Reads are public, writes need an admin.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::{
    slugify, Actor, Category, CategoryChanges, NewCategory, NewProduct, Product, ProductChanges,
};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;
use crate::types::{Paginated, PaginationParams};

#[derive(Debug, Clone)]
pub struct CategoryInput {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct CategoryUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
}

#[async_trait]
pub trait CatalogService: Send + Sync {
    async fn list_categories(&self) -> AppResult<Vec<Category>>;
    async fn get_category(&self, id: Uuid) -> AppResult<Category>;
    async fn create_category(&self, actor: &Actor, input: CategoryInput) -> AppResult<Category>;
    async fn update_category(
        &self,
        actor: &Actor,
        id: Uuid,
        input: CategoryUpdate,
    ) -> AppResult<Category>;
    /// Refused while products still reference the category.
    async fn delete_category(&self, actor: &Actor, id: Uuid) -> AppResult<()>;

    async fn list_products(
        &self,
        category_id: Option<Uuid>,
        page: PaginationParams,
    ) -> AppResult<Paginated<Product>>;
    async fn get_product(&self, id: Uuid) -> AppResult<Product>;
    async fn create_product(&self, actor: &Actor, product: NewProduct) -> AppResult<Product>;
    async fn update_product(
        &self,
        actor: &Actor,
        id: Uuid,
        changes: ProductChanges,
    ) -> AppResult<Product>;
    async fn delete_product(&self, actor: &Actor, id: Uuid) -> AppResult<()>;
}

pub struct CatalogManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> CatalogManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }

    async fn ensure_category_exists(&self, id: Uuid) -> AppResult<()> {
        match self.uow.categories().find_by_id(id).await? {
            Some(_) => Ok(()),
            None => Err(AppError::validation("Category does not exist")),
        }
    }
}

fn slug_for(name: &str) -> AppResult<String> {
    let slug = slugify(name);
    if slug.is_empty() {
        return Err(AppError::validation(
            "Category name must contain at least one letter or digit",
        ));
    }
    Ok(slug)
}

#[async_trait]
impl<U: UnitOfWork> CatalogService for CatalogManager<U> {
    async fn list_categories(&self) -> AppResult<Vec<Category>> {
        self.uow.categories().list().await
    }

    async fn get_category(&self, id: Uuid) -> AppResult<Category> {
        self.uow.categories().find_by_id(id).await?.ok_or_not_found()
    }

    async fn create_category(&self, actor: &Actor, input: CategoryInput) -> AppResult<Category> {
        actor.require_admin()?;
        let name = input.name.trim().to_string();
        let slug = slug_for(&name)?;

        let category = self
            .uow
            .categories()
            .create(NewCategory {
                name,
                slug,
                description: input.description,
            })
            .await?;

        tracing::info!(category_id = %category.id, slug = %category.slug, "Category created");
        Ok(category)
    }

    async fn update_category(
        &self,
        actor: &Actor,
        id: Uuid,
        input: CategoryUpdate,
    ) -> AppResult<Category> {
        actor.require_admin()?;

        let mut changes = CategoryChanges {
            description: input.description.map(Some),
            ..Default::default()
        };
        if let Some(name) = input.name {
            let name = name.trim().to_string();
            changes.slug = Some(slug_for(&name)?);
            changes.name = Some(name);
        }

        self.uow.categories().update(id, changes).await
    }

    async fn delete_category(&self, actor: &Actor, id: Uuid) -> AppResult<()> {
        actor.require_admin()?;

        let in_use = self.uow.products().count_in_category(id).await?;
        if in_use > 0 {
            return Err(AppError::validation(format!(
                "Category still has {} product(s)",
                in_use
            )));
        }

        self.uow.categories().delete(id).await?;
        tracing::info!(category_id = %id, "Category deleted");
        Ok(())
    }

    async fn list_products(
        &self,
        category_id: Option<Uuid>,
        page: PaginationParams,
    ) -> AppResult<Paginated<Product>> {
        let (products, total) = self.uow.products().list(category_id, page).await?;
        Ok(Paginated::new(products, page, total))
    }

    async fn get_product(&self, id: Uuid) -> AppResult<Product> {
        self.uow.products().find_by_id(id).await?.ok_or_not_found()
    }

    async fn create_product(&self, actor: &Actor, product: NewProduct) -> AppResult<Product> {
        actor.require_admin()?;
        product.validate()?;
        self.ensure_category_exists(product.category_id).await?;

        let product = self.uow.products().create(product).await?;
        tracing::info!(product_id = %product.id, "Product created");
        Ok(product)
    }

    async fn update_product(
        &self,
        actor: &Actor,
        id: Uuid,
        changes: ProductChanges,
    ) -> AppResult<Product> {
        actor.require_admin()?;
        changes.validate()?;
        if let Some(category_id) = changes.category_id {
            self.ensure_category_exists(category_id).await?;
        }

        self.uow.products().update(id, changes).await
    }

    async fn delete_product(&self, actor: &Actor, id: Uuid) -> AppResult<()> {
        actor.require_admin()?;
        self.uow.products().delete(id).await?;
        tracing::info!(product_id = %id, "Product deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::UserRole;
    use crate::infra::{MockCategoryRepository, MockProductRepository, RepositorySet};
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn admin() -> Actor {
        Actor::new(Uuid::new_v4(), "admin@example.com", UserRole::Admin)
    }

    fn manager(
        categories: MockCategoryRepository,
        products: MockProductRepository,
    ) -> CatalogManager<RepositorySet> {
        CatalogManager::new(Arc::new(RepositorySet {
            categories: Arc::new(categories),
            products: Arc::new(products),
            ..Default::default()
        }))
    }

    #[tokio::test]
    async fn test_create_category_derives_slug() {
        let mut categories = MockCategoryRepository::new();
        categories
            .expect_create()
            .withf(|c| c.slug == "home-garden" && c.name == "Home & Garden")
            .returning(|c| {
                Ok(Category {
                    id: Uuid::new_v4(),
                    name: c.name,
                    slug: c.slug,
                    description: c.description,
                    created_at: Utc::now(),
                    updated_at: Utc::now(),
                })
            });

        let category = manager(categories, MockProductRepository::new())
            .create_category(
                &admin(),
                CategoryInput {
                    name: " Home & Garden ".into(),
                    description: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(category.slug, "home-garden");
    }

    #[tokio::test]
    async fn test_unsluggable_name_rejected() {
        let result = manager(MockCategoryRepository::new(), MockProductRepository::new())
            .create_category(
                &admin(),
                CategoryInput {
                    name: "!!!".into(),
                    description: None,
                },
            )
            .await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_category_with_products_cannot_be_deleted() {
        let mut products = MockProductRepository::new();
        products.expect_count_in_category().returning(|_| Ok(3));
        let mut categories = MockCategoryRepository::new();
        categories.expect_delete().never();

        let result = manager(categories, products)
            .delete_category(&admin(), Uuid::new_v4())
            .await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_product_requires_existing_category() {
        let mut categories = MockCategoryRepository::new();
        categories.expect_find_by_id().returning(|_| Ok(None));
        let mut products = MockProductRepository::new();
        products.expect_create().never();

        let result = manager(categories, products)
            .create_product(
                &admin(),
                NewProduct {
                    name: "Lamp".into(),
                    description: String::new(),
                    price: dec!(10.00),
                    stock: 1,
                    images: vec![],
                    category_id: Uuid::new_v4(),
                },
            )
            .await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_catalog_writes_need_admin() {
        let customer = Actor::new(Uuid::new_v4(), "c@example.com", UserRole::Customer);
        let service = manager(MockCategoryRepository::new(), MockProductRepository::new());

        assert!(matches!(
            service.delete_product(&customer, Uuid::new_v4()).await,
            Err(AppError::Forbidden)
        ));
        assert!(matches!(
            service
                .update_product(&customer, Uuid::new_v4(), ProductChanges::default())
                .await,
            Err(AppError::Forbidden)
        ));
    }
}
