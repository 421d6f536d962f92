//! Unit of Work: the single access point to every repository.
//!
//! Services depend on `UnitOfWork` rather than on individual stores, so the
//! whole persistence layer can be swapped for fakes in tests. Multi-row
//! writes that must be atomic (order + items) run their own transaction
//! inside the owning repository.

use std::sync::Arc;

use sea_orm::DatabaseConnection;

use super::repositories::{
    CartRepository, CartStore, CategoryRepository, CategoryStore, OrderRepository, OrderStore,
    ProductRepository, ProductStore, UserRepository, UserStore,
};

pub trait UnitOfWork: Send + Sync {
    fn users(&self) -> Arc<dyn UserRepository>;
    fn categories(&self) -> Arc<dyn CategoryRepository>;
    fn products(&self) -> Arc<dyn ProductRepository>;
    fn carts(&self) -> Arc<dyn CartRepository>;
    fn orders(&self) -> Arc<dyn OrderRepository>;
}

/// SeaORM-backed unit of work
pub struct Persistence {
    users: Arc<UserStore>,
    categories: Arc<CategoryStore>,
    products: Arc<ProductStore>,
    carts: Arc<CartStore>,
    orders: Arc<OrderStore>,
}

impl Persistence {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            users: Arc::new(UserStore::new(db.clone())),
            categories: Arc::new(CategoryStore::new(db.clone())),
            products: Arc::new(ProductStore::new(db.clone())),
            carts: Arc::new(CartStore::new(db.clone())),
            orders: Arc::new(OrderStore::new(db)),
        }
    }
}

impl UnitOfWork for Persistence {
    fn users(&self) -> Arc<dyn UserRepository> {
        self.users.clone()
    }

    fn categories(&self) -> Arc<dyn CategoryRepository> {
        self.categories.clone()
    }

    fn products(&self) -> Arc<dyn ProductRepository> {
        self.products.clone()
    }

    fn carts(&self) -> Arc<dyn CartRepository> {
        self.carts.clone()
    }

    fn orders(&self) -> Arc<dyn OrderRepository> {
        self.orders.clone()
    }
}

/// Unit of work over arbitrary repository implementations (mocks, fakes).
#[derive(Clone)]
pub struct RepositorySet {
    pub users: Arc<dyn UserRepository>,
    pub categories: Arc<dyn CategoryRepository>,
    pub products: Arc<dyn ProductRepository>,
    pub carts: Arc<dyn CartRepository>,
    pub orders: Arc<dyn OrderRepository>,
}

impl UnitOfWork for RepositorySet {
    fn users(&self) -> Arc<dyn UserRepository> {
        self.users.clone()
    }

    fn categories(&self) -> Arc<dyn CategoryRepository> {
        self.categories.clone()
    }

    fn products(&self) -> Arc<dyn ProductRepository> {
        self.products.clone()
    }

    fn carts(&self) -> Arc<dyn CartRepository> {
        self.carts.clone()
    }

    fn orders(&self) -> Arc<dyn OrderRepository> {
        self.orders.clone()
    }
}

#[cfg(any(test, feature = "test-utils"))]
impl Default for RepositorySet {
    /// Every repository is a mock with no expectations; any call panics.
    fn default() -> Self {
        use super::repositories::{
            MockCartRepository, MockCategoryRepository, MockOrderRepository,
            MockProductRepository, MockUserRepository,
        };

        Self {
            users: Arc::new(MockUserRepository::new()),
            categories: Arc::new(MockCategoryRepository::new()),
            products: Arc::new(MockProductRepository::new()),
            carts: Arc::new(MockCartRepository::new()),
            orders: Arc::new(MockOrderRepository::new()),
        }
    }
}
