//! In-memory stand-ins for PostgreSQL and the payment processor, plus an
//! HTTP harness over the real router.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use storefront::api::{create_router, AppState};
use storefront::config::{
    Config, EVENT_ASYNC_PAYMENT_FAILED, EVENT_ASYNC_PAYMENT_SUCCEEDED, EVENT_CHECKOUT_COMPLETED,
    STRIPE_SIGNATURE_HEADER,
};
use storefront::domain::money::to_minor_units;
use storefront::domain::{
    Actor, CartItem, CartLine, Category, CategoryChanges, NewCategory, NewOrder, NewProduct,
    NewUser, Order, OrderFilter, OrderItem, OrderStatus, Password, Product, ProductChanges, User,
    UserRole,
};
use storefront::errors::{AppError, AppResult};
use storefront::infra::{
    CartRepository, CategoryRepository, CheckoutSessionRequest, CompletedCheckout,
    HostedCheckout, OrderRepository, PaymentEvent, PaymentGateway, ProductRepository,
    PurchasedItem, RepositorySet, UserRepository,
};
use storefront::services::{ServiceContainer, Services, ShippingDetails, WebhookOutcome};
use storefront::types::PaginationParams;

pub const JWT_SECRET: &str = "integration-test-secret-at-least-32-chars";
pub const PASSWORD: &str = "correct-horse-battery";

// =============================================================================
// Repositories
// =============================================================================

/// Every table in one lock-protected struct; rows are kept in insertion order.
#[derive(Default)]
pub struct MemoryDb {
    users: Mutex<Vec<User>>,
    categories: Mutex<Vec<Category>>,
    products: Mutex<Vec<Product>>,
    cart_items: Mutex<Vec<CartItem>>,
    orders: Mutex<Vec<Order>>,
    /// Next order insert fails like a dropped connection would
    pub fail_next_order_insert: AtomicBool,
    /// Next post-checkout cart clear fails
    pub fail_next_cart_clear: AtomicBool,
}

impl MemoryDb {
    pub fn repositories(self: &Arc<Self>) -> RepositorySet {
        RepositorySet {
            users: self.clone(),
            categories: self.clone(),
            products: self.clone(),
            carts: self.clone(),
            orders: self.clone(),
        }
    }

    pub fn order_count(&self) -> usize {
        self.orders.lock().unwrap().len()
    }

    pub fn all_orders(&self) -> Vec<Order> {
        self.orders.lock().unwrap().clone()
    }

    pub fn cart_size(&self, user_id: Uuid) -> usize {
        self.cart_items
            .lock()
            .unwrap()
            .iter()
            .filter(|i| i.user_id == user_id)
            .count()
    }

    pub fn set_price(&self, product_id: Uuid, price: Decimal) {
        let mut products = self.products.lock().unwrap();
        if let Some(p) = products.iter_mut().find(|p| p.id == product_id) {
            p.price = price;
        }
    }

    pub fn remove_product(&self, product_id: Uuid) {
        self.products.lock().unwrap().retain(|p| p.id != product_id);
    }
}

fn page_of<T: Clone>(rows: Vec<T>, page: PaginationParams) -> (Vec<T>, u64) {
    let total = rows.len() as u64;
    let data = rows
        .into_iter()
        .skip(page.offset() as usize)
        .take(page.limit() as usize)
        .collect();
    (data, total)
}

#[async_trait]
impl UserRepository for MemoryDb {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        Ok(self.users.lock().unwrap().iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let email = email.trim().to_lowercase();
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn create(&self, new_user: NewUser) -> AppResult<User> {
        let mut users = self.users.lock().unwrap();
        let email = new_user.email.trim().to_lowercase();
        if users.iter().any(|u| u.email == email) {
            return Err(AppError::conflict("User"));
        }
        let user = User {
            role: new_user.role,
            ..User::new(Uuid::new_v4(), email, new_user.password_hash, new_user.name)
        };
        users.push(user.clone());
        Ok(user)
    }

    async fn update_role(&self, id: Uuid, role: UserRole) -> AppResult<User> {
        let mut users = self.users.lock().unwrap();
        let user = users.iter_mut().find(|u| u.id == id).ok_or(AppError::NotFound)?;
        user.role = role;
        user.updated_at = Utc::now();
        Ok(user.clone())
    }

    async fn list(&self) -> AppResult<Vec<User>> {
        Ok(self.users.lock().unwrap().iter().rev().cloned().collect())
    }

    async fn count(&self) -> AppResult<u64> {
        Ok(self.users.lock().unwrap().len() as u64)
    }
}

#[async_trait]
impl CategoryRepository for MemoryDb {
    async fn list(&self) -> AppResult<Vec<Category>> {
        let mut categories = self.categories.lock().unwrap().clone();
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(categories)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Category>> {
        Ok(self
            .categories
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.id == id)
            .cloned())
    }

    async fn find_by_slug(&self, slug: &str) -> AppResult<Option<Category>> {
        Ok(self
            .categories
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.slug == slug)
            .cloned())
    }

    async fn create(&self, new_category: NewCategory) -> AppResult<Category> {
        let mut categories = self.categories.lock().unwrap();
        if categories.iter().any(|c| c.slug == new_category.slug) {
            return Err(AppError::conflict("Category"));
        }
        let now = Utc::now();
        let category = Category {
            id: Uuid::new_v4(),
            name: new_category.name,
            slug: new_category.slug,
            description: new_category.description,
            created_at: now,
            updated_at: now,
        };
        categories.push(category.clone());
        Ok(category)
    }

    async fn update(&self, id: Uuid, changes: CategoryChanges) -> AppResult<Category> {
        let mut categories = self.categories.lock().unwrap();
        if let Some(slug) = &changes.slug {
            if categories.iter().any(|c| c.id != id && &c.slug == slug) {
                return Err(AppError::conflict("Category"));
            }
        }
        let category = categories
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(AppError::NotFound)?;
        if let Some(name) = changes.name {
            category.name = name;
        }
        if let Some(slug) = changes.slug {
            category.slug = slug;
        }
        if let Some(description) = changes.description {
            category.description = description;
        }
        category.updated_at = Utc::now();
        Ok(category.clone())
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let mut categories = self.categories.lock().unwrap();
        let before = categories.len();
        categories.retain(|c| c.id != id);
        if categories.len() == before {
            return Err(AppError::NotFound);
        }
        Ok(())
    }
}

#[async_trait]
impl ProductRepository for MemoryDb {
    async fn list(
        &self,
        category_id: Option<Uuid>,
        page: PaginationParams,
    ) -> AppResult<(Vec<Product>, u64)> {
        let rows: Vec<Product> = self
            .products
            .lock()
            .unwrap()
            .iter()
            .rev()
            .filter(|p| category_id.map_or(true, |c| p.category_id == c))
            .cloned()
            .collect();
        Ok(page_of(rows, page))
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Product>> {
        Ok(self
            .products
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.id == id)
            .cloned())
    }

    async fn find_by_ids(&self, ids: Vec<Uuid>) -> AppResult<Vec<Product>> {
        Ok(self
            .products
            .lock()
            .unwrap()
            .iter()
            .filter(|p| ids.contains(&p.id))
            .cloned()
            .collect())
    }

    async fn create(&self, new_product: NewProduct) -> AppResult<Product> {
        let now = Utc::now();
        let product = Product {
            id: Uuid::new_v4(),
            name: new_product.name,
            description: new_product.description,
            price: new_product.price,
            stock: new_product.stock,
            images: new_product.images,
            category_id: new_product.category_id,
            created_at: now,
            updated_at: now,
        };
        self.products.lock().unwrap().push(product.clone());
        Ok(product)
    }

    async fn update(&self, id: Uuid, changes: ProductChanges) -> AppResult<Product> {
        let mut products = self.products.lock().unwrap();
        let product = products
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(AppError::NotFound)?;
        if let Some(name) = changes.name {
            product.name = name;
        }
        if let Some(description) = changes.description {
            product.description = description;
        }
        if let Some(price) = changes.price {
            product.price = price;
        }
        if let Some(stock) = changes.stock {
            product.stock = stock;
        }
        if let Some(images) = changes.images {
            product.images = images;
        }
        if let Some(category_id) = changes.category_id {
            product.category_id = category_id;
        }
        product.updated_at = Utc::now();
        Ok(product.clone())
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let mut products = self.products.lock().unwrap();
        let before = products.len();
        products.retain(|p| p.id != id);
        if products.len() == before {
            return Err(AppError::NotFound);
        }
        self.cart_items.lock().unwrap().retain(|i| i.product_id != id);
        Ok(())
    }

    async fn count_in_category(&self, category_id: Uuid) -> AppResult<u64> {
        Ok(self
            .products
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.category_id == category_id)
            .count() as u64)
    }

    async fn count(&self) -> AppResult<u64> {
        Ok(self.products.lock().unwrap().len() as u64)
    }
}

#[async_trait]
impl CartRepository for MemoryDb {
    async fn lines(&self, user_id: Uuid) -> AppResult<Vec<CartLine>> {
        let products = self.products.lock().unwrap();
        Ok(self
            .cart_items
            .lock()
            .unwrap()
            .iter()
            .filter(|i| i.user_id == user_id)
            .filter_map(|i| {
                products
                    .iter()
                    .find(|p| p.id == i.product_id)
                    .map(|p| CartLine {
                        id: i.id,
                        quantity: i.quantity,
                        product: p.clone(),
                    })
            })
            .collect())
    }

    async fn add(&self, user_id: Uuid, product_id: Uuid, quantity: i32) -> AppResult<CartItem> {
        let mut items = self.cart_items.lock().unwrap();
        let now = Utc::now();
        if let Some(item) = items
            .iter_mut()
            .find(|i| i.user_id == user_id && i.product_id == product_id)
        {
            item.quantity += quantity;
            item.updated_at = now;
            return Ok(item.clone());
        }
        let item = CartItem {
            id: Uuid::new_v4(),
            user_id,
            product_id,
            quantity,
            created_at: now,
            updated_at: now,
        };
        items.push(item.clone());
        Ok(item)
    }

    async fn set_quantity(
        &self,
        user_id: Uuid,
        item_id: Uuid,
        quantity: i32,
    ) -> AppResult<Option<CartItem>> {
        if quantity <= 0 {
            self.remove(user_id, item_id).await?;
            return Ok(None);
        }
        let mut items = self.cart_items.lock().unwrap();
        let item = items
            .iter_mut()
            .find(|i| i.id == item_id && i.user_id == user_id)
            .ok_or(AppError::NotFound)?;
        item.quantity = quantity;
        item.updated_at = Utc::now();
        Ok(Some(item.clone()))
    }

    async fn remove(&self, user_id: Uuid, item_id: Uuid) -> AppResult<()> {
        let mut items = self.cart_items.lock().unwrap();
        let before = items.len();
        items.retain(|i| !(i.id == item_id && i.user_id == user_id));
        if items.len() == before {
            return Err(AppError::NotFound);
        }
        Ok(())
    }

    async fn clear(&self, user_id: Uuid) -> AppResult<u64> {
        let mut items = self.cart_items.lock().unwrap();
        let before = items.len();
        items.retain(|i| i.user_id != user_id);
        Ok((before - items.len()) as u64)
    }

    async fn clear_added_before(&self, user_id: Uuid, cutoff: DateTime<Utc>) -> AppResult<u64> {
        if self.fail_next_cart_clear.swap(false, Ordering::SeqCst) {
            return Err(AppError::Database(sea_orm::DbErr::Custom(
                "connection reset".to_string(),
            )));
        }
        let mut items = self.cart_items.lock().unwrap();
        let before = items.len();
        items.retain(|i| !(i.user_id == user_id && i.created_at <= cutoff));
        Ok((before - items.len()) as u64)
    }
}

#[async_trait]
impl OrderRepository for MemoryDb {
    async fn create_with_items(&self, new_order: NewOrder) -> AppResult<Order> {
        if self.fail_next_order_insert.swap(false, Ordering::SeqCst) {
            return Err(AppError::Database(sea_orm::DbErr::Custom(
                "connection reset".to_string(),
            )));
        }

        let mut orders = self.orders.lock().unwrap();
        if new_order.payment_reference.is_some()
            && orders
                .iter()
                .any(|o| o.payment_reference == new_order.payment_reference)
        {
            return Err(AppError::conflict("Order"));
        }

        let now = Utc::now();
        let id = Uuid::new_v4();
        let items = new_order
            .items
            .into_iter()
            .map(|item| OrderItem {
                id: Uuid::new_v4(),
                order_id: id,
                product_id: item.product_id,
                name: item.name,
                quantity: item.quantity,
                price: item.price,
                created_at: now,
            })
            .collect();
        let order = Order {
            id,
            user_id: new_order.user_id,
            status: new_order.status,
            total: new_order.total,
            shipping_name: new_order.shipping_name,
            shipping_email: new_order.shipping_email,
            shipping_address: new_order.shipping_address,
            payment_reference: new_order.payment_reference,
            payment_intent_id: new_order.payment_intent_id,
            requires_review: new_order.requires_review,
            review_note: new_order.review_note,
            items,
            created_at: now,
            updated_at: now,
        };
        orders.push(order.clone());
        Ok(order)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Order>> {
        Ok(self.orders.lock().unwrap().iter().find(|o| o.id == id).cloned())
    }

    async fn find_by_payment_reference(&self, reference: &str) -> AppResult<Option<Order>> {
        Ok(self
            .orders
            .lock()
            .unwrap()
            .iter()
            .find(|o| o.payment_reference.as_deref() == Some(reference))
            .cloned())
    }

    async fn list(
        &self,
        filter: OrderFilter,
        page: PaginationParams,
    ) -> AppResult<(Vec<Order>, u64)> {
        let rows: Vec<Order> = self
            .orders
            .lock()
            .unwrap()
            .iter()
            .rev()
            .filter(|o| filter.status.map_or(true, |s| o.status == s))
            .filter(|o| filter.user_id.map_or(true, |u| o.user_id == u))
            .cloned()
            .collect();
        Ok(page_of(rows, page))
    }

    async fn update_status(&self, id: Uuid, status: OrderStatus) -> AppResult<Order> {
        let mut orders = self.orders.lock().unwrap();
        let order = orders
            .iter_mut()
            .find(|o| o.id == id)
            .ok_or(AppError::NotFound)?;
        order.status = status;
        order.updated_at = Utc::now();
        Ok(order.clone())
    }

    async fn count(&self) -> AppResult<u64> {
        Ok(self.orders.lock().unwrap().len() as u64)
    }

    async fn revenue(&self) -> AppResult<Decimal> {
        Ok(self
            .orders
            .lock()
            .unwrap()
            .iter()
            .filter(|o| o.status != OrderStatus::Cancelled)
            .map(|o| o.total)
            .sum())
    }

    async fn recent(&self, limit: u64) -> AppResult<Vec<Order>> {
        Ok(self
            .orders
            .lock()
            .unwrap()
            .iter()
            .rev()
            .take(limit as usize)
            .cloned()
            .collect())
    }
}

// =============================================================================
// Payment processor
// =============================================================================

/// Records sessions and "completes" each one exactly as it was requested.
#[derive(Default)]
pub struct FakeGateway {
    created: Mutex<Vec<CheckoutSessionRequest>>,
    sessions: Mutex<HashMap<String, CompletedCheckout>>,
    next_id: AtomicUsize,
}

impl FakeGateway {
    pub const SIGNATURE: &'static str = "t=1700000000,v1=valid";

    pub fn requests(&self) -> Vec<CheckoutSessionRequest> {
        self.created.lock().unwrap().clone()
    }

    /// Change what the processor will report for a session.
    pub fn edit_session(&self, session_id: &str, edit: impl FnOnce(&mut CompletedCheckout)) {
        if let Some(session) = self.sessions.lock().unwrap().get_mut(session_id) {
            edit(session);
        }
    }

    pub fn completed_event(session_id: &str) -> String {
        Self::session_event(EVENT_CHECKOUT_COMPLETED, session_id)
    }

    pub fn session_event(event_type: &str, session_id: &str) -> String {
        serde_json::json!({
            "type": event_type,
            "data": { "object": { "id": session_id } }
        })
        .to_string()
    }

    pub fn other_event(event_type: &str) -> String {
        serde_json::json!({ "type": event_type, "data": { "object": {} } }).to_string()
    }
}

#[async_trait]
impl PaymentGateway for FakeGateway {
    async fn create_checkout_session(
        &self,
        request: CheckoutSessionRequest,
    ) -> AppResult<HostedCheckout> {
        let session_id = format!("cs_test_{}", self.next_id.fetch_add(1, Ordering::SeqCst));
        let line_items: Vec<PurchasedItem> = request
            .line_items
            .iter()
            .map(|item| PurchasedItem {
                product_id: Some(item.product_id),
                description: item.name.clone(),
                quantity: item.quantity,
                unit_amount: item.unit_amount,
                line_total: item.unit_amount * item.quantity as i64,
            })
            .collect();
        let amount_total = line_items
            .iter()
            .map(|item| item.unit_amount * item.quantity as i64)
            .sum();

        self.sessions.lock().unwrap().insert(
            session_id.clone(),
            CompletedCheckout {
                session_id: session_id.clone(),
                payment_intent_id: Some(format!("pi_{}", session_id)),
                amount_total: Some(amount_total),
                paid: true,
                metadata: request.metadata.clone(),
                line_items,
            },
        );
        self.created.lock().unwrap().push(request);

        Ok(HostedCheckout {
            url: format!("https://checkout.example.com/pay/{}", session_id),
            session_id,
        })
    }

    fn verify_event(&self, payload: &str, signature: &str) -> AppResult<PaymentEvent> {
        if signature != Self::SIGNATURE {
            return Err(AppError::WebhookSignature("signature mismatch".to_string()));
        }
        let event: Value = serde_json::from_str(payload)
            .map_err(|e| AppError::WebhookSignature(e.to_string()))?;
        let event_type = event["type"].as_str().unwrap_or_default().to_string();
        let session_id = event["data"]["object"]["id"]
            .as_str()
            .unwrap_or_default()
            .to_string();
        Ok(match event_type.as_str() {
            EVENT_CHECKOUT_COMPLETED => PaymentEvent::CheckoutCompleted { session_id },
            EVENT_ASYNC_PAYMENT_SUCCEEDED => PaymentEvent::AsyncPaymentSucceeded { session_id },
            EVENT_ASYNC_PAYMENT_FAILED => PaymentEvent::AsyncPaymentFailed { session_id },
            _ => PaymentEvent::Other { event_type },
        })
    }

    async fn fetch_completed_checkout(&self, session_id: &str) -> AppResult<CompletedCheckout> {
        self.sessions
            .lock()
            .unwrap()
            .get(session_id)
            .cloned()
            .ok_or_else(|| AppError::payment_provider(format!("No such session: {}", session_id)))
    }
}

// =============================================================================
// Harness
// =============================================================================

pub struct TestApp {
    pub db: Arc<MemoryDb>,
    pub gateway: Arc<FakeGateway>,
    pub services: Arc<Services>,
    pub router: Router,
}

impl TestApp {
    pub fn new() -> Self {
        let db = Arc::new(MemoryDb::default());
        let gateway = Arc::new(FakeGateway::default());
        let config = Config::with_secrets(JWT_SECRET, "sk_test_unused", "whsec_unused");
        let services = Arc::new(Services::new(
            Arc::new(db.repositories()),
            gateway.clone(),
            config,
        ));
        let router = create_router(AppState::new(services.clone()));
        Self {
            db,
            gateway,
            services,
            router,
        }
    }

    async fn account(&self, email: &str, role: UserRole) -> (Actor, String) {
        let hash = Password::new(PASSWORD).unwrap().into_string();
        let user = UserRepository::create(
            self.db.as_ref(),
            NewUser {
                email: email.to_string(),
                password_hash: Some(hash),
                name: Some("Test User".to_string()),
                role,
            },
        )
        .await
        .unwrap();
        let token = self
            .services
            .auth()
            .login(email.to_string(), PASSWORD.to_string())
            .await
            .unwrap();
        (Actor::new(user.id, user.email, user.role), token.access_token)
    }

    pub async fn customer(&self, email: &str) -> (Actor, String) {
        self.account(email, UserRole::Customer).await
    }

    pub async fn admin(&self, email: &str) -> (Actor, String) {
        self.account(email, UserRole::Admin).await
    }

    /// A product in a throwaway category
    pub async fn product(&self, name: &str, price: Decimal) -> Product {
        let category = CategoryRepository::create(
            self.db.as_ref(),
            NewCategory {
                name: format!("{} category", name),
                slug: format!("{}-{}", name.to_lowercase().replace(' ', "-"), Uuid::new_v4()),
                description: None,
            },
        )
        .await
        .unwrap();
        ProductRepository::create(
            self.db.as_ref(),
            NewProduct {
                name: name.to_string(),
                description: String::new(),
                price,
                stock: 10,
                images: vec![],
                category_id: category.id,
            },
        )
        .await
        .unwrap()
    }

    /// Buy one unit of a product and run the webhook, returning the order id.
    pub async fn place_order(&self, buyer: &Actor, product_id: Uuid) -> Uuid {
        self.services
            .carts()
            .add_item(buyer, product_id, 1)
            .await
            .unwrap();
        let shipping = ShippingDetails {
            name: "Test User".to_string(),
            email: buyer.email.clone(),
            address: "1 Test Street".to_string(),
        };
        let session = self
            .services
            .checkout()
            .create_session(buyer, shipping)
            .await
            .unwrap();
        let outcome = self
            .services
            .payments()
            .handle_webhook(
                &FakeGateway::completed_event(&session.session_id),
                FakeGateway::SIGNATURE,
            )
            .await
            .unwrap();
        match outcome {
            WebhookOutcome::Settled { order_id, .. } => order_id,
            other => panic!("expected a settled order, got {:?}", other),
        }
    }

    pub async fn request(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        self.send(request).await
    }

    /// Deliver a raw webhook body with the given signature header.
    pub async fn webhook(&self, payload: String, signature: Option<&str>) -> (StatusCode, Value) {
        let mut builder = Request::builder()
            .method("POST")
            .uri("/webhooks/stripe")
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(signature) = signature {
            builder = builder.header(STRIPE_SIGNATURE_HEADER, signature);
        }
        self.send(builder.body(Body::from(payload)).unwrap()).await
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, body)
    }
}

/// Minor units the checkout should have sent for a product
pub fn cents(price: Decimal) -> i64 {
    to_minor_units(price).unwrap()
}
