//! Domain layer: storefront entities and the rules that hold regardless of storage.
//!
//! Nothing in here touches the database or the payment processor.

pub mod cart;
pub mod category;
pub mod identity;
pub mod money;
pub mod order;
pub mod password;
pub mod product;
pub mod user;

pub use cart::{Cart, CartItem, CartLine};
pub use category::{slugify, Category, CategoryChanges, NewCategory};
pub use identity::Actor;
pub use order::{NewOrder, NewOrderItem, Order, OrderFilter, OrderItem, OrderStatus};
pub use password::Password;
pub use product::{NewProduct, Product, ProductChanges};
pub use user::{NewUser, User, UserResponse, UserRole};
