//! SeaORM entity definitions
//!
//! Database-shaped rows, kept apart from the domain models they convert into.

pub mod cart_item;
pub mod category;
pub mod order;
pub mod order_item;
pub mod product;
pub mod user;
