//! Shared request and response types for the HTTP surface.

mod pagination;
mod response;

pub use pagination::{Paginated, PaginatedOrders, PaginatedProducts, PaginationMeta, PaginationParams};
pub use response::{Created, NoContent, WebhookAck};
