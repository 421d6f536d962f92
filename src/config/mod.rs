//! Application configuration module
//!
//! Environment-driven settings (database, JWT, payment processor) and
//! the constants shared across layers.

mod constants;
mod settings;

pub use constants::*;
pub use settings::Config;
