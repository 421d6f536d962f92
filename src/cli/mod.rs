//! Command-line interface: `serve`, `migrate`, `promote` and `seed`.

pub mod args;

pub use args::{Cli, Commands};
