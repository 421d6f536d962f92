//! CLI argument definitions.

use clap::{Parser, Subcommand};

use crate::config::{DEFAULT_SERVER_HOST, DEFAULT_SERVER_PORT};

/// Storefront API server and operator tooling
#[derive(Parser, Debug)]
#[command(name = "storefront")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP server (runs pending migrations first)
    Serve(ServeArgs),

    /// Run database migrations
    Migrate(MigrateArgs),

    /// Make an existing user an administrator
    Promote(PromoteArgs),

    /// Create an admin account and a demo catalog if they are missing
    Seed(SeedArgs),
}

#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Host to bind to
    #[arg(short = 'H', long, default_value = DEFAULT_SERVER_HOST, env = "SERVER_HOST")]
    pub host: String,

    /// Port to listen on
    #[arg(short, long, default_value_t = DEFAULT_SERVER_PORT, env = "SERVER_PORT")]
    pub port: u16,
}

#[derive(Parser, Debug)]
pub struct MigrateArgs {
    #[command(subcommand)]
    pub action: MigrateAction,
}

#[derive(Subcommand, Debug)]
pub enum MigrateAction {
    /// Run pending migrations
    Up,
    /// Rollback last migration
    Down,
    /// Show migration status
    Status,
    /// Drop everything and re-run all migrations
    Fresh,
}

#[derive(Parser, Debug)]
pub struct PromoteArgs {
    /// Email of the account to promote
    pub email: String,
}

#[derive(Parser, Debug)]
pub struct SeedArgs {
    #[arg(long, default_value = "admin@example.com", env = "SEED_ADMIN_EMAIL")]
    pub admin_email: String,

    #[arg(long, default_value = "admin12345", env = "SEED_ADMIN_PASSWORD", hide_env_values = true)]
    pub admin_password: String,
}
