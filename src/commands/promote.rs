//! Promote command - grants the admin role to an existing account.

use std::sync::Arc;

use crate::cli::args::PromoteArgs;
use crate::config::Config;
use crate::errors::AppResult;
use crate::infra::{Database, Persistence};
use crate::services::{UserManager, UserService};

pub async fn execute(args: PromoteArgs, config: Config) -> AppResult<()> {
    let db = Database::connect_without_migrations(&config).await?;
    let users = UserManager::new(Arc::new(Persistence::new(db.get_connection())));

    let (user, changed) = users.promote(&args.email).await?;
    if changed {
        println!("{} is now an administrator", user.email);
    } else {
        println!("{} is already an administrator", user.email);
    }

    Ok(())
}
