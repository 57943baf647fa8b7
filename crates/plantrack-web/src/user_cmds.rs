//! User management subcommands. Account lifecycle is deliberately CLI-only.

use anyhow::Result;
use sqlx::PgPool;

use plantrack_db::queries::users;

use crate::UserCommands;

pub async fn run_user_command(command: UserCommands, pool: &PgPool) -> Result<()> {
    match command {
        UserCommands::Add {
            username,
            superuser,
        } => {
            let user = users::insert_user(pool, &username, superuser).await?;
            let flag = if user.is_superuser { " (superuser)" } else { "" };
            println!("Created user {}{flag} with id {}", user.username, user.id);
        }
        UserCommands::List => {
            let all = users::list_users(pool).await?;
            if all.is_empty() {
                println!("No users.");
                return Ok(());
            }
            println!("{} user(s):", all.len());
            for user in all {
                let flag = if user.is_superuser { " [superuser]" } else { "" };
                println!("  {} {}{flag}", user.id, user.username);
            }
        }
    }
    Ok(())
}
