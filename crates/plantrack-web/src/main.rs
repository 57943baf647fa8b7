mod config;
mod error;
mod pages;
mod permissions;
mod routes;
mod session;
mod task_cmds;
mod user_cmds;
mod util;

#[cfg(test)]
mod test_util;

use clap::{Parser, Subcommand};

use plantrack_db::pool;

use config::PlantrackConfig;

#[derive(Parser)]
#[command(name = "plantrack", about = "Small plan/task tracking web application")]
struct Cli {
    /// Database URL (overrides PLANTRACK_DATABASE_URL env var)
    #[arg(long, global = true)]
    database_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a plantrack config file (no database required)
    Init {
        /// PostgreSQL connection URL
        #[arg(long, default_value = "postgresql://localhost:5432/plantrack")]
        db_url: String,
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },
    /// Initialize the plantrack database (requires config file or env vars)
    DbInit,
    /// Run the web application
    Serve {
        /// Address to bind
        #[arg(long, default_value = "127.0.0.1")]
        bind: String,
        /// Port to listen on
        #[arg(long, default_value_t = 8080)]
        port: u16,
    },
    /// User management (account lifecycle lives here, not on the web surface)
    User {
        #[command(subcommand)]
        command: UserCommands,
    },
    /// Task provisioning
    Task {
        #[command(subcommand)]
        command: TaskCommands,
    },
}

#[derive(Subcommand)]
pub enum UserCommands {
    /// Add a new user
    Add {
        /// Unique username
        username: String,
        /// Grant the superuser flag (bypasses ownership checks)
        #[arg(long)]
        superuser: bool,
    },
    /// List all users
    List,
}

#[derive(Subcommand)]
pub enum TaskCommands {
    /// Add a task to a plan
    Add {
        /// Plan ID the task belongs to
        plan_id: String,
        /// Task name
        name: String,
        /// Username of the task owner
        #[arg(long)]
        owner: String,
    },
    /// List tasks (optionally restricted to one plan)
    List {
        /// Plan ID to filter by
        #[arg(long)]
        plan: Option<String>,
    },
}

/// Execute the `plantrack init` command: write config file.
fn cmd_init(db_url: &str, force: bool) -> anyhow::Result<()> {
    let path = config::config_path();

    if path.exists() && !force {
        anyhow::bail!(
            "config file already exists at {}\nUse --force to overwrite.",
            path.display()
        );
    }

    let session_secret = config::generate_session_secret();

    let cfg = config::ConfigFile {
        database: config::DatabaseSection {
            url: db_url.to_string(),
        },
        auth: config::AuthSection {
            session_secret: session_secret.clone(),
        },
    };

    config::save_config(&cfg)?;

    println!("Config written to {}", path.display());
    println!("  database.url = {db_url}");
    println!(
        "  auth.session_secret = {}...{}",
        &session_secret[..8],
        &session_secret[56..]
    );
    println!();
    println!("Next: run `plantrack db-init` to create and migrate the database.");

    Ok(())
}

/// Execute the `plantrack db-init` command: create database and run migrations.
async fn cmd_db_init(cli_db_url: Option<&str>) -> anyhow::Result<()> {
    let resolved = PlantrackConfig::resolve(cli_db_url)?;

    println!("Initializing plantrack database...");

    pool::ensure_database_exists(&resolved.db_config).await?;

    let db_pool = pool::create_pool(&resolved.db_config).await?;

    pool::run_migrations(&db_pool).await?;

    let counts = pool::table_counts(&db_pool).await?;
    println!("Database ready. Tables:");
    for (table, count) in &counts {
        println!("  {table}: {count} rows");
    }

    db_pool.close().await;

    println!("plantrack db-init complete.");
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Init { db_url, force } => {
            cmd_init(&db_url, force)?;
        }
        Commands::DbInit => {
            cmd_db_init(cli.database_url.as_deref()).await?;
        }
        Commands::Serve { bind, port } => {
            let resolved = PlantrackConfig::resolve(cli.database_url.as_deref())?;
            let db_pool = pool::create_pool(&resolved.db_config).await?;
            routes::run_serve(db_pool, resolved.session_key, &bind, port).await?;
        }
        Commands::User { command } => {
            let resolved = PlantrackConfig::resolve(cli.database_url.as_deref())?;
            let db_pool = pool::create_pool(&resolved.db_config).await?;
            let result = user_cmds::run_user_command(command, &db_pool).await;
            db_pool.close().await;
            result?;
        }
        Commands::Task { command } => {
            let resolved = PlantrackConfig::resolve(cli.database_url.as_deref())?;
            let db_pool = pool::create_pool(&resolved.db_config).await?;
            let result = task_cmds::run_task_command(command, &db_pool).await;
            db_pool.close().await;
            result?;
        }
    }

    Ok(())
}
