mod config;
mod list_cmd;
mod recipe_cmds;
mod serve_cmd;

use clap::{Parser, Subcommand};

use forked_core::store::PgStore;
use forked_db::pool;

use config::ForkedConfig;

#[derive(Parser)]
#[command(name = "forked", about = "Recipe sharing API and shopping-list generator")]
struct Cli {
    /// Database URL (overrides FORKED_DATABASE_URL env var)
    #[arg(long, global = true)]
    database_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a forked config file (no database required)
    Init {
        /// PostgreSQL connection URL
        #[arg(long, default_value = "postgresql://localhost:5432/forked")]
        db_url: String,
        /// Address the HTTP server binds to
        #[arg(long, default_value = config::ServerSection::DEFAULT_BIND)]
        bind: String,
        /// Port the HTTP server listens on
        #[arg(long, default_value_t = config::ServerSection::DEFAULT_PORT)]
        port: u16,
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },
    /// Create the database if needed and apply migrations
    DbInit,
    /// Run the HTTP API
    Serve {
        /// Override the configured bind address
        #[arg(long)]
        bind: Option<String>,
        /// Override the configured port
        #[arg(long)]
        port: Option<u16>,
    },
    /// Recipe management
    Recipe {
        #[command(subcommand)]
        command: RecipeCommands,
    },
    /// Build a shopping list for one or more recipes
    List {
        /// Recipe IDs to shop for
        #[arg(required = true)]
        recipe_ids: Vec<String>,
        /// Number of people to cook for
        #[arg(long, short, default_value_t = 1, allow_negative_numbers = true)]
        people: i64,
        /// Persist the generated list
        #[arg(long)]
        save: bool,
    },
}

#[derive(Subcommand)]
pub enum RecipeCommands {
    /// Add a recipe from a TOML file
    Add {
        /// Path to the recipe TOML file
        file: String,
    },
    /// List all recipes
    List,
    /// Show a recipe and its ingredients
    Show {
        /// Recipe ID to show
        recipe_id: String,
    },
}

/// Execute the `forked init` command: write config file.
fn cmd_init(db_url: &str, bind: &str, port: u16, force: bool) -> anyhow::Result<()> {
    let path = config::config_path();

    if path.exists() && !force {
        anyhow::bail!(
            "config file already exists at {}\nUse --force to overwrite.",
            path.display()
        );
    }

    let cfg = config::ConfigFile {
        database: config::DatabaseSection {
            url: db_url.to_string(),
        },
        server: config::ServerSection {
            bind: bind.to_string(),
            port,
        },
    };
    config::save_config(&cfg)?;

    println!("Config written to {}", path.display());
    println!("  database.url = {db_url}");
    println!("  server       = {bind}:{port}");
    println!();
    println!("Next: run `forked db-init` to create and migrate the database.");

    Ok(())
}

/// Execute the `forked db-init` command: create database and run migrations.
async fn cmd_db_init(resolved: &ForkedConfig) -> anyhow::Result<()> {
    println!("Initializing forked database...");

    pool::ensure_database_exists(&resolved.db_config).await?;
    let db_pool = pool::create_pool(&resolved.db_config).await?;
    let result: anyhow::Result<Vec<(String, i64)>> = async {
        pool::run_migrations(&db_pool).await?;
        pool::table_counts(&db_pool).await
    }
    .await;
    db_pool.close().await;

    println!("Database ready. Tables:");
    for (table, count) in &result? {
        println!("  {table}: {count} rows");
    }
    println!("forked db-init complete.");
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
        Commands::Init {
            db_url,
            bind,
            port,
            force,
        } => {
            cmd_init(&db_url, &bind, port, force)?;
        }
        Commands::DbInit => {
            let resolved = ForkedConfig::resolve(cli.database_url.as_deref())?;
            cmd_db_init(&resolved).await?;
        }
        Commands::Serve { bind, port } => {
            let resolved = ForkedConfig::resolve(cli.database_url.as_deref())?;
            let db_pool = pool::create_pool(&resolved.db_config).await?;
            let bind = bind.unwrap_or(resolved.server.bind);
            let port = port.unwrap_or(resolved.server.port);
            let state = serve_cmd::AppState::postgres(PgStore::new(db_pool.clone()));
            let result = serve_cmd::run_serve(state, &bind, port).await;
            db_pool.close().await;
            result?;
        }
        Commands::Recipe { command } => {
            let resolved = ForkedConfig::resolve(cli.database_url.as_deref())?;
            let db_pool = pool::create_pool(&resolved.db_config).await?;
            let store = PgStore::new(db_pool.clone());
            let result = recipe_cmds::run_recipe_command(command, &store).await;
            db_pool.close().await;
            result?;
        }
        Commands::List {
            recipe_ids,
            people,
            save,
        } => {
            let resolved = ForkedConfig::resolve(cli.database_url.as_deref())?;
            let db_pool = pool::create_pool(&resolved.db_config).await?;
            let store = PgStore::new(db_pool.clone());
            let result = list_cmd::run_list(&store, &store, recipe_ids, people, save).await;
            db_pool.close().await;
            result?;
        }
    }

    Ok(())
}
