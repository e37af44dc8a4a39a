//! Postgres fixtures for forked integration tests.
//!
//! All tests in one binary share a server: `FORKED_TEST_PG_URL` when set,
//! otherwise a testcontainers instance started on first use. Each test gets
//! a scratch database created and migrated through `forked_db::pool`, so the
//! fixtures exercise the same path as `forked db-init`.

use sqlx::{Executor, PgPool};
use testcontainers::runners::AsyncRunner;
use testcontainers::{ContainerAsync, ImageExt};
use testcontainers_modules::postgres::Postgres;
use tokio::sync::OnceCell;
use uuid::Uuid;

use forked_db::config::DbConfig;
use forked_db::models::{Ingredient, Recipe};
use forked_db::pool;
use forked_db::queries::recipes::{self, NewRecipe};

struct Server {
    config: DbConfig,
    _container: Option<ContainerAsync<Postgres>>,
}

static SERVER: OnceCell<Server> = OnceCell::const_new();

async fn start_server() -> Server {
    if let Ok(url) = std::env::var("FORKED_TEST_PG_URL") {
        return Server {
            config: DbConfig::new(url.trim_end_matches('/')),
            _container: None,
        };
    }

    let container = Postgres::default()
        .with_tag("17")
        .start()
        .await
        .expect("failed to start PostgreSQL container");
    let host = container.get_host().await.expect("container host");
    let port = container
        .get_host_port_ipv4(5432)
        .await
        .expect("container port");

    Server {
        config: DbConfig::new(format!("postgresql://postgres:postgres@{host}:{port}")),
        _container: Some(container),
    }
}

async fn server() -> &'static DbConfig {
    &SERVER.get_or_init(start_server).await.config
}

/// Server URL without a database segment.
pub async fn pg_url() -> &'static str {
    &server().await.database_url
}

/// Create and migrate a scratch database.
///
/// Returns `(pool, db_name)`; pass `db_name` to [`drop_test_db`] at the end
/// of the test.
pub async fn create_test_db() -> (PgPool, String) {
    let db_name = format!("forked_test_{}", Uuid::new_v4().simple());
    let config = server().await.for_database(&db_name);

    pool::ensure_database_exists(&config)
        .await
        .unwrap_or_else(|e| panic!("failed to create {db_name}: {e:#}"));
    let db_pool = pool::create_pool(&config)
        .await
        .unwrap_or_else(|e| panic!("failed to connect to {db_name}: {e:#}"));
    pool::run_migrations(&db_pool)
        .await
        .expect("migrations should succeed");

    (db_pool, db_name)
}

/// Drop a scratch database, terminating stray connections first. Errors are
/// ignored so cleanup never masks the test's own failure.
pub async fn drop_test_db(db_name: &str) {
    let config = server().await.for_database(db_name);
    let Ok(maint_pool) = pool::connect_maintenance(&config).await else {
        return;
    };

    let terminate = format!(
        "SELECT pg_terminate_backend(pid) FROM pg_stat_activity \
         WHERE datname = '{db_name}' AND pid <> pg_backend_pid()"
    );
    let _ = maint_pool.execute(terminate.as_str()).await;
    let _ = maint_pool
        .execute(format!("DROP DATABASE IF EXISTS {db_name}").as_str())
        .await;
    maint_pool.close().await;
}

/// Insert a recipe with `(name, quantity, unit)` ingredient lines.
pub async fn seed_recipe(pool: &PgPool, name: &str, lines: &[(&str, f64, &str)]) -> Recipe {
    let recipe = NewRecipe {
        name: name.to_string(),
        ingredients: lines
            .iter()
            .map(|&(ingredient, quantity, unit)| Ingredient::new(ingredient, quantity, unit))
            .collect(),
        instructions: String::new(),
        image_url: None,
    };
    recipes::insert_recipe(pool, &recipe)
        .await
        .unwrap_or_else(|e| panic!("failed to seed recipe {name}: {e:#}"))
}
