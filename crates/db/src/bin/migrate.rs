//! `civiq-migrate`: apply migrations and seed the default admin account.
//!
//! Run once before starting any service that uses the database.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use civiq_core::roles::ROLE_ADMIN;

const DEFAULT_ADMIN_EMAIL: &str = "admin@complaint.com";
const DEFAULT_ADMIN_NAME: &str = "Admin";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "civiq_migrate=info,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let database_url = std::env::var("DATABASE_URL")?;

    let pool = civiq_db::create_pool(&database_url).await?;
    tracing::info!("Database connection pool created");

    civiq_db::health_check(&pool).await?;
    tracing::info!("Database health check passed");

    civiq_db::run_migrations(&pool).await?;
    tracing::info!("Database migrations applied");

    // Seed the default admin if it does not exist yet. Idempotent across
    // repeated runs.
    let result = sqlx::query(
        "INSERT INTO users (name, email, role)
         VALUES ($1, $2, $3)
         ON CONFLICT (email) DO NOTHING",
    )
    .bind(DEFAULT_ADMIN_NAME)
    .bind(DEFAULT_ADMIN_EMAIL)
    .bind(ROLE_ADMIN)
    .execute(&pool)
    .await?;

    if result.rows_affected() > 0 {
        tracing::info!(email = DEFAULT_ADMIN_EMAIL, "Seeded default admin user");
    } else {
        tracing::info!(email = DEFAULT_ADMIN_EMAIL, "Default admin already present");
    }

    Ok(())
}
