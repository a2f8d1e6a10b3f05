use std::process::ExitCode;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use heritage_catalog::infrastructure::AppState;
use heritage_catalog::{config, db, seed};

/// Prepare the catalog database: create the schema, seed demo data when
/// `SEED_DEMO` is set and report what the catalog holds.
#[tokio::main]
async fn main() -> ExitCode {
    // Load configuration first so `RUST_LOG` may come from `.env`
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "heritage_catalog=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = match config::Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Invalid configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    // Initialize database
    let db = match db::init_db(&config.database_url).await {
        Ok(db) => db,
        Err(e) => {
            tracing::error!("Failed to initialize database: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if config.seed_demo {
        tracing::info!("Seeding demo data...");
        if let Err(e) = seed::seed_demo_data(&db).await {
            tracing::error!("Failed to seed data: {}", e);
            return ExitCode::FAILURE;
        }
        tracing::info!("Demo data seeded successfully.");
    }

    let state = AppState::new(db, &config);
    match state.oeuvres.status_counts().await {
        Ok(counts) => {
            for (status, total) in counts {
                tracing::info!(%status, total, "works");
            }
        }
        Err(e) => {
            tracing::error!("Failed to read catalog: {}", e);
            return ExitCode::FAILURE;
        }
    }

    tracing::info!(
        database = %config.database_url,
        language = %state.default_language,
        "catalog ready"
    );
    ExitCode::SUCCESS
}
