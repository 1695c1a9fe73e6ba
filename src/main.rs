use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use padel_tournament_api::api::{self, AppState};
use padel_tournament_api::config::Settings;
use padel_tournament_api::domain::repositories::Store;
use padel_tournament_api::infrastructure::repositories::{InMemoryStore, PostgresStore};
use padel_tournament_api::services::Services;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenv::dotenv().ok();

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let settings = Settings::from_env()?;

    let store: Arc<dyn Store> = match &settings.database_url {
        Some(database_url) => {
            tracing::info!("Connecting to database...");
            let store =
                PostgresStore::connect(database_url, settings.database_max_connections).await?;
            store.migrate().await?;
            tracing::info!("Database connected and migrated");
            Arc::new(store)
        }
        None => Arc::new(InMemoryStore::new()),
    };

    let state = AppState::new(Services::new(store), settings.jwt_secret.as_str());
    let app = api::router(state);

    tracing::info!("Server listening on {}", settings.bind_addr);
    let listener = tokio::net::TcpListener::bind(settings.bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
