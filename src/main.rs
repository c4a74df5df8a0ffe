use std::sync::Arc;

use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use wordle_ledger::{
    config::Config,
    ingest::InMemoryMemberDirectory,
    stats::{self, InMemoryStatsRepository, PostgresStatsRepository, StatsRepository, StatsService},
    AppState,
};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "wordle_ledger=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Wordle results ledger");

    let config = Config::from_env();

    let repository: Arc<dyn StatsRepository> = match &config.database_url {
        Some(database_url) => {
            let pool = sqlx::PgPool::connect(database_url).await?;
            let repository = PostgresStatsRepository::new(pool);
            repository.ensure_schema().await?;
            Arc::new(repository)
        }
        None => {
            warn!("DATABASE_URL not set; stats are kept in memory only");
            Arc::new(InMemoryStatsRepository::new())
        }
    };

    let stats_service = Arc::new(
        StatsService::builder(repository)
            .with_ledger_config(config.ledger)
            .with_ranking_config(config.ranking)
            .build(),
    );
    stats_service.load().await?;

    // The chat connection fills this in as it learns about members
    let directory = Arc::new(InMemoryMemberDirectory::new());
    let app_state = AppState::new(stats_service.clone(), directory);

    let app = stats::router(app_state).layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    info!(addr = %config.bind_addr, "Admin API listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    stats_service.flush().await;
    info!("Pending stats writes flushed; shutting down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
