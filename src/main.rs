use std::net::SocketAddr;
use std::sync::Arc;

use tower::ServiceBuilder;
use tower_governor::{
    governor::GovernorConfigBuilder, key_extractor::SmartIpKeyExtractor, GovernorLayer,
};
use tower_http::limit::RequestBodyLimitLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use prospect_api::config::Config;
use prospect_api::db::Database;
use prospect_api::db_storage::PgProspectStore;
use prospect_api::handlers::AppState;
use prospect_api::queue::ServiceQueue;
use prospect_api::routes;
use prospect_api::services::ProspectService;
use prospect_api::store::{MemoryProspectStore, ProspectStore};

/// Main entry point for the application.
///
/// Initializes logging, configuration, the prospect store (PostgreSQL when
/// `DATABASE_URL` is set, memory otherwise) and the service queue, then
/// starts the Axum server.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "prospect_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;

    let store: Arc<dyn ProspectStore> = match &config.database_url {
        Some(url) => {
            let db = Database::new(url, config.db_max_connections).await?;
            tracing::info!("Database connection pool established");
            Arc::new(PgProspectStore::new(db.pool))
        }
        None => {
            tracing::warn!("Using in-memory prospect store; data is lost on restart");
            Arc::new(MemoryProspectStore::new())
        }
    };

    // One queue for the whole process, shared by every request
    let queue = Arc::new(ServiceQueue::new());
    tracing::info!("Service queue initialized");

    let app_state = Arc::new(AppState {
        config: config.clone(),
        prospects: ProspectService::new(store, queue),
    });

    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .per_millisecond(config.rate_limit_replenish_ms)
            .burst_size(config.rate_limit_burst)
            .key_extractor(SmartIpKeyExtractor)
            .finish()
            .ok_or_else(|| anyhow::anyhow!("invalid rate limiter configuration"))?,
    );

    let max_body_bytes = config.max_body_bytes;
    let app = routes::build_app(app_state, move |prospect_routes| {
        prospect_routes.layer(
            ServiceBuilder::new()
                .layer(RequestBodyLimitLayer::new(max_body_bytes))
                .layer(GovernorLayer {
                    config: governor_conf,
                }),
        )
    });

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
