use site_procurement::{
    AppState,
    auth::bootstrap_admin,
    config::{AppConfig, Env},
    create_router,
    repository::{InMemoryRepository, PostgresRepository, RepositoryState},
    storage::{MockStorageService, S3StorageClient, StorageService, StorageState},
};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// main
///
/// Loads configuration, initialises logging, connects and migrates the
/// database, provisions storage and serves the router.
#[tokio::main]
async fn main() {
    // 1. Configuration (fail-fast on missing production secrets)
    dotenv::dotenv().ok();
    let config = AppConfig::load();

    // 2. Logging: RUST_LOG wins over the defaults below.
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "site_procurement=debug,tower_http=info,axum=trace".into());

    match config.env {
        Env::Local => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
        Env::Production => {
            // JSON lines for the log aggregator.
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
    }

    tracing::info!("Application starting in {:?} mode", config.env);

    // 3. Persistence and storage
    let (repo, storage): (RepositoryState, StorageState) =
        if config.env == Env::Local && config.db_url.is_empty() {
            // Demo mode: nothing persists across restarts and sheets never reach a bucket.
            tracing::warn!("DATABASE_URL not set; using in-memory repository and mock storage");
            (
                Arc::new(InMemoryRepository::new()),
                Arc::new(MockStorageService::new()),
            )
        } else {
            let pool = PgPoolOptions::new()
                .max_connections(config.db_max_connections)
                .connect(&config.db_url)
                .await
                .expect("FATAL: Failed to connect to Postgres. Check DATABASE_URL.");

            sqlx::migrate!("./migrations")
                .run(&pool)
                .await
                .expect("FATAL: Database migrations failed.");
            tracing::info!("Database migrations applied.");

            let s3_client = S3StorageClient::new(
                &config.s3_endpoint,
                &config.s3_region,
                &config.s3_key,
                &config.s3_secret,
                &config.s3_bucket,
            )
            .await;

            // LOCAL-ONLY: provision the MinIO bucket.
            if config.env == Env::Local {
                s3_client.ensure_bucket_exists().await;
            }

            (Arc::new(PostgresRepository::new(pool)), Arc::new(s3_client))
        };

    if let Err(e) = bootstrap_admin(repo.as_ref(), &config).await {
        tracing::error!("bootstrap admin could not be created: {e}");
    }

    // 4. Unified state, router and server
    let bind_addr = config.bind_addr.clone();
    let app_state = AppState {
        repo,
        storage,
        config,
    };
    let app = create_router(app_state);

    let listener = TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("FATAL: cannot bind {bind_addr}: {e}"));

    tracing::info!("Listening on {}", bind_addr);
    tracing::info!("API Documentation (Swagger UI) available at: http://{}/swagger-ui", bind_addr);

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!("server terminated: {e}");
    }
}
