use std::sync::Arc;
use std::time::Duration;

use auth::Authenticator;
use auth::JwtHandler;
use auth::PasswordHasher;
use person_service::config::Config;
use person_service::connection::ports::ConnectionServicePort;
use person_service::connection::service::ConnectionService;
use person_service::domain::metrics::ServiceMetrics;
use person_service::inbound::http::metrics::PrometheusMetrics;
use person_service::inbound::http::router::create_router;
use person_service::inbound::http::router::AppState;
use person_service::outbound::cache::InMemoryCacheStore;
use person_service::outbound::cache::NoopCacheStore;
use person_service::outbound::events::KafkaEventProducer;
use person_service::person::ports::CacheStore;
use person_service::person::ports::PersonServicePort;
use person_service::person::service::PersonService;
use person_service::repositories::CachedPersonRepository;
use person_service::repositories::PostgresConnectionRepository;
use person_service::repositories::PostgresPersonRepository;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "person_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "person-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        http_port = config.server.http_port,
        kafka_brokers = %config.kafka.brokers,
        jwt_issuer = %config.jwt.issuer,
        cache_enabled = config.cache.enabled,
        "Configuration loaded"
    );

    let pg_pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .connect(&config.database.url)
        .await?;
    tracing::info!(
        max_connections = config.database.max_connections,
        database = "postgresql",
        "Database connection pool created"
    );

    sqlx::migrate!("./migrations").run(&pg_pool).await?;
    tracing::info!(database = "postgresql", "Database migrations completed");

    let private_key = tokio::fs::read(&config.jwt.private_key_path).await?;
    let public_key = tokio::fs::read(&config.jwt.public_key_path).await?;
    let jwt_handler =
        JwtHandler::from_rsa_pem(&private_key, &public_key)?.with_issuer(config.jwt.issuer.clone());
    let authenticator = Arc::new(Authenticator::new(PasswordHasher::new(), jwt_handler));

    let event_producer = Arc::new(KafkaEventProducer::new(&config)?);
    let metrics = Arc::new(PrometheusMetrics::new());

    let (person_service, connection_service) = if config.cache.enabled {
        let cache = Arc::new(InMemoryCacheStore::new(config.cache.max_capacity));
        build_services(
            &pg_pool,
            cache,
            config.cache.ttl(),
            event_producer,
            Arc::clone(&authenticator),
            metrics.clone(),
        )
    } else {
        build_services(
            &pg_pool,
            Arc::new(NoopCacheStore),
            config.cache.ttl(),
            event_producer,
            Arc::clone(&authenticator),
            metrics.clone(),
        )
    };

    let state = AppState {
        person_service,
        connection_service,
        authenticator,
    };

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    axum::serve(http_listener, create_router(state, metrics))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server exited successfully");

    Ok(())
}

fn build_services<C: CacheStore>(
    pg_pool: &PgPool,
    cache: Arc<C>,
    ttl: Duration,
    event_producer: Arc<KafkaEventProducer>,
    authenticator: Arc<Authenticator>,
    metrics: Arc<PrometheusMetrics>,
) -> (Arc<dyn PersonServicePort>, Arc<dyn ConnectionServicePort>) {
    let person_repository = Arc::new(CachedPersonRepository::with_ttl(
        Arc::new(PostgresPersonRepository::new(pg_pool.clone())),
        cache,
        ttl,
    ));
    let connection_repository = Arc::new(PostgresConnectionRepository::new(pg_pool.clone()));
    let metrics: Arc<dyn ServiceMetrics> = metrics;

    let person_service = PersonService::new(
        Arc::clone(&person_repository),
        Arc::clone(&event_producer),
        authenticator,
    )
    .with_metrics(Arc::clone(&metrics));

    let connection_service =
        ConnectionService::new(connection_repository, person_repository, event_producer)
            .with_metrics(metrics);

    (Arc::new(person_service), Arc::new(connection_service))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
