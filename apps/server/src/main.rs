//! Game Repository Server - Main entry point.
//!
//! Starts the Actix-web server with configured routes and middleware.

use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{http::header, web, App, HttpServer};
use tracing::{error, info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use game_repository_lib::api;
use game_repository_lib::config::Config;
use game_repository_lib::db::DbPool;
use game_repository_lib::middleware;
use game_repository_lib::services::{self, ArtifactStore};

/// One-shot check for container health checks.
///
/// Succeeds when the configuration loads, the database answers a ping and
/// the archive directory exists.
async fn check_health() -> bool {
    let Ok(config) = Config::from_env() else {
        return false;
    };

    let store = ArtifactStore::new(config.data_dir.clone(), config.max_upload_size);
    if !store.is_available().await {
        return false;
    }

    match DbPool::connect(&config.database_url, 1).await {
        Ok(pool) => pool.ping().await.is_ok(),
        Err(_) => false,
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // `--health-check` exits 0 when the database and archive directory are usable
    if std::env::args().any(|arg| arg == "--health-check") {
        dotenvy::dotenv().ok();
        std::process::exit(if check_health().await { 0 } else { 1 });
    }

    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");

    // Load configuration
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            error!("");
            error!("Please check your environment variables:");
            error!("  - RUST_ENV must be set to 'development' or 'production'");
            error!("  - In production, DATABASE_URL must be set to a non-development value");
            std::process::exit(1);
        }
    };

    info!("========================================");
    info!("  Game Repository Server");
    info!("  Environment: {}", config.environment);
    info!("========================================");

    if config.is_development() {
        warn!("Running in DEVELOPMENT mode - do not use in production!");
        info!("Using development defaults for DATABASE_URL");
    }

    // Create data directory
    tokio::fs::create_dir_all(&config.data_dir)
        .await
        .expect("Failed to create data directory");
    info!("Storing turn archives under {}", config.data_dir.display());

    // Initialize database
    let pool = DbPool::new(&config)
        .await
        .expect("Failed to initialize database");
    info!("Database connection established");

    pool.run_migrations()
        .await
        .expect("Failed to run migrations");
    info!("Database migrations complete");

    // Start the cleanup background task
    let cleanup_config = services::CleanupConfig {
        interval_secs: config.cleanup_interval_secs,
    };
    services::start_cleanup_task(Arc::new(pool.clone()), cleanup_config);

    // Prepare shared state
    let bind_address = config.bind_address();
    let store = ArtifactStore::new(config.data_dir.clone(), config.max_upload_size);
    let is_development = config.is_development();

    info!(
        "Upload limit: {}MB per turn archive",
        config.max_upload_size / 1024 / 1024
    );

    let worker_count = if is_development {
        info!(
            "Starting server at http://{} (4 workers - development mode)",
            bind_address
        );
        4
    } else {
        let cpus = num_cpus::get();
        info!(
            "Starting server at http://{} ({} workers)",
            bind_address, cpus
        );
        cpus
    };

    // Start HTTP server
    let server = HttpServer::new(move || {
        let cors = if is_development {
            // Permissive CORS for development
            Cors::default()
                .allowed_origin("http://localhost:3000")
                .allowed_origin("http://127.0.0.1:3000")
                .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
                .allowed_headers(vec![header::ACCEPT, header::CONTENT_TYPE])
                .expose_headers(vec![header::CONTENT_DISPOSITION])
                .max_age(3600)
        } else {
            // Restrictive CORS for production (same-origin only)
            Cors::default()
                .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
                .allowed_headers(vec![header::ACCEPT, header::CONTENT_TYPE])
                .max_age(3600)
        };

        App::new()
            // Add CORS middleware (must be before other middleware)
            .wrap(cors)
            .wrap(middleware::RequestLogger)
            .app_data(web::Data::new(pool.clone()))
            .app_data(web::Data::new(store.clone()))
            .service(web::scope("/api/v1").configure(api::configure_api))
    });

    server
        .workers(worker_count)
        .bind(&bind_address)?
        .run()
        .await
}
