use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use journey_engine::config::{LoggingSettings, Settings};
use journey_engine::core::Matcher;
use journey_engine::routes::{self, AppState};
use journey_engine::services::{AppwriteClient, AppwriteCollections, Catalog};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    // Logging comes from the settings when they load; the error is reported once it is up
    let settings = Settings::load();
    let logging = settings
        .as_ref()
        .map(|settings| settings.logging.clone())
        .unwrap_or_default();
    init_tracing(&logging);

    info!("Starting journey engine...");

    let settings = settings.map_err(|e| {
        error!("Failed to load configuration: {}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e)
    })?;

    info!("Configuration loaded successfully");

    // Initialize Appwrite client
    let collections = AppwriteCollections {
        profiles: settings.collection.profiles,
    };
    let timeout = Duration::from_secs(settings.appwrite.timeout_secs.unwrap_or(30));

    let appwrite = AppwriteClient::new(
        settings.appwrite.endpoint,
        settings.appwrite.api_key,
        settings.appwrite.project_id,
        settings.appwrite.database_id,
        collections,
        timeout,
    )
    .map_err(|e| {
        error!("Failed to build Appwrite client: {}", e);
        std::io::Error::new(std::io::ErrorKind::Other, e)
    })?;

    info!("Appwrite client initialized (timeout: {:?})", timeout);

    // Search still answers with an empty catalog; /health reports it as degraded
    let catalog = match Catalog::load(&settings.catalog.path) {
        Ok(catalog) => catalog,
        Err(e) => {
            warn!("Failed to load catalog from {} ({}), starting empty", settings.catalog.path, e);
            Catalog::default()
        }
    };

    let matcher = Matcher::new(settings.matching.max_results);

    let app_state = AppState {
        gateway: Arc::new(appwrite),
        catalog: Arc::new(catalog),
        matcher,
        session: settings.session,
    };

    // Configure HTTP server
    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::JsonConfig::default().error_handler(routes::handle_json_payload_error))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}

/// Install the global subscriber; `LOG_LEVEL` and `LOG_FORMAT` override the settings
fn init_tracing(logging: &LoggingSettings) {
    let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| logging.level.clone());
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| logging.format.clone());

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&log_level).unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .with_level(true);

    if log_format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.json().init();
    }
}
