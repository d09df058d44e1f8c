use actix_cors::Cors;
use actix_web::{web, App, HttpServer, middleware, error};
use research_match::config::Settings;
use research_match::core::{QuotaPolicy, TriggerPolicy};
use research_match::models::ErrorResponse;
use research_match::routes::{self, sessions::AppState};
use research_match::services::{ProfileSource, SessionStore};
use std::sync::Arc;
use tracing::{info, error};
use tracing_subscriber::EnvFilter;

/// Handle JSON payload errors
pub fn handle_json_payload_error(err: error::JsonPayloadError, req: &actix_web::HttpRequest) -> actix_web::Error {
    tracing::info!("JSON payload error on {}: {}", req.path(), err);
    ErrorResponse {
        error: "invalid_json".to_string(),
        message: format!("Invalid JSON: {}", err),
        status_code: 400,
    }
    .into()
}

/// Handle query payload errors
pub fn handle_query_payload_error(err: error::QueryPayloadError, req: &actix_web::HttpRequest) -> actix_web::Error {
    tracing::info!("Query error on {}: {}", req.path(), err);
    ErrorResponse {
        error: "invalid_query".to_string(),
        message: format!("Invalid query: {}", err),
        status_code: 400,
    }
    .into()
}

/// Initialize logging from the logging settings; `RUST_LOG` wins when set
fn init_tracing(level: &str, format: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    if format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.json().init();
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    // Load configuration
    let settings = match Settings::load() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return Err(std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string()));
        }
    };

    init_tracing(&settings.logging.level, &settings.logging.format);

    info!("Starting Research Match service...");

    // Load the read-only profile dataset
    let catalog = match ProfileSource::load(&settings.catalog.path) {
        Ok(catalog) => Arc::new(catalog),
        Err(e) => {
            error!("Failed to load profile catalog from {}: {}", settings.catalog.path, e);
            return Err(std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()));
        }
    };

    let quota = QuotaPolicy::from(&settings.quota);
    let trigger = TriggerPolicy::from(&settings.engagement);

    info!(
        "Quota: {} free requests per period, {} cents per paid match",
        quota.free_requests_limit, quota.paid_match_fee_cents
    );
    info!("Engagement trigger: {:?} mode, threshold {}", trigger.mode, trigger.threshold);

    let sessions = SessionStore::new(
        catalog,
        quota,
        trigger,
        settings.sessions.max_sessions,
        settings.sessions.idle_timeout_secs,
    );

    info!(
        "Session store initialized (max: {} sessions, idle timeout: {}s)",
        settings.sessions.max_sessions, settings.sessions.idle_timeout_secs
    );

    let app_state = AppState { sessions };

    // Configure HTTP server
    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::JsonConfig::default().error_handler(handle_json_payload_error))
            .app_data(web::QueryConfig::default().error_handler(handle_query_payload_error))
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
