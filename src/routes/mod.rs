// Route exports
pub mod journey;
pub mod session;

use crate::config::SessionSettings;
use crate::core::Matcher;
use crate::models::ErrorResponse;
use crate::services::{Catalog, SessionGateway};
use actix_web::{error, web, HttpRequest, HttpResponse};
use std::sync::Arc;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub gateway: Arc<dyn SessionGateway>,
    pub catalog: Arc<Catalog>,
    pub matcher: Matcher,
    pub session: SessionSettings,
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .configure(journey::configure)
            .configure(session::configure),
    );
}

/// Handle JSON payload errors
pub fn handle_json_payload_error(err: error::JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    tracing::info!("JSON payload error on {}: {}", req.path(), err);
    let body = ErrorResponse::new("invalid_json", format!("Invalid JSON: {}", err), 400);
    error::InternalError::from_response(err, HttpResponse::BadRequest().json(body)).into()
}
