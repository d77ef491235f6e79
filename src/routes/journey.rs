use actix_web::{http::StatusCode, web, HttpRequest, HttpResponse, Responder};
use validator::Validate;
use crate::core::{codec, shared_tags, Aggregator, JourneyError, WizardStep};
use crate::models::{
    ErrorResponse, FinalizeRequest, FinalizeResponse, HealthResponse, JourneyStateResponse,
    MatchedOffering, SearchResponse, StepUpdateRequest,
};
use crate::routes::AppState;

/// Configure journey and search routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/search", web::get().to(search))
        .route("/journey/steps/{step}", web::post().to(apply_step))
        .route("/journey/finalize", web::post().to(finalize));
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let catalog_size = state.catalog.len();
    let status = if catalog_size > 0 { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        catalog_size,
        timestamp: chrono::Utc::now(),
    })
}

/// Search endpoint
///
/// GET /api/v1/search?destination=Bali&travelers=2&activity=surfing&activity=yoga
///
/// The query string is decoded leniently, finalized, and matched against the
/// catalog. Responds 422 when no destination was given.
async fn search(state: web::Data<AppState>, req: HttpRequest) -> impl Responder {
    let request_id = uuid::Uuid::new_v4();
    let model = codec::from_query_string(req.query_string());

    let snapshot = match Aggregator::from_model(model).finalize() {
        Ok(snapshot) => snapshot,
        Err(e) => {
            tracing::info!("Search {} rejected: {}", request_id, e);
            return journey_error_response(&e);
        }
    };

    let matches = state
        .matcher
        .match_offerings(&snapshot, state.catalog.offerings());

    let results: Vec<MatchedOffering> = matches
        .iter()
        .map(|offering| MatchedOffering::new(offering, shared_tags(offering, &snapshot)))
        .collect();

    tracing::info!(
        "Search {} for {}: {} results (from {} candidates)",
        request_id,
        snapshot.destination,
        results.len(),
        matches.catalog_size()
    );

    HttpResponse::Ok().json(SearchResponse {
        query: codec::to_query_string(&snapshot),
        total_results: results.len(),
        total_candidates: matches.catalog_size(),
        results,
        preferences: snapshot.clone(),
    })
}

/// Apply one wizard step
///
/// POST /api/v1/journey/steps/{step}
///
/// Request body:
/// ```json
/// {
///   "params": "destination=Bali&travelers=3",
///   "fields": { "startDate": "2026-09-03", "endDate": "2026-09-12" }
/// }
/// ```
async fn apply_step(
    path: web::Path<String>,
    req: web::Json<StepUpdateRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return HttpResponse::BadRequest().json(ErrorResponse::new(
            "Validation failed",
            errors.to_string(),
            400,
        ));
    }

    let step = match path.parse::<WizardStep>() {
        Ok(step) => step,
        Err(e) => return journey_error_response(&e),
    };

    let request = req.into_inner();
    let mut aggregator = Aggregator::from_model(codec::from_query_string(&request.params));

    if let Err(e) = aggregator.apply_step_update(step, request.fields) {
        tracing::info!("Step {} update rejected: {}", step, e);
        return journey_error_response(&e);
    }

    let complete = aggregator.finalize().is_ok();
    let preferences = aggregator.into_model();

    HttpResponse::Ok().json(JourneyStateResponse {
        params: codec::to_query_string(&preferences),
        preferences,
        complete,
    })
}

/// Finalize a journey
///
/// POST /api/v1/journey/finalize
///
/// Responds 422 naming the step to revisit when the journey is incomplete.
async fn finalize(req: web::Json<FinalizeRequest>) -> impl Responder {
    if let Err(errors) = req.validate() {
        return HttpResponse::BadRequest().json(ErrorResponse::new(
            "Validation failed",
            errors.to_string(),
            400,
        ));
    }

    let aggregator = Aggregator::from_model(codec::from_query_string(&req.params));

    match aggregator.finalize() {
        Ok(snapshot) => HttpResponse::Ok().json(FinalizeResponse {
            params: codec::to_query_string(&snapshot),
            preferences: snapshot,
        }),
        Err(e) => journey_error_response(&e),
    }
}

/// Map a journey error to its HTTP response
///
/// Out-of-schema fields and unknown steps are caller bugs (400); validation
/// and completeness failures are user-correctable (422).
fn journey_error_response(err: &JourneyError) -> HttpResponse {
    let (status, error) = match err {
        JourneyError::Validation { .. } => (StatusCode::UNPROCESSABLE_ENTITY, "validation_failed"),
        JourneyError::InvalidStepField { .. } => (StatusCode::BAD_REQUEST, "invalid_step_field"),
        JourneyError::IncompleteModel { .. } => (StatusCode::UNPROCESSABLE_ENTITY, "incomplete_journey"),
        JourneyError::UnknownStep(_) => (StatusCode::BAD_REQUEST, "unknown_step"),
    };

    let mut body = ErrorResponse::new(error, err.to_string(), status.as_u16());
    body.step = err.step().map(|step| step.to_string());

    HttpResponse::build(status).json(body)
}
