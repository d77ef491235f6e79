use actix_web::{web, HttpRequest, HttpResponse, Responder};
use crate::models::{ErrorResponse, ProfileResponse, RedirectResponse};
use crate::routes::AppState;
use crate::services::{check_session, ProfileOutcome, Rejection, Session};

/// Header carrying the session secret; the session cookie is the fallback
pub const SESSION_HEADER: &str = "X-Session-Token";

/// Configure session and profile routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/session", web::get().to(get_session))
        .route("/profiles", web::post().to(create_profile));
}

fn session_token(req: &HttpRequest, cookie_name: &str) -> Option<String> {
    req.headers()
        .get(SESSION_HEADER)
        .and_then(|value| value.to_str().ok())
        .filter(|token| !token.trim().is_empty())
        .map(str::to_string)
        .or_else(|| req.cookie(cookie_name).map(|cookie| cookie.value().to_string()))
}

async fn guard(state: &AppState, req: &HttpRequest) -> Result<Session, Rejection> {
    let token = session_token(req, &state.session.cookie_name);
    check_session(state.gateway.as_ref(), token.as_deref(), &state.session.login_path).await
}

/// Response for a request the guard did not let through
fn rejection_response(rejection: Rejection) -> HttpResponse {
    match rejection {
        Rejection::RedirectToLogin { location } => HttpResponse::Unauthorized().json(RedirectResponse {
            error: "unauthenticated".to_string(),
            redirect: location,
        }),
        Rejection::Unavailable { reason } => HttpResponse::ServiceUnavailable().json(
            ErrorResponse::new("service_unavailable", reason, 503),
        ),
    }
}

/// Current session endpoint
///
/// GET /api/v1/session
///
/// 200 with the session, 401 with a login redirect, 503 when the identity
/// backend is unavailable.
async fn get_session(state: web::Data<AppState>, req: HttpRequest) -> impl Responder {
    match guard(&state, &req).await {
        Ok(session) => HttpResponse::Ok().json(session),
        Err(rejection) => rejection_response(rejection),
    }
}

/// Create the traveler profile for the current session
///
/// POST /api/v1/profiles
///
/// Idempotent: 201 when created, 200 when the profile already existed.
async fn create_profile(state: web::Data<AppState>, req: HttpRequest) -> impl Responder {
    let session = match guard(&state, &req).await {
        Ok(session) => session,
        Err(rejection) => return rejection_response(rejection),
    };

    match state.gateway.create_profile(&session).await {
        Ok(ProfileOutcome::Created) => {
            tracing::info!("Created profile for user {}", session.user_id);
            HttpResponse::Created().json(ProfileResponse {
                user_id: session.user_id,
                created: true,
            })
        }
        Ok(ProfileOutcome::AlreadyExists) => HttpResponse::Ok().json(ProfileResponse {
            user_id: session.user_id,
            created: false,
        }),
        Err(e) => {
            tracing::error!("Failed to create profile for {}: {}", session.user_id, e);
            HttpResponse::ServiceUnavailable().json(ErrorResponse::new(
                "service_unavailable",
                e.to_string(),
                503,
            ))
        }
    }
}
