use crate::services::appwrite::{GatewayError, Session, SessionGateway};

/// Why a page guard refused a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    RedirectToLogin { location: String },
    /// The identity backend could not be reached; render "service unavailable"
    Unavailable { reason: String },
}

/// Map an already-resolved gateway result to an access decision
pub fn resolve_access(
    result: Result<Option<Session>, GatewayError>,
    login_path: &str,
) -> Result<Session, Rejection> {
    match result {
        Ok(Some(session)) => Ok(session),
        Ok(None) => Err(Rejection::RedirectToLogin {
            location: login_path.to_string(),
        }),
        Err(e) => {
            tracing::error!("Session lookup failed: {}", e);
            Err(Rejection::Unavailable {
                reason: e.to_string(),
            })
        }
    }
}

/// Guard a page behind an authenticated session
///
/// A missing or blank token redirects without calling the backend.
pub async fn check_session(
    gateway: &dyn SessionGateway,
    token: Option<&str>,
    login_path: &str,
) -> Result<Session, Rejection> {
    let token = match token.map(str::trim).filter(|t| !t.is_empty()) {
        Some(token) => token,
        None => {
            return Err(Rejection::RedirectToLogin {
                location: login_path.to_string(),
            })
        }
    };

    resolve_access(gateway.get_session(token).await, login_path)
}
