// Integration tests for the journey engine HTTP API

use actix_web::{cookie::Cookie, http::StatusCode, test, web, App};
use async_trait::async_trait;
use journey_engine::config::SessionSettings;
use journey_engine::core::Matcher;
use journey_engine::models::{CandidateOffering, OfferingCategory};
use journey_engine::routes::{self, AppState};
use journey_engine::services::{
    check_session, Catalog, GatewayError, ProfileOutcome, Rejection, Session, SessionGateway,
};
use serde_json::{json, Value};
use std::collections::HashSet;
use std::sync::{Arc, Mutex};

const VALID_TOKEN: &str = "secret-token";

/// In-memory identity backend
#[derive(Default)]
struct FakeGateway {
    failing: bool,
    profiles: Mutex<HashSet<String>>,
}

impl FakeGateway {
    fn failing() -> Self {
        Self {
            failing: true,
            ..Default::default()
        }
    }
}

#[async_trait]
impl SessionGateway for FakeGateway {
    async fn get_session(&self, token: &str) -> Result<Option<Session>, GatewayError> {
        if self.failing {
            return Err(GatewayError::ApiError("Failed to fetch account: 503".to_string()));
        }
        if token != VALID_TOKEN {
            return Ok(None);
        }
        Ok(Some(Session {
            user_id: "user-42".to_string(),
            email: "traveler@example.com".to_string(),
            name: "Traveler".to_string(),
        }))
    }

    async fn create_profile(&self, session: &Session) -> Result<ProfileOutcome, GatewayError> {
        let mut profiles = self.profiles.lock().unwrap();
        if profiles.insert(session.user_id.clone()) {
            Ok(ProfileOutcome::Created)
        } else {
            Ok(ProfileOutcome::AlreadyExists)
        }
    }
}

fn create_offering(id: &str, score: u8, price: f64) -> CandidateOffering {
    CandidateOffering {
        id: id.to_string(),
        name: format!("Offering {}", id),
        category: OfferingCategory::Activity,
        sustainability_score: score,
        price,
        tags: vec!["snorkeling".to_string()],
    }
}

fn create_state(gateway: FakeGateway) -> AppState {
    AppState {
        gateway: Arc::new(gateway),
        catalog: Arc::new(Catalog::new(vec![
            create_offering("low", 40, 50.0),
            create_offering("mid", 60, 50.0),
            create_offering("high", 90, 50.0),
        ])),
        matcher: Matcher::default(),
        session: SessionSettings::default(),
    }
}

macro_rules! init_app {
    ($state:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($state))
                .app_data(web::JsonConfig::default().error_handler(routes::handle_json_payload_error))
                .configure(routes::configure_routes),
        )
        .await
    };
}

#[actix_web::test]
async fn test_health_reports_catalog_size() {
    let app = init_app!(create_state(FakeGateway::default()));

    let req = test::TestRequest::get().uri("/api/v1/health").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["status"], "healthy");
    assert_eq!(body["catalog_size"], 3);
}

#[actix_web::test]
async fn test_search_without_destination_is_incomplete() {
    let app = init_app!(create_state(FakeGateway::default()));

    let req = test::TestRequest::get().uri("/api/v1/search?travelers=2").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "incomplete_journey");
    assert_eq!(body["step"], "destination");
}

#[actix_web::test]
async fn test_search_returns_ranked_matches() {
    let app = init_app!(create_state(FakeGateway::default()));

    let req = test::TestRequest::get()
        .uri("/api/v1/search?destination=Bali&sustainability=50")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    let ids: Vec<&str> = body["results"]
        .as_array()
        .unwrap()
        .iter()
        .map(|result| result["id"].as_str().unwrap())
        .collect();

    assert_eq!(ids, vec!["high", "mid"]);
    assert_eq!(body["totalResults"], 2);
    assert_eq!(body["totalCandidates"], 3);
    assert_eq!(body["query"], "destination=Bali");
}

#[actix_web::test]
async fn test_step_update_returns_new_params() {
    let app = init_app!(create_state(FakeGateway::default()));

    let req = test::TestRequest::post()
        .uri("/api/v1/journey/steps/travelers")
        .set_json(json!({
            "params": "destination=Bali",
            "fields": { "travelerCount": 4 }
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["params"], "destination=Bali&travelers=4");
    assert_eq!(body["complete"], true);
}

#[actix_web::test]
async fn test_step_update_rejects_foreign_field() {
    let app = init_app!(create_state(FakeGateway::default()));

    let req = test::TestRequest::post()
        .uri("/api/v1/journey/steps/dates")
        .set_json(json!({
            "params": "",
            "fields": { "destination": "Paris" }
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "invalid_step_field");
    assert_eq!(body["step"], "dates");
}

#[actix_web::test]
async fn test_step_update_rejects_reversed_dates() {
    let app = init_app!(create_state(FakeGateway::default()));

    let req = test::TestRequest::post()
        .uri("/api/v1/journey/steps/dates")
        .set_json(json!({
            "params": "destination=Bali",
            "fields": { "startDate": "2026-09-12", "endDate": "2026-09-03" }
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[actix_web::test]
async fn test_unknown_step_is_bad_request() {
    let app = init_app!(create_state(FakeGateway::default()));

    let req = test::TestRequest::post()
        .uri("/api/v1/journey/steps/payment")
        .set_json(json!({ "params": "", "fields": {} }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "unknown_step");
}

#[actix_web::test]
async fn test_unknown_field_name_is_invalid_json() {
    let app = init_app!(create_state(FakeGateway::default()));

    let req = test::TestRequest::post()
        .uri("/api/v1/journey/steps/budget")
        .set_json(json!({ "params": "", "fields": { "budgetCeiling": 10 } }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "invalid_json");
}

#[actix_web::test]
async fn test_finalize_normalizes_params() {
    let app = init_app!(create_state(FakeGateway::default()));

    let req = test::TestRequest::post()
        .uri("/api/v1/journey/finalize")
        .set_json(json!({ "params": "destination=Bali&minBudget=900&maxBudget=100" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["params"], "destination=Bali&minBudget=100&maxBudget=900");
    assert_eq!(body["preferences"]["budgetRange"]["min"], 100);
}

#[actix_web::test]
async fn test_session_without_token_redirects() {
    let app = init_app!(create_state(FakeGateway::default()));

    let req = test::TestRequest::get().uri("/api/v1/session").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["redirect"], "/login");
}

#[actix_web::test]
async fn test_session_from_header_and_cookie() {
    let app = init_app!(create_state(FakeGateway::default()));

    let req = test::TestRequest::get()
        .uri("/api/v1/session")
        .insert_header(("X-Session-Token", VALID_TOKEN))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["userId"], "user-42");

    let req = test::TestRequest::get()
        .uri("/api/v1/session")
        .cookie(Cookie::new("journey_session", VALID_TOKEN))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn test_blank_header_falls_back_to_cookie() {
    let app = init_app!(create_state(FakeGateway::default()));

    let req = test::TestRequest::get()
        .uri("/api/v1/session")
        .insert_header(("X-Session-Token", ""))
        .cookie(Cookie::new("journey_session", VALID_TOKEN))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["userId"], "user-42");
}

#[actix_web::test]
async fn test_step_update_accepts_out_of_range_numbers() {
    let app = init_app!(create_state(FakeGateway::default()));

    let req = test::TestRequest::post()
        .uri("/api/v1/journey/steps/travelers")
        .set_json(json!({
            "params": "destination=Bali",
            "fields": { "travelerCount": -1 }
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    // Stored as given; the next decode floors it to 1
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["params"], "destination=Bali&travelers=0");
    assert_eq!(body["complete"], true);
}

#[actix_web::test]
async fn test_session_backend_failure_is_unavailable() {
    let app = init_app!(create_state(FakeGateway::failing()));

    let req = test::TestRequest::get()
        .uri("/api/v1/session")
        .insert_header(("X-Session-Token", VALID_TOKEN))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[actix_web::test]
async fn test_profile_creation_is_idempotent() {
    let app = init_app!(create_state(FakeGateway::default()));

    let req = test::TestRequest::post()
        .uri("/api/v1/profiles")
        .insert_header(("X-Session-Token", VALID_TOKEN))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let req = test::TestRequest::post()
        .uri("/api/v1/profiles")
        .insert_header(("X-Session-Token", VALID_TOKEN))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["created"], false);
}

#[actix_web::test]
async fn test_check_session_blank_token_skips_backend() {
    // A failing backend would turn any lookup into Unavailable
    let gateway = FakeGateway::failing();

    let access = check_session(&gateway, Some("   "), "/login").await;

    assert_eq!(
        access,
        Err(Rejection::RedirectToLogin {
            location: "/login".to_string()
        })
    );
}
