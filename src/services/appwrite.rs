use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when interacting with Appwrite
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned error: {0}")]
    ApiError(String),

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

/// Authenticated identity as reported by the backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    #[serde(rename(serialize = "userId", deserialize = "$id"), alias = "userId")]
    pub user_id: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub name: String,
}

/// Result of an idempotent profile creation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileOutcome {
    Created,
    AlreadyExists,
}

/// Identity and profile backend used by page guards
#[async_trait]
pub trait SessionGateway: Send + Sync {
    /// Resolve a session token; `Ok(None)` means there is no valid session
    async fn get_session(&self, token: &str) -> Result<Option<Session>, GatewayError>;

    /// Create the profile document for `session`, tolerating an existing one
    async fn create_profile(&self, session: &Session) -> Result<ProfileOutcome, GatewayError>;
}

/// Collection IDs in Appwrite
#[derive(Debug, Clone)]
pub struct AppwriteCollections {
    pub profiles: String,
}

/// Appwrite API client
///
/// Handles all communication with the Appwrite backend including:
/// - Resolving the current account from a session secret
/// - Creating traveler profile documents
pub struct AppwriteClient {
    base_url: String,
    api_key: String,
    project_id: String,
    database_id: String,
    client: Client,
    collections: AppwriteCollections,
}

impl AppwriteClient {
    /// Create a new Appwrite client
    pub fn new(
        base_url: String,
        api_key: String,
        project_id: String,
        database_id: String,
        collections: AppwriteCollections,
        timeout: Duration,
    ) -> Result<Self, GatewayError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            base_url,
            api_key,
            project_id,
            database_id,
            client,
            collections,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path)
    }
}

#[async_trait]
impl SessionGateway for AppwriteClient {
    async fn get_session(&self, token: &str) -> Result<Option<Session>, GatewayError> {
        let url = self.url("account");

        tracing::debug!("Fetching account from: {}", url);

        let response = self
            .client
            .get(&url)
            .header("X-Appwrite-Project", &self.project_id)
            .header("X-Appwrite-Session", token)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            tracing::debug!("No active session for supplied token");
            return Ok(None);
        }
        if !status.is_success() {
            return Err(GatewayError::ApiError(format!(
                "Failed to fetch account: {}",
                status
            )));
        }

        let json: Value = response.json().await?;

        serde_json::from_value(json)
            .map(Some)
            .map_err(|e| GatewayError::InvalidResponse(format!("Failed to parse account: {}", e)))
    }

    async fn create_profile(&self, session: &Session) -> Result<ProfileOutcome, GatewayError> {
        let url = self.url(&format!(
            "databases/{}/collections/{}/documents",
            self.database_id, self.collections.profiles
        ));

        // The user id doubles as the document id, so a second create conflicts
        let payload = json!({
            "documentId": session.user_id,
            "data": {
                "userId": session.user_id,
                "email": session.email,
                "name": session.name,
                "createdAt": chrono::Utc::now().to_rfc3339(),
            },
        });

        let response = self
            .client
            .post(&url)
            .header("X-Appwrite-Key", &self.api_key)
            .header("X-Appwrite-Project", &self.project_id)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::CONFLICT {
            tracing::debug!("Profile already exists for {}", session.user_id);
            return Ok(ProfileOutcome::AlreadyExists);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_else(|_| "Unable to read body".to_string());
            tracing::error!("Failed to create profile for {}: {} - {}", session.user_id, status, body);
            return Err(GatewayError::ApiError(format!(
                "Failed to create profile: {}",
                status
            )));
        }

        tracing::debug!("Created profile for {}", session.user_id);
        Ok(ProfileOutcome::Created)
    }
}
