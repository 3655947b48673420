//! Backend REST API Client
//!
//! HTTP client for the scoreboard and scheduler backend. Every call is a
//! single attempt; failures are returned to the caller, never retried.

use super::error::{ApiError, ApiResult};
use crate::leaderboard::{Player, UpdateResult};
use crate::schedule::{RegistrationBackend, Schedule, User};
use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Header carrying the per-request id
pub const REQUEST_ID_HEADER: &str = "X-Request-Id";

/// Backend API client
pub struct ApiClient {
    client: Client,
    config: ApiClientConfig,
}

/// Configuration for the API client
#[derive(Debug, Clone)]
pub struct ApiClientConfig {
    /// Base URL including the `/api` prefix (e.g., "http://localhost:5000/api")
    pub base_url: String,
    /// Bearer token from a previous login
    pub token: Option<String>,
    /// Request timeout in milliseconds
    pub request_timeout_ms: u64,
}

impl Default for ApiClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000/api".to_string(),
            token: None,
            request_timeout_ms: 30_000,
        }
    }
}

impl From<&crate::config::ApiConfig> for ApiClientConfig {
    fn from(config: &crate::config::ApiConfig) -> Self {
        Self {
            base_url: config.base_url.clone(),
            token: config.token.clone().filter(|t| !t.is_empty()),
            request_timeout_ms: config.request_timeout_secs * 1000,
        }
    }
}

// ============================================
// Request/Response DTOs
// ============================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct LoginRequest<'a> {
    src_api_key: &'a str,
}

/// Successful login: bearer token plus the authenticated user
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: User,
}

#[derive(Debug, Deserialize)]
struct CurrentUserResponse {
    user: User,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RegistrationRequest<'a> {
    participants: &'a [String],
    #[serde(skip_serializing_if = "Option::is_none")]
    registration_key: Option<&'a str>,
}

impl ApiClient {
    /// Create a new client with the given configuration
    pub fn new(config: ApiClientConfig) -> ApiResult<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_millis(config.request_timeout_ms))
            .build()?;

        Ok(Self { client, config })
    }

    /// Get the current configuration
    pub fn config(&self) -> &ApiClientConfig {
        &self.config
    }

    pub fn token(&self) -> Option<&str> {
        self.config.token.as_deref()
    }

    pub fn set_token(&mut self, token: impl Into<String>) {
        self.config.token = Some(token.into());
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), path)
    }

    /// Start a request with the request id and, when logged in, the bearer token
    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let request_id = uuid::Uuid::new_v4().to_string();
        tracing::debug!(request_id = %request_id, method = %method, path, "API request");

        let builder = self
            .client
            .request(method, self.url(path))
            .header(REQUEST_ID_HEADER, request_id)
            .header(reqwest::header::ACCEPT, "application/json");

        match &self.config.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Send and turn non-success statuses into errors
    async fn send(&self, builder: RequestBuilder) -> ApiResult<Response> {
        let response = builder.send().await.map_err(ApiError::from_transport)?;

        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let text = match response.text().await {
                Ok(text) => text,
                Err(e) => {
                    tracing::debug!(status = status.as_u16(), error = %e, "Failed to read error body");
                    String::new()
                }
            };
            let err = ApiError::from_status(status.as_u16(), &text);
            tracing::warn!(status = status.as_u16(), error = %err, "API returned an error status");
            Err(err)
        }
    }

    async fn send_json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> ApiResult<T> {
        let response = self.send(builder).await?;
        let text = response.text().await.map_err(ApiError::from_transport)?;
        serde_json::from_str(&text).map_err(|e| ApiError::Decode(e.to_string()))
    }

    /// Endpoints answering with a bare id in the body
    async fn send_id(&self, builder: RequestBuilder) -> ApiResult<i64> {
        let response = self.send(builder).await?;
        let text = response.text().await.map_err(ApiError::from_transport)?;
        text.trim()
            .parse::<i64>()
            .map_err(|_| ApiError::Decode(format!("expected an id, got {:?}", text)))
    }

    /// Endpoints answering with a plain-text message
    async fn send_text(&self, builder: RequestBuilder) -> ApiResult<String> {
        let response = self.send(builder).await?;
        response.text().await.map_err(ApiError::from_transport)
    }

    async fn send_empty(&self, builder: RequestBuilder) -> ApiResult<()> {
        self.send(builder).await.map(|_| ())
    }

    // ============================================
    // Authentication
    // ============================================

    /// Exchange a speedrun.com API key for a bearer token.
    ///
    /// The token is kept on the client for subsequent calls.
    pub async fn login(&mut self, src_api_key: &str) -> ApiResult<LoginResponse> {
        let body = LoginRequest { src_api_key };
        let login: LoginResponse = self
            .send_json(self.request(Method::POST, "login").json(&body))
            .await?;

        if login.token.is_empty() {
            return Err(ApiError::Unauthorized {
                message: "Invalid credentials".to_string(),
            });
        }

        tracing::info!(user = %login.user.name, "Logged in");
        self.set_token(login.token.clone());
        Ok(login)
    }

    pub async fn current_user(&self) -> ApiResult<User> {
        let response: CurrentUserResponse = self
            .send_json(self.request(Method::GET, "users/current"))
            .await?;
        Ok(response.user)
    }

    // ============================================
    // Tournament scheduler
    // ============================================

    /// Schedules owned by the logged in user
    pub async fn list_schedules(&self) -> ApiResult<Vec<Schedule>> {
        let schedules: Option<Vec<Schedule>> = self
            .send_json(self.request(Method::GET, "schedules"))
            .await?;
        Ok(schedules.unwrap_or_default())
    }

    /// Fetch one schedule, optionally through its registration key
    pub async fn get_schedule(&self, id: i64, registration_key: Option<&str>) -> ApiResult<Schedule> {
        let path = match registration_key {
            Some(key) => format!("schedules/{}?registrationKey={}", id, urlencoding::encode(key)),
            None => format!("schedules/{}", id),
        };
        self.send_json(self.request(Method::GET, &path)).await
    }

    /// Create a schedule, returning the id assigned by the backend
    pub async fn create_schedule(&self, schedule: &Schedule) -> ApiResult<i64> {
        self.send_id(self.request(Method::POST, "schedules").json(schedule))
            .await
    }

    pub async fn update_schedule(&self, schedule: &Schedule) -> ApiResult<()> {
        let path = format!("schedules/{}", schedule.id);
        self.send_empty(self.request(Method::PUT, &path).json(schedule))
            .await
    }

    /// Create unsaved schedules, update the others. Returns the schedule id.
    pub async fn save_schedule(&self, schedule: &Schedule) -> ApiResult<i64> {
        if schedule.is_new() {
            self.create_schedule(schedule).await
        } else {
            self.update_schedule(schedule).await?;
            Ok(schedule.id)
        }
    }

    pub async fn delete_schedule(&self, id: i64) -> ApiResult<()> {
        let path = format!("schedules/{}", id);
        self.send_empty(self.request(Method::DELETE, &path)).await
    }

    /// Register participants into a time slot, returning the registration id
    pub async fn register(
        &self,
        time_slot_id: i64,
        participants: &[String],
        registration_key: &str,
    ) -> ApiResult<i64> {
        let path = format!("time-slots/{}/registrations", time_slot_id);
        let body = RegistrationRequest {
            participants,
            registration_key: Some(registration_key),
        };
        self.send_id(self.request(Method::POST, &path).json(&body))
            .await
    }

    pub async fn update_registration(&self, id: i64, participants: &[String]) -> ApiResult<()> {
        let path = format!("registrations/{}", id);
        let body = RegistrationRequest {
            participants,
            registration_key: None,
        };
        self.send_empty(self.request(Method::PUT, &path).json(&body))
            .await
    }

    pub async fn delete_registration(&self, id: i64) -> ApiResult<()> {
        let path = format!("registrations/{}", id);
        self.send_empty(self.request(Method::DELETE, &path)).await
    }

    // ============================================
    // Global scoreboard
    // ============================================

    pub async fn list_players(&self) -> ApiResult<Vec<Player>> {
        self.send_json(self.request(Method::GET, "players")).await
    }

    /// User ids the logged in player follows
    pub async fn list_friends(&self) -> ApiResult<Vec<String>> {
        self.send_json(self.request(Method::GET, "players/current/friends"))
            .await
    }

    /// Add a friend; befriending yourself is rejected with a 422
    pub async fn add_friend(&self, user_id: &str) -> ApiResult<String> {
        let path = format!("players/current/friends/{}", urlencoding::encode(user_id));
        self.send_text(self.request(Method::PUT, &path)).await
    }

    pub async fn remove_friend(&self, user_id: &str) -> ApiResult<String> {
        let path = format!("players/current/friends/{}", urlencoding::encode(user_id));
        self.send_text(self.request(Method::DELETE, &path)).await
    }

    /// Trigger a player update.
    ///
    /// A 400 carrying an update result is a warning (e.g. nothing to
    /// update), not a failure.
    pub async fn update_player(&self, name_or_id: &str) -> ApiResult<UpdateResult> {
        let path = format!("players/{}/update", urlencoding::encode(name_or_id));
        let response = self
            .request(Method::POST, &path)
            .send()
            .await
            .map_err(ApiError::from_transport)?;

        let status = response.status();
        let text = response.text().await.map_err(ApiError::from_transport)?;

        if status.is_success() || status == StatusCode::BAD_REQUEST {
            if let Ok(result) = serde_json::from_str::<UpdateResult>(&text) {
                return Ok(result);
            }
        }

        if status.is_success() {
            Err(ApiError::Decode(format!("unexpected update result: {}", text)))
        } else {
            Err(ApiError::from_status(status.as_u16(), &text))
        }
    }
}

#[async_trait]
impl RegistrationBackend for ApiClient {
    async fn fetch_schedule(&self, schedule_id: i64, registration_key: &str) -> Result<Schedule, ApiError> {
        self.get_schedule(schedule_id, Some(registration_key)).await
    }

    async fn register(
        &self,
        time_slot_id: i64,
        participants: &[String],
        registration_key: &str,
    ) -> Result<i64, ApiError> {
        ApiClient::register(self, time_slot_id, participants, registration_key).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ApiClientConfig::default();
        assert_eq!(config.base_url, "http://localhost:5000/api");
        assert!(config.token.is_none());
    }

    #[test]
    fn test_url_joining() {
        let client = ApiClient::new(ApiClientConfig {
            base_url: "http://localhost:5000/api/".to_string(),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(client.url("schedules/3"), "http://localhost:5000/api/schedules/3");
    }

    #[test]
    fn test_config_from_settings_drops_empty_token() {
        let settings = crate::config::ApiConfig {
            token: Some(String::new()),
            request_timeout_secs: 5,
            ..Default::default()
        };
        let config = ApiClientConfig::from(&settings);
        assert!(config.token.is_none());
        assert_eq!(config.request_timeout_ms, 5000);
    }

    #[test]
    fn test_registration_request_body() {
        let participants = vec!["Ava".to_string()];
        let body = RegistrationRequest {
            participants: &participants,
            registration_key: Some("k"),
        };
        let json = serde_json::to_string(&body).unwrap();
        assert_eq!(json, r#"{"participants":["Ava"],"registrationKey":"k"}"#);
    }
}
