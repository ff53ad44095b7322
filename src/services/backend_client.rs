//! Backend API client.
//!
//! Provides the HTTP client for the benefit backend REST API: JSON in and
//! out, CSRF header on writes, and status classification into [`AppError`].

use crate::error::AppError;
use crate::models::{ApplicationRecord, BatchCompletionDetails, BatchStatus, BatchStatusChange, User};
use crate::routes::endpoints;
use reqwest::{header, Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Header the backend expects the CSRF token in.
pub const CSRF_HEADER: &str = "X-CSRFToken";

/// Backend client configuration.
#[derive(Debug, Clone)]
pub struct BackendClientConfig {
    /// Base URL of the backend (e.g., `https://benefit.example.fi/api`).
    pub base_url: String,

    /// Request timeout in seconds.
    pub timeout_secs: u64,

    /// Value for the `Accept-Language` header.
    pub locale: String,
}

impl Default for BackendClientConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            timeout_secs: 30,
            locale: "fi".to_string(),
        }
    }
}

/// Backend API client.
///
/// Cheap to clone; clones share the CSRF token.
#[derive(Debug, Clone)]
pub struct BackendClient {
    client: Client,
    config: BackendClientConfig,
    csrf_token: Arc<RwLock<Option<String>>>,
}

/// Query parameters for the simplified application list.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ApplicationsQuery {
    /// Comma-separated status filter.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    /// Ordering, e.g. `-submitted_at`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_by: Option<String>,
}

impl ApplicationsQuery {
    /// Build a query from a status filter and an ordering.
    pub fn new(statuses: &[String], order_by: impl Into<String>) -> Self {
        Self {
            status: Some(statuses.join(",")),
            order_by: Some(order_by.into()),
        }
    }
}

/// Body of the batch status change request.
#[derive(Debug, Clone, Serialize)]
pub struct BatchStatusChangeRequest {
    pub status: BatchStatus,
    #[serde(flatten)]
    pub details: Option<BatchCompletionDetails>,
}

/// Structured rejection body: `{"errorKey": "..."}`.
#[derive(Debug, Deserialize)]
struct ErrorKeyBody {
    #[serde(rename = "errorKey")]
    error_key: String,
}

impl BackendClient {
    /// Create a new backend client.
    pub fn new(config: BackendClientConfig) -> Result<Self, AppError> {
        let mut headers = header::HeaderMap::new();

        let language = header::HeaderValue::from_str(&config.locale)
            .map_err(|_| AppError::invalid_input_field("Invalid locale", "locale"))?;
        headers.insert(header::ACCEPT_LANGUAGE, language);

        let client = Client::builder()
            .default_headers(headers)
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AppError::internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            config,
            csrf_token: Arc::new(RwLock::new(None)),
        })
    }

    /// Install the CSRF token sent with every subsequent write.
    pub async fn set_csrf_token(&self, token: impl Into<String>) {
        *self.csrf_token.write().await = Some(token.into());
    }

    /// Currently installed CSRF token.
    pub async fn csrf_token(&self) -> Option<String> {
        self.csrf_token.read().await.clone()
    }

    /// Get the full URL for an endpoint.
    fn api_url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    /// Attach the CSRF header when a token is known.
    async fn with_csrf(&self, request: RequestBuilder) -> RequestBuilder {
        match self.csrf_token.read().await.as_deref() {
            Some(token) => request.header(CSRF_HEADER, token),
            None => request,
        }
    }

    /// Decode a successful JSON response or turn the failure into an error.
    async fn handle_response<T: DeserializeOwned>(
        &self,
        response: Response,
        endpoint: &str,
    ) -> Result<T, AppError> {
        self.check_status(response, endpoint)
            .await?
            .json::<T>()
            .await
            .map_err(|e| AppError::internal(format!("Failed to parse response: {}", e)))
    }

    /// Handle API response errors, passing successful responses through.
    async fn check_status(&self, response: Response, endpoint: &str) -> Result<Response, AppError> {
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        let status_code = status.as_u16();
        if matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) {
            log::warn!("{} answered {}", endpoint, status_code);
            return Err(AppError::authentication_status(
                format!("Request failed with status code {}", status_code),
                status_code,
            ));
        }

        let body = response.text().await.unwrap_or_default();

        if let Ok(ErrorKeyBody { error_key }) = serde_json::from_str::<ErrorKeyBody>(&body) {
            log::warn!("{} rejected with {} ({})", endpoint, error_key, status_code);
            return Err(AppError::api_rejected(error_key, status_code, endpoint));
        }

        let body_message = serde_json::from_str::<serde_json::Value>(&body)
            .ok()
            .and_then(|v| {
                // Django REST framework puts messages under "detail"
                v.get("detail")
                    .or_else(|| v.get("message"))
                    .map(|m| m.as_str().map(str::to_string).unwrap_or_else(|| m.to_string()))
            });

        let message = match (status, &body_message) {
            (StatusCode::NOT_FOUND, _) => "Resource not found".to_string(),
            (StatusCode::TOO_MANY_REQUESTS, _) => "Rate limit exceeded".to_string(),
            (_, Some(msg)) => msg.clone(),
            _ => format!("Request failed with status code {}", status_code),
        };

        log::warn!("{} failed: {} ({})", endpoint, message, status_code);
        Err(AppError::api_full(message, status_code, endpoint))
    }

    /// List applications through the simplified endpoint.
    pub async fn list_applications(
        &self,
        query: &ApplicationsQuery,
    ) -> Result<Vec<ApplicationRecord>, AppError> {
        let endpoint = endpoints::APPLICATIONS_SIMPLIFIED;
        log::debug!("GET {} {:?}", endpoint, query);
        let response = self
            .client
            .get(self.api_url(endpoint))
            .query(query)
            .send()
            .await?;
        self.handle_response(response, endpoint).await
    }

    /// Get a single application as raw JSON form data.
    pub async fn get_application(&self, id: &str) -> Result<serde_json::Value, AppError> {
        let endpoint = endpoints::application(id);
        let response = self.client.get(self.api_url(&endpoint)).send().await?;
        self.handle_response(response, &endpoint).await
    }

    /// Create an application (no id yet) or update an existing one.
    ///
    /// Returns the stored application as the backend echoes it.
    pub async fn save_application(
        &self,
        id: Option<&str>,
        data: &serde_json::Value,
    ) -> Result<serde_json::Value, AppError> {
        let (endpoint, request) = match id {
            Some(id) => {
                let endpoint = endpoints::application(id);
                let request = self.client.put(self.api_url(&endpoint));
                (endpoint, request)
            }
            None => {
                let endpoint = endpoints::APPLICATIONS.to_string();
                let request = self.client.post(self.api_url(&endpoint));
                (endpoint, request)
            }
        };

        let response = self.with_csrf(request).await.json(data).send().await?;
        self.handle_response(response, &endpoint).await
    }

    /// Delete an application. The backend answers with an empty body.
    pub async fn delete_application(&self, id: &str) -> Result<(), AppError> {
        let endpoint = endpoints::application(id);
        log::debug!("DELETE {}", endpoint);
        let request = self.client.delete(self.api_url(&endpoint));
        let response = self.with_csrf(request).await.send().await?;
        self.check_status(response, &endpoint).await?;
        Ok(())
    }

    /// Fetch the signed-in user.
    ///
    /// `terms` asks the backend to include the terms of service to approve.
    pub async fn get_current_user(&self, terms: bool) -> Result<User, AppError> {
        let endpoint = endpoints::USER_ME;
        let mut request = self.client.get(self.api_url(endpoint));
        if terms {
            request = request.query(&[("terms", "1")]);
        }
        let response = request.send().await?;
        self.handle_response(response, endpoint).await
    }

    /// Change a batch's status, patching the decision details along with it.
    pub async fn change_batch_status(
        &self,
        id: &str,
        body: &BatchStatusChangeRequest,
    ) -> Result<BatchStatusChange, AppError> {
        let endpoint = endpoints::batch_status_change(id);
        log::debug!("PATCH {} -> {}", endpoint, body.status);
        let request = self.client.patch(self.api_url(&endpoint));
        let response = self.with_csrf(request).await.json(body).send().await?;
        self.handle_response(response, &endpoint).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_url_construction() {
        let client = BackendClient::new(BackendClientConfig {
            base_url: "https://benefit.example.fi/api/".to_string(),
            ..Default::default()
        })
        .unwrap();

        assert_eq!(
            client.api_url(endpoints::USER_ME),
            "https://benefit.example.fi/api/v1/users/me/"
        );
    }

    #[test]
    fn test_applications_query_serialization() {
        let query = ApplicationsQuery::new(
            &["draft".to_string(), "additional_information_needed".to_string()],
            "-modified_at",
        );

        let json = serde_json::to_string(&query).unwrap();
        assert!(json.contains("\"status\":\"draft,additional_information_needed\""));
        assert!(json.contains("\"order_by\":\"-modified_at\""));
        assert!(!serde_json::to_string(&ApplicationsQuery::default())
            .unwrap()
            .contains("status"));
    }

    #[test]
    fn test_status_change_body_flattens_details() {
        let body = BatchStatusChangeRequest {
            status: BatchStatus::DecidedAccepted,
            details: Some(BatchCompletionDetails {
                decision_date: "2024-03-05".into(),
                ..Default::default()
            }),
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["status"], "accepted");
        assert_eq!(json["decision_date"], "2024-03-05");

        let bare = BatchStatusChangeRequest {
            status: BatchStatus::SentToTalpa,
            details: None,
        };
        let json = serde_json::to_value(&bare).unwrap();
        assert_eq!(json, serde_json::json!({"status": "sent_to_talpa"}));
    }

    #[tokio::test]
    async fn test_csrf_token_shared_between_clones() {
        let client = BackendClient::new(BackendClientConfig::default()).unwrap();
        let clone = client.clone();
        client.set_csrf_token("token-1").await;
        assert_eq!(clone.csrf_token().await.as_deref(), Some("token-1"));
    }
}
