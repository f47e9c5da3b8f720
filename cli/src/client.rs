//! Typed HTTP client for the Toolshelf API.

use std::time::Duration;

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde_json::json;
use thiserror::Error;

use toolshelf_core::catalog::{Tool, ToolId};
use toolshelf_core::error::ApiError;
use toolshelf_core::favorites::FavoriteAck;
use toolshelf_core::toggle::RequestFailure;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request timed out: {0}")]
    Timeout(reqwest::Error),
    #[error("could not reach the API: {0}")]
    Connection(reqwest::Error),
    #[error("API returned {status}: {message}")]
    Api {
        status: StatusCode,
        message: String,
        body: Option<ApiError>,
    },
    #[error("unexpected response body: {0}")]
    Decode(reqwest::Error),
    #[error("invalid API URL: {0}")]
    Url(String),
}

impl ClientError {
    fn from_send(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ClientError::Timeout(err)
        } else {
            ClientError::Connection(err)
        }
    }

    /// Unreachable or timed-out API.
    pub fn is_unreachable(&self) -> bool {
        matches!(self, ClientError::Timeout(_) | ClientError::Connection(_))
    }

    /// Exit codes: 1=client error (4xx), 2=server error (5xx),
    /// 3=connection error, 4=usage error
    pub fn exit_code(&self) -> i32 {
        match self {
            ClientError::Api { status, .. } if status.is_client_error() => 1,
            ClientError::Api { .. } | ClientError::Decode(_) => 2,
            ClientError::Timeout(_) | ClientError::Connection(_) => 3,
            ClientError::Url(_) => 4,
        }
    }

    /// Classify for the favorite toggle state machine.
    pub fn to_request_failure(&self) -> RequestFailure {
        match self {
            ClientError::Api {
                status: StatusCode::CONFLICT,
                body,
                ..
            } => RequestFailure::Conflict(body.as_ref().map(|b| b.message.clone())),
            ClientError::Api {
                status: StatusCode::NOT_FOUND,
                body,
                ..
            } => RequestFailure::NotFound(body.as_ref().map(|b| b.message.clone())),
            _ => RequestFailure::Other,
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        match self {
            ClientError::Api {
                body: Some(body), ..
            } => serde_json::to_value(body).unwrap_or_else(|_| json!({"message": self.to_string()})),
            ClientError::Timeout(_) | ClientError::Connection(_) => json!({
                "error": "connection_error",
                "message": self.to_string(),
                "docs_hint": "Is the API server running? Check TOOLSHELF_API_URL."
            }),
            _ => json!({
                "error": "cli_error",
                "message": self.to_string()
            }),
        }
    }
}

pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ClientError::Connection)?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> Result<reqwest::Url, ClientError> {
        reqwest::Url::parse(&format!("{}{path}", self.base_url))
            .map_err(|e| ClientError::Url(format!("{}{path}: {e}", self.base_url)))
    }

    pub async fn health(&self) -> Result<serde_json::Value, ClientError> {
        self.send(self.http.get(self.url("/health")?)).await
    }

    pub async fn tools(&self, category: Option<&str>) -> Result<Vec<Tool>, ClientError> {
        let mut req = self.http.get(self.url("/tools")?);
        if let Some(category) = category {
            req = req.query(&[("category", category)]);
        }
        self.send(req).await
    }

    pub async fn categories(&self) -> Result<Vec<String>, ClientError> {
        self.send(self.http.get(self.url("/categories")?)).await
    }

    pub async fn favorites(&self) -> Result<Vec<Tool>, ClientError> {
        self.send(self.http.get(self.url("/favorites")?)).await
    }

    pub async fn add_favorite(&self, tool_id: ToolId) -> Result<FavoriteAck, ClientError> {
        let req = self
            .http
            .post(self.url("/favorites")?)
            .json(&json!({ "toolId": tool_id }));
        self.send(req).await
    }

    pub async fn remove_favorite(&self, tool_id: ToolId) -> Result<FavoriteAck, ClientError> {
        self.send(self.http.delete(self.url(&format!("/favorites/{tool_id}"))?))
            .await
    }

    async fn send<T: DeserializeOwned>(&self, req: reqwest::RequestBuilder) -> Result<T, ClientError> {
        let resp = req.send().await.map_err(ClientError::from_send)?;
        let status = resp.status();

        if !status.is_success() {
            let body: Option<ApiError> = resp.json().await.ok();
            let message = body
                .as_ref()
                .map(|b| b.message.clone())
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("error").to_string());
            tracing::debug!(%status, %message, "API request failed");
            return Err(ClientError::Api {
                status,
                message,
                body,
            });
        }

        resp.json().await.map_err(|e| {
            if e.is_timeout() {
                ClientError::Timeout(e)
            } else {
                ClientError::Decode(e)
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use std::net::SocketAddr;

    use axum::http::StatusCode as AxumStatus;
    use axum::routing::{delete, get};
    use axum::{Json, Router};

    use super::*;

    async fn spawn(app: Router) -> SocketAddr {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind ephemeral port");
        let addr = listener.local_addr().expect("local addr");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("server runs");
        });
        addr
    }

    fn stub() -> Router {
        Router::new()
            .route(
                "/api/favorites",
                get(|| async { Json(json!([])) }).post(|| async {
                    (
                        AxumStatus::CONFLICT,
                        Json(json!({
                            "error": "conflict",
                            "message": "ChatGPT is already in your favorites!",
                            "request_id": "r1"
                        })),
                    )
                }),
            )
            .route(
                "/api/favorites/{id}",
                delete(|| async {
                    (
                        AxumStatus::NOT_FOUND,
                        Json(json!({
                            "error": "not_found",
                            "message": "Tool not found in favorites",
                            "request_id": "r2"
                        })),
                    )
                }),
            )
            .route(
                "/api/categories",
                get(|| async { AxumStatus::INTERNAL_SERVER_ERROR }),
            )
    }

    #[tokio::test]
    async fn conflict_becomes_conflict_failure_with_server_message() {
        let addr = spawn(stub()).await;
        let client = ApiClient::new(&format!("http://{addr}/api"), DEFAULT_TIMEOUT).unwrap();

        let err = client.add_favorite(1).await.expect_err("stub always conflicts");
        assert!(matches!(err, ClientError::Api { status: StatusCode::CONFLICT, .. }));
        assert_eq!(err.exit_code(), 1);
        assert_eq!(
            err.to_request_failure(),
            RequestFailure::Conflict(Some("ChatGPT is already in your favorites!".to_string()))
        );
    }

    #[tokio::test]
    async fn not_found_and_server_errors_are_classified() {
        let addr = spawn(stub()).await;
        let client = ApiClient::new(&format!("http://{addr}/api/"), DEFAULT_TIMEOUT).unwrap();
        assert_eq!(client.base_url(), format!("http://{addr}/api"));

        let err = client.remove_favorite(9).await.unwrap_err();
        assert!(matches!(err.to_request_failure(), RequestFailure::NotFound(Some(_))));

        let err = client.categories().await.unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert_eq!(err.to_request_failure(), RequestFailure::Other);

        let favorites = client.favorites().await.expect("empty list decodes");
        assert!(favorites.is_empty());
    }

    #[tokio::test]
    async fn unreachable_api_is_a_connection_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = ApiClient::new(&format!("http://{addr}/api"), DEFAULT_TIMEOUT).unwrap();
        let err = client.tools(None).await.unwrap_err();
        assert!(err.is_unreachable());
        assert_eq!(err.exit_code(), 3);
        assert_eq!(err.to_json()["error"], "connection_error");
    }
}
