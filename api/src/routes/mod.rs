use axum::Router;

use crate::state::AppState;

pub mod favorites;
pub mod health;
pub mod index;
pub mod tools;

/// Everything served under the `/api` prefix.
pub fn api_router() -> Router<AppState> {
    Router::new()
        .merge(tools::router())
        .merge(favorites::router())
        .merge(health::router())
}

#[cfg(test)]
pub(crate) mod test_support {
    use axum::Router;
    use axum::body::{Body, to_bytes};
    use axum::http::{Method, Request, StatusCode};
    use tower::ServiceExt;
    use toolshelf_core::catalog::Catalog;

    use crate::config::ServerConfig;
    use crate::state::AppState;

    pub fn seeded_app() -> (Router, AppState) {
        let state = AppState::new(Catalog::seed());
        let config = ServerConfig {
            port: 0,
            cors_origins: Vec::new(),
        };
        (crate::build_app(state.clone(), &config), state)
    }

    /// Send one request through a clone of `app` and decode the JSON body.
    pub async fn send(
        app: &Router,
        method: Method,
        uri: &str,
        body: Option<&str>,
    ) -> (StatusCode, serde_json::Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if body.is_some() {
            builder = builder.header("content-type", "application/json");
        }
        let request = builder
            .body(body.map(|b| Body::from(b.to_string())).unwrap_or_else(Body::empty))
            .expect("request should build");

        let response = app
            .clone()
            .oneshot(request)
            .await
            .expect("request should succeed");
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body should be readable");
        let json = if bytes.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("body should be JSON")
        };
        (status, json)
    }
}
