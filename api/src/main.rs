use axum::Router;
use axum::routing::get;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use toolshelf_core::catalog::Catalog;

mod config;
mod error;
mod extract;
mod middleware;
mod routes;
mod state;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Toolshelf API",
        version = "0.1.0",
        description = "Browse a catalog of AI tools and keep a list of favorites."
    ),
    paths(
        routes::index::index,
        routes::health::health_check,
        routes::tools::list_tools,
        routes::tools::list_categories,
        routes::favorites::list_favorites,
        routes::favorites::add_favorite,
        routes::favorites::remove_favorite,
    ),
    components(schemas(
        routes::index::IndexResponse,
        routes::index::IndexEndpoints,
        routes::health::HealthResponse,
        routes::health::HealthStats,
        routes::favorites::AddFavoriteRequest,
        toolshelf_core::catalog::Tool,
        toolshelf_core::catalog::Pricing,
        toolshelf_core::favorites::FavoriteAck,
        toolshelf_core::error::ApiError,
    ))
)]
struct ApiDoc;

/// Assemble the full application: docs, index, `/api` routes and the
/// tracing/CORS stack.
pub(crate) fn build_app(state: state::AppState, config: &config::ServerConfig) -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .route("/", get(routes::index::index))
        .nest("/api", routes::api_router())
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(middleware::cors::build_cors_layer(&config.cors_origins)),
        )
        .with_state(state)
}

#[tokio::main]
async fn main() {
    // Load .env if present (dev only)
    let _ = dotenvy::dotenv();

    // Structured JSON logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "toolshelf_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    let config = config::ServerConfig::from_env();
    let app_state = state::AppState::new(Catalog::seed());
    let tool_count = app_state.catalog.len();
    let app = build_app(app_state, &config);

    let addr = config.bind_addr();
    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(%addr, error = %e, "Failed to bind listener");
            std::process::exit(1);
        }
    };
    tracing::info!(%addr, tool_count, "Toolshelf API listening");

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!(error = %e, "Server error");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use utoipa::OpenApi;

    use super::ApiDoc;

    #[test]
    fn openapi_documents_every_route() {
        let doc = ApiDoc::openapi();
        for path in [
            "/",
            "/api/health",
            "/api/tools",
            "/api/categories",
            "/api/favorites",
            "/api/favorites/{id}",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }
}
