use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use utoipa::IntoParams;

use toolshelf_core::catalog::Tool;

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/tools", get(list_tools))
        .route("/categories", get(list_categories))
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ToolsQuery {
    /// Category to filter by (case-insensitive)
    pub category: Option<String>,
}

/// List all tools, or only those in one category
///
/// Malformed query strings are ignored and the full catalog is returned.
#[utoipa::path(
    get,
    path = "/api/tools",
    params(ToolsQuery),
    responses(
        (status = 200, description = "Tools in seed order", body = Vec<Tool>),
        (status = 500, description = "Unexpected fault", body = toolshelf_core::error::ApiError)
    ),
    tag = "catalog"
)]
pub async fn list_tools(
    State(state): State<AppState>,
    query: Result<Query<ToolsQuery>, QueryRejection>,
) -> Json<Vec<Tool>> {
    let category = match query {
        Ok(Query(q)) => q.category,
        Err(rejection) => {
            tracing::debug!(error = %rejection, "Ignoring malformed tools query");
            None
        }
    };
    Json(state.catalog.list_tools(category.as_deref()))
}

/// Distinct categories, sorted ascending
#[utoipa::path(
    get,
    path = "/api/categories",
    responses(
        (status = 200, description = "Sorted category names", body = Vec<String>),
        (status = 500, description = "Unexpected fault", body = toolshelf_core::error::ApiError)
    ),
    tag = "catalog"
)]
pub async fn list_categories(State(state): State<AppState>) -> Json<Vec<String>> {
    Json(state.catalog.categories())
}
