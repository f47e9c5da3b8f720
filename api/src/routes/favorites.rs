use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{delete, get};
use axum::{Json, Router};
use utoipa::ToSchema;

use toolshelf_core::catalog::Tool;
use toolshelf_core::error::ApiError;
use toolshelf_core::favorites::{FavoriteAck, parse_tool_id_str, parse_tool_id_value};

use crate::error::AppError;
use crate::extract::AppJson;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/favorites", get(list_favorites).post(add_favorite))
        .route("/favorites/{id}", delete(remove_favorite))
}

/// Documented body of POST /api/favorites.
///
/// The handler reads the body as raw JSON instead, so that a non-object
/// body or a missing, null, string or fractional id is reported as a
/// validation error on `toolId` rather than a deserialization failure.
#[derive(Debug, ToSchema)]
pub struct AddFavoriteRequest {
    #[schema(rename = "toolId")]
    pub tool_id: u32,
}

/// Favorited tools, in the order they were added
#[utoipa::path(
    get,
    path = "/api/favorites",
    responses(
        (status = 200, description = "Favorited tools", body = Vec<Tool>),
        (status = 500, description = "Unexpected fault", body = ApiError)
    ),
    tag = "favorites"
)]
pub async fn list_favorites(State(state): State<AppState>) -> Json<Vec<Tool>> {
    Json(state.favorites.list())
}

/// Mark a tool as favorite
///
/// Adding a tool twice is rejected with 409; the favorite set is not changed.
#[utoipa::path(
    post,
    path = "/api/favorites",
    request_body = AddFavoriteRequest,
    responses(
        (status = 201, description = "Favorite added", body = FavoriteAck),
        (status = 400, description = "Missing or invalid toolId", body = ApiError),
        (status = 404, description = "Unknown tool", body = ApiError),
        (status = 409, description = "Tool is already favorited", body = ApiError)
    ),
    tag = "favorites"
)]
pub async fn add_favorite(
    State(state): State<AppState>,
    AppJson(body): AppJson<serde_json::Value>,
) -> Result<(StatusCode, Json<FavoriteAck>), AppError> {
    let tool_id = parse_tool_id_value(body.as_object().and_then(|o| o.get("toolId")))?;
    let ack = state.favorites.add(tool_id)?;
    Ok((StatusCode::CREATED, Json(ack)))
}

/// Remove a tool from favorites
#[utoipa::path(
    delete,
    path = "/api/favorites/{id}",
    params(("id" = u32, Path, description = "Tool ID")),
    responses(
        (status = 200, description = "Favorite removed", body = FavoriteAck),
        (status = 400, description = "Non-numeric id", body = ApiError),
        (status = 404, description = "Tool is not favorited", body = ApiError)
    ),
    tag = "favorites"
)]
pub async fn remove_favorite(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<FavoriteAck>, AppError> {
    let tool_id = parse_tool_id_str(&raw_id)?;
    let ack = state.favorites.remove(tool_id)?;
    Ok(Json(ack))
}
