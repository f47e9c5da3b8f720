use axum::Json;
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct IndexResponse {
    pub message: String,
    pub version: String,
    pub endpoints: IndexEndpoints,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct IndexEndpoints {
    pub tools: String,
    pub tools_by_category: String,
    pub categories: String,
    pub favorites: String,
    pub health: String,
}

/// API index listing the available endpoints
#[utoipa::path(
    get,
    path = "/",
    responses((status = 200, description = "Endpoint index", body = IndexResponse)),
    tag = "system"
)]
pub async fn index() -> Json<IndexResponse> {
    Json(IndexResponse {
        message: "Welcome to the Toolshelf API".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        endpoints: IndexEndpoints {
            tools: "/api/tools".to_string(),
            tools_by_category: "/api/tools?category=Writing".to_string(),
            categories: "/api/categories".to_string(),
            favorites: "/api/favorites".to_string(),
            health: "/api/health".to_string(),
        },
    })
}
