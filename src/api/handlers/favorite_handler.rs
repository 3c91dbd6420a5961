//! Favorite handlers; every route requires authentication.

use axum::{
    extract::State,
    response::Json,
    routing::{delete, get},
    Router,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::api::extractors::{ApiPath, ValidatedJson};
use crate::api::middleware::{require_auth, CurrentUser};
use crate::api::AppState;
use crate::domain::FavoriteDetails;
use crate::errors::AppResult;
use crate::types::{Created, SuccessResponse};

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddFavoriteRequest {
    #[schema(example = 7)]
    pub tool_id: i32,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteCreatedResponse {
    pub message: String,
    pub favorite_id: i32,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RemovedFavorite {
    pub favorite_id: i32,
}

/// Routes under `/api/favorites`
pub fn favorite_routes(state: AppState) -> Router<AppState> {
    require_auth(
        Router::new()
            .route("/", get(list_favorites).post(add_favorite))
            .route("/:id", delete(remove_favorite)),
        state,
    )
}

/// Bookmark a tool
#[utoipa::path(
    post,
    path = "/api/favorites",
    tag = "Favorites",
    security(("bearer_auth" = [])),
    request_body = AddFavoriteRequest,
    responses(
        (status = 201, description = "Favorite added", body = FavoriteCreatedResponse),
        (status = 404, description = "Tool not found"),
        (status = 409, description = "Already a favorite")
    )
)]
pub async fn add_favorite(
    State(state): State<AppState>,
    current: CurrentUser,
    ValidatedJson(payload): ValidatedJson<AddFavoriteRequest>,
) -> AppResult<Created<FavoriteCreatedResponse>> {
    let favorite = state
        .services
        .favorites()
        .add_favorite(current.id, payload.tool_id)
        .await?;

    Ok(Created(FavoriteCreatedResponse {
        message: "Tool added to favorites".to_string(),
        favorite_id: favorite.id,
    }))
}

/// The caller's favorites with tool details
#[utoipa::path(
    get,
    path = "/api/favorites",
    tag = "Favorites",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Favorites", body = [FavoriteDetails]),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn list_favorites(
    State(state): State<AppState>,
    current: CurrentUser,
) -> AppResult<Json<Vec<FavoriteDetails>>> {
    Ok(Json(
        state.services.favorites().list_favorites(current.id).await?,
    ))
}

#[utoipa::path(
    delete,
    path = "/api/favorites/{id}",
    tag = "Favorites",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Favorite ID")),
    responses(
        (status = 200, description = "Favorite removed"),
        (status = 403, description = "Not your favorite"),
        (status = 404, description = "Favorite not found")
    )
)]
pub async fn remove_favorite(
    State(state): State<AppState>,
    current: CurrentUser,
    ApiPath(id): ApiPath<i32>,
) -> AppResult<Json<SuccessResponse<RemovedFavorite>>> {
    state
        .services
        .favorites()
        .remove_favorite(current.id, id)
        .await?;

    Ok(Json(SuccessResponse::with_message(
        RemovedFavorite { favorite_id: id },
        "Tool removed from favorites",
    )))
}
