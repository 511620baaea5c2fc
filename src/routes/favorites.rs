use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};
use uuid::Uuid;

use crate::{
    dto::favorites::{FavoriteAdded, FavoriteCheck},
    error::AppResult,
    extract::AppPath,
    middleware::auth::AuthUser,
    models::FavoriteListing,
    response::{ErrorBody, MessageResponse},
    services::favorite_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_favorites))
        .route("/{waste_id}", post(add_favorite).delete(remove_favorite))
        .route("/check/{waste_id}", get(check_favorite))
}

#[utoipa::path(
    get,
    path = "/api/favorites",
    responses(
        (status = 200, description = "Favorited listings", body = Vec<FavoriteListing>),
        (status = 401, description = "Unauthenticated", body = ErrorBody)
    ),
    security(("bearer_auth" = [])),
    tag = "Favorites"
)]
pub async fn list_favorites(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<Vec<FavoriteListing>>> {
    let resp = favorite_service::list_favorites(&state, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/favorites/{waste_id}",
    params(
        ("waste_id" = Uuid, Path, description = "Listing ID")
    ),
    responses(
        (status = 200, description = "Added to favorites", body = FavoriteAdded),
        (status = 400, description = "Already in favorites", body = ErrorBody),
        (status = 401, description = "Unauthenticated", body = ErrorBody),
        (status = 404, description = "Listing not found", body = ErrorBody)
    ),
    security(("bearer_auth" = [])),
    tag = "Favorites"
)]
pub async fn add_favorite(
    State(state): State<AppState>,
    user: AuthUser,
    AppPath(waste_id): AppPath<Uuid>,
) -> AppResult<Json<FavoriteAdded>> {
    let resp = favorite_service::add_favorite(&state, &user, waste_id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/favorites/{waste_id}",
    params(
        ("waste_id" = Uuid, Path, description = "Listing ID")
    ),
    responses(
        (status = 200, description = "Removed from favorites", body = MessageResponse),
        (status = 401, description = "Unauthenticated", body = ErrorBody)
    ),
    security(("bearer_auth" = [])),
    tag = "Favorites"
)]
pub async fn remove_favorite(
    State(state): State<AppState>,
    user: AuthUser,
    AppPath(waste_id): AppPath<Uuid>,
) -> AppResult<Json<MessageResponse>> {
    let resp = favorite_service::remove_favorite(&state, &user, waste_id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/favorites/check/{waste_id}",
    params(
        ("waste_id" = Uuid, Path, description = "Listing ID")
    ),
    responses(
        (status = 200, description = "Whether the listing is a favorite", body = FavoriteCheck),
        (status = 401, description = "Unauthenticated", body = ErrorBody)
    ),
    security(("bearer_auth" = [])),
    tag = "Favorites"
)]
pub async fn check_favorite(
    State(state): State<AppState>,
    user: AuthUser,
    AppPath(waste_id): AppPath<Uuid>,
) -> AppResult<Json<FavoriteCheck>> {
    let resp = favorite_service::check_favorite(&state, &user, waste_id).await?;
    Ok(Json(resp))
}
