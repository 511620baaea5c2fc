use uuid::Uuid;

use crate::{
    dto::favorites::{FavoriteAdded, FavoriteCheck},
    error::{AppError, AppResult, conflict_on_unique},
    middleware::auth::AuthUser,
    models::{Favorite, FavoriteListing},
    query::LISTING_COLUMNS,
    response::MessageResponse,
    state::AppState,
};

const ALREADY_FAVORITE: &str = "Listing is already in favorites";

/// Favorited listings with their owner's company, newest favorite first.
pub async fn list_favorites(state: &AppState, user: &AuthUser) -> AppResult<Vec<FavoriteListing>> {
    let sql = format!(
        r#"
        SELECT {LISTING_COLUMNS}, a.company_name, a.location AS user_location, f.created_at AS favorited_at
        FROM favorites f
        JOIN listings l ON l.id = f.listing_id
        JOIN accounts a ON a.id = l.owner_id
        WHERE f.account_id = $1
        ORDER BY f.created_at DESC
        "#
    );
    let favorites = sqlx::query_as::<_, FavoriteListing>(&sql)
        .bind(user.id)
        .fetch_all(&state.pool)
        .await?;
    Ok(favorites)
}

pub async fn add_favorite(
    state: &AppState,
    user: &AuthUser,
    listing_id: Uuid,
) -> AppResult<FavoriteAdded> {
    let listing_exists: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM listings WHERE id = $1")
        .bind(listing_id)
        .fetch_optional(&state.pool)
        .await?;

    if listing_exists.is_none() {
        return Err(AppError::not_found("Listing not found"));
    }

    let existing: Option<(Uuid,)> =
        sqlx::query_as("SELECT id FROM favorites WHERE account_id = $1 AND listing_id = $2")
            .bind(user.id)
            .bind(listing_id)
            .fetch_optional(&state.pool)
            .await?;

    if existing.is_some() {
        return Err(AppError::Conflict(ALREADY_FAVORITE.to_string()));
    }

    let favorite = sqlx::query_as::<_, Favorite>(
        r#"
        INSERT INTO favorites (id, account_id, listing_id)
        VALUES ($1, $2, $3)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user.id)
    .bind(listing_id)
    .fetch_one(&state.pool)
    .await
    .map_err(|err| conflict_on_unique(err, ALREADY_FAVORITE))?;

    tracing::info!(account_id = %user.id, listing_id = %listing_id, "favorite added");

    Ok(FavoriteAdded {
        message: "Added to favorites".to_string(),
        favorite,
    })
}

/// Succeeds whether or not the favorite existed.
pub async fn remove_favorite(
    state: &AppState,
    user: &AuthUser,
    listing_id: Uuid,
) -> AppResult<MessageResponse> {
    let result = sqlx::query("DELETE FROM favorites WHERE account_id = $1 AND listing_id = $2")
        .bind(user.id)
        .bind(listing_id)
        .execute(&state.pool)
        .await?;

    tracing::info!(
        account_id = %user.id,
        listing_id = %listing_id,
        removed = result.rows_affected(),
        "favorite removed"
    );

    Ok(MessageResponse::new("Removed from favorites"))
}

pub async fn check_favorite(
    state: &AppState,
    user: &AuthUser,
    listing_id: Uuid,
) -> AppResult<FavoriteCheck> {
    let (is_favorite,): (bool,) = sqlx::query_as(
        "SELECT EXISTS (SELECT 1 FROM favorites WHERE account_id = $1 AND listing_id = $2)",
    )
    .bind(user.id)
    .bind(listing_id)
    .fetch_one(&state.pool)
    .await?;

    Ok(FavoriteCheck { is_favorite })
}
