use crate::{
    dto::dashboard::{CategoryCount, DashboardStats, FavoriteStats, MarketplaceStats, OwnListingStats},
    error::AppResult,
    middleware::auth::AuthUser,
    state::AppState,
};

/// Per-account and marketplace-wide counters. Category counts cover available
/// listings only, so they add up to `marketplace.available_listings`.
pub async fn dashboard_stats(state: &AppState, user: &AuthUser) -> AppResult<DashboardStats> {
    let my_listings = sqlx::query_as::<_, OwnListingStats>(
        r#"
        SELECT
            COUNT(*) AS total,
            COUNT(*) FILTER (WHERE status = 'available') AS available,
            COUNT(*) FILTER (WHERE status = 'reserved') AS reserved,
            COUNT(*) FILTER (WHERE status = 'sold') AS sold
        FROM listings
        WHERE owner_id = $1
        "#,
    )
    .bind(user.id)
    .fetch_one(&state.pool)
    .await?;

    let (favorite_total,): (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM favorites WHERE account_id = $1")
            .bind(user.id)
            .fetch_one(&state.pool)
            .await?;

    let marketplace = sqlx::query_as::<_, MarketplaceStats>(
        r#"
        SELECT
            COUNT(*) AS total_listings,
            COUNT(DISTINCT owner_id) AS total_accounts,
            COUNT(*) FILTER (WHERE status = 'available') AS available_listings
        FROM listings
        "#,
    )
    .fetch_one(&state.pool)
    .await?;

    let categories = sqlx::query_as::<_, CategoryCount>(
        r#"
        SELECT category, COUNT(*) AS count
        FROM listings
        WHERE status = 'available'
        GROUP BY category
        ORDER BY count DESC, category ASC
        "#,
    )
    .fetch_all(&state.pool)
    .await?;

    tracing::debug!(account_id = %user.id, "dashboard stats computed");

    Ok(DashboardStats {
        my_listings,
        favorites: FavoriteStats {
            total: favorite_total,
        },
        marketplace,
        categories,
    })
}
