use uuid::Uuid;

use crate::{
    dto::wastes::{CreateListingRequest, ListingPage, ListingSaved, UpdateListingRequest},
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_owner},
    models::{Category, Listing, ListingDetail, ListingStatus, ListingSummary},
    query::{LISTING_COLUMNS, ListingFilter, MAX_PAGE, PageRequest, build_listing_search},
    response::{MessageResponse, PageMeta},
    routes::params::ListingQuery,
    schema::{Presence, Validator, listing},
    state::AppState,
};

const LISTING_NOT_FOUND: &str = "Listing not found";

pub async fn list_listings(state: &AppState, query: ListingQuery) -> AppResult<ListingPage> {
    let (filter, page) = parse_listing_query(query)?;
    search_listings(state, &filter, page).await
}

/// Validates the query-string filters and turns them into typed criteria.
pub fn parse_listing_query(mut query: ListingQuery) -> AppResult<(ListingFilter, PageRequest)> {
    // An empty `?category=` means no filter, not an invalid category.
    query.category = query.category.filter(|v| !v.trim().is_empty());
    query.status = query.status.filter(|v| !v.trim().is_empty());

    Validator::new(Presence::IfPresent)
        .text(&listing::CATEGORY, query.category.as_deref())
        .text(&listing::STATUS, query.status.as_deref())
        .rule(
            query.page.is_none_or(|page| page <= MAX_PAGE),
            format!("page must be at most {MAX_PAGE}"),
        )
        .finish()?;

    let category = query
        .category
        .as_deref()
        .map(|v| v.trim().parse::<Category>())
        .transpose()
        .map_err(|e| AppError::Validation(vec![e.to_string()]))?;
    let status = query
        .status
        .as_deref()
        .map(|v| v.trim().parse::<ListingStatus>())
        .transpose()
        .map_err(|e| AppError::Validation(vec![e.to_string()]))?;

    let page = query.page_request();
    let filter = ListingFilter::marketplace(category, status, query.search, query.location);
    Ok((filter, page))
}

pub async fn search_listings(
    state: &AppState,
    filter: &ListingFilter,
    page: PageRequest,
) -> AppResult<ListingPage> {
    let search = build_listing_search(filter, page);

    let (total,): (i64,) = search
        .count_params
        .bind_to(sqlx::query_as::<_, (i64,)>(&search.count_sql))
        .fetch_one(&state.pool)
        .await?;

    let wastes: Vec<ListingSummary> = search
        .select_params
        .bind_to(sqlx::query_as::<_, ListingSummary>(&search.select_sql))
        .fetch_all(&state.pool)
        .await?;

    Ok(ListingPage {
        wastes,
        pagination: PageMeta::new(page.page, page.limit, total),
    })
}

pub async fn get_listing(state: &AppState, id: Uuid) -> AppResult<ListingDetail> {
    let sql = format!(
        "SELECT {LISTING_COLUMNS}, a.company_name, a.location AS user_location, a.phone, a.email \
         FROM listings l JOIN accounts a ON a.id = l.owner_id WHERE l.id = $1"
    );
    sqlx::query_as::<_, ListingDetail>(&sql)
        .bind(id)
        .fetch_optional(&state.pool)
        .await?
        .ok_or_else(|| AppError::not_found(LISTING_NOT_FOUND))
}

/// The caller's own listings, any status, newest first.
pub async fn my_listings(state: &AppState, user: &AuthUser) -> AppResult<Vec<Listing>> {
    let listings = sqlx::query_as::<_, Listing>(
        "SELECT * FROM listings WHERE owner_id = $1 ORDER BY created_at DESC, id DESC",
    )
    .bind(user.id)
    .fetch_all(&state.pool)
    .await?;
    Ok(listings)
}

pub async fn create_listing(
    state: &AppState,
    user: &AuthUser,
    payload: CreateListingRequest,
) -> AppResult<ListingSaved> {
    Validator::new(Presence::Enforce)
        .text(&listing::TITLE, payload.title.as_deref())
        .text(&listing::DESCRIPTION, payload.description.as_deref())
        .text(&listing::CATEGORY, payload.category.as_deref())
        .text(&listing::QUANTITY, payload.quantity.as_deref())
        .text(&listing::UNIT, payload.unit.as_deref())
        .text(&listing::LOCATION, payload.location.as_deref())
        .number(&listing::PRICE, payload.price)
        .text(&listing::IMAGE_URL, payload.image_url.as_deref())
        .finish()?;

    let CreateListingRequest {
        title,
        description,
        category,
        quantity,
        unit,
        location,
        price,
        image_url,
    } = payload;
    let (Some(title), Some(description), Some(category), Some(quantity), Some(unit)) =
        (title, description, category, quantity, unit)
    else {
        return Err(AppError::Internal(anyhow::anyhow!(
            "validated listing payload is missing a required field"
        )));
    };
    let category = category
        .parse::<Category>()
        .map_err(|e| AppError::Validation(vec![e.to_string()]))?;

    let listing = sqlx::query_as::<_, Listing>(
        r#"
        INSERT INTO listings
            (id, owner_id, title, description, category, quantity, unit, location, price, image_url, status)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user.id)
    .bind(title)
    .bind(description)
    .bind(category.as_str())
    .bind(quantity)
    .bind(unit)
    .bind(location)
    .bind(price)
    .bind(image_url)
    .bind(ListingStatus::Available.as_str())
    .fetch_one(&state.pool)
    .await?;

    tracing::info!(listing_id = %listing.id, owner_id = %user.id, "listing created");

    Ok(ListingSaved {
        message: "Listing published successfully".to_string(),
        waste: listing,
    })
}

pub async fn update_listing(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateListingRequest,
) -> AppResult<ListingSaved> {
    Validator::new(Presence::IfPresent)
        .text(&listing::TITLE, payload.title.as_deref())
        .text(&listing::DESCRIPTION, payload.description.as_deref())
        .text(&listing::CATEGORY, payload.category.as_deref())
        .text(&listing::QUANTITY, payload.quantity.as_deref())
        .text(&listing::UNIT, payload.unit.as_deref())
        .text(&listing::LOCATION, payload.location.as_deref())
        .number(&listing::PRICE, payload.price)
        .text(&listing::IMAGE_URL, payload.image_url.as_deref())
        .text(&listing::STATUS, payload.status.as_deref())
        .finish()?;

    let existing = sqlx::query_as::<_, Listing>("SELECT * FROM listings WHERE id = $1")
        .bind(id)
        .fetch_optional(&state.pool)
        .await?
        .ok_or_else(|| AppError::not_found(LISTING_NOT_FOUND))?;
    ensure_owner(user, existing.owner_id)?;

    let category = match payload.category.as_deref() {
        Some(raw) => raw
            .parse::<Category>()
            .map_err(|e| AppError::Validation(vec![e.to_string()]))?,
        None => existing.category,
    };
    let status = match payload.status.as_deref() {
        Some(raw) => raw
            .parse::<ListingStatus>()
            .map_err(|e| AppError::Validation(vec![e.to_string()]))?,
        None => existing.status,
    };
    let title = payload.title.unwrap_or(existing.title);
    let description = payload.description.unwrap_or(existing.description);
    let quantity = payload.quantity.unwrap_or(existing.quantity);
    let unit = payload.unit.unwrap_or(existing.unit);
    let location = payload.location.or(existing.location);
    let price = payload.price.or(existing.price);
    let image_url = payload.image_url.or(existing.image_url);

    let listing = sqlx::query_as::<_, Listing>(
        r#"
        UPDATE listings
        SET title = $2, description = $3, category = $4, quantity = $5, unit = $6,
            location = $7, price = $8, image_url = $9, status = $10
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(title)
    .bind(description)
    .bind(category.as_str())
    .bind(quantity)
    .bind(unit)
    .bind(location)
    .bind(price)
    .bind(image_url)
    .bind(status.as_str())
    .fetch_optional(&state.pool)
    .await?
    .ok_or_else(|| AppError::not_found(LISTING_NOT_FOUND))?;

    tracing::info!(listing_id = %listing.id, status = %listing.status, "listing updated");

    Ok(ListingSaved {
        message: "Listing updated successfully".to_string(),
        waste: listing,
    })
}

/// Favorites pointing at the listing go first; that edge does not cascade.
pub async fn delete_listing(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<MessageResponse> {
    let owner: Option<(Uuid,)> = sqlx::query_as("SELECT owner_id FROM listings WHERE id = $1")
        .bind(id)
        .fetch_optional(&state.pool)
        .await?;
    let Some((owner_id,)) = owner else {
        return Err(AppError::not_found(LISTING_NOT_FOUND));
    };
    ensure_owner(user, owner_id)?;

    let favorites = sqlx::query("DELETE FROM favorites WHERE listing_id = $1")
        .bind(id)
        .execute(&state.pool)
        .await?;

    let result = sqlx::query("DELETE FROM listings WHERE id = $1")
        .bind(id)
        .execute(&state.pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::not_found(LISTING_NOT_FOUND));
    }

    tracing::info!(
        listing_id = %id,
        favorites_removed = favorites.rows_affected(),
        "listing deleted"
    );

    Ok(MessageResponse::new("Listing deleted successfully"))
}
