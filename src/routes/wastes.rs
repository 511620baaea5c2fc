use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::get,
};
use uuid::Uuid;

use crate::{
    dto::wastes::{CreateListingRequest, ListingPage, ListingSaved, UpdateListingRequest},
    error::AppResult,
    extract::{AppJson, AppPath, AppQuery},
    middleware::auth::AuthUser,
    models::{Listing, ListingDetail},
    response::{ErrorBody, MessageResponse},
    routes::params::ListingQuery,
    services::listing_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_wastes).post(create_waste))
        .route("/my/wastes", get(my_wastes))
        .route(
            "/{id}",
            get(get_waste).put(update_waste).delete(delete_waste),
        )
}

#[utoipa::path(
    get,
    path = "/api/wastes",
    params(ListingQuery),
    responses(
        (status = 200, description = "One page of listings", body = ListingPage),
        (status = 400, description = "Invalid filter", body = ErrorBody)
    ),
    tag = "Wastes"
)]
pub async fn list_wastes(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<ListingQuery>,
) -> AppResult<Json<ListingPage>> {
    let resp = listing_service::list_listings(&state, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/wastes/{id}",
    params(
        ("id" = Uuid, Path, description = "Listing ID")
    ),
    responses(
        (status = 200, description = "Listing with owner contact", body = ListingDetail),
        (status = 404, description = "Listing not found", body = ErrorBody)
    ),
    tag = "Wastes"
)]
pub async fn get_waste(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> AppResult<Json<ListingDetail>> {
    let resp = listing_service::get_listing(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/wastes/my/wastes",
    responses(
        (status = 200, description = "The caller's listings", body = Vec<Listing>),
        (status = 401, description = "Unauthenticated", body = ErrorBody)
    ),
    security(("bearer_auth" = [])),
    tag = "Wastes"
)]
pub async fn my_wastes(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<Vec<Listing>>> {
    let resp = listing_service::my_listings(&state, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/wastes",
    request_body = CreateListingRequest,
    responses(
        (status = 201, description = "Listing published", body = ListingSaved),
        (status = 400, description = "Invalid data", body = ErrorBody),
        (status = 401, description = "Unauthenticated", body = ErrorBody)
    ),
    security(("bearer_auth" = [])),
    tag = "Wastes"
)]
pub async fn create_waste(
    State(state): State<AppState>,
    user: AuthUser,
    AppJson(payload): AppJson<CreateListingRequest>,
) -> AppResult<(StatusCode, Json<ListingSaved>)> {
    let resp = listing_service::create_listing(&state, &user, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    put,
    path = "/api/wastes/{id}",
    params(
        ("id" = Uuid, Path, description = "Listing ID")
    ),
    request_body = UpdateListingRequest,
    responses(
        (status = 200, description = "Listing updated", body = ListingSaved),
        (status = 400, description = "Invalid data", body = ErrorBody),
        (status = 401, description = "Unauthenticated", body = ErrorBody),
        (status = 403, description = "Caller does not own the listing", body = ErrorBody),
        (status = 404, description = "Listing not found", body = ErrorBody)
    ),
    security(("bearer_auth" = [])),
    tag = "Wastes"
)]
pub async fn update_waste(
    State(state): State<AppState>,
    user: AuthUser,
    AppPath(id): AppPath<Uuid>,
    AppJson(payload): AppJson<UpdateListingRequest>,
) -> AppResult<Json<ListingSaved>> {
    let resp = listing_service::update_listing(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/wastes/{id}",
    params(
        ("id" = Uuid, Path, description = "Listing ID")
    ),
    responses(
        (status = 200, description = "Listing and its favorites deleted", body = MessageResponse),
        (status = 401, description = "Unauthenticated", body = ErrorBody),
        (status = 403, description = "Caller does not own the listing", body = ErrorBody),
        (status = 404, description = "Listing not found", body = ErrorBody)
    ),
    security(("bearer_auth" = [])),
    tag = "Wastes"
)]
pub async fn delete_waste(
    State(state): State<AppState>,
    user: AuthUser,
    AppPath(id): AppPath<Uuid>,
) -> AppResult<Json<MessageResponse>> {
    let resp = listing_service::delete_listing(&state, &user, id).await?;
    Ok(Json(resp))
}
