use axum::{Router, routing::get};

use crate::state::AppState;

pub mod auth;
pub mod dashboard;
pub mod doc;
pub mod favorites;
pub mod health;
pub mod params;
pub mod users;
pub mod wastes;

// Build the API router without binding state; it will be provided at the top level.
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .route("/", get(health::api_info))
        .nest("/auth", auth::router())
        .nest("/users", users::router())
        .nest("/wastes", wastes::router())
        .nest("/favorites", favorites::router())
        .nest("/dashboard", dashboard::router())
}
