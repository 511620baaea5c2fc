pub mod auth_service;
pub mod dashboard_service;
pub mod favorite_service;
pub mod listing_service;
pub mod user_service;
