pub mod auth;
pub mod dashboard;
pub mod favorites;
pub mod users;
pub mod wastes;
