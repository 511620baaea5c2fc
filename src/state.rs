use axum::extract::FromRef;

use crate::{
    config::AppConfig,
    db::{DbPool, OrmConn, create_orm_conn},
    token::JwtKeys,
};

/// Process-wide handles, built once at startup and cloned into each request.
#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub orm: OrmConn,
    pub keys: JwtKeys,
}

impl AppState {
    pub fn new(pool: DbPool, config: &AppConfig) -> Self {
        let orm = create_orm_conn(&pool);
        Self {
            pool,
            orm,
            keys: JwtKeys::new(&config.jwt_secret),
        }
    }
}

impl FromRef<AppState> for JwtKeys {
    fn from_ref(state: &AppState) -> Self {
        state.keys.clone()
    }
}
