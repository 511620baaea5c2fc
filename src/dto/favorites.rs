use serde::Serialize;
use utoipa::ToSchema;

use crate::models::Favorite;

#[derive(Debug, Serialize, ToSchema)]
pub struct FavoriteAdded {
    pub message: String,
    pub favorite: Favorite,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct FavoriteCheck {
    #[serde(rename = "isFavorite")]
    pub is_favorite: bool,
}
