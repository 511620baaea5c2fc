use serde::Serialize;
use utoipa::ToSchema;

use crate::models::Category;

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, ToSchema, sqlx::FromRow)]
pub struct OwnListingStats {
    pub total: i64,
    pub available: i64,
    pub reserved: i64,
    pub sold: i64,
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct FavoriteStats {
    pub total: i64,
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, ToSchema, sqlx::FromRow)]
pub struct MarketplaceStats {
    #[serde(rename = "totalWastes")]
    pub total_listings: i64,
    #[serde(rename = "totalUsers")]
    pub total_accounts: i64,
    #[serde(rename = "availableWastes")]
    pub available_listings: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema, sqlx::FromRow)]
pub struct CategoryCount {
    #[sqlx(try_from = "String")]
    pub category: Category,
    pub count: i64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DashboardStats {
    #[serde(rename = "myWastes")]
    pub my_listings: OwnListingStats,
    pub favorites: FavoriteStats,
    pub marketplace: MarketplaceStats,
    pub categories: Vec<CategoryCount>,
}
