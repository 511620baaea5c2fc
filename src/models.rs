use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Error)]
#[error("unknown {kind} '{value}'")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Textile,
    Wood,
    Plastic,
    Metal,
    Paper,
    Glass,
    Organic,
    Electronic,
    Other,
}

impl Category {
    pub const ALL: [Category; 9] = [
        Category::Textile,
        Category::Wood,
        Category::Plastic,
        Category::Metal,
        Category::Paper,
        Category::Glass,
        Category::Organic,
        Category::Electronic,
        Category::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Textile => "textile",
            Category::Wood => "wood",
            Category::Plastic => "plastic",
            Category::Metal => "metal",
            Category::Paper => "paper",
            Category::Glass => "glass",
            Category::Organic => "organic",
            Category::Electronic => "electronic",
            Category::Other => "other",
        }
    }
}

impl FromStr for Category {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| UnknownVariant {
                kind: "category",
                value: s.to_string(),
            })
    }
}

impl TryFrom<String> for Category {
    type Error = UnknownVariant;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Any status may follow any other; there is no transition table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ListingStatus {
    #[default]
    Available,
    Reserved,
    Sold,
}

impl ListingStatus {
    pub const ALL: [ListingStatus; 3] = [
        ListingStatus::Available,
        ListingStatus::Reserved,
        ListingStatus::Sold,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ListingStatus::Available => "available",
            ListingStatus::Reserved => "reserved",
            ListingStatus::Sold => "sold",
        }
    }
}

impl FromStr for ListingStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ListingStatus::ALL
            .into_iter()
            .find(|st| st.as_str() == s)
            .ok_or_else(|| UnknownVariant {
                kind: "status",
                value: s.to_string(),
            })
    }
}

impl TryFrom<String> for ListingStatus {
    type Error = UnknownVariant;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for ListingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, ToSchema, sqlx::FromRow)]
pub struct Account {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    #[schema(ignore)]
    pub password_hash: String,
    pub company_name: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Account as shown to other companies: no email.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PublicProfile {
    pub id: Uuid,
    pub company_name: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Account> for PublicProfile {
    fn from(account: Account) -> Self {
        Self {
            id: account.id,
            company_name: account.company_name,
            description: account.description,
            location: account.location,
            phone: account.phone,
            website: account.website,
            created_at: account.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema, sqlx::FromRow)]
pub struct Listing {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub title: String,
    pub description: String,
    #[sqlx(try_from = "String")]
    pub category: Category,
    pub quantity: String,
    pub unit: String,
    pub location: Option<String>,
    pub price: Option<f64>,
    pub image_url: Option<String>,
    #[sqlx(try_from = "String")]
    pub status: ListingStatus,
    pub created_at: DateTime<Utc>,
}

/// Listing row joined with its owner's company, as returned by search.
#[derive(Debug, Clone, Serialize, ToSchema, sqlx::FromRow)]
pub struct ListingSummary {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub listing: Listing,
    pub company_name: String,
    pub user_location: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema, sqlx::FromRow)]
pub struct ListingDetail {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub listing: Listing,
    pub company_name: String,
    pub user_location: Option<String>,
    pub phone: Option<String>,
    pub email: String,
}

#[derive(Debug, Clone, Serialize, ToSchema, sqlx::FromRow)]
pub struct FavoriteListing {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub listing: Listing,
    pub company_name: String,
    pub user_location: Option<String>,
    pub favorited_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, ToSchema, sqlx::FromRow)]
pub struct Favorite {
    pub id: Uuid,
    pub account_id: Uuid,
    pub listing_id: Uuid,
    pub created_at: DateTime<Utc>,
}
