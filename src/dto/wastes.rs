use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    models::{Listing, ListingSummary},
    response::PageMeta,
};

/// Body of `POST /api/wastes`. Category arrives as text so that a bad value
/// is reported with the other field errors.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct CreateListingRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub quantity: Option<String>,
    pub unit: Option<String>,
    pub location: Option<String>,
    pub price: Option<f64>,
    pub image_url: Option<String>,
}

/// Body of `PUT /api/wastes/{id}`; omitted fields keep their stored value.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateListingRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub quantity: Option<String>,
    pub unit: Option<String>,
    pub location: Option<String>,
    pub price: Option<f64>,
    pub image_url: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ListingPage {
    pub wastes: Vec<ListingSummary>,
    pub pagination: PageMeta,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ListingSaved {
    pub message: String,
    pub waste: Listing,
}
