use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

use crate::query::PageRequest;

/// Query string of `GET /api/wastes`. Category and status stay text until
/// validated so a bad value produces a field message, not a parse failure.
#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListingQuery {
    /// One of the listing categories.
    pub category: Option<String>,
    /// available, reserved or sold; defaults to available.
    pub status: Option<String>,
    /// Substring of title or description.
    pub search: Option<String>,
    /// Substring of the listing's or the owner's location.
    pub location: Option<String>,
    /// Page number, default 1.
    pub page: Option<i64>,
    /// Items per page, default 12, at most 100.
    pub limit: Option<i64>,
}

impl ListingQuery {
    pub fn page_request(&self) -> PageRequest {
        PageRequest::new(self.page, self.limit)
    }
}
