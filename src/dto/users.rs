use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::Account;

/// Replaces the caller's profile; absent optional fields are cleared.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateProfileRequest {
    pub company_name: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProfileUpdated {
    pub message: String,
    pub user: Account,
}
