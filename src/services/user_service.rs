use chrono::Utc;
use sea_orm::{ActiveModelTrait, EntityTrait, Set};
use uuid::Uuid;

use crate::{
    dto::users::{ProfileUpdated, UpdateProfileRequest},
    entity::{
        Accounts,
        accounts::{ActiveModel, Model as AccountModel},
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::{Account, PublicProfile},
    schema::{Presence, Validator, account},
    state::AppState,
};

const ACCOUNT_NOT_FOUND: &str = "User not found";

pub async fn get_profile(state: &AppState, user: &AuthUser) -> AppResult<Account> {
    let model = Accounts::find_by_id(user.id)
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::not_found(ACCOUNT_NOT_FOUND))?;
    Ok(account_from_entity(model))
}

pub async fn update_profile(
    state: &AppState,
    user: &AuthUser,
    payload: UpdateProfileRequest,
) -> AppResult<ProfileUpdated> {
    Validator::new(Presence::Enforce)
        .text(&account::COMPANY_NAME, payload.company_name.as_deref())
        .text(&account::DESCRIPTION, payload.description.as_deref())
        .text(&account::LOCATION, payload.location.as_deref())
        .text(&account::PHONE, payload.phone.as_deref())
        .text(&account::WEBSITE, payload.website.as_deref())
        .finish()?;

    let existing = Accounts::find_by_id(user.id)
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::not_found(ACCOUNT_NOT_FOUND))?;

    let mut active: ActiveModel = existing.into();
    if let Some(company_name) = payload.company_name {
        active.company_name = Set(company_name);
    }
    active.description = Set(payload.description);
    active.location = Set(payload.location);
    active.phone = Set(payload.phone);
    active.website = Set(payload.website);

    let model = active.update(&state.orm).await?;
    tracing::info!(account_id = %model.id, "profile updated");

    Ok(ProfileUpdated {
        message: "Profile updated successfully".to_string(),
        user: account_from_entity(model),
    })
}

pub async fn public_profile(state: &AppState, id: Uuid) -> AppResult<PublicProfile> {
    let model = Accounts::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::not_found(ACCOUNT_NOT_FOUND))?;
    Ok(account_from_entity(model).into())
}

fn account_from_entity(model: AccountModel) -> Account {
    Account {
        id: model.id,
        email: model.email,
        password_hash: model.password_hash,
        company_name: model.company_name,
        description: model.description,
        location: model.location,
        phone: model.phone,
        website: model.website,
        created_at: model.created_at.with_timezone(&Utc),
    }
}
