use argon2::{
    Argon2, PasswordHasher,
    password_hash::{PasswordHash, PasswordVerifier, SaltString},
};
use password_hash::rand_core::OsRng;
use uuid::Uuid;

use crate::{
    dto::auth::{AuthResponse, LoginRequest, RegisterRequest},
    error::{AppError, AppResult, conflict_on_unique},
    middleware::auth::AuthUser,
    models::Account,
    schema::{Presence, Validator, account},
    state::AppState,
};

const DUPLICATE_EMAIL: &str = "Email already registered";

pub async fn register_user(
    state: &AppState,
    payload: RegisterRequest,
) -> AppResult<AuthResponse> {
    Validator::new(Presence::Enforce)
        .text(&account::EMAIL, payload.email.as_deref())
        .text(&account::PASSWORD, payload.password.as_deref())
        .text(&account::COMPANY_NAME, payload.company_name.as_deref())
        .text(&account::DESCRIPTION, payload.description.as_deref())
        .text(&account::LOCATION, payload.location.as_deref())
        .text(&account::PHONE, payload.phone.as_deref())
        .text(&account::WEBSITE, payload.website.as_deref())
        .finish()?;

    let RegisterRequest {
        email,
        password,
        company_name,
        description,
        location,
        phone,
        website,
    } = payload;
    let (Some(email), Some(password), Some(company_name)) = (email, password, company_name) else {
        return Err(AppError::Internal(anyhow::anyhow!(
            "validated register payload is missing a required field"
        )));
    };

    let exist: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM accounts WHERE email = $1")
        .bind(email.as_str())
        .fetch_optional(&state.pool)
        .await?;

    if exist.is_some() {
        return Err(AppError::Conflict(DUPLICATE_EMAIL.to_string()));
    }

    let password_hash = hash_password(password).await?;

    let account: Account = sqlx::query_as(
        r#"
        INSERT INTO accounts (id, email, password_hash, company_name, description, location, phone, website)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(email.as_str())
    .bind(password_hash)
    .bind(company_name.as_str())
    .bind(description)
    .bind(location)
    .bind(phone)
    .bind(website)
    .fetch_one(&state.pool)
    .await
    .map_err(|err| conflict_on_unique(err, DUPLICATE_EMAIL))?;

    let token = state.keys.issue(&identity_of(&account))?;
    tracing::info!(account_id = %account.id, "account registered");

    Ok(AuthResponse {
        message: "User registered successfully".to_string(),
        token,
        user: account,
    })
}

pub async fn login_user(state: &AppState, payload: LoginRequest) -> AppResult<AuthResponse> {
    Validator::new(Presence::Enforce)
        .text(&account::EMAIL, payload.email.as_deref())
        .text(&required_password(), payload.password.as_deref())
        .finish()?;

    let LoginRequest { email, password } = payload;
    let (Some(email), Some(password)) = (email, password) else {
        return Err(AppError::InvalidCredentials);
    };

    let account: Option<Account> =
        sqlx::query_as::<_, Account>("SELECT * FROM accounts WHERE email = $1")
            .bind(email.as_str())
            .fetch_optional(&state.pool)
            .await?;

    let Some(account) = account else {
        tracing::info!("login rejected: unknown email");
        return Err(AppError::InvalidCredentials);
    };

    if !verify_password(password, account.password_hash.clone()).await? {
        tracing::info!(account_id = %account.id, "login rejected: wrong password");
        return Err(AppError::InvalidCredentials);
    }

    let token = state.keys.issue(&identity_of(&account))?;
    tracing::info!(account_id = %account.id, "account logged in");

    Ok(AuthResponse {
        message: "Login successful".to_string(),
        token,
        user: account,
    })
}

/// Login only needs a password to be present; the length rule applies at registration.
fn required_password() -> crate::schema::Field {
    let mut field = account::PASSWORD;
    field.min_chars = 1;
    field
}

pub fn identity_of(account: &Account) -> AuthUser {
    AuthUser {
        id: account.id,
        email: account.email.clone(),
        company_name: account.company_name.clone(),
    }
}

/// Argon2 with a random salt, run off the async workers.
pub async fn hash_password(password: String) -> AppResult<String> {
    tokio::task::spawn_blocking(move || {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))
    })
    .await
    .map_err(|e| AppError::Internal(anyhow::anyhow!(e)))?
}

pub async fn verify_password(password: String, stored_hash: String) -> AppResult<bool> {
    tokio::task::spawn_blocking(move || {
        let parsed_hash = PasswordHash::new(&stored_hash)
            .map_err(|_| AppError::Internal(anyhow::anyhow!("Invalid password hash")))?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    })
    .await
    .map_err(|e| AppError::Internal(anyhow::anyhow!(e)))?
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn hashed_password_verifies() {
        let hash = hash_password("correct horse".into()).await.unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("correct horse".into(), hash.clone()).await.unwrap());
        assert!(!verify_password("wrong horse".into(), hash).await.unwrap());
    }

    #[tokio::test]
    async fn same_password_gets_a_fresh_salt() {
        let a = hash_password("secret1".into()).await.unwrap();
        let b = hash_password("secret1".into()).await.unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn login_password_rule_only_requires_presence() {
        assert!(required_password().check_text(Some("x")).is_none());
        assert!(required_password().check_text(None).is_some());
    }
}
