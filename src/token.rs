use std::sync::Arc;

use chrono::{Duration, Utc};
use jsonwebtoken::{
    DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use uuid::Uuid;

use crate::{
    dto::auth::Claims,
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
};

/// Tokens are valid for seven days from issuance.
pub const TOKEN_TTL_DAYS: i64 = 7;

/// HS256 keys derived once from the server secret.
#[derive(Clone)]
pub struct JwtKeys {
    inner: Arc<KeyPair>,
}

struct KeyPair {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl JwtKeys {
    pub fn new(secret: &str) -> Self {
        Self {
            inner: Arc::new(KeyPair {
                encoding: EncodingKey::from_secret(secret.as_bytes()),
                decoding: DecodingKey::from_secret(secret.as_bytes()),
            }),
        }
    }

    pub fn issue(&self, user: &AuthUser) -> AppResult<String> {
        self.issue_with_ttl(user, Duration::days(TOKEN_TTL_DAYS))
    }

    pub fn issue_with_ttl(&self, user: &AuthUser, ttl: Duration) -> AppResult<String> {
        let now = Utc::now();
        let expiration = now
            .checked_add_signed(ttl)
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to set expiration")))?;

        let claims = Claims {
            sub: user.id.to_string(),
            email: user.email.clone(),
            company_name: user.company_name.clone(),
            iat: now.timestamp(),
            exp: expiration.timestamp(),
        };

        encode(&Header::default(), &claims, &self.inner.encoding)
            .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))
    }

    /// Checks signature and expiry and returns the identity the token carries.
    pub fn verify(&self, token: &str) -> AppResult<AuthUser> {
        let decoded = decode::<Claims>(token, &self.inner.decoding, &Validation::default())
            .map_err(|err| match err.kind() {
                ErrorKind::ExpiredSignature => AppError::ExpiredToken,
                _ => AppError::InvalidToken,
            })?;

        let id = Uuid::parse_str(&decoded.claims.sub).map_err(|_| AppError::InvalidToken)?;

        Ok(AuthUser {
            id,
            email: decoded.claims.email,
            company_name: decoded.claims.company_name,
        })
    }
}
