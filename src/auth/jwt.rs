//! JWT token generation and validation

use crate::core::error::{Result, StaffdeskError};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// JWT Claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: user id
    pub sub: String,
    pub exp: usize,
}

/// Generate a signed session token for a user
pub fn generate_token(user_id: &str, secret: &str, ttl_days: i64) -> Result<String> {
    let expiration = chrono::Utc::now()
        .checked_add_signed(chrono::Duration::days(ttl_days))
        .ok_or_else(|| StaffdeskError::AuthError("Failed to calculate expiration".to_string()))?
        .timestamp() as usize;

    let claims = Claims {
        sub: user_id.to_string(),
        exp: expiration,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| StaffdeskError::AuthError(format!("Failed to generate token: {}", e)))
}

/// Validate a token and extract its claims
///
/// Fails on malformed input, bad signature, or expiry.
pub fn validate_token(token: &str, secret: &str) -> Result<Claims> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|e| StaffdeskError::AuthError(format!("Invalid token: {}", e)))?;

    Ok(token_data.claims)
}
