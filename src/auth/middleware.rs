//! Authentication middleware
//!
//! Gates every employee route: a request must carry a valid bearer token
//! before any store access happens.

use crate::auth::jwt::validate_token;
use crate::core::error::{Result, StaffdeskError};
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};

/// Authenticated identity stored in request extensions
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub id: String,
    pub username: String,
    pub email: String,
}

/// Authentication middleware
pub async fn authenticate(
    State(state): State<crate::api::handlers::AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    use axum::http::header;

    let token = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "));

    let token = match token {
        Some(t) => t.to_string(),
        None => {
            let error = StaffdeskError::AuthError("Missing authentication token".to_string());
            return error.into_response();
        }
    };

    let claims = match validate_token(&token, &state.jwt_secret) {
        Ok(c) => c,
        Err(e) => return e.into_response(),
    };

    // The token may outlive the account; confirm the user still exists
    let user = match state.user_repo.find_by_id(&claims.sub).await {
        Ok(Some(u)) => u,
        Ok(None) => {
            let error = StaffdeskError::AuthError("User not found".to_string());
            return error.into_response();
        }
        Err(e) => return e.into_response(),
    };

    request.extensions_mut().insert(AuthUser {
        id: user.id,
        username: user.username,
        email: user.email,
    });

    next.run(request).await
}

// Implement FromRequestParts for AuthUser to enable extraction in handlers
use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = StaffdeskError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self> {
        parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .ok_or_else(|| StaffdeskError::AuthError("User not authenticated".to_string()))
    }
}
