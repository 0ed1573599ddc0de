use auth::Claims;
use auth::TokenError;
use auth::TokenRequirement;
use axum::extract::Request;
use axum::extract::State;
use axum::http;
use axum::middleware::Next;
use axum::response::Response;

use super::handlers::ApiError;
use crate::domain::user::models::UserId;
use crate::inbound::http::router::AppState;

/// Identity of the caller, stored in request extensions by the auth middleware.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: UserId,
    pub is_admin: bool,
    pub jti: String,
    pub claims: Claims,
}

/// Require a valid, unrevoked access token.
pub async fn require_access(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    authorize(&state, req, next, TokenRequirement::Access).await
}

/// Require an access token minted directly by a login.
pub async fn require_fresh_access(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    authorize(&state, req, next, TokenRequirement::FreshAccess).await
}

/// Require a valid, unused refresh token.
pub async fn require_refresh(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    authorize(&state, req, next, TokenRequirement::Refresh).await
}

async fn authorize(
    state: &AppState,
    mut req: Request,
    next: Next,
    requirement: TokenRequirement,
) -> Result<Response, ApiError> {
    let token = extract_token_from_header(&req)?;

    let claims = state
        .authenticator
        .validate(token, requirement)
        .map_err(|e| {
            tracing::warn!(code = e.code(), error = %e, "Token rejected");
            ApiError::Token(e)
        })?;

    let user_id = UserId::from_string(&claims.sub).map_err(|e| {
        tracing::warn!(subject = %claims.sub, error = %e, "Token subject is not a user id");
        ApiError::Token(TokenError::Invalid(e.to_string()))
    })?;

    req.extensions_mut().insert(AuthenticatedUser {
        user_id,
        is_admin: claims.is_admin,
        jti: claims.jti.clone(),
        claims,
    });

    Ok(next.run(req).await)
}

fn extract_token_from_header(req: &Request) -> Result<&str, ApiError> {
    req.headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or(ApiError::Token(TokenError::Missing))
}

#[cfg(test)]
mod tests {
    use axum::body::Body;

    use super::*;

    fn request_with(header: Option<&str>) -> Request {
        let mut builder = http::Request::builder().uri("/item");
        if let Some(value) = header {
            builder = builder.header(http::header::AUTHORIZATION, value);
        }
        builder.body(Body::empty()).unwrap()
    }

    #[test]
    fn test_extract_bearer_token() {
        let req = request_with(Some("Bearer abc.def.ghi"));
        assert_eq!(extract_token_from_header(&req).unwrap(), "abc.def.ghi");
    }

    #[test]
    fn test_missing_or_malformed_header_is_missing_token() {
        for header in [None, Some("Basic dXNlcjpwYXNz"), Some("Bearer ")] {
            let req = request_with(header);
            assert_eq!(
                extract_token_from_header(&req).unwrap_err(),
                ApiError::Token(TokenError::Missing)
            );
        }
    }
}
