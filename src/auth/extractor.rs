use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::extract::CookieJar;

use crate::auth::jwt;
use crate::config::AccessPolicy;
use crate::error::AppError;
use crate::state::SharedState;

/// An authenticated caller, resolved from a Bearer token or the auth cookie.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: i64,
    pub is_admin: bool,
}

impl AuthUser {
    pub fn require_admin(&self) -> Result<(), AppError> {
        if self.is_admin {
            Ok(())
        } else {
            Err(AppError::Forbidden("Admin access required".to_string()))
        }
    }
}

impl FromRequestParts<SharedState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &SharedState,
    ) -> Result<Self, Self::Rejection> {
        // Try Bearer token from Authorization header first
        if let Some(auth_header) = parts.headers.get("authorization") {
            let auth_str = auth_header
                .to_str()
                .map_err(|_| AppError::Unauthorized("Invalid authorization header".to_string()))?;

            if let Some(token) = auth_str.strip_prefix("Bearer ") {
                let claims = jwt::decode_token(token, &state.config.jwt_secret)
                    .map_err(|_| AppError::Unauthorized("Invalid or expired token".to_string()))?;

                return Ok(AuthUser {
                    user_id: claims.sub,
                    is_admin: claims.adm,
                });
            }
        }

        // Try cookie-based auth
        let jar = CookieJar::from_headers(&parts.headers);
        if let Some(cookie) = jar.get("access_token") {
            let claims = jwt::decode_token(cookie.value(), &state.config.jwt_secret)
                .map_err(|_| AppError::Unauthorized("Invalid or expired token".to_string()))?;

            return Ok(AuthUser {
                user_id: claims.sub,
                is_admin: claims.adm,
            });
        }

        Err(AppError::Unauthorized(
            "Missing authentication token".to_string(),
        ))
    }
}

/// Caller of a CRM resource endpoint. Applies the configured access policy:
/// under `Open` anonymous callers pass through (credentials still resolved
/// when present, for the audit trail); under `Authenticated` a valid token
/// is mandatory.
#[derive(Debug, Clone)]
pub struct ApiCaller {
    pub user: Option<AuthUser>,
}

impl ApiCaller {
    pub fn user_id(&self) -> Option<i64> {
        self.user.as_ref().map(|u| u.user_id)
    }
}

impl FromRequestParts<SharedState> for ApiCaller {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &SharedState,
    ) -> Result<Self, Self::Rejection> {
        match state.config.api_access {
            AccessPolicy::Open => {
                let user = AuthUser::from_request_parts(parts, state).await.ok();
                Ok(ApiCaller { user })
            }
            AccessPolicy::Authenticated => {
                let user = AuthUser::from_request_parts(parts, state).await?;
                Ok(ApiCaller { user: Some(user) })
            }
        }
    }
}
