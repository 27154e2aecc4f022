use axum::extract::State;
use axum::Json;
use axum_extra::extract::cookie::{Cookie, SameSite};
use axum_extra::extract::CookieJar;
use serde::{Deserialize, Serialize};

use crate::auth::jwt::{encode_token, Claims};
use crate::auth::password;
use crate::config::RegistrationMode;
use crate::db;
use crate::error::AppError;
use crate::middleware::audit;
use crate::state::SharedState;
use crate::validate::{self, FieldErrors};

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub name: String,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct AuthResponse {
    pub access_token: String,
}

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// The admin pages authenticate through this cookie; API clients use the
/// bearer token from the response body.
fn auth_cookie(access_token: &str) -> CookieJar {
    let cookie = Cookie::build(("access_token", access_token.to_string()))
        .path("/")
        .http_only(true)
        .secure(true)
        .same_site(SameSite::Lax)
        .build();
    CookieJar::new().add(cookie)
}

fn clear_auth_cookie() -> CookieJar {
    CookieJar::new().remove(Cookie::build(("access_token", "")).path("/").build())
}

pub async fn register(
    State(state): State<SharedState>,
    Json(req): Json<RegisterRequest>,
) -> Result<(CookieJar, Json<AuthResponse>), AppError> {
    if req.email.is_empty() || req.password.is_empty() || req.name.is_empty() {
        return Err(AppError::BadRequest("All fields are required".to_string()));
    }

    if req.password.len() < 8 {
        return Err(AppError::BadRequest(
            "Password must be at least 8 characters".to_string(),
        ));
    }

    let mut email_errors = FieldErrors::new();
    validate::check_email(&mut email_errors, "email", &req.email);
    email_errors.into_result()?;

    let pw_hash = password::hash(&req.password).map_err(AppError::Internal)?;

    // Advisory lock prevents concurrent bootstrap registrations
    let mut tx = state.pool.begin().await?;
    sqlx::query("SELECT pg_advisory_xact_lock(1)")
        .execute(&mut *tx)
        .await?;

    let count = db::users::count_all(&mut *tx).await?;
    let is_admin = count == 0;

    if !is_admin && state.config.registration == RegistrationMode::Closed {
        return Err(AppError::Forbidden(
            "Registration is disabled. Contact your administrator.".to_string(),
        ));
    }

    let user = db::users::create(&mut *tx, &req.email, &pw_hash, &req.name, is_admin)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                AppError::Conflict("A user with this email already exists".to_string())
            }
            _ => AppError::Database(e),
        })?;

    tx.commit().await?;

    let claims = Claims::new(user.id, user.is_admin);
    let access_token = encode_token(&claims, &state.config.jwt_secret).map_err(AppError::Internal)?;

    audit::log_event(&state.pool, Some(user.id), "user.registered", "user", Some(user.id)).await;

    Ok((auth_cookie(&access_token), Json(AuthResponse { access_token })))
}

pub async fn login(
    State(state): State<SharedState>,
    Json(req): Json<LoginRequest>,
) -> Result<(CookieJar, Json<AuthResponse>), AppError> {
    if let Err(retry_secs) = state.login_limiter.check(&req.email) {
        return Err(AppError::RateLimited(format!(
            "Too many failed attempts. Try again in {retry_secs} seconds"
        )));
    }

    let user = db::users::find_by_email(&state.pool, &req.email).await?;
    let Some(user) = user else {
        state.login_limiter.record_failure(&req.email);
        return Err(AppError::Unauthorized("Invalid email or password".to_string()));
    };

    let valid = password::verify(&req.password, &user.password_hash).map_err(AppError::Internal)?;
    if !valid {
        state.login_limiter.record_failure(&req.email);
        return Err(AppError::Unauthorized("Invalid email or password".to_string()));
    }

    let claims = Claims::new(user.id, user.is_admin);
    let access_token = encode_token(&claims, &state.config.jwt_secret).map_err(AppError::Internal)?;

    Ok((auth_cookie(&access_token), Json(AuthResponse { access_token })))
}

pub async fn logout() -> (CookieJar, Json<MessageResponse>) {
    (
        clear_auth_cookie(),
        Json(MessageResponse {
            message: "Logged out".to_string(),
        }),
    )
}
