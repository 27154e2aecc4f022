use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use crate::auth::extractor::ApiCaller;
use crate::db;
use crate::error::AppError;
use crate::middleware::audit;
use crate::models::{Lead, LeadWrite};
use crate::state::SharedState;
use crate::validate::{self, FieldErrors};

/// Write payload; unknown and server-assigned keys are ignored.
#[derive(Debug, Default, Deserialize)]
pub struct LeadPayload {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub status: Option<String>,
    pub source: Option<String>,
    pub notes: Option<String>,
}

impl LeadPayload {
    fn validate(self, current: Option<&Lead>, partial: bool) -> Result<LeadWrite, AppError> {
        let mut errors = FieldErrors::new();

        let name = validate::required_text(
            &mut errors,
            "name",
            self.name,
            current.map(|c| c.name.as_str()),
            partial,
            200,
        );
        let email = validate::required_text(
            &mut errors,
            "email",
            self.email,
            current.map(|c| c.email.as_str()),
            partial,
            254,
        );
        validate::check_email(&mut errors, "email", &email);
        let phone = validate::optional_text(
            &mut errors,
            "phone",
            self.phone,
            current.map(|c| c.phone.as_str()),
            20,
        );
        let company = validate::optional_text(
            &mut errors,
            "company",
            self.company,
            current.map(|c| c.company.as_str()),
            200,
        );
        let source = validate::optional_text(
            &mut errors,
            "source",
            self.source,
            current.map(|c| c.source.as_str()),
            100,
        );
        let notes = validate::optional_text(
            &mut errors,
            "notes",
            self.notes,
            current.map(|c| c.notes.as_str()),
            0,
        );
        let status = match self.status {
            Some(raw) => validate::parse_choice(&mut errors, "status", &raw).unwrap_or_default(),
            None => current.map(|c| c.status).unwrap_or_default(),
        };

        errors.into_result()?;
        Ok(LeadWrite {
            name,
            email,
            phone,
            company,
            status,
            source,
            notes,
        })
    }
}

pub async fn list(
    _caller: ApiCaller,
    State(state): State<SharedState>,
) -> Result<Json<Vec<Lead>>, AppError> {
    let leads = db::leads::list(&state.pool).await?;
    Ok(Json(leads))
}

pub async fn create(
    caller: ApiCaller,
    State(state): State<SharedState>,
    Json(payload): Json<LeadPayload>,
) -> Result<(StatusCode, Json<Lead>), AppError> {
    let write = payload.validate(None, false)?;
    let lead = db::leads::create(&state.pool, &write).await?;

    audit::log_event(&state.pool, caller.user_id(), "lead.created", "lead", Some(lead.id)).await;

    Ok((StatusCode::CREATED, Json(lead)))
}

pub async fn get(
    _caller: ApiCaller,
    State(state): State<SharedState>,
    Path(id): Path<i64>,
) -> Result<Json<Lead>, AppError> {
    let lead = db::leads::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Lead not found".to_string()))?;
    Ok(Json(lead))
}

pub async fn update(
    caller: ApiCaller,
    State(state): State<SharedState>,
    Path(id): Path<i64>,
    Json(payload): Json<LeadPayload>,
) -> Result<Json<Lead>, AppError> {
    apply_update(&state, &caller, id, payload, false).await
}

pub async fn partial_update(
    caller: ApiCaller,
    State(state): State<SharedState>,
    Path(id): Path<i64>,
    Json(payload): Json<LeadPayload>,
) -> Result<Json<Lead>, AppError> {
    apply_update(&state, &caller, id, payload, true).await
}

async fn apply_update(
    state: &SharedState,
    caller: &ApiCaller,
    id: i64,
    payload: LeadPayload,
    partial: bool,
) -> Result<Json<Lead>, AppError> {
    let current = db::leads::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Lead not found".to_string()))?;

    let write = payload.validate(Some(&current), partial)?;
    let lead = db::leads::update(&state.pool, id, &write)
        .await?
        .ok_or_else(|| AppError::NotFound("Lead not found".to_string()))?;

    audit::log_event(&state.pool, caller.user_id(), "lead.updated", "lead", Some(lead.id)).await;

    Ok(Json(lead))
}

pub async fn delete(
    caller: ApiCaller,
    State(state): State<SharedState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    let deleted = db::leads::delete(&state.pool, id).await?;
    if deleted == 0 {
        return Err(AppError::NotFound("Lead not found".to_string()));
    }

    audit::log_event(&state.pool, caller.user_id(), "lead.deleted", "lead", Some(id)).await;

    Ok(StatusCode::NO_CONTENT)
}
