use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use crate::auth::extractor::ApiCaller;
use crate::db;
use crate::error::AppError;
use crate::middleware::audit;
use crate::models::{Client, ClientWrite};
use crate::state::SharedState;
use crate::validate::{self, FieldErrors};

/// Write payload; unknown and server-assigned keys are ignored.
/// Unlike leads, company is required.
#[derive(Debug, Default, Deserialize)]
pub struct ClientPayload {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub address: Option<String>,
    pub status: Option<String>,
    pub industry: Option<String>,
    pub notes: Option<String>,
}

impl ClientPayload {
    fn validate(self, current: Option<&Client>, partial: bool) -> Result<ClientWrite, AppError> {
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
        let company = validate::required_text(
            &mut errors,
            "company",
            self.company,
            current.map(|c| c.company.as_str()),
            partial,
            200,
        );
        let address = validate::optional_text(
            &mut errors,
            "address",
            self.address,
            current.map(|c| c.address.as_str()),
            0,
        );
        let industry = validate::optional_text(
            &mut errors,
            "industry",
            self.industry,
            current.map(|c| c.industry.as_str()),
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
        Ok(ClientWrite {
            name,
            email,
            phone,
            company,
            address,
            status,
            industry,
            notes,
        })
    }
}

pub async fn list(
    _caller: ApiCaller,
    State(state): State<SharedState>,
) -> Result<Json<Vec<Client>>, AppError> {
    let clients = db::clients::list(&state.pool).await?;
    Ok(Json(clients))
}

pub async fn create(
    caller: ApiCaller,
    State(state): State<SharedState>,
    Json(payload): Json<ClientPayload>,
) -> Result<(StatusCode, Json<Client>), AppError> {
    let write = payload.validate(None, false)?;
    let client = db::clients::create(&state.pool, &write).await?;

    audit::log_event(&state.pool, caller.user_id(), "client.created", "client", Some(client.id))
        .await;

    Ok((StatusCode::CREATED, Json(client)))
}

pub async fn get(
    _caller: ApiCaller,
    State(state): State<SharedState>,
    Path(id): Path<i64>,
) -> Result<Json<Client>, AppError> {
    let client = db::clients::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Client not found".to_string()))?;
    Ok(Json(client))
}

pub async fn update(
    caller: ApiCaller,
    State(state): State<SharedState>,
    Path(id): Path<i64>,
    Json(payload): Json<ClientPayload>,
) -> Result<Json<Client>, AppError> {
    apply_update(&state, &caller, id, payload, false).await
}

pub async fn partial_update(
    caller: ApiCaller,
    State(state): State<SharedState>,
    Path(id): Path<i64>,
    Json(payload): Json<ClientPayload>,
) -> Result<Json<Client>, AppError> {
    apply_update(&state, &caller, id, payload, true).await
}

async fn apply_update(
    state: &SharedState,
    caller: &ApiCaller,
    id: i64,
    payload: ClientPayload,
    partial: bool,
) -> Result<Json<Client>, AppError> {
    let current = db::clients::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Client not found".to_string()))?;

    let write = payload.validate(Some(&current), partial)?;
    let client = db::clients::update(&state.pool, id, &write)
        .await?
        .ok_or_else(|| AppError::NotFound("Client not found".to_string()))?;

    audit::log_event(&state.pool, caller.user_id(), "client.updated", "client", Some(client.id))
        .await;

    Ok(Json(client))
}

/// Deleting a client also deletes every project it owns.
pub async fn delete(
    caller: ApiCaller,
    State(state): State<SharedState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    let deleted = db::clients::delete(&state.pool, id).await?;
    if deleted == 0 {
        return Err(AppError::NotFound("Client not found".to_string()));
    }

    audit::log_event(&state.pool, caller.user_id(), "client.deleted", "client", Some(id)).await;

    Ok(StatusCode::NO_CONTENT)
}
