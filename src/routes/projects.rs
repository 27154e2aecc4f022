use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::NaiveDate;
use serde::Deserialize;

use crate::auth::extractor::ApiCaller;
use crate::db;
use crate::error::AppError;
use crate::middleware::audit;
use crate::models::{Project, ProjectWrite};
use crate::state::SharedState;
use crate::validate::{self, double_option, FieldErrors};

/// Write payload. The nullable fields use a double `Option` so an explicit
/// `null` (clear the value) is distinguishable from an absent key (keep it).
#[derive(Debug, Default, Deserialize)]
pub struct ProjectPayload {
    pub title: Option<String>,
    pub description: Option<String>,
    pub client: Option<i64>,
    pub status: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub start_date: Option<Option<NaiveDate>>,
    #[serde(default, deserialize_with = "double_option")]
    pub end_date: Option<Option<NaiveDate>>,
    #[serde(default, deserialize_with = "double_option")]
    pub budget: Option<Option<serde_json::Value>>,
    #[serde(default, deserialize_with = "double_option")]
    pub assigned_to: Option<Option<i64>>,
}

impl ProjectPayload {
    fn validate(self, current: Option<&Project>, partial: bool) -> Result<ProjectWrite, AppError> {
        let mut errors = FieldErrors::new();

        let title = validate::required_text(
            &mut errors,
            "title",
            self.title,
            current.map(|p| p.title.as_str()),
            partial,
            200,
        );
        let description = validate::required_text(
            &mut errors,
            "description",
            self.description,
            current.map(|p| p.description.as_str()),
            partial,
            0,
        );

        let client_id = match self.client {
            Some(id) => Some(id),
            None => match current {
                Some(cur) if partial => Some(cur.client_id),
                _ => {
                    errors.add("client", "This field is required.");
                    None
                }
            },
        };

        let status = match self.status {
            Some(raw) => validate::parse_choice(&mut errors, "status", &raw).unwrap_or_default(),
            None => current.map(|p| p.status).unwrap_or_default(),
        };

        let start_date = match self.start_date {
            Some(value) => value,
            None => current.and_then(|p| p.start_date),
        };
        let end_date = match self.end_date {
            Some(value) => value,
            None => current.and_then(|p| p.end_date),
        };

        let budget = match self.budget {
            Some(Some(raw)) => match validate::parse_budget(&raw) {
                Ok(value) => Some(value),
                Err(message) => {
                    errors.add("budget", message);
                    None
                }
            },
            Some(None) => None,
            None => current.and_then(|p| p.budget),
        };

        let assigned_to = match self.assigned_to {
            Some(value) => value,
            None => current.and_then(|p| p.assigned_to),
        };

        errors.into_result()?;
        Ok(ProjectWrite {
            title,
            description,
            // Presence enforced above
            client_id: client_id.unwrap_or_default(),
            status,
            start_date,
            end_date,
            budget,
            assigned_to,
        })
    }
}

/// Dangling references surface as foreign key violations; report them as
/// field errors the way out-of-enum statuses are.
fn map_reference_error(err: sqlx::Error, write: &ProjectWrite) -> AppError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_foreign_key_violation() {
            match db_err.constraint() {
                Some("projects_client_id_fkey") => {
                    return AppError::Validation(FieldErrors::single(
                        "client",
                        format!("Invalid pk \"{}\" - object does not exist.", write.client_id),
                    ));
                }
                Some("projects_assigned_to_fkey") => {
                    return AppError::Validation(FieldErrors::single(
                        "assigned_to",
                        format!(
                            "Invalid pk \"{}\" - object does not exist.",
                            write.assigned_to.unwrap_or_default()
                        ),
                    ));
                }
                _ => {}
            }
        }
    }
    AppError::Database(err)
}

pub async fn list(
    _caller: ApiCaller,
    State(state): State<SharedState>,
) -> Result<Json<Vec<Project>>, AppError> {
    let projects = db::projects::list(&state.pool).await?;
    Ok(Json(projects))
}

pub async fn create(
    caller: ApiCaller,
    State(state): State<SharedState>,
    Json(payload): Json<ProjectPayload>,
) -> Result<(StatusCode, Json<Project>), AppError> {
    let write = payload.validate(None, false)?;
    let project = db::projects::create(&state.pool, &write)
        .await
        .map_err(|e| map_reference_error(e, &write))?;

    audit::log_event(
        &state.pool,
        caller.user_id(),
        "project.created",
        "project",
        Some(project.id),
    )
    .await;

    Ok((StatusCode::CREATED, Json(project)))
}

pub async fn get(
    _caller: ApiCaller,
    State(state): State<SharedState>,
    Path(id): Path<i64>,
) -> Result<Json<Project>, AppError> {
    let project = db::projects::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Project not found".to_string()))?;
    Ok(Json(project))
}

pub async fn update(
    caller: ApiCaller,
    State(state): State<SharedState>,
    Path(id): Path<i64>,
    Json(payload): Json<ProjectPayload>,
) -> Result<Json<Project>, AppError> {
    apply_update(&state, &caller, id, payload, false).await
}

pub async fn partial_update(
    caller: ApiCaller,
    State(state): State<SharedState>,
    Path(id): Path<i64>,
    Json(payload): Json<ProjectPayload>,
) -> Result<Json<Project>, AppError> {
    apply_update(&state, &caller, id, payload, true).await
}

async fn apply_update(
    state: &SharedState,
    caller: &ApiCaller,
    id: i64,
    payload: ProjectPayload,
    partial: bool,
) -> Result<Json<Project>, AppError> {
    let current = db::projects::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Project not found".to_string()))?;

    let write = payload.validate(Some(&current), partial)?;
    let project = db::projects::update(&state.pool, id, &write)
        .await
        .map_err(|e| map_reference_error(e, &write))?
        .ok_or_else(|| AppError::NotFound("Project not found".to_string()))?;

    audit::log_event(
        &state.pool,
        caller.user_id(),
        "project.updated",
        "project",
        Some(project.id),
    )
    .await;

    Ok(Json(project))
}

pub async fn delete(
    caller: ApiCaller,
    State(state): State<SharedState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    let deleted = db::projects::delete(&state.pool, id).await?;
    if deleted == 0 {
        return Err(AppError::NotFound("Project not found".to_string()));
    }

    audit::log_event(&state.pool, caller.user_id(), "project.deleted", "project", Some(id)).await;

    Ok(StatusCode::NO_CONTENT)
}
