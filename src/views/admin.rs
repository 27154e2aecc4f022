use askama::Template;
use axum::extract::{Query, State};
use axum::response::{Html, IntoResponse};
use chrono::NaiveDate;
use serde::Deserialize;

use crate::auth::extractor::AuthUser;
use crate::db;
use crate::error::AppError;
use crate::models::{ClientStatus, LeadStatus, ProjectStatus};
use crate::state::SharedState;

/// Shared query string for the list pages: free-text search, status filter
/// and a date range (created date for leads/clients, start date for projects).
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub q: Option<String>,
    pub status: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
}

struct StatusOption {
    value: &'static str,
    selected: bool,
}

struct ActivityRow {
    action: String,
    target: String,
    when: String,
}

fn text_param(raw: &Option<String>) -> Option<&str> {
    raw.as_deref().filter(|s| !s.is_empty())
}

fn date_param(raw: &Option<String>) -> Option<NaiveDate> {
    text_param(raw).and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok())
}

async fn current_user_name(state: &SharedState, auth: &AuthUser) -> Result<String, AppError> {
    Ok(db::users::find_by_id(&state.pool, auth.user_id)
        .await?
        .map(|u| u.name)
        .unwrap_or_default())
}

#[derive(Template)]
#[template(path = "admin/index.html")]
struct DashboardTemplate {
    user_name: String,
    lead_count: i64,
    client_count: i64,
    project_count: i64,
    activity: Vec<ActivityRow>,
}

pub async fn index(
    auth: AuthUser,
    State(state): State<SharedState>,
) -> Result<impl IntoResponse, AppError> {
    auth.require_admin()?;

    let lead_count = db::leads::count(&state.pool).await?;
    let client_count = db::clients::count(&state.pool).await?;
    let project_count = db::projects::count(&state.pool).await?;

    let activity = db::audit::list_recent(&state.pool, 20)
        .await?
        .into_iter()
        .map(|event| ActivityRow {
            action: event.action,
            target: match event.entity_id {
                Some(id) => format!("{} #{id}", event.entity),
                None => event.entity,
            },
            when: event.created_at.format("%Y-%m-%d %H:%M").to_string(),
        })
        .collect();

    let template = DashboardTemplate {
        user_name: current_user_name(&state, &auth).await?,
        lead_count,
        client_count,
        project_count,
        activity,
    };
    Ok(Html(template.render().unwrap_or_default()))
}

#[derive(Template)]
#[template(path = "admin/leads.html")]
struct LeadsTemplate {
    user_name: String,
    q: String,
    from: String,
    to: String,
    statuses: Vec<StatusOption>,
    rows: Vec<LeadRow>,
}

struct LeadRow {
    id: i64,
    label: String,
    email: String,
    status: &'static str,
    created_at: String,
}

pub async fn leads_page(
    auth: AuthUser,
    State(state): State<SharedState>,
    Query(params): Query<ListParams>,
) -> Result<impl IntoResponse, AppError> {
    auth.require_admin()?;

    let status: Option<LeadStatus> = text_param(&params.status).and_then(|s| s.parse().ok());
    let leads = db::leads::search(
        &state.pool,
        text_param(&params.q),
        status,
        date_param(&params.from),
        date_param(&params.to),
    )
    .await?;

    let rows = leads
        .iter()
        .map(|lead| LeadRow {
            id: lead.id,
            label: lead.display_label(),
            email: lead.email.clone(),
            status: lead.status.as_str(),
            created_at: lead.created_at.format("%Y-%m-%d %H:%M").to_string(),
        })
        .collect();

    let template = LeadsTemplate {
        user_name: current_user_name(&state, &auth).await?,
        q: params.q.unwrap_or_default(),
        from: params.from.unwrap_or_default(),
        to: params.to.unwrap_or_default(),
        statuses: LeadStatus::ALL
            .iter()
            .map(|s| StatusOption {
                value: s.as_str(),
                selected: status == Some(*s),
            })
            .collect(),
        rows,
    };
    Ok(Html(template.render().unwrap_or_default()))
}

#[derive(Template)]
#[template(path = "admin/clients.html")]
struct ClientsTemplate {
    user_name: String,
    q: String,
    from: String,
    to: String,
    statuses: Vec<StatusOption>,
    rows: Vec<ClientRow>,
}

struct ClientRow {
    id: i64,
    label: String,
    email: String,
    industry: String,
    status: &'static str,
    created_at: String,
}

pub async fn clients_page(
    auth: AuthUser,
    State(state): State<SharedState>,
    Query(params): Query<ListParams>,
) -> Result<impl IntoResponse, AppError> {
    auth.require_admin()?;

    let status: Option<ClientStatus> = text_param(&params.status).and_then(|s| s.parse().ok());
    let clients = db::clients::search(
        &state.pool,
        text_param(&params.q),
        status,
        date_param(&params.from),
        date_param(&params.to),
    )
    .await?;

    let rows = clients
        .iter()
        .map(|client| ClientRow {
            id: client.id,
            label: client.display_label(),
            email: client.email.clone(),
            industry: client.industry.clone(),
            status: client.status.as_str(),
            created_at: client.created_at.format("%Y-%m-%d %H:%M").to_string(),
        })
        .collect();

    let template = ClientsTemplate {
        user_name: current_user_name(&state, &auth).await?,
        q: params.q.unwrap_or_default(),
        from: params.from.unwrap_or_default(),
        to: params.to.unwrap_or_default(),
        statuses: ClientStatus::ALL
            .iter()
            .map(|s| StatusOption {
                value: s.as_str(),
                selected: status == Some(*s),
            })
            .collect(),
        rows,
    };
    Ok(Html(template.render().unwrap_or_default()))
}

#[derive(Template)]
#[template(path = "admin/projects.html")]
struct ProjectsTemplate {
    user_name: String,
    q: String,
    from: String,
    to: String,
    statuses: Vec<StatusOption>,
    rows: Vec<ProjectRow>,
}

struct ProjectRow {
    id: i64,
    label: String,
    status: &'static str,
    start_date: String,
    end_date: String,
    budget: String,
}

pub async fn projects_page(
    auth: AuthUser,
    State(state): State<SharedState>,
    Query(params): Query<ListParams>,
) -> Result<impl IntoResponse, AppError> {
    auth.require_admin()?;

    let status: Option<ProjectStatus> = text_param(&params.status).and_then(|s| s.parse().ok());
    let projects = db::projects::search(
        &state.pool,
        text_param(&params.q),
        status,
        date_param(&params.from),
        date_param(&params.to),
    )
    .await?;

    let rows = projects
        .iter()
        .map(|project| ProjectRow {
            id: project.id,
            label: project.display_label(),
            status: project.status.as_str(),
            start_date: project
                .start_date
                .map(|d| d.to_string())
                .unwrap_or_default(),
            end_date: project.end_date.map(|d| d.to_string()).unwrap_or_default(),
            budget: project.budget.map(|b| b.to_string()).unwrap_or_default(),
        })
        .collect();

    let template = ProjectsTemplate {
        user_name: current_user_name(&state, &auth).await?,
        q: params.q.unwrap_or_default(),
        from: params.from.unwrap_or_default(),
        to: params.to.unwrap_or_default(),
        statuses: ProjectStatus::ALL
            .iter()
            .map(|s| StatusOption {
                value: s.as_str(),
                selected: status == Some(*s),
            })
            .collect(),
        rows,
    };
    Ok(Html(template.render().unwrap_or_default()))
}
