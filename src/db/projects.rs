use chrono::NaiveDate;
use sqlx::PgPool;

use crate::models::{Project, ProjectStatus, ProjectWrite};

// Every project query joins clients so the serialized row always carries the
// client's current name.

pub async fn list(pool: &PgPool) -> Result<Vec<Project>, sqlx::Error> {
    sqlx::query_as::<_, Project>(
        "SELECT p.*, c.name AS client_name
         FROM projects p
         JOIN clients c ON c.id = p.client_id
         ORDER BY p.created_at DESC, p.id DESC",
    )
    .fetch_all(pool)
    .await
}

pub async fn create(pool: &PgPool, write: &ProjectWrite) -> Result<Project, sqlx::Error> {
    sqlx::query_as::<_, Project>(
        "WITH inserted AS (
             INSERT INTO projects
                 (title, description, client_id, status, start_date, end_date, budget, assigned_to)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING *
         )
         SELECT inserted.*, c.name AS client_name
         FROM inserted
         JOIN clients c ON c.id = inserted.client_id",
    )
    .bind(&write.title)
    .bind(&write.description)
    .bind(write.client_id)
    .bind(write.status)
    .bind(write.start_date)
    .bind(write.end_date)
    .bind(write.budget)
    .bind(write.assigned_to)
    .fetch_one(pool)
    .await
}

pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Project>, sqlx::Error> {
    sqlx::query_as::<_, Project>(
        "SELECT p.*, c.name AS client_name
         FROM projects p
         JOIN clients c ON c.id = p.client_id
         WHERE p.id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn update(
    pool: &PgPool,
    id: i64,
    write: &ProjectWrite,
) -> Result<Option<Project>, sqlx::Error> {
    sqlx::query_as::<_, Project>(
        "WITH updated AS (
             UPDATE projects
             SET title = $2, description = $3, client_id = $4, status = $5,
                 start_date = $6, end_date = $7, budget = $8, assigned_to = $9,
                 updated_at = now()
             WHERE id = $1
             RETURNING *
         )
         SELECT updated.*, c.name AS client_name
         FROM updated
         JOIN clients c ON c.id = updated.client_id",
    )
    .bind(id)
    .bind(&write.title)
    .bind(&write.description)
    .bind(write.client_id)
    .bind(write.status)
    .bind(write.start_date)
    .bind(write.end_date)
    .bind(write.budget)
    .bind(write.assigned_to)
    .fetch_optional(pool)
    .await
}

pub async fn delete(pool: &PgPool, id: i64) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM projects WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}

pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
    let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM projects")
        .fetch_one(pool)
        .await?;
    Ok(row.0)
}

/// Admin listing: free-text search over title/client name plus status and
/// start-date range filters.
pub async fn search(
    pool: &PgPool,
    q: Option<&str>,
    status: Option<ProjectStatus>,
    start_from: Option<NaiveDate>,
    start_to: Option<NaiveDate>,
) -> Result<Vec<Project>, sqlx::Error> {
    let pattern = q.map(super::escape_like);
    sqlx::query_as::<_, Project>(
        "SELECT p.*, c.name AS client_name
         FROM projects p
         JOIN clients c ON c.id = p.client_id
         WHERE ($1::text IS NULL
                OR p.title ILIKE '%' || $1 || '%'
                OR c.name ILIKE '%' || $1 || '%')
           AND ($2::project_status IS NULL OR p.status = $2)
           AND ($3::date IS NULL OR p.start_date >= $3)
           AND ($4::date IS NULL OR p.start_date <= $4)
         ORDER BY p.created_at DESC, p.id DESC",
    )
    .bind(pattern)
    .bind(status)
    .bind(start_from)
    .bind(start_to)
    .fetch_all(pool)
    .await
}
