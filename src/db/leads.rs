use chrono::NaiveDate;
use sqlx::PgPool;

use crate::models::{Lead, LeadStatus, LeadWrite};

pub async fn list(pool: &PgPool) -> Result<Vec<Lead>, sqlx::Error> {
    sqlx::query_as::<_, Lead>("SELECT * FROM leads ORDER BY created_at DESC, id DESC")
        .fetch_all(pool)
        .await
}

pub async fn create(pool: &PgPool, write: &LeadWrite) -> Result<Lead, sqlx::Error> {
    sqlx::query_as::<_, Lead>(
        "INSERT INTO leads (name, email, phone, company, status, source, notes)
         VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING *",
    )
    .bind(&write.name)
    .bind(&write.email)
    .bind(&write.phone)
    .bind(&write.company)
    .bind(write.status)
    .bind(&write.source)
    .bind(&write.notes)
    .fetch_one(pool)
    .await
}

pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Lead>, sqlx::Error> {
    sqlx::query_as::<_, Lead>("SELECT * FROM leads WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn update(pool: &PgPool, id: i64, write: &LeadWrite) -> Result<Option<Lead>, sqlx::Error> {
    sqlx::query_as::<_, Lead>(
        "UPDATE leads
         SET name = $2, email = $3, phone = $4, company = $5, status = $6,
             source = $7, notes = $8, updated_at = now()
         WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .bind(&write.name)
    .bind(&write.email)
    .bind(&write.phone)
    .bind(&write.company)
    .bind(write.status)
    .bind(&write.source)
    .bind(&write.notes)
    .fetch_optional(pool)
    .await
}

pub async fn delete(pool: &PgPool, id: i64) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM leads WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}

pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
    let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM leads")
        .fetch_one(pool)
        .await?;
    Ok(row.0)
}

/// Admin listing: free-text search over name/email/company plus status and
/// created-date range filters.
pub async fn search(
    pool: &PgPool,
    q: Option<&str>,
    status: Option<LeadStatus>,
    created_from: Option<NaiveDate>,
    created_to: Option<NaiveDate>,
) -> Result<Vec<Lead>, sqlx::Error> {
    let pattern = q.map(super::escape_like);
    sqlx::query_as::<_, Lead>(
        "SELECT * FROM leads
         WHERE ($1::text IS NULL
                OR name ILIKE '%' || $1 || '%'
                OR email ILIKE '%' || $1 || '%'
                OR company ILIKE '%' || $1 || '%')
           AND ($2::lead_status IS NULL OR status = $2)
           AND ($3::date IS NULL OR created_at::date >= $3)
           AND ($4::date IS NULL OR created_at::date <= $4)
         ORDER BY created_at DESC, id DESC",
    )
    .bind(pattern)
    .bind(status)
    .bind(created_from)
    .bind(created_to)
    .fetch_all(pool)
    .await
}
