use chrono::NaiveDate;
use sqlx::PgPool;

use crate::models::{Client, ClientStatus, ClientWrite};

pub async fn list(pool: &PgPool) -> Result<Vec<Client>, sqlx::Error> {
    sqlx::query_as::<_, Client>("SELECT * FROM clients ORDER BY created_at DESC, id DESC")
        .fetch_all(pool)
        .await
}

pub async fn create(pool: &PgPool, write: &ClientWrite) -> Result<Client, sqlx::Error> {
    sqlx::query_as::<_, Client>(
        "INSERT INTO clients (name, email, phone, company, address, status, industry, notes)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING *",
    )
    .bind(&write.name)
    .bind(&write.email)
    .bind(&write.phone)
    .bind(&write.company)
    .bind(&write.address)
    .bind(write.status)
    .bind(&write.industry)
    .bind(&write.notes)
    .fetch_one(pool)
    .await
}

pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Client>, sqlx::Error> {
    sqlx::query_as::<_, Client>("SELECT * FROM clients WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn update(
    pool: &PgPool,
    id: i64,
    write: &ClientWrite,
) -> Result<Option<Client>, sqlx::Error> {
    sqlx::query_as::<_, Client>(
        "UPDATE clients
         SET name = $2, email = $3, phone = $4, company = $5, address = $6,
             status = $7, industry = $8, notes = $9, updated_at = now()
         WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .bind(&write.name)
    .bind(&write.email)
    .bind(&write.phone)
    .bind(&write.company)
    .bind(&write.address)
    .bind(write.status)
    .bind(&write.industry)
    .bind(&write.notes)
    .fetch_optional(pool)
    .await
}

/// Deleting a client cascades to its projects via the schema's
/// ON DELETE CASCADE, all inside this single statement.
pub async fn delete(pool: &PgPool, id: i64) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM clients WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}

pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
    let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM clients")
        .fetch_one(pool)
        .await?;
    Ok(row.0)
}

pub async fn search(
    pool: &PgPool,
    q: Option<&str>,
    status: Option<ClientStatus>,
    created_from: Option<NaiveDate>,
    created_to: Option<NaiveDate>,
) -> Result<Vec<Client>, sqlx::Error> {
    let pattern = q.map(super::escape_like);
    sqlx::query_as::<_, Client>(
        "SELECT * FROM clients
         WHERE ($1::text IS NULL
                OR name ILIKE '%' || $1 || '%'
                OR email ILIKE '%' || $1 || '%'
                OR company ILIKE '%' || $1 || '%')
           AND ($2::client_status IS NULL OR status = $2)
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
