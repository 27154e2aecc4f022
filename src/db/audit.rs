use sqlx::PgPool;

use crate::models::AuditEvent;

pub async fn insert(
    pool: &PgPool,
    user_id: Option<i64>,
    action: &str,
    entity: &str,
    entity_id: Option<i64>,
) -> Result<(), sqlx::Error> {
    sqlx::query("INSERT INTO audit_log (user_id, action, entity, entity_id) VALUES ($1, $2, $3, $4)")
        .bind(user_id)
        .bind(action)
        .bind(entity)
        .bind(entity_id)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn list_recent(pool: &PgPool, limit: i64) -> Result<Vec<AuditEvent>, sqlx::Error> {
    sqlx::query_as::<_, AuditEvent>(
        "SELECT * FROM audit_log ORDER BY created_at DESC, id DESC LIMIT $1",
    )
    .bind(limit)
    .fetch_all(pool)
    .await
}
