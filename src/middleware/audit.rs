use sqlx::PgPool;

/// Record an audit event. Called explicitly in handlers after mutations;
/// failures are logged and never surfaced to the caller.
pub async fn log_event(
    pool: &PgPool,
    user_id: Option<i64>,
    action: &str,
    entity: &str,
    entity_id: Option<i64>,
) {
    if let Err(e) = crate::db::audit::insert(pool, user_id, action, entity, entity_id).await {
        tracing::error!("Failed to log audit event: {e}");
    }
}
