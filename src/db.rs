use sqlx::MySqlPool;

pub async fn init_db(database_url: &str) -> Result<MySqlPool, sqlx::Error> {
    MySqlPool::connect(database_url).await
}

/// Creates the leave table when it does not exist yet.
pub async fn ensure_schema(pool: &MySqlPool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS leave_requests (
            id            BIGINT UNSIGNED NOT NULL AUTO_INCREMENT PRIMARY KEY,
            requester_id  BIGINT UNSIGNED NOT NULL,
            reviewer_role VARCHAR(16)     NOT NULL,
            reviewer_id   BIGINT UNSIGNED NULL,
            reason        TEXT            NOT NULL,
            start_date    DATE            NOT NULL,
            end_date      DATE            NOT NULL,
            status        VARCHAR(16)     NOT NULL DEFAULT 'Pending',
            created_at    TIMESTAMP(6)    NOT NULL,
            INDEX idx_leave_requests_requester (requester_id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}
