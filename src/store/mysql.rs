use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{FromRow, MySqlPool};

use crate::model::leave_request::{LeaveDraft, LeaveRequest, LeaveStatus};
use crate::model::role::ReviewerRole;
use crate::store::{LeaveStore, StoreError};

const COLUMNS: &str =
    "id, requester_id, reviewer_role, reviewer_id, reason, start_date, end_date, status, created_at";

pub struct MySqlStore {
    pool: MySqlPool,
}

impl MySqlStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct LeaveRow {
    id: u64,
    requester_id: u64,
    reviewer_role: String,
    reviewer_id: Option<u64>,
    reason: String,
    start_date: NaiveDate,
    end_date: NaiveDate,
    status: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<LeaveRow> for LeaveRequest {
    type Error = StoreError;

    fn try_from(row: LeaveRow) -> Result<Self, Self::Error> {
        let corrupt = |detail: String| StoreError::Corrupt { id: row.id, detail };
        let status = LeaveStatus::from_str(&row.status)
            .map_err(|_| corrupt(format!("unknown status {:?}", row.status)))?;
        let reviewer_role = ReviewerRole::from_str(&row.reviewer_role)
            .map_err(|_| corrupt(format!("unknown reviewer role {:?}", row.reviewer_role)))?;

        Ok(LeaveRequest {
            id: row.id,
            requester_id: row.requester_id,
            reviewer_role,
            reviewer_id: row.reviewer_id,
            reason: row.reason,
            start_date: row.start_date,
            end_date: row.end_date,
            status,
            created_at: row.created_at,
        })
    }
}

#[async_trait]
impl LeaveStore for MySqlStore {
    async fn insert(&self, draft: LeaveDraft) -> Result<LeaveRequest, StoreError> {
        let result = sqlx::query(
            r#"
            INSERT INTO leave_requests
                (requester_id, reviewer_role, reviewer_id, reason, start_date, end_date, status, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(draft.requester_id)
        .bind(draft.reviewer_role.to_string())
        .bind(draft.reviewer_id)
        .bind(&draft.reason)
        .bind(draft.start_date)
        .bind(draft.end_date)
        .bind(LeaveStatus::Pending.to_string())
        .bind(draft.created_at)
        .execute(&self.pool)
        .await?;

        Ok(draft.into_request(result.last_insert_id()))
    }

    async fn list_by_requester(&self, requester_id: u64) -> Result<Vec<LeaveRequest>, StoreError> {
        let sql = format!(
            "SELECT {} FROM leave_requests WHERE requester_id = ? ORDER BY id",
            COLUMNS
        );
        let rows = sqlx::query_as::<_, LeaveRow>(&sql)
            .bind(requester_id)
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(LeaveRequest::try_from).collect()
    }

    async fn find(&self, id: u64) -> Result<Option<LeaveRequest>, StoreError> {
        let sql = format!("SELECT {} FROM leave_requests WHERE id = ?", COLUMNS);
        let row = sqlx::query_as::<_, LeaveRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(LeaveRequest::try_from).transpose()
    }

    async fn swap_status(&self, id: u64, from: LeaveStatus, to: LeaveStatus) -> Result<bool, StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE leave_requests
            SET status = ?
            WHERE id = ?
            AND status = ?
            "#,
        )
        .bind(to.to_string())
        .bind(id)
        .bind(from.to_string())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }
}
