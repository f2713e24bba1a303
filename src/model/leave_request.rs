use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};
use utoipa::ToSchema;

use crate::model::role::ReviewerRole;

#[derive(
    Debug, Default, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize, ToSchema, Display, EnumString, EnumIter,
)]
pub enum LeaveStatus {
    #[default]
    Pending,
    Approved,
    Denied,
}

/// Outcome chosen by the reviewing authority.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Display)]
pub enum Decision {
    Approve,
    Deny,
}

impl Decision {
    pub fn target(self) -> LeaveStatus {
        match self {
            Decision::Approve => LeaveStatus::Approved,
            Decision::Deny => LeaveStatus::Denied,
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, thiserror::Error)]
#[error("leave request is already {from}, cannot move it to {to}")]
pub struct TransitionError {
    pub from: LeaveStatus,
    pub to: LeaveStatus,
}

/// Display treatment of a status on the leave cards.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize, Display)]
pub enum StatusTone {
    Affirmative,
    Negative,
    Neutral,
}

impl StatusTone {
    pub fn colour(self) -> &'static str {
        match self {
            StatusTone::Affirmative => "green",
            StatusTone::Negative => "red",
            StatusTone::Neutral => "black",
        }
    }
}

impl LeaveStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(self, LeaveStatus::Pending)
    }

    /// Only `Pending` may move, and only to a terminal status.
    pub fn apply(self, decision: Decision) -> Result<LeaveStatus, TransitionError> {
        let to = decision.target();
        if self.is_terminal() {
            return Err(TransitionError { from: self, to });
        }
        Ok(to)
    }

    pub fn tone(self) -> StatusTone {
        match self {
            LeaveStatus::Approved => StatusTone::Affirmative,
            LeaveStatus::Denied => StatusTone::Negative,
            LeaveStatus::Pending => StatusTone::Neutral,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(example = json!({
    "id": 1,
    "requesterId": 1000,
    "reviewerRole": "Manager",
    "reviewerId": null,
    "reason": "Medical",
    "startDate": "2024-05-01",
    "endDate": "2024-05-03",
    "status": "Pending",
    "createdAt": "2024-04-28T09:30:00Z"
}))]
pub struct LeaveRequest {
    /// leave application id
    #[schema(example = 1)]
    pub id: u64,
    /// user who applied for the leave
    #[schema(example = 1000)]
    pub requester_id: u64,
    pub reviewer_role: ReviewerRole,
    /// specific reviewer, when the submitting surface named one
    #[schema(example = 7, nullable = true)]
    pub reviewer_id: Option<u64>,
    #[schema(example = "Medical")]
    pub reason: String,
    #[schema(example = "2024-05-01", format = "date", value_type = String)]
    pub start_date: NaiveDate,
    #[schema(example = "2024-05-03", format = "date", value_type = String)]
    pub end_date: NaiveDate,
    pub status: LeaveStatus,
    #[schema(example = "2024-04-28T09:30:00Z", format = "date-time", value_type = String)]
    pub created_at: DateTime<Utc>,
}

/// A validated request that has not been given an id yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaveDraft {
    pub requester_id: u64,
    pub reviewer_role: ReviewerRole,
    pub reviewer_id: Option<u64>,
    pub reason: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

impl LeaveDraft {
    pub fn into_request(self, id: u64) -> LeaveRequest {
        LeaveRequest {
            id,
            requester_id: self.requester_id,
            reviewer_role: self.reviewer_role,
            reviewer_id: self.reviewer_id,
            reason: self.reason,
            start_date: self.start_date,
            end_date: self.end_date,
            status: LeaveStatus::Pending,
            created_at: self.created_at,
        }
    }
}
