use std::sync::Arc;

use chrono::{SubsecRound, Utc};
use serde::Deserialize;
use tracing::{debug, info, instrument, warn};
use utoipa::IntoParams;

use crate::error::LeaveError;
use crate::leave::validation::{LeaveForm, validate};
use crate::model::leave_request::{Decision, LeaveDraft, LeaveRequest, LeaveStatus, TransitionError};
use crate::model::role::{ReviewerRole, Submitter};
use crate::store::LeaveStore;

/// Identity of whoever is deciding a request, passed in explicitly by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct Reviewer {
    /// Role of the reviewer (`Manager` or `HR`)
    #[param(value_type = String, example = "Manager")]
    pub reviewer_role: ReviewerRole,
    /// Reviewer user id, required when the request names one
    pub reviewer_id: Option<u64>,
}

#[derive(Clone)]
pub struct LeaveService {
    store: Arc<dyn LeaveStore>,
}

impl LeaveService {
    pub fn new(store: Arc<dyn LeaveStore>) -> Self {
        Self { store }
    }

    /// Validates the form and stores a new `Pending` request for `requester_id`.
    #[instrument(name = "leave_submit", skip(self, form))]
    pub async fn submit(
        &self,
        submitter: Submitter,
        requester_id: u64,
        form: &LeaveForm,
    ) -> Result<LeaveRequest, LeaveError> {
        let valid = validate(form).inspect_err(|errors| {
            debug!(%errors, "Leave form rejected");
        })?;

        let draft = LeaveDraft {
            requester_id,
            reviewer_role: submitter.reviewer_role(),
            reviewer_id: valid.reviewer_id,
            reason: valid.reason,
            start_date: valid.start_date,
            end_date: valid.end_date,
            // TIMESTAMP(6) keeps microseconds
            created_at: Utc::now().trunc_subsecs(6),
        };

        let created = self.store.insert(draft).await.map_err(|e| {
            tracing::error!(error = %e, requester_id, "Failed to create leave request");
            LeaveError::SubmissionFailed(e)
        })?;

        info!(leave_id = created.id, requester_id, "Leave request submitted");
        Ok(created)
    }

    pub async fn list_by_requester(&self, requester_id: u64) -> Result<Vec<LeaveRequest>, LeaveError> {
        self.store
            .list_by_requester(requester_id)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, requester_id, "Failed to fetch leave list");
                LeaveError::QueryFailed(e)
            })
    }

    pub async fn get(&self, id: u64) -> Result<LeaveRequest, LeaveError> {
        self.find(id).await?.ok_or(LeaveError::NotFound(id))
    }

    /// Moves a pending request to its terminal status on behalf of `reviewer`.
    #[instrument(name = "leave_decide", skip(self))]
    pub async fn decide(
        &self,
        id: u64,
        decision: Decision,
        reviewer: Reviewer,
    ) -> Result<LeaveRequest, LeaveError> {
        let request = self.get(id).await?;

        if request.reviewer_role != reviewer.reviewer_role {
            return Err(LeaveError::Forbidden(format!(
                "Leave request {id} is reviewed by {}",
                request.reviewer_role
            )));
        }
        if let Some(assigned) = request.reviewer_id {
            if reviewer.reviewer_id != Some(assigned) {
                return Err(LeaveError::Forbidden(format!(
                    "Leave request {id} is assigned to another reviewer"
                )));
            }
        }

        let target = request.status.apply(decision)?;

        let swapped = self
            .store
            .swap_status(id, LeaveStatus::Pending, target)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, leave_id = id, "Leave decision failed");
                LeaveError::QueryFailed(e)
            })?;

        if !swapped {
            let current = self.get(id).await?;
            warn!(leave_id = id, status = %current.status, "Leave request decided concurrently");
            return Err(TransitionError {
                from: current.status,
                to: target,
            }
            .into());
        }

        // the swap is the commit point, no read-back
        info!(leave_id = id, status = %target, "Leave request decided");
        Ok(LeaveRequest {
            status: target,
            ..request
        })
    }

    async fn find(&self, id: u64) -> Result<Option<LeaveRequest>, LeaveError> {
        self.store.find(id).await.map_err(|e| {
            tracing::error!(error = %e, leave_id = id, "Failed to fetch leave request");
            LeaveError::QueryFailed(e)
        })
    }
}
