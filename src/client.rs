//! Caller side of the leave service: an HTTP gateway plus the form state the
//! Employee and Manager screens drive.

pub mod form;
pub mod http;

use async_trait::async_trait;

use crate::leave::validation::{FieldError, LeaveForm};
use crate::model::leave_request::LeaveRequest;
use crate::model::role::Submitter;

pub use form::{Notice, SubmissionForm, SubmitOutcome};
pub use http::HttpLeaveClient;

#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// The service re-validated the payload and refused it.
    #[error("leave request rejected by the service")]
    Rejected(Vec<FieldError>),
    #[error("leave service unavailable: {0}")]
    Transport(String),
}

#[async_trait]
pub trait LeaveGateway: Send + Sync {
    async fn submit(
        &self,
        submitter: Submitter,
        requester_id: u64,
        form: &LeaveForm,
    ) -> Result<LeaveRequest, GatewayError>;

    async fn list_by_requester(&self, requester_id: u64) -> Result<Vec<LeaveRequest>, GatewayError>;
}
