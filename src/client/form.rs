use std::sync::atomic::{AtomicBool, Ordering};

use futures::lock::Mutex;
use tracing::warn;

use crate::client::{GatewayError, LeaveGateway};
use crate::leave::validation::{LeaveForm, ValidationErrors, validate};
use crate::model::leave_request::LeaveRequest;
use crate::model::role::Submitter;

pub const SUBMITTED_MESSAGE: &str = "Leave application submitted successfully!";
pub const SUBMIT_FAILED_MESSAGE: &str = "Failed to submit leave application.";
pub const LOAD_FAILED_MESSAGE: &str = "Failed to load leave requests.";

/// Dismissible message shown above the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Submitted { id: u64 },
    Failed(String),
}

impl Notice {
    pub fn text(&self) -> &str {
        match self {
            Notice::Submitted { .. } => SUBMITTED_MESSAGE,
            Notice::Failed(message) => message,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Created(LeaveRequest),
    /// Field errors are available through [`FormView::errors`].
    Invalid,
    /// Another submission from this form is still outstanding.
    Busy,
    Failed,
}

/// Snapshot of everything a screen renders.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormView {
    pub input: LeaveForm,
    pub errors: ValidationErrors,
    pub notice: Option<Notice>,
    pub requests: Vec<LeaveRequest>,
    pub submitting: bool,
}

#[derive(Default)]
struct FormState {
    input: LeaveForm,
    errors: ValidationErrors,
    notice: Option<Notice>,
    requests: Vec<LeaveRequest>,
}

/// Clears the in-flight flag however the submission ends, including when
/// the caller drops the future halfway.
struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn enter(flag: &'a AtomicBool) -> Option<Self> {
        (!flag.swap(true, Ordering::AcqRel)).then_some(Self(flag))
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Leave form of one screen, bound to one requester.
pub struct SubmissionForm<G> {
    gateway: G,
    submitter: Submitter,
    requester_id: u64,
    state: Mutex<FormState>,
    in_flight: AtomicBool,
}

impl<G: LeaveGateway> SubmissionForm<G> {
    pub fn new(gateway: G, submitter: Submitter, requester_id: u64) -> Self {
        Self {
            gateway,
            submitter,
            requester_id,
            state: Mutex::new(FormState::default()),
            in_flight: AtomicBool::new(false),
        }
    }

    pub async fn edit(&self, change: impl FnOnce(&mut LeaveForm)) {
        change(&mut self.state.lock().await.input);
    }

    pub fn is_submitting(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    pub async fn view(&self) -> FormView {
        let state = self.state.lock().await;
        FormView {
            input: state.input.clone(),
            errors: state.errors.clone(),
            notice: state.notice.clone(),
            requests: state.requests.clone(),
            submitting: self.is_submitting(),
        }
    }

    pub async fn dismiss_notice(&self) {
        self.state.lock().await.notice = None;
    }

    /// Validates locally, submits, then refreshes the list. The typed input is
    /// never cleared, so a failed attempt can be retried as is.
    pub async fn submit(&self) -> SubmitOutcome {
        let Some(guard) = InFlight::enter(&self.in_flight) else {
            return SubmitOutcome::Busy;
        };

        let form = {
            let mut state = self.state.lock().await;
            if let Err(errors) = validate(&state.input) {
                state.errors = errors;
                return SubmitOutcome::Invalid;
            }
            state.errors = ValidationErrors::default();
            state.input.clone()
        };

        let result = self
            .gateway
            .submit(self.submitter, self.requester_id, &form)
            .await;
        drop(guard);

        match result {
            Ok(created) => {
                self.state.lock().await.notice = Some(Notice::Submitted { id: created.id });
                // a failed refresh leaves its own notice; the submission still stands
                let _ = self.refresh().await;
                SubmitOutcome::Created(created)
            }
            Err(GatewayError::Rejected(errors)) => {
                self.state.lock().await.errors = errors.into();
                SubmitOutcome::Invalid
            }
            Err(GatewayError::Transport(reason)) => {
                warn!(requester_id = self.requester_id, %reason, "Leave submission failed");
                self.state.lock().await.notice = Some(Notice::Failed(SUBMIT_FAILED_MESSAGE.to_string()));
                SubmitOutcome::Failed
            }
        }
    }

    /// Reloads the requester's leave list. On failure the previous list stays.
    pub async fn refresh(&self) -> Result<(), GatewayError> {
        match self.gateway.list_by_requester(self.requester_id).await {
            Ok(requests) => {
                self.state.lock().await.requests = requests;
                Ok(())
            }
            Err(e) => {
                warn!(requester_id = self.requester_id, error = %e, "Leave list refresh failed");
                self.state.lock().await.notice = Some(Notice::Failed(LOAD_FAILED_MESSAGE.to_string()));
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::leave::validation::{Field, FieldError, ValidationCode};
    use crate::leave::LeaveService;
    use crate::error::LeaveError;
    use crate::store::MemoryStore;
    use async_trait::async_trait;
    use std::sync::Arc;
    use std::sync::atomic::AtomicUsize;

    /// Gateway backed by an in-process service, with switchable outages.
    struct LocalGateway {
        service: LeaveService,
        down: AtomicBool,
        submits: AtomicUsize,
    }

    impl LocalGateway {
        fn new() -> Self {
            Self {
                service: LeaveService::new(Arc::new(MemoryStore::new())),
                down: AtomicBool::new(false),
                submits: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl<'a> LeaveGateway for &'a LocalGateway {
        async fn submit(
            &self,
            submitter: Submitter,
            requester_id: u64,
            form: &LeaveForm,
        ) -> Result<LeaveRequest, GatewayError> {
            self.submits.fetch_add(1, Ordering::SeqCst);
            if self.down.load(Ordering::SeqCst) {
                return Err(GatewayError::Transport("connection refused".into()));
            }
            self.service
                .submit(submitter, requester_id, form)
                .await
                .map_err(|e| match e {
                    LeaveError::Validation(errors) => GatewayError::Rejected(errors.into_inner()),
                    other => GatewayError::Transport(other.to_string()),
                })
        }

        async fn list_by_requester(&self, requester_id: u64) -> Result<Vec<LeaveRequest>, GatewayError> {
            if self.down.load(Ordering::SeqCst) {
                return Err(GatewayError::Transport("connection refused".into()));
            }
            self.service
                .list_by_requester(requester_id)
                .await
                .map_err(|e| GatewayError::Transport(e.to_string()))
        }
    }

    /// Gateway that always answers with server-side field errors.
    struct RejectingGateway;

    #[async_trait]
    impl LeaveGateway for RejectingGateway {
        async fn submit(&self, _: Submitter, _: u64, _: &LeaveForm) -> Result<LeaveRequest, GatewayError> {
            Err(GatewayError::Rejected(vec![FieldError::from(
                ValidationCode::EndDateBeforeStart,
            )]))
        }

        async fn list_by_requester(&self, _: u64) -> Result<Vec<LeaveRequest>, GatewayError> {
            Ok(Vec::new())
        }
    }

    async fn fill(form: &SubmissionForm<impl LeaveGateway>, reason: &str, start: &str, end: &str) {
        form.edit(|input| *input = LeaveForm::new(reason, start, end)).await;
    }

    #[actix_web::test]
    async fn successful_submit_refreshes_the_list() {
        let gateway = LocalGateway::new();
        let form = SubmissionForm::new(&gateway, Submitter::Employee, 1);
        fill(&form, "Medical", "2024-05-01", "2024-05-03").await;

        let created = match form.submit().await {
            SubmitOutcome::Created(created) => created,
            other => panic!("expected created, got {other:?}"),
        };

        let view = form.view().await;
        assert_eq!(view.requests, vec![created.clone()]);
        assert_eq!(view.notice, Some(Notice::Submitted { id: created.id }));
        assert_eq!(view.notice.unwrap().text(), SUBMITTED_MESSAGE);
        assert!(view.errors.is_empty());
        assert!(!view.submitting);
    }

    #[actix_web::test]
    async fn invalid_input_never_reaches_the_gateway() {
        let gateway = LocalGateway::new();
        let form = SubmissionForm::new(&gateway, Submitter::Manager, 4);
        fill(&form, "", "2024-05-03", "2024-05-01").await;

        assert_eq!(form.submit().await, SubmitOutcome::Invalid);
        assert_eq!(gateway.submits.load(Ordering::SeqCst), 0);

        let view = form.view().await;
        assert!(view.errors.for_field(Field::Reason).is_some());
        assert!(view.errors.for_field(Field::EndDate).is_some());
        assert!(!form.is_submitting());
    }

    #[actix_web::test]
    async fn transport_failure_keeps_input_and_can_be_retried() {
        let gateway = LocalGateway::new();
        gateway.down.store(true, Ordering::SeqCst);
        let form = SubmissionForm::new(&gateway, Submitter::Employee, 1);
        fill(&form, "Medical", "2024-05-01", "2024-05-03").await;

        assert_eq!(form.submit().await, SubmitOutcome::Failed);
        let view = form.view().await;
        assert_eq!(view.input, LeaveForm::new("Medical", "2024-05-01", "2024-05-03"));
        assert_eq!(view.notice.as_ref().map(Notice::text), Some(SUBMIT_FAILED_MESSAGE));

        form.dismiss_notice().await;
        assert!(form.view().await.notice.is_none());

        gateway.down.store(false, Ordering::SeqCst);
        assert!(matches!(form.submit().await, SubmitOutcome::Created(_)));
        assert_eq!(form.view().await.requests.len(), 1);
    }

    #[actix_web::test]
    async fn server_rejections_show_as_field_errors() {
        let form = SubmissionForm::new(RejectingGateway, Submitter::Employee, 1);
        fill(&form, "Medical", "2024-05-01", "2024-05-03").await;

        assert_eq!(form.submit().await, SubmitOutcome::Invalid);
        let view = form.view().await;
        assert_eq!(view.errors.codes(), vec![ValidationCode::EndDateBeforeStart]);
        assert!(view.notice.is_none());
    }

    #[actix_web::test]
    async fn second_submit_while_in_flight_is_refused() {
        let gateway = LocalGateway::new();
        let form = SubmissionForm::new(&gateway, Submitter::Employee, 1);
        fill(&form, "Medical", "2024-05-01", "2024-05-03").await;

        let guard = InFlight::enter(&form.in_flight).unwrap();
        assert!(form.is_submitting());
        assert_eq!(form.submit().await, SubmitOutcome::Busy);
        drop(guard);

        assert!(matches!(form.submit().await, SubmitOutcome::Created(_)));
        assert_eq!(gateway.submits.load(Ordering::SeqCst), 1);
    }

    #[actix_web::test]
    async fn failed_refresh_keeps_the_previous_list() {
        let gateway = LocalGateway::new();
        let form = SubmissionForm::new(&gateway, Submitter::Employee, 1);
        fill(&form, "Medical", "2024-05-01", "2024-05-03").await;
        assert!(matches!(form.submit().await, SubmitOutcome::Created(_)));

        gateway.down.store(true, Ordering::SeqCst);
        assert!(form.refresh().await.is_err());
        let view = form.view().await;
        assert_eq!(view.requests.len(), 1);
        assert_eq!(view.notice.as_ref().map(Notice::text), Some(LOAD_FAILED_MESSAGE));
    }
}
