use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};

use crate::client::{GatewayError, LeaveGateway};
use crate::error::ErrorBody;
use crate::leave::validation::LeaveForm;
use crate::model::leave_request::LeaveRequest;
use crate::model::role::Submitter;

/// Talks to the leave service over its REST routes.
#[derive(Debug, Clone)]
pub struct HttpLeaveClient {
    base_url: String,
    http: Client,
}

impl HttpLeaveClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, Client::new())
    }

    pub fn with_client(base_url: impl Into<String>, http: Client) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url, http }
    }

    /// Submission endpoint and the query key naming the requester.
    fn submit_target(&self, submitter: Submitter) -> (String, &'static str) {
        match submitter {
            Submitter::Employee => (format!("{}/leave/apply", self.base_url), "userId"),
            Submitter::Manager => (format!("{}/leave/manager/apply", self.base_url), "managerId"),
        }
    }

    fn list_url(&self, requester_id: u64) -> String {
        format!("{}/leave/user/{}", self.base_url, requester_id)
    }
}

fn transport(e: reqwest::Error) -> GatewayError {
    GatewayError::Transport(e.to_string())
}

async fn failure(response: Response) -> GatewayError {
    let status = response.status();
    match response.json::<ErrorBody>().await {
        Ok(body) if status == StatusCode::BAD_REQUEST && !body.errors.is_empty() => {
            GatewayError::Rejected(body.errors)
        }
        Ok(body) => GatewayError::Transport(format!("{status}: {}", body.message)),
        Err(_) => GatewayError::Transport(status.to_string()),
    }
}

#[async_trait]
impl LeaveGateway for HttpLeaveClient {
    async fn submit(
        &self,
        submitter: Submitter,
        requester_id: u64,
        form: &LeaveForm,
    ) -> Result<LeaveRequest, GatewayError> {
        let (url, key) = self.submit_target(submitter);
        let response = self
            .http
            .post(url)
            .query(&[(key, requester_id)])
            .json(form)
            .send()
            .await
            .map_err(transport)?;

        if !response.status().is_success() {
            return Err(failure(response).await);
        }
        response.json().await.map_err(transport)
    }

    async fn list_by_requester(&self, requester_id: u64) -> Result<Vec<LeaveRequest>, GatewayError> {
        let response = self
            .http
            .get(self.list_url(requester_id))
            .send()
            .await
            .map_err(transport)?;

        if !response.status().is_success() {
            return Err(failure(response).await);
        }
        response.json().await.map_err(transport)
    }
}
