use async_trait::async_trait;
use futures::lock::Mutex;

use crate::model::leave_request::{LeaveDraft, LeaveRequest, LeaveStatus};
use crate::store::{LeaveStore, StoreError};

/// Process-local store. All access is serialized by one async mutex, so ids
/// are handed out in order and status swaps are atomic with respect to reads.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    last_id: u64,
    rows: Vec<LeaveRequest>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LeaveStore for MemoryStore {
    async fn insert(&self, draft: LeaveDraft) -> Result<LeaveRequest, StoreError> {
        let mut inner = self.inner.lock().await;
        inner.last_id += 1;
        let request = draft.into_request(inner.last_id);
        inner.rows.push(request.clone());
        Ok(request)
    }

    async fn list_by_requester(&self, requester_id: u64) -> Result<Vec<LeaveRequest>, StoreError> {
        let inner = self.inner.lock().await;
        Ok(inner
            .rows
            .iter()
            .filter(|r| r.requester_id == requester_id)
            .cloned()
            .collect())
    }

    async fn find(&self, id: u64) -> Result<Option<LeaveRequest>, StoreError> {
        let inner = self.inner.lock().await;
        Ok(inner.rows.iter().find(|r| r.id == id).cloned())
    }

    async fn swap_status(&self, id: u64, from: LeaveStatus, to: LeaveStatus) -> Result<bool, StoreError> {
        let mut inner = self.inner.lock().await;
        match inner.rows.iter_mut().find(|r| r.id == id) {
            Some(row) if row.status == from => {
                row.status = to;
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}
