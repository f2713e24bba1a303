//! Storage seam for leave requests.
//!
//! The service never talks to a database directly; it goes through
//! [`LeaveStore`], which is implemented in memory and on MySQL.

pub mod memory;
pub mod mysql;

use async_trait::async_trait;

use crate::model::leave_request::{LeaveDraft, LeaveRequest, LeaveStatus};

pub use memory::MemoryStore;
pub use mysql::MySqlStore;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("leave request {id} is unreadable: {detail}")]
    Corrupt { id: u64, detail: String },
}

#[async_trait]
pub trait LeaveStore: Send + Sync {
    /// Persists a draft and returns it with its freshly assigned id.
    async fn insert(&self, draft: LeaveDraft) -> Result<LeaveRequest, StoreError>;

    /// Requests of one requester in storage order. Unknown requesters get an empty list.
    async fn list_by_requester(&self, requester_id: u64) -> Result<Vec<LeaveRequest>, StoreError>;

    async fn find(&self, id: u64) -> Result<Option<LeaveRequest>, StoreError>;

    /// Sets `to` only if the request is still in `from`. Returns whether it changed.
    async fn swap_status(&self, id: u64, from: LeaveStatus, to: LeaveStatus) -> Result<bool, StoreError>;
}
