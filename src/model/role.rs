use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use utoipa::ToSchema;

/// The surface a leave request was submitted from.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize, Display)]
pub enum Submitter {
    Employee,
    Manager,
}

/// Authority that decides a leave request.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize, ToSchema, Display, EnumString)]
pub enum ReviewerRole {
    Manager,
    #[serde(rename = "HR")]
    #[strum(serialize = "HR")]
    Hr,
}

impl Submitter {
    /// Employees are reviewed by their manager, managers by HR.
    pub fn reviewer_role(self) -> ReviewerRole {
        match self {
            Submitter::Employee => ReviewerRole::Manager,
            Submitter::Manager => ReviewerRole::Hr,
        }
    }
}
