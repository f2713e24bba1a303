use crate::error::ErrorBody;
use crate::leave::validation::{Field, FieldError, LeaveForm, ValidationCode};
use crate::model::leave_request::{LeaveRequest, LeaveStatus};
use crate::model::role::ReviewerRole;
use crate::utils::sample_feed::SampleFrame;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Leave Desk API",
        version = "1.0.0",
        description = r#"
## Leave Desk

Leave requests for the **Employee**, **Manager** and **HR** screens.

### 🔹 Key Features
- **Leave Submission**
  - Employees apply for leave, reviewed by their manager
  - Managers apply for leave, reviewed by HR
- **Leave Status**
  - List every request of a user, whatever its status
- **Leave Decisions**
  - The reviewing authority approves or denies a pending request, once

### 📦 Response Format
- JSON, camelCase fields, dates as `YYYY-MM-DD`
- Errors carry a `code`; validation errors list every failing field in `errors`

---
Built with **Rust**, **Actix Web**, **SQLx**, and **Utoipa**.
"#,
    ),
    paths(
        crate::api::leave_request::apply_leave,
        crate::api::leave_request::apply_manager_leave,
        crate::api::leave_request::list_user_leaves,
        crate::api::leave_request::get_leave,
        crate::api::leave_request::approve_leave,
        crate::api::leave_request::deny_leave,

        crate::api::metrics::hr_metrics
    ),
    components(
        schemas(
            LeaveRequest,
            LeaveStatus,
            ReviewerRole,
            LeaveForm,
            Field,
            ValidationCode,
            FieldError,
            ErrorBody,
            SampleFrame
        )
    ),
    tags(
        (name = "Leave", description = "Leave request APIs"),
        (name = "HR", description = "HR dashboard APIs"),
    )
)]
pub struct ApiDoc;
