use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum_macros::Display;
use utoipa::ToSchema;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Raw leave form as typed by the user. Every field is optional so that
/// missing input can be reported per field instead of failing deserialization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LeaveForm {
    #[schema(example = "Medical")]
    pub reason: Option<String>,
    #[schema(example = "2024-05-01", format = "date")]
    pub start_date: Option<String>,
    #[schema(example = "2024-05-03", format = "date")]
    pub end_date: Option<String>,
    /// Specific reviewer to route the request to
    #[schema(example = 7)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviewer_id: Option<u64>,
}

impl LeaveForm {
    pub fn new(reason: &str, start_date: &str, end_date: &str) -> Self {
        Self {
            reason: Some(reason.to_string()),
            start_date: Some(start_date.to_string()),
            end_date: Some(end_date.to_string()),
            reviewer_id: None,
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize, ToSchema, derive_more::Display)]
pub enum Field {
    #[serde(rename = "reason")]
    #[display(fmt = "reason")]
    Reason,
    #[serde(rename = "startDate")]
    #[display(fmt = "startDate")]
    StartDate,
    #[serde(rename = "endDate")]
    #[display(fmt = "endDate")]
    EndDate,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize, ToSchema, Display)]
pub enum ValidationCode {
    ReasonRequired,
    StartDateRequired,
    StartDateInvalid,
    EndDateRequired,
    EndDateInvalid,
    EndDateBeforeStart,
}

impl ValidationCode {
    pub fn field(self) -> Field {
        match self {
            ValidationCode::ReasonRequired => Field::Reason,
            ValidationCode::StartDateRequired | ValidationCode::StartDateInvalid => Field::StartDate,
            ValidationCode::EndDateRequired
            | ValidationCode::EndDateInvalid
            | ValidationCode::EndDateBeforeStart => Field::EndDate,
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            ValidationCode::ReasonRequired => "Reason is required",
            ValidationCode::StartDateRequired => "Start date is required",
            ValidationCode::StartDateInvalid => "Start date must be a YYYY-MM-DD date",
            ValidationCode::EndDateRequired => "End date is required",
            ValidationCode::EndDateInvalid => "End date must be a YYYY-MM-DD date",
            ValidationCode::EndDateBeforeStart => "End date must be after start date",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FieldError {
    #[schema(example = "endDate")]
    pub field: Field,
    #[schema(example = "EndDateBeforeStart")]
    pub code: ValidationCode,
    #[schema(example = "End date must be after start date")]
    pub message: String,
}

impl From<ValidationCode> for FieldError {
    fn from(code: ValidationCode) -> Self {
        Self {
            field: code.field(),
            code,
            message: code.message().to_string(),
        }
    }
}

/// Every field error found in one pass over a form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }

    pub fn for_field(&self, field: Field) -> Option<&FieldError> {
        self.0.iter().find(|e| e.field == field)
    }

    pub fn codes(&self) -> Vec<ValidationCode> {
        self.0.iter().map(|e| e.code).collect()
    }

    pub fn into_inner(self) -> Vec<FieldError> {
        self.0
    }
}

impl From<Vec<FieldError>> for ValidationErrors {
    fn from(errors: Vec<FieldError>) -> Self {
        Self(errors)
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for error in &self.0 {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", error.field, error.message)?;
            first = false;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// A form that passed every rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidLeave {
    pub reason: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub reviewer_id: Option<u64>,
}

/// Checks reason, start date and end date in that order, collecting every violation.
pub fn validate(form: &LeaveForm) -> Result<ValidLeave, ValidationErrors> {
    let mut errors: Vec<FieldError> = Vec::new();

    let reason = form
        .reason
        .as_deref()
        .map(str::trim)
        .filter(|r| !r.is_empty());
    if reason.is_none() {
        errors.push(ValidationCode::ReasonRequired.into());
    }

    let start_date = parse_date(
        form.start_date.as_deref(),
        ValidationCode::StartDateRequired,
        ValidationCode::StartDateInvalid,
        &mut errors,
    );
    let end_date = parse_date(
        form.end_date.as_deref(),
        ValidationCode::EndDateRequired,
        ValidationCode::EndDateInvalid,
        &mut errors,
    );

    if let (Some(start), Some(end)) = (start_date, end_date) {
        if end < start {
            errors.push(ValidationCode::EndDateBeforeStart.into());
        }
    }

    match (reason, start_date, end_date) {
        (Some(reason), Some(start_date), Some(end_date)) if errors.is_empty() => Ok(ValidLeave {
            reason: reason.to_string(),
            start_date,
            end_date,
            reviewer_id: form.reviewer_id,
        }),
        _ => Err(ValidationErrors(errors)),
    }
}

fn parse_date(
    raw: Option<&str>,
    missing: ValidationCode,
    malformed: ValidationCode,
    errors: &mut Vec<FieldError>,
) -> Option<NaiveDate> {
    let raw = raw.map(str::trim).filter(|s| !s.is_empty());
    let Some(raw) = raw else {
        errors.push(missing.into());
        return None;
    };
    match NaiveDate::parse_from_str(raw, DATE_FORMAT) {
        Ok(date) => Some(date),
        Err(_) => {
            errors.push(malformed.into());
            None
        }
    }
}
