pub mod service;
pub mod validation;

pub use service::{LeaveService, Reviewer};
pub use validation::{LeaveForm, validate};
