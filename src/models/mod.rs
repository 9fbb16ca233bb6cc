pub mod enums;
pub mod field;
pub mod filters;
pub mod provider;
pub mod report_log;
pub mod schedule;
pub mod template;

pub use enums::*;
pub use field::*;
pub use filters::*;
pub use provider::*;
pub use report_log::*;
pub use schedule::*;
pub use template::*;

use thiserror::Error;

/// Client-fault input failures. Always 4xx at the API boundary, never
/// retried.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Invalid field code {code}: {reason}")]
    InvalidFieldCode { code: String, reason: String },

    #[error("A template needs at least one data field")]
    MissingDataFields,

    #[error("Too many data fields: {count} exceeds the limit of {max}")]
    TooManyDataFields { count: usize, max: usize },

    #[error("Invalid field category: {0} (expected header, data or summary)")]
    InvalidCategory(String),

    #[error("Invalid field type: {0} (expected text, numeric, date or boolean)")]
    InvalidFieldType(String),

    #[error("Invalid frequency: {0} (expected daily, weekly or monthly)")]
    InvalidFrequency(String),

    #[error("Invalid send status: {0} (expected success, failed or pending)")]
    InvalidStatus(String),

    #[error("Invalid email address: {0}")]
    InvalidEmail(String),

    #[error("{field} must not be empty")]
    MissingField { field: &'static str },
}
