//! Error types.
//!
//! - `ReportError`: failures while building a report (library level). Every
//!   variant names the quantity, report or selection it concerns.
//! - `AppError`: what the binary reports to the user, paired with an exit code.
//!
//! Exit codes:
//! - `2` bad input or IO (CSV, export paths)
//! - `3` report construction failed
//! - `4` terminal/runtime failure

use thiserror::Error;

pub type ReportResult<T> = Result<T, ReportError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ReportError {
    #[error("quantity `{quantity}` is not present in the records")]
    InvalidQuantity { quantity: String },

    #[error("quantity `{quantity}` has no value for year {year}")]
    MissingValue { quantity: String, year: i32 },

    #[error("quantity `{quantity}` needs at least 2 distinct years, found {years}")]
    InsufficientData { quantity: String, years: usize },

    /// Years must form a dense consecutive sequence.
    #[error("quantity `{quantity}` skips years between {from} and {to}")]
    YearGap { quantity: String, from: i32, to: i32 },

    #[error("quantity `{quantity}` has invalid value {value} for year {year}")]
    InvalidValue { quantity: String, year: i32, value: f64 },

    #[error("report `{report}` has no categories")]
    NoCategories { report: String },

    #[error("report `{report}` has no metrics")]
    NoMetrics { report: String },

    #[error("report `{report}` needs {needed} palette colors, only {available} given")]
    PaletteTooShort {
        report: String,
        needed: usize,
        available: usize,
    },

    #[error("invalid color `{0}` (expected #rrggbb)")]
    InvalidColor(String),

    #[error("selection {index} is out of range ({groups} groups)")]
    UnknownSelection { index: usize, groups: usize },
}

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl From<ReportError> for AppError {
    fn from(err: ReportError) -> Self {
        AppError::new(3, format!("Failed to build report: {err}"))
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_errors_map_to_exit_code_3() {
        let err: AppError = ReportError::InvalidQuantity {
            quantity: "Transfers".to_string(),
        }
        .into();
        assert_eq!(err.exit_code(), 3);
        assert!(err.to_string().contains("Transfers"));
    }
}
