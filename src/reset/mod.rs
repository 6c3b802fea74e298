pub mod consume;
pub mod issue;
pub mod sweep;
pub mod validate;

use crate::error::AppError;

pub use consume::{consume, Consumed};
pub use issue::{issue, IssueOutcome, ResetLinks};
pub use sweep::{SweepOptions, SweepReport};
pub use validate::validate;

/// Blank input counts as missing.
fn required<'a>(value: Option<&'a str>, name: &'static str) -> Result<&'a str, AppError> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or(AppError::MissingParameter(name))
}
