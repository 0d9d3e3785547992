use texture_copy_split::{CopySplitValidationError, CopySplitViolation};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Validation(#[from] CopySplitValidationError),
    #[error(transparent)]
    Violation(#[from] CopySplitViolation),
    #[error("{failures} of {cases} sweep cases failed")]
    SweepFailed { failures: usize, cases: usize },
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}
