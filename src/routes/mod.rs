mod appointments;
mod dashboard;
mod doctors;
mod health_check;
mod medical_records;
mod patients;

pub use appointments::*;
pub use dashboard::*;
pub use doctors::*;
pub use health_check::*;
pub use medical_records::*;
pub use patients::*;

use actix_web::http::StatusCode;
use actix_web::ResponseError;

/// Failure while persisting a submitted form. Fetch failures never surface
/// as errors: list handlers log them and fall back to an empty collection.
#[derive(thiserror::Error)]
pub enum SubmissionError {
    #[error(transparent)]
    UnexpectedError(#[from] anyhow::Error),
}

impl std::fmt::Debug for SubmissionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl ResponseError for SubmissionError {
    fn status_code(&self) -> StatusCode {
        match self {
            SubmissionError::UnexpectedError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

pub fn error_chain_fmt(
    e: &impl std::error::Error,
    f: &mut std::fmt::Formatter<'_>,
) -> std::fmt::Result {
    writeln!(f, "{}\n", e)?;
    let mut current = e.source();
    while let Some(cause) = current {
        writeln!(f, "Caused by:\n\t{}", cause)?;
        current = cause.source();
    }
    Ok(())
}
