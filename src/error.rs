//! Error taxonomy for the effect pipeline.
//!
//! Every pipeline step owns one variant so callers can tell an upload failure
//! from an effect-invocation, scraping or download failure. Network-bound
//! variants carry a [`StepFailure`] describing the root cause.
use reqwest::StatusCode;
use thiserror::Error;

pub type FuniaResult<T> = Result<T, FuniaError>;

#[derive(Debug, Error)]
pub enum FuniaError {
    #[error("failed to acquire session: {0}")]
    Session(#[source] StepFailure),

    #[error("failed to construct request: {0}")]
    RequestConstruction(String),

    #[error("failed to upload image: {0}")]
    Upload(#[source] StepFailure),

    #[error("image key is empty in the upload response")]
    EmptyKey,

    #[error("effect request failed: {0}")]
    EffectRequest(#[source] StepFailure),

    #[error("failed to fetch result page: {0}")]
    ResultFetch(#[source] StepFailure),

    #[error("could not find result image in HTML")]
    ImageNotFound,

    #[error("could not find src attribute in result image tag")]
    SrcAttribute,

    #[error("could not find end of src attribute")]
    UnterminatedAttribute,

    #[error("failed to download image: {0}")]
    ImageDownload(#[source] StepFailure),

    #[error("failed to initialise HTTP client")]
    HttpClient(#[source] reqwest::Error),
}

/// Root cause of a failed network step.
#[derive(Debug, Error)]
pub enum StepFailure {
    #[error("request timed out")]
    Timeout(#[source] reqwest::Error),

    #[error("request failed")]
    Transport(#[source] reqwest::Error),

    #[error("server returned non-success status {0}")]
    Status(StatusCode),

    #[error("failed to decode response")]
    Decode(#[source] serde_json::Error),

    #[error("{0} cookie not found in response")]
    MissingCookie(&'static str),

    #[error("failed to read image data")]
    Read(#[source] std::io::Error),
}

impl From<reqwest::Error> for StepFailure {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            StepFailure::Timeout(err)
        } else {
            StepFailure::Transport(err)
        }
    }
}

impl FuniaError {
    /// The network cause of this error, if it came from a network step.
    pub fn step_failure(&self) -> Option<&StepFailure> {
        match self {
            FuniaError::Session(f)
            | FuniaError::Upload(f)
            | FuniaError::EffectRequest(f)
            | FuniaError::ResultFetch(f)
            | FuniaError::ImageDownload(f) => Some(f),
            _ => None,
        }
    }

    /// True when the failing step was aborted by the configured timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(self.step_failure(), Some(StepFailure::Timeout(_)))
    }

    /// HTTP status of the failing step, when the server answered with a non-success status.
    pub fn status(&self) -> Option<StatusCode> {
        match self.step_failure() {
            Some(StepFailure::Status(status)) => Some(*status),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_is_exposed_for_step_errors() {
        let err = FuniaError::Upload(StepFailure::Status(StatusCode::INTERNAL_SERVER_ERROR));
        assert_eq!(err.status(), Some(StatusCode::INTERNAL_SERVER_ERROR));
        assert!(!err.is_timeout());
        assert!(err.to_string().contains("500"));
    }

    #[test]
    fn scrape_errors_have_no_step_failure() {
        assert!(FuniaError::ImageNotFound.step_failure().is_none());
        assert!(FuniaError::EmptyKey.status().is_none());
    }
}
