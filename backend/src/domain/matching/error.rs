//! Failure taxonomy of the matching engine and its mapping to [`Error`].

use pagination::PageWindowError;
use serde_json::json;
use tracing::{error, warn};

use crate::domain::ports::{
    AvailabilityRepositoryError, MatchCacheRepositoryError, PreferenceVectorRepositoryError,
};
use crate::domain::{Error, UserId};

/// Violations of the scorer's input contract.
///
/// These indicate corrupt upstream data and are never user-correctable.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScoreContractError {
    /// The two vectors had different lengths.
    #[error("preference vectors differ in length: {left} vs {right}")]
    LengthMismatch {
        /// Length of the seed vector.
        left: usize,
        /// Length of the candidate vector.
        right: usize,
    },
}

/// Errors surfaced by [`MatchQuery::get_page`](crate::domain::ports::MatchQuery::get_page).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MatchError {
    /// The request itself is wrong; retrying it unchanged cannot succeed.
    #[error("invalid argument: {message}")]
    InvalidArgument {
        /// What was wrong.
        message: String,
    },
    /// The seed user has not set a preference vector.
    #[error("user {user_id} has no preference vector")]
    MissingVector {
        /// Seed user.
        user_id: UserId,
    },
    /// A storage adapter failed. Not retried inside the engine.
    #[error("storage failure: {message}")]
    Storage {
        /// Adapter message.
        message: String,
        /// Whether the boundary may retry.
        retryable: bool,
    },
    /// Internal invariant violation in scoring.
    #[error(transparent)]
    ScoreContract(#[from] ScoreContractError),
}

impl MatchError {
    /// Convenience constructor for [`MatchError::InvalidArgument`].
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    fn storage(message: String, retryable: bool) -> Self {
        Self::Storage { message, retryable }
    }
}

impl From<PageWindowError> for MatchError {
    fn from(value: PageWindowError) -> Self {
        Self::invalid_argument(value.to_string())
    }
}

impl From<AvailabilityRepositoryError> for MatchError {
    fn from(value: AvailabilityRepositoryError) -> Self {
        match value {
            AvailabilityRepositoryError::UnknownUser { .. } => {
                Self::invalid_argument(value.to_string())
            }
            other => Self::storage(other.to_string(), other.is_retryable()),
        }
    }
}

impl From<PreferenceVectorRepositoryError> for MatchError {
    fn from(value: PreferenceVectorRepositoryError) -> Self {
        Self::storage(value.to_string(), value.is_retryable())
    }
}

impl From<MatchCacheRepositoryError> for MatchError {
    fn from(value: MatchCacheRepositoryError) -> Self {
        Self::storage(value.to_string(), value.is_retryable())
    }
}

impl From<MatchError> for Error {
    fn from(value: MatchError) -> Self {
        match value {
            MatchError::InvalidArgument { message } => Error::invalid_request(message),
            MatchError::MissingVector { user_id } => {
                Error::precondition_failed("set your preferences before requesting matches")
                    .with_details(json!({
                        "code": "missing_preference_vector",
                        "userId": user_id.as_str(),
                    }))
            }
            MatchError::Storage {
                message,
                retryable: true,
            } => {
                warn!(%message, "match storage temporarily unavailable");
                Error::service_unavailable("matches are temporarily unavailable")
            }
            MatchError::Storage {
                message,
                retryable: false,
            } => {
                error!(%message, "match storage failed");
                Error::internal(format!("match storage failed: {message}"))
            }
            MatchError::ScoreContract(err) => {
                error!(error = %err, "score contract violated");
                Error::internal(err.to_string())
            }
        }
    }
}
