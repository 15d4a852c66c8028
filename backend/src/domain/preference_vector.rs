//! Per-user compatibility vectors.
//!
//! Each user may have exactly one vector of integer answers. A user without
//! a vector is a distinct state from a user whose answers are all zero, so
//! absence is modelled as `Option<PreferenceVector>` at the port rather than
//! as an empty or zeroed value.

use serde::{Deserialize, Serialize};

use super::UserId;

/// Validation errors raised when constructing a [`PreferenceVector`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PreferenceVectorError {
    /// The vector carried no components.
    #[error("preference vector for {user_id} must not be empty")]
    Empty {
        /// Owner of the rejected vector.
        user_id: String,
    },
}

/// Fixed-schema integer vector describing a user's preferences.
///
/// # Examples
///
/// ```
/// # use matchmaking::domain::{PreferenceVector, UserId};
/// let user = UserId::new("ada").expect("valid id");
/// let vector = PreferenceVector::new(user, vec![1, 0, 3]).expect("non-empty");
/// assert_eq!(vector.len(), 3);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreferenceVector {
    user_id: UserId,
    values: Vec<i32>,
}

impl PreferenceVector {
    /// Construct a vector, rejecting empty input.
    pub fn new(user_id: UserId, values: Vec<i32>) -> Result<Self, PreferenceVectorError> {
        if values.is_empty() {
            return Err(PreferenceVectorError::Empty {
                user_id: user_id.to_string(),
            });
        }
        Ok(Self { user_id, values })
    }

    /// Owner of the vector.
    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    /// Ordered components.
    pub fn values(&self) -> &[i32] {
        &self.values
    }

    /// Number of components.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Always false; construction rejects empty vectors.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
