//! Domain primitives, the matching engine, and its ports.
//!
//! - Entities: [`UserId`], [`AvailabilitySlot`], [`OverlapInterval`],
//!   [`PreferenceVector`], [`CandidateMatch`], [`CachedMatch`].
//! - [`matching`]: resolver, ranker, cache and the query service.
//! - [`ports`]: driven repositories and the [`ports::MatchQuery`] use case.
//! - [`Error`] / [`ErrorCode`]: transport-agnostic error payload.

pub mod availability;
pub mod candidate;
pub mod error;
pub mod matching;
pub mod ports;
pub mod preference_vector;
pub mod user;

pub use self::availability::{
    AvailabilitySlot, DayOfWeek, OverlapInterval, ParseDayOfWeekError, SlotValidationError,
    TIME_FORMAT, overlaps_between, parse_time,
};
pub use self::candidate::{CachedMatch, CandidateMatch};
pub use self::error::{Error, ErrorCode, ErrorValidationError, TRACE_ID_HEADER};
pub use self::preference_vector::{PreferenceVector, PreferenceVectorError};
pub use self::user::{USER_ID_MAX, UserId, UserValidationError};

