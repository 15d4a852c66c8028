//! Weekly recurring availability and the overlap rule between slots.
//!
//! A slot is a same-day `[start, end)` range on one day of the week. Two
//! slots overlap when they fall on the same day and their intersection has
//! non-zero width; touching ranges (one ends exactly when the other starts)
//! do not count.

use std::fmt;

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::UserId;

/// Wall-clock format used for slot boundaries.
pub const TIME_FORMAT: &str = "%H:%M";

/// Day of the week a slot recurs on.
///
/// # Examples
///
/// ```
/// # use matchmaking::domain::DayOfWeek;
/// let day: DayOfWeek = "Tuesday".parse().expect("known day");
/// assert_eq!(day, DayOfWeek::Tuesday);
/// assert_eq!(day.as_str(), "Tuesday");
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema,
)]
pub enum DayOfWeek {
    /// Monday.
    Monday,
    /// Tuesday.
    Tuesday,
    /// Wednesday.
    Wednesday,
    /// Thursday.
    Thursday,
    /// Friday.
    Friday,
    /// Saturday.
    Saturday,
    /// Sunday.
    Sunday,
}

impl DayOfWeek {
    /// All days, Monday first.
    pub const ALL: [Self; 7] = [
        Self::Monday,
        Self::Tuesday,
        Self::Wednesday,
        Self::Thursday,
        Self::Friday,
        Self::Saturday,
        Self::Sunday,
    ];

    /// Returns the stored string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Monday => "Monday",
            Self::Tuesday => "Tuesday",
            Self::Wednesday => "Wednesday",
            Self::Thursday => "Thursday",
            Self::Friday => "Friday",
            Self::Saturday => "Saturday",
            Self::Sunday => "Sunday",
        }
    }
}

impl fmt::Display for DayOfWeek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown day name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseDayOfWeekError {
    /// The unrecognised input value.
    pub input: String,
}

impl fmt::Display for ParseDayOfWeekError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown day of week: {}; must be Monday through Sunday",
            self.input
        )
    }
}

impl std::error::Error for ParseDayOfWeekError {}

impl std::str::FromStr for DayOfWeek {
    type Err = ParseDayOfWeekError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|day| day.as_str() == s)
            .ok_or_else(|| ParseDayOfWeekError {
                input: s.to_owned(),
            })
    }
}

/// Validation errors raised when constructing an [`AvailabilitySlot`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SlotValidationError {
    /// A boundary did not parse as `HH:MM`.
    #[error("invalid {field}: expected HH:MM, got {value}")]
    InvalidTime {
        /// Which boundary failed (`start_time` or `end_time`).
        field: &'static str,
        /// The rejected input.
        value: String,
    },
    /// The slot was empty or ran backwards.
    #[error("start_time must be earlier than end_time")]
    StartNotBeforeEnd,
    /// A boundary carried seconds; slots are whole minutes.
    #[error("{field} must be a whole minute, got {value}")]
    SubMinuteTime {
        /// Which boundary failed (`start_time` or `end_time`).
        field: &'static str,
        /// The rejected value.
        value: NaiveTime,
    },
}

/// Parse an `HH:MM` boundary.
pub fn parse_time(field: &'static str, value: &str) -> Result<NaiveTime, SlotValidationError> {
    NaiveTime::parse_from_str(value, TIME_FORMAT).map_err(|_| SlotValidationError::InvalidTime {
        field,
        value: value.to_owned(),
    })
}

fn whole_minute(field: &'static str, value: NaiveTime) -> Result<(), SlotValidationError> {
    if value.second() == 0 && value.nanosecond() == 0 {
        Ok(())
    } else {
        Err(SlotValidationError::SubMinuteTime { field, value })
    }
}

/// One weekly recurring availability range owned by a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvailabilitySlot {
    id: i64,
    user_id: UserId,
    day: DayOfWeek,
    start: NaiveTime,
    end: NaiveTime,
}

impl AvailabilitySlot {
    /// Construct a slot, rejecting empty or reversed ranges and boundaries
    /// that are not whole minutes.
    ///
    /// # Examples
    ///
    /// ```
    /// # use chrono::NaiveTime;
    /// # use matchmaking::domain::{AvailabilitySlot, DayOfWeek, UserId};
    /// let user = UserId::new("ada").expect("valid id");
    /// let nine = NaiveTime::from_hms_opt(9, 0, 0).expect("time");
    /// let ten = NaiveTime::from_hms_opt(10, 0, 0).expect("time");
    ///
    /// assert!(AvailabilitySlot::new(1, user.clone(), DayOfWeek::Monday, nine, ten).is_ok());
    /// assert!(AvailabilitySlot::new(2, user, DayOfWeek::Monday, ten, nine).is_err());
    /// ```
    pub fn new(
        id: i64,
        user_id: UserId,
        day: DayOfWeek,
        start: NaiveTime,
        end: NaiveTime,
    ) -> Result<Self, SlotValidationError> {
        whole_minute("start_time", start)?;
        whole_minute("end_time", end)?;
        if start >= end {
            return Err(SlotValidationError::StartNotBeforeEnd);
        }
        Ok(Self {
            id,
            user_id,
            day,
            start,
            end,
        })
    }

    /// Construct a slot from the `HH:MM` strings used at the edges.
    pub fn parse(
        id: i64,
        user_id: UserId,
        day: DayOfWeek,
        start: &str,
        end: &str,
    ) -> Result<Self, SlotValidationError> {
        let start_time = parse_time("start_time", start)?;
        let end_time = parse_time("end_time", end)?;
        Self::new(id, user_id, day, start_time, end_time)
    }

    /// Storage identifier.
    pub fn id(&self) -> i64 {
        self.id
    }

    /// Owner of the slot.
    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    /// Day the slot recurs on.
    pub fn day(&self) -> DayOfWeek {
        self.day
    }

    /// Inclusive start.
    pub fn start(&self) -> NaiveTime {
        self.start
    }

    /// Exclusive end.
    pub fn end(&self) -> NaiveTime {
        self.end
    }

    /// Intersection with another slot, when it has non-zero width.
    pub fn overlap_with(&self, other: &Self) -> Option<OverlapInterval> {
        if self.day != other.day {
            return None;
        }
        let start = self.start.max(other.start);
        let end = self.end.min(other.end);
        (start < end).then_some(OverlapInterval {
            day: self.day,
            start,
            end,
        })
    }
}

/// Shared window between two users' slots on one day.
///
/// Serialised with `HH:MM` boundaries, matching the slot wire format.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema,
)]
pub struct OverlapInterval {
    /// Day of the shared window.
    pub day: DayOfWeek,
    /// Start of the shared window.
    #[serde(with = "hh_mm")]
    #[schema(value_type = String, example = "09:00")]
    pub start: NaiveTime,
    /// End of the shared window.
    #[serde(with = "hh_mm")]
    #[schema(value_type = String, example = "10:00")]
    pub end: NaiveTime,
}

/// Collect every overlap between the seed's slots and another user's slots.
///
/// Every slot pair is considered, so mutually overlapping slots of one user
/// produce one interval per pair.
pub fn overlaps_between(
    seed: &[AvailabilitySlot],
    other: &[AvailabilitySlot],
) -> Vec<OverlapInterval> {
    seed.iter()
        .flat_map(|mine| other.iter().filter_map(move |theirs| mine.overlap_with(theirs)))
        .collect()
}

mod hh_mm {
    //! Serde helpers for `HH:MM` wall-clock values.
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    use super::TIME_FORMAT;

    pub fn serialize<S>(value: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(&value.format(TIME_FORMAT))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        NaiveTime::parse_from_str(&raw, TIME_FORMAT).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    //! Overlap rule and parsing coverage.
    use super::*;
    use rstest::rstest;

    fn slot(user: &str, day: DayOfWeek, start: &str, end: &str) -> AvailabilitySlot {
        AvailabilitySlot::parse(
            0,
            UserId::new(user).expect("valid id"),
            day,
            start,
            end,
        )
        .expect("valid slot")
    }

    #[rstest]
    #[case::monday("Monday", DayOfWeek::Monday)]
    #[case::sunday("Sunday", DayOfWeek::Sunday)]
    fn parses_full_day_names(#[case] input: &str, #[case] expected: DayOfWeek) {
        let parsed: DayOfWeek = input.parse().expect("known day");
        assert_eq!(parsed, expected);
    }

    #[rstest]
    #[case::lowercase("monday")]
    #[case::abbreviated("Mon")]
    #[case::empty("")]
    fn rejects_unknown_day_names(#[case] input: &str) {
        assert!(input.parse::<DayOfWeek>().is_err());
    }

    #[rstest]
    #[case("10:00", "09:00")]
    #[case("09:00", "09:00")]
    fn rejects_reversed_or_empty_slots(#[case] start: &str, #[case] end: &str) {
        let err = AvailabilitySlot::parse(
            1,
            UserId::new("ada").expect("valid id"),
            DayOfWeek::Friday,
            start,
            end,
        )
        .expect_err("invalid range");
        assert_eq!(err, SlotValidationError::StartNotBeforeEnd);
    }

    #[rstest]
    fn rejects_malformed_times() {
        let err = AvailabilitySlot::parse(
            1,
            UserId::new("ada").expect("valid id"),
            DayOfWeek::Friday,
            "9am",
            "10:00",
        )
        .expect_err("bad time");
        assert!(matches!(
            err,
            SlotValidationError::InvalidTime {
                field: "start_time",
                ..
            }
        ));
    }

    #[rstest]
    #[case::start_seconds((9, 0, 20), (10, 0, 0), "start_time")]
    #[case::end_seconds((9, 0, 0), (9, 0, 40), "end_time")]
    fn rejects_boundaries_with_seconds(
        #[case] start: (u32, u32, u32),
        #[case] end: (u32, u32, u32),
        #[case] expected: &str,
    ) {
        let at = |(h, m, sec): (u32, u32, u32)| NaiveTime::from_hms_opt(h, m, sec).expect("time");

        let err = AvailabilitySlot::new(
            1,
            UserId::new("ada").expect("valid id"),
            DayOfWeek::Monday,
            at(start),
            at(end),
        )
        .expect_err("sub-minute boundary");

        assert!(matches!(
            err,
            SlotValidationError::SubMinuteTime { field, .. } if field == expected
        ));
    }

    #[rstest]
    fn sub_second_boundaries_are_rejected_too() {
        let start = NaiveTime::from_hms_milli_opt(9, 0, 0, 500).expect("time");
        let end = NaiveTime::from_hms_opt(10, 0, 0).expect("time");

        let result = AvailabilitySlot::new(
            1,
            UserId::new("ada").expect("valid id"),
            DayOfWeek::Monday,
            start,
            end,
        );

        assert!(matches!(result, Err(SlotValidationError::SubMinuteTime { .. })));
    }

    #[rstest]
    fn computed_overlaps_survive_serialisation() {
        let a = slot("a", DayOfWeek::Monday, "09:00", "09:02");
        let b = slot("b", DayOfWeek::Monday, "09:01", "09:30");
        let interval = a.overlap_with(&b).expect("overlap");

        let json = serde_json::to_value(interval).expect("serialise");
        let back: OverlapInterval = serde_json::from_value(json).expect("deserialise");

        assert_eq!(back, interval);
        assert!(back.start < back.end);
    }

    #[rstest]
    fn overlap_is_the_intersection() {
        let a = slot("a", DayOfWeek::Monday, "09:00", "11:00");
        let b = slot("b", DayOfWeek::Monday, "10:00", "12:00");

        let interval = a.overlap_with(&b).expect("overlap");

        assert_eq!(interval.start, parse_time("start", "10:00").expect("time"));
        assert_eq!(interval.end, parse_time("end", "11:00").expect("time"));
        assert_eq!(b.overlap_with(&a), Some(interval));
    }

    #[rstest]
    fn touching_slots_do_not_overlap() {
        let a = slot("a", DayOfWeek::Monday, "09:00", "10:00");
        let b = slot("b", DayOfWeek::Monday, "10:00", "11:00");
        assert_eq!(a.overlap_with(&b), None);
    }

    #[rstest]
    fn different_days_do_not_overlap() {
        let a = slot("a", DayOfWeek::Monday, "09:00", "10:00");
        let b = slot("b", DayOfWeek::Tuesday, "09:00", "10:00");
        assert_eq!(a.overlap_with(&b), None);
    }

    #[rstest]
    fn overlaps_between_keeps_every_pair() {
        let seed = vec![
            slot("a", DayOfWeek::Monday, "09:00", "12:00"),
            slot("a", DayOfWeek::Monday, "10:00", "11:00"),
        ];
        let other = vec![slot("b", DayOfWeek::Monday, "10:30", "13:00")];

        let intervals = overlaps_between(&seed, &other);

        assert_eq!(intervals.len(), 2);
    }

    #[rstest]
    fn interval_serialises_with_hh_mm_boundaries() {
        let a = slot("a", DayOfWeek::Wednesday, "18:15", "20:00");
        let b = slot("b", DayOfWeek::Wednesday, "19:00", "21:00");
        let interval = a.overlap_with(&b).expect("overlap");

        let json = serde_json::to_value(interval).expect("serialise");

        assert_eq!(
            json,
            serde_json::json!({ "day": "Wednesday", "start": "19:00", "end": "20:00" })
        );
        let back: OverlapInterval = serde_json::from_value(json).expect("deserialise");
        assert_eq!(back, interval);
    }
}
