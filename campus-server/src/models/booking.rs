//! Booking lifecycle and time slots
//!
//! Dates travel as `YYYY-MM-DD` and times as `HH:MM`. Both are zero padded,
//! so string comparison in SQL agrees with chronological order.

use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use super::ValidationError;

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const TIME_FORMAT: &str = "%H:%M";

/// Booking status
///
/// ```text
/// booked ──► cancelled
///    │
///    └─────► completed
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    #[default]
    Booked,
    Cancelled,
    Completed,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Booked => "booked",
            Self::Cancelled => "cancelled",
            Self::Completed => "completed",
        }
    }

    /// Cancelled and completed bookings never change again.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Booked)
    }

    pub fn can_transition_to(&self, next: BookingStatus) -> bool {
        matches!(
            (self, next),
            (Self::Booked, Self::Cancelled) | (Self::Booked, Self::Completed)
        )
    }
}

impl FromStr for BookingStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "booked" => Ok(Self::Booked),
            "cancelled" => Ok(Self::Cancelled),
            "completed" => Ok(Self::Completed),
            other => Err(ValidationError::InvalidVariant {
                field: "booking status",
                value: other.to_owned(),
            }),
        }
    }
}

/// Parse a `YYYY-MM-DD` date.
pub fn parse_date(s: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT).map_err(|_| ValidationError::InvalidFormat {
        field: "date",
        reason: "expected YYYY-MM-DD",
    })
}

/// Parse an `HH:MM` time of day.
pub fn parse_time(s: &str, field: &'static str) -> Result<NaiveTime, ValidationError> {
    NaiveTime::parse_from_str(s.trim(), TIME_FORMAT).map_err(|_| ValidationError::InvalidFormat {
        field,
        reason: "expected HH:MM",
    })
}

/// A half-open interval `[start, end)` on a single day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeSlot {
    date: NaiveDate,
    start: NaiveTime,
    end: NaiveTime,
}

impl TimeSlot {
    /// Build a slot; `start` must be strictly before `end`.
    pub fn new(date: NaiveDate, start: NaiveTime, end: NaiveTime) -> Result<Self, ValidationError> {
        if start >= end {
            return Err(ValidationError::InvalidTimeRange {
                reason: "start_time must be before end_time",
            });
        }
        Ok(Self { date, start, end })
    }

    /// Parse a slot from its wire form.
    ///
    /// # Example
    /// ```
    /// use campus_server::models::TimeSlot;
    ///
    /// assert!(TimeSlot::parse("2030-05-01", "09:00", "10:30").is_ok());
    /// assert!(TimeSlot::parse("2030-05-01", "10:30", "09:00").is_err());
    /// ```
    pub fn parse(date: &str, start: &str, end: &str) -> Result<Self, ValidationError> {
        Self::new(
            parse_date(date)?,
            parse_time(start, "start_time")?,
            parse_time(end, "end_time")?,
        )
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn start(&self) -> NaiveTime {
        self.start
    }

    pub fn end(&self) -> NaiveTime {
        self.end
    }

    pub fn date_key(&self) -> String {
        self.date.format(DATE_FORMAT).to_string()
    }

    pub fn start_key(&self) -> String {
        self.start.format(TIME_FORMAT).to_string()
    }

    pub fn end_key(&self) -> String {
        self.end.format(TIME_FORMAT).to_string()
    }

    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }

    /// Back-to-back slots (one ends as the other starts) do not overlap.
    pub fn overlaps(&self, other: &TimeSlot) -> bool {
        self.date == other.date && self.start < other.end && other.start < self.end
    }

    pub fn starts_before(&self, now: NaiveDateTime) -> bool {
        self.date.and_time(self.start) < now
    }
}
