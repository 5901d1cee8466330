// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

/// Errors that can occur during domain validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Month is outside 1..=12.
    InvalidMonth {
        /// The rejected month value.
        month: u8,
    },
    /// Year is outside the supported calendar range.
    InvalidYear {
        /// The rejected year value.
        year: i32,
    },
    /// A period string could not be parsed as `YYYY-MM`.
    InvalidPeriodFormat(String),
    /// Date arithmetic overflow.
    DateArithmeticOverflow {
        /// Description of the operation that failed.
        operation: String,
    },
    /// A timestamp could not be parsed or formatted.
    InvalidTimestamp {
        /// The offending value.
        value: String,
        /// The underlying error message.
        error: String,
    },
    /// A schedule run status string is not recognized.
    InvalidRunStatus(String),
    /// The schedule run has already been published.
    ScheduleAlreadyPublished {
        /// The schedule run identifier.
        schedule_run_id: i64,
    },
    /// A published schedule run cannot be regenerated.
    PublishedScheduleImmutable {
        /// The schedule run identifier.
        schedule_run_id: i64,
    },
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidMonth { month } => {
                write!(f, "Invalid month: {month}. Must be between 1 and 12")
            }
            Self::InvalidYear { year } => {
                write!(f, "Invalid year: {year}. Must be between 1 and 9999")
            }
            Self::InvalidPeriodFormat(value) => {
                write!(f, "Invalid period '{value}'. Expected format YYYY-MM")
            }
            Self::DateArithmeticOverflow { operation } => {
                write!(f, "Date arithmetic overflow while {operation}")
            }
            Self::InvalidTimestamp { value, error } => {
                write!(f, "Invalid timestamp '{value}': {error}")
            }
            Self::InvalidRunStatus(status) => {
                write!(f, "Invalid schedule run status: {status}")
            }
            Self::ScheduleAlreadyPublished { schedule_run_id } => {
                write!(f, "Schedule run {schedule_run_id} is already published")
            }
            Self::PublishedScheduleImmutable { schedule_run_id } => {
                write!(
                    f,
                    "Schedule run {schedule_run_id} is published and cannot be regenerated"
                )
            }
        }
    }
}

impl std::error::Error for DomainError {}
