// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Scheduling periods.
//!
//! A period is one calendar month. All derived instants are UTC; local
//! time zones never take part in bucketing celebrations into weeks.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use time::{Date, Duration, Month, OffsetDateTime};

/// A (month, year) pair identifying one schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SchedulePeriod {
    /// Calendar year.
    year: i32,
    /// Calendar month, 1-based.
    month: u8,
}

impl SchedulePeriod {
    /// Creates a validated period.
    ///
    /// # Arguments
    ///
    /// * `month` - Month number, 1 through 12
    /// * `year` - Year, 1 through 9999
    ///
    /// # Errors
    ///
    /// Returns an error if the month or year is out of range.
    pub const fn new(month: u8, year: i32) -> Result<Self, DomainError> {
        if month < 1 || month > 12 {
            return Err(DomainError::InvalidMonth { month });
        }
        if year < 1 || year > 9999 {
            return Err(DomainError::InvalidYear { year });
        }
        Ok(Self { year, month })
    }

    /// Returns the month number (1-12).
    #[must_use]
    pub const fn month(&self) -> u8 {
        self.month
    }

    /// Returns the year.
    #[must_use]
    pub const fn year(&self) -> i32 {
        self.year
    }

    fn calendar_month(&self) -> Result<Month, DomainError> {
        Month::try_from(self.month).map_err(|_| DomainError::InvalidMonth { month: self.month })
    }

    /// Returns the first calendar day of the period.
    ///
    /// # Errors
    ///
    /// Returns an error if the date cannot be represented.
    pub fn first_day(&self) -> Result<Date, DomainError> {
        Date::from_calendar_date(self.year, self.calendar_month()?, 1).map_err(|e| {
            DomainError::DateArithmeticOverflow {
                operation: format!("building first day of {self}: {e}"),
            }
        })
    }

    /// Returns the first day of the following period.
    ///
    /// # Errors
    ///
    /// Returns an error if the date cannot be represented.
    pub fn next_first_day(&self) -> Result<Date, DomainError> {
        let month: Month = self.calendar_month()?;
        let year: i32 = if month == Month::December {
            self.year + 1
        } else {
            self.year
        };
        Date::from_calendar_date(year, month.next(), 1).map_err(|e| {
            DomainError::DateArithmeticOverflow {
                operation: format!("building the month after {self}: {e}"),
            }
        })
    }

    /// Returns the first instant of the period at UTC midnight.
    ///
    /// # Errors
    ///
    /// Returns an error if the date cannot be represented.
    pub fn utc_start(&self) -> Result<OffsetDateTime, DomainError> {
        Ok(self.first_day()?.midnight().assume_utc())
    }

    /// Returns the first instant after the period (exclusive upper bound).
    ///
    /// # Errors
    ///
    /// Returns an error if the date cannot be represented.
    pub fn utc_end_exclusive(&self) -> Result<OffsetDateTime, DomainError> {
        Ok(self.next_first_day()?.midnight().assume_utc())
    }

    /// Returns the first Sunday of the period.
    ///
    /// # Errors
    ///
    /// Returns an error if the date cannot be represented.
    pub fn first_sunday(&self) -> Result<Date, DomainError> {
        let first: Date = self.first_day()?;
        let days_until_sunday: i64 = (7 - i64::from(first.weekday().number_days_from_sunday())) % 7;
        first
            .checked_add(Duration::days(days_until_sunday))
            .ok_or_else(|| DomainError::DateArithmeticOverflow {
                operation: format!("finding the first Sunday of {self}"),
            })
    }

    /// Returns whether a timestamp falls inside the period (UTC).
    #[must_use]
    pub fn contains(&self, instant: OffsetDateTime) -> bool {
        let utc_date: Date = instant.to_offset(time::UtcOffset::UTC).date();
        utc_date.year() == self.year && u8::from(utc_date.month()) == self.month
    }
}

impl std::fmt::Display for SchedulePeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for SchedulePeriod {
    type Err = DomainError;

    /// Parses the `YYYY-MM` form used by the HTTP layer.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed: &str = s.trim();
        let invalid = || DomainError::InvalidPeriodFormat(s.to_string());

        let (year_part, month_part) = trimmed.split_once('-').ok_or_else(invalid)?;
        if year_part.len() != 4
            || month_part.len() != 2
            || !year_part.chars().all(|c| c.is_ascii_digit())
            || !month_part.chars().all(|c| c.is_ascii_digit())
        {
            return Err(invalid());
        }

        let year: i32 = year_part.parse().map_err(|_| invalid())?;
        let month: u8 = month_part.parse().map_err(|_| invalid())?;
        Self::new(month, year)
    }
}
