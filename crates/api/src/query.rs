// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Query-string parameters shared by the schedule routes.

use crate::error::PeriodParseError;
use escala_domain::{DomainError, SchedulePeriod};

/// Parses the `month=YYYY-MM` parameter.
///
/// # Errors
///
/// Returns an error if the parameter is absent, malformed, or names a month
/// outside 1-12.
pub fn parse_period_param(value: Option<&str>) -> Result<SchedulePeriod, PeriodParseError> {
    let value: &str = value
        .filter(|v| !v.trim().is_empty())
        .ok_or(PeriodParseError::Missing)?;

    value.parse::<SchedulePeriod>().map_err(|e| match e {
        DomainError::InvalidMonth { .. } | DomainError::InvalidYear { .. } => {
            PeriodParseError::OutOfRange {
                reason: e.to_string(),
            }
        }
        _ => PeriodParseError::Malformed {
            value: value.to_string(),
        },
    })
}

/// Reads the `force` query flag; only `1` and `true` enable it.
#[must_use]
pub fn parse_force_flag(value: Option<&str>) -> bool {
    matches!(value, Some("1" | "true"))
}
