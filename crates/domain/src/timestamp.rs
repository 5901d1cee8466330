// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Text form of stored timestamps.
//!
//! Timestamps are kept as RFC 3339 UTC strings with second precision
//! (`2025-11-02T19:00:00Z`), so lexical order equals chronological order.

use crate::error::DomainError;
use time::format_description::well_known::Rfc3339;
use time::{OffsetDateTime, UtcOffset};

/// Formats an instant as RFC 3339 UTC, truncated to whole seconds.
///
/// # Errors
///
/// Returns an error if the instant cannot be formatted.
pub fn format_timestamp(instant: OffsetDateTime) -> Result<String, DomainError> {
    let utc: OffsetDateTime = instant.to_offset(UtcOffset::UTC);
    let truncated: OffsetDateTime =
        utc.replace_nanosecond(0)
            .map_err(|e| DomainError::InvalidTimestamp {
                value: utc.to_string(),
                error: e.to_string(),
            })?;
    truncated
        .format(&Rfc3339)
        .map_err(|e| DomainError::InvalidTimestamp {
            value: truncated.to_string(),
            error: e.to_string(),
        })
}

/// Parses an RFC 3339 timestamp and converts it to UTC.
///
/// # Errors
///
/// Returns an error if the text is not valid RFC 3339.
pub fn parse_timestamp(value: &str) -> Result<OffsetDateTime, DomainError> {
    OffsetDateTime::parse(value, &Rfc3339)
        .map(|parsed| parsed.to_offset(UtcOffset::UTC))
        .map_err(|e| DomainError::InvalidTimestamp {
            value: value.to_string(),
            error: e.to_string(),
        })
}
