// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{DomainError, SchedulePeriod, format_timestamp, parse_timestamp};
use time::macros::{date, datetime};
use time::{Date, OffsetDateTime};

#[test]
fn test_period_rejects_out_of_range_month() {
    assert_eq!(
        SchedulePeriod::new(0, 2025),
        Err(DomainError::InvalidMonth { month: 0 })
    );
    assert_eq!(
        SchedulePeriod::new(13, 2025),
        Err(DomainError::InvalidMonth { month: 13 })
    );
    assert!(SchedulePeriod::new(12, 2025).is_ok());
}

#[test]
fn test_period_parses_year_month() {
    let period: SchedulePeriod = "2025-11".parse().unwrap();
    assert_eq!(period.month(), 11);
    assert_eq!(period.year(), 2025);
    assert_eq!(period.to_string(), "2025-11");
}

#[test]
fn test_period_rejects_malformed_text() {
    for value in ["2025-1", "25-11", "2025/11", "2025-ab", "", "2025-11-01"] {
        let result: Result<SchedulePeriod, DomainError> = value.parse();
        assert!(result.is_err(), "{value} should be rejected");
    }

    let result: Result<SchedulePeriod, DomainError> = "2025-13".parse();
    assert_eq!(result, Err(DomainError::InvalidMonth { month: 13 }));
}

#[test]
fn test_period_utc_bounds() {
    let period: SchedulePeriod = SchedulePeriod::new(12, 2025).unwrap();
    assert_eq!(period.utc_start().unwrap(), datetime!(2025-12-01 00:00 UTC));
    assert_eq!(
        period.utc_end_exclusive().unwrap(),
        datetime!(2026-01-01 00:00 UTC)
    );
}

#[test]
fn test_first_sunday() {
    // November 1st 2025 is a Saturday.
    let november: SchedulePeriod = SchedulePeriod::new(11, 2025).unwrap();
    let sunday: Date = november.first_sunday().unwrap();
    assert_eq!(sunday, date!(2025 - 11 - 02));

    // June 1st 2025 is itself a Sunday.
    let june: SchedulePeriod = SchedulePeriod::new(6, 2025).unwrap();
    assert_eq!(june.first_sunday().unwrap(), date!(2025 - 06 - 01));
}

#[test]
fn test_period_contains_uses_utc_day() {
    let period: SchedulePeriod = SchedulePeriod::new(11, 2025).unwrap();
    assert!(period.contains(datetime!(2025-11-30 23:59 UTC)));
    assert!(!period.contains(datetime!(2025-12-01 00:00 UTC)));
    // 22:00 at -03:00 on Nov 30 is already December in UTC.
    assert!(!period.contains(datetime!(2025-11-30 22:00 -3)));
}

#[test]
fn test_timestamp_text_form() {
    let instant: OffsetDateTime = datetime!(2025-11-02 19:00:00.750 UTC);
    let text: String = format_timestamp(instant).unwrap();
    assert_eq!(text, "2025-11-02T19:00:00Z");

    let parsed: OffsetDateTime = parse_timestamp("2025-11-02T16:00:00-03:00").unwrap();
    assert_eq!(parsed, datetime!(2025-11-02 19:00 UTC));
    assert_eq!(format_timestamp(parsed).unwrap(), text);

    assert!(parse_timestamp("yesterday").is_err());
}
