// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod error;
mod normalize;
mod period;
mod timestamp;
mod types;

#[cfg(test)]
mod tests;

pub use error::DomainError;
pub use normalize::{
    BAND_MINISTRY_NAME, DERIVED_MINISTRY_NAMES, SPECIAL_BAND_KEYWORD, SPECIAL_EVENT_KEYWORDS,
    derived_ministry_rank, is_band_ministry_name, is_special_band_name, mentions_special_event,
    names_match, normalize_name,
};
pub use period::SchedulePeriod;
pub use timestamp::{format_timestamp, parse_timestamp};

// Re-export public types
pub use types::{
    Assignment, AssignmentKey, Availability, Band, BandMembership, Celebration, Ministry,
    MinistryMembership, Profile, Role, RunStatus, ScheduleRun, StoredAssignment,
};
