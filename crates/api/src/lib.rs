// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API boundary for the Escala roster generator.
//!
//! Every operation takes the persistence adapter explicitly, translates
//! lower-layer errors into [`ApiError`], and returns serializable response
//! types. Transport concerns (routes, status codes) live in the server.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

mod availability;
mod error;
mod generate;
mod members;
mod query;
mod request_response;
mod schedules;

#[cfg(test)]
mod tests;

pub use availability::{get_availability_overview, record_availability};
pub use error::{
    ApiError, INCOMPLETE_AVAILABILITY_MESSAGE, LOAD_FAILED_MESSAGE, PeriodParseError,
    translate_core_error, translate_domain_error, translate_persistence_error,
};
pub use generate::{SCHEDULE_NOT_FOUND_MESSAGE, generate_schedule, regenerate_schedule};
pub use members::{MEMBER_SEARCH_LIMIT, search_member_assignments};
pub use query::{parse_force_flag, parse_period_param};
pub use request_response::{
    AssignmentInfo, AvailabilityOverviewResponse, AvailabilityTotals, CelebrationAvailability,
    DeleteScheduleResponse, GenerateScheduleRequest, GenerateScheduleResponse, MemberAssignments,
    MemberEntry, MemberSearchResponse, MinistryAvailability, PublishScheduleRequest, PublishScheduleResponse,
    RecordAvailabilityRequest, RecordAvailabilityResponse, ScheduleByPeriodResponse,
    ScheduleRosterResponse, ScheduleRunInfo, SetAssignmentLockRequest, SetAssignmentLockResponse,
    WarningInfo,
};
pub use schedules::{
    SCHEDULE_DELETED_MESSAGE, delete_schedule_by_period, get_schedule_by_period,
    get_schedule_roster, publish_schedule, set_assignment_lock,
};
