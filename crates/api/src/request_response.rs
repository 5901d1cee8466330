// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API request and response data transfer objects.
//!
//! Generation payloads use camelCase keys; assignment and roster rows keep
//! the snake_case column names.

use escala::GenerationWarning;
use escala_domain::{RunStatus, ScheduleRun, StoredAssignment};
use escala_persistence::{RosterEntry, UpcomingAssignment};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Options for generating or regenerating a month's roster.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GenerateScheduleRequest {
    /// Restricts the run to one ministry, by name.
    pub ministry: Option<String>,
    /// Leaves locked assignments untouched.
    pub preserve_locked: bool,
    /// Who requested the run. Generating a new run requires it.
    pub created_by: Option<String>,
    /// Persists the roster even when slots remain unfilled.
    #[serde(rename = "force", alias = "allowIncomplete")]
    pub allow_incomplete: bool,
}

/// An unfilled slot as reported to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WarningInfo {
    pub celebration_id: i64,
    #[serde(with = "time::serde::rfc3339")]
    pub celebration_starts_at: OffsetDateTime,
    pub ministry_id: Option<i64>,
    pub ministry_name: Option<String>,
    pub role_id: Option<i64>,
    pub role_name: Option<String>,
    /// The user-facing explanation.
    pub reason: String,
    /// The stable machine code of the reason.
    pub code: String,
}

impl From<&GenerationWarning> for WarningInfo {
    fn from(warning: &GenerationWarning) -> Self {
        Self {
            celebration_id: warning.celebration_id,
            celebration_starts_at: warning.celebration_starts_at,
            ministry_id: warning.ministry_id,
            ministry_name: warning.ministry_name.clone(),
            role_id: warning.role_id,
            role_name: warning.role_name.clone(),
            reason: warning.reason.message().to_string(),
            code: warning.reason.code().to_string(),
        }
    }
}

/// A stored assignment row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentInfo {
    pub assignment_id: i64,
    pub celebration_id: i64,
    pub ministry_id: i64,
    pub role_id: i64,
    pub member_id: i64,
    pub locked: bool,
}

impl From<&StoredAssignment> for AssignmentInfo {
    fn from(stored: &StoredAssignment) -> Self {
        Self {
            assignment_id: stored.assignment_id,
            celebration_id: stored.assignment.celebration_id,
            ministry_id: stored.assignment.ministry_id,
            role_id: stored.assignment.role_id,
            member_id: stored.assignment.member_id,
            locked: stored.assignment.locked,
        }
    }
}

/// API response for a generation or regeneration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateScheduleResponse {
    pub schedule_run_id: i64,
    /// The rows inserted by this run.
    pub assignments: Vec<AssignmentInfo>,
    /// Slots left unfilled; empty unless incomplete rosters were allowed.
    pub warnings: Vec<WarningInfo>,
}

/// Summary of a schedule run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleRunInfo {
    pub id: i64,
    pub month: u8,
    pub year: i32,
    pub status: RunStatus,
    pub created_by: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339::option")]
    pub published_at: Option<OffsetDateTime>,
}

impl From<&ScheduleRun> for ScheduleRunInfo {
    fn from(run: &ScheduleRun) -> Self {
        Self {
            id: run.schedule_run_id,
            month: run.period.month(),
            year: run.period.year(),
            status: run.status,
            created_by: run.created_by.clone(),
            created_at: run.created_at,
            published_at: run.published_at,
        }
    }
}

/// API response for a period lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleByPeriodResponse {
    /// The run of the period, if one exists.
    pub schedule: Option<ScheduleRunInfo>,
}

/// API response for a period deletion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteScheduleResponse {
    pub deleted_id: i64,
    pub message: String,
}

/// API request to publish a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishScheduleRequest {
    pub id: i64,
}

/// API response for a publication.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishScheduleResponse {
    pub schedule: ScheduleRunInfo,
}

/// API response for a roster read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleRosterResponse {
    pub schedule: ScheduleRunInfo,
    /// Ordered by date, ministry name and role name.
    pub rows: Vec<RosterEntry>,
}

/// API request to lock or unlock an assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetAssignmentLockRequest {
    pub locked: bool,
}

/// API response for a lock change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetAssignmentLockResponse {
    pub assignment_id: i64,
    pub locked: bool,
}

/// A member matched by a name search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberAssignments {
    pub member_id: i64,
    pub name: String,
    /// Upcoming assignments in date order.
    pub assignments: Vec<UpcomingAssignment>,
}

/// API response for a member search.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberSearchResponse {
    /// Matches ordered by name.
    pub results: Vec<MemberAssignments>,
}

/// API request to record a member's availability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordAvailabilityRequest {
    pub member_id: i64,
    pub celebration_id: i64,
    pub available: bool,
}

/// API response for a recorded availability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordAvailabilityResponse {
    pub success: bool,
}

/// A ministry member in the availability overview.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberEntry {
    pub member_id: i64,
    pub name: String,
    pub is_leader: bool,
}

/// Answer counts for one ministry at one celebration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityTotals {
    pub total_members: usize,
    pub confirmed: usize,
    pub declined: usize,
    pub pending: usize,
}

/// One ministry's answers for one celebration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MinistryAvailability {
    pub ministry_id: i64,
    pub ministry_name: String,
    pub confirmed: Vec<MemberEntry>,
    pub declined: Vec<MemberEntry>,
    pub pending: Vec<MemberEntry>,
    pub totals: AvailabilityTotals,
}

/// Availability answers for one celebration, by ministry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CelebrationAvailability {
    pub id: i64,
    #[serde(with = "time::serde::rfc3339")]
    pub starts_at: OffsetDateTime,
    pub location: Option<String>,
    pub notes: Option<String>,
    pub ministries: Vec<MinistryAvailability>,
}

/// API response for the availability overview of a month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityOverviewResponse {
    /// The period in `YYYY-MM` form.
    pub month: String,
    pub celebrations: Vec<CelebrationAvailability>,
}
