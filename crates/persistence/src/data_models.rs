// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Row types and their mapping to domain values.

use diesel::prelude::*;
use escala_domain::{
    Assignment, Availability, Band, BandMembership, Celebration, Ministry, MinistryMembership,
    Profile, Role, RunStatus, SchedulePeriod, ScheduleRun, StoredAssignment, parse_timestamp,
};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::diesel_schema::{
    assignments, availabilities, band_members, bands, celebrations, member_ministries, ministries,
    profiles, roles, schedule_runs,
};
use crate::error::PersistenceError;

fn flag(value: i32) -> bool {
    value != 0
}

fn parse_stored_timestamp(column: &str, value: &str) -> Result<OffsetDateTime, PersistenceError> {
    parse_timestamp(value)
        .map_err(|e| PersistenceError::InvalidStoredValue(format!("{column}: {e}")))
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = profiles)]
pub(crate) struct ProfileRow {
    profile_id: i64,
    name: String,
    family_id: Option<String>,
}

impl From<ProfileRow> for Profile {
    fn from(row: ProfileRow) -> Self {
        Self {
            profile_id: row.profile_id,
            name: row.name,
            family_id: row.family_id,
        }
    }
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = ministries)]
pub(crate) struct MinistryRow {
    ministry_id: i64,
    name: String,
    active: i32,
}

impl From<MinistryRow> for Ministry {
    fn from(row: MinistryRow) -> Self {
        Self {
            ministry_id: row.ministry_id,
            name: row.name,
            active: flag(row.active),
        }
    }
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = roles)]
pub(crate) struct RoleRow {
    role_id: i64,
    ministry_id: i64,
    name: String,
}

impl From<RoleRow> for Role {
    fn from(row: RoleRow) -> Self {
        Self {
            role_id: row.role_id,
            ministry_id: row.ministry_id,
            name: row.name,
        }
    }
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = bands)]
pub(crate) struct BandRow {
    band_id: i64,
    name: String,
    active: i32,
}

impl From<BandRow> for Band {
    fn from(row: BandRow) -> Self {
        Self {
            band_id: row.band_id,
            name: row.name,
            active: flag(row.active),
        }
    }
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = band_members)]
pub(crate) struct BandMemberRow {
    band_member_id: i64,
    band_id: i64,
    member_id: i64,
    role_in_band: String,
}

impl From<BandMemberRow> for BandMembership {
    fn from(row: BandMemberRow) -> Self {
        Self {
            band_member_id: row.band_member_id,
            band_id: row.band_id,
            member_id: row.member_id,
            role_in_band: row.role_in_band,
        }
    }
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = member_ministries)]
pub(crate) struct MemberMinistryRow {
    member_id: i64,
    ministry_id: i64,
    is_leader: i32,
}

impl From<MemberMinistryRow> for MinistryMembership {
    fn from(row: MemberMinistryRow) -> Self {
        Self {
            member_id: row.member_id,
            ministry_id: row.ministry_id,
            is_leader: flag(row.is_leader),
        }
    }
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = celebrations)]
pub(crate) struct CelebrationRow {
    celebration_id: i64,
    starts_at: String,
    location: Option<String>,
    notes: Option<String>,
}

impl TryFrom<CelebrationRow> for Celebration {
    type Error = PersistenceError;

    fn try_from(row: CelebrationRow) -> Result<Self, Self::Error> {
        Ok(Self {
            celebration_id: row.celebration_id,
            starts_at: parse_stored_timestamp("celebrations.starts_at", &row.starts_at)?,
            location: row.location,
            notes: row.notes,
        })
    }
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = availabilities)]
pub(crate) struct AvailabilityRow {
    member_id: i64,
    celebration_id: i64,
    available: i32,
}

impl From<AvailabilityRow> for Availability {
    fn from(row: AvailabilityRow) -> Self {
        Self {
            celebration_id: row.celebration_id,
            member_id: row.member_id,
            available: flag(row.available),
        }
    }
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = schedule_runs)]
pub(crate) struct ScheduleRunRow {
    schedule_run_id: i64,
    month: i32,
    year: i32,
    status: String,
    created_by: Option<String>,
    created_at: String,
    published_at: Option<String>,
}

impl TryFrom<ScheduleRunRow> for ScheduleRun {
    type Error = PersistenceError;

    fn try_from(row: ScheduleRunRow) -> Result<Self, Self::Error> {
        let month: u8 = u8::try_from(row.month).map_err(|_| {
            PersistenceError::InvalidStoredValue(format!("schedule_runs.month: {}", row.month))
        })?;
        let period: SchedulePeriod = SchedulePeriod::new(month, row.year)
            .map_err(|e| PersistenceError::InvalidStoredValue(format!("schedule_runs: {e}")))?;
        let status: RunStatus = row
            .status
            .parse()
            .map_err(|e| PersistenceError::InvalidStoredValue(format!("schedule_runs: {e}")))?;
        let published_at: Option<OffsetDateTime> = row
            .published_at
            .as_deref()
            .map(|value| parse_stored_timestamp("schedule_runs.published_at", value))
            .transpose()?;

        Ok(Self {
            schedule_run_id: row.schedule_run_id,
            period,
            status,
            created_by: row.created_by,
            created_at: parse_stored_timestamp("schedule_runs.created_at", &row.created_at)?,
            published_at,
        })
    }
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = assignments)]
pub(crate) struct AssignmentRow {
    assignment_id: i64,
    schedule_run_id: i64,
    celebration_id: i64,
    ministry_id: i64,
    role_id: i64,
    member_id: i64,
    locked: i32,
}

impl From<AssignmentRow> for StoredAssignment {
    fn from(row: AssignmentRow) -> Self {
        Self {
            assignment_id: row.assignment_id,
            schedule_run_id: row.schedule_run_id,
            assignment: Assignment {
                celebration_id: row.celebration_id,
                ministry_id: row.ministry_id,
                role_id: row.role_id,
                member_id: row.member_id,
                locked: flag(row.locked),
            },
        }
    }
}

#[derive(Insertable)]
#[diesel(table_name = assignments)]
pub(crate) struct NewAssignmentRow {
    pub schedule_run_id: i64,
    pub celebration_id: i64,
    pub ministry_id: i64,
    pub role_id: i64,
    pub member_id: i64,
    pub locked: i32,
}

impl NewAssignmentRow {
    pub(crate) fn new(schedule_run_id: i64, assignment: &Assignment) -> Self {
        Self {
            schedule_run_id,
            celebration_id: assignment.celebration_id,
            ministry_id: assignment.ministry_id,
            role_id: assignment.role_id,
            member_id: assignment.member_id,
            locked: i32::from(assignment.locked),
        }
    }
}

/// One line of a published or draft roster, joined for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterEntry {
    pub assignment_id: i64,
    pub celebration_id: i64,
    #[serde(with = "time::serde::rfc3339")]
    pub starts_at: OffsetDateTime,
    pub location: Option<String>,
    pub ministry_id: i64,
    pub ministry_name: String,
    pub role_id: i64,
    pub role_name: String,
    pub member_id: i64,
    pub member_name: String,
    pub locked: bool,
}

/// An assignment of a member at a celebration that has not started yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpcomingAssignment {
    pub member_id: i64,
    pub assignment_id: i64,
    pub celebration_id: i64,
    #[serde(with = "time::serde::rfc3339")]
    pub starts_at: OffsetDateTime,
    pub location: Option<String>,
    pub notes: Option<String>,
    pub ministry_name: String,
    pub role_name: String,
}

/// Where a computed roster is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunTarget {
    /// Insert a new draft run for the period.
    Create {
        period: SchedulePeriod,
        created_by: Option<String>,
        created_at: OffsetDateTime,
    },
    /// Write into an existing run.
    Existing(i64),
}

/// Which stored assignments a persisted roster replaces.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssignmentSweep {
    /// Restricts deletion to these ministries; `None` covers the whole run.
    pub ministry_ids: Option<Vec<i64>>,
    /// Also deletes locked rows.
    pub include_locked: bool,
}

/// The stored result of one generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedSchedule {
    pub schedule_run_id: i64,
    pub deleted: usize,
    pub assignments: Vec<StoredAssignment>,
}
