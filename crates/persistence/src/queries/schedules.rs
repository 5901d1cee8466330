// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Schedule run and assignment queries.

use diesel::prelude::*;
use diesel::SqliteConnection;
use escala_domain::{SchedulePeriod, ScheduleRun, StoredAssignment, parse_timestamp};
use tracing::debug;

use crate::data_models::{AssignmentRow, RosterEntry, ScheduleRunRow};
use crate::diesel_schema::{
    assignments, celebrations, ministries, profiles, roles, schedule_runs,
};
use crate::error::{PersistenceError, query_failed};

/// Finds the schedule run of a period.
///
/// # Errors
///
/// Returns an error if the query fails or the stored row is invalid.
/// Returns `Ok(None)` if no run exists for the period.
pub fn find_schedule_run_by_period(
    conn: &mut SqliteConnection,
    period: &SchedulePeriod,
) -> Result<Option<ScheduleRun>, PersistenceError> {
    debug!(%period, "Looking up schedule run by period");

    let row: Option<ScheduleRunRow> = schedule_runs::table
        .filter(schedule_runs::month.eq(i32::from(period.month())))
        .filter(schedule_runs::year.eq(period.year()))
        .select(ScheduleRunRow::as_select())
        .first(conn)
        .optional()
        .map_err(query_failed("find_schedule_run_by_period"))?;

    row.map(ScheduleRun::try_from).transpose()
}

/// Retrieves a schedule run by id.
///
/// # Errors
///
/// Returns an error if the query fails or the stored row is invalid.
/// Returns `Ok(None)` if the run does not exist.
pub fn get_schedule_run(
    conn: &mut SqliteConnection,
    schedule_run_id: i64,
) -> Result<Option<ScheduleRun>, PersistenceError> {
    let row: Option<ScheduleRunRow> = schedule_runs::table
        .filter(schedule_runs::schedule_run_id.eq(schedule_run_id))
        .select(ScheduleRunRow::as_select())
        .first(conn)
        .optional()
        .map_err(query_failed("get_schedule_run"))?;

    row.map(ScheduleRun::try_from).transpose()
}

/// Lists the stored assignments of a run in insertion order.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_assignments_for_run(
    conn: &mut SqliteConnection,
    schedule_run_id: i64,
) -> Result<Vec<StoredAssignment>, PersistenceError> {
    let rows: Vec<AssignmentRow> = assignments::table
        .filter(assignments::schedule_run_id.eq(schedule_run_id))
        .order(assignments::assignment_id.asc())
        .select(AssignmentRow::as_select())
        .load(conn)
        .map_err(query_failed("list_assignments_for_run"))?;

    Ok(rows.into_iter().map(StoredAssignment::from).collect())
}

/// Retrieves one stored assignment.
///
/// # Errors
///
/// Returns an error if the query fails.
/// Returns `Ok(None)` if the assignment does not exist.
pub fn get_assignment(
    conn: &mut SqliteConnection,
    assignment_id: i64,
) -> Result<Option<StoredAssignment>, PersistenceError> {
    let row: Option<AssignmentRow> = assignments::table
        .filter(assignments::assignment_id.eq(assignment_id))
        .select(AssignmentRow::as_select())
        .first(conn)
        .optional()
        .map_err(query_failed("get_assignment"))?;

    Ok(row.map(StoredAssignment::from))
}

/// Row shape of the joined roster query.
type RosterTuple = (
    i64,
    i64,
    String,
    Option<String>,
    i64,
    String,
    i64,
    String,
    i64,
    String,
    i32,
);

/// Reads a run's assignments joined with celebration, ministry, role and
/// member names, ordered by date, ministry name and role name.
///
/// # Errors
///
/// Returns an error if the query fails or a stored timestamp is invalid.
pub fn get_roster(
    conn: &mut SqliteConnection,
    schedule_run_id: i64,
) -> Result<Vec<RosterEntry>, PersistenceError> {
    let rows: Vec<RosterTuple> = assignments::table
        .inner_join(celebrations::table)
        .inner_join(ministries::table)
        .inner_join(roles::table)
        .inner_join(profiles::table)
        .filter(assignments::schedule_run_id.eq(schedule_run_id))
        .order((
            celebrations::starts_at.asc(),
            ministries::name.asc(),
            roles::name.asc(),
            assignments::assignment_id.asc(),
        ))
        .select((
            assignments::assignment_id,
            celebrations::celebration_id,
            celebrations::starts_at,
            celebrations::location,
            ministries::ministry_id,
            ministries::name,
            roles::role_id,
            roles::name,
            profiles::profile_id,
            profiles::name,
            assignments::locked,
        ))
        .load::<RosterTuple>(conn)
        .map_err(query_failed("get_roster"))?;

    rows.into_iter()
        .map(
            |(
                assignment_id,
                celebration_id,
                starts_at,
                location,
                ministry_id,
                ministry_name,
                role_id,
                role_name,
                member_id,
                member_name,
                locked,
            )| {
                let starts_at = parse_timestamp(&starts_at).map_err(|e| {
                    PersistenceError::InvalidStoredValue(format!("celebrations.starts_at: {e}"))
                })?;
                Ok(RosterEntry {
                    assignment_id,
                    celebration_id,
                    starts_at,
                    location,
                    ministry_id,
                    ministry_name,
                    role_id,
                    role_name,
                    member_id,
                    member_name,
                    locked: locked != 0,
                })
            },
        )
        .collect()
}
