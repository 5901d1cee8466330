// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Schedule mutations.
//!
//! A generated roster is written in a single transaction: the run header
//! (created or targeted), the sweep of the assignments it replaces, and the
//! new assignment rows. Either all of it lands or none of it does.

use diesel::prelude::*;
use diesel::SqliteConnection;
use diesel::result::DatabaseErrorKind;
use escala_domain::{Assignment, RunStatus, ScheduleRun, StoredAssignment, format_timestamp};
use time::OffsetDateTime;
use tracing::{debug, info};

use crate::backend::sqlite::get_last_insert_rowid;
use crate::data_models::{AssignmentSweep, NewAssignmentRow, PersistedSchedule, RunTarget};
use crate::diesel_schema::{assignments, schedule_runs};
use crate::error::PersistenceError;

fn stored_timestamp(instant: OffsetDateTime) -> Result<String, PersistenceError> {
    format_timestamp(instant).map_err(|e| PersistenceError::InvalidStoredValue(e.to_string()))
}

/// Inserts the run header for a new draft schedule.
///
/// A unique-constraint conflict on the period is reported as
/// [`PersistenceError::DuplicatePeriod`].
fn insert_schedule_run(
    conn: &mut SqliteConnection,
    target: &RunTarget,
) -> Result<i64, PersistenceError> {
    let RunTarget::Create {
        period,
        created_by,
        created_at,
    } = target
    else {
        return Err(PersistenceError::InitializationError(
            "insert_schedule_run requires a Create target".to_string(),
        ));
    };

    let created_at_text: String = stored_timestamp(*created_at)?;

    let result: Result<i64, diesel::result::Error> = diesel::insert_into(schedule_runs::table)
        .values((
            schedule_runs::month.eq(i32::from(period.month())),
            schedule_runs::year.eq(period.year()),
            schedule_runs::status.eq(RunStatus::Draft.as_str()),
            schedule_runs::created_by.eq(created_by.as_deref()),
            schedule_runs::created_at.eq(&created_at_text),
        ))
        .returning(schedule_runs::schedule_run_id)
        .get_result(conn);

    match result {
        Ok(id) => Ok(id),
        Err(diesel::result::Error::DatabaseError(DatabaseErrorKind::UniqueViolation, _)) => {
            Err(PersistenceError::DuplicatePeriod {
                month: period.month(),
                year: period.year(),
            })
        }
        Err(e) => Err(PersistenceError::from(e)),
    }
}

/// Deletes the stored assignments a new roster replaces.
fn sweep_assignments(
    conn: &mut SqliteConnection,
    schedule_run_id: i64,
    sweep: &AssignmentSweep,
) -> Result<usize, PersistenceError> {
    let mut query = diesel::delete(assignments::table)
        .filter(assignments::schedule_run_id.eq(schedule_run_id))
        .into_boxed();

    if !sweep.include_locked {
        query = query.filter(assignments::locked.eq(0));
    }
    if let Some(ministry_ids) = &sweep.ministry_ids {
        query = query.filter(assignments::ministry_id.eq_any(ministry_ids));
    }

    Ok(query.execute(conn)?)
}

/// Writes a computed roster.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `target` - Create a new draft run or write into an existing one
/// * `sweep` - Stored assignments to delete first; `None` keeps them all
/// * `computed` - The new assignments
///
/// # Errors
///
/// Returns [`PersistenceError::DuplicatePeriod`] if another run for the
/// period already exists, [`PersistenceError::NotFound`] if an existing
/// target run is missing, or another error if any statement fails. Nothing
/// is written on error.
pub fn persist_schedule(
    conn: &mut SqliteConnection,
    target: &RunTarget,
    sweep: Option<&AssignmentSweep>,
    computed: &[Assignment],
) -> Result<PersistedSchedule, PersistenceError> {
    conn.transaction::<PersistedSchedule, PersistenceError, _>(|conn| {
        let schedule_run_id: i64 = match target {
            RunTarget::Create { .. } => insert_schedule_run(conn, target)?,
            RunTarget::Existing(id) => {
                let exists: i64 = schedule_runs::table
                    .filter(schedule_runs::schedule_run_id.eq(*id))
                    .count()
                    .get_result(conn)?;
                if exists == 0 {
                    return Err(PersistenceError::NotFound(format!("Schedule run {id}")));
                }
                *id
            }
        };

        let deleted: usize = match sweep {
            Some(sweep) => sweep_assignments(conn, schedule_run_id, sweep)?,
            None => 0,
        };

        let mut stored: Vec<StoredAssignment> = Vec::with_capacity(computed.len());
        for assignment in computed {
            diesel::insert_into(assignments::table)
                .values(&NewAssignmentRow::new(schedule_run_id, assignment))
                .execute(conn)?;
            stored.push(StoredAssignment {
                assignment_id: get_last_insert_rowid(conn)?,
                schedule_run_id,
                assignment: *assignment,
            });
        }

        info!(
            schedule_run_id,
            deleted,
            inserted = stored.len(),
            "Persisted schedule"
        );

        Ok(PersistedSchedule {
            schedule_run_id,
            deleted,
            assignments: stored,
        })
    })
}

/// Stores the status and publish time of a run.
///
/// # Errors
///
/// Returns an error if the run does not exist or the update fails.
pub fn update_schedule_run_status(
    conn: &mut SqliteConnection,
    run: &ScheduleRun,
) -> Result<(), PersistenceError> {
    let published_at: Option<String> = run.published_at.map(stored_timestamp).transpose()?;

    let updated: usize = diesel::update(
        schedule_runs::table.filter(schedule_runs::schedule_run_id.eq(run.schedule_run_id)),
    )
    .set((
        schedule_runs::status.eq(run.status.as_str()),
        schedule_runs::published_at.eq(published_at.as_deref()),
    ))
    .execute(conn)?;

    if updated == 0 {
        return Err(PersistenceError::NotFound(format!(
            "Schedule run {}",
            run.schedule_run_id
        )));
    }

    info!(
        schedule_run_id = run.schedule_run_id,
        status = run.status.as_str(),
        "Updated schedule run status"
    );
    Ok(())
}

/// Deletes a run together with its assignments.
///
/// # Errors
///
/// Returns an error if the run does not exist or a statement fails.
pub fn delete_schedule_run(
    conn: &mut SqliteConnection,
    schedule_run_id: i64,
) -> Result<usize, PersistenceError> {
    conn.transaction::<usize, PersistenceError, _>(|conn| {
        let removed_assignments: usize = diesel::delete(
            assignments::table.filter(assignments::schedule_run_id.eq(schedule_run_id)),
        )
        .execute(conn)?;

        let removed_runs: usize = diesel::delete(
            schedule_runs::table.filter(schedule_runs::schedule_run_id.eq(schedule_run_id)),
        )
        .execute(conn)?;

        if removed_runs == 0 {
            return Err(PersistenceError::NotFound(format!(
                "Schedule run {schedule_run_id}"
            )));
        }

        info!(schedule_run_id, removed_assignments, "Deleted schedule run");
        Ok(removed_assignments)
    })
}

/// Locks or unlocks one assignment.
///
/// # Errors
///
/// Returns an error if the assignment does not exist or the update fails.
pub fn set_assignment_lock(
    conn: &mut SqliteConnection,
    assignment_id: i64,
    locked: bool,
) -> Result<(), PersistenceError> {
    let updated: usize =
        diesel::update(assignments::table.filter(assignments::assignment_id.eq(assignment_id)))
            .set(assignments::locked.eq(i32::from(locked)))
            .execute(conn)?;

    if updated == 0 {
        return Err(PersistenceError::NotFound(format!(
            "Assignment {assignment_id}"
        )));
    }

    debug!(assignment_id, locked, "Updated assignment lock");
    Ok(())
}
