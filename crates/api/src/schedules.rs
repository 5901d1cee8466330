// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Operations on stored schedule runs.

use escala_domain::{SchedulePeriod, ScheduleRun};
use escala_persistence::{Persistence, RosterEntry};
use time::OffsetDateTime;
use tracing::info;

use crate::error::{ApiError, translate_domain_error, translate_persistence_error};
use crate::generate::SCHEDULE_NOT_FOUND_MESSAGE;
use crate::request_response::{
    DeleteScheduleResponse, PublishScheduleResponse, ScheduleByPeriodResponse, ScheduleRosterResponse,
    ScheduleRunInfo, SetAssignmentLockResponse,
};

/// Message returned after a run is deleted.
pub const SCHEDULE_DELETED_MESSAGE: &str =
    "Escala removida com sucesso. Gere uma nova em seguida, se desejar.";

fn run_not_found(schedule_run_id: i64) -> ApiError {
    ApiError::ResourceNotFound {
        resource_type: String::from("Schedule run"),
        message: format!("Schedule run {schedule_run_id} does not exist"),
    }
}

fn require_run(persistence: &mut Persistence, schedule_run_id: i64) -> Result<ScheduleRun, ApiError> {
    persistence
        .get_schedule_run(schedule_run_id)
        .map_err(|e| translate_persistence_error(e, "Schedule run"))?
        .ok_or_else(|| run_not_found(schedule_run_id))
}

/// Looks up the run of a period.
///
/// # Errors
///
/// Returns an error if the lookup fails.
pub fn get_schedule_by_period(
    persistence: &mut Persistence,
    period: &SchedulePeriod,
) -> Result<ScheduleByPeriodResponse, ApiError> {
    let run: Option<ScheduleRun> = persistence
        .find_schedule_run_by_period(period)
        .map_err(|e| translate_persistence_error(e, "Schedule run"))?;

    Ok(ScheduleByPeriodResponse {
        schedule: run.as_ref().map(ScheduleRunInfo::from),
    })
}

/// Deletes the run of a period together with its assignments.
///
/// # Errors
///
/// Returns an error if no run exists for the period or the deletion fails.
pub fn delete_schedule_by_period(
    persistence: &mut Persistence,
    period: &SchedulePeriod,
) -> Result<DeleteScheduleResponse, ApiError> {
    let run: ScheduleRun = persistence
        .find_schedule_run_by_period(period)
        .map_err(|e| translate_persistence_error(e, "Schedule run"))?
        .ok_or_else(|| ApiError::ResourceNotFound {
            resource_type: String::from("Schedule run"),
            message: SCHEDULE_NOT_FOUND_MESSAGE.to_string(),
        })?;

    let removed: usize = persistence
        .delete_schedule_run(run.schedule_run_id)
        .map_err(|e| translate_persistence_error(e, "Schedule run"))?;

    info!(
        schedule_run_id = run.schedule_run_id,
        month = period.month(),
        year = period.year(),
        assignments = removed,
        "Deleted schedule"
    );

    Ok(DeleteScheduleResponse {
        deleted_id: run.schedule_run_id,
        message: SCHEDULE_DELETED_MESSAGE.to_string(),
    })
}

/// Publishes a draft run.
///
/// # Errors
///
/// Returns an error if the run does not exist or is already published.
pub fn publish_schedule(
    persistence: &mut Persistence,
    schedule_run_id: i64,
    now: OffsetDateTime,
) -> Result<PublishScheduleResponse, ApiError> {
    let mut run: ScheduleRun = require_run(persistence, schedule_run_id)?;
    run.publish(now).map_err(translate_domain_error)?;

    persistence
        .update_schedule_run_status(&run)
        .map_err(|e| translate_persistence_error(e, "Schedule run"))?;

    info!(schedule_run_id, period = %run.period, "Published schedule");

    Ok(PublishScheduleResponse {
        schedule: ScheduleRunInfo::from(&run),
    })
}

/// Reads a run as a joined roster.
///
/// # Errors
///
/// Returns an error if the run does not exist or the read fails.
pub fn get_schedule_roster(
    persistence: &mut Persistence,
    schedule_run_id: i64,
) -> Result<ScheduleRosterResponse, ApiError> {
    let run: ScheduleRun = require_run(persistence, schedule_run_id)?;
    let rows: Vec<RosterEntry> = persistence
        .get_roster(schedule_run_id)
        .map_err(|e| translate_persistence_error(e, "Schedule run"))?;

    Ok(ScheduleRosterResponse {
        schedule: ScheduleRunInfo::from(&run),
        rows,
    })
}

/// Locks or unlocks one assignment.
///
/// # Errors
///
/// Returns an error if the assignment does not exist or the update fails.
pub fn set_assignment_lock(
    persistence: &mut Persistence,
    assignment_id: i64,
    locked: bool,
) -> Result<SetAssignmentLockResponse, ApiError> {
    persistence
        .set_assignment_lock(assignment_id, locked)
        .map_err(|e| translate_persistence_error(e, "Assignment"))?;

    info!(assignment_id, locked, "Changed assignment lock");

    Ok(SetAssignmentLockResponse {
        assignment_id,
        locked,
    })
}
