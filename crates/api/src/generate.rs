// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Roster generation.
//!
//! Both entry points follow the same pipeline: load the month's reference
//! data, compute the roster, reject it if slots are unfilled and incomplete
//! rosters were not allowed, then persist it in one transaction.
//!
//! A fresh generation creates the period's draft run. Regeneration writes
//! into the existing draft run; its stored assignments seed the fairness
//! counts and the locked slots.

use escala::{GenerationOptions, ReferenceData, ScheduleOutcome, compute_schedule};
use escala_domain::{Assignment, SchedulePeriod, ScheduleRun};
use escala_persistence::{AssignmentSweep, PersistedSchedule, Persistence, RunTarget};
use time::OffsetDateTime;
use tracing::{info, warn};

use crate::error::{
    ApiError, INCOMPLETE_AVAILABILITY_MESSAGE, load_failed, translate_core_error,
    translate_domain_error, translate_persistence_error,
};
use crate::request_response::{
    AssignmentInfo, GenerateScheduleRequest, GenerateScheduleResponse, WarningInfo,
};

/// Message returned when no run exists for a period.
pub const SCHEDULE_NOT_FOUND_MESSAGE: &str = "Nenhuma escala encontrada para o periodo informado.";

fn options_for(request: &GenerateScheduleRequest) -> GenerationOptions {
    GenerationOptions {
        ministry: request
            .ministry
            .as_deref()
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .map(str::to_string),
        preserve_locked: request.preserve_locked,
    }
}

/// The user a new run is attributed to.
fn required_creator(request: &GenerateScheduleRequest) -> Result<String, ApiError> {
    request
        .created_by
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string)
        .ok_or_else(|| ApiError::InvalidInput {
            field: String::from("createdBy"),
            message: String::from("createdBy is required"),
        })
}

/// Rejects an outcome with unfilled slots unless incomplete rosters are
/// allowed.
fn enforce_completeness(
    period: &SchedulePeriod,
    outcome: &ScheduleOutcome,
    allow_incomplete: bool,
) -> Result<(), ApiError> {
    if outcome.is_complete() || allow_incomplete {
        return Ok(());
    }

    warn!(
        month = period.month(),
        year = period.year(),
        warnings = outcome.warnings.len(),
        "Rejecting incomplete schedule"
    );

    Err(ApiError::IncompleteAvailability {
        message: INCOMPLETE_AVAILABILITY_MESSAGE.to_string(),
        warnings: outcome.warnings.iter().map(WarningInfo::from).collect(),
    })
}

fn to_response(persisted: &PersistedSchedule, outcome: &ScheduleOutcome) -> GenerateScheduleResponse {
    GenerateScheduleResponse {
        schedule_run_id: persisted.schedule_run_id,
        assignments: persisted
            .assignments
            .iter()
            .map(AssignmentInfo::from)
            .collect(),
        warnings: outcome.warnings.iter().map(WarningInfo::from).collect(),
    }
}

/// Generates the roster of a period that has no schedule yet.
///
/// # Arguments
///
/// * `persistence` - The persistence layer
/// * `period` - The month to schedule
/// * `request` - Ministry filter, lock and completeness options
/// * `now` - Creation time of the run
///
/// # Errors
///
/// Returns an error if:
/// - `created_by` is missing or blank
/// - A run already exists for the period, checked before any load and again
///   by the storage constraint at insert time
/// - Reference data cannot be loaded
/// - Slots remain unfilled and `allow_incomplete` is not set; nothing is
///   persisted in that case
/// - The roster cannot be persisted
pub fn generate_schedule(
    persistence: &mut Persistence,
    period: &SchedulePeriod,
    request: &GenerateScheduleRequest,
    now: OffsetDateTime,
) -> Result<GenerateScheduleResponse, ApiError> {
    info!(
        month = period.month(),
        year = period.year(),
        ministry = request.ministry.as_deref(),
        preserve_locked = request.preserve_locked,
        allow_incomplete = request.allow_incomplete,
        "Generating schedule"
    );

    let created_by: String = required_creator(request)?;

    if persistence
        .find_schedule_run_by_period(period)
        .map_err(|e| load_failed(&e))?
        .is_some()
    {
        return Err(ApiError::DuplicateSchedule {
            month: period.month(),
            year: period.year(),
        });
    }

    let data: ReferenceData = persistence
        .load_reference_data(period)
        .map_err(|e| load_failed(&e))?;

    let options: GenerationOptions = options_for(request);
    let outcome: ScheduleOutcome =
        compute_schedule(period, &data, &[], &options).map_err(translate_core_error)?;

    enforce_completeness(period, &outcome, request.allow_incomplete)?;

    let sweep: Option<AssignmentSweep> = if options.preserve_locked {
        None
    } else {
        Some(AssignmentSweep {
            ministry_ids: options
                .ministry
                .as_deref()
                .and_then(|name| data.ministry_named(name))
                .map(|m| vec![m.ministry_id]),
            include_locked: false,
        })
    };

    let target: RunTarget = RunTarget::Create {
        period: *period,
        created_by: Some(created_by),
        created_at: now,
    };
    let persisted: PersistedSchedule = persistence
        .persist_schedule(&target, sweep.as_ref(), &outcome.assignments)
        .map_err(|e| translate_persistence_error(e, "Schedule run"))?;

    info!(
        schedule_run_id = persisted.schedule_run_id,
        month = period.month(),
        year = period.year(),
        assignments = persisted.assignments.len(),
        warnings = outcome.warnings.len(),
        "Schedule generated"
    );

    Ok(to_response(&persisted, &outcome))
}

/// Regenerates the draft roster of a period.
///
/// Only the ministries the pass recomputes are swept: the band ministry
/// and/or the derived ministries the filter allows. With `preserve_locked`
/// their locked rows survive; without it they are replaced too.
///
/// # Errors
///
/// Returns an error if:
/// - No run exists for the period
/// - The run is already published
/// - Reference data cannot be loaded
/// - Slots remain unfilled and `allow_incomplete` is not set
/// - The roster cannot be persisted
pub fn regenerate_schedule(
    persistence: &mut Persistence,
    period: &SchedulePeriod,
    request: &GenerateScheduleRequest,
) -> Result<GenerateScheduleResponse, ApiError> {
    info!(
        month = period.month(),
        year = period.year(),
        ministry = request.ministry.as_deref(),
        preserve_locked = request.preserve_locked,
        allow_incomplete = request.allow_incomplete,
        "Regenerating schedule"
    );

    let run: ScheduleRun = persistence
        .find_schedule_run_by_period(period)
        .map_err(|e| load_failed(&e))?
        .ok_or_else(|| ApiError::ResourceNotFound {
            resource_type: String::from("Schedule run"),
            message: SCHEDULE_NOT_FOUND_MESSAGE.to_string(),
        })?;
    run.ensure_regenerable().map_err(translate_domain_error)?;

    let data: ReferenceData = persistence
        .load_reference_data(period)
        .map_err(|e| load_failed(&e))?;
    let prior: Vec<Assignment> = persistence
        .list_assignments_for_run(run.schedule_run_id)
        .map_err(|e| load_failed(&e))?
        .into_iter()
        .map(|stored| stored.assignment)
        .collect();

    let options: GenerationOptions = options_for(request);
    let outcome: ScheduleOutcome =
        compute_schedule(period, &data, &prior, &options).map_err(translate_core_error)?;

    enforce_completeness(period, &outcome, request.allow_incomplete)?;

    let sweep: AssignmentSweep = AssignmentSweep {
        ministry_ids: Some(outcome.recomputed_ministry_ids.clone()),
        include_locked: !options.preserve_locked,
    };
    let persisted: PersistedSchedule = persistence
        .persist_schedule(
            &RunTarget::Existing(run.schedule_run_id),
            Some(&sweep),
            &outcome.assignments,
        )
        .map_err(|e| translate_persistence_error(e, "Schedule run"))?;

    info!(
        schedule_run_id = persisted.schedule_run_id,
        replaced = persisted.deleted,
        assignments = persisted.assignments.len(),
        warnings = outcome.warnings.len(),
        "Schedule regenerated"
    );

    Ok(to_response(&persisted, &outcome))
}
