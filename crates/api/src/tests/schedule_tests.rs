// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use escala_domain::RunStatus;
use escala_persistence::Persistence;
use time::Month;

use super::helpers::{at, generated_example, november, now};
use crate::{
    ApiError, DeleteScheduleResponse, PublishScheduleResponse, SCHEDULE_DELETED_MESSAGE,
    ScheduleByPeriodResponse, ScheduleRosterResponse, SetAssignmentLockResponse,
    delete_schedule_by_period, get_schedule_by_period, get_schedule_roster, publish_schedule,
    set_assignment_lock,
};

#[test]
fn test_get_schedule_by_period_without_run() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();

    let response: ScheduleByPeriodResponse =
        get_schedule_by_period(&mut persistence, &november()).unwrap();

    assert_eq!(response.schedule, None);
}

#[test]
fn test_get_schedule_by_period_returns_summary() {
    let (mut persistence, _example, generated) = generated_example();

    let response: ScheduleByPeriodResponse =
        get_schedule_by_period(&mut persistence, &november()).unwrap();

    let schedule = response.schedule.unwrap();
    assert_eq!(schedule.id, generated.schedule_run_id);
    assert_eq!(schedule.month, 11);
    assert_eq!(schedule.year, 2025);
    assert_eq!(schedule.status, RunStatus::Draft);
    assert_eq!(schedule.created_at, now());
    assert_eq!(schedule.published_at, None);
}

#[test]
fn test_delete_schedule_by_period_frees_the_period() {
    let (mut persistence, _example, generated) = generated_example();

    let response: DeleteScheduleResponse =
        delete_schedule_by_period(&mut persistence, &november()).unwrap();

    assert_eq!(response.deleted_id, generated.schedule_run_id);
    assert_eq!(response.message, SCHEDULE_DELETED_MESSAGE);
    assert!(
        persistence
            .list_assignments_for_run(generated.schedule_run_id)
            .unwrap()
            .is_empty()
    );

    let again: Result<DeleteScheduleResponse, ApiError> =
        delete_schedule_by_period(&mut persistence, &november());
    assert!(matches!(again, Err(ApiError::ResourceNotFound { .. })));
}

#[test]
fn test_publish_schedule_stamps_publication() {
    let (mut persistence, _example, generated) = generated_example();
    let published_at = at(Month::October, 31, 9);

    let response: PublishScheduleResponse =
        publish_schedule(&mut persistence, generated.schedule_run_id, published_at).unwrap();

    assert_eq!(response.schedule.status, RunStatus::Published);
    assert_eq!(response.schedule.published_at, Some(published_at));

    let stored: ScheduleByPeriodResponse =
        get_schedule_by_period(&mut persistence, &november()).unwrap();
    assert_eq!(stored.schedule, Some(response.schedule));
}

#[test]
fn test_publish_twice_is_rule_violation() {
    let (mut persistence, _example, generated) = generated_example();
    publish_schedule(&mut persistence, generated.schedule_run_id, now()).unwrap();

    let result: Result<PublishScheduleResponse, ApiError> =
        publish_schedule(&mut persistence, generated.schedule_run_id, now());

    assert!(matches!(
        result,
        Err(ApiError::DomainRuleViolation { ref rule, .. }) if rule == "schedule_already_published"
    ));
}

#[test]
fn test_publish_missing_run_is_not_found() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();

    let result: Result<PublishScheduleResponse, ApiError> =
        publish_schedule(&mut persistence, 11, now());

    assert!(matches!(result, Err(ApiError::ResourceNotFound { .. })));
}

#[test]
fn test_roster_rows_are_ordered_by_date_ministry_and_role() {
    let (mut persistence, example, generated) = generated_example();

    let response: ScheduleRosterResponse =
        get_schedule_roster(&mut persistence, generated.schedule_run_id).unwrap();

    assert_eq!(response.schedule.id, generated.schedule_run_id);
    let lines: Vec<(i64, &str, &str, &str)> = response
        .rows
        .iter()
        .map(|r| {
            (
                r.celebration_id,
                r.ministry_name.as_str(),
                r.role_name.as_str(),
                r.member_name.as_str(),
            )
        })
        .collect();
    assert_eq!(
        lines,
        vec![
            (example.first_sunday_id, "Bandas", "Baixo", "Bruno"),
            (example.first_sunday_id, "Bandas", "Vocal", "Ana"),
            (example.first_sunday_id, "Áudio", "Operador", "Eva"),
            (example.second_sunday_id, "Bandas", "Baixo", "Davi"),
            (example.second_sunday_id, "Bandas", "Vocal", "Carla"),
            (example.second_sunday_id, "Áudio", "Operador", "Fabio"),
        ]
    );
}

#[test]
fn test_roster_of_missing_run_is_not_found() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();

    let result: Result<ScheduleRosterResponse, ApiError> =
        get_schedule_roster(&mut persistence, 5);

    assert!(matches!(result, Err(ApiError::ResourceNotFound { .. })));
}

#[test]
fn test_set_assignment_lock_is_reflected_in_roster() {
    let (mut persistence, _example, generated) = generated_example();
    let assignment_id: i64 = generated.assignments[2].assignment_id;

    let response: SetAssignmentLockResponse =
        set_assignment_lock(&mut persistence, assignment_id, true).unwrap();
    assert_eq!(
        response,
        SetAssignmentLockResponse {
            assignment_id,
            locked: true
        }
    );

    let roster: ScheduleRosterResponse =
        get_schedule_roster(&mut persistence, generated.schedule_run_id).unwrap();
    let locked: Vec<i64> = roster
        .rows
        .iter()
        .filter(|r| r.locked)
        .map(|r| r.assignment_id)
        .collect();
    assert_eq!(locked, vec![assignment_id]);
}

#[test]
fn test_set_lock_on_missing_assignment_is_not_found() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();

    let result: Result<SetAssignmentLockResponse, ApiError> =
        set_assignment_lock(&mut persistence, 77, true);

    assert!(matches!(
        result,
        Err(ApiError::ResourceNotFound { ref resource_type, .. }) if resource_type == "Assignment"
    ));
}
