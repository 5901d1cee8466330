// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use escala_domain::{RunStatus, ScheduleRun, StoredAssignment};
use escala_persistence::Persistence;
use time::Month;

use super::helpers::{
    Example, at, generated_example, november, now, request, seed_november_example,
};
use crate::{
    ApiError, AssignmentInfo, GenerateScheduleRequest, GenerateScheduleResponse,
    INCOMPLETE_AVAILABILITY_MESSAGE, generate_schedule, publish_schedule, regenerate_schedule,
    set_assignment_lock,
};

fn member_for(
    assignments: &[AssignmentInfo],
    celebration_id: i64,
    role_id: i64,
) -> Option<i64> {
    assignments
        .iter()
        .find(|a| a.celebration_id == celebration_id && a.role_id == role_id)
        .map(|a| a.member_id)
}

#[test]
fn test_generate_november_example() {
    let (mut persistence, example, response) = generated_example();

    assert!(response.warnings.is_empty());
    assert_eq!(response.assignments.len(), 6);

    let first: i64 = example.first_sunday_id;
    let second: i64 = example.second_sunday_id;
    assert_eq!(
        member_for(&response.assignments, first, example.vocal_role_id),
        Some(example.band_a[0])
    );
    assert_eq!(
        member_for(&response.assignments, first, example.bass_role_id),
        Some(example.band_a[1])
    );
    assert_eq!(
        member_for(&response.assignments, first, example.audio_role_id),
        Some(example.operators[0])
    );
    assert_eq!(
        member_for(&response.assignments, second, example.vocal_role_id),
        Some(example.band_b[0])
    );
    assert_eq!(
        member_for(&response.assignments, second, example.bass_role_id),
        Some(example.band_b[1])
    );
    assert_eq!(
        member_for(&response.assignments, second, example.audio_role_id),
        Some(example.operators[1])
    );
    assert!(response.assignments.iter().all(|a| !a.locked));

    let run: ScheduleRun = persistence
        .find_schedule_run_by_period(&november())
        .unwrap()
        .unwrap();
    assert_eq!(run.schedule_run_id, response.schedule_run_id);
    assert_eq!(run.status, RunStatus::Draft);
    assert_eq!(run.created_by.as_deref(), Some("coordenador"));
}

#[test]
fn test_second_generation_for_period_is_duplicate() {
    let (mut persistence, _example, _response) = generated_example();

    let result: Result<GenerateScheduleResponse, ApiError> =
        generate_schedule(&mut persistence, &november(), &request(), now());

    assert_eq!(
        result,
        Err(ApiError::DuplicateSchedule {
            month: 11,
            year: 2025
        })
    );
}

#[test]
fn test_generation_requires_creator() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    seed_november_example(&mut persistence);

    for created_by in [None, Some(String::from("   "))] {
        let anonymous: GenerateScheduleRequest = GenerateScheduleRequest {
            created_by,
            ..request()
        };
        let result: Result<GenerateScheduleResponse, ApiError> =
            generate_schedule(&mut persistence, &november(), &anonymous, now());

        assert!(matches!(
            result,
            Err(ApiError::InvalidInput { ref field, .. }) if field == "createdBy"
        ));
    }
    assert_eq!(
        persistence.find_schedule_run_by_period(&november()).unwrap(),
        None
    );
}

#[test]
fn test_missing_creator_is_reported_before_duplicate() {
    let (mut persistence, _example, _response) = generated_example();

    let result: Result<GenerateScheduleResponse, ApiError> = generate_schedule(
        &mut persistence,
        &november(),
        &GenerateScheduleRequest::default(),
        now(),
    );

    assert!(matches!(result, Err(ApiError::InvalidInput { .. })));
}

#[test]
fn test_declined_band_member_blocks_generation() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    let example: Example = seed_november_example(&mut persistence);
    persistence
        .upsert_availability(example.band_b[1], example.second_sunday_id, false, now())
        .unwrap();

    let result: Result<GenerateScheduleResponse, ApiError> =
        generate_schedule(&mut persistence, &november(), &request(), now());

    let Err(ApiError::IncompleteAvailability { message, warnings }) = result else {
        panic!("expected incomplete availability, got {result:?}");
    };
    assert_eq!(message, INCOMPLETE_AVAILABILITY_MESSAGE);
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].code, "unavailable_declared");
    assert_eq!(warnings[0].celebration_id, example.second_sunday_id);
    assert_eq!(warnings[0].role_id, Some(example.bass_role_id));
    assert_eq!(warnings[0].ministry_name.as_deref(), Some("Bandas"));
    assert_eq!(
        warnings[0].celebration_starts_at,
        at(Month::November, 9, 19)
    );

    assert_eq!(
        persistence.find_schedule_run_by_period(&november()).unwrap(),
        None
    );
}

#[test]
fn test_forced_generation_persists_with_warnings() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    let example: Example = seed_november_example(&mut persistence);
    persistence
        .upsert_availability(example.band_b[1], example.second_sunday_id, false, now())
        .unwrap();

    let forced: GenerateScheduleRequest = GenerateScheduleRequest {
        allow_incomplete: true,
        ..request()
    };
    let response: GenerateScheduleResponse =
        generate_schedule(&mut persistence, &november(), &forced, now()).unwrap();

    assert_eq!(response.assignments.len(), 5);
    assert_eq!(response.warnings.len(), 1);
    assert_eq!(
        member_for(
            &response.assignments,
            example.second_sunday_id,
            example.bass_role_id
        ),
        None
    );
}

#[test]
fn test_unanswered_band_member_is_unconfirmed() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    let example: Example = seed_november_example(&mut persistence);
    let late_singer: i64 = persistence.create_profile("Gabi", None).unwrap();
    let banda_c: i64 = persistence.create_band("Banda C", true).unwrap();
    persistence
        .add_band_member(banda_c, late_singer, "Vocal")
        .unwrap();
    persistence
        .create_celebration(at(Month::November, 16, 19), None, None)
        .unwrap();

    let result: Result<GenerateScheduleResponse, ApiError> =
        generate_schedule(&mut persistence, &november(), &request(), now());

    let Err(ApiError::IncompleteAvailability { warnings, .. }) = result else {
        panic!("expected incomplete availability, got {result:?}");
    };
    let codes: Vec<&str> = warnings.iter().map(|w| w.code.as_str()).collect();
    assert!(codes.contains(&"unavailable_unconfirmed"));
    assert!(
        warnings
            .iter()
            .all(|w| w.celebration_id != example.first_sunday_id)
    );
}

#[test]
fn test_ministry_filter_generates_only_that_ministry() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    let example: Example = seed_november_example(&mut persistence);

    let audio_only: GenerateScheduleRequest = GenerateScheduleRequest {
        ministry: Some(String::from("audio")),
        ..request()
    };
    let response: GenerateScheduleResponse =
        generate_schedule(&mut persistence, &november(), &audio_only, now()).unwrap();

    assert_eq!(response.assignments.len(), 2);
    assert!(
        response
            .assignments
            .iter()
            .all(|a| a.ministry_id == example.audio_ministry_id)
    );
}

#[test]
fn test_regenerate_without_run_is_not_found() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    seed_november_example(&mut persistence);

    let result: Result<GenerateScheduleResponse, ApiError> =
        regenerate_schedule(&mut persistence, &november(), &request());

    assert!(matches!(result, Err(ApiError::ResourceNotFound { .. })));
}

#[test]
fn test_regenerate_published_run_is_rejected() {
    let (mut persistence, _example, response) = generated_example();
    publish_schedule(&mut persistence, response.schedule_run_id, now()).unwrap();

    let result: Result<GenerateScheduleResponse, ApiError> =
        regenerate_schedule(&mut persistence, &november(), &request());

    assert!(matches!(
        result,
        Err(ApiError::DomainRuleViolation { ref rule, .. }) if rule == "published_schedule_immutable"
    ));
}

#[test]
fn test_regenerate_preserves_locked_assignment() {
    let (mut persistence, example, response) = generated_example();
    let locked: &AssignmentInfo = response
        .assignments
        .iter()
        .find(|a| {
            a.celebration_id == example.first_sunday_id && a.role_id == example.audio_role_id
        })
        .unwrap();
    set_assignment_lock(&mut persistence, locked.assignment_id, true).unwrap();

    let audio_preserving: GenerateScheduleRequest = GenerateScheduleRequest {
        ministry: Some(String::from("Áudio")),
        preserve_locked: true,
        ..request()
    };
    let regenerated: GenerateScheduleResponse =
        regenerate_schedule(&mut persistence, &november(), &audio_preserving).unwrap();

    assert_eq!(regenerated.schedule_run_id, response.schedule_run_id);
    assert_eq!(regenerated.assignments.len(), 1);
    assert_eq!(
        regenerated.assignments[0].celebration_id,
        example.second_sunday_id
    );

    let stored: Vec<StoredAssignment> = persistence
        .list_assignments_for_run(response.schedule_run_id)
        .unwrap();
    assert_eq!(stored.len(), 6);
    let kept: &StoredAssignment = stored
        .iter()
        .find(|s| s.assignment_id == locked.assignment_id)
        .unwrap();
    assert!(kept.assignment.locked);
    assert_eq!(kept.assignment.member_id, example.operators[0]);
    assert_eq!(
        stored
            .iter()
            .filter(|s| s.assignment.ministry_id == example.band_ministry_id)
            .count(),
        4
    );
}

#[test]
fn test_regenerate_without_preservation_replaces_locked_rows() {
    let (mut persistence, example, response) = generated_example();
    let locked_id: i64 = response.assignments[0].assignment_id;
    set_assignment_lock(&mut persistence, locked_id, true).unwrap();

    let regenerated: GenerateScheduleResponse =
        regenerate_schedule(&mut persistence, &november(), &request()).unwrap();

    assert_eq!(regenerated.assignments.len(), 6);
    let stored: Vec<StoredAssignment> = persistence
        .list_assignments_for_run(response.schedule_run_id)
        .unwrap();
    assert_eq!(stored.len(), 6);
    assert!(stored.iter().all(|s| s.assignment_id != locked_id));
    assert!(stored.iter().all(|s| !s.assignment.locked));
    assert!(
        stored
            .iter()
            .any(|s| s.assignment.ministry_id == example.band_ministry_id)
    );
}
