// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::tests::helpers::{
    AUDIO_MINISTRY_ID, AUDIO_ROLE_ID, BAND_MINISTRY_ID, BASS_ROLE_ID, VOCAL_ROLE_ID,
    availability, band, celebration, everyone_available, member_of, ministry, november,
    november_at, november_example, profile, role,
};
use crate::{GenerationOptions, ReferenceData, ScheduleOutcome, WarningReason, compute_schedule};
use escala_domain::Assignment;
use std::collections::HashMap;

fn assignment(celebration_id: i64, ministry_id: i64, role_id: i64, member_id: i64) -> Assignment {
    Assignment {
        celebration_id,
        ministry_id,
        role_id,
        member_id,
        locked: false,
    }
}

#[test]
fn test_november_example_produces_full_roster() {
    let data: ReferenceData = november_example();

    let outcome: ScheduleOutcome =
        compute_schedule(&november(), &data, &[], &GenerationOptions::default()).unwrap();

    assert!(outcome.is_complete());
    assert_eq!(
        outcome.assignments,
        vec![
            assignment(1, BAND_MINISTRY_ID, VOCAL_ROLE_ID, 101),
            assignment(1, BAND_MINISTRY_ID, BASS_ROLE_ID, 102),
            assignment(1, AUDIO_MINISTRY_ID, AUDIO_ROLE_ID, 201),
            assignment(2, BAND_MINISTRY_ID, VOCAL_ROLE_ID, 103),
            assignment(2, BAND_MINISTRY_ID, BASS_ROLE_ID, 104),
            assignment(2, AUDIO_MINISTRY_ID, AUDIO_ROLE_ID, 202),
        ]
    );
    assert_eq!(
        outcome.recomputed_ministry_ids,
        vec![BAND_MINISTRY_ID, AUDIO_MINISTRY_ID]
    );
}

#[test]
fn test_uniform_availability_balances_derived_load() {
    let celebrations = (0..9u8)
        .map(|i| celebration(i64::from(i) + 1, november_at(1 + 3 * i, 19)))
        .collect();
    let members: Vec<i64> = (201..=204).collect();
    let mut data: ReferenceData = ReferenceData {
        celebrations,
        profiles: members.iter().map(|id| profile(*id, None)).collect(),
        ministries: vec![ministry(AUDIO_MINISTRY_ID, "Audio"), ministry(3, "Iluminação")],
        roles: vec![
            role(AUDIO_ROLE_ID, AUDIO_MINISTRY_ID, "Operador"),
            role(21, AUDIO_MINISTRY_ID, "Monitor"),
            role(30, 3, "Luz"),
        ],
        ministry_memberships: members
            .iter()
            .flat_map(|id| [member_of(*id, AUDIO_MINISTRY_ID), member_of(*id, 3)])
            .collect(),
        ..ReferenceData::default()
    };
    everyone_available(&mut data);

    let outcome: ScheduleOutcome =
        compute_schedule(&november(), &data, &[], &GenerationOptions::default()).unwrap();

    assert!(outcome.is_complete());
    assert_eq!(outcome.assignments.len(), 27);
    let mut counts: HashMap<i64, u32> = HashMap::new();
    for a in &outcome.assignments {
        *counts.entry(a.member_id).or_insert(0) += 1;
    }
    let max: u32 = counts.values().copied().max().unwrap();
    let min: u32 = counts.values().copied().min().unwrap();
    assert!(max - min <= 1, "spread too large: {counts:?}");
}

#[test]
fn test_missing_band_ministry_disables_band_pass() {
    let mut data: ReferenceData = november_example();
    data.ministries.retain(|m| m.ministry_id != BAND_MINISTRY_ID);
    data.bands.clear();

    let outcome: ScheduleOutcome =
        compute_schedule(&november(), &data, &[], &GenerationOptions::default()).unwrap();

    assert!(outcome.is_complete());
    assert!(
        outcome
            .assignments
            .iter()
            .all(|a| a.ministry_id == AUDIO_MINISTRY_ID)
    );
    assert_eq!(outcome.recomputed_ministry_ids, vec![AUDIO_MINISTRY_ID]);
}

#[test]
fn test_no_bands_warns_per_celebration() {
    let mut data: ReferenceData = november_example();
    data.bands.clear();

    let outcome: ScheduleOutcome =
        compute_schedule(&november(), &data, &[], &GenerationOptions::default()).unwrap();

    let band_missing: Vec<i64> = outcome
        .warnings
        .iter()
        .filter(|w| w.reason == WarningReason::BandMissing)
        .map(|w| w.celebration_id)
        .collect();
    assert_eq!(band_missing, vec![1, 2]);
    // Derived roles are still filled.
    assert_eq!(outcome.assignments.len(), 2);
}

#[test]
fn test_ministry_filter_matches_without_accents() {
    let data: ReferenceData = november_example();
    let options: GenerationOptions = GenerationOptions {
        ministry: Some(String::from("AUDIO")),
        preserve_locked: false,
    };

    let outcome: ScheduleOutcome = compute_schedule(&november(), &data, &[], &options).unwrap();

    assert_eq!(outcome.assignments.len(), 2);
    assert!(
        outcome
            .assignments
            .iter()
            .all(|a| a.ministry_id == AUDIO_MINISTRY_ID)
    );
    assert_eq!(outcome.recomputed_ministry_ids, vec![AUDIO_MINISTRY_ID]);
}

#[test]
fn test_band_filter_also_recomputes_derived_ministries() {
    let data: ReferenceData = november_example();
    let options: GenerationOptions = GenerationOptions {
        ministry: Some(String::from("bandas")),
        preserve_locked: false,
    };

    let outcome: ScheduleOutcome = compute_schedule(&november(), &data, &[], &options).unwrap();

    assert_eq!(outcome.assignments.len(), 6);
    assert_eq!(
        outcome.recomputed_ministry_ids,
        vec![BAND_MINISTRY_ID, AUDIO_MINISTRY_ID]
    );
}

#[test]
fn test_unknown_filter_recomputes_nothing() {
    let data: ReferenceData = november_example();
    let options: GenerationOptions = GenerationOptions {
        ministry: Some(String::from("Recepção")),
        preserve_locked: false,
    };

    let outcome: ScheduleOutcome = compute_schedule(&november(), &data, &[], &options).unwrap();

    assert!(outcome.assignments.is_empty());
    assert!(outcome.warnings.is_empty());
    assert!(outcome.recomputed_ministry_ids.is_empty());
}

#[test]
fn test_locked_slots_are_skipped_when_preserved() {
    let data: ReferenceData = november_example();
    let mut locked: Assignment = assignment(1, AUDIO_MINISTRY_ID, AUDIO_ROLE_ID, 202);
    locked.locked = true;
    let prior: Vec<Assignment> = vec![locked];
    let options: GenerationOptions = GenerationOptions {
        ministry: None,
        preserve_locked: true,
    };

    let outcome: ScheduleOutcome = compute_schedule(&november(), &data, &prior, &options).unwrap();

    assert!(
        !outcome
            .assignments
            .iter()
            .any(|a| a.celebration_id == 1 && a.role_id == AUDIO_ROLE_ID)
    );
    // 202 already holds one slot, so the second Sunday goes to 201.
    assert!(
        outcome
            .assignments
            .contains(&assignment(2, AUDIO_MINISTRY_ID, AUDIO_ROLE_ID, 201))
    );
    assert_eq!(outcome.assignments.len(), 5);
}

#[test]
fn test_locked_slots_are_recomputed_without_preservation() {
    let data: ReferenceData = november_example();
    let mut locked: Assignment = assignment(1, AUDIO_MINISTRY_ID, AUDIO_ROLE_ID, 202);
    locked.locked = true;

    let outcome: ScheduleOutcome =
        compute_schedule(&november(), &data, &[locked], &GenerationOptions::default()).unwrap();

    assert_eq!(outcome.assignments.len(), 6);
    assert!(
        outcome
            .assignments
            .iter()
            .any(|a| a.celebration_id == 1 && a.role_id == AUDIO_ROLE_ID)
    );
}

#[test]
fn test_celebrations_outside_period_are_ignored() {
    let mut data: ReferenceData = november_example();
    data.celebrations.push(celebration(
        3,
        november_at(30, 12) + time::Duration::days(1),
    ));
    data.availabilities.push(availability(3, 201, true));

    let outcome: ScheduleOutcome =
        compute_schedule(&november(), &data, &[], &GenerationOptions::default()).unwrap();

    assert!(outcome.assignments.iter().all(|a| a.celebration_id != 3));
    assert_eq!(outcome.assignments.len(), 6);
}

#[test]
fn test_outcome_is_independent_of_input_order() {
    let data: ReferenceData = november_example();
    let mut shuffled: ReferenceData = data.clone();
    shuffled.celebrations.reverse();
    shuffled.profiles.reverse();
    shuffled.roles.reverse();
    shuffled.bands.reverse();
    shuffled.band_memberships.reverse();
    shuffled.ministry_memberships.reverse();
    shuffled.availabilities.reverse();

    let a: ScheduleOutcome =
        compute_schedule(&november(), &data, &[], &GenerationOptions::default()).unwrap();
    let b: ScheduleOutcome =
        compute_schedule(&november(), &shuffled, &[], &GenerationOptions::default()).unwrap();

    assert_eq!(a, b);
}

#[test]
fn test_special_event_band_serves_special_celebration() {
    let mut data: ReferenceData = november_example();
    data.bands.push(band(3, "Eleve"));
    data.profiles.push(profile(301, None));
    data.band_memberships
        .push(crate::tests::helpers::seat(5, 3, 301, "Vocal"));
    data.celebrations[1].notes = Some(String::from("Noite Elevé"));
    everyone_available(&mut data);

    let outcome: ScheduleOutcome =
        compute_schedule(&november(), &data, &[], &GenerationOptions::default()).unwrap();

    let second_sunday_band: Vec<i64> = outcome
        .assignments
        .iter()
        .filter(|a| a.celebration_id == 2 && a.ministry_id == BAND_MINISTRY_ID)
        .map(|a| a.member_id)
        .collect();
    assert_eq!(second_sunday_band, vec![301]);
    assert!(outcome.is_complete());
}
