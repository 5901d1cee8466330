// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Test helper functions and fixtures.

use escala_domain::SchedulePeriod;
use escala_persistence::Persistence;
use time::{Date, Month, OffsetDateTime, Time};

use crate::{GenerateScheduleRequest, GenerateScheduleResponse, generate_schedule};

pub fn november() -> SchedulePeriod {
    SchedulePeriod::new(11, 2025).unwrap()
}

pub fn at(month: Month, day: u8, hour: u8) -> OffsetDateTime {
    Date::from_calendar_date(2025, month, day)
        .unwrap()
        .with_time(Time::from_hms(hour, 0, 0).unwrap())
        .assume_utc()
}

pub fn now() -> OffsetDateTime {
    at(Month::October, 28, 10)
}

pub fn request() -> GenerateScheduleRequest {
    GenerateScheduleRequest {
        created_by: Some(String::from("coordenador")),
        ..GenerateScheduleRequest::default()
    }
}

/// Ids of the November 2025 example rows.
pub struct Example {
    pub band_ministry_id: i64,
    pub audio_ministry_id: i64,
    pub vocal_role_id: i64,
    pub bass_role_id: i64,
    pub audio_role_id: i64,
    /// Singer and bassist of Banda A.
    pub band_a: [i64; 2],
    /// Singer and bassist of Banda B.
    pub band_b: [i64; 2],
    pub operators: [i64; 2],
    pub first_sunday_id: i64,
    pub second_sunday_id: i64,
}

/// Two Sundays in November 2025, two bands with a singer and a bassist
/// each, and an audio ministry with one role and two members. Everyone is
/// available.
pub fn seed_november_example(persistence: &mut Persistence) -> Example {
    let band_ministry_id: i64 = persistence.create_ministry("Bandas", true).unwrap();
    let audio_ministry_id: i64 = persistence.create_ministry("Áudio", true).unwrap();
    let vocal_role_id: i64 = persistence.create_role(band_ministry_id, "Vocal").unwrap();
    let bass_role_id: i64 = persistence.create_role(band_ministry_id, "Baixo").unwrap();
    let audio_role_id: i64 = persistence
        .create_role(audio_ministry_id, "Operador")
        .unwrap();

    let mut profile = |name: &str| persistence.create_profile(name, None).unwrap();
    let band_a: [i64; 2] = [profile("Ana"), profile("Bruno")];
    let band_b: [i64; 2] = [profile("Carla"), profile("Davi")];
    let operators: [i64; 2] = [profile("Eva"), profile("Fabio")];

    let banda_a: i64 = persistence.create_band("Banda A", true).unwrap();
    let banda_b: i64 = persistence.create_band("Banda B", true).unwrap();
    for (band_id, members) in [(banda_a, band_a), (banda_b, band_b)] {
        persistence
            .add_band_member(band_id, members[0], "Vocal")
            .unwrap();
        persistence
            .add_band_member(band_id, members[1], "Baixo")
            .unwrap();
    }
    for operator in operators {
        persistence
            .add_ministry_member(operator, audio_ministry_id, false)
            .unwrap();
    }

    let first_sunday_id: i64 = persistence
        .create_celebration(at(Month::November, 2, 19), Some("Templo"), None)
        .unwrap();
    let second_sunday_id: i64 = persistence
        .create_celebration(at(Month::November, 9, 19), Some("Templo"), None)
        .unwrap();

    let everyone: Vec<i64> = band_a
        .iter()
        .chain(band_b.iter())
        .chain(operators.iter())
        .copied()
        .collect();
    for celebration_id in [first_sunday_id, second_sunday_id] {
        for member_id in &everyone {
            persistence
                .upsert_availability(*member_id, celebration_id, true, now())
                .unwrap();
        }
    }

    Example {
        band_ministry_id,
        audio_ministry_id,
        vocal_role_id,
        bass_role_id,
        audio_role_id,
        band_a,
        band_b,
        operators,
        first_sunday_id,
        second_sunday_id,
    }
}

/// Seeds the example and generates its roster.
pub fn generated_example() -> (Persistence, Example, GenerateScheduleResponse) {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    let example: Example = seed_november_example(&mut persistence);
    let response: GenerateScheduleResponse =
        generate_schedule(&mut persistence, &november(), &request(), now()).unwrap();
    (persistence, example, response)
}
