// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]

mod initialization_tests;

use crate::Persistence;
use escala_domain::{Assignment, SchedulePeriod};
use time::{Date, Month, OffsetDateTime, Time};

pub fn november() -> SchedulePeriod {
    SchedulePeriod::new(11, 2025).unwrap()
}

pub fn at(year: i32, month: Month, day: u8, hour: u8) -> OffsetDateTime {
    Date::from_calendar_date(year, month, day)
        .unwrap()
        .with_time(Time::from_hms(hour, 0, 0).unwrap())
        .assume_utc()
}

/// Ids of the rows created by [`seed_roster`].
pub struct Seeded {
    pub band_ministry_id: i64,
    pub audio_ministry_id: i64,
    pub vocal_role_id: i64,
    pub audio_role_id: i64,
    pub singer_id: i64,
    pub operator_id: i64,
    pub first_sunday_id: i64,
    pub second_sunday_id: i64,
}

/// A band ministry with one vocal seat, an audio ministry with one operator,
/// and two November 2025 celebrations with everyone available.
pub fn seed_roster(persistence: &mut Persistence) -> Seeded {
    let band_ministry_id: i64 = persistence.create_ministry("Bandas", true).unwrap();
    let audio_ministry_id: i64 = persistence.create_ministry("Áudio", true).unwrap();
    let vocal_role_id: i64 = persistence.create_role(band_ministry_id, "Vocal").unwrap();
    let audio_role_id: i64 = persistence
        .create_role(audio_ministry_id, "Operador")
        .unwrap();

    let singer_id: i64 = persistence.create_profile("Ana", Some("silva")).unwrap();
    let operator_id: i64 = persistence.create_profile("Bruno", None).unwrap();

    let band_id: i64 = persistence.create_band("Banda A", true).unwrap();
    persistence
        .add_band_member(band_id, singer_id, "Vocal")
        .unwrap();
    persistence
        .add_ministry_member(operator_id, audio_ministry_id, false)
        .unwrap();

    let first_sunday_id: i64 = persistence
        .create_celebration(at(2025, Month::November, 2, 19), Some("Templo"), None)
        .unwrap();
    let second_sunday_id: i64 = persistence
        .create_celebration(at(2025, Month::November, 9, 19), Some("Templo"), None)
        .unwrap();

    let answered_at: OffsetDateTime = at(2025, Month::October, 20, 12);
    for celebration_id in [first_sunday_id, second_sunday_id] {
        for member_id in [singer_id, operator_id] {
            persistence
                .upsert_availability(member_id, celebration_id, true, answered_at)
                .unwrap();
        }
    }

    Seeded {
        band_ministry_id,
        audio_ministry_id,
        vocal_role_id,
        audio_role_id,
        singer_id,
        operator_id,
        first_sunday_id,
        second_sunday_id,
    }
}

/// The four assignments a full generation produces for [`seed_roster`].
pub fn seeded_assignments(seeded: &Seeded) -> Vec<Assignment> {
    [seeded.first_sunday_id, seeded.second_sunday_id]
        .into_iter()
        .flat_map(|celebration_id| {
            [
                Assignment {
                    celebration_id,
                    ministry_id: seeded.band_ministry_id,
                    role_id: seeded.vocal_role_id,
                    member_id: seeded.singer_id,
                    locked: false,
                },
                Assignment {
                    celebration_id,
                    ministry_id: seeded.audio_ministry_id,
                    role_id: seeded.audio_role_id,
                    member_id: seeded.operator_id,
                    locked: false,
                },
            ]
        })
        .collect()
}
