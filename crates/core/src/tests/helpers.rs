// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::ReferenceData;
use escala_domain::{
    Availability, Band, BandMembership, Celebration, Ministry, MinistryMembership, Profile, Role,
    SchedulePeriod,
};
use time::{Date, Month, OffsetDateTime, Time};

pub const BAND_MINISTRY_ID: i64 = 1;
pub const AUDIO_MINISTRY_ID: i64 = 2;
pub const VOCAL_ROLE_ID: i64 = 10;
pub const BASS_ROLE_ID: i64 = 11;
pub const AUDIO_ROLE_ID: i64 = 20;

pub fn november() -> SchedulePeriod {
    SchedulePeriod::new(11, 2025).unwrap()
}

pub fn november_at(day: u8, hour: u8) -> OffsetDateTime {
    Date::from_calendar_date(2025, Month::November, day)
        .unwrap()
        .with_time(Time::from_hms(hour, 0, 0).unwrap())
        .assume_utc()
}

pub fn celebration(celebration_id: i64, starts_at: OffsetDateTime) -> Celebration {
    Celebration {
        celebration_id,
        starts_at,
        location: Some(String::from("Templo")),
        notes: None,
    }
}

pub fn profile(profile_id: i64, family_id: Option<&str>) -> Profile {
    Profile {
        profile_id,
        name: format!("Membro {profile_id}"),
        family_id: family_id.map(str::to_string),
    }
}

pub fn ministry(ministry_id: i64, name: &str) -> Ministry {
    Ministry {
        ministry_id,
        name: String::from(name),
        active: true,
    }
}

pub fn role(role_id: i64, ministry_id: i64, name: &str) -> Role {
    Role {
        role_id,
        ministry_id,
        name: String::from(name),
    }
}

pub fn band(band_id: i64, name: &str) -> Band {
    Band {
        band_id,
        name: String::from(name),
        active: true,
    }
}

pub fn seat(band_member_id: i64, band_id: i64, member_id: i64, role_in_band: &str) -> BandMembership {
    BandMembership {
        band_member_id,
        band_id,
        member_id,
        role_in_band: String::from(role_in_band),
    }
}

pub fn member_of(member_id: i64, ministry_id: i64) -> MinistryMembership {
    MinistryMembership {
        member_id,
        ministry_id,
        is_leader: false,
    }
}

pub fn availability(celebration_id: i64, member_id: i64, available: bool) -> Availability {
    Availability {
        celebration_id,
        member_id,
        available,
    }
}

/// Marks every member available for every celebration.
pub fn everyone_available(data: &mut ReferenceData) {
    data.availabilities = data
        .celebrations
        .iter()
        .flat_map(|c| {
            data.profiles
                .iter()
                .map(move |p| availability(c.celebration_id, p.profile_id, true))
        })
        .collect();
}

/// Two Sundays in November 2025, two bands with a singer and a bassist
/// each, and an audio ministry with one role and two members.
pub fn november_example() -> ReferenceData {
    let mut data: ReferenceData = ReferenceData {
        celebrations: vec![
            celebration(1, november_at(2, 19)),
            celebration(2, november_at(9, 19)),
        ],
        profiles: vec![
            profile(101, None),
            profile(102, None),
            profile(103, None),
            profile(104, None),
            profile(201, None),
            profile(202, None),
        ],
        ministries: vec![
            ministry(BAND_MINISTRY_ID, "Bandas"),
            ministry(AUDIO_MINISTRY_ID, "Áudio"),
        ],
        roles: vec![
            role(VOCAL_ROLE_ID, BAND_MINISTRY_ID, "Vocal"),
            role(BASS_ROLE_ID, BAND_MINISTRY_ID, "Baixo"),
            role(AUDIO_ROLE_ID, AUDIO_MINISTRY_ID, "Operador"),
        ],
        bands: vec![band(1, "Banda A"), band(2, "Banda B")],
        band_memberships: vec![
            seat(1, 1, 101, "Vocal"),
            seat(2, 1, 102, "Baixo"),
            seat(3, 2, 103, "Vocal"),
            seat(4, 2, 104, "Baixo"),
        ],
        ministry_memberships: vec![
            member_of(201, AUDIO_MINISTRY_ID),
            member_of(202, AUDIO_MINISTRY_ID),
        ],
        availabilities: Vec::new(),
    };
    everyone_available(&mut data);
    data
}
