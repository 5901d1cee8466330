// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Reference entity inserts.
//!
//! These back seeding and tests; the HTTP surface only records
//! availability.

use diesel::prelude::*;
use diesel::SqliteConnection;
use diesel::upsert::excluded;
use escala_domain::format_timestamp;
use time::OffsetDateTime;
use tracing::{debug, info};

use crate::backend::sqlite::get_last_insert_rowid;
use crate::diesel_schema::{
    availabilities, band_members, bands, celebrations, member_ministries, ministries, profiles,
    roles,
};
use crate::error::PersistenceError;

fn stored_timestamp(instant: OffsetDateTime) -> Result<String, PersistenceError> {
    format_timestamp(instant).map_err(|e| PersistenceError::InvalidStoredValue(e.to_string()))
}

/// Creates a volunteer profile.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn create_profile(
    conn: &mut SqliteConnection,
    name: &str,
    family_id: Option<&str>,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(profiles::table)
        .values((profiles::name.eq(name), profiles::family_id.eq(family_id)))
        .execute(conn)?;
    let profile_id: i64 = get_last_insert_rowid(conn)?;
    debug!(profile_id, name, "Created profile");
    Ok(profile_id)
}

/// Creates a ministry.
///
/// # Errors
///
/// Returns an error if the insert fails or the name is taken.
pub fn create_ministry(
    conn: &mut SqliteConnection,
    name: &str,
    active: bool,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(ministries::table)
        .values((
            ministries::name.eq(name),
            ministries::active.eq(i32::from(active)),
        ))
        .execute(conn)?;
    let ministry_id: i64 = get_last_insert_rowid(conn)?;
    debug!(ministry_id, name, "Created ministry");
    Ok(ministry_id)
}

/// Creates a role within a ministry.
///
/// # Errors
///
/// Returns an error if the ministry does not exist or the role name is
/// already used in it.
pub fn create_role(
    conn: &mut SqliteConnection,
    ministry_id: i64,
    name: &str,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(roles::table)
        .values((roles::ministry_id.eq(ministry_id), roles::name.eq(name)))
        .execute(conn)?;
    let role_id: i64 = get_last_insert_rowid(conn)?;
    debug!(role_id, ministry_id, name, "Created role");
    Ok(role_id)
}

/// Creates a band.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn create_band(
    conn: &mut SqliteConnection,
    name: &str,
    active: bool,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(bands::table)
        .values((bands::name.eq(name), bands::active.eq(i32::from(active))))
        .execute(conn)?;
    let band_id: i64 = get_last_insert_rowid(conn)?;
    debug!(band_id, name, "Created band");
    Ok(band_id)
}

/// Seats a member in a band.
///
/// # Errors
///
/// Returns an error if the band or member does not exist.
pub fn add_band_member(
    conn: &mut SqliteConnection,
    band_id: i64,
    member_id: i64,
    role_in_band: &str,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(band_members::table)
        .values((
            band_members::band_id.eq(band_id),
            band_members::member_id.eq(member_id),
            band_members::role_in_band.eq(role_in_band),
        ))
        .execute(conn)?;
    get_last_insert_rowid(conn)
}

/// Adds a member to a ministry.
///
/// # Errors
///
/// Returns an error if the ministry or member does not exist or the member
/// already belongs to the ministry.
pub fn add_ministry_member(
    conn: &mut SqliteConnection,
    member_id: i64,
    ministry_id: i64,
    is_leader: bool,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(member_ministries::table)
        .values((
            member_ministries::member_id.eq(member_id),
            member_ministries::ministry_id.eq(ministry_id),
            member_ministries::is_leader.eq(i32::from(is_leader)),
        ))
        .execute(conn)?;
    get_last_insert_rowid(conn)
}

/// Creates a celebration.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn create_celebration(
    conn: &mut SqliteConnection,
    starts_at: OffsetDateTime,
    location: Option<&str>,
    notes: Option<&str>,
) -> Result<i64, PersistenceError> {
    let starts_at_text: String = stored_timestamp(starts_at)?;
    diesel::insert_into(celebrations::table)
        .values((
            celebrations::starts_at.eq(&starts_at_text),
            celebrations::location.eq(location),
            celebrations::notes.eq(notes),
        ))
        .execute(conn)?;
    let celebration_id: i64 = get_last_insert_rowid(conn)?;
    debug!(celebration_id, starts_at = %starts_at_text, "Created celebration");
    Ok(celebration_id)
}

/// Records a member's availability for a celebration, replacing any earlier
/// answer.
///
/// # Errors
///
/// Returns an error if the member or celebration does not exist.
pub fn upsert_availability(
    conn: &mut SqliteConnection,
    member_id: i64,
    celebration_id: i64,
    available: bool,
    at: OffsetDateTime,
) -> Result<(), PersistenceError> {
    let updated_at: String = stored_timestamp(at)?;

    diesel::insert_into(availabilities::table)
        .values((
            availabilities::member_id.eq(member_id),
            availabilities::celebration_id.eq(celebration_id),
            availabilities::available.eq(i32::from(available)),
            availabilities::updated_at.eq(&updated_at),
        ))
        .on_conflict((availabilities::member_id, availabilities::celebration_id))
        .do_update()
        .set((
            availabilities::available.eq(excluded(availabilities::available)),
            availabilities::updated_at.eq(excluded(availabilities::updated_at)),
        ))
        .execute(conn)?;

    info!(member_id, celebration_id, available, "Recorded availability");
    Ok(())
}
