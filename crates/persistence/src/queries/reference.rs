// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Reference data queries.
//!
//! Celebrations are selected by the period's UTC bounds using text
//! comparison on the stored RFC 3339 timestamps.

use diesel::prelude::*;
use diesel::SqliteConnection;
use escala::ReferenceData;
use escala_domain::{
    Availability, Band, BandMembership, Celebration, DomainError, Ministry, MinistryMembership,
    Profile, Role, SchedulePeriod, format_timestamp,
};
use tracing::debug;

use crate::data_models::{
    AvailabilityRow, BandMemberRow, BandRow, CelebrationRow, MemberMinistryRow, MinistryRow,
    ProfileRow, RoleRow,
};
use crate::diesel_schema::{
    availabilities, band_members, bands, celebrations, member_ministries, ministries, profiles,
    roles,
};
use crate::error::{PersistenceError, query_failed};

/// Returns the stored text form of the period's `[start, end)` bounds.
fn period_bounds(period: &SchedulePeriod) -> Result<(String, String), DomainError> {
    Ok((
        format_timestamp(period.utc_start()?)?,
        format_timestamp(period.utc_end_exclusive()?)?,
    ))
}

/// Lists the celebrations that start within the period, in start order.
///
/// # Errors
///
/// Returns an error if the query fails or a stored timestamp is invalid.
pub fn list_celebrations_in_period(
    conn: &mut SqliteConnection,
    period: &SchedulePeriod,
) -> Result<Vec<Celebration>, PersistenceError> {
    let (start, end): (String, String) = period_bounds(period)
        .map_err(|e| PersistenceError::QueryFailed(format!("list_celebrations_in_period: {e}")))?;

    let rows: Vec<CelebrationRow> = celebrations::table
        .filter(celebrations::starts_at.ge(&start))
        .filter(celebrations::starts_at.lt(&end))
        .order((celebrations::starts_at.asc(), celebrations::celebration_id.asc()))
        .select(CelebrationRow::as_select())
        .load(conn)
        .map_err(query_failed("list_celebrations_in_period"))?;

    debug!(%period, count = rows.len(), "Loaded celebrations");

    rows.into_iter().map(Celebration::try_from).collect()
}

/// Lists every profile.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_profiles(conn: &mut SqliteConnection) -> Result<Vec<Profile>, PersistenceError> {
    let rows: Vec<ProfileRow> = profiles::table
        .order(profiles::profile_id.asc())
        .select(ProfileRow::as_select())
        .load(conn)
        .map_err(query_failed("list_profiles"))?;
    Ok(rows.into_iter().map(Profile::from).collect())
}

/// Lists every ministry, active or not.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_ministries(conn: &mut SqliteConnection) -> Result<Vec<Ministry>, PersistenceError> {
    let rows: Vec<MinistryRow> = ministries::table
        .order(ministries::ministry_id.asc())
        .select(MinistryRow::as_select())
        .load(conn)
        .map_err(query_failed("list_ministries"))?;
    Ok(rows.into_iter().map(Ministry::from).collect())
}

/// Lists every role.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_roles(conn: &mut SqliteConnection) -> Result<Vec<Role>, PersistenceError> {
    let rows: Vec<RoleRow> = roles::table
        .order(roles::role_id.asc())
        .select(RoleRow::as_select())
        .load(conn)
        .map_err(query_failed("list_roles"))?;
    Ok(rows.into_iter().map(Role::from).collect())
}

/// Lists the bands that take part in the rotation.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_active_bands(conn: &mut SqliteConnection) -> Result<Vec<Band>, PersistenceError> {
    let rows: Vec<BandRow> = bands::table
        .filter(bands::active.eq(1))
        .order(bands::band_id.asc())
        .select(BandRow::as_select())
        .load(conn)
        .map_err(query_failed("list_active_bands"))?;
    Ok(rows.into_iter().map(Band::from).collect())
}

/// Lists every band seat.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_band_memberships(
    conn: &mut SqliteConnection,
) -> Result<Vec<BandMembership>, PersistenceError> {
    let rows: Vec<BandMemberRow> = band_members::table
        .order(band_members::band_member_id.asc())
        .select(BandMemberRow::as_select())
        .load(conn)
        .map_err(query_failed("list_band_memberships"))?;
    Ok(rows.into_iter().map(BandMembership::from).collect())
}

/// Lists every ministry membership.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_ministry_memberships(
    conn: &mut SqliteConnection,
) -> Result<Vec<MinistryMembership>, PersistenceError> {
    let rows: Vec<MemberMinistryRow> = member_ministries::table
        .order((member_ministries::ministry_id.asc(), member_ministries::member_id.asc()))
        .select(MemberMinistryRow::as_select())
        .load(conn)
        .map_err(query_failed("list_ministry_memberships"))?;
    Ok(rows.into_iter().map(MinistryMembership::from).collect())
}

/// Lists the availability answers for the given celebrations.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_availabilities_for(
    conn: &mut SqliteConnection,
    celebration_ids: &[i64],
) -> Result<Vec<Availability>, PersistenceError> {
    let rows: Vec<AvailabilityRow> = availabilities::table
        .filter(availabilities::celebration_id.eq_any(celebration_ids))
        .order((
            availabilities::celebration_id.asc(),
            availabilities::member_id.asc(),
        ))
        .select(AvailabilityRow::as_select())
        .load(conn)
        .map_err(query_failed("list_availabilities_for"))?;
    Ok(rows.into_iter().map(Availability::from).collect())
}

/// Loads everything the generator reads for a period.
///
/// # Errors
///
/// Returns an error if any of the underlying queries fails.
pub fn load_reference_data(
    conn: &mut SqliteConnection,
    period: &SchedulePeriod,
) -> Result<ReferenceData, PersistenceError> {
    let celebrations: Vec<Celebration> = list_celebrations_in_period(conn, period)?;
    let celebration_ids: Vec<i64> = celebrations.iter().map(|c| c.celebration_id).collect();

    let data: ReferenceData = ReferenceData {
        availabilities: list_availabilities_for(conn, &celebration_ids)?,
        celebrations,
        profiles: list_profiles(conn)?,
        ministries: list_ministries(conn)?,
        roles: list_roles(conn)?,
        bands: list_active_bands(conn)?,
        band_memberships: list_band_memberships(conn)?,
        ministry_memberships: list_ministry_memberships(conn)?,
    };

    debug!(
        %period,
        celebrations = data.celebrations.len(),
        profiles = data.profiles.len(),
        bands = data.bands.len(),
        availabilities = data.availabilities.len(),
        "Loaded reference data"
    );

    Ok(data)
}
