// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Member lookup by name and upcoming assignments per member.

use diesel::prelude::*;
use diesel::SqliteConnection;
use escala_domain::{Profile, format_timestamp, parse_timestamp};
use time::OffsetDateTime;
use tracing::debug;

use crate::data_models::{ProfileRow, UpcomingAssignment};
use crate::diesel_schema::{assignments, celebrations, ministries, profiles, roles};
use crate::error::{PersistenceError, query_failed};

/// Escape character for `LIKE` patterns.
const LIKE_ESCAPE: char = '\\';

/// Builds a `%term%` pattern that matches `term` literally.
fn contains_pattern(term: &str) -> String {
    let mut pattern: String = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | LIKE_ESCAPE) {
            pattern.push(LIKE_ESCAPE);
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

/// Finds profiles whose name contains `term`.
///
/// `SQLite`'s `LIKE` folds ASCII case only.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn search_profiles_by_name(
    conn: &mut SqliteConnection,
    term: &str,
    limit: i64,
) -> Result<Vec<Profile>, PersistenceError> {
    let rows: Vec<ProfileRow> = profiles::table
        .filter(profiles::name.like(contains_pattern(term)).escape(LIKE_ESCAPE))
        .order((profiles::name.asc(), profiles::profile_id.asc()))
        .limit(limit)
        .select(ProfileRow::as_select())
        .load(conn)
        .map_err(query_failed("search_profiles_by_name"))?;

    debug!(term, matches = rows.len(), "Searched profiles by name");

    Ok(rows.into_iter().map(Profile::from).collect())
}

/// Row shape of the upcoming assignments query.
type UpcomingTuple = (
    i64,
    i64,
    i64,
    String,
    Option<String>,
    Option<String>,
    String,
    String,
);

/// Lists assignments of the given members at celebrations that start
/// strictly after `after`, ordered by start time.
///
/// # Errors
///
/// Returns an error if the query fails or a stored timestamp is invalid.
pub fn list_upcoming_assignments(
    conn: &mut SqliteConnection,
    member_ids: &[i64],
    after: OffsetDateTime,
) -> Result<Vec<UpcomingAssignment>, PersistenceError> {
    if member_ids.is_empty() {
        return Ok(Vec::new());
    }
    let after: String = format_timestamp(after)
        .map_err(|e| PersistenceError::QueryFailed(format!("list_upcoming_assignments: {e}")))?;

    let rows: Vec<UpcomingTuple> = assignments::table
        .inner_join(celebrations::table)
        .inner_join(ministries::table)
        .inner_join(roles::table)
        .filter(assignments::member_id.eq_any(member_ids))
        .filter(celebrations::starts_at.gt(&after))
        .order((
            celebrations::starts_at.asc(),
            celebrations::celebration_id.asc(),
            assignments::assignment_id.asc(),
        ))
        .select((
            assignments::member_id,
            assignments::assignment_id,
            celebrations::celebration_id,
            celebrations::starts_at,
            celebrations::location,
            celebrations::notes,
            ministries::name,
            roles::name,
        ))
        .load::<UpcomingTuple>(conn)
        .map_err(query_failed("list_upcoming_assignments"))?;

    rows.into_iter()
        .map(
            |(
                member_id,
                assignment_id,
                celebration_id,
                starts_at,
                location,
                notes,
                ministry_name,
                role_name,
            )| {
                let starts_at = parse_timestamp(&starts_at).map_err(|e| {
                    PersistenceError::InvalidStoredValue(format!("celebrations.starts_at: {e}"))
                })?;
                Ok(UpcomingAssignment {
                    member_id,
                    assignment_id,
                    celebration_id,
                    starts_at,
                    location,
                    notes,
                    ministry_name,
                    role_name,
                })
            },
        )
        .collect()
}
