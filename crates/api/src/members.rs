// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Member search with each match's upcoming assignments.

use std::collections::BTreeMap;

use escala_domain::Profile;
use escala_persistence::{Persistence, UpcomingAssignment};
use time::OffsetDateTime;
use tracing::debug;

use crate::error::{ApiError, translate_persistence_error};
use crate::request_response::{MemberAssignments, MemberSearchResponse};

/// Most profiles a search returns.
pub const MEMBER_SEARCH_LIMIT: i64 = 20;

/// Searches members by name and lists what each is scheduled for after
/// `now`.
///
/// A missing or blank term yields no results without touching storage.
///
/// # Errors
///
/// Returns an error if either query fails.
pub fn search_member_assignments(
    persistence: &mut Persistence,
    term: Option<&str>,
    now: OffsetDateTime,
) -> Result<MemberSearchResponse, ApiError> {
    let Some(term) = term.map(str::trim).filter(|t| !t.is_empty()) else {
        return Ok(MemberSearchResponse::default());
    };

    let profiles: Vec<Profile> = persistence
        .search_profiles_by_name(term, MEMBER_SEARCH_LIMIT)
        .map_err(|e| translate_persistence_error(e, "Profile"))?;
    let member_ids: Vec<i64> = profiles.iter().map(|p| p.profile_id).collect();

    let mut by_member: BTreeMap<i64, Vec<UpcomingAssignment>> = BTreeMap::new();
    for upcoming in persistence
        .list_upcoming_assignments(&member_ids, now)
        .map_err(|e| translate_persistence_error(e, "Assignment"))?
    {
        by_member.entry(upcoming.member_id).or_default().push(upcoming);
    }

    debug!(
        term,
        matches = profiles.len(),
        assigned = by_member.len(),
        "Member search"
    );

    let results: Vec<MemberAssignments> = profiles
        .into_iter()
        .map(|profile| MemberAssignments {
            assignments: by_member.remove(&profile.profile_id).unwrap_or_default(),
            member_id: profile.profile_id,
            name: profile.name,
        })
        .collect();

    Ok(MemberSearchResponse { results })
}
