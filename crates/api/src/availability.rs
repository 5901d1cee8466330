// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Availability capture and the monthly overview.

use escala::{AvailabilityIndex, AvailabilityStatus, ReferenceData};
use escala_domain::{Ministry, Profile, SchedulePeriod, normalize_name};
use escala_persistence::Persistence;
use std::collections::HashMap;
use time::OffsetDateTime;
use tracing::debug;

use crate::error::{ApiError, load_failed, translate_persistence_error};
use crate::request_response::{
    AvailabilityOverviewResponse, AvailabilityTotals, CelebrationAvailability, MemberEntry,
    MinistryAvailability, RecordAvailabilityRequest, RecordAvailabilityResponse,
};

/// Records a member's answer for a celebration, replacing any earlier one.
///
/// # Errors
///
/// Returns an error if the member or celebration does not exist or the write
/// fails.
pub fn record_availability(
    persistence: &mut Persistence,
    request: &RecordAvailabilityRequest,
    now: OffsetDateTime,
) -> Result<RecordAvailabilityResponse, ApiError> {
    persistence
        .upsert_availability(
            request.member_id,
            request.celebration_id,
            request.available,
            now,
        )
        .map_err(|e| translate_persistence_error(e, "Availability"))?;

    Ok(RecordAvailabilityResponse { success: true })
}

/// A ministry and its members, resolved once for the whole overview.
struct MinistryRoster<'a> {
    ministry: &'a Ministry,
    members: Vec<MemberEntry>,
}

fn ministry_rosters(data: &ReferenceData) -> Vec<MinistryRoster<'_>> {
    let profiles: HashMap<i64, &Profile> =
        data.profiles.iter().map(|p| (p.profile_id, p)).collect();

    let mut ministries: Vec<&Ministry> = data.ministries.iter().collect();
    ministries.sort_by(|a, b| {
        normalize_name(&a.name)
            .cmp(&normalize_name(&b.name))
            .then_with(|| a.name.cmp(&b.name))
            .then_with(|| a.ministry_id.cmp(&b.ministry_id))
    });

    ministries
        .into_iter()
        .map(|ministry| {
            let mut members: Vec<MemberEntry> = data
                .ministry_memberships
                .iter()
                .filter(|m| m.ministry_id == ministry.ministry_id)
                .filter_map(|m| {
                    profiles.get(&m.member_id).map(|profile| MemberEntry {
                        member_id: profile.profile_id,
                        name: profile.name.clone(),
                        is_leader: m.is_leader,
                    })
                })
                .collect();
            members.sort_by_key(|m| m.member_id);
            MinistryRoster { ministry, members }
        })
        .filter(|r| !r.members.is_empty())
        .collect()
}

/// Summarizes who confirmed, declined or has not answered, per celebration
/// of the month and per ministry with members.
///
/// # Errors
///
/// Returns an error if the month's data cannot be loaded.
pub fn get_availability_overview(
    persistence: &mut Persistence,
    period: &SchedulePeriod,
) -> Result<AvailabilityOverviewResponse, ApiError> {
    let data: ReferenceData = persistence
        .load_reference_data(period)
        .map_err(|e| load_failed(&e))?;

    let index: AvailabilityIndex = AvailabilityIndex::build(&data.availabilities, &data.celebrations);
    let rosters: Vec<MinistryRoster<'_>> = ministry_rosters(&data);

    let celebrations: Vec<CelebrationAvailability> = data
        .celebrations
        .iter()
        .map(|celebration| {
            let ministries: Vec<MinistryAvailability> = rosters
                .iter()
                .map(|roster| {
                    let mut confirmed: Vec<MemberEntry> = Vec::new();
                    let mut declined: Vec<MemberEntry> = Vec::new();
                    let mut pending: Vec<MemberEntry> = Vec::new();

                    for member in &roster.members {
                        match index.status(celebration.celebration_id, member.member_id) {
                            AvailabilityStatus::Available => confirmed.push(member.clone()),
                            AvailabilityStatus::Declined => declined.push(member.clone()),
                            AvailabilityStatus::Unknown => pending.push(member.clone()),
                        }
                    }

                    MinistryAvailability {
                        ministry_id: roster.ministry.ministry_id,
                        ministry_name: roster.ministry.name.clone(),
                        totals: AvailabilityTotals {
                            total_members: roster.members.len(),
                            confirmed: confirmed.len(),
                            declined: declined.len(),
                            pending: pending.len(),
                        },
                        confirmed,
                        declined,
                        pending,
                    }
                })
                .collect();

            CelebrationAvailability {
                id: celebration.celebration_id,
                starts_at: celebration.starts_at,
                location: celebration.location.clone(),
                notes: celebration.notes.clone(),
                ministries,
            }
        })
        .collect();

    debug!(
        %period,
        celebrations = celebrations.len(),
        ministries = rosters.len(),
        "Built availability overview"
    );

    Ok(AvailabilityOverviewResponse {
        month: period.to_string(),
        celebrations,
    })
}
