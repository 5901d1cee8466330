// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Role assignment.
//!
//! Celebrations are processed one at a time. Band roles are filled first
//! from the rotated band, then each derived ministry's roles are filled from
//! its available members, preferring relatives of the band members already
//! serving and, among those, whoever has served least so far in the run.

use crate::availability::{AvailabilityIndex, AvailabilityStatus};
use crate::warnings::{GenerationWarning, WarningCollector, WarningReason};
use escala_domain::{
    Assignment, AssignmentKey, Band, BandMembership, Celebration, Ministry, MinistryMembership,
    Profile, Role,
};
use std::collections::{HashMap, HashSet};

/// Mutable state of one generation run.
///
/// Counts and locked keys are seeded from the prior assignments of the run
/// being regenerated; both are empty for a first generation.
#[derive(Debug, Clone, Default)]
pub struct GenerationContext {
    counts: HashMap<i64, u32>,
    locked: HashSet<AssignmentKey>,
    preserve_locked: bool,
    assignments: Vec<Assignment>,
    warnings: WarningCollector,
}

impl GenerationContext {
    /// Creates a context seeded from prior assignments.
    #[must_use]
    pub fn seeded(prior: &[Assignment], preserve_locked: bool) -> Self {
        let mut counts: HashMap<i64, u32> = HashMap::new();
        for assignment in prior {
            *counts.entry(assignment.member_id).or_insert(0) += 1;
        }
        let locked: HashSet<AssignmentKey> = prior
            .iter()
            .filter(|a| a.locked)
            .map(Assignment::key)
            .collect();

        Self {
            counts,
            locked,
            preserve_locked,
            assignments: Vec::new(),
            warnings: WarningCollector::new(),
        }
    }

    /// Returns how many assignments a member holds so far in this run.
    #[must_use]
    pub fn count_for(&self, member_id: i64) -> u32 {
        self.counts.get(&member_id).copied().unwrap_or(0)
    }

    fn is_preserved(&self, key: AssignmentKey) -> bool {
        self.preserve_locked && self.locked.contains(&key)
    }

    fn record(&mut self, assignment: Assignment) {
        *self.counts.entry(assignment.member_id).or_insert(0) += 1;
        self.assignments.push(assignment);
    }

    fn warn(&mut self, warning: GenerationWarning) {
        self.warnings.push(warning);
    }

    /// Returns the number of warnings collected so far.
    #[must_use]
    pub const fn warning_count(&self) -> usize {
        self.warnings.len()
    }

    /// Consumes the context, yielding new assignments and warnings.
    #[must_use]
    pub fn into_parts(self) -> (Vec<Assignment>, Vec<GenerationWarning>) {
        (self.assignments, self.warnings.into_warnings())
    }
}

/// Lookup tables over the reference data, built once per run.
#[derive(Debug, Clone, Default)]
pub struct RosterIndex<'a> {
    profiles: HashMap<i64, &'a Profile>,
    roles_by_ministry: HashMap<i64, Vec<&'a Role>>,
    band_members: HashMap<i64, Vec<&'a BandMembership>>,
    ministry_members: HashMap<i64, Vec<i64>>,
}

impl<'a> RosterIndex<'a> {
    /// Builds the lookup tables.
    ///
    /// Roles are kept in ascending id order, band seats in ascending seat id
    /// order and ministry members in ascending member id order.
    #[must_use]
    pub fn build(
        profiles: &'a [Profile],
        roles: &'a [Role],
        band_memberships: &'a [BandMembership],
        ministry_memberships: &'a [MinistryMembership],
    ) -> Self {
        let profiles: HashMap<i64, &Profile> =
            profiles.iter().map(|p| (p.profile_id, p)).collect();

        let mut roles_by_ministry: HashMap<i64, Vec<&Role>> = HashMap::new();
        for role in roles {
            roles_by_ministry
                .entry(role.ministry_id)
                .or_default()
                .push(role);
        }
        for list in roles_by_ministry.values_mut() {
            list.sort_by_key(|r| r.role_id);
        }

        let mut band_members: HashMap<i64, Vec<&BandMembership>> = HashMap::new();
        for seat in band_memberships {
            band_members.entry(seat.band_id).or_default().push(seat);
        }
        for list in band_members.values_mut() {
            list.sort_by_key(|s| s.band_member_id);
        }

        let mut ministry_members: HashMap<i64, Vec<i64>> = HashMap::new();
        for membership in ministry_memberships {
            ministry_members
                .entry(membership.ministry_id)
                .or_default()
                .push(membership.member_id);
        }
        for list in ministry_members.values_mut() {
            list.sort_unstable();
            list.dedup();
        }

        Self {
            profiles,
            roles_by_ministry,
            band_members,
            ministry_members,
        }
    }

    fn profile(&self, member_id: i64) -> Option<&'a Profile> {
        self.profiles.get(&member_id).copied()
    }

    fn roles_of(&self, ministry_id: i64) -> &[&'a Role] {
        self.roles_by_ministry
            .get(&ministry_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    fn seats_of(&self, band_id: i64) -> &[&'a BandMembership] {
        self.band_members
            .get(&band_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    fn members_of(&self, ministry_id: i64) -> &[i64] {
        self.ministry_members
            .get(&ministry_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    fn role_named(&self, ministry_id: i64, name: &str) -> Option<&'a Role> {
        self.roles_of(ministry_id)
            .iter()
            .find(|role| role.name == name)
            .copied()
    }
}

fn warning(
    celebration: &Celebration,
    ministry: &Ministry,
    role_id: Option<i64>,
    role_name: Option<&str>,
    reason: WarningReason,
) -> GenerationWarning {
    GenerationWarning {
        celebration_id: celebration.celebration_id,
        celebration_starts_at: celebration.starts_at,
        ministry_id: Some(ministry.ministry_id),
        ministry_name: Some(ministry.name.clone()),
        role_id,
        role_name: role_name.map(str::to_string),
        reason,
    }
}

/// Fills the band ministry's roles for one celebration from its band.
///
/// Family ids of members who receive an assignment are added to
/// `band_families`.
pub fn fill_band_roles(
    context: &mut GenerationContext,
    index: &RosterIndex<'_>,
    availability: &AvailabilityIndex,
    celebration: &Celebration,
    band: Option<&Band>,
    band_ministry: &Ministry,
    band_families: &mut HashSet<String>,
) {
    let Some(band) = band else {
        context.warn(warning(
            celebration,
            band_ministry,
            None,
            None,
            WarningReason::BandMissing,
        ));
        return;
    };

    let seats: &[&BandMembership] = index.seats_of(band.band_id);
    if seats.is_empty() {
        context.warn(warning(
            celebration,
            band_ministry,
            None,
            None,
            WarningReason::BandEmpty,
        ));
        return;
    }

    for seat in seats {
        let Some(profile) = index.profile(seat.member_id) else {
            continue;
        };

        let role: Option<&Role> = index.role_named(band_ministry.ministry_id, &seat.role_in_band);

        let unavailable: Option<WarningReason> =
            match availability.status(celebration.celebration_id, seat.member_id) {
                AvailabilityStatus::Available => None,
                AvailabilityStatus::Declined => Some(WarningReason::UnavailableDeclared),
                AvailabilityStatus::Unknown => Some(WarningReason::UnavailableUnconfirmed),
            };
        if let Some(reason) = unavailable {
            context.warn(warning(
                celebration,
                band_ministry,
                role.map(|r| r.role_id),
                Some(seat.role_in_band.as_str()),
                reason,
            ));
            continue;
        }

        let Some(role) = role else {
            context.warn(warning(
                celebration,
                band_ministry,
                None,
                Some(seat.role_in_band.as_str()),
                WarningReason::RoleMissing,
            ));
            continue;
        };

        let key: AssignmentKey = AssignmentKey {
            celebration_id: celebration.celebration_id,
            role_id: role.role_id,
        };
        if context.is_preserved(key) {
            continue;
        }

        context.record(Assignment {
            celebration_id: celebration.celebration_id,
            ministry_id: band_ministry.ministry_id,
            role_id: role.role_id,
            member_id: seat.member_id,
            locked: false,
        });
        if let Some(family_id) = &profile.family_id {
            band_families.insert(family_id.clone());
        }
    }
}

/// Fills one derived ministry's roles for one celebration.
pub fn fill_derived_roles(
    context: &mut GenerationContext,
    index: &RosterIndex<'_>,
    availability: &AvailabilityIndex,
    celebration: &Celebration,
    ministry: &Ministry,
    band_families: &HashSet<String>,
) {
    let celebration_id: i64 = celebration.celebration_id;

    for role in index.roles_of(ministry.ministry_id) {
        let key: AssignmentKey = AssignmentKey {
            celebration_id,
            role_id: role.role_id,
        };
        if context.is_preserved(key) {
            continue;
        }

        let eligible: Vec<&Profile> = index
            .members_of(ministry.ministry_id)
            .iter()
            .filter(|member_id| availability.is_available(celebration_id, **member_id))
            .filter_map(|member_id| index.profile(*member_id))
            .collect();

        let relatives: Vec<&Profile> = eligible
            .iter()
            .filter(|p| {
                p.family_id
                    .as_ref()
                    .is_some_and(|family| band_families.contains(family))
            })
            .copied()
            .collect();

        let pool: &[&Profile] = if relatives.is_empty() {
            &eligible
        } else {
            &relatives
        };

        let Some(selected) = least_loaded(context, pool) else {
            context.warn(warning(
                celebration,
                ministry,
                Some(role.role_id),
                Some(role.name.as_str()),
                WarningReason::NoCandidate,
            ));
            continue;
        };

        context.record(Assignment {
            celebration_id,
            ministry_id: ministry.ministry_id,
            role_id: role.role_id,
            member_id: selected,
            locked: false,
        });
    }
}

/// Picks the member with the strictly lowest count; the first one wins ties.
fn least_loaded(context: &GenerationContext, pool: &[&Profile]) -> Option<i64> {
    let mut best: Option<(i64, u32)> = None;
    for profile in pool {
        let count: u32 = context.count_for(profile.profile_id);
        match best {
            Some((_, best_count)) if count >= best_count => {}
            _ => best = Some((profile.profile_id, count)),
        }
    }
    best.map(|(member_id, _)| member_id)
}
