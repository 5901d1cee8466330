// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::assignment::{GenerationContext, RosterIndex, fill_band_roles, fill_derived_roles};
use crate::availability::AvailabilityIndex;
use crate::error::CoreError;
use crate::rotation::{BandPlan, plan_band_rotation};
use crate::warnings::GenerationWarning;
use escala_domain::{
    Assignment, Availability, Band, BandMembership, Celebration, DERIVED_MINISTRY_NAMES, Ministry,
    MinistryMembership, Profile, Role, SchedulePeriod, is_band_ministry_name, names_match,
};
use std::collections::HashSet;

/// Everything the generator reads, loaded once per run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReferenceData {
    pub celebrations: Vec<Celebration>,
    pub profiles: Vec<Profile>,
    pub ministries: Vec<Ministry>,
    pub roles: Vec<Role>,
    pub bands: Vec<Band>,
    pub band_memberships: Vec<BandMembership>,
    pub ministry_memberships: Vec<MinistryMembership>,
    pub availabilities: Vec<Availability>,
}

impl ReferenceData {
    /// Returns the band ministry, if configured.
    ///
    /// With several matches the lowest id wins.
    #[must_use]
    pub fn band_ministry(&self) -> Option<&Ministry> {
        self.ministries
            .iter()
            .filter(|m| m.is_band_ministry())
            .min_by_key(|m| m.ministry_id)
    }

    /// Returns the configured derived ministries in processing order.
    #[must_use]
    pub fn derived_ministries(&self) -> Vec<&Ministry> {
        DERIVED_MINISTRY_NAMES
            .iter()
            .filter_map(|name| {
                self.ministries
                    .iter()
                    .filter(|m| names_match(&m.name, name))
                    .min_by_key(|m| m.ministry_id)
            })
            .collect()
    }

    /// Resolves a ministry by normalized name.
    #[must_use]
    pub fn ministry_named(&self, name: &str) -> Option<&Ministry> {
        self.ministries
            .iter()
            .filter(|m| names_match(&m.name, name))
            .min_by_key(|m| m.ministry_id)
    }
}

/// Caller choices for one generation run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationOptions {
    /// Restricts the run to one ministry, matched by normalized name.
    ///
    /// Naming the band ministry also recomputes every derived ministry.
    pub ministry: Option<String>,
    /// Leaves locked slots of the prior run untouched.
    pub preserve_locked: bool,
}

impl GenerationOptions {
    fn includes_band_pass(&self) -> bool {
        self.ministry
            .as_deref()
            .is_none_or(is_band_ministry_name)
    }

    fn includes_derived(&self, ministry: &Ministry) -> bool {
        self.ministry
            .as_deref()
            .is_none_or(|filter| names_match(filter, &ministry.name) || is_band_ministry_name(filter))
    }
}

/// The computed roster, before persistence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScheduleOutcome {
    /// Newly computed assignments, all unlocked.
    pub assignments: Vec<Assignment>,
    /// Unfillable slots in emission order.
    pub warnings: Vec<GenerationWarning>,
    /// Ministries whose roles were recomputed, in processing order.
    pub recomputed_ministry_ids: Vec<i64>,
}

impl ScheduleOutcome {
    /// Returns whether every slot was filled.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.warnings.is_empty()
    }
}

/// Computes the roster for a period.
///
/// Celebrations outside the period are ignored; the rest are processed in
/// ascending start time, ties by id. `prior` holds the assignments already
/// stored for the run being regenerated and seeds the per-member counts and
/// the locked slots.
///
/// The result is fully determined by the inputs: input order does not
/// matter.
///
/// # Errors
///
/// Returns an error if the period's calendar cannot be computed.
pub fn compute_schedule(
    period: &SchedulePeriod,
    data: &ReferenceData,
    prior: &[Assignment],
    options: &GenerationOptions,
) -> Result<ScheduleOutcome, CoreError> {
    let mut celebrations: Vec<Celebration> = data
        .celebrations
        .iter()
        .filter(|c| period.contains(c.starts_at))
        .cloned()
        .collect();
    celebrations.sort_by(|a, b| {
        a.starts_at
            .cmp(&b.starts_at)
            .then_with(|| a.celebration_id.cmp(&b.celebration_id))
    });

    let availability: AvailabilityIndex =
        AvailabilityIndex::build(&data.availabilities, &celebrations);
    let plan: BandPlan = plan_band_rotation(period, &data.bands, &celebrations)?;
    let index: RosterIndex<'_> = RosterIndex::build(
        &data.profiles,
        &data.roles,
        &data.band_memberships,
        &data.ministry_memberships,
    );

    let band_ministry: Option<&Ministry> = data
        .band_ministry()
        .filter(|_| options.includes_band_pass());
    let derived: Vec<&Ministry> = data
        .derived_ministries()
        .into_iter()
        .filter(|m| options.includes_derived(m))
        .collect();

    let mut context: GenerationContext = GenerationContext::seeded(prior, options.preserve_locked);

    for celebration in &celebrations {
        let mut band_families: HashSet<String> = HashSet::new();

        if let Some(band_ministry) = band_ministry {
            fill_band_roles(
                &mut context,
                &index,
                &availability,
                celebration,
                plan.band_for(celebration.celebration_id),
                band_ministry,
                &mut band_families,
            );
        }

        for ministry in &derived {
            fill_derived_roles(
                &mut context,
                &index,
                &availability,
                celebration,
                ministry,
                &band_families,
            );
        }
    }

    let mut recomputed_ministry_ids: Vec<i64> = Vec::new();
    if let Some(band_ministry) = band_ministry {
        recomputed_ministry_ids.push(band_ministry.ministry_id);
    }
    for ministry in &derived {
        if !recomputed_ministry_ids.contains(&ministry.ministry_id) {
            recomputed_ministry_ids.push(ministry.ministry_id);
        }
    }

    let (assignments, warnings) = context.into_parts();
    Ok(ScheduleOutcome {
        assignments,
        warnings,
        recomputed_ministry_ids,
    })
}
