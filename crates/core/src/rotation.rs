// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Band rotation.
//!
//! Each celebration of the month gets at most one band. Special events go to
//! the special band; everything else rotates through the remaining active
//! bands by Sunday-aligned week of the month.

use crate::error::CoreError;
use escala_domain::{Band, Celebration, SchedulePeriod, normalize_name};
use std::collections::HashMap;
use time::{Date, UtcOffset};

/// The celebration to band mapping for one generation run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BandPlan {
    selected: HashMap<i64, Band>,
}

impl BandPlan {
    /// Returns the band selected for a celebration, if any.
    #[must_use]
    pub fn band_for(&self, celebration_id: i64) -> Option<&Band> {
        self.selected.get(&celebration_id)
    }

    /// Returns the number of celebrations that received a band.
    #[must_use]
    pub fn len(&self) -> usize {
        self.selected.len()
    }

    /// Returns whether no celebration received a band.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }
}

/// Active bands split into the special band and the rotation order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BandLineup {
    pub special: Option<Band>,
    pub rotation: Vec<Band>,
}

impl BandLineup {
    /// Partitions the active bands.
    ///
    /// Bands are ordered by normalized name, then raw name, then id. The
    /// first band in that order whose name carries the special keyword is
    /// the special band; every other active band rotates.
    #[must_use]
    pub fn from_bands(bands: &[Band]) -> Self {
        let mut active: Vec<Band> = bands.iter().filter(|b| b.active).cloned().collect();
        active.sort_by(|a, b| {
            normalize_name(&a.name)
                .cmp(&normalize_name(&b.name))
                .then_with(|| a.name.cmp(&b.name))
                .then_with(|| a.band_id.cmp(&b.band_id))
        });

        let special: Option<Band> = active
            .iter()
            .position(Band::is_special)
            .map(|index| active.remove(index));

        Self {
            special,
            rotation: active,
        }
    }

    /// Selects the band for a celebration given its week index.
    #[must_use]
    pub fn select(&self, special_event: bool, week_index: usize) -> Option<&Band> {
        if special_event && self.special.is_some() {
            return self.special.as_ref();
        }
        if self.rotation.is_empty() {
            return self.special.as_ref();
        }
        self.rotation.get(week_index % self.rotation.len())
    }
}

/// Returns the Sunday-aligned week index of an instant within a period.
///
/// Days before the first Sunday count as week zero.
///
/// # Errors
///
/// Returns an error if the period's first Sunday cannot be computed.
pub fn week_index(period: &SchedulePeriod, celebration: &Celebration) -> Result<usize, CoreError> {
    let first_sunday: Date = period.first_sunday()?;
    let day: Date = celebration.starts_at.to_offset(UtcOffset::UTC).date();
    let days: i64 = (day - first_sunday).whole_days().max(0);
    Ok(usize::try_from(days / 7).unwrap_or(0))
}

/// Assigns a band to every celebration of the period.
///
/// # Errors
///
/// Returns an error if the period's calendar cannot be computed.
pub fn plan_band_rotation(
    period: &SchedulePeriod,
    bands: &[Band],
    celebrations: &[Celebration],
) -> Result<BandPlan, CoreError> {
    let lineup: BandLineup = BandLineup::from_bands(bands);
    let mut selected: HashMap<i64, Band> = HashMap::new();

    for celebration in celebrations {
        let week: usize = week_index(period, celebration)?;
        if let Some(band) = lineup.select(celebration.is_special_event(), week) {
            selected.insert(celebration.celebration_id, band.clone());
        }
    }

    Ok(BandPlan { selected })
}
