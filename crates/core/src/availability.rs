// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use escala_domain::{Availability, Celebration};
use std::collections::{HashMap, HashSet};

/// A member's availability for one celebration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AvailabilityStatus {
    /// The member confirmed they can serve.
    Available,
    /// The member declared they cannot serve.
    Declined,
    /// The member never answered.
    Unknown,
}

/// Per-celebration availability lookup built once per generation run.
///
/// Only records for the celebrations handed to [`AvailabilityIndex::build`]
/// are retained.
#[derive(Debug, Clone, Default)]
pub struct AvailabilityIndex {
    by_celebration: HashMap<i64, HashMap<i64, bool>>,
}

impl AvailabilityIndex {
    /// Builds the index over the given celebrations.
    #[must_use]
    pub fn build(records: &[Availability], celebrations: &[Celebration]) -> Self {
        let wanted: HashSet<i64> = celebrations.iter().map(|c| c.celebration_id).collect();
        let mut by_celebration: HashMap<i64, HashMap<i64, bool>> = wanted
            .iter()
            .map(|id| (*id, HashMap::new()))
            .collect();

        for record in records {
            if let Some(members) = by_celebration.get_mut(&record.celebration_id) {
                members.insert(record.member_id, record.available);
            }
        }

        Self { by_celebration }
    }

    /// Returns the member lookup for one celebration, if it is indexed.
    #[must_use]
    pub fn for_celebration(&self, celebration_id: i64) -> Option<&HashMap<i64, bool>> {
        self.by_celebration.get(&celebration_id)
    }

    /// Returns the tri-state availability of a member for a celebration.
    #[must_use]
    pub fn status(&self, celebration_id: i64, member_id: i64) -> AvailabilityStatus {
        match self
            .for_celebration(celebration_id)
            .and_then(|members| members.get(&member_id))
        {
            Some(true) => AvailabilityStatus::Available,
            Some(false) => AvailabilityStatus::Declined,
            None => AvailabilityStatus::Unknown,
        }
    }

    /// Returns whether the member confirmed availability.
    #[must_use]
    pub fn is_available(&self, celebration_id: i64, member_id: i64) -> bool {
        self.status(celebration_id, member_id) == AvailabilityStatus::Available
    }
}
