// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::normalize::{is_band_ministry_name, is_special_band_name, mentions_special_event};
use crate::period::SchedulePeriod;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use time::OffsetDateTime;

/// A volunteer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub profile_id: i64,
    pub name: String,
    /// Members sharing a family id are kept together on the same celebration
    /// when possible.
    pub family_id: Option<String>,
}

/// A named volunteer service team.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ministry {
    pub ministry_id: i64,
    pub name: String,
    pub active: bool,
}

impl Ministry {
    /// Returns whether this is the ministry whose roles come from the band.
    #[must_use]
    pub fn is_band_ministry(&self) -> bool {
        is_band_ministry_name(&self.name)
    }
}

/// A function within a ministry filled by one volunteer per celebration.
///
/// Identity for matching is `(ministry_id, name)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub role_id: i64,
    pub ministry_id: i64,
    pub name: String,
}

/// A worship music team.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Band {
    pub band_id: i64,
    pub name: String,
    /// Only active bands take part in the rotation.
    pub active: bool,
}

impl Band {
    /// Returns whether this band is reserved for special events.
    #[must_use]
    pub fn is_special(&self) -> bool {
        is_special_band_name(&self.name)
    }
}

/// A member's seat in a band, naming the role they play there.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BandMembership {
    pub band_member_id: i64,
    pub band_id: i64,
    pub member_id: i64,
    /// Matched against role names of the band ministry.
    pub role_in_band: String,
}

/// A member's participation in a ministry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MinistryMembership {
    pub member_id: i64,
    pub ministry_id: i64,
    pub is_leader: bool,
}

/// A scheduled church service instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Celebration {
    pub celebration_id: i64,
    #[serde(with = "time::serde::rfc3339")]
    pub starts_at: OffsetDateTime,
    pub location: Option<String>,
    pub notes: Option<String>,
}

impl Celebration {
    /// Returns whether the notes or location mark this as a special event.
    #[must_use]
    pub fn is_special_event(&self) -> bool {
        mentions_special_event(&[self.notes.as_deref(), self.location.as_deref()])
    }
}

/// A member's declared availability for one celebration.
///
/// A missing record is not the same as `available == false`: the former
/// means the member never answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Availability {
    pub celebration_id: i64,
    pub member_id: i64,
    pub available: bool,
}

/// Lifecycle status of a schedule run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    /// Freshly generated; assignments may be regenerated.
    #[default]
    Draft,
    /// Visible to volunteers; no longer regenerated.
    Published,
}

impl RunStatus {
    /// Returns the stored string form.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Published => "published",
        }
    }
}

impl FromStr for RunStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(Self::Draft),
            "published" => Ok(Self::Published),
            _ => Err(DomainError::InvalidRunStatus(s.to_string())),
        }
    }
}

impl std::fmt::Display for RunStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One generated roster header for a period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleRun {
    pub schedule_run_id: i64,
    pub period: SchedulePeriod,
    pub status: RunStatus,
    pub created_by: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339::option")]
    pub published_at: Option<OffsetDateTime>,
}

impl ScheduleRun {
    /// Moves the run from draft to published.
    ///
    /// # Errors
    ///
    /// Returns an error if the run is already published.
    pub const fn publish(&mut self, at: OffsetDateTime) -> Result<(), DomainError> {
        match self.status {
            RunStatus::Published => Err(DomainError::ScheduleAlreadyPublished {
                schedule_run_id: self.schedule_run_id,
            }),
            RunStatus::Draft => {
                self.status = RunStatus::Published;
                self.published_at = Some(at);
                Ok(())
            }
        }
    }

    /// Checks that the run's assignments may still be regenerated.
    ///
    /// # Errors
    ///
    /// Returns an error if the run is published.
    pub const fn ensure_regenerable(&self) -> Result<(), DomainError> {
        match self.status {
            RunStatus::Draft => Ok(()),
            RunStatus::Published => Err(DomainError::PublishedScheduleImmutable {
                schedule_run_id: self.schedule_run_id,
            }),
        }
    }
}

/// Identifies one slot of a roster: a role at a celebration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AssignmentKey {
    pub celebration_id: i64,
    pub role_id: i64,
}

/// A resolved (celebration, role) to volunteer binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    pub celebration_id: i64,
    pub ministry_id: i64,
    pub role_id: i64,
    pub member_id: i64,
    /// Locked assignments survive regeneration when preservation is requested.
    pub locked: bool,
}

impl Assignment {
    /// Returns the slot this assignment fills.
    #[must_use]
    pub const fn key(&self) -> AssignmentKey {
        AssignmentKey {
            celebration_id: self.celebration_id,
            role_id: self.role_id,
        }
    }
}

/// An assignment as stored under a schedule run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredAssignment {
    pub assignment_id: i64,
    pub schedule_run_id: i64,
    #[serde(flatten)]
    pub assignment: Assignment,
}
