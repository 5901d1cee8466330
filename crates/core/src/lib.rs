// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod assignment;
mod availability;
mod error;
mod generate;
mod rotation;
mod warnings;

#[cfg(test)]
mod tests;

// Re-export public types and functions
pub use assignment::{GenerationContext, RosterIndex, fill_band_roles, fill_derived_roles};
pub use availability::{AvailabilityIndex, AvailabilityStatus};
pub use error::CoreError;
pub use generate::{GenerationOptions, ReferenceData, ScheduleOutcome, compute_schedule};
pub use rotation::{BandLineup, BandPlan, plan_band_rotation, week_index};
pub use warnings::{GenerationWarning, WarningCollector, WarningReason};
