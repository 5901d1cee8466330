// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Persistence layer for the Escala roster generator.
//!
//! This crate stores the reference data the generator reads (profiles,
//! ministries, roles, bands, memberships, celebrations and availability)
//! together with schedule runs and their assignments. It is built on Diesel
//! over `SQLite`.
//!
//! ## Storage Conventions
//!
//! - Identifiers are `INTEGER PRIMARY KEY` and surface as `i64`
//! - Flags are stored as `INTEGER` 0/1
//! - Timestamps are RFC 3339 UTC text at second precision, so lexical and
//!   chronological order agree
//!
//! ## Invariants Enforced by the Schema
//!
//! - At most one schedule run per `(month, year)`
//! - At most one availability answer per `(member, celebration)`
//! - Deleting a schedule run removes its assignments
//!
//! Foreign key enforcement is switched on for every connection and verified
//! at startup.
//!
//! ## Testing
//!
//! [`Persistence::new_in_memory`] gives every caller its own shared-cache
//! in-memory database, so tests never observe each other's rows.

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
#![allow(clippy::multiple_crate_versions)]

use crate::backend::sqlite::ConnectionTarget;
use diesel::SqliteConnection;
use escala::ReferenceData;
use escala_domain::{
    Assignment, Availability, Band, BandMembership, Celebration, Ministry, MinistryMembership,
    Profile, Role, SchedulePeriod, ScheduleRun, StoredAssignment,
};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use time::OffsetDateTime;

mod backend;
mod data_models;
mod diesel_schema;
mod error;
mod mutations;
mod queries;

#[cfg(test)]
mod tests;

pub use data_models::{
    AssignmentSweep, PersistedSchedule, RosterEntry, RunTarget, UpcomingAssignment,
};
pub use error::PersistenceError;

/// Atomic counter for generating unique in-memory database names.
///
/// Each call to `new_in_memory()` receives a unique sequential ID.
static DB_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Persistence adapter over a single `SQLite` connection.
pub struct Persistence {
    pub(crate) conn: SqliteConnection,
}

impl Persistence {
    /// Creates a new persistence adapter with an in-memory `SQLite` database.
    ///
    /// Each call receives a unique database instance via atomic counter.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn new_in_memory() -> Result<Self, PersistenceError> {
        let db_id: u64 = DB_COUNTER.fetch_add(1, Ordering::SeqCst);
        let target: ConnectionTarget = ConnectionTarget::Memory(format!("memdb_test_{db_id}"));

        Ok(Self {
            conn: backend::sqlite::open(&target)?,
        })
    }

    /// Opens (creating if needed) a file-based `SQLite` database in WAL mode.
    ///
    /// # Arguments
    ///
    /// * `path` - The path to the `SQLite` database file
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn new_with_file<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        let path_str: &str = path.as_ref().to_str().ok_or_else(|| {
            PersistenceError::InitializationError("Invalid database path".to_string())
        })?;
        let target: ConnectionTarget = ConnectionTarget::File(path_str.to_string());

        Ok(Self {
            conn: backend::sqlite::open(&target)?,
        })
    }

    /// Verifies that foreign key enforcement is enabled.
    ///
    /// # Errors
    ///
    /// Returns an error if foreign key enforcement is not enabled.
    pub fn verify_foreign_key_enforcement(&mut self) -> Result<(), PersistenceError> {
        backend::sqlite::verify_foreign_key_enforcement(&mut self.conn)
    }

    // ========================================================================
    // Reference Data
    // ========================================================================

    /// Loads everything the generator reads for a period.
    ///
    /// # Errors
    ///
    /// Returns an error if any query fails or a stored value is invalid.
    pub fn load_reference_data(
        &mut self,
        period: &SchedulePeriod,
    ) -> Result<ReferenceData, PersistenceError> {
        queries::reference::load_reference_data(&mut self.conn, period)
    }

    /// Lists the celebrations that start within the period.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_celebrations_in_period(
        &mut self,
        period: &SchedulePeriod,
    ) -> Result<Vec<Celebration>, PersistenceError> {
        queries::reference::list_celebrations_in_period(&mut self.conn, period)
    }

    /// Lists every profile.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_profiles(&mut self) -> Result<Vec<Profile>, PersistenceError> {
        queries::reference::list_profiles(&mut self.conn)
    }

    /// Lists every ministry.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_ministries(&mut self) -> Result<Vec<Ministry>, PersistenceError> {
        queries::reference::list_ministries(&mut self.conn)
    }

    /// Lists every role.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_roles(&mut self) -> Result<Vec<Role>, PersistenceError> {
        queries::reference::list_roles(&mut self.conn)
    }

    /// Lists the active bands.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_active_bands(&mut self) -> Result<Vec<Band>, PersistenceError> {
        queries::reference::list_active_bands(&mut self.conn)
    }

    /// Lists every band seat.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_band_memberships(&mut self) -> Result<Vec<BandMembership>, PersistenceError> {
        queries::reference::list_band_memberships(&mut self.conn)
    }

    /// Lists every ministry membership.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_ministry_memberships(
        &mut self,
    ) -> Result<Vec<MinistryMembership>, PersistenceError> {
        queries::reference::list_ministry_memberships(&mut self.conn)
    }

    /// Lists the availability answers for the given celebrations.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_availabilities_for(
        &mut self,
        celebration_ids: &[i64],
    ) -> Result<Vec<Availability>, PersistenceError> {
        queries::reference::list_availabilities_for(&mut self.conn, celebration_ids)
    }

    /// Creates a volunteer profile and returns its id.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn create_profile(
        &mut self,
        name: &str,
        family_id: Option<&str>,
    ) -> Result<i64, PersistenceError> {
        mutations::reference::create_profile(&mut self.conn, name, family_id)
    }

    /// Creates a ministry and returns its id.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails or the name is taken.
    pub fn create_ministry(&mut self, name: &str, active: bool) -> Result<i64, PersistenceError> {
        mutations::reference::create_ministry(&mut self.conn, name, active)
    }

    /// Creates a role within a ministry and returns its id.
    ///
    /// # Errors
    ///
    /// Returns an error if the ministry does not exist or the name is taken.
    pub fn create_role(&mut self, ministry_id: i64, name: &str) -> Result<i64, PersistenceError> {
        mutations::reference::create_role(&mut self.conn, ministry_id, name)
    }

    /// Creates a band and returns its id.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn create_band(&mut self, name: &str, active: bool) -> Result<i64, PersistenceError> {
        mutations::reference::create_band(&mut self.conn, name, active)
    }

    /// Seats a member in a band.
    ///
    /// # Errors
    ///
    /// Returns an error if the band or member does not exist.
    pub fn add_band_member(
        &mut self,
        band_id: i64,
        member_id: i64,
        role_in_band: &str,
    ) -> Result<i64, PersistenceError> {
        mutations::reference::add_band_member(&mut self.conn, band_id, member_id, role_in_band)
    }

    /// Adds a member to a ministry.
    ///
    /// # Errors
    ///
    /// Returns an error if the ministry or member does not exist.
    pub fn add_ministry_member(
        &mut self,
        member_id: i64,
        ministry_id: i64,
        is_leader: bool,
    ) -> Result<i64, PersistenceError> {
        mutations::reference::add_ministry_member(&mut self.conn, member_id, ministry_id, is_leader)
    }

    /// Creates a celebration and returns its id.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn create_celebration(
        &mut self,
        starts_at: OffsetDateTime,
        location: Option<&str>,
        notes: Option<&str>,
    ) -> Result<i64, PersistenceError> {
        mutations::reference::create_celebration(&mut self.conn, starts_at, location, notes)
    }

    /// Records a member's availability, replacing any earlier answer.
    ///
    /// # Errors
    ///
    /// Returns an error if the member or celebration does not exist.
    pub fn upsert_availability(
        &mut self,
        member_id: i64,
        celebration_id: i64,
        available: bool,
        at: OffsetDateTime,
    ) -> Result<(), PersistenceError> {
        mutations::reference::upsert_availability(
            &mut self.conn,
            member_id,
            celebration_id,
            available,
            at,
        )
    }

    // ========================================================================
    // Schedules
    // ========================================================================

    /// Finds the schedule run of a period.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn find_schedule_run_by_period(
        &mut self,
        period: &SchedulePeriod,
    ) -> Result<Option<ScheduleRun>, PersistenceError> {
        queries::schedules::find_schedule_run_by_period(&mut self.conn, period)
    }

    /// Retrieves a schedule run by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_schedule_run(
        &mut self,
        schedule_run_id: i64,
    ) -> Result<Option<ScheduleRun>, PersistenceError> {
        queries::schedules::get_schedule_run(&mut self.conn, schedule_run_id)
    }

    /// Lists the stored assignments of a run.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_assignments_for_run(
        &mut self,
        schedule_run_id: i64,
    ) -> Result<Vec<StoredAssignment>, PersistenceError> {
        queries::schedules::list_assignments_for_run(&mut self.conn, schedule_run_id)
    }

    /// Retrieves one stored assignment.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_assignment(
        &mut self,
        assignment_id: i64,
    ) -> Result<Option<StoredAssignment>, PersistenceError> {
        queries::schedules::get_assignment(&mut self.conn, assignment_id)
    }

    /// Reads a run as a joined roster.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_roster(&mut self, schedule_run_id: i64) -> Result<Vec<RosterEntry>, PersistenceError> {
        queries::schedules::get_roster(&mut self.conn, schedule_run_id)
    }

    /// Finds profiles whose name contains `term`, ignoring ASCII case,
    /// ordered by name and capped at `limit`.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn search_profiles_by_name(
        &mut self,
        term: &str,
        limit: i64,
    ) -> Result<Vec<Profile>, PersistenceError> {
        queries::members::search_profiles_by_name(&mut self.conn, term, limit)
    }

    /// Lists the members' assignments at celebrations starting after `after`,
    /// in date order.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a stored timestamp is invalid.
    pub fn list_upcoming_assignments(
        &mut self,
        member_ids: &[i64],
        after: OffsetDateTime,
    ) -> Result<Vec<UpcomingAssignment>, PersistenceError> {
        queries::members::list_upcoming_assignments(&mut self.conn, member_ids, after)
    }

    /// Writes a computed roster in one transaction.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError::DuplicatePeriod`] if creating a run loses
    /// to an existing one for the same period, or another error if any
    /// statement fails. Nothing is written on error.
    pub fn persist_schedule(
        &mut self,
        target: &RunTarget,
        sweep: Option<&AssignmentSweep>,
        assignments: &[Assignment],
    ) -> Result<PersistedSchedule, PersistenceError> {
        mutations::schedules::persist_schedule(&mut self.conn, target, sweep, assignments)
    }

    /// Stores a run's status and publish time.
    ///
    /// # Errors
    ///
    /// Returns an error if the run does not exist or the update fails.
    pub fn update_schedule_run_status(&mut self, run: &ScheduleRun) -> Result<(), PersistenceError> {
        mutations::schedules::update_schedule_run_status(&mut self.conn, run)
    }

    /// Deletes a run with its assignments, returning how many assignments
    /// were removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the run does not exist or a statement fails.
    pub fn delete_schedule_run(&mut self, schedule_run_id: i64) -> Result<usize, PersistenceError> {
        mutations::schedules::delete_schedule_run(&mut self.conn, schedule_run_id)
    }

    /// Locks or unlocks one assignment.
    ///
    /// # Errors
    ///
    /// Returns an error if the assignment does not exist or the update fails.
    pub fn set_assignment_lock(
        &mut self,
        assignment_id: i64,
        locked: bool,
    ) -> Result<(), PersistenceError> {
        mutations::schedules::set_assignment_lock(&mut self.conn, assignment_id, locked)
    }
}
