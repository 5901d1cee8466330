// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Opening and preparing `SQLite` connections.
//!
//! Every connection goes through [`open`], which applies the connection
//! pragmas, brings the schema up to date and checks that foreign keys are
//! enforced before handing the connection out.

use diesel::dsl::sql;
use diesel::prelude::*;
use diesel::sql_types::{BigInt, Integer};
use diesel::{Connection, RunQueryDsl, SqliteConnection};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::{debug, info};

use crate::error::PersistenceError;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Milliseconds a writer waits on a locked file database before failing.
const BUSY_TIMEOUT_MS: u32 = 5_000;

/// Where a connection points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionTarget {
    /// A named shared-cache in-memory database.
    Memory(String),
    /// A database file, opened in WAL mode.
    File(String),
}

impl ConnectionTarget {
    fn url(&self) -> String {
        match self {
            Self::Memory(name) => format!("file:{name}?mode=memory&cache=shared"),
            Self::File(path) => path.clone(),
        }
    }
}

/// Result row of `PRAGMA foreign_keys`. Diesel has no PRAGMA DSL.
#[derive(QueryableByName)]
struct ForeignKeysPragma {
    #[diesel(sql_type = Integer)]
    foreign_keys: i32,
}

/// Row id of the last row inserted on this connection.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn get_last_insert_rowid(conn: &mut SqliteConnection) -> Result<i64, PersistenceError> {
    Ok(diesel::select(sql::<BigInt>("last_insert_rowid()")).get_result(conn)?)
}

/// Fails unless `PRAGMA foreign_keys` reports enforcement on.
///
/// # Errors
///
/// Returns `ForeignKeyEnforcementNotEnabled` if enforcement is off, or an
/// error if the pragma cannot be read.
pub fn verify_foreign_key_enforcement(conn: &mut SqliteConnection) -> Result<(), PersistenceError> {
    let pragma: ForeignKeysPragma =
        diesel::sql_query("PRAGMA foreign_keys").get_result::<ForeignKeysPragma>(conn)?;
    if pragma.foreign_keys == 0 {
        return Err(PersistenceError::ForeignKeyEnforcementNotEnabled);
    }
    debug!("foreign key enforcement confirmed");
    Ok(())
}

fn apply_pragma(conn: &mut SqliteConnection, pragma: &str) -> Result<(), PersistenceError> {
    diesel::sql_query(pragma)
        .execute(conn)
        .map(|_| ())
        .map_err(|e| PersistenceError::QueryFailed(format!("{pragma}: {e}")))
}

/// Opens a connection, migrates it and verifies foreign keys.
///
/// # Errors
///
/// Returns an error if the connection cannot be established, a pragma
/// fails, a migration fails, or foreign keys are not enforced.
pub fn open(target: &ConnectionTarget) -> Result<SqliteConnection, PersistenceError> {
    let url: String = target.url();
    let mut conn: SqliteConnection = SqliteConnection::establish(&url)
        .map_err(|e| PersistenceError::DatabaseConnectionFailed(e.to_string()))?;

    apply_pragma(&mut conn, "PRAGMA foreign_keys = ON")?;
    if matches!(target, ConnectionTarget::File(_)) {
        apply_pragma(&mut conn, "PRAGMA journal_mode = WAL")?;
        apply_pragma(&mut conn, &format!("PRAGMA busy_timeout = {BUSY_TIMEOUT_MS}"))?;
    }

    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|e| PersistenceError::MigrationFailed(e.to_string()))?;
    info!(database = %url, migrations = applied.len(), "SQLite database ready");

    verify_foreign_key_enforcement(&mut conn)?;
    Ok(conn)
}
