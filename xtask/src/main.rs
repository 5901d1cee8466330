// Copyright (C) 2024-2025 Fred Clausen and the ratatui project contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! # xtask - Project Automation
//!
//! - `cargo xtask ci` — lint, build, test and verify migrations
//! - `cargo xtask verify-migrations` — applies the embedded migrations to an
//!   in-memory `SQLite` database and checks the resulting schema
//!
//! Standard `cargo test` stays fast and infrastructure-free; everything here
//! only shells out to cargo and its plugins.

#![deny(
    clippy::pedantic,
    //clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]

use std::{io, process::Output};

use cargo_metadata::MetadataCommand;
use clap::{Parser, Subcommand};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use color_eyre::{eyre::Context, Result};
use diesel::sql_types::{Integer, Text};
use diesel::{QueryableByName, RunQueryDsl, SqliteConnection};
use duct::cmd;
use std::collections::{BTreeMap, BTreeSet};
use tracing::level_filters::LevelFilter;
use tracing_log::AsTrace;

fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_max_level(args.log_level())
        .without_time()
        .init();

    match args.run() {
        Ok(()) => (),
        Err(err) => {
            tracing::error!("{err}");
            std::process::exit(1);
        }
    }
    Ok(())
}

#[derive(Debug, Parser)]
#[command(bin_name = "cargo xtask", styles = clap_cargo::style::CLAP_STYLING)]
struct Args {
    #[command(subcommand)]
    command: Command,

    #[command(flatten)]
    verbosity: Verbosity<InfoLevel>,
}

impl Args {
    fn run(self) -> Result<()> {
        self.command.run()
    }

    fn log_level(&self) -> LevelFilter {
        self.verbosity.log_level_filter().as_trace()
    }
}

#[derive(Clone, Debug, Subcommand)]
enum Command {
    /// Run CI checks (lint, build, test, verify migrations)
    CI,

    /// Build the project
    #[command(visible_alias = "b")]
    Build,

    /// Run cargo check
    #[command(visible_alias = "c")]
    Check,

    /// Generate code coverage report
    #[command(visible_alias = "cov")]
    Coverage,

    /// Lint formatting, clippy, and docs
    #[command(visible_alias = "l")]
    Lint,

    /// Run clippy on the project
    #[command(visible_alias = "cl")]
    LintClippy,

    /// Check documentation for errors and warnings
    #[command(visible_alias = "d")]
    LintDocs,

    /// Check for formatting issues in the project
    #[command(visible_alias = "lf")]
    LintFormatting,

    /// Fix formatting issues in the project
    #[command(visible_alias = "fmt")]
    FixFormatting,

    /// Run tests
    #[command(visible_alias = "t")]
    Test,

    /// Run doc tests
    #[command(visible_alias = "td")]
    TestDocs,

    /// Run lib tests
    #[command(visible_alias = "tl")]
    TestLibs,

    /// Apply the migrations to a scratch database and check the schema
    #[command(visible_alias = "vm")]
    VerifyMigrations,
}

impl Command {
    fn run(self) -> Result<()> {
        match self {
            Self::CI => ci(),
            Self::Build => build(),
            Self::Check => check(),
            Self::Coverage => coverage(),
            Self::Lint => lint(),
            Self::LintClippy => lint_clippy(),
            Self::LintDocs => lint_docs(),
            Self::LintFormatting => lint_format(),
            Self::FixFormatting => fix_format(),
            Self::Test => test(),
            Self::TestDocs => test_docs(),
            Self::TestLibs => test_libs(),
            Self::VerifyMigrations => verify_migrations(),
        }
    }
}

/// Run CI checks (lint, build, test, verify migrations)
fn ci() -> Result<()> {
    lint()?;
    build()?;
    test()?;
    verify_migrations()?;
    Ok(())
}

/// Build the project
fn build() -> Result<()> {
    run_cargo(vec!["build", "--all-targets", "--all-features"])
}

/// Run cargo check
fn check() -> Result<()> {
    run_cargo(vec!["check", "--all-targets", "--all-features"])
}

/// Generate code coverage report
fn coverage() -> Result<()> {
    run_cargo(vec![
        "llvm-cov",
        "--lcov",
        "--output-path",
        "target/lcov.info",
        "--all-features",
    ])
}

/// Lint formatting, clippy, and docs
fn lint() -> Result<()> {
    lint_clippy()?;
    lint_docs()?;
    lint_format()?;
    Ok(())
}

/// Run clippy on the project
fn lint_clippy() -> Result<()> {
    run_cargo(vec![
        "clippy",
        "--all-targets",
        "--all-features",
        "--",
        "-D",
        "warnings",
    ])
}

/// Check that docs build without errors using docs.rs-equivalent flags
fn lint_docs() -> Result<()> {
    let meta = MetadataCommand::new()
        .exec()
        .wrap_err("failed to get cargo metadata")?;

    for package in meta.workspace_default_packages() {
        cmd(
            "cargo",
            [
                "doc",
                "--no-deps",
                "--all-features",
                "--package",
                &package.name,
            ],
        )
        .env_remove("CARGO")
        .env("RUSTUP_TOOLCHAIN", "nightly")
        .env("RUSTDOCFLAGS", "--cfg docsrs -D warnings")
        .run_with_trace()?;
    }

    Ok(())
}

/// Lint formatting issues in the project
fn lint_format() -> Result<()> {
    run_cargo_nightly(vec!["fmt", "--all", "--check"])
}

/// Fix formatting issues in the project
fn fix_format() -> Result<()> {
    run_cargo_nightly(vec!["fmt", "--all"])
}

/// Run lib and doc tests
fn test() -> Result<()> {
    test_libs()?;
    test_docs()?; // run last because it's slow
    Ok(())
}

/// Run doc tests for the workspace's default packages
fn test_docs() -> Result<()> {
    run_cargo(vec!["test", "--doc", "--all-features"])
}

/// Run lib tests for the workspace's default packages
fn test_libs() -> Result<()> {
    run_cargo(vec!["test", "--all-targets", "--all-features"])
}

/// Run a cargo subcommand with the default toolchain
fn run_cargo(args: Vec<&str>) -> Result<()> {
    cmd("cargo", args).run_with_trace()?;
    Ok(())
}

/// Run a cargo subcommand with the nightly toolchain
fn run_cargo_nightly(args: Vec<&str>) -> Result<()> {
    cmd("cargo", args)
        // CARGO env var is set because we're running in a cargo subcommand
        .env_remove("CARGO")
        .env("RUSTUP_TOOLCHAIN", "nightly")
        .run_with_trace()?;
    Ok(())
}

/// Tables the roster schema must create, with their primary key column.
const EXPECTED_TABLES: [(&str, &str); 10] = [
    ("assignments", "assignment_id"),
    ("availabilities", "availability_id"),
    ("band_members", "band_member_id"),
    ("bands", "band_id"),
    ("celebrations", "celebration_id"),
    ("member_ministries", "member_ministry_id"),
    ("ministries", "ministry_id"),
    ("profiles", "profile_id"),
    ("roles", "role_id"),
    ("schedule_runs", "schedule_run_id"),
];

/// Unique constraints the generator relies on.
const EXPECTED_UNIQUE: [(&str, &[&str]); 3] = [
    ("schedule_runs", &["month", "year"]),
    ("availabilities", &["member_id", "celebration_id"]),
    ("member_ministries", &["member_id", "ministry_id"]),
];

/// Tables whose ids clients hold on to; `AUTOINCREMENT` keeps them from being
/// reissued after deletes.
const EXPECTED_AUTOINCREMENT: [&str; 2] = ["assignments", "schedule_runs"];

/// Verify the embedded migrations
///
/// ## What This Command Does
///
/// 1. Applies `crates/persistence/migrations` to an in-memory `SQLite`
///    database with foreign keys enabled
/// 2. Introspects the resulting schema (tables, columns, keys, unique
///    constraints)
/// 3. Checks every expected table exists with its integer primary key and
///    no unexpected tables are present
/// 4. Checks the unique constraints behind duplicate-period detection and
///    availability upserts, and that run and assignment ids are
///    `AUTOINCREMENT`
/// 5. Runs `PRAGMA foreign_key_check` and reverts every migration, which must
///    leave no tables behind
///
/// ## Usage
///
/// ```bash
/// cargo xtask verify-migrations
/// ```
fn verify_migrations() -> Result<()> {
    use diesel::Connection;
    use diesel_migrations::{embed_migrations, MigrationHarness};

    const MIGRATIONS: diesel_migrations::EmbeddedMigrations =
        embed_migrations!("../crates/persistence/migrations");

    tracing::info!("Applying SQLite migrations");

    let mut conn = SqliteConnection::establish(":memory:")
        .wrap_err("Failed to create SQLite in-memory database")?;

    diesel::sql_query("PRAGMA foreign_keys = ON")
        .execute(&mut conn)
        .wrap_err("Failed to enable foreign keys on SQLite")?;

    conn.run_pending_migrations(MIGRATIONS)
        .map_err(|e| color_eyre::eyre::eyre!("Failed to apply SQLite migrations: {}", e))?;

    tracing::info!("Introspecting schema");
    let schema = introspect_sqlite_schema(&mut conn)?;
    check_schema(&schema)?;
    check_foreign_keys(&mut conn)?;

    tracing::info!("Reverting migrations");
    conn.revert_all_migrations(MIGRATIONS)
        .map_err(|e| color_eyre::eyre::eyre!("Failed to revert SQLite migrations: {}", e))?;
    let leftover = introspect_sqlite_schema(&mut conn)?;
    if !leftover.tables.is_empty() {
        return Err(color_eyre::eyre::eyre!(
            "Tables left after reverting migrations: {:?}",
            leftover.tables.keys().collect::<Vec<_>>()
        ));
    }

    tracing::info!("✓ Migration verification passed");
    Ok(())
}

/// Normalized schema representation
#[derive(Debug, Clone, PartialEq, Eq)]
struct Schema {
    tables: BTreeMap<String, Table>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Table {
    columns: BTreeMap<String, Column>,
    primary_keys: BTreeSet<String>,
    foreign_keys: BTreeSet<ForeignKey>,
    unique_constraints: BTreeSet<Vec<String>>,
    autoincrement: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct Column {
    normalized_type: String,
    nullable: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct ForeignKey {
    from_column: String,
    to_table: String,
    to_column: String,
}

/// Introspect `SQLite` schema
fn introspect_sqlite_schema(conn: &mut SqliteConnection) -> Result<Schema> {
    #[derive(QueryableByName)]
    struct TableName {
        #[diesel(sql_type = Text)]
        name: String,
        #[diesel(sql_type = Text)]
        sql: String,
    }

    #[derive(QueryableByName)]
    struct ColumnInfo {
        #[diesel(sql_type = Text)]
        name: String,
        #[diesel(sql_type = Text)]
        r#type: String,
        #[diesel(sql_type = Integer)]
        notnull: i32,
        #[diesel(sql_type = Integer)]
        pk: i32,
    }

    #[derive(QueryableByName)]
    struct ForeignKeyInfo {
        #[diesel(sql_type = Text)]
        table: String,
        #[diesel(sql_type = Text)]
        from: String,
        #[diesel(sql_type = Text)]
        to: String,
    }

    #[derive(QueryableByName)]
    struct IndexInfo {
        #[diesel(sql_type = Text)]
        name: String,
        #[diesel(sql_type = Text)]
        origin: String,
    }

    #[derive(QueryableByName)]
    struct IndexColumnInfo {
        #[diesel(sql_type = Text)]
        name: String,
    }

    let mut schema = Schema {
        tables: BTreeMap::new(),
    };

    let tables: Vec<TableName> = diesel::sql_query(
        "SELECT name, sql FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%' AND name != '__diesel_schema_migrations' ORDER BY name"
    )
    .load(conn)
    .wrap_err("Failed to query SQLite tables")?;

    for table in tables {
        let mut table_info = Table {
            columns: BTreeMap::new(),
            primary_keys: BTreeSet::new(),
            foreign_keys: BTreeSet::new(),
            unique_constraints: BTreeSet::new(),
            autoincrement: table.sql.to_uppercase().contains("AUTOINCREMENT"),
        };

        let columns: Vec<ColumnInfo> =
            diesel::sql_query(format!("PRAGMA table_info({})", table.name))
                .load(conn)
                .wrap_err(format!("Failed to get columns for table {}", table.name))?;

        for col in columns {
            table_info.columns.insert(
                col.name.clone(),
                Column {
                    normalized_type: col.r#type.to_uppercase(),
                    nullable: col.notnull == 0,
                },
            );
            if col.pk > 0 {
                table_info.primary_keys.insert(col.name);
            }
        }

        let fks: Vec<ForeignKeyInfo> =
            diesel::sql_query(format!("PRAGMA foreign_key_list({})", table.name))
                .load(conn)
                .wrap_err(format!(
                    "Failed to get foreign keys for table {}",
                    table.name
                ))?;

        for fk in fks {
            table_info.foreign_keys.insert(ForeignKey {
                from_column: fk.from,
                to_table: fk.table,
                to_column: fk.to,
            });
        }

        let indexes: Vec<IndexInfo> =
            diesel::sql_query(format!("PRAGMA index_list({})", table.name))
                .load(conn)
                .wrap_err(format!("Failed to get indexes for table {}", table.name))?;

        // Origin 'u' marks indexes backing a UNIQUE constraint.
        for idx in indexes.into_iter().filter(|i| i.origin == "u") {
            let index_columns: Vec<IndexColumnInfo> =
                diesel::sql_query(format!("PRAGMA index_info({})", idx.name))
                    .load(conn)
                    .wrap_err(format!("Failed to get index columns for {}", idx.name))?;
            table_info
                .unique_constraints
                .insert(index_columns.into_iter().map(|c| c.name).collect());
        }

        schema.tables.insert(table.name, table_info);
    }

    Ok(schema)
}

/// Compare the introspected schema against the tables the persistence crate
/// expects.
fn check_schema(schema: &Schema) -> Result<()> {
    let expected: BTreeSet<&str> = EXPECTED_TABLES.iter().map(|(t, _)| *t).collect();
    let actual: BTreeSet<&str> = schema.tables.keys().map(String::as_str).collect();

    if expected != actual {
        tracing::error!("Table set mismatch");
        for table in expected.difference(&actual) {
            tracing::error!("  Missing table: {table}");
        }
        for table in actual.difference(&expected) {
            tracing::error!("  Unexpected table: {table}");
        }
        return Err(color_eyre::eyre::eyre!("Schema table set mismatch"));
    }

    let mut errors = Vec::new();

    for (table_name, primary_key) in EXPECTED_TABLES {
        let table = &schema.tables[table_name];
        let expected_pk: BTreeSet<String> = BTreeSet::from([primary_key.to_string()]);
        if table.primary_keys != expected_pk {
            errors.push(format!(
                "Table {table_name}: primary key {:?}, expected {primary_key}",
                table.primary_keys
            ));
        }
        match table.columns.get(primary_key) {
            Some(column) if column.normalized_type == "INTEGER" && !column.nullable => {}
            Some(column) => errors.push(format!(
                "Table {table_name}: primary key column is {} (nullable: {})",
                column.normalized_type, column.nullable
            )),
            None => errors.push(format!("Table {table_name}: missing column {primary_key}")),
        }
        for fk in &table.foreign_keys {
            if !expected.contains(fk.to_table.as_str()) {
                errors.push(format!(
                    "Table {table_name}: {} references unknown table {}({})",
                    fk.from_column, fk.to_table, fk.to_column
                ));
            }
        }
    }

    for (table_name, columns) in EXPECTED_UNIQUE {
        let wanted: Vec<String> = columns.iter().map(ToString::to_string).collect();
        if !schema.tables[table_name].unique_constraints.contains(&wanted) {
            errors.push(format!(
                "Table {table_name}: missing UNIQUE({})",
                columns.join(", ")
            ));
        }
    }

    for table_name in EXPECTED_AUTOINCREMENT {
        if !schema.tables[table_name].autoincrement {
            errors.push(format!("Table {table_name}: primary key is not AUTOINCREMENT"));
        }
    }

    if !errors.is_empty() {
        for error in &errors {
            tracing::error!("  {error}");
        }
        return Err(color_eyre::eyre::eyre!(
            "Schema verification failed with {} error(s)",
            errors.len()
        ));
    }

    tracing::info!("Schema matches: {} tables verified", EXPECTED_TABLES.len());
    Ok(())
}

/// Run `PRAGMA foreign_key_check`, which reports rows violating a foreign key
/// and fails on references to missing tables.
fn check_foreign_keys(conn: &mut SqliteConnection) -> Result<()> {
    #[derive(QueryableByName)]
    struct Violation {
        #[diesel(sql_type = Text)]
        table: String,
    }

    let violations: Vec<Violation> = diesel::sql_query("PRAGMA foreign_key_check")
        .load(conn)
        .wrap_err("Failed to run foreign key check")?;

    if let Some(first) = violations.first() {
        return Err(color_eyre::eyre::eyre!(
            "Foreign key check reported {} violation(s), first in {}",
            violations.len(),
            first.table
        ));
    }
    Ok(())
}

/// An extension trait for `duct::Expression` that logs the command being run
/// before running it.
trait ExpressionExt {
    /// Run the command and log the command being run
    fn run_with_trace(&self) -> io::Result<Output>;
}

impl ExpressionExt for duct::Expression {
    fn run_with_trace(&self) -> io::Result<Output> {
        tracing::info!("running command: {:?}", self);
        self.run().inspect_err(|_| {
            // The command that was run may have scrolled off the screen, so repeat it here
            tracing::error!("failed to run command: {:?}", self);
        })
    }
}
