// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Backend initialization tests.

use crate::{Persistence, PersistenceError};

#[test]
fn test_persistence_initialization() {
    let result: Result<Persistence, PersistenceError> = Persistence::new_in_memory();
    assert!(result.is_ok());
}

#[test]
fn test_foreign_key_enforcement_is_enabled() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    assert!(persistence.verify_foreign_key_enforcement().is_ok());
}

#[test]
fn test_multiple_in_memory_instances_are_isolated() {
    let mut db1: Persistence = Persistence::new_in_memory().unwrap();
    let mut db2: Persistence = Persistence::new_in_memory().unwrap();

    db1.create_profile("Ana", None).unwrap();

    assert_eq!(db1.list_profiles().unwrap().len(), 1, "db1 should have 1 profile");
    assert!(
        db2.list_profiles().unwrap().is_empty(),
        "db2 should have no profiles (isolated)"
    );
}

#[test]
fn test_migrations_applied_on_initialization() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();

    assert!(persistence.list_ministries().is_ok());
    assert!(persistence.find_schedule_run_by_period(&super::november()).is_ok());
}

#[test]
fn test_file_database_initialization() {
    let path: std::path::PathBuf = std::env::temp_dir().join(format!(
        "escala_init_test_{}.db",
        std::process::id()
    ));
    let _ = std::fs::remove_file(&path);

    {
        let mut persistence: Persistence = Persistence::new_with_file(&path).unwrap();
        persistence.create_ministry("Bandas", true).unwrap();
    }

    let mut reopened: Persistence = Persistence::new_with_file(&path).unwrap();
    assert_eq!(reopened.list_ministries().unwrap().len(), 1);

    drop(reopened);
    let _ = std::fs::remove_file(&path);
}
