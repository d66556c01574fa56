//! CLI integration tests
//!
//! Each test drives the built `petshelter` binary against a database in a
//! fresh temporary directory.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

fn db_path(temp_dir: &TempDir) -> PathBuf {
    temp_dir.path().join("data").join("pets_shelter.db")
}

fn run(db: &Path, args: &[&str]) -> Output {
    let cli_bin = env!("CARGO_BIN_EXE_petshelter");
    Command::new(cli_bin)
        .arg("--db")
        .arg(db)
        .args(args)
        .env("RUST_LOG", "off")
        .output()
        .expect("Failed to execute CLI")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn test_list_on_fresh_database_shows_empty_view() {
    let temp_dir = TempDir::new().unwrap();
    let db = db_path(&temp_dir);

    let output = run(&db, &["list"]);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("The shelter is empty"));
    assert!(db.exists(), "database file should be created on first use");
}

#[test]
fn test_add_then_list_json() {
    let temp_dir = TempDir::new().unwrap();
    let db = db_path(&temp_dir);

    let output = run(
        &db,
        &["add", "--name", " Toto ", "--breed", "Terrier", "--weight", "7", "--gender", "male"],
    );
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("Pet saved with id 1"));

    let output = run(&db, &["list", "--json"]);
    assert!(output.status.success());
    let pets: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(pets.as_array().unwrap().len(), 1);
    assert_eq!(pets[0]["id"], 1);
    assert_eq!(pets[0]["name"], "Toto");
    assert_eq!(pets[0]["breed"], "Terrier");
    assert_eq!(pets[0]["gender"], "MALE");
    assert_eq!(pets[0]["weight"], 7);
}

#[test]
fn test_list_renders_unknown_breed() {
    let temp_dir = TempDir::new().unwrap();
    let db = db_path(&temp_dir);

    run(&db, &["add", "--name", "Binx"]);
    let output = run(&db, &["list"]);

    assert!(stdout(&output).contains("Binx  (Unknown breed)"));
}

#[test]
fn test_add_with_blank_form_saves_nothing() {
    let temp_dir = TempDir::new().unwrap();
    let db = db_path(&temp_dir);

    let output = run(&db, &["add"]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("Nothing to save"));

    let output = run(&db, &["list", "--json"]);
    assert_eq!(stdout(&output).trim(), "[]");
}

#[test]
fn test_add_with_invalid_weight_fails() {
    let temp_dir = TempDir::new().unwrap();
    let db = db_path(&temp_dir);

    let output = run(&db, &["add", "--name", "Toto", "--weight", "heavy"]);

    assert!(!output.status.success());
    assert!(stderr(&output).contains("ERR_INVALID_WEIGHT"));
}

#[test]
fn test_edit_updates_only_given_fields() {
    let temp_dir = TempDir::new().unwrap();
    let db = db_path(&temp_dir);
    run(&db, &["insert-dummy"]);

    let output = run(&db, &["edit", "1", "--weight", "9"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("Pet 1 updated"));

    let output = run(&db, &["show", "1", "--json"]);
    let pet: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(pet["name"], "Toto");
    assert_eq!(pet["breed"], "Terrier");
    assert_eq!(pet["weight"], 9);
}

#[test]
fn test_show_and_edit_missing_pet_fail() {
    let temp_dir = TempDir::new().unwrap();
    let db = db_path(&temp_dir);

    let output = run(&db, &["show", "42"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("Pet not found: 42"));

    let output = run(&db, &["edit", "42", "--name", "Rex"]);
    assert!(!output.status.success());
}

#[test]
fn test_delete_and_delete_all() {
    let temp_dir = TempDir::new().unwrap();
    let db = db_path(&temp_dir);
    run(&db, &["insert-dummy"]);
    run(&db, &["insert-dummy"]);
    run(&db, &["insert-dummy"]);

    let output = run(&db, &["delete", "2"]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("Pet 2 deleted"));

    let output = run(&db, &["delete", "2"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("Error deleting pet 2"));

    let output = run(&db, &["delete-all"]);
    assert!(stdout(&output).contains("Deleted 2 pets"));

    // Ids are not reused after a delete-all
    let output = run(&db, &["insert-dummy"]);
    assert!(stdout(&output).contains("Pet saved with id 4"));
}

#[test]
fn test_json_log_format_is_accepted() {
    let temp_dir = TempDir::new().unwrap();
    let db = db_path(&temp_dir);

    let output = run(&db, &["--log-format", "json", "list"]);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
}
