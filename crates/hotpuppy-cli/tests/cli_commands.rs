use assert_cmd::Command;
use hotpuppy_core::Store;
use predicates::prelude::*;
use std::path::Path;
use tempfile::tempdir;

fn seeded_db(path: &Path) -> anyhow::Result<()> {
    let store = Store::open(path)?;
    store.init_schema()?;
    store.append("https://img/seed", "P0", None, true)?;
    store.append("https://img/2", "P1", Some("sunglasses"), false)?;
    Ok(())
}

fn hotpuppy() -> Command {
    let mut cmd = Command::cargo_bin("hotpuppy").unwrap();
    cmd.env_remove("HOTPUPPY_DB");
    cmd
}

#[test]
fn test_reset_deletes_database() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let db = dir.path().join("hotpuppy.db");
    seeded_db(&db)?;

    hotpuppy()
        .args(["reset", "--db"])
        .arg(&db)
        .assert()
        .success()
        .stdout(predicate::str::contains("deleted"));
    assert!(!db.exists());

    hotpuppy()
        .args(["reset", "--db"])
        .arg(&db)
        .assert()
        .success()
        .stdout(predicate::str::contains("already clean"));
    Ok(())
}

#[test]
fn test_history_json() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let db = dir.path().join("hotpuppy.db");
    seeded_db(&db)?;

    let output = hotpuppy()
        .args(["history", "--format", "json", "--db"])
        .arg(&db)
        .output()?;
    assert!(output.status.success());

    let v: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(v["total"], 2);
    assert_eq!(v["images"][0]["is_seed"], true);
    assert_eq!(v["images"][1]["user_input"], "sunglasses");
    Ok(())
}

#[test]
fn test_history_text() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let db = dir.path().join("hotpuppy.db");
    seeded_db(&db)?;

    hotpuppy()
        .args(["history", "--db"])
        .arg(&db)
        .assert()
        .success()
        .stdout(predicate::str::contains("seed"))
        .stdout(predicate::str::contains("sunglasses"))
        .stdout(predicate::str::contains("2 images"));
    Ok(())
}

#[test]
fn test_status_reports_state() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let db = dir.path().join("hotpuppy.db");
    seeded_db(&db)?;

    hotpuppy()
        .args(["status", "--db"])
        .arg(&db)
        .assert()
        .success()
        .stdout(predicate::str::contains("evolving (2 records)"))
        .stdout(predicate::str::contains("#2 https://img/2"));
    Ok(())
}

#[test]
fn test_missing_database_is_an_error() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let db = dir.path().join("absent.db");

    hotpuppy()
        .args(["status", "--db"])
        .arg(&db)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("not found"));
    assert!(!db.exists());
    Ok(())
}

#[test]
fn test_read_commands_leave_database_untouched() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let db = dir.path().join("blank.db");
    std::fs::write(&db, b"")?;

    hotpuppy()
        .args(["status", "--db"])
        .arg(&db)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("fatal:"));

    assert_eq!(std::fs::metadata(&db)?.len(), 0);
    assert!(!dir.path().join("blank.db-wal").exists());
    Ok(())
}
