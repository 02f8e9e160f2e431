use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use rusqlite::Connection;
use serde_json::{Value, json};
use tempfile::TempDir;

fn run(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_table-json"))
        .current_dir(dir)
        .args(args)
        .output()
        .expect("failed to run table-json")
}

/// Database with `users(id INTEGER, name TEXT, meta BLOB)` holding one row.
fn write_users_db(dir: &TempDir) -> PathBuf {
    let path = dir.path().join("app.db");
    let conn = Connection::open(&path).unwrap();
    conn.execute_batch(
        "CREATE TABLE users (id INTEGER, name TEXT, meta BLOB);
         INSERT INTO users VALUES (1, 'ann', CAST('{\"age\":30}' AS BLOB));",
    )
    .unwrap();
    path
}

// ---------------------------------------------------------------------------
// dump
// ---------------------------------------------------------------------------

#[test]
fn dump_writes_table_json_in_working_dir() {
    let dir = TempDir::new().unwrap();
    write_users_db(&dir);

    let output = run(dir.path(), &["dump", "--file=app.db", "--table=users"]);
    assert!(output.status.success(), "{output:?}");

    let dumped: Value =
        serde_json::from_slice(&fs::read(dir.path().join("users.json")).unwrap()).unwrap();
    assert_eq!(dumped, json!([{"id": 1, "name": "ann", "meta": {"age": 30}}]));
}

#[test]
fn dump_missing_flag_prints_usage() {
    let dir = TempDir::new().unwrap();

    let output = run(dir.path(), &["dump", "--file=app.db"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("--table"), "{stderr}");
    assert!(stderr.contains("Usage"), "{stderr}");
    assert!(!dir.path().join("app.db").exists(), "no database access on usage errors");
}

#[test]
fn dump_unknown_table_exits_nonzero() {
    let dir = TempDir::new().unwrap();
    write_users_db(&dir);

    let output = run(dir.path(), &["dump", "--file=app.db", "--table=nope"]);
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.starts_with("error: "), "{stderr}");
    assert!(!dir.path().join("nope.json").exists());
}

// ---------------------------------------------------------------------------
// edit
// ---------------------------------------------------------------------------

#[test]
fn edit_writes_staged_copy() {
    let dir = TempDir::new().unwrap();
    let db = write_users_db(&dir);
    let original = fs::read(&db).unwrap();
    fs::write(
        dir.path().join("in.json"),
        r#"[{"id": 2, "name": "bo", "meta": {"age": 40}}]"#,
    )
    .unwrap();

    let output = run(
        dir.path(),
        &["edit", "--file=app.db", "--table=users", "--json=in.json"],
    );
    assert!(output.status.success(), "{output:?}");
    assert_eq!(fs::read(&db).unwrap(), original);

    let staged = Connection::open(dir.path().join("generated").join("app.db")).unwrap();
    let rows: Vec<(i64, String, Vec<u8>)> = staged
        .prepare("SELECT id, name, meta FROM users")
        .unwrap()
        .query_map([], |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?)))
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(rows, vec![(2, "bo".to_string(), br#"{"age":40}"#.to_vec())]);
}

#[test]
fn edit_missing_json_flag_prints_usage() {
    let dir = TempDir::new().unwrap();
    write_users_db(&dir);

    let output = run(dir.path(), &["edit", "--file=app.db", "--table=users"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("--json"));
    assert!(!dir.path().join("generated").exists());
}

#[test]
fn edit_malformed_json_exits_nonzero() {
    let dir = TempDir::new().unwrap();
    write_users_db(&dir);
    fs::write(dir.path().join("in.json"), "not json").unwrap();

    let output = run(
        dir.path(),
        &["edit", "--file=app.db", "--table=users", "--json=in.json"],
    );
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn no_subcommand_prints_usage() {
    let dir = TempDir::new().unwrap();
    let output = run(dir.path(), &[]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("dump") && stderr.contains("edit"), "{stderr}");
}
