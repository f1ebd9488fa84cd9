#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use std::env;
use std::fs;
use std::path::PathBuf;

pub fn wl() -> Command {
    cargo_bin_cmd!("weldlog")
}

/// Create a unique test DB path inside the system temp dir and remove any existing file
pub fn setup_test_db(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_weldlog.sqlite", name));
    let db_path = path.to_string_lossy().to_string();
    fs::remove_file(&db_path).ok();
    db_path
}

/// Initialize the DB through the CLI without touching the user config
pub fn init_db(db_path: &str) {
    wl().args(["--db", db_path, "--test", "init"])
        .assert()
        .success();
}

/// Init, then add welder #1 "Ivanov" and record #1 (ХТ637 ×3, 30h)
pub fn init_db_with_record(db_path: &str) {
    init_db(db_path);

    wl().args(["--db", db_path, "welder", "add", "Ivanov"])
        .assert()
        .success();

    wl().args([
        "--db", db_path, "record", "add", "--welder", "1", "--article", "ХТ637", "-q", "3",
        "--hours", "30",
    ])
    .assert()
    .success();
}
