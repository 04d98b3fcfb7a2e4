// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

// Allow unused items: test helpers are shared across multiple test binaries,
// and not every test file uses every helper.
#![allow(dead_code)]
#![allow(unused_imports)]

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;

pub use predicates::prelude::*;
pub use tempfile::TempDir;

pub fn dete() -> Command {
    cargo_bin_cmd!("dete")
}

/// Run `dete` in `temp` with `args` and return the command for assertions.
pub fn dete_in(temp: &TempDir, args: &[&str]) -> Command {
    let mut cmd = dete();
    cmd.args(args).current_dir(temp.path());
    cmd
}

/// Helper to create an initialized local-only temp directory
pub fn init_temp() -> TempDir {
    let temp = TempDir::new().unwrap();
    dete().arg("init").current_dir(temp.path()).assert().success();
    temp
}

/// Register a user with `profile` (named after it, password "secret").
pub fn add_user(temp: &TempDir, profile: &str) {
    dete_in(
        temp,
        &[
            "user",
            "add",
            profile,
            "--email",
            &format!("{profile}@dete.test"),
            "-p",
            "secret",
            "--profile",
            profile,
        ],
    )
    .assert()
    .success();
}

/// Log in as the user created by [`add_user`].
pub fn login(temp: &TempDir, profile: &str) {
    dete_in(temp, &["login", profile, "-p", "secret"])
        .assert()
        .success();
}

/// Initialized workspace with an admin signed in.
pub fn init_as_admin() -> TempDir {
    let temp = init_temp();
    add_user(&temp, "admin");
    login(&temp, "admin");
    temp
}

/// Create a record and return its id.
pub fn create_record(temp: &TempDir, table: &str, assignments: &[&str]) -> i64 {
    let mut args = vec!["add", table];
    args.extend_from_slice(assignments);
    args.extend_from_slice(&["-o", "json"]);
    let output = dete_in(temp, &args).output().unwrap();
    assert!(output.status.success(), "{:?}", output);
    let record: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    record["id"].as_i64().unwrap()
}
