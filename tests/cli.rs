// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Smoke tests for the `airshower` binary, driven end to end through a
//! run descriptor input and a jsonl output directory.

use std::fs;
use std::io::{BufRead, BufReader};

use assert_cmd::Command;
use tempfile::tempdir;

fn airshower() -> Command {
    Command::cargo_bin("airshower").unwrap()
}

#[test]
fn processes_a_run_descriptor_and_writes_jsonl_output() {
    let dir = tempdir().unwrap();
    let input_path = dir.path().join("run.json");
    fs::write(&input_path, r#"{"n_telescopes": 2, "n_events": 3, "n_samples": 32}"#).unwrap();
    let output_path = dir.path().join("out");

    airshower()
        .arg("-i")
        .arg(&input_path)
        .arg("-o")
        .arg(&output_path)
        .assert()
        .success();

    let dl1_path = output_path.join("events/dl1.jsonl");
    let lines: Vec<String> = BufReader::new(fs::File::open(dl1_path).unwrap())
        .lines()
        .map(|l| l.unwrap())
        .collect();
    assert_eq!(lines.len(), 3);
}

#[test]
fn mismatched_input_output_counts_fail_with_a_clear_message() {
    let dir = tempdir().unwrap();
    let input_path = dir.path().join("run.json");
    fs::write(&input_path, "{}").unwrap();

    let output = airshower()
        .arg("-i")
        .arg(&input_path)
        .arg("-i")
        .arg(&input_path)
        .arg("-o")
        .arg(dir.path().join("out"))
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(
        stderr.contains("-i and -o must be given the same number of times"),
        "unexpected stderr: {stderr}"
    );
}

#[test]
fn an_unreadable_input_path_is_skipped_and_the_process_exits_nonzero() {
    let dir = tempdir().unwrap();

    airshower()
        .arg("-i")
        .arg(dir.path().join("does-not-exist.json"))
        .arg("-o")
        .arg(dir.path().join("out"))
        .assert()
        .failure();
}
