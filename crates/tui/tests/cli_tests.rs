// Ooga Workbench - Debug visualization for ooga-lang programs
// Copyright (C) 2024 Zhuo Zhang and Wuqi Zhang
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::json;
use tempfile::TempDir;
use tracing::info;

fn write_fixtures(dir: &TempDir) -> (std::path::PathBuf, std::path::PathBuf) {
    let config = dir.path().join("ooga.toml");
    std::fs::write(&config, "[service]\nurl = \"http://127.0.0.1:9\"\ntimeout_secs = 1\n").unwrap();

    let response = dir.path().join("response.json");
    let body = json!({
        "success": true,
        "output": "",
        "heaps": [
            [{"address": 5, "tag": "Pair", "size": 3, "value": null, "children": [6], "parents": []},
             {"address": 6, "tag": "Number", "size": 1, "value": 1, "children": [], "parents": [5]}],
            []
        ],
        "stacks": [
            {"threads": [{"os": [{"address": 6, "value": 1, "raw": "0x01"}], "rts": []}], "currentThread": 0},
            {"threads": [], "currentThread": null}
        ]
    });
    std::fs::write(&response, body.to_string()).unwrap();

    (config, response)
}

#[test]
fn test_help_command() {
    ooga_common::logging::ensure_test_logging(None);
    info!("Testing CLI help command");

    let mut cmd = Command::cargo_bin("ooga-tui").unwrap();
    cmd.arg("--help").assert().success().stdout(predicate::str::contains("ooga-lang"));
}

#[test]
fn test_version_command() {
    ooga_common::logging::ensure_test_logging(None);
    info!("Running test");
    let mut cmd = Command::cargo_bin("ooga-tui").unwrap();
    cmd.arg("--version").assert().success().stdout(predicate::str::contains("ooga-tui"));
}

#[test]
fn test_dump_saved_response() {
    ooga_common::logging::ensure_test_logging(None);
    info!("Running test");
    let dir = TempDir::new().unwrap();
    let (config, response) = write_fixtures(&dir);

    let mut cmd = Command::cargo_bin("ooga-tui").unwrap();
    cmd.arg("--config")
        .arg(&config)
        .arg("--response")
        .arg(&response)
        .arg("--dump")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"breakpoints\": 2"))
        .stdout(predicate::str::contains("\"source\": 5"))
        .stdout(predicate::str::contains("Thread 0 (Current)"));
}

#[test]
fn test_dump_clamps_breakpoint() {
    ooga_common::logging::ensure_test_logging(None);
    info!("Running test");
    let dir = TempDir::new().unwrap();
    let (config, response) = write_fixtures(&dir);

    let mut cmd = Command::cargo_bin("ooga-tui").unwrap();
    cmd.arg("--config")
        .arg(&config)
        .arg("--response")
        .arg(&response)
        .args(["--dump", "--breakpoint", "7"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"breakpoint\": 1"));
}

#[test]
fn test_dump_unreachable_service_is_empty_state() {
    ooga_common::logging::ensure_test_logging(None);
    info!("Running test");
    let dir = TempDir::new().unwrap();
    let (config, _) = write_fixtures(&dir);
    let source = dir.path().join("main.ooga");
    std::fs::write(&source, "display(1);").unwrap();

    let mut cmd = Command::cargo_bin("ooga-tui").unwrap();
    cmd.arg("--config")
        .arg(&config)
        .arg("--file")
        .arg(&source)
        .arg("--dump")
        .assert()
        .success()
        .stdout(predicate::str::contains("Unable to call the ooga-lang service"))
        .stdout(predicate::str::contains("\"breakpoints\": 0"));
}

#[test]
fn test_dump_without_input_fails() {
    ooga_common::logging::ensure_test_logging(None);
    info!("Running test");
    let dir = TempDir::new().unwrap();
    let (config, _) = write_fixtures(&dir);

    let mut cmd = Command::cargo_bin("ooga-tui").unwrap();
    cmd.arg("--config").arg(&config).arg("--dump").assert().failure();
}
