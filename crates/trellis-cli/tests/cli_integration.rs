use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::{json, Value};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::{tempdir, TempDir};

fn trellis() -> Command {
    let mut cmd = Command::cargo_bin("trellis").unwrap();
    cmd.env_remove("TRELLIS_FILE")
        .env_remove("TRELLIS_DEBUG_LOG")
        .env_remove("RUST_LOG");
    cmd
}

fn parse_json_output(output: &[u8]) -> Value {
    serde_json::from_slice(output).expect("Failed to parse JSON output")
}

fn parse_json_lines(output: &[u8]) -> Vec<Value> {
    String::from_utf8_lossy(output)
        .lines()
        .map(|line| serde_json::from_str(line).expect("Failed to parse JSON line"))
        .collect()
}

fn fixture() -> (TempDir, PathBuf) {
    let dir = tempdir().unwrap();
    let file = dir.path().join("boards.json");
    let data = json!({
        "boards": [
            { "id": "b1", "name": "Board A", "short_link": "abcd1234", "short_url": "https://trellis.local/b/abcd1234" },
            { "id": "b2", "name": "Board B", "short_link": "efgh5678", "short_url": "https://trellis.local/b/efgh5678" }
        ],
        "lists": [
            { "id": "l1", "name": "Todo", "board_id": "b1" },
            { "id": "l2", "name": "Done", "board_id": "b1" }
        ],
        "cards": [
            {
                "id": "c1", "name": "Ship it", "board_id": "b1", "list_id": "l1",
                "short_link": "card0001", "short_url": "https://trellis.local/c/card0001",
                "position": 1.0
            }
        ],
        "labels": [
            { "id": "lb1", "board_id": "b1", "name": "bug", "color": "red" }
        ]
    });
    fs::write(&file, serde_json::to_vec_pretty(&data).unwrap()).unwrap();
    (dir, file)
}

fn run_ok(file: &Path, args: &[&str]) -> Value {
    let output = trellis()
        .arg("--file")
        .arg(file)
        .args(args)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let json = parse_json_output(&output);
    assert!(json["success"].as_bool().unwrap());
    json
}

mod navigation_tests {
    use super::*;

    #[test]
    fn test_ls_root_lists_boards() {
        let (_dir, file) = fixture();
        let json = run_ok(&file, &["ls", "/"]);
        assert_eq!(json["data"]["count"], 2);
        assert_eq!(json["data"]["items"][0]["name"], "Board A");
    }

    #[test]
    fn test_ls_list_shows_cards() {
        let (_dir, file) = fixture();
        let json = run_ok(&file, &["ls", "/Board A/Todo"]);
        assert_eq!(json["data"]["count"], 1);
        assert_eq!(json["data"]["items"][0]["id"], "c1");
    }

    #[test]
    fn test_cat_card_by_short_link() {
        let (_dir, file) = fixture();
        let json = run_ok(&file, &["cat", "/abcd1234/Todo/card0001"]);
        assert_eq!(json["data"]["name"], "Ship it");
    }

    #[test]
    fn test_cd_prints_new_location() {
        let (_dir, file) = fixture();
        let json = run_ok(&file, &["cd", "/Board A/Todo"]);
        assert_eq!(json["data"]["path"], "/Board A[abcd1234]/Todo");
    }

    #[test]
    fn test_missing_board_fails() {
        let (_dir, file) = fixture();
        let output = trellis()
            .arg("--file")
            .arg(&file)
            .args(["cat", "/Nope"])
            .assert()
            .failure()
            .code(1)
            .get_output()
            .stderr
            .clone();
        let json = parse_json_output(&output);
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "board not found: Nope");
    }

    #[test]
    fn test_file_from_env() {
        let (_dir, file) = fixture();
        trellis()
            .env("TRELLIS_FILE", &file)
            .args(["ls", "/"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Board B"));
    }

    #[test]
    fn test_missing_file_starts_empty() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("new.json");
        let json = run_ok(&file, &["ls", "/"]);
        assert_eq!(json["data"]["count"], 0);
        assert!(!file.exists());
    }
}

mod card_tests {
    use super::*;

    #[test]
    fn test_touch_persists_between_runs() {
        let (_dir, file) = fixture();
        let created = run_ok(&file, &["touch", "/Board A/Todo/Write docs", "first draft"]);
        assert_eq!(created["data"]["name"], "Write docs");
        assert_eq!(created["data"]["description"], "first draft");

        let json = run_ok(&file, &["ls", "/Board A/Todo"]);
        assert_eq!(json["data"]["count"], 2);
    }

    #[test]
    fn test_mv_then_rm() {
        let (_dir, file) = fixture();
        let moved = run_ok(&file, &["mv", "/Board A/Todo/Ship it", "/Board A/Done"]);
        assert_eq!(moved["data"]["list_id"], "l2");
        assert_eq!(run_ok(&file, &["ls", "/Board A/Todo"])["data"]["count"], 0);

        let archived = run_ok(&file, &["rm", "/Board A/Done/Ship it"]);
        assert_eq!(archived["data"]["closed"], true);
        assert_eq!(run_ok(&file, &["ls", "/Board A/Done"])["data"]["count"], 0);
    }

    #[test]
    fn test_edit_labels_and_comment() {
        let (_dir, file) = fixture();
        let edited = run_ok(
            &file,
            &["edit", "/Board A/Todo/Ship it", "--label", "bug", "--desc", "soon"],
        );
        assert_eq!(edited["data"]["labels"][0]["name"], "bug");
        assert_eq!(edited["data"]["description"], "soon");

        let comment = run_ok(&file, &["comment", "/Board A/Todo/Ship it", "on it"]);
        let comment_id = comment["data"]["id"].as_str().unwrap().to_string();

        let listed = run_ok(&file, &["ls", "/Board A/Todo/Ship it"]);
        assert_eq!(listed["data"]["count"], 1);
        let shown = run_ok(&file, &["cat", &format!("/Board A/Todo/Ship it/{}", comment_id)]);
        assert_eq!(shown["data"]["text"], "on it");
    }
}

mod repl_tests {
    use super::*;

    #[test]
    fn test_repl_keeps_session_between_lines() {
        let (_dir, file) = fixture();
        let output = trellis()
            .arg("--file")
            .arg(&file)
            .write_stdin("cd 'Board A'\nls\ncd Todo\npwd\ncomplete S\n")
            .assert()
            .success()
            .get_output()
            .stdout
            .clone();

        let lines = parse_json_lines(&output);
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[1]["data"]["count"], 2);
        assert_eq!(lines[3]["data"]["path"], "/Board A[abcd1234]/Todo");
        assert_eq!(lines[4]["data"]["items"][0], "Ship it[card0001]");
    }

    #[test]
    fn test_repl_reports_errors_and_continues() {
        let (_dir, file) = fixture();
        let assert = trellis()
            .arg("--file")
            .arg(&file)
            .arg("--no-cache")
            .write_stdin("cd /Nope\ncd '/Board A/Todo/Ship it'\nexit\nls /\n")
            .assert()
            .success();
        let output = assert.get_output();

        assert!(output.stdout.is_empty());
        let errors = parse_json_lines(&output.stderr);
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0]["error"], "board not found: Nope");
        assert!(errors[1]["error"]
            .as_str()
            .unwrap()
            .starts_with("Unsupported"));
    }
}

#[test]
fn test_completions_generate() {
    trellis()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("trellis"));
}
