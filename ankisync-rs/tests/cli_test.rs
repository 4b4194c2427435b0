//! Integration tests for the ankisync CLI against temporary vaults.

use serde_json::Value;
use std::fs;
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

/// Create a vault holding `files`, plus a config file that disables the
/// request delay and points at an address nothing listens on.
fn setup_vault(files: &[(&str, &str)]) -> TempDir {
    let dir = TempDir::new().unwrap();
    let vault = dir.path().join("vault");
    fs::create_dir(&vault).unwrap();
    for (path, content) in files {
        let full = vault.join(path);
        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(full, content).unwrap();
    }
    fs::write(
        dir.path().join("config.toml"),
        "request_delay_ms = 0\nendpoint = \"http://127.0.0.1:9\"\ntimeout_secs = 2\n",
    )
    .unwrap();
    dir
}

/// Run the ankisync CLI and return stdout, stderr and the exit code.
fn run_ankisync(dir: &Path, args: &[&str]) -> (String, String, i32) {
    let binary = env!("CARGO_BIN_EXE_ankisync");

    let output = Command::new(binary)
        .arg("--vault")
        .arg(dir.join("vault"))
        .arg("--config")
        .arg(dir.join("config.toml"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute ankisync");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

fn scenario() -> TempDir {
    setup_vault(&[
        ("Start.md", "#todo some text [[Other Note|See this]] ![[diagram.png]]"),
        ("Other Note.md", "---\ntags: [reference]\n---\nBack to [[Start]]."),
        ("Unlinked.md", "Nobody links here."),
    ])
}

mod sync_command {
    use super::*;

    #[test]
    fn sync_dry_run_follows_links() {
        let dir = scenario();
        let (stdout, _, code) = run_ankisync(dir.path(), &["sync", "Start", "--dry-run"]);
        assert_eq!(code, 0);

        let report: Value = serde_json::from_str(&stdout).unwrap();
        assert_eq!(report["tally"]["succeeded"], 2);
        assert_eq!(report["tally"]["failed"], 0);
        assert_eq!(report["visited"], 2);
        assert_eq!(report["levels"], 2);

        let notes = report["notes"].as_array().unwrap();
        assert_eq!(notes[0]["note"], "Start");
        assert_eq!(notes[0]["depth"], 0);
        assert_eq!(notes[0]["sync"]["action"], "created");
        assert_eq!(notes[1]["note"], "Other Note");
        assert_eq!(notes[1]["front"], "Other Note");
    }

    #[test]
    fn sync_prefix_and_yaml_output() {
        let dir = scenario();
        let (stdout, _, code) = run_ankisync(
            dir.path(),
            &["--yaml", "sync", "Start", "--dry-run", "--prefix", "topic::"],
        );
        assert_eq!(code, 0);
        assert!(stdout.contains("succeeded: 2"));
        assert!(stdout.contains("topic::Start"));
    }

    #[test]
    fn sync_all_seeds_every_note() {
        let dir = scenario();
        let (stdout, _, code) = run_ankisync(dir.path(), &["sync", "--all", "--dry-run"]);
        assert_eq!(code, 0);

        let report: Value = serde_json::from_str(&stdout).unwrap();
        assert_eq!(report["tally"]["succeeded"], 3);
        assert_eq!(report["levels"], 1);
    }

    #[test]
    fn sync_missing_link_exits_with_failures() {
        let dir = setup_vault(&[("Start.md", "See [[Ghost]]")]);
        let (stdout, stderr, code) = run_ankisync(dir.path(), &["sync", "Start", "--dry-run"]);
        assert_eq!(code, 10);
        assert!(stderr.contains("Ghost"));

        let report: Value = serde_json::from_str(&stdout).unwrap();
        assert_eq!(report["tally"]["succeeded"], 1);
        assert_eq!(report["tally"]["failed"], 1);
        assert_eq!(report["notes"][1]["outcome"], "failed");
    }

    #[test]
    fn sync_skip_tag_is_skipped() {
        let dir = setup_vault(&[("Start.md", "[[Private]]"), ("Private.md", "#not_included secret")]);
        let (stdout, _, code) = run_ankisync(dir.path(), &["sync", "Start", "--dry-run"]);
        assert_eq!(code, 0);

        let report: Value = serde_json::from_str(&stdout).unwrap();
        assert_eq!(report["tally"]["skipped"], 1);
        assert_eq!(report["notes"][1]["sync"]["action"], "skipped_by_tag");
    }

    #[test]
    fn sync_without_seeds() {
        let dir = scenario();
        let (_, stderr, code) = run_ankisync(dir.path(), &["sync", "--dry-run"]);
        assert_eq!(code, 4);
        assert!(stderr.contains("seed"));
    }

    #[test]
    fn sync_missing_vault() {
        let dir = scenario();
        fs::remove_dir_all(dir.path().join("vault")).unwrap();
        let (_, stderr, code) = run_ankisync(dir.path(), &["sync", "Start", "--dry-run"]);
        assert_eq!(code, 3);
        assert!(stderr.contains("Vault not found"));
    }

    #[test]
    fn sync_unreachable_store() {
        let dir = scenario();
        let (stdout, _, code) = run_ankisync(dir.path(), &["sync", "Start"]);
        assert_eq!(code, 5);
        assert!(stdout.is_empty());
    }

    #[test]
    fn quiet_suppresses_error_message() {
        let dir = scenario();
        let (_, stderr, code) = run_ankisync(dir.path(), &["-q", "sync", "--dry-run"]);
        assert_eq!(code, 4);
        assert!(stderr.is_empty());
    }
}

mod preview_command {
    use super::*;

    #[test]
    fn preview_shows_card() {
        let dir = scenario();
        let (stdout, _, code) = run_ankisync(dir.path(), &["preview", "start"]);
        assert_eq!(code, 0);

        let preview: Value = serde_json::from_str(&stdout).unwrap();
        assert_eq!(preview["front"], "Start");
        assert_eq!(preview["tags"], serde_json::json!(["todo"]));
        assert_eq!(preview["links"], serde_json::json!(["Other Note"]));
        assert_eq!(preview["skip"], false);
        let back = preview["back"].as_str().unwrap();
        assert!(back.contains("<ins>See this</ins>"));
        assert!(back.contains("[image]"));
        assert!(!back.contains("diagram.png"));
    }

    #[test]
    fn preview_frontmatter_tags() {
        let dir = scenario();
        let (stdout, _, code) = run_ankisync(dir.path(), &["preview", "Other Note.md"]);
        assert_eq!(code, 0);

        let preview: Value = serde_json::from_str(&stdout).unwrap();
        assert_eq!(preview["tags"], serde_json::json!(["reference"]));
        assert!(!preview["back"].as_str().unwrap().contains("tags:"));
    }

    #[test]
    fn preview_not_found() {
        let dir = scenario();
        let (_, stderr, code) = run_ankisync(dir.path(), &["preview", "Nonexistent"]);
        assert_eq!(code, 2);
        assert!(stderr.contains("not found"));
    }
}

mod check_command {
    use super::*;

    #[test]
    fn check_unreachable_store() {
        let dir = scenario();
        let (_, stderr, code) = run_ankisync(dir.path(), &["check"]);
        assert_eq!(code, 5);
        assert!(stderr.contains("Store unreachable"));
    }
}
