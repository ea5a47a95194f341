//! Integration tests for the abloop CLI

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

use crate::helpers::{run_abloop, OTHER_VIDEO, VIDEO};

fn abloop(temp: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("abloop").unwrap();
    cmd.env("ABLOOP_CONFIG", temp.path().join("config.toml"))
        .env_remove("RUST_LOG");
    cmd
}

fn store_arg(dir: &Path) -> String {
    dir.join("store").display().to_string()
}

/// Ids of the listed sections, in display order.
fn listed_ids(stdout: &str) -> Vec<String> {
    stdout
        .lines()
        .filter_map(|line| {
            let start = line.rfind('[')?;
            Some(line[start + 1..line.len() - 1].to_string())
        })
        .collect()
}

// ============================================================================
// Help and resolve
// ============================================================================

#[test]
fn help_lists_subcommands() {
    let temp = TempDir::new().unwrap();
    let (stdout, _stderr, exit_code) = run_abloop(temp.path(), &["--help"]);
    assert_eq!(exit_code, 0);
    for sub in ["resolve", "sections", "export", "import", "simulate", "config"] {
        assert!(stdout.contains(sub), "missing {}", sub);
    }
}

#[test]
fn resolve_prints_id_and_fragment() {
    let temp = TempDir::new().unwrap();
    abloop(&temp)
        .args(["resolve", "https://www.youtube.com/shorts/dQw4w9WgXcQ"])
        .assert()
        .success()
        .stdout("dQw4w9WgXcQ\n#dQw4w9WgXcQ\n");
}

#[test]
fn resolve_rejects_unrecognized_input() {
    let temp = TempDir::new().unwrap();
    abloop(&temp)
        .args(["resolve", "https://example.com/video"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Please enter a valid YouTube URL"));
}

// ============================================================================
// Sections
// ============================================================================

#[test]
fn sections_crud_round_trip() {
    let temp = TempDir::new().unwrap();
    let store = store_arg(temp.path());

    for (start, end, name) in [("0:00", "0:12", "Intro"), ("1:00", "1:15", "Solo")] {
        abloop(&temp)
            .args(["sections", "add", VIDEO, "--start", start, "--end", end, "--name", name])
            .args(["--store", &store])
            .assert()
            .success()
            .stdout(predicate::str::starts_with(format!("Added {}", name)));
    }
    abloop(&temp)
        .args(["sections", "add", VIDEO, "--start", "2:00", "--end", "2:30"])
        .args(["--store", &store])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added Section 3"));

    let (stdout, _, code) =
        run_abloop(temp.path(), &["sections", "list", VIDEO, "--store", &store]);
    assert_eq!(code, 0);
    assert!(stdout.contains("0:00 - 0:12  Intro"));
    let ids = listed_ids(&stdout);
    assert_eq!(ids.len(), 3);

    abloop(&temp)
        .args(["sections", "move", VIDEO, "0", "2", "--store", &store])
        .assert()
        .success();
    abloop(&temp)
        .args(["sections", "rename", VIDEO, &ids[1], "Guitar solo", "--store", &store])
        .assert()
        .success();
    abloop(&temp)
        .args(["sections", "remove", VIDEO, &ids[2], "--store", &store])
        .assert()
        .success()
        .stdout("Removed Section 3\n");

    let (stdout, _, _) = run_abloop(temp.path(), &["sections", "list", VIDEO, "--store", &store]);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].contains("Guitar solo"));
    assert!(lines[1].contains("Intro"));

    abloop(&temp)
        .args(["sections", "videos", "--store", &store])
        .assert()
        .success()
        .stdout(predicate::str::diff(format!("{}\n", VIDEO)));
}

#[test]
fn add_rejects_empty_interval() {
    let temp = TempDir::new().unwrap();
    abloop(&temp)
        .args(["sections", "add", VIDEO, "--start", "10", "--end", "10"])
        .args(["--store", &store_arg(temp.path())])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Cannot save an empty interval"));
}

#[test]
fn list_without_sections_says_so() {
    let temp = TempDir::new().unwrap();
    abloop(&temp)
        .args(["sections", "list", VIDEO, "--store", &store_arg(temp.path())])
        .assert()
        .success()
        .stdout(predicate::str::diff(format!("No sections saved for {}\n", VIDEO)));
}

// ============================================================================
// Export / import
// ============================================================================

#[test]
fn export_then_import_into_fresh_store() {
    let temp = TempDir::new().unwrap();
    let store = store_arg(temp.path());
    abloop(&temp)
        .args(["sections", "add", VIDEO, "--start", "5", "--end", "9", "--name", "Riff"])
        .args(["--store", &store])
        .assert()
        .success();

    abloop(&temp)
        .args(["export", VIDEO, "--output"])
        .arg(temp.path())
        .args(["--store", &store])
        .assert()
        .success()
        .stdout(predicate::str::contains("Exported 1 section(s)"));
    let exported = temp.path().join(format!("ytlooper-sections-{}.json", VIDEO));
    let json = fs::read_to_string(&exported).unwrap();
    assert!(json.contains("\"startTime\": 5.0"));

    let other_store = temp.path().join("other").display().to_string();
    abloop(&temp)
        .arg("import")
        .arg(&exported)
        .args(["--store", &other_store])
        .assert()
        .success()
        .stdout("Merged 1 new section(s), skipped 0 duplicate(s)\n");

    // Same file again, naming the video explicitly
    abloop(&temp)
        .arg("import")
        .arg(&exported)
        .args(["--video", VIDEO, "--store", &other_store])
        .assert()
        .success()
        .stdout("Merged 0 new section(s), skipped 1 duplicate(s)\n");
}

#[test]
fn import_without_video_flag_keeps_stored_sections() {
    let temp = TempDir::new().unwrap();
    let store = store_arg(temp.path());
    abloop(&temp)
        .args(["sections", "add", VIDEO, "--start", "5", "--end", "9", "--name", "Riff"])
        .args(["--store", &store])
        .assert()
        .success();

    let file = temp.path().join("new.json");
    fs::write(
        &file,
        format!(
            r#"{{"videoId":"{}","sections":[{{"name":"Solo","startTime":60,"endTime":70}}]}}"#,
            VIDEO
        ),
    )
    .unwrap();
    abloop(&temp)
        .arg("import")
        .arg(&file)
        .args(["--store", &store])
        .assert()
        .success()
        .stdout("Merged 1 new section(s), skipped 0 duplicate(s)\n");

    let (stdout, _, code) =
        run_abloop(temp.path(), &["sections", "list", VIDEO, "--store", &store]);
    assert_eq!(code, 0);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].contains("Riff"));
    assert!(lines[1].contains("1:00 - 1:10  Solo"));
}

#[test]
fn import_for_another_video_replaces_that_list() {
    let temp = TempDir::new().unwrap();
    let store = store_arg(temp.path());
    abloop(&temp)
        .args(["sections", "add", OTHER_VIDEO, "--start", "1", "--end", "2", "--name", "Old"])
        .args(["--store", &store])
        .assert()
        .success();

    let file = temp.path().join("other.json");
    fs::write(
        &file,
        format!(
            r#"{{"videoId":"{}","sections":[{{"name":"New","startTime":3,"endTime":4}}]}}"#,
            OTHER_VIDEO
        ),
    )
    .unwrap();
    abloop(&temp)
        .arg("import")
        .arg(&file)
        .args(["--video", VIDEO, "--store", &store])
        .assert()
        .success()
        .stdout(predicate::str::diff(format!("Imported 1 section(s) for {}\n", OTHER_VIDEO)));

    abloop(&temp)
        .args(["sections", "list", OTHER_VIDEO, "--store", &store])
        .assert()
        .success()
        .stdout(predicate::str::contains("New").and(predicate::str::contains("Old").not()));
}

#[test]
fn export_without_sections_writes_nothing() {
    let temp = TempDir::new().unwrap();
    abloop(&temp)
        .args(["export", VIDEO, "--output"])
        .arg(temp.path())
        .args(["--store", &store_arg(temp.path())])
        .assert()
        .success()
        .stdout(predicate::str::contains("No sections to export"));
    assert!(!temp
        .path()
        .join(format!("ytlooper-sections-{}.json", VIDEO))
        .exists());
}

#[test]
fn invalid_import_fails_and_changes_nothing() {
    let temp = TempDir::new().unwrap();
    let store = store_arg(temp.path());
    abloop(&temp)
        .args(["sections", "add", OTHER_VIDEO, "--start", "1", "--end", "2", "--name", "Keep"])
        .args(["--store", &store])
        .assert()
        .success();

    let file = temp.path().join("bad.json");
    fs::write(
        &file,
        format!(
            r#"{{"videoId":"{}","sections":[{{"name":"Bad","startTime":4,"endTime":3}}]}}"#,
            OTHER_VIDEO
        ),
    )
    .unwrap();
    abloop(&temp)
        .arg("import")
        .arg(&file)
        .args(["--video", OTHER_VIDEO, "--store", &store])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid data"));

    abloop(&temp)
        .args(["sections", "list", OTHER_VIDEO, "--store", &store])
        .assert()
        .success()
        .stdout(predicate::str::contains("Keep").and(predicate::str::contains("Bad").not()));
}

#[test]
fn import_without_any_video_is_refused() {
    let temp = TempDir::new().unwrap();
    let file = temp.path().join("anon.json");
    fs::write(&file, r#"{"sections":[{"name":"x","startTime":0,"endTime":1}]}"#).unwrap();
    abloop(&temp)
        .arg("import")
        .arg(&file)
        .args(["--store", &store_arg(temp.path())])
        .assert()
        .failure()
        .stderr(predicate::str::contains("pass --video"));
}

// ============================================================================
// Simulate, config, completions
// ============================================================================

#[test]
fn simulate_reports_loop_seeks() {
    let temp = TempDir::new().unwrap();
    abloop(&temp)
        .args(["simulate", VIDEO, "--duration", "60", "-a", "1", "-b", "2"])
        .args(["--seconds", "6", "--time-scale", "5"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Looping dQw4w9WgXcQ from 0:01 to 0:02 at 1x")
                .and(predicate::str::contains("loop at 0:02 -> 0:01"))
                .and(predicate::str::contains("loop seek(s)")),
        );
}

#[test]
fn simulate_rejects_rate_off_ladder() {
    let temp = TempDir::new().unwrap();
    abloop(&temp)
        .args(["simulate", VIDEO, "--duration", "60", "-a", "1", "-b", "2", "--rate", "3"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not supported"));
}

#[test]
fn config_show_prints_defaults() {
    let temp = TempDir::new().unwrap();
    abloop(&temp)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("[playback]")
                .and(predicate::str::contains("poll_interval_ms = 100"))
                .and(predicate::str::contains("storage_prefix = \"ytlooper_sections_\"")),
        );
}

#[test]
fn config_file_changes_export_prefix() {
    let temp = TempDir::new().unwrap();
    fs::write(
        temp.path().join("config.toml"),
        "[sections]\nexport_prefix = \"loops\"\n",
    )
    .unwrap();
    let store = store_arg(temp.path());
    abloop(&temp)
        .args(["sections", "add", VIDEO, "--start", "1", "--end", "2", "--store", &store])
        .assert()
        .success();
    abloop(&temp)
        .args(["export", VIDEO, "--output"])
        .arg(temp.path())
        .args(["--store", &store])
        .assert()
        .success();
    assert!(temp.path().join(format!("loops-{}.json", VIDEO)).exists());
}

#[test]
fn completions_generate_for_bash() {
    let temp = TempDir::new().unwrap();
    abloop(&temp)
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("abloop"));
}
