use predicates::str::contains;
use std::fs;
use std::path::Path;

mod common;
use common::{rsl, setup_test_dir, touch_raw};

fn dir_arg(dir: &Path) -> String {
    dir.to_string_lossy().to_string()
}

#[test]
fn test_init_creates_data_dir() {
    let home = setup_test_dir("cli_init");
    let data = home.join("data");

    rsl(&home)
        .args(["--dir", &dir_arg(&data), "--test", "init"])
        .assert()
        .success()
        .stdout(contains("initialization completed"));

    assert!(data.is_dir());
    assert!(!home.join(".rsensorlog").join("rsensorlog.conf").exists());
}

#[test]
fn test_recording_flow_writes_sidecar() {
    let home = setup_test_dir("cli_flow");
    let data = dir_arg(&home);
    touch_raw(&home, "walk.csv", 16);

    rsl(&home)
        .args(["--dir", &data, "--test", "start"])
        .assert()
        .success()
        .stdout(contains("Recording started"));

    rsl(&home)
        .args(["--dir", &data, "--test", "toggle", "Walking", "--file", "walk.csv"])
        .assert()
        .success()
        .stdout(contains("Started 'Walking'"));

    rsl(&home)
        .args(["--dir", &data, "--test", "status"])
        .assert()
        .success()
        .stdout(contains("Walking"));

    rsl(&home)
        .args(["--dir", &data, "--test", "toggle", "Walking", "--file", "walk.csv"])
        .assert()
        .success()
        .stdout(contains("Stopped 'Walking'"))
        .stdout(contains("1 segment(s) saved for walk.csv"));

    assert!(home.join("walk.segments.json").exists());

    rsl(&home)
        .args(["--dir", &data, "--test", "segments", "list", "walk.csv", "--totals"])
        .assert()
        .success()
        .stdout(contains("Walking"));

    rsl(&home)
        .args(["--dir", &data, "--test", "stop", "--file", "walk.csv"])
        .assert()
        .success()
        .stdout(contains("Recording stopped"));

    rsl(&home)
        .args(["--dir", &data, "--test", "status"])
        .assert()
        .success()
        .stdout(contains("Idle"));
}

#[test]
fn test_toggle_defaults_to_newest_raw_file() {
    let home = setup_test_dir("cli_newest");
    let data = dir_arg(&home);
    touch_raw(&home, "only.bin", 4);

    rsl(&home).args(["--dir", &data, "--test", "start"]).assert().success();
    rsl(&home)
        .args(["--dir", &data, "--test", "toggle", "Sitting"])
        .assert()
        .success()
        .stdout(contains("saved for only.bin"));

    assert!(home.join("only.segments.json").exists());
}

#[test]
fn test_toggle_while_idle_is_a_warning() {
    let home = setup_test_dir("cli_idle_toggle");
    let data = dir_arg(&home);
    touch_raw(&home, "walk.csv", 4);

    rsl(&home)
        .args(["--dir", &data, "--test", "toggle", "Walking", "--file", "walk.csv"])
        .assert()
        .success()
        .stdout(contains("No recording in progress"));

    rsl(&home)
        .args(["--dir", &data, "--test", "stop"])
        .assert()
        .success()
        .stdout(contains("No recording in progress"));

    assert!(!home.join("walk.segments.json").exists());
}

#[test]
fn test_segments_add_list_delete_clear() {
    let home = setup_test_dir("cli_segments");
    let data = dir_arg(&home);

    rsl(&home)
        .args([
            "--dir", &data, "--test", "segments", "add", "run.csv", "--start", "1.5", "--end",
            "4", "--tag", "Running", "--tag", "Outdoor",
        ])
        .assert()
        .success()
        .stdout(contains("Added segment"));

    rsl(&home)
        .args(["--dir", &data, "--test", "segments", "list", "run.csv", "--tag", "Outdoor"])
        .assert()
        .success()
        .stdout(contains("Running"));

    rsl(&home)
        .args(["--dir", &data, "--test", "segments", "list", "run.csv", "--tag", "outdoor"])
        .assert()
        .success()
        .stdout(contains("No segments for run.csv"));

    rsl(&home)
        .args(["--dir", &data, "--test", "segments", "delete", "run.csv", "--id", "nope"])
        .assert()
        .success()
        .stdout(contains("No segment nope"));

    rsl(&home)
        .args(["--dir", &data, "--test", "segments", "clear", "run.csv"])
        .assert()
        .success()
        .stdout(contains("Removed all segments"));

    assert!(!home.join("run.segments.json").exists());
}

#[test]
fn test_segments_add_rejects_inverted_range() {
    let home = setup_test_dir("cli_segments_range");

    rsl(&home)
        .args([
            "--dir", &dir_arg(&home), "--test", "segments", "add", "run.csv", "--start", "9",
            "--end", "3", "--tag", "Running",
        ])
        .assert()
        .failure()
        .stderr(contains("Invalid time range"));
}

#[test]
fn test_export_csv() {
    let home = setup_test_dir("cli_export");
    let data = dir_arg(&home);
    let out = home.join("out").join("segments.csv");

    rsl(&home)
        .args([
            "--dir", &data, "--test", "segments", "add", "walk.csv", "--start", "5", "--end",
            "12", "--tag", "Walking",
        ])
        .assert()
        .success();

    rsl(&home)
        .args(["--dir", &data, "--test", "export", "--file", &dir_arg(&out), "--force"])
        .assert()
        .success()
        .stdout(contains("CSV export completed"));

    let text = fs::read_to_string(&out).expect("exported csv");
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "filename,start_time,end_time,tag");
    assert_eq!(lines[1], "walk.csv,5.000,12.000,Walking");
}

#[test]
fn test_export_with_no_segments_writes_nothing() {
    let home = setup_test_dir("cli_export_empty");
    let out = home.join("segments.json");

    rsl(&home)
        .args([
            "--dir", &dir_arg(&home), "--test", "export", "--format", "json", "--file",
            &dir_arg(&out),
        ])
        .assert()
        .success()
        .stdout(contains("Nothing to export"));

    assert!(!out.exists());
}

#[test]
fn test_files_merges_manifest_and_local() {
    let home = setup_test_dir("cli_files");
    let data = dir_arg(&home);
    touch_raw(&home, "a.csv", 10);
    let manifest = home.join("manifest.json");
    fs::write(
        &manifest,
        r#"{ "device": "watch-01",
             "pendingFiles": [ { "name": "a.csv" }, { "name": "b.csv", "size": 64 } ] }"#,
    )
    .expect("manifest");

    rsl(&home)
        .args(["--dir", &data, "--test", "files", "--manifest", &dir_arg(&manifest)])
        .assert()
        .success()
        .stdout(contains("synced"))
        .stdout(contains("pending"))
        .stdout(contains("b.csv"));

    rsl(&home)
        .args([
            "--dir", &data, "--test", "files", "--manifest", &dir_arg(&manifest), "--request",
            "b.csv",
        ])
        .assert()
        .success()
        .stdout(contains("Requested b.csv"))
        .stdout(contains("transferring"));
}

#[test]
fn test_device_command_on_unreachable_link_fails() {
    let home = setup_test_dir("cli_device");
    let manifest = home.join("manifest.json");
    fs::write(&manifest, r#"{ "reachable": false }"#).expect("manifest");

    rsl(&home)
        .args([
            "--dir", &dir_arg(&home), "--test", "device", "--manifest", &dir_arg(&manifest),
            "sync",
        ])
        .assert()
        .failure()
        .stderr(contains("Remote link unavailable"));
}

#[test]
fn test_cleanup_all() {
    let home = setup_test_dir("cli_cleanup");
    let data = dir_arg(&home);
    touch_raw(&home, "a.csv", 1);
    touch_raw(&home, "b.dat", 1);
    touch_raw(&home, "keep.txt", 1);

    rsl(&home)
        .args(["--dir", &data, "--test", "cleanup", "--all", "--yes"])
        .assert()
        .success()
        .stdout(contains("Deleted 2 of 2 file(s)."));

    assert!(!home.join("a.csv").exists());
    assert!(!home.join("b.dat").exists());
    assert!(home.join("keep.txt").exists());
}

#[test]
fn test_cleanup_cancelled_without_confirmation() {
    let home = setup_test_dir("cli_cleanup_cancel");
    touch_raw(&home, "a.csv", 1);

    rsl(&home)
        .args(["--dir", &dir_arg(&home), "--test", "cleanup", "--file", "a.csv"])
        .write_stdin("n\n")
        .assert()
        .success()
        .stdout(contains("Cleanup cancelled"));

    assert!(home.join("a.csv").exists());
}

#[test]
fn test_config_print_and_check_without_file() {
    let home = setup_test_dir("cli_config");

    rsl(&home)
        .args(["--dir", &dir_arg(&home), "--test", "config", "--print", "--check"])
        .assert()
        .success()
        .stdout(contains("raw_extensions"))
        .stdout(contains("No configuration file"));
}

#[test]
fn test_stop_warns_when_final_segments_cannot_be_saved() {
    let home = setup_test_dir("cli_stop_blocked");
    let data = dir_arg(&home);
    fs::create_dir_all(home.join("rec.segments.json").join("occupied")).expect("block sidecar");

    rsl(&home).args(["--dir", &data, "--test", "start"]).assert().success();
    rsl(&home)
        .args(["--dir", &data, "--test", "toggle", "Running", "--no-file"])
        .assert()
        .success();

    rsl(&home)
        .args(["--dir", &data, "--test", "stop", "--file", "rec.csv"])
        .assert()
        .success()
        .stdout(contains("Final segments for rec.csv were not saved"));
}

#[test]
fn test_cleanup_file_outside_data_dir_is_refused() {
    let home = setup_test_dir("cli_cleanup_escape");
    let data = home.join("data");
    fs::create_dir_all(&data).expect("data dir");
    touch_raw(&home, "precious.csv", 1);

    rsl(&home)
        .args([
            "--dir", &dir_arg(&data), "--test", "cleanup", "--file", "../precious.csv", "--yes",
        ])
        .assert()
        .success()
        .stdout(contains("Deleted 0 of 1 file(s)"));

    assert!(home.join("precious.csv").exists());
}

#[test]
fn test_segments_update_rejects_blank_tag() {
    let home = setup_test_dir("cli_update_blank");
    let data = dir_arg(&home);

    let output = rsl(&home)
        .args([
            "--dir", &data, "--test", "segments", "add", "run.csv", "--start", "0", "--end",
            "2", "--tag", "Running",
        ])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let text = String::from_utf8(output).expect("utf8 output");
    let id = text
        .split("Added segment ")
        .nth(1)
        .and_then(|rest| rest.split_whitespace().next())
        .expect("segment id in output")
        .to_string();

    rsl(&home)
        .args([
            "--dir", &data, "--test", "segments", "update", "run.csv", "--id", &id, "--tag", "  ",
        ])
        .assert()
        .failure()
        .stderr(contains("Invalid activity label"));

    rsl(&home)
        .args(["--dir", &data, "--test", "segments", "list", "run.csv", "--tag", "Running"])
        .assert()
        .success()
        .stdout(contains(id.as_str()));
}
