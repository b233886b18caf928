use std::fs;
use std::path::PathBuf;
use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};

use serde_json::{Value, json};

fn workspace_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../..")
}

fn fixtures_dir() -> PathBuf {
    workspace_root().join("tests/fixtures")
}

fn run_cli(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_jsoned"))
        .args(args)
        .env_remove("JSONED_DATA_DIR")
        .output()
        .expect("failed to run jsoned CLI")
}

fn temp_data_dir(prefix: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system time before unix epoch")
        .as_nanos();
    let dir = std::env::temp_dir().join(format!("{prefix}_{}_{}", std::process::id(), nanos));
    fs::create_dir_all(&dir).expect("failed to create temp dir");
    dir
}

fn seeded_dir(prefix: &str, name: &str, contents: &str) -> PathBuf {
    let dir = temp_data_dir(prefix);
    fs::write(dir.join(name), contents).expect("failed to seed document");
    dir
}

#[test]
fn cli_lists_json_documents() {
    let dir = fixtures_dir();
    let dir = dir.to_string_lossy().to_string();
    let output = run_cli(&["--dir", &dir, "--list"]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines, vec!["broken.json", "gods.json", "meta.json"]);
}

#[test]
fn cli_lists_from_environment_directory() {
    let output = Command::new(env!("CARGO_BIN_EXE_jsoned"))
        .arg("--list")
        .env("JSONED_DATA_DIR", fixtures_dir())
        .output()
        .expect("failed to run jsoned CLI");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.lines().any(|l| l == "gods.json"));
}

#[test]
fn cli_prints_fields_by_default() {
    let dir = fixtures_dir();
    let dir = dir.to_string_lossy().to_string();
    let output = run_cli(&["--dir", &dir, "meta.json"]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout, "  meta.x [integer] 1\n");
}

#[test]
fn cli_fields_json_describes_widgets() {
    let dir = fixtures_dir();
    let dir = dir.to_string_lossy().to_string();
    let output = run_cli(&["--dir", &dir, "--fields", "--json", "gods.json"]);
    assert!(output.status.success());

    let fields: Value = serde_json::from_slice(&output.stdout).expect("fields json should parse");
    let fields = fields.as_array().expect("fields should be an array");
    let crit = fields
        .iter()
        .find(|f| f["path"] == "gods[0].crit_chance")
        .expect("crit_chance field");
    assert_eq!(crit["widget"], "float");
    assert_eq!(crit["display"], "0.1500");
    let awakening = fields
        .iter()
        .find(|f| f["path"] == "gods[0].awakening")
        .expect("awakening field");
    assert_eq!(awakening["widget"], "json");
    assert_eq!(awakening["multiline"], true);
}

#[test]
fn cli_applies_edits_and_prints_document() {
    let dir = seeded_dir(
        "jsoned_cli_print",
        "zeus.json",
        r#"{"name": "Zeus", "power": 10, "active": true, "tags": ["sky", "thunder"]}"#,
    );
    let dir_arg = dir.to_string_lossy().to_string();
    let output = run_cli(&[
        "--dir",
        &dir_arg,
        "--set",
        "power=15",
        "--resize",
        "tags=3",
        "--print",
        "zeus.json",
    ]);
    assert!(output.status.success());

    let printed: Value = serde_json::from_slice(&output.stdout).expect("printed json");
    assert_eq!(
        printed,
        json!({"name": "Zeus", "power": 15, "active": true, "tags": ["sky", "thunder", ""]})
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("{\n  \"name\": \"Zeus\",\n  \"power\": 15,"));

    // --print alone never touches the file.
    let on_disk = fs::read_to_string(dir.join("zeus.json")).expect("read original");
    assert!(on_disk.contains("\"power\": 10"));

    fs::remove_dir_all(&dir).ok();
}

#[test]
fn cli_set_splits_after_quoted_keys_containing_equals() {
    let dir = seeded_dir(
        "jsoned_cli_equals",
        "keys.json",
        r#"{"a=b": 1, "note": "plain"}"#,
    );
    let dir_arg = dir.to_string_lossy().to_string();
    let output = run_cli(&[
        "--dir",
        &dir_arg,
        "--set",
        r#"["a=b"]=2"#,
        "--set",
        "note=k=v",
        "--print",
        "keys.json",
    ]);
    assert!(output.status.success());

    let printed: Value = serde_json::from_slice(&output.stdout).expect("printed json");
    assert_eq!(printed, json!({"a=b": 2, "note": "k=v"}));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!stderr.contains("warning"));

    fs::remove_dir_all(&dir).ok();
}

#[test]
fn cli_write_saves_in_place_with_backup() {
    let original = r#"{"levels": [1, 2, 3], "title": "天照"}"#;
    let dir = seeded_dir("jsoned_cli_write", "levels.json", original);
    let dir_arg = dir.to_string_lossy().to_string();
    let output = run_cli(&[
        "--dir",
        &dir_arg,
        "--resize",
        "levels=1",
        "--write",
        "--backup",
        "levels.json",
    ]);
    assert!(output.status.success());

    let saved = fs::read_to_string(dir.join("levels.json")).expect("read saved");
    assert_eq!(saved, "{\n  \"levels\": [\n    1\n  ],\n  \"title\": \"天照\"\n}");
    let backup = fs::read_to_string(dir.join("levels.json.backup")).expect("read backup");
    assert_eq!(backup, original);

    fs::remove_dir_all(&dir).ok();
}

#[test]
fn cli_output_writes_copy_and_keeps_original() {
    let original = r#"{"meta": {"x": 1}}"#;
    let dir = seeded_dir("jsoned_cli_output", "meta.json", original);
    let dir_arg = dir.to_string_lossy().to_string();
    let copy = dir.join("copy_meta.json");
    let copy_arg = copy.to_string_lossy().to_string();
    let output = run_cli(&[
        "--dir",
        &dir_arg,
        "--set",
        "meta.x=2",
        "--output",
        &copy_arg,
        "meta.json",
    ]);
    assert!(output.status.success());

    assert_eq!(
        fs::read_to_string(&copy).expect("read copy"),
        "{\n  \"meta\": {\n    \"x\": 2\n  }\n}"
    );
    assert_eq!(
        fs::read_to_string(dir.join("meta.json")).expect("read original"),
        original
    );

    fs::remove_dir_all(&dir).ok();
}

#[test]
fn cli_reports_invalid_raw_json_but_still_saves() {
    let dir = seeded_dir(
        "jsoned_cli_isolation",
        "god.json",
        r#"{"awakening": null, "power": 10}"#,
    );
    let dir_arg = dir.to_string_lossy().to_string();
    let output = run_cli(&[
        "--dir",
        &dir_arg,
        "--set",
        "awakening={broken",
        "--set",
        "power=11",
        "--write",
        "god.json",
    ]);
    assert!(output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("invalid JSON at awakening"));
    let saved: Value = serde_json::from_str(
        &fs::read_to_string(dir.join("god.json")).expect("read saved"),
    )
    .expect("saved json parses");
    assert_eq!(saved, json!({"awakening": null, "power": 11}));

    fs::remove_dir_all(&dir).ok();
}

#[test]
fn cli_warns_about_unknown_paths() {
    let dir = fixtures_dir();
    let dir = dir.to_string_lossy().to_string();
    let output = run_cli(&["--dir", &dir, "--set", "meta.y=3", "--print", "meta.json"]);
    assert!(output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("warning: no field at meta.y, ignored"));
}

#[test]
fn cli_verbose_lists_applied_edits() {
    let dir = fixtures_dir();
    let dir = dir.to_string_lossy().to_string();
    let output = run_cli(&[
        "--dir", &dir, "--verbose", "--set", "meta.x=5", "--print", "meta.json",
    ]);
    assert!(output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("meta.x set to 5"));
    assert!(stderr.contains("1 field changed, 0 lists resized"));
}

#[test]
fn cli_rejects_edits_without_destination() {
    let dir = fixtures_dir();
    let dir = dir.to_string_lossy().to_string();
    let output = run_cli(&["--dir", &dir, "--set", "meta.x=2", "meta.json"]);
    assert_eq!(output.status.code(), Some(2));

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("require --write"));
}

#[test]
fn cli_rejects_malformed_paths_and_lengths() {
    let dir = fixtures_dir();
    let dir = dir.to_string_lossy().to_string();
    let bad_path = run_cli(&["--dir", &dir, "--set", "tags[=1", "--print", "meta.json"]);
    assert_eq!(bad_path.status.code(), Some(2));

    let bad_len = run_cli(&["--dir", &dir, "--resize", "tags=-1", "--print", "meta.json"]);
    assert_eq!(bad_len.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&bad_len.stderr);
    assert!(stderr.contains("expected a whole number"));
}

#[test]
fn cli_fails_on_broken_document() {
    let dir = fixtures_dir();
    let dir = dir.to_string_lossy().to_string();
    let output = run_cli(&["--dir", &dir, "broken.json"]);
    assert_eq!(output.status.code(), Some(1));

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Error loading"));
    assert!(stderr.contains("Parse"));
}

#[test]
fn cli_accepts_float_precision() {
    let dir = fixtures_dir();
    let dir = dir.to_string_lossy().to_string();
    let output = run_cli(&[
        "--dir",
        &dir,
        "--fields",
        "--float-precision",
        "2",
        "gods.json",
    ]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("gods[0].crit_chance [float] 0.15\n"));
}
