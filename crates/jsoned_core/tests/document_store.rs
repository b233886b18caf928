use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use jsoned_core::core_api::{CoreErrorCode, Engine};
use jsoned_core::store::{DataDirectory, DocumentSource, load_document, save_copy};
use jsoned_core::{NodePath, WidgetState, WidgetValue};
use serde_json::json;

fn workspace_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../..")
}

fn fixtures_dir() -> PathBuf {
    workspace_root().join("tests/fixtures")
}

fn temp_data_dir(prefix: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system time before unix epoch")
        .as_nanos();
    let dir = std::env::temp_dir().join(format!("{prefix}_{}_{}", std::process::id(), nanos));
    fs::create_dir_all(&dir).expect("failed to create temp data dir");
    dir
}

#[test]
fn lists_only_json_files_sorted() {
    let store = DataDirectory::new(fixtures_dir());
    let names = store.list_candidates().expect("fixtures dir should list");
    assert_eq!(names, vec!["broken.json", "gods.json", "meta.json"]);
}

#[test]
fn listing_missing_directory_is_not_found() {
    let store = DataDirectory::new(fixtures_dir().join("does-not-exist"));
    let err = store.list_candidates().expect_err("missing dir should fail");
    assert_eq!(err.code, CoreErrorCode::NotFound);
}

#[test]
fn load_reports_missing_and_malformed_documents() {
    let store = DataDirectory::new(fixtures_dir());
    let missing = store.load("nope.json").expect_err("missing file should fail");
    assert_eq!(missing.code, CoreErrorCode::NotFound);

    let broken = store.load("broken.json").expect_err("broken file should fail");
    assert_eq!(broken.code, CoreErrorCode::Parse);
}

#[test]
fn save_then_load_is_byte_stable() {
    let dir = temp_data_dir("jsoned_store_roundtrip");
    let original = fs::read(fixtures_dir().join("gods.json")).expect("read gods fixture");
    fs::write(dir.join("gods.json"), &original).expect("seed gods fixture");

    let store = DataDirectory::new(&dir);
    let document = store.load("gods.json").expect("load gods");
    store.save("gods.json", &document).expect("save gods");

    let saved = fs::read(dir.join("gods.json")).expect("read saved gods");
    assert_eq!(saved, original);
    assert_eq!(store.list_candidates().expect("list"), vec!["gods.json"]);

    fs::remove_dir_all(&dir).ok();
}

#[test]
fn save_with_backup_keeps_previous_bytes() {
    let dir = temp_data_dir("jsoned_store_backup");
    fs::write(dir.join("gods.json"), "{\"power\": 10}").expect("seed document");

    let store = DataDirectory::new(&dir).with_backup(true);
    let mut session = Engine::new().begin_session(&store.load("gods.json").expect("load"));
    let mut state = WidgetState::new();
    state.set(
        NodePath::parse("power").expect("path"),
        WidgetValue::Integer(15),
    );
    session.edit(&mut state);
    store
        .save("gods.json", session.edited_value())
        .expect("save edited document");

    let backup = fs::read_to_string(store.backup_path_of("gods.json")).expect("backup exists");
    assert_eq!(backup, "{\"power\": 10}");
    let saved = fs::read_to_string(dir.join("gods.json")).expect("saved document");
    assert_eq!(saved, "{\n  \"power\": 15\n}");
    // The backup suffix keeps it out of the candidate list.
    assert_eq!(store.list_candidates().expect("list"), vec!["gods.json"]);

    fs::remove_dir_all(&dir).ok();
}

#[test]
fn concurrent_saves_to_one_document_all_succeed() {
    let dir = temp_data_dir("jsoned_store_concurrent");
    let store = DataDirectory::new(&dir);
    store.save("gods.json", &json!({"power": 0})).expect("seed document");

    std::thread::scope(|scope| {
        for writer in 0..4 {
            let store = &store;
            scope.spawn(move || {
                for round in 0..25 {
                    store
                        .save("gods.json", &json!({"power": writer * 100 + round}))
                        .expect("concurrent save");
                }
            });
        }
    });

    let saved = store.load("gods.json").expect("reload");
    assert!(saved["power"].is_i64());
    let leftovers: Vec<_> = fs::read_dir(&dir)
        .expect("list temp dir")
        .filter_map(Result::ok)
        .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
        .collect();
    assert!(leftovers.is_empty());

    fs::remove_dir_all(&dir).ok();
}

#[test]
fn save_copy_writes_literal_utf8() {
    let dir = temp_data_dir("jsoned_store_copy");
    let target = dir.join("copy_gods.json");
    save_copy(&target, &json!({"title": "天照"})).expect("save copy");

    let text = fs::read_to_string(&target).expect("read copy");
    assert_eq!(text, "{\n  \"title\": \"天照\"\n}");
    assert_eq!(load_document(&target).expect("reload"), json!({"title": "天照"}));
    let leftovers: Vec<_> = fs::read_dir(&dir)
        .expect("list temp dir")
        .filter_map(Result::ok)
        .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
        .collect();
    assert!(leftovers.is_empty());

    fs::remove_dir_all(&dir).ok();
}
