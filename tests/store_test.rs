//! 保存機能テスト
//!
//! JSONストアの保存・読み込み・履歴の動作を検証

use chrono::{TimeZone, Utc};
use pump_selector::store::{self, JsonStore, KeyValueStore};
use pump_selector_common::{FormAnswers, Mode, Recommendation};
use serde_json::json;
use tempfile::tempdir;

fn recommendation() -> Recommendation {
    Recommendation {
        head: 44,
        flow: 556,
        horsepower: 3.0,
        voltage: 220,
        matches: Vec::new(),
        exact_match: None,
        timestamp: Utc.with_ymd_and_hms(2026, 1, 18, 9, 0, 0).unwrap(),
    }
}

/// 存在しないストアは空
#[test]
fn test_store_missing_file() {
    let dir = tempdir().expect("Failed to create temp dir");
    let store = JsonStore::load(&dir.path().join("store.json"));

    assert!(store.is_empty());
    assert!(store.get("catalog").is_none());
}

/// 保存と再読み込み
#[test]
fn test_store_save_and_reload() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("nested").join("store.json");

    let mut store = JsonStore::load(&path);
    store.save("catalog", json!([{"Model": "HB-05"}])).expect("保存失敗");

    let loaded = JsonStore::load(&path);
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded.get("catalog"), Some(&json!([{"Model": "HB-05"}])));
}

/// 同じキーは上書き
#[test]
fn test_store_overwrite() {
    let dir = tempdir().expect("Failed to create temp dir");
    let mut store = JsonStore::load(&dir.path().join("store.json"));

    store.save("catalog", json!([1])).unwrap();
    store.save("catalog", json!([2])).unwrap();

    assert_eq!(store.get("catalog"), Some(&json!([2])));
    assert_eq!(store.len(), 1);
}

/// 破損したストアは空として扱う
#[test]
fn test_store_corrupted_file() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("store.json");
    std::fs::write(&path, "{ invalid json }").unwrap();

    let store = JsonStore::load(&path);
    assert!(store.is_empty());
}

/// バージョン不一致は空として扱う
#[test]
fn test_store_version_mismatch() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("store.json");
    std::fs::write(&path, r#"{"version": 99, "entries": {"catalog": []}}"#).unwrap();

    let store = JsonStore::load(&path);
    assert!(store.is_empty());
}

/// 選定IDは1から連番
#[test]
fn test_selection_ids_increment() {
    let dir = tempdir().expect("Failed to create temp dir");
    let mut store = JsonStore::load(&dir.path().join("store.json"));
    let now = Utc::now();

    let answers = FormAnswers::new().with("purpose", "house");
    let first = store::save_selection(&mut store, &answers, Mode::Simple, now).unwrap();
    let second = store::save_selection(&mut store, &answers, Mode::Advanced, now).unwrap();

    assert_eq!(first, 1);
    assert_eq!(second, 2);
    assert!(store.get("selection:2").is_some());
}

/// 履歴は回答と推奨結果を対応付ける
#[test]
fn test_history_pairs_recommendations() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("store.json");
    let mut store = JsonStore::load(&path);
    let now = Utc.with_ymd_and_hms(2026, 1, 18, 9, 0, 0).unwrap();

    let answers = FormAnswers::new().with("waterLevel", "20-28").with("delivery", "floor2");
    let id = store::save_selection(&mut store, &answers, Mode::Simple, now).unwrap();
    store::save_recommendation(&mut store, id, &recommendation()).unwrap();
    store::save_selection(&mut store, &answers, Mode::Advanced, now).unwrap();

    let history = store::history(&JsonStore::load(&path));
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].selection.id, 1);
    assert_eq!(history[0].selection.answers, answers);
    assert_eq!(history[0].selection.created_at, now);
    assert_eq!(history[0].recommendation, Some(recommendation()));
    assert_eq!(history[1].selection.mode, Mode::Advanced);
    assert!(history[1].recommendation.is_none());
}

/// 10件以上でもID順に並ぶ
#[test]
fn test_history_numeric_order() {
    let dir = tempdir().expect("Failed to create temp dir");
    let mut store = JsonStore::load(&dir.path().join("store.json"));
    let answers = FormAnswers::new();

    for _ in 0..11 {
        store::save_selection(&mut store, &answers, Mode::Simple, Utc::now()).unwrap();
    }

    let ids: Vec<u64> = store::history(&store).iter().map(|e| e.selection.id).collect();
    assert_eq!(ids, (1..=11).collect::<Vec<_>>());
}
