//! 選定データ保存モジュール
//!
//! カタログ・回答・推奨結果をキー付きでJSONファイルに保存する。
//! キー: `catalog`, `selection:<id>`, `recommendation:<id>`

use crate::error::Result;
use chrono::{DateTime, Utc};
use pump_selector_common::{FormAnswers, Mode, Recommendation};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

pub const CATALOG_KEY: &str = "catalog";
const SELECTION_PREFIX: &str = "selection:";
const RECOMMENDATION_PREFIX: &str = "recommendation:";

/// キー・値ストア
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<&Value>;
    fn save(&mut self, key: &str, value: Value) -> Result<()>;
    fn keys(&self) -> Vec<String>;
}

/// JSONファイルのストア
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonStore {
    /// バージョン（互換性チェック用）
    version: u32,
    entries: BTreeMap<String, Value>,
    #[serde(skip)]
    path: PathBuf,
}

impl JsonStore {
    const CURRENT_VERSION: u32 = 1;

    /// ストアファイルを読み込み（無い・壊れている場合は空）
    pub fn load(path: &Path) -> Self {
        let empty = Self {
            version: Self::CURRENT_VERSION,
            entries: BTreeMap::new(),
            path: path.to_path_buf(),
        };
        if !path.exists() {
            return empty;
        }

        let file = match File::open(path) {
            Ok(f) => f,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "store unreadable, starting empty");
                return empty;
            }
        };

        match serde_json::from_reader::<_, JsonStore>(BufReader::new(file)) {
            Ok(store) if store.version == Self::CURRENT_VERSION => Self {
                path: path.to_path_buf(),
                ..store
            },
            Ok(store) => {
                warn!(found = store.version, "store version mismatch, starting empty");
                empty
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "store corrupted, starting empty");
                empty
            }
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn persist(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let writer = BufWriter::new(File::create(&self.path)?);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }
}

impl KeyValueStore for JsonStore {
    fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    /// 書き込みごとにファイルへ反映
    fn save(&mut self, key: &str, value: Value) -> Result<()> {
        self.entries.insert(key.to_string(), value);
        self.persist()?;
        debug!(key, "store entry saved");
        Ok(())
    }

    fn keys(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }
}

/// 保存された回答
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionRecord {
    pub id: u64,
    pub mode: Mode,
    pub answers: FormAnswers,
    pub created_at: DateTime<Utc>,
}

/// 回答と（あれば）その推奨結果
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    pub selection: SelectionRecord,
    pub recommendation: Option<Recommendation>,
}

fn selection_ids(store: &impl KeyValueStore) -> Vec<u64> {
    let mut ids: Vec<u64> = store
        .keys()
        .iter()
        .filter_map(|k| k.strip_prefix(SELECTION_PREFIX))
        .filter_map(|id| id.parse().ok())
        .collect();
    ids.sort_unstable();
    ids
}

/// カタログ（行オブジェクトのJSON配列）を保存
pub fn save_catalog(store: &mut impl KeyValueStore, rows: Value) -> Result<()> {
    store.save(CATALOG_KEY, rows)
}

pub fn load_catalog(store: &impl KeyValueStore) -> Option<&Value> {
    store.get(CATALOG_KEY)
}

/// 回答を保存して採番したIDを返す
pub fn save_selection(
    store: &mut impl KeyValueStore,
    answers: &FormAnswers,
    mode: Mode,
    created_at: DateTime<Utc>,
) -> Result<u64> {
    let id = selection_ids(store).last().map_or(1, |last| last + 1);
    let record = SelectionRecord {
        id,
        mode,
        answers: answers.clone(),
        created_at,
    };
    store.save(&format!("{SELECTION_PREFIX}{id}"), serde_json::to_value(&record)?)?;
    Ok(id)
}

pub fn save_recommendation(
    store: &mut impl KeyValueStore,
    selection_id: u64,
    recommendation: &Recommendation,
) -> Result<()> {
    store.save(
        &format!("{RECOMMENDATION_PREFIX}{selection_id}"),
        serde_json::to_value(recommendation)?,
    )
}

/// 保存済みの回答をID順に取得（読めないレコードは飛ばす）
pub fn history(store: &impl KeyValueStore) -> Vec<HistoryEntry> {
    selection_ids(store)
        .into_iter()
        .filter_map(|id| {
            let selection = store
                .get(&format!("{SELECTION_PREFIX}{id}"))
                .and_then(|v| SelectionRecord::deserialize(v).ok())?;
            let recommendation = store
                .get(&format!("{RECOMMENDATION_PREFIX}{id}"))
                .and_then(|v| Recommendation::deserialize(v).ok());
            Some(HistoryEntry {
                selection,
                recommendation,
            })
        })
        .collect()
}
