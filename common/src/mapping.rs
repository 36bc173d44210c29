//! 値マッピング生成モジュール
//!
//! フォームのコード値（"industry", "floor1"）とカタログの自由記述
//! （"industry sewage", "1st floor"）の表記ゆれを吸収する。
//! カタログ読み込み時に一度だけ全行を走査して対応表を作る。

use crate::columns::{ColumnResolver, Field};
use crate::comparators::Floor;
use crate::error::Result;
use crate::parser::normalize_token;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// 汚水系の水源コード（フォーム側）
pub const SEWAGE_SOURCES: [&str; 5] = ["hospital", "hotel", "industry", "home", "mall"];

/// カタログに該当値が無い場合の既定対応
const DEFAULT_SOURCE: [(&str, &str); 5] = [
    ("hospital", "hospital sewage"),
    ("hotel", "hotel sewage"),
    ("industry", "industry sewage"),
    ("home", "home sewage"),
    ("mall", "mall/shopping complex sewage"),
];

const DEFAULT_DELIVERY: [(&str, &str); 5] = [
    ("ground", "ground floor"),
    ("floor1", "1st floor"),
    ("floor2", "2nd floor"),
    ("floor3", "3rd floor"),
    ("floor4", "4th floor"),
];

/// フォームコード → カタログ表記の対応表
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValueMapping {
    /// 水源の対応
    #[serde(default)]
    source: BTreeMap<String, String>,
    /// 吐出階の対応
    #[serde(default)]
    delivery: BTreeMap<String, String>,
}

impl ValueMapping {
    /// カタログの値を走査して対応表を生成
    pub fn generate(rows: &[Map<String, Value>], resolver: &ColumnResolver) -> Self {
        let sources = distinct_values(rows, resolver, Field::Source);
        let deliveries = distinct_values(rows, resolver, Field::Delivery);

        let mut mapping = Self::default();

        for code in SEWAGE_SOURCES {
            let best = pick_best(
                sources
                    .iter()
                    .filter(|v| v.contains(code) && v.contains("sewage")),
                |v| (v.contains('/') || v.contains("shopping"), v.chars().count()),
            );
            if let Some(value) = best {
                mapping.source.insert(code.to_string(), value.clone());
            }
        }

        let mut floors: BTreeMap<Floor, Vec<&String>> = BTreeMap::new();
        for value in &deliveries {
            if let Some(floor) = Floor::parse(value) {
                floors.entry(floor).or_default().push(value);
            }
        }
        for (floor, candidates) in floors {
            if let Some(value) = pick_best(candidates.into_iter(), |v| v.contains("floor")) {
                mapping.delivery.insert(floor.form_code(), value.clone());
            }
        }

        mapping
    }

    /// JSON文字列から読み込み（手動の上書き設定用）
    pub fn from_json(json: &str) -> Result<Self> {
        let mut mapping: Self = serde_json::from_str(json)?;
        mapping.source = normalize_keys(mapping.source);
        mapping.delivery = normalize_keys(mapping.delivery);
        Ok(mapping)
    }

    /// 設定をマージ（後から追加した設定が優先）
    pub fn merge(&mut self, other: &ValueMapping) {
        self.source.extend(other.source.clone());
        self.delivery.extend(other.delivery.clone());
    }

    pub fn source(&self) -> &BTreeMap<String, String> {
        &self.source
    }

    pub fn delivery(&self) -> &BTreeMap<String, String> {
        &self.delivery
    }

    /// 水源コードをカタログ表記に変換（生成表 → 既定表 → 入力値）
    ///
    /// # Examples
    /// ```
    /// use pump_selector_common::mapping::ValueMapping;
    ///
    /// let mapping = ValueMapping::default();
    /// assert_eq!(mapping.map_source("Industry"), "industry sewage");
    /// assert_eq!(mapping.map_source("borewell"), "borewell");
    /// ```
    pub fn map_source(&self, code: &str) -> String {
        lookup(&self.source, &DEFAULT_SOURCE, code)
    }

    /// 吐出階コードをカタログ表記に変換（生成表 → 既定表 → 入力値）
    pub fn map_delivery(&self, code: &str) -> String {
        lookup(&self.delivery, &DEFAULT_DELIVERY, code)
    }
}

fn lookup(generated: &BTreeMap<String, String>, defaults: &[(&str, &str)], code: &str) -> String {
    let code = normalize_token(code);
    if let Some(value) = generated.get(&code) {
        return value.clone();
    }
    defaults
        .iter()
        .find(|(k, _)| *k == code)
        .map(|(_, v)| v.to_string())
        .unwrap_or(code)
}

/// フィールドの値を正規化して重複除去（出現順）
fn distinct_values(rows: &[Map<String, Value>], resolver: &ColumnResolver, field: Field) -> Vec<String> {
    let mut values: Vec<String> = Vec::new();
    for row in rows {
        if let Some(value) = resolver.value(row, field) {
            let value = normalize_token(&value);
            if !values.contains(&value) {
                values.push(value);
            }
        }
    }
    values
}

/// 優先キーが最大の候補を選ぶ（同点は先に出現した値）
fn pick_best<'a, K: Ord>(
    candidates: impl Iterator<Item = &'a String>,
    key: impl Fn(&str) -> K,
) -> Option<&'a String> {
    let mut best: Option<(&String, K)> = None;
    for value in candidates {
        let k = key(value);
        if best.as_ref().map_or(true, |(_, bk)| k > *bk) {
            best = Some((value, k));
        }
    }
    best.map(|(v, _)| v)
}

fn normalize_keys(map: BTreeMap<String, String>) -> BTreeMap<String, String> {
    map.into_iter()
        .map(|(k, v)| (normalize_token(&k), normalize_token(&v)))
        .collect()
}
