//! 完全一致照合モジュール
//!
//! 組み合わせ型カタログは「用途・設置場所・水源・…」の9項目の組が
//! そのまま1台のポンプに対応している。回答の組と全項目が一致する
//! 最初の行を返す（スコア付けはしない）。

use crate::catalog::CombinationCatalog;
use crate::columns::{ColumnResolver, Field};
use crate::comparators::delivery_matches;
use crate::mapping::ValueMapping;
use crate::parser::{normalize_token, value_text};
use crate::types::{ExactMatch, FormAnswers};
use serde_json::{Map, Value};
use tracing::debug;

/// モデル列が解決できない場合の表示
pub const MODEL_NOT_FOUND: &str = "Model Name Not Found";

/// 正規化・マッピング済みの回答の組
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    values: [String; 9],
}

impl Selection {
    /// フォーム回答から組を作る
    ///
    /// 全項目を trim + 小文字化し、水源と吐出階はカタログ表記に変換する。
    pub fn from_answers(answers: &FormAnswers, mapping: &ValueMapping) -> Self {
        let values = Field::MATCHING.map(|field| {
            let raw = answers.get(field.form_name()).unwrap_or_default();
            match field {
                Field::Source if !raw.trim().is_empty() => mapping.map_source(raw),
                Field::Delivery if !raw.trim().is_empty() => mapping.map_delivery(raw),
                _ => normalize_token(raw),
            }
        });
        Self { values }
    }

    /// 照合項目の値
    pub fn get(&self, field: Field) -> &str {
        Field::MATCHING
            .iter()
            .position(|f| *f == field)
            .map(|i| self.values[i].as_str())
            .unwrap_or_default()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
        Field::MATCHING
            .into_iter()
            .zip(self.values.iter().map(|v| v.as_str()))
    }
}

/// 1項目の比較（吐出階のみ階の同値判定を使う）
pub fn field_matches(field: Field, catalog_value: &str, user_value: &str) -> bool {
    match field {
        Field::Delivery => delivery_matches(catalog_value, user_value),
        _ => catalog_value == user_value,
    }
}

fn row_matches(row: &Map<String, Value>, resolver: &ColumnResolver, selection: &Selection) -> bool {
    selection.iter().all(|(field, user_value)| {
        let catalog_value = resolver
            .value(row, field)
            .map(|v| normalize_token(&v))
            .unwrap_or_default();
        field_matches(field, &catalog_value, user_value)
    })
}

/// 全項目が一致する最初の行を探す（見つからなければ None）
pub fn find_exact_match(catalog: &CombinationCatalog, selection: &Selection) -> Option<ExactMatch> {
    let resolver = catalog.resolver();
    let found = catalog
        .rows()
        .iter()
        .enumerate()
        .find(|(_, row)| row_matches(row, resolver, selection))
        .map(|(index, row)| extract_match(row, resolver, index));

    match &found {
        Some(m) => debug!(model = %m.model, row = m.row, "exact match found"),
        None => debug!(rows = catalog.rows().len(), "no exact match"),
    }
    found
}

/// 一致行からモデル名・馬力・SKU・表示用カラムを取り出す
fn extract_match(row: &Map<String, Value>, resolver: &ColumnResolver, index: usize) -> ExactMatch {
    let extras = row
        .iter()
        .filter(|(header, _)| !resolver.is_claimed(header))
        .filter_map(|(header, value)| value_text(value).map(|v| (header.trim().to_string(), v)))
        .collect();

    ExactMatch {
        model: resolver
            .value(row, Field::Model)
            .map(|m| m.trim().to_string())
            .unwrap_or_else(|| MODEL_NOT_FOUND.to_string()),
        horsepower: resolver.value(row, Field::Horsepower),
        sku: resolver.value(row, Field::Sku),
        image: resolver.value(row, Field::Image),
        extras,
        row: index,
    }
}
