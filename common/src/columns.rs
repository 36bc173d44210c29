//! カラム名解決モジュール
//!
//! スプレッドシートから変換されたカタログはヘッダーの表記が揃っていない
//! （"Model", " model ", "Water Level", "water_level" など）。
//! 既知フィールドごとに実際のヘッダー名をカタログ読み込み時に一度だけ
//! 解決し、以降の行アクセスはこの表を引くだけにする。

use crate::parser::value_text;
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashSet};

/// カタログ上の論理フィールド
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    Model,
    Horsepower,
    Sku,
    Image,
    Purpose,
    Location,
    Source,
    WaterLevel,
    Delivery,
    CustomHeight,
    Usage,
    Phase,
    Quality,
}

impl Field {
    /// 完全一致照合に使う9フィールド（フォームの項目順）
    pub const MATCHING: [Field; 9] = [
        Field::Purpose,
        Field::Location,
        Field::Source,
        Field::WaterLevel,
        Field::Delivery,
        Field::CustomHeight,
        Field::Usage,
        Field::Phase,
        Field::Quality,
    ];

    /// 識別・表示用フィールド（extras から除外する）
    pub const IDENTIFIERS: [Field; 4] = [Field::Model, Field::Horsepower, Field::Sku, Field::Image];

    /// フォームのフィールド名
    pub fn form_name(&self) -> &'static str {
        match self {
            Field::Model => "model",
            Field::Horsepower => "hp",
            Field::Sku => "sku",
            Field::Image => "image",
            Field::Purpose => "purpose",
            Field::Location => "location",
            Field::Source => "source",
            Field::WaterLevel => "waterLevel",
            Field::Delivery => "delivery",
            Field::CustomHeight => "customHeight",
            Field::Usage => "usage",
            Field::Phase => "phase",
            Field::Quality => "quality",
        }
    }

    /// 正規化済みヘッダーの別名
    fn aliases(&self) -> &'static [&'static str] {
        match self {
            Field::Model => &["model", "modelname", "pumpmodel", "modelno"],
            Field::Horsepower => &["hp", "horsepower"],
            Field::Sku => &["sku", "productcode", "code"],
            Field::Image => &["image", "imageurl", "img", "photo"],
            Field::Purpose => &["purpose"],
            Field::Location => &["location"],
            Field::Source => &["source", "watersource"],
            Field::WaterLevel => &["waterlevel"],
            Field::Delivery => &["delivery", "deliveryheight"],
            Field::CustomHeight => &["customheight"],
            Field::Usage => &["usage", "waterusage"],
            Field::Phase => &["phase"],
            Field::Quality => &["quality", "waterquality"],
        }
    }

    fn all() -> impl Iterator<Item = Field> {
        Self::IDENTIFIERS.into_iter().chain(Self::MATCHING)
    }

    fn from_header(header: &str) -> Option<Field> {
        let key = normalize_header(header);
        Self::all().find(|f| f.aliases().contains(&key.as_str()))
    }
}

/// ヘッダー名を比較用に正規化（小文字化 + 空白・区切り文字除去）
pub fn normalize_header(header: &str) -> String {
    header
        .chars()
        .filter(|c| !c.is_whitespace() && !matches!(c, '_' | '-' | '.'))
        .flat_map(char::to_lowercase)
        .collect()
}

/// フィールド → 実ヘッダー名の解決表
#[derive(Debug, Clone, Default)]
pub struct ColumnResolver {
    columns: BTreeMap<Field, Vec<String>>,
    claimed: HashSet<String>,
}

impl ColumnResolver {
    /// ヘッダー名の一覧から構築（出現順を保持）
    pub fn new<'a>(headers: impl IntoIterator<Item = &'a str>) -> Self {
        let mut resolver = Self::default();
        for header in headers {
            resolver.observe(header);
        }
        resolver
    }

    /// 全行のヘッダーの和集合から構築
    pub fn from_rows(rows: &[Map<String, Value>]) -> Self {
        Self::new(rows.iter().flat_map(|row| row.keys().map(|k| k.as_str())))
    }

    fn observe(&mut self, header: &str) {
        if self.claimed.contains(header) {
            return;
        }
        if let Some(field) = Field::from_header(header) {
            self.columns.entry(field).or_default().push(header.to_string());
            self.claimed.insert(header.to_string());
        }
    }

    /// フィールドに対応するヘッダーが存在するか
    pub fn has(&self, field: Field) -> bool {
        self.columns.contains_key(&field)
    }

    /// フィールドに対応する実ヘッダー名（出現順）
    pub fn headers(&self, field: Field) -> &[String] {
        self.columns.get(&field).map(|v| v.as_slice()).unwrap_or(&[])
    }

    /// 既知フィールドに割り当て済みのヘッダーか
    pub fn is_claimed(&self, header: &str) -> bool {
        self.claimed.contains(header)
    }

    /// 行からフィールド値を取得（空でない最初の値）
    pub fn value(&self, row: &Map<String, Value>, field: Field) -> Option<String> {
        self.headers(field)
            .iter()
            .filter_map(|h| row.get(h))
            .find_map(value_text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_normalize_header() {
        assert_eq!(normalize_header("  Water Level "), "waterlevel");
        assert_eq!(normalize_header("water_level"), "waterlevel");
        assert_eq!(normalize_header("Custom-Height"), "customheight");
        assert_eq!(normalize_header("MODEL"), "model");
    }

    #[test]
    fn test_resolve_padded_headers() {
        let resolver = ColumnResolver::new([" Model ", "Purpose", "water level", "SKU"]);
        assert_eq!(resolver.headers(Field::Model), &[" Model ".to_string()]);
        assert_eq!(resolver.headers(Field::WaterLevel), &["water level".to_string()]);
        assert!(resolver.has(Field::Sku));
        assert!(!resolver.has(Field::Quality));
    }

    #[test]
    fn test_spreadsheet_columns_are_not_fields() {
        let resolver = ColumnResolver::new(["Column2", "Column21", "Column24"]);
        assert!(!resolver.has(Field::Model));
        assert!(!resolver.is_claimed("Column21"));
    }

    #[test]
    fn test_value_takes_first_non_empty_variant() {
        let rows = vec![
            row(json!({"Model": "", "model ": "HS-10"})),
            row(json!({"Model": "HS-20"})),
        ];
        let resolver = ColumnResolver::from_rows(&rows);
        assert_eq!(resolver.value(&rows[0], Field::Model), Some("HS-10".to_string()));
        assert_eq!(resolver.value(&rows[1], Field::Model), Some("HS-20".to_string()));
    }

    #[test]
    fn test_value_missing_field() {
        let rows = vec![row(json!({"Model": "HS-10"}))];
        let resolver = ColumnResolver::from_rows(&rows);
        assert_eq!(resolver.value(&rows[0], Field::Usage), None);
    }

    #[test]
    fn test_numeric_cells_become_text() {
        let rows = vec![row(json!({"HP": 1.5, "Phase": 220}))];
        let resolver = ColumnResolver::from_rows(&rows);
        assert_eq!(resolver.value(&rows[0], Field::Horsepower), Some("1.5".to_string()));
        assert_eq!(resolver.value(&rows[0], Field::Phase), Some("220".to_string()));
    }
}
