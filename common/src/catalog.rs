//! カタログ読み込みモジュール
//!
//! 読み込んだJSON配列の先頭行を調べ、仕様表型（スプレッドシートの
//! ColumnN 形式）か組み合わせ型（見出し付きの属性タプル）かを一度だけ
//! 判定する。以降の照合処理はそれぞれの型だけを扱う。

use crate::columns::{ColumnResolver, Field};
use crate::error::{Error, Result};
use crate::mapping::ValueMapping;
use crate::parser::{leading_float, value_number, value_text};
use crate::types::CatalogEntry;
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

/// メートル → フィート
const METERS_TO_FEET: f64 = 3.28084;

/// モデル名が取れない行のプレースホルダー
pub const UNKNOWN_MODEL: &str = "Unknown Model";

/// 仕様表型カタログのカラム配置
mod column {
    pub const PHASE: &str = "Column2";
    pub const APPLICATION: &str = "Column3";
    pub const OIL_FILLED: &str = "Column10";
    pub const CATEGORY: &str = "Column12";
    pub const BUILDING_FLOOR: &str = "Column13";
    pub const HEAD_MAX_METERS: &str = "Column14";
    pub const SERIES: &str = "Column15";
    pub const FLOW_MAX: &str = "Column19";
    pub const PRODUCT_CODE: &str = "Column20";
    pub const MODEL: &str = "Column21";
    pub const POWER_RATING: &str = "Column23";
    pub const HORSEPOWER: &str = "Column24";
    pub const HEAD_RANGE: &str = "Column25";
    pub const FLOW_RANGE: &str = "Column27";
    pub const VOLTAGE: &str = "Column28";
}

/// カタログの形状
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogShape {
    Spec,
    Combination,
}

impl std::fmt::Display for CatalogShape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogShape::Spec => write!(f, "spec"),
            CatalogShape::Combination => write!(f, "combination"),
        }
    }
}

/// 読み込み済みカタログ（どちらか一方の形状のみ）
#[derive(Debug, Clone)]
pub enum Catalog {
    Spec(SpecCatalog),
    Combination(CombinationCatalog),
}

impl Default for Catalog {
    fn default() -> Self {
        Catalog::Spec(SpecCatalog::default())
    }
}

impl Catalog {
    /// JSON文字列から読み込み
    pub fn from_json(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_value(value)
    }

    /// JSON値から読み込み（配列以外はエラー）
    pub fn from_value(value: Value) -> Result<Self> {
        let items = match value {
            Value::Array(items) => items,
            other => {
                return Err(Error::CatalogShape(format!(
                    "expected a JSON array of row objects, got {}",
                    json_kind(&other)
                )))
            }
        };

        let total = items.len();
        let rows: Vec<Map<String, Value>> = items
            .into_iter()
            .filter_map(|item| match item {
                Value::Object(map) => Some(map),
                _ => None,
            })
            .collect();
        if rows.len() < total {
            warn!(skipped = total - rows.len(), "non-object catalog rows ignored");
        }

        Ok(Self::from_rows(rows))
    }

    /// 行オブジェクトから形状を判定して構築
    pub fn from_rows(rows: Vec<Map<String, Value>>) -> Self {
        match classify(&rows) {
            CatalogShape::Combination => Catalog::Combination(CombinationCatalog::new(rows)),
            CatalogShape::Spec => Catalog::Spec(SpecCatalog::from_rows(&rows)),
        }
    }

    pub fn shape(&self) -> CatalogShape {
        match self {
            Catalog::Spec(_) => CatalogShape::Spec,
            Catalog::Combination(_) => CatalogShape::Combination,
        }
    }

    /// 照合対象の件数
    pub fn len(&self) -> usize {
        match self {
            Catalog::Spec(c) => c.entries().len(),
            Catalog::Combination(c) => c.rows().len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// 先頭行にモデル列があれば組み合わせ型
pub fn classify(rows: &[Map<String, Value>]) -> CatalogShape {
    match rows.first() {
        Some(first) if ColumnResolver::new(first.keys().map(|k| k.as_str())).has(Field::Model) => {
            CatalogShape::Combination
        }
        _ => CatalogShape::Spec,
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// 仕様表型カタログ
#[derive(Debug, Clone, Default)]
pub struct SpecCatalog {
    entries: Vec<CatalogEntry>,
    dropped: usize,
}

impl SpecCatalog {
    /// 1行目（見出し行）を除いて変換し、モデル名・馬力が無効な行を除外
    pub fn from_rows(rows: &[Map<String, Value>]) -> Self {
        let mut entries = Vec::new();
        let mut dropped = 0;

        for row in rows.iter().skip(1) {
            let entry = parse_spec_row(row);
            if entry.model == UNKNOWN_MODEL || entry.horsepower <= 0.0 {
                dropped += 1;
                continue;
            }
            entries.push(entry);
        }

        info!(entries = entries.len(), dropped, "spec catalog loaded");
        Self { entries, dropped }
    }

    /// 変換済みエントリから構築
    pub fn from_entries(entries: Vec<CatalogEntry>) -> Self {
        Self { entries, dropped: 0 }
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    /// 読み込み時に除外した行数
    pub fn dropped(&self) -> usize {
        self.dropped
    }
}

fn cell_text(row: &Map<String, Value>, column: &str, default: &str) -> String {
    row.get(column)
        .and_then(value_text)
        .unwrap_or_else(|| default.to_string())
}

fn cell_number(row: &Map<String, Value>, column: &str) -> f64 {
    row.get(column).and_then(value_number).unwrap_or(0.0)
}

/// 仕様表の1行をエントリに変換
pub fn parse_spec_row(row: &Map<String, Value>) -> CatalogEntry {
    let horsepower = row
        .get(column::HORSEPOWER)
        .and_then(value_text)
        .and_then(|text| leading_float(&text.replacen("HP", "", 1)))
        .unwrap_or(0.0);

    CatalogEntry {
        model: cell_text(row, column::MODEL, UNKNOWN_MODEL),
        product_code: cell_text(row, column::PRODUCT_CODE, "N/A"),
        series: cell_text(row, column::SERIES, "Unknown Series"),
        horsepower,
        power_rating: cell_text(row, column::POWER_RATING, "N/A"),
        voltage: cell_text(row, column::VOLTAGE, "N/A"),
        head_range: cell_text(row, column::HEAD_RANGE, "N/A"),
        flow_range: cell_text(row, column::FLOW_RANGE, "N/A"),
        head_max: cell_number(row, column::HEAD_MAX_METERS) * METERS_TO_FEET,
        flow_max: cell_number(row, column::FLOW_MAX),
        application: cell_text(row, column::APPLICATION, "General"),
        category: cell_text(row, column::CATEGORY, "General"),
        phase: cell_text(row, column::PHASE, "Unknown"),
        oil_filled: cell_text(row, column::OIL_FILLED, "Unknown"),
        building_floor: cell_text(row, column::BUILDING_FLOOR, "N/A"),
    }
}

/// 組み合わせ型カタログ
///
/// 行は生のまま保持し、カラム解決表と値マッピングを読み込み時に構築する。
#[derive(Debug, Clone, Default)]
pub struct CombinationCatalog {
    rows: Vec<Map<String, Value>>,
    resolver: ColumnResolver,
    mapping: ValueMapping,
}

impl CombinationCatalog {
    pub fn new(rows: Vec<Map<String, Value>>) -> Self {
        let resolver = ColumnResolver::from_rows(&rows);
        let mapping = ValueMapping::generate(&rows, &resolver);
        debug!(
            rows = rows.len(),
            source_mappings = mapping.source().len(),
            delivery_mappings = mapping.delivery().len(),
            "combination catalog loaded"
        );
        Self {
            rows,
            resolver,
            mapping,
        }
    }

    pub fn rows(&self) -> &[Map<String, Value>] {
        &self.rows
    }

    pub fn resolver(&self) -> &ColumnResolver {
        &self.resolver
    }

    pub fn mapping(&self) -> &ValueMapping {
        &self.mapping
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn spec_catalog_json() -> Value {
        json!([
            {"Column21": "Model", "Column24": "HP", "Column28": "Voltage"},
            {
                "Column2": "Single", "Column3": "Domestic", "Column14": "30",
                "Column15": "Hi-Speed", "Column19": "2400", "Column20": "MHPSS1X010",
                "Column21": "HS-10", "Column23": "0.75 kW", "Column24": "1HP",
                "Column28": "220"
            },
            {"Column21": "HS-00", "Column24": "0HP", "Column28": "220"},
            {"Column24": "2HP", "Column28": "220"}
        ])
    }

    #[test]
    fn test_spec_catalog_skips_header_and_invalid_rows() {
        let catalog = Catalog::from_value(spec_catalog_json()).unwrap();
        let Catalog::Spec(spec) = &catalog else {
            panic!("expected spec catalog");
        };
        assert_eq!(spec.entries().len(), 1);
        assert_eq!(spec.dropped(), 2);

        let entry = &spec.entries()[0];
        assert_eq!(entry.model, "HS-10");
        assert_eq!(entry.horsepower, 1.0);
        assert!((entry.head_max - 30.0 * 3.28084).abs() < 1e-9);
        assert_eq!(entry.flow_max, 2400.0);
        assert_eq!(entry.voltage, "220");
        assert_eq!(entry.head_range, "N/A");
        assert_eq!(entry.oil_filled, "Unknown");
    }

    #[test]
    fn test_numeric_horsepower_cell() {
        let row = json!({"Column21": "HS-15", "Column24": 1.5});
        let entry = parse_spec_row(row.as_object().unwrap());
        assert_eq!(entry.horsepower, 1.5);
        assert_eq!(entry.head_max, 0.0);
    }

    #[test]
    fn test_classify_combination() {
        let catalog = Catalog::from_json(
            r#"[{" Model ": "CM-1", "Purpose": "house"}, {"Model": "CM-2"}]"#,
        )
        .unwrap();
        assert_eq!(catalog.shape(), CatalogShape::Combination);
        assert_eq!(catalog.len(), 2);
    }

    #[test]
    fn test_classify_uses_first_row_only() {
        let rows = vec![
            json!({"Column21": "Model"}).as_object().cloned().unwrap(),
            json!({"Model": "CM-1"}).as_object().cloned().unwrap(),
        ];
        assert_eq!(classify(&rows), CatalogShape::Spec);
    }

    #[test]
    fn test_empty_catalog_is_spec() {
        let catalog = Catalog::from_json("[]").unwrap();
        assert_eq!(catalog.shape(), CatalogShape::Spec);
        assert!(catalog.is_empty());
    }

    #[test]
    fn test_malformed_json() {
        let err = Catalog::from_json("[{\"Model\": ").unwrap_err();
        assert!(matches!(err, Error::CatalogParse(_)));
    }

    #[test]
    fn test_non_array_json() {
        let err = Catalog::from_json("{\"Model\": \"CM-1\"}").unwrap_err();
        assert!(matches!(err, Error::CatalogShape(_)));
        assert!(err.to_string().contains("an object"));
    }

    #[test]
    fn test_non_object_rows_ignored() {
        let catalog = Catalog::from_json(r#"[{"Model": "CM-1"}, 42, "x"]"#).unwrap();
        assert_eq!(catalog.shape(), CatalogShape::Combination);
        assert_eq!(catalog.len(), 1);
    }
}
