//! カタログ取り込みモジュール
//!
//! JSON配列または表計算ファイル（xlsx/xls/ods）の先頭シートを
//! 行オブジェクトのJSON配列に変換する。

use crate::error::{Result, SelectorError};
use calamine::{open_workbook_auto, Data, Range, Reader};
use serde_json::{Map, Value};
use std::path::Path;
use tracing::info;

const SPREADSHEET_EXTENSIONS: [&str; 5] = ["xlsx", "xlsm", "xlsb", "xls", "ods"];

/// カタログファイルを読み込む
///
/// # Arguments
/// * `path` - JSONまたは表計算ファイル
/// * `headers` - 表計算の1行目を列名として使う（false なら `Column1`, `Column2`, ...）
pub fn read_catalog_rows(path: &Path, headers: bool) -> Result<Value> {
    if !path.exists() {
        return Err(SelectorError::FileNotFound(path.display().to_string()));
    }

    let extension = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    let rows = match extension.as_str() {
        "json" => serde_json::from_str(&std::fs::read_to_string(path)?)?,
        ext if SPREADSHEET_EXTENSIONS.contains(&ext) => read_spreadsheet(path, headers)?,
        other => return Err(SelectorError::UnsupportedFormat(other.to_string())),
    };

    info!(path = %path.display(), "catalog file read");
    Ok(rows)
}

fn read_spreadsheet(path: &Path, headers: bool) -> Result<Value> {
    let mut workbook = open_workbook_auto(path)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| SelectorError::Spreadsheet("シートがありません".into()))??;
    Ok(Value::Array(range_to_rows(&range, headers)))
}

/// シートの範囲を行オブジェクトに変換（空セルは省略、空行は除外）
pub fn range_to_rows(range: &Range<Data>, headers: bool) -> Vec<Value> {
    let mut rows = range.rows();

    let names: Vec<String> = if headers {
        rows.next()
            .map(|row| row.iter().map(|cell| cell.to_string().trim().to_string()).collect())
            .unwrap_or_default()
    } else {
        Vec::new()
    };

    rows.filter_map(|row| {
        let object: Map<String, Value> = row
            .iter()
            .enumerate()
            .filter_map(|(i, cell)| {
                let value = cell_value(cell)?;
                let key = names
                    .get(i)
                    .filter(|n| !n.is_empty())
                    .cloned()
                    .unwrap_or_else(|| format!("Column{}", i + 1));
                Some((key, value))
            })
            .collect();
        (!object.is_empty()).then_some(Value::Object(object))
    })
    .collect()
}

fn cell_value(cell: &Data) -> Option<Value> {
    match cell {
        Data::Empty => None,
        Data::String(s) if s.trim().is_empty() => None,
        Data::String(s) => Some(Value::String(s.clone())),
        Data::Int(i) => Some(Value::from(*i)),
        Data::Float(f) => serde_json::Number::from_f64(*f).map(Value::Number),
        Data::Bool(b) => Some(Value::Bool(*b)),
        other => Some(Value::String(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range() -> Range<Data> {
        let mut range = Range::new((0, 0), (2, 2));
        range.set_value((0, 0), Data::String("Model".into()));
        range.set_value((0, 2), Data::String("HP".into()));
        range.set_value((1, 0), Data::String("HS-30".into()));
        range.set_value((1, 1), Data::Int(20));
        range.set_value((1, 2), Data::Float(1.5));
        range
    }

    #[test]
    fn test_rows_with_headers() {
        let rows = range_to_rows(&range(), true);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["Model"], "HS-30");
        assert_eq!(rows[0]["Column2"], 20);
        assert_eq!(rows[0]["HP"], 1.5);
    }

    #[test]
    fn test_rows_with_positional_names() {
        let rows = range_to_rows(&range(), false);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["Column1"], "Model");
        assert!(rows[0].get("Column2").is_none());
        assert_eq!(rows[1]["Column3"], 1.5);
    }

    #[test]
    fn test_unsupported_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.csv");
        std::fs::write(&path, "Model\nHS-30").unwrap();
        assert!(matches!(
            read_catalog_rows(&path, false),
            Err(SelectorError::UnsupportedFormat(_))
        ));
    }
}
