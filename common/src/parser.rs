//! セル値パーサー
//!
//! スプレッドシート由来のカタログやフォーム入力は、数値が文字列で
//! 入っていたり単位が付いていたりする。ここでは先頭の数値だけを
//! 取り出す寛容なパースと、JSON値のテキスト化をまとめる。

use regex::Regex;
use serde_json::Value;

lazy_static::lazy_static! {
    static ref LEADING_FLOAT_RE: Regex =
        Regex::new(r"^\s*([+-]?(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?)").unwrap();
    static ref LEADING_INT_RE: Regex = Regex::new(r"^\s*([+-]?\d+)").unwrap();
}

/// 先頭の小数を抽出（"1.5HP" → 1.5）
///
/// # Examples
/// ```
/// use pump_selector_common::parser::leading_float;
///
/// assert_eq!(leading_float(" 7.5 kW"), Some(7.5));
/// assert_eq!(leading_float("HP"), None);
/// ```
pub fn leading_float(text: &str) -> Option<f64> {
    LEADING_FLOAT_RE
        .captures(text)
        .and_then(|cap| cap[1].parse::<f64>().ok())
        .filter(|v| v.is_finite())
}

/// 先頭の整数を抽出（"220V" → 220）
pub fn leading_int(text: &str) -> Option<i64> {
    LEADING_INT_RE
        .captures(text)
        .and_then(|cap| cap[1].parse::<i64>().ok())
}

/// JSON値を表示用テキストに変換
///
/// null・空文字・配列・オブジェクトは値なしとして扱う。
pub fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if s.trim().is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// 数値セルを取得（数値ならそのまま、文字列なら先頭の数値）
pub fn value_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => leading_float(s),
        _ => None,
    }
}

/// 比較用の正規化（前後空白除去 + 小文字化）
pub fn normalize_token(text: &str) -> String {
    text.trim().to_lowercase()
}
