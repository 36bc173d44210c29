//! 選定エンジンの型定義
//!
//! - CatalogEntry: 仕様表型カタログの1行
//! - Requirements: フォーム回答から算出した水理要件
//! - MatchResult: スコアリング結果
//! - Recommendation: 永続化・表示側に渡す最終出力

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// 仕様表型カタログのポンプ1台分
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogEntry {
    pub model: String,
    pub product_code: String,
    pub series: String,
    pub horsepower: f64,
    pub power_rating: String,
    pub voltage: String,
    pub head_range: String,
    pub flow_range: String,
    /// 最大揚程（フィート）
    pub head_max: f64,
    /// 最大流量（L/h）
    pub flow_max: f64,
    pub application: String,
    pub category: String,
    pub phase: String,
    pub oil_filled: String,
    pub building_floor: String,
}

/// 水理要件
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Requirements {
    /// 全揚程（フィート）
    pub head: f64,
    /// 流量（L/h）
    pub flow: f64,
    pub horsepower: f64,
    pub voltage: u32,
}

impl Requirements {
    /// 表示用の流量（L/min）
    pub fn flow_per_minute(&self) -> f64 {
        self.flow / 60.0
    }
}

/// 入力モード
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// 用途・水位・階数から算出
    #[default]
    Simple,
    /// 揚程・流量・馬力を直接入力
    Advanced,
}

impl std::str::FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "simple" => Ok(Mode::Simple),
            "advanced" => Ok(Mode::Advanced),
            _ => Err(format!("Unknown mode: {}. Use simple or advanced", s)),
        }
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Mode::Simple => write!(f, "simple"),
            Mode::Advanced => write!(f, "advanced"),
        }
    }
}

/// フォーム回答（フィールド名 → 値）
///
/// 数値や真偽値で届いた値は文字列化して保持する。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<String, Value>")]
pub struct FormAnswers(BTreeMap<String, String>);

impl FormAnswers {
    pub fn new() -> Self {
        Self::default()
    }

    /// 値を設定（ビルダー形式）
    pub fn with(mut self, field: &str, value: &str) -> Self {
        self.insert(field, value);
        self
    }

    pub fn insert(&mut self, field: &str, value: &str) {
        self.0.insert(field.to_string(), value.to_string());
    }

    /// 空白のみの値は未回答として扱う
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0
            .get(field)
            .map(|v| v.as_str())
            .filter(|v| !v.trim().is_empty())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl From<BTreeMap<String, Value>> for FormAnswers {
    fn from(raw: BTreeMap<String, Value>) -> Self {
        let answers = raw
            .into_iter()
            .filter_map(|(k, v)| crate::parser::value_text(&v).map(|text| (k, text)))
            .collect();
        Self(answers)
    }
}

/// 照合方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchType {
    Fuzzy,
    Exact,
}

/// 評価項目ごとのスコア（0-100、四捨五入済み）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubScores {
    pub head: u8,
    pub flow: u8,
    pub horsepower: u8,
    pub voltage: u8,
}

/// スコアリング結果
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult {
    pub entry: CatalogEntry,
    pub compatibility: u8,
    pub scores: SubScores,
    pub match_type: MatchType,
}

impl MatchResult {
    pub fn tier(&self) -> MatchTier {
        MatchTier::from_score(self.compatibility)
    }
}

/// 適合度の段階
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchTier {
    Basic,
    Fair,
    Good,
    Excellent,
}

impl MatchTier {
    pub fn from_score(score: u8) -> Self {
        match score {
            80..=u8::MAX => MatchTier::Excellent,
            60..=79 => MatchTier::Good,
            40..=59 => MatchTier::Fair,
            _ => MatchTier::Basic,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MatchTier::Excellent => "Excellent Match",
            MatchTier::Good => "Good Match",
            MatchTier::Fair => "Fair Match",
            MatchTier::Basic => "Basic Match",
        }
    }
}

/// 組み合わせ型カタログの完全一致結果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExactMatch {
    pub model: String,
    pub horsepower: Option<String>,
    pub sku: Option<String>,
    pub image: Option<String>,
    /// 照合に使わない表示用カラム（ヘッダー名, 値）
    pub extras: Vec<(String, String)>,
    /// カタログ内の行番号（0始まり）
    pub row: usize,
}

/// 推奨結果の1件
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchSummary {
    pub model: String,
    pub product_code: String,
    pub compatibility: u8,
    pub match_type: MatchType,
    pub accuracy: MatchTier,
}

impl From<&MatchResult> for MatchSummary {
    fn from(m: &MatchResult) -> Self {
        Self {
            model: m.entry.model.clone(),
            product_code: m.entry.product_code.clone(),
            compatibility: m.compatibility,
            match_type: m.match_type,
            accuracy: m.tier(),
        }
    }
}

/// 完全一致の要約
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExactMatchSummary {
    pub model: String,
    /// 完全一致は常に100
    pub accuracy: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub horsepower: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extras: Vec<(String, String)>,
}

impl From<&ExactMatch> for ExactMatchSummary {
    fn from(m: &ExactMatch) -> Self {
        Self {
            model: m.model.clone(),
            accuracy: 100,
            horsepower: m.horsepower.clone(),
            sku: m.sku.clone(),
            image: m.image.clone(),
            extras: m.extras.clone(),
        }
    }
}

/// 推奨結果（永続化・表示側との契約）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    /// 全揚程（フィート、四捨五入）
    pub head: i64,
    /// 流量（L/min、四捨五入）
    pub flow: i64,
    pub horsepower: f64,
    pub voltage: u32,
    pub matches: Vec<MatchSummary>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exact_match: Option<ExactMatchSummary>,
    pub timestamp: DateTime<Utc>,
}

impl Recommendation {
    /// ファジー・完全一致のどちらも見つからなかったか
    pub fn is_empty(&self) -> bool {
        self.matches.is_empty() && self.exact_match.is_none()
    }
}
