//! ファジースコアリングモジュール
//!
//! 仕様表型カタログの各ポンプを要件と比較し、重み付きの適合度
//! （0-100）で順位付けする。
//!
//! ## 処理フロー
//! 1. 電圧表記に要求電圧を含まないポンプを除外
//! 2. 揚程・流量・馬力・電圧のサブスコアを算出
//! 3. 重み付き合計（0.3 / 0.3 / 0.2 / 0.2）を四捨五入
//! 4. 閾値以上を適合度の降順（同点はカタログ順）に並べ、上位のみ返す

use crate::catalog::SpecCatalog;
use crate::comparators::voltage_supports;
use crate::error::{Error, Result};
use crate::types::{CatalogEntry, MatchResult, MatchType, Requirements, SubScores};
use serde::{Deserialize, Serialize};
use tracing::debug;

const HEAD_WEIGHT: f64 = 0.3;
const FLOW_WEIGHT: f64 = 0.3;
const HORSEPOWER_WEIGHT: f64 = 0.2;
const VOLTAGE_WEIGHT: f64 = 0.2;

/// スコアリングの閾値
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MatchOptions {
    /// 返す件数の上限
    pub max_results: usize,
    /// 候補として残す最低適合度
    pub min_compatibility: u8,
    /// 完全適合とみなす適合度
    pub perfect_threshold: u8,
    /// 完全適合が上限件数に達した時点で走査を打ち切る
    ///
    /// 打ち切ると後方のより高得点なポンプを取りこぼすことがあるため既定はオフ。
    pub stop_after_perfect: bool,
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self {
            max_results: 8,
            min_compatibility: 20,
            perfect_threshold: 95,
            stop_after_perfect: false,
        }
    }
}

impl MatchOptions {
    /// 設定値の検証
    pub fn validate(&self) -> Result<()> {
        if self.max_results == 0 {
            return Err(Error::Config("max_results must be at least 1".into()));
        }
        if self.min_compatibility > 100 || self.perfect_threshold > 100 {
            return Err(Error::Config("thresholds must be within 0-100".into()));
        }
        if self.min_compatibility > self.perfect_threshold {
            return Err(Error::Config(
                "min_compatibility must not exceed perfect_threshold".into(),
            ));
        }
        Ok(())
    }
}

/// 性能値の充足率（0-100）
///
/// 要求値以上なら100、不足なら比率。要求値が0以下なら常に100。
pub fn coverage_score(available: f64, required: f64) -> f64 {
    if required <= 0.0 || available >= required {
        return 100.0;
    }
    (available / required * 100.0).clamp(0.0, 100.0)
}

/// サブスコアから適合度を算出
pub fn compatibility(head: f64, flow: f64, horsepower: f64, voltage: f64) -> u8 {
    let total = head * HEAD_WEIGHT
        + flow * FLOW_WEIGHT
        + horsepower * HORSEPOWER_WEIGHT
        + voltage * VOLTAGE_WEIGHT;
    total.round().clamp(0.0, 100.0) as u8
}

/// 1台分のスコアを算出（電圧非対応なら None）
pub fn score_entry(entry: &CatalogEntry, requirements: &Requirements) -> Option<MatchResult> {
    if !voltage_supports(&entry.voltage, requirements.voltage) {
        return None;
    }

    let head = coverage_score(entry.head_max, requirements.head);
    let flow = coverage_score(entry.flow_max, requirements.flow);
    let horsepower = coverage_score(entry.horsepower, requirements.horsepower);
    let voltage = 100.0;

    Some(MatchResult {
        entry: entry.clone(),
        compatibility: compatibility(head, flow, horsepower, voltage),
        scores: SubScores {
            head: head.round() as u8,
            flow: flow.round() as u8,
            horsepower: horsepower.round() as u8,
            voltage: voltage as u8,
        },
        match_type: MatchType::Fuzzy,
    })
}

/// カタログから要件に合うポンプを適合度順に返す
pub fn find_best_matches(
    catalog: &SpecCatalog,
    requirements: &Requirements,
    options: &MatchOptions,
) -> Vec<MatchResult> {
    let mut perfect = Vec::new();
    let mut candidates = Vec::new();

    for entry in catalog.entries() {
        let Some(result) = score_entry(entry, requirements) else {
            continue;
        };

        if result.compatibility >= options.perfect_threshold {
            perfect.push(result);
            if options.stop_after_perfect && perfect.len() >= options.max_results {
                debug!("perfect match limit reached, scan stopped early");
                break;
            }
        } else if result.compatibility >= options.min_compatibility {
            candidates.push(result);
        }
    }

    debug!(
        perfect = perfect.len(),
        candidates = candidates.len(),
        "catalog scored"
    );

    let mut matches = perfect;
    matches.extend(candidates);
    // 安定ソートなので同点はカタログ順のまま
    matches.sort_by(|a, b| b.compatibility.cmp(&a.compatibility));
    matches.truncate(options.max_results);
    matches
}
