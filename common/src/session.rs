//! 選定セッション
//!
//! カタログ（と組み合わせ型なら値マッピング）を一度だけ読み込み、
//! 以降の推奨計算はすべてこのセッションを読み取り専用で参照する。

use crate::catalog::{Catalog, CatalogShape};
use crate::error::Result;
use crate::exact::{find_exact_match, Selection};
use crate::mapping::ValueMapping;
use crate::requirements::calculate;
use crate::scoring::{find_best_matches, MatchOptions};
use crate::types::{ExactMatch, FormAnswers, MatchResult, MatchSummary, Mode, Recommendation, Requirements};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use tracing::{info, warn};

/// 推奨計算の中間結果（表示側が詳細を描画するため全情報を保持）
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    pub requirements: Requirements,
    pub matches: Vec<MatchResult>,
    pub exact: Option<ExactMatch>,
}

impl Outcome {
    /// 永続化用の推奨結果に変換
    pub fn to_recommendation(&self, timestamp: DateTime<Utc>) -> Recommendation {
        Recommendation {
            head: self.requirements.head.round() as i64,
            flow: self.requirements.flow_per_minute().round() as i64,
            horsepower: self.requirements.horsepower,
            voltage: self.requirements.voltage,
            matches: self.matches.iter().map(MatchSummary::from).collect(),
            exact_match: self.exact.as_ref().map(Into::into),
            timestamp,
        }
    }
}

/// カタログの概要
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogSummary {
    pub shape: CatalogShape,
    pub entries: usize,
    /// 仕様表型で読み込み時に除外した行数
    pub dropped: usize,
    pub source_mapping: BTreeMap<String, String>,
    pub delivery_mapping: BTreeMap<String, String>,
}

/// 選定セッション
#[derive(Debug, Clone, Default)]
pub struct SelectionSession {
    catalog: Catalog,
    options: MatchOptions,
    mapping: ValueMapping,
}

impl SelectionSession {
    /// カタログ未設定のセッション（常に「該当なし」を返す）
    pub fn empty() -> Self {
        warn!("no catalog assigned for selection, recommendations will be empty");
        Self::default()
    }

    /// JSON配列からカタログを読み込む
    pub fn load(json: &str) -> Result<Self> {
        let catalog = Catalog::from_json(json)?;
        info!(shape = %catalog.shape(), entries = catalog.len(), "selection catalog ready");
        Ok(Self::from_catalog(catalog))
    }

    pub fn from_catalog(catalog: Catalog) -> Self {
        let mapping = match &catalog {
            Catalog::Combination(c) => c.mapping().clone(),
            Catalog::Spec(_) => ValueMapping::default(),
        };
        Self {
            catalog,
            options: MatchOptions::default(),
            mapping,
        }
    }

    /// スコアリング設定を指定
    pub fn with_options(mut self, options: MatchOptions) -> Result<Self> {
        options.validate()?;
        self.options = options;
        Ok(self)
    }

    /// 値マッピングの上書きを指定
    pub fn with_mapping_overrides(mut self, overrides: ValueMapping) -> Self {
        self.mapping.merge(&overrides);
        self
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn options(&self) -> &MatchOptions {
        &self.options
    }

    /// 照合に使う値マッピング（生成結果 + 上書き）
    pub fn mapping(&self) -> &ValueMapping {
        &self.mapping
    }

    /// 回答から要件を算出し、カタログ形状に応じた照合を行う
    pub fn evaluate(&self, answers: &FormAnswers, mode: Mode) -> Outcome {
        let requirements = calculate(answers, mode);

        let (matches, exact) = match &self.catalog {
            Catalog::Spec(spec) => (find_best_matches(spec, &requirements, &self.options), None),
            Catalog::Combination(combination) => {
                let selection = Selection::from_answers(answers, &self.mapping);
                (Vec::new(), find_exact_match(combination, &selection))
            }
        };

        info!(
            matches = matches.len(),
            exact = exact.is_some(),
            "recommendation evaluated"
        );

        Outcome {
            requirements,
            matches,
            exact,
        }
    }

    /// 推奨結果を生成
    pub fn recommend(&self, answers: &FormAnswers, mode: Mode, timestamp: DateTime<Utc>) -> Recommendation {
        self.evaluate(answers, mode).to_recommendation(timestamp)
    }

    pub fn summary(&self) -> CatalogSummary {
        let mapping = self.mapping();
        CatalogSummary {
            shape: self.catalog.shape(),
            entries: self.catalog.len(),
            dropped: match &self.catalog {
                Catalog::Spec(spec) => spec.dropped(),
                Catalog::Combination(_) => 0,
            },
            source_mapping: mapping.source().clone(),
            delivery_mapping: mapping.delivery().clone(),
        }
    }
}
