//! 選定ワークフロー
//!
//! カタログ取り込み → セッション構築 → 推奨計算 → 保存 の一連の処理。
//! CLIの各コマンドはここを呼ぶだけにする。

use crate::config::Config;
use crate::error::{Result, SelectorError};
use crate::import::read_catalog_rows;
use crate::store::{load_catalog, save_catalog, save_recommendation, save_selection, KeyValueStore};
use chrono::{DateTime, Utc};
use pump_selector_common::{Catalog, CatalogSummary, FormAnswers, Mode, Outcome, Recommendation, SelectionSession};
use std::path::Path;
use tracing::{info, warn};

/// 保存済みの推奨結果
#[derive(Debug, Clone)]
pub struct SavedRecommendation {
    pub selection_id: u64,
    pub outcome: Outcome,
    pub recommendation: Recommendation,
}

/// カタログファイルを検証してストアに登録
pub fn import_catalog(store: &mut impl KeyValueStore, path: &Path, headers: bool) -> Result<CatalogSummary> {
    let rows = read_catalog_rows(path, headers)?;
    let catalog = Catalog::from_value(rows.clone())?;
    let summary = SelectionSession::from_catalog(catalog).summary();

    save_catalog(store, rows)?;
    info!(shape = %summary.shape, entries = summary.entries, "catalog imported");
    Ok(summary)
}

/// 登録済みカタログの概要（未登録ならエラー）
pub fn catalog_summary(store: &impl KeyValueStore, config: &Config) -> Result<CatalogSummary> {
    if load_catalog(store).is_none() {
        return Err(SelectorError::CatalogNotFound);
    }
    Ok(open_session(store, config, None)?.summary())
}

/// 設定を反映したセッションを構築
///
/// `catalog_file` を指定した場合は登録済みカタログより優先する。
/// どちらも無い場合は空のセッション（結果は常に「該当なし」）。
pub fn open_session(
    store: &impl KeyValueStore,
    config: &Config,
    catalog_file: Option<&Path>,
) -> Result<SelectionSession> {
    let session = match catalog_file {
        Some(path) => SelectionSession::from_catalog(Catalog::from_value(read_catalog_rows(path, false)?)?),
        None => match load_catalog(store) {
            Some(rows) => SelectionSession::from_catalog(Catalog::from_value(rows.clone())?),
            None => {
                warn!("no catalog imported");
                SelectionSession::empty()
            }
        },
    };

    Ok(session
        .with_options(config.match_options()?)?
        .with_mapping_overrides(config.mapping.clone()))
}

/// 回答JSONファイルを読み込む
pub fn read_answers(path: &Path) -> Result<FormAnswers> {
    if !path.exists() {
        return Err(SelectorError::FileNotFound(path.display().to_string()));
    }
    let content = std::fs::read_to_string(path)?;
    serde_json::from_str(&content).map_err(|e| SelectorError::InvalidAnswers(e.to_string()))
}

/// 推奨結果を算出し、回答と結果をストアに保存
pub fn recommend_and_save(
    store: &mut impl KeyValueStore,
    session: &SelectionSession,
    answers: &FormAnswers,
    mode: Mode,
    now: DateTime<Utc>,
) -> Result<SavedRecommendation> {
    let outcome = session.evaluate(answers, mode);
    let recommendation = outcome.to_recommendation(now);

    let selection_id = save_selection(store, answers, mode, now)?;
    save_recommendation(store, selection_id, &recommendation)?;

    Ok(SavedRecommendation {
        selection_id,
        outcome,
        recommendation,
    })
}
