//! エラー型定義

use thiserror::Error;

/// 共通エラー型
#[derive(Error, Debug)]
pub enum Error {
    #[error("Catalog parse error: {0}")]
    CatalogParse(#[from] serde_json::Error),

    #[error("Catalog shape error: {0}")]
    CatalogShape(String),

    #[error("Config error: {0}")]
    Config(String),
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;
