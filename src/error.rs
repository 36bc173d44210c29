use thiserror::Error;

#[derive(Error, Debug)]
pub enum SelectorError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("カタログが登録されていません。`pump-selector catalog import <file>` で取り込んでください")]
    CatalogNotFound,

    #[error("未対応のカタログ形式: {0}")]
    UnsupportedFormat(String),

    #[error("表計算ファイル読み込みエラー: {0}")]
    Spreadsheet(String),

    #[error("回答ファイルが不正: {0}")]
    InvalidAnswers(String),

    #[error("入力エラー: {0}")]
    Prompt(#[from] dialoguer::Error),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Common(#[from] pump_selector_common::Error),
}

impl From<calamine::Error> for SelectorError {
    fn from(e: calamine::Error) -> Self {
        SelectorError::Spreadsheet(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, SelectorError>;
