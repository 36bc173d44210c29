use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "pump-selector")]
#[command(about = "ポンプ選定ウィザード（要件算出・カタログ照合）", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// 保存先ストア（省略時は設定値）
    #[arg(long, global = true)]
    pub store: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// カタログの取り込み・確認
    Catalog {
        #[command(subcommand)]
        action: CatalogAction,
    },

    /// 回答ファイルから推奨ポンプを算出
    Recommend {
        /// 回答JSONファイル（フィールド名 → 値）
        #[arg(short, long, required = true)]
        answers: PathBuf,

        /// 詳細モード（揚程・流量・馬力を直接指定）
        #[arg(long)]
        advanced: bool,

        /// 登録済みカタログの代わりに使うカタログファイル
        #[arg(short, long)]
        catalog: Option<PathBuf>,

        /// 結果をJSONで出力
        #[arg(long)]
        json: bool,
    },

    /// 対話形式で回答して推奨ポンプを算出
    Wizard,

    /// 保存済みの選定履歴を表示
    History,

    /// 設定を表示/編集
    Config {
        /// 設定を表示
        #[arg(long)]
        show: bool,

        /// 保存先ストアを設定
        #[arg(long = "set-store")]
        set_store: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
pub enum CatalogAction {
    /// カタログファイル（JSON/xlsx/xls/ods）を取り込む
    Import {
        #[arg(required = true)]
        file: PathBuf,

        /// 表計算の1行目を列名として扱う
        #[arg(long)]
        headers: bool,
    },

    /// 登録済みカタログの概要を表示
    Info,
}
