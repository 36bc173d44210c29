use chrono::Utc;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use pump_selector::{cli, config, error, report, selection, store, wizard};
use pump_selector_common::{Mode, SelectionSession};
use cli::{CatalogAction, Cli, Commands};
use config::Config;
use error::Result;
use std::time::Duration;
use store::JsonStore;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = Config::load()?;
    if let Some(path) = &cli.store {
        config.store_path = Some(path.clone());
    }
    let mut store = JsonStore::load(&config.resolve_store_path()?);

    match cli.command {
        Commands::Catalog { action: CatalogAction::Import { file, headers } } => {
            println!("📥 pump-selector - カタログ取り込み\n");
            let summary = selection::import_catalog(&mut store, &file, headers)?;
            println!("✔ 取り込み完了: {}", store.path().display());
            print!("{}", report::render_summary(&summary));
        }

        Commands::Catalog { action: CatalogAction::Info } => {
            let summary = selection::catalog_summary(&store, &config)?;
            print!("{}", report::render_summary(&summary));
        }

        Commands::Recommend { answers, advanced, catalog, json } => {
            let answers = selection::read_answers(&answers)?;
            let mode = if advanced { Mode::Advanced } else { Mode::Simple };
            let session = selection::open_session(&store, &config, catalog.as_deref())?;

            let saved = with_spinner(|| selection::recommend_and_save(&mut store, &session, &answers, mode, Utc::now()))?;

            if json {
                println!("{}", serde_json::to_string_pretty(&saved.recommendation)?);
            } else {
                print!("{}", report::render_outcome(&saved.outcome));
                println!("\n✔ 選定 #{} を保存しました", saved.selection_id);
            }
        }

        Commands::Wizard => {
            println!("🔧 pump-selector - 選定ウィザード\n");
            let session = selection::open_session(&store, &config, None)?;
            warn_if_empty(&session);

            let answers = wizard::run_wizard()?;
            println!();
            let saved = with_spinner(|| selection::recommend_and_save(&mut store, &session, &answers, Mode::Simple, Utc::now()))?;

            print!("{}", report::render_outcome(&saved.outcome));
            println!("\n✔ 選定 #{} を保存しました", saved.selection_id);
        }

        Commands::History => {
            let entries = store::history(&store);
            if entries.is_empty() {
                println!("選定履歴がありません");
            }
            for entry in entries {
                let s = &entry.selection;
                println!("#{} {} ({})", s.id, s.created_at.format("%Y-%m-%d %H:%M"), s.mode);
                for (field, value) in s.answers.iter() {
                    println!("    {}: {}", field, value);
                }
                match entry.recommendation {
                    Some(rec) => match (&rec.exact_match, rec.matches.first()) {
                        (Some(exact), _) => println!("  → 完全一致: {}", exact.model),
                        (None, Some(best)) => println!(
                            "  → {} ({}%) ほか{}件",
                            best.model,
                            best.compatibility,
                            rec.matches.len() - 1
                        ),
                        (None, None) => println!("  → 該当なし"),
                    },
                    None => println!("  → 結果未保存"),
                }
            }
        }

        Commands::Config { show, set_store } => {
            if let Some(path) = set_store {
                config.store_path = Some(path);
                config.save()?;
                println!("✔ 保存先を設定しました");
            }

            if show {
                println!("設定:");
                println!("  保存先: {}", config.resolve_store_path()?.display());
                println!("  最大件数: {}", config.max_results);
                println!("  最低適合度: {}%", config.min_compatibility);
                println!("  完全適合: {}%", config.perfect_threshold);
                println!("  完全適合で打ち切り: {}", if config.stop_after_perfect { "有効" } else { "無効" });
                println!(
                    "  マッピング上書き: 水源{}件 / 吐出階{}件",
                    config.mapping.source().len(),
                    config.mapping.delivery().len()
                );
            }
        }
    }

    Ok(())
}

/// ログ初期化（RUST_LOG 優先、--verbose なら debug）
fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)))
        .with_writer(std::io::stderr)
        .init();
}

fn with_spinner<T>(work: impl FnOnce() -> T) -> T {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner().tick_strings(&["-", "\\", "|", "/", "✔"]));
    spinner.set_message("照合中...");
    spinner.enable_steady_tick(Duration::from_millis(80));
    let result = work();
    spinner.finish_and_clear();
    result
}

fn warn_if_empty(session: &SelectionSession) {
    if session.catalog().is_empty() {
        println!("⚠ カタログが登録されていません。結果は常に「該当なし」になります\n");
    }
}
