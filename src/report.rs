//! 推奨結果の表示

use pump_selector_common::{CatalogSummary, Outcome};
use std::fmt::Write;

/// 推奨結果をテキストで整形
pub fn render_outcome(outcome: &Outcome) -> String {
    let req = &outcome.requirements;
    let mut out = String::new();

    let _ = writeln!(out, "必要性能:");
    let _ = writeln!(out, "  全揚程: {} ft", req.head.round());
    let _ = writeln!(out, "  流量:   {} L/min", req.flow_per_minute().round());
    let _ = writeln!(out, "  馬力:   {} HP", req.horsepower);
    let _ = writeln!(out, "  電圧:   {} V", req.voltage);
    out.push('\n');

    if let Some(exact) = &outcome.exact {
        let _ = writeln!(out, "完全一致: {}", exact.model);
        if let Some(hp) = &exact.horsepower {
            let _ = writeln!(out, "  馬力: {}", hp);
        }
        if let Some(sku) = &exact.sku {
            let _ = writeln!(out, "  SKU:  {}", sku);
        }
        if let Some(image) = &exact.image {
            let _ = writeln!(out, "  画像: {}", image);
        }
        for (header, value) in &exact.extras {
            let _ = writeln!(out, "  {}: {}", header, value);
        }
        return out;
    }

    if outcome.matches.is_empty() {
        let _ = writeln!(out, "条件に合うポンプが見つかりませんでした");
        return out;
    }

    let _ = writeln!(out, "推奨ポンプ ({}件):", outcome.matches.len());
    for (rank, m) in outcome.matches.iter().enumerate() {
        let _ = writeln!(
            out,
            "  {}. {} [{}] {}% ({})",
            rank + 1,
            m.entry.model,
            m.entry.product_code,
            m.compatibility,
            m.tier().label()
        );
        let _ = writeln!(
            out,
            "     揚程 {}% / 流量 {}% / 馬力 {}% / 電圧 {}%  ({}HP, {}V)",
            m.scores.head,
            m.scores.flow,
            m.scores.horsepower,
            m.scores.voltage,
            m.entry.horsepower,
            m.entry.voltage
        );
    }
    out
}

/// カタログ概要をテキストで整形
pub fn render_summary(summary: &CatalogSummary) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "カタログ情報:");
    let _ = writeln!(out, "  形式: {}", summary.shape);
    let _ = writeln!(out, "  件数: {}", summary.entries);
    if summary.dropped > 0 {
        let _ = writeln!(out, "  除外: {}行", summary.dropped);
    }

    for (title, table) in [
        ("水源マッピング", &summary.source_mapping),
        ("吐出階マッピング", &summary.delivery_mapping),
    ] {
        if table.is_empty() {
            continue;
        }
        let _ = writeln!(out, "  {}:", title);
        for (code, value) in table {
            let _ = writeln!(out, "    {} → {}", code, value);
        }
    }
    out
}
