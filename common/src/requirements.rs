//! 要件算出モジュール
//!
//! フォーム回答から全揚程・流量・必要馬力・電圧を求める。
//! 入力に対して純粋な関数で、同じ回答からは常に同じ値を返す。

use crate::parser::{leading_float, leading_int};
use crate::types::{FormAnswers, Mode, Requirements};
use tracing::debug;

/// 電圧の既定値
pub const DEFAULT_VOLTAGE: u32 = 220;
/// 蛇口（加圧）モードの圧力ヘッド（フィート）
pub const FAUCET_PRESSURE_HEAD: f64 = 15.0;
/// 階指定も階高入力もない場合の吐出高さ（フィート）
pub const DEFAULT_CUSTOM_HEIGHT: f64 = 50.0;
/// 使用量が未知の場合の流量（L/min）
pub const DEFAULT_USAGE_FLOW: f64 = 500.0;
/// 蛇口数が未知の場合の流量（L/min）
pub const DEFAULT_FAUCET_FLOW: f64 = 40.0;

/// 馬力算出の安全率
const SAFETY_FACTOR: f64 = 1.5;
/// 最小馬力
const MIN_HORSEPOWER: f64 = 0.5;
const LITERS_PER_GALLON: f64 = 3.785;
/// 水馬力の定数（ft × GPM / 3960 = HP）
const WATER_HP_CONSTANT: f64 = 3960.0;

/// 水位帯 → 代表深さ（フィート）
const WATER_LEVEL_DEPTH: [(&str, f64); 9] = [
    ("0-5", 2.5),
    ("5-20", 12.5),
    ("20-28", 24.0),
    ("28-50", 39.0),
    ("50-100", 75.0),
    ("100-200", 150.0),
    ("200-350", 275.0),
    ("350-500", 425.0),
    ("500-700", 600.0),
];

/// 吐出階 → 高さ（フィート）
const FLOOR_HEIGHT: [(&str, f64); 5] = [
    ("ground", 0.0),
    ("floor1", 10.0),
    ("floor2", 20.0),
    ("floor3", 30.0),
    ("floor4", 40.0),
];

/// 使用量 → 流量（L/min）
const USAGE_FLOW: [(&str, f64); 8] = [
    ("500L-30min", 278.0),
    ("1000L-30min", 556.0),
    ("1500L-30min", 833.0),
    ("2000L-60min", 333.0),
    ("3000L-60min", 500.0),
    ("1bigha-60min", 1000.0),
    ("3bigha-60min", 3000.0),
    ("6bigha-60min", 6000.0),
];

/// 蛇口数 → 流量（L/min）
const FAUCET_FLOW: [(&str, f64); 5] = [
    ("1", 20.0),
    ("2", 40.0),
    ("4", 80.0),
    ("6", 120.0),
    ("8", 160.0),
];

fn table_lookup(table: &[(&str, f64)], key: Option<&str>) -> Option<f64> {
    let key = key?.trim();
    table.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
}

/// フォーム回答から要件を算出
pub fn calculate(answers: &FormAnswers, mode: Mode) -> Requirements {
    let voltage = answers
        .get("phase")
        .and_then(leading_int)
        .and_then(|v| u32::try_from(v).ok())
        .filter(|v| *v > 0)
        .unwrap_or(DEFAULT_VOLTAGE);

    let requirements = match mode {
        Mode::Advanced => advanced(answers, voltage),
        Mode::Simple => simple(answers, voltage),
    };
    debug!(?mode, ?requirements, "requirements calculated");
    requirements
}

/// 詳細モード: 揚程・流量（L/min）・馬力を直接入力
fn advanced(answers: &FormAnswers, voltage: u32) -> Requirements {
    let number = |field: &str| answers.get(field).and_then(leading_float).unwrap_or(0.0);
    Requirements {
        head: number("head"),
        flow: number("flow") * 60.0,
        horsepower: number("hp"),
        voltage,
    }
}

/// 簡易モード: 水位・吐出階・使用量から算出
fn simple(answers: &FormAnswers, voltage: u32) -> Requirements {
    let mut head = table_lookup(&WATER_LEVEL_DEPTH, answers.get("waterLevel")).unwrap_or(0.0);
    let flow_per_minute;

    if let Some(faucets) = faucet_count(answers) {
        head += FAUCET_PRESSURE_HEAD;
        flow_per_minute = table_lookup(&FAUCET_FLOW, Some(faucets)).unwrap_or(DEFAULT_FAUCET_FLOW);
    } else {
        head += table_lookup(&FLOOR_HEIGHT, answers.get("delivery")).unwrap_or_else(|| {
            answers
                .get("customHeight")
                .and_then(leading_int)
                .map(|h| h as f64)
                .unwrap_or(DEFAULT_CUSTOM_HEIGHT)
        });
        flow_per_minute = table_lookup(&USAGE_FLOW, answers.get("usage")).unwrap_or(DEFAULT_USAGE_FLOW);
    }

    let flow = flow_per_minute * 60.0;
    Requirements {
        head,
        flow,
        horsepower: required_horsepower(head, flow),
        voltage,
    }
}

/// 蛇口（加圧）モードの蛇口数
///
/// faucetCount が回答されているか、吐出階の値が蛇口数コードの場合。
fn faucet_count(answers: &FormAnswers) -> Option<&str> {
    if let Some(count) = answers.get("faucetCount") {
        return Some(count);
    }
    answers
        .get("delivery")
        .filter(|d| FAUCET_FLOW.iter().any(|(k, _)| k == &d.trim()))
}

/// 必要馬力（安全率1.5、最小0.5HP、整数に切り上げ）
///
/// # Arguments
/// * `head` - 全揚程（フィート）
/// * `flow` - 流量（L/h）
///
/// # Examples
/// ```
/// use pump_selector_common::requirements::required_horsepower;
///
/// assert_eq!(required_horsepower(44.0, 33360.0), 3.0);
/// assert_eq!(required_horsepower(0.0, 0.0), 0.5);
/// ```
pub fn required_horsepower(head: f64, flow: f64) -> f64 {
    let flow_gpm = (flow / LITERS_PER_GALLON) / 60.0;
    MIN_HORSEPOWER.max((head * flow_gpm / WATER_HP_CONSTANT * SAFETY_FACTOR).ceil())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_floor_and_usage() {
        let answers = FormAnswers::new()
            .with("waterLevel", "20-28")
            .with("delivery", "floor2")
            .with("usage", "1000L-30min");

        let req = calculate(&answers, Mode::Simple);
        assert_eq!(req.head, 44.0);
        assert_eq!(req.flow, 33360.0);
        assert_eq!(req.horsepower, 3.0);
        assert_eq!(req.voltage, 220);
    }

    #[test]
    fn test_simple_faucet_mode_by_count() {
        let answers = FormAnswers::new()
            .with("waterLevel", "0-5")
            .with("faucetCount", "4")
            .with("usage", "3000L-60min");

        let req = calculate(&answers, Mode::Simple);
        assert_eq!(req.head, 17.5);
        assert_eq!(req.flow, 80.0 * 60.0);
    }

    #[test]
    fn test_simple_faucet_mode_by_delivery_code() {
        let answers = FormAnswers::new().with("delivery", "8");
        let req = calculate(&answers, Mode::Simple);
        assert_eq!(req.head, 15.0);
        assert_eq!(req.flow, 160.0 * 60.0);
    }

    #[test]
    fn test_simple_unknown_faucet_count() {
        let answers = FormAnswers::new().with("faucetCount", "3");
        let req = calculate(&answers, Mode::Simple);
        assert_eq!(req.flow, DEFAULT_FAUCET_FLOW * 60.0);
    }

    #[test]
    fn test_simple_ground_floor_is_zero() {
        let answers = FormAnswers::new()
            .with("waterLevel", "5-20")
            .with("delivery", "ground")
            .with("customHeight", "35");
        let req = calculate(&answers, Mode::Simple);
        assert_eq!(req.head, 12.5);
    }

    #[test]
    fn test_simple_custom_height() {
        let answers = FormAnswers::new()
            .with("waterLevel", "28-50")
            .with("delivery", "custom")
            .with("customHeight", "65 ft");
        let req = calculate(&answers, Mode::Simple);
        assert_eq!(req.head, 39.0 + 65.0);
    }

    #[test]
    fn test_simple_defaults() {
        let answers = FormAnswers::new()
            .with("delivery", "custom")
            .with("customHeight", "tall")
            .with("usage", "lots");
        let req = calculate(&answers, Mode::Simple);
        assert_eq!(req.head, DEFAULT_CUSTOM_HEIGHT);
        assert_eq!(req.flow, DEFAULT_USAGE_FLOW * 60.0);
    }

    #[test]
    fn test_advanced_direct_inputs() {
        let answers = FormAnswers::new()
            .with("head", "120")
            .with("flow", "250")
            .with("hp", "7.5")
            .with("phase", "440");

        let req = calculate(&answers, Mode::Advanced);
        assert_eq!(req.head, 120.0);
        assert_eq!(req.flow, 15000.0);
        assert_eq!(req.horsepower, 7.5);
        assert_eq!(req.voltage, 440);
    }

    #[test]
    fn test_advanced_missing_inputs_are_zero() {
        let req = calculate(&FormAnswers::new(), Mode::Advanced);
        assert_eq!(req.head, 0.0);
        assert_eq!(req.flow, 0.0);
        assert_eq!(req.horsepower, 0.0);
    }

    #[test]
    fn test_voltage_fallback() {
        let answers = FormAnswers::new().with("phase", "single");
        assert_eq!(calculate(&answers, Mode::Simple).voltage, DEFAULT_VOLTAGE);

        let answers = FormAnswers::new().with("phase", "415V");
        assert_eq!(calculate(&answers, Mode::Simple).voltage, 415);
    }

    #[test]
    fn test_required_horsepower_floor_and_ceil() {
        assert_eq!(required_horsepower(10.0, 60.0), 1.0);
        // 180ft × 1585.2GPM / 3960 × 1.5 ≈ 108.08
        assert_eq!(required_horsepower(180.0, 6000.0 * 60.0), 109.0);
    }

    #[test]
    fn test_calculate_is_deterministic() {
        let answers = FormAnswers::new()
            .with("waterLevel", "100-200")
            .with("delivery", "floor3")
            .with("usage", "6bigha-60min");
        let a = calculate(&answers, Mode::Simple);
        let b = calculate(&answers, Mode::Simple);
        assert_eq!(a.horsepower.to_bits(), b.horsepower.to_bits());
        assert_eq!(a, b);
    }
}
