//! 照合用の比較器
//!
//! - 電圧: カタログ側の表記（"220/440" など）に要求電圧が含まれるか
//! - 吐出階: "1st floor" / "first floor" / "floor1" を同じ階として扱う

use crate::parser::normalize_token;
use regex::Regex;

lazy_static::lazy_static! {
    static ref FLOOR_CODE_RE: Regex = Regex::new(r"^floor\s*(\d+)$").unwrap();
    static ref ORDINAL_RE: Regex = Regex::new(r"\b(\d+)(?:st|nd|rd|th)\b").unwrap();
    static ref GROUND_RE: Regex = Regex::new(r"\bground\b").unwrap();
}

const ORDINAL_WORDS: [(&str, u8); 10] = [
    ("first", 1),
    ("second", 2),
    ("third", 3),
    ("fourth", 4),
    ("fifth", 5),
    ("sixth", 6),
    ("seventh", 7),
    ("eighth", 8),
    ("ninth", 9),
    ("tenth", 10),
];

/// 吐出先の階
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Floor {
    Ground,
    Level(u8),
}

impl Floor {
    /// フォームコード・カタログ表記のどちらからも階を読み取る
    ///
    /// # Examples
    /// ```
    /// use pump_selector_common::comparators::Floor;
    ///
    /// assert_eq!(Floor::parse("floor2"), Some(Floor::Level(2)));
    /// assert_eq!(Floor::parse("2nd Floor"), Some(Floor::Level(2)));
    /// assert_eq!(Floor::parse("Ground Floor"), Some(Floor::Ground));
    /// assert_eq!(Floor::parse("50"), None);
    /// ```
    pub fn parse(text: &str) -> Option<Floor> {
        let text = normalize_token(text);

        if GROUND_RE.is_match(&text) {
            return Some(Floor::Ground);
        }
        if let Some(cap) = FLOOR_CODE_RE.captures(&text) {
            return cap[1].parse().ok().map(Floor::Level);
        }
        if let Some(cap) = ORDINAL_RE.captures(&text) {
            return cap[1].parse().ok().map(Floor::Level);
        }
        text.split(|c: char| !c.is_alphanumeric())
            .find_map(|word| ORDINAL_WORDS.iter().find(|(w, _)| *w == word))
            .map(|(_, n)| Floor::Level(*n))
    }

    /// フォーム側のコード（ground / floor1 ...）
    pub fn form_code(&self) -> String {
        match self {
            Floor::Ground => "ground".to_string(),
            Floor::Level(n) => format!("floor{}", n),
        }
    }
}

/// 吐出階の一致判定
///
/// 完全一致、または双方が同じ階を指す場合に一致とする。
pub fn delivery_matches(catalog_value: &str, user_value: &str) -> bool {
    let catalog_value = normalize_token(catalog_value);
    let user_value = normalize_token(user_value);
    if catalog_value == user_value {
        return true;
    }
    match (Floor::parse(&catalog_value), Floor::parse(&user_value)) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

/// カタログの電圧表記が要求電圧を含むか（"220/440" は 220 にも 440 にも対応）
pub fn voltage_supports(catalog_voltage: &str, voltage: u32) -> bool {
    !catalog_voltage.trim().is_empty() && catalog_voltage.contains(&voltage.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_floor_parse_codes() {
        assert_eq!(Floor::parse("ground"), Some(Floor::Ground));
        assert_eq!(Floor::parse("floor1"), Some(Floor::Level(1)));
        assert_eq!(Floor::parse("Floor 4"), Some(Floor::Level(4)));
    }

    #[test]
    fn test_floor_parse_catalog_text() {
        assert_eq!(Floor::parse("1st floor"), Some(Floor::Level(1)));
        assert_eq!(Floor::parse("First Floor"), Some(Floor::Level(1)));
        assert_eq!(Floor::parse("3rd"), Some(Floor::Level(3)));
        assert_eq!(Floor::parse("fourth floor"), Some(Floor::Level(4)));
        assert_eq!(Floor::parse("ground floor"), Some(Floor::Ground));
    }

    #[test]
    fn test_floor_parse_unrelated() {
        assert_eq!(Floor::parse("custom"), None);
        assert_eq!(Floor::parse("4"), None);
        assert_eq!(Floor::parse(""), None);
    }

    #[test]
    fn test_form_code() {
        assert_eq!(Floor::Ground.form_code(), "ground");
        assert_eq!(Floor::Level(3).form_code(), "floor3");
    }

    #[test]
    fn test_delivery_ordinal_equivalence() {
        assert!(delivery_matches("1st floor", "floor1"));
        assert!(delivery_matches("1st floor", "1st floor"));
        assert!(delivery_matches("1st Floor ", "first floor"));
        assert!(!delivery_matches("1st floor", "2nd floor"));
        assert!(!delivery_matches("1st floor", "floor2"));
    }

    #[test]
    fn test_delivery_non_floor_values() {
        assert!(delivery_matches("4", "4"));
        assert!(!delivery_matches("4", "floor4"));
        assert!(delivery_matches("", ""));
    }

    #[test]
    fn test_voltage_supports() {
        assert!(voltage_supports("220", 220));
        assert!(voltage_supports("220/440", 440));
        assert!(voltage_supports("415V", 415));
        assert!(!voltage_supports("440", 220));
        assert!(!voltage_supports("", 220));
        assert!(!voltage_supports("N/A", 220));
    }
}
