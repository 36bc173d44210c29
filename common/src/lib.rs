//! Pump Selector Common Library
//!
//! ポンプ選定エンジン（要件算出・ファジースコアリング・完全一致照合・
//! 値マッピング）。CLIなどの呼び出し側から共有される。

pub mod types;
pub mod error;
pub mod parser;
pub mod columns;
pub mod comparators;
pub mod catalog;
pub mod mapping;
pub mod requirements;
pub mod scoring;
pub mod exact;
pub mod session;

pub use types::{
    CatalogEntry, ExactMatch, ExactMatchSummary, FormAnswers, MatchResult, MatchSummary, MatchTier,
    MatchType, Mode, Recommendation, Requirements, SubScores,
};
pub use error::{Error, Result};
pub use catalog::{Catalog, CatalogShape, CombinationCatalog, SpecCatalog};
pub use mapping::ValueMapping;
pub use requirements::calculate;
pub use scoring::{find_best_matches, MatchOptions};
pub use exact::{find_exact_match, Selection};
pub use session::{CatalogSummary, Outcome, SelectionSession};
