//! GWAS Trait Common Library
//!
//! 形質ラベル照合のコア（I/Oなし）。CLIとバッチスクリプトで共有される型と照合処理

pub mod types;
pub mod error;
pub mod similarity;
pub mod matcher;

pub use types::{MatchEntry, MatchThreshold, TraitLabel};
pub use error::{Error, Result};
pub use similarity::{normalize_label, similarity_ratio};
pub use matcher::{match_traits, MatchReport};
