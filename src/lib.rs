//! GWAS Catalog 形質ラベルの類似照合・メンテナンスツール
//!
//! コアの照合処理は `gwas_trait_common`、このクレートはファイル入出力と並列実行・CLIを担う。
//! テーブルダンプからのキュレーション用レポートもここ。

pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod matcher;
pub mod report;
pub mod source;
pub mod unlink;

pub use gwas_trait_common::{MatchEntry, MatchReport, MatchThreshold, TraitLabel};
