//! エラー型定義

use thiserror::Error;

/// 共通エラー型
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Matching cancelled after {completed} of {total} candidates")]
    Cancelled { completed: usize, total: usize },
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;
