//! 入力ソースモジュール
//!
//! 参照語彙（ID, 形質ラベル）と候補ラベルをファイルまたは対話入力から読み込む。
//! DBテーブルのCSVダンプ（`DISEASE_TRAIT`, `EFO_TRAIT` など）を想定。

pub mod candidates;
pub mod vocabulary;

pub use candidates::{parse_candidates, prompt_candidates, read_candidates};
pub use vocabulary::{CsvVocabulary, VocabularySource};

use crate::error::{Result, TraitToolsError};
use std::path::Path;

/// ヘッダーから列番号を探す（大文字小文字無視、候補名のいずれか）
pub(crate) fn find_column(headers: &csv::StringRecord, names: &[&str]) -> Option<usize> {
    headers.iter().position(|h| {
        let h = h.trim();
        names.iter().any(|n| h.eq_ignore_ascii_case(n))
    })
}

/// 必須列を探し、無ければ `what` を添えてエラー
pub(crate) fn require_column(
    headers: &csv::StringRecord,
    names: &[&str],
    path: &Path,
) -> Result<usize> {
    find_column(headers, names).ok_or_else(|| {
        TraitToolsError::InvalidVocabulary(format!(
            "{}: 列 {} が見つかりません",
            path.display(),
            names.join("/")
        ))
    })
}

pub(crate) fn ensure_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(TraitToolsError::FileNotFound(path.display().to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_column_case_insensitive() {
        let headers = csv::StringRecord::from(vec!["id", " Trait ", "other"]);
        assert_eq!(find_column(&headers, &["ID"]), Some(0));
        assert_eq!(find_column(&headers, &["TRAIT", "LABEL"]), Some(1));
        assert_eq!(find_column(&headers, &["MISSING"]), None);
    }

    #[test]
    fn test_ensure_exists() {
        let result = ensure_exists(Path::new("/nonexistent/vocab.csv"));
        assert!(matches!(result, Err(TraitToolsError::FileNotFound(_))));
    }
}
