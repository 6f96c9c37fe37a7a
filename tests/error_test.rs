//! エラーケーステスト
//!
//! 各種エラー条件でのエラーハンドリングを検証

use gwas_trait_tools::error::TraitToolsError;
use gwas_trait_tools::source::{read_candidates, CsvVocabulary, VocabularySource};
use std::path::Path;
use tempfile::tempdir;

/// 存在しない語彙ファイル
#[test]
fn test_vocabulary_not_found() {
    let result = CsvVocabulary::new("/nonexistent/path/vocab.csv").load_vocabulary();
    assert!(matches!(result, Err(TraitToolsError::FileNotFound(_))));
}

/// 存在しない候補ファイル
#[test]
fn test_candidates_not_found() {
    let result = read_candidates(Path::new("/nonexistent/path/candidates.txt"));
    assert!(matches!(result, Err(TraitToolsError::FileNotFound(_))));
}

/// IDが重複した語彙
#[test]
fn test_vocabulary_duplicate_ids() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("vocab.csv");
    std::fs::write(&path, "ID,TRAIT\n1,Asthma\n1,Obesity\n").unwrap();

    let result = CsvVocabulary::new(&path).load_vocabulary();
    assert!(matches!(result, Err(TraitToolsError::InvalidVocabulary(_))));
}

/// Display実装確認
#[test]
fn test_error_display() {
    let errors = vec![
        TraitToolsError::Config("テスト設定エラー".to_string()),
        TraitToolsError::FileNotFound("vocab.csv".to_string()),
        TraitToolsError::InvalidVocabulary("IDが重複".to_string()),
        TraitToolsError::InvalidInput("列不足".to_string()),
        TraitToolsError::Aborted("確認なし".to_string()),
    ];

    for err in errors {
        let display = format!("{}", err);
        assert!(!display.is_empty(), "エラーメッセージが空: {:?}", err);
    }
}

/// IOエラーからの変換
#[test]
fn test_io_error_conversion() {
    let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
    let err: TraitToolsError = io_err.into();

    assert!(matches!(err, TraitToolsError::Io(_)));
    assert!(format!("{}", err).contains("IO"));
}

/// common::Errorからの変換（透過的エラー）
#[test]
fn test_common_error_transparent() {
    let common_err = gwas_trait_common::Error::InvalidArgument("threshold 1.5 is outside [0, 1]".into());
    let err: TraitToolsError = common_err.into();

    assert!(matches!(err, TraitToolsError::Common(_)));
    assert_eq!(format!("{}", err), "Invalid argument: threshold 1.5 is outside [0, 1]");
}
