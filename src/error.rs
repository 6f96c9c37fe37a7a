use thiserror::Error;

#[derive(Error, Debug)]
pub enum TraitToolsError {
    #[error(transparent)]
    Common(#[from] gwas_trait_common::Error),

    #[error("設定エラー: {0}")]
    Config(String),

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("語彙ファイルが不正: {0}")]
    InvalidVocabulary(String),

    #[error("入力ファイルが不正: {0}")]
    InvalidInput(String),

    #[error("CSVエラー: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error("入力プロンプトエラー: {0}")]
    Prompt(#[from] dialoguer::Error),

    #[error("処理を中止しました: {0}")]
    Aborted(String),
}

pub type Result<T> = std::result::Result<T, TraitToolsError>;
