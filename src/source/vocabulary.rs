//! 参照語彙の読み込み

use super::{ensure_exists, require_column};
use crate::error::{Result, TraitToolsError};
use gwas_trait_common::TraitLabel;
use std::collections::HashSet;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

const ID_COLUMNS: &[&str] = &["ID"];
const LABEL_COLUMNS: &[&str] = &["TRAIT", "LABEL"];

/// 参照語彙の供給元
pub trait VocabularySource {
    fn load_vocabulary(&self) -> Result<Vec<TraitLabel>>;
}

/// `ID,TRAIT` 形式のCSVファイル
#[derive(Debug, Clone)]
pub struct CsvVocabulary {
    path: PathBuf,
}

impl CsvVocabulary {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// リーダーから読み込み（`path` はエラーメッセージ用）
    ///
    /// ラベルは空白も含めてそのまま保持する。空ラベルも語彙の1件として残す。
    pub fn read_from<R: Read>(reader: R, path: &Path) -> Result<Vec<TraitLabel>> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::Headers)
            .from_reader(reader);

        let headers = rdr.headers()?.clone();
        let id_col = require_column(&headers, ID_COLUMNS, path)?;
        let label_col = require_column(&headers, LABEL_COLUMNS, path)?;

        let mut labels = Vec::new();
        for (row, record) in rdr.records().enumerate() {
            let record = record?;
            // ヘッダーが1行目なのでデータは2行目から
            let line = row + 2;

            let raw_id = record.get(id_col).unwrap_or_default();
            let id: i64 = raw_id.trim().parse().map_err(|_| {
                TraitToolsError::InvalidVocabulary(format!(
                    "{}:{}: IDが数値ではありません: {:?}",
                    path.display(),
                    line,
                    raw_id
                ))
            })?;

            let label = record.get(label_col).unwrap_or_default();
            if label.trim().is_empty() {
                warn!(path = %path.display(), line, id, "empty trait label");
            }

            labels.push(TraitLabel::new(id, label));
        }

        check_unique_ids(&labels)?;
        debug!(path = %path.display(), count = labels.len(), "vocabulary loaded");
        Ok(labels)
    }
}

impl VocabularySource for CsvVocabulary {
    fn load_vocabulary(&self) -> Result<Vec<TraitLabel>> {
        ensure_exists(&self.path)?;
        let file = std::fs::File::open(&self.path)?;
        Self::read_from(std::io::BufReader::new(file), &self.path)
    }
}

/// 語彙内でIDが重複していないことを確認
fn check_unique_ids(labels: &[TraitLabel]) -> Result<()> {
    let mut seen = HashSet::new();
    for label in labels {
        if !seen.insert(label.id) {
            return Err(TraitToolsError::InvalidVocabulary(format!(
                "IDが重複しています: {}",
                label.id
            )));
        }
    }
    Ok(())
}
